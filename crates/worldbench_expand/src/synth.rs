//! Content synthesis for new branches.
//!
//! The expander decides *where* new states and actions go and which ids they
//! get. What they *say* comes from a [`BranchSynthesizer`], typically backed
//! by a language model. [`TemplateSynthesizer`] is a deterministic stand-in
//! that needs no external service.

use core::fmt;

use worldbench_graph::prelude::*;

use crate::error::SynthesisError;

/// The flavour of a deviation from the canonical action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deviation {
    /// Takes a chance the canonical path avoids.
    Risky,
    /// Skips work the canonical path does.
    Shortcut,
    /// Does something wrong by accident.
    Mistake,
}

impl Deviation {
    /// Returns the deviation for the `n`th alternative at one branch point.
    #[must_use]
    pub fn nth(n: usize) -> Self {
        match n % 3 {
            0 => Deviation::Risky,
            1 => Deviation::Shortcut,
            _ => Deviation::Mistake,
        }
    }

    /// Returns the lowercase name, also used as the default action type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Deviation::Risky => "risky",
            Deviation::Shortcut => "shortcut",
            Deviation::Mistake => "mistake",
        }
    }
}

impl fmt::Display for Deviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synthesized state text.
#[derive(Debug, Clone, PartialEq)]
pub struct StateContent {
    /// Natural-language description.
    pub description: String,
    /// Outcome quality, for endings.
    pub quality: Option<f64>,
    /// Outcome reasoning, for endings.
    pub reasoning: Option<String>,
}

impl StateContent {
    /// Creates content with only a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            quality: None,
            reasoning: None,
        }
    }
}

/// Synthesized action text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContent {
    /// Natural-language description.
    pub description: String,
    /// Action category; the expander falls back to the deviation name.
    pub action_type: Option<String>,
}

impl ActionContent {
    /// Creates content with only a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            action_type: None,
        }
    }
}

/// Request for a new ending state.
#[derive(Debug, Clone, Copy)]
pub struct EndingRequest<'a> {
    /// Name of the source world.
    pub scenario: &'a str,
    /// The goal the canonical path reaches.
    pub canonical_goal: &'a State,
    /// [`StateKind::Goal`] or [`StateKind::Failure`].
    pub kind: StateKind,
    /// Zero-based index among new endings of the same kind.
    pub index: usize,
}

/// Request for the action that leaves the canonical path.
#[derive(Debug, Clone, Copy)]
pub struct DeviationRequest<'a> {
    /// Name of the source world.
    pub scenario: &'a str,
    /// The branch point.
    pub branch_state: &'a State,
    /// The action the canonical path takes from the branch point.
    pub canonical_action: &'a Action,
    /// Flavour of the deviation.
    pub deviation: Deviation,
    /// The ending the deviation leads to.
    pub target: &'a State,
}

/// Request for one intermediate state of a deviation, or the action leaving it.
#[derive(Debug, Clone, Copy)]
pub struct StepRequest<'a> {
    /// Name of the source world.
    pub scenario: &'a str,
    /// The branch point the deviation starts from.
    pub branch_state: &'a State,
    /// Flavour of the deviation.
    pub deviation: Deviation,
    /// The ending the deviation leads to.
    pub target: &'a State,
    /// Zero-based step within the deviation.
    pub step: usize,
    /// Number of intermediate states in the deviation.
    pub steps: usize,
}

/// Produces the text of synthesized branches.
pub trait BranchSynthesizer {
    /// Describes a new ending.
    ///
    /// # Errors
    ///
    /// Returns a [`SynthesisError`] if no content could be produced.
    fn ending(&mut self, request: &EndingRequest<'_>) -> Result<StateContent, SynthesisError>;

    /// Describes the action that leaves the canonical path.
    ///
    /// # Errors
    ///
    /// Returns a [`SynthesisError`] if no content could be produced.
    fn alternative_action(
        &mut self,
        request: &DeviationRequest<'_>,
    ) -> Result<ActionContent, SynthesisError>;

    /// Describes an intermediate state of a deviation.
    ///
    /// # Errors
    ///
    /// Returns a [`SynthesisError`] if no content could be produced.
    fn intermediate_state(
        &mut self,
        request: &StepRequest<'_>,
    ) -> Result<StateContent, SynthesisError>;

    /// Describes the action leaving an intermediate state.
    ///
    /// # Errors
    ///
    /// Returns a [`SynthesisError`] if no content could be produced.
    fn step_action(&mut self, request: &StepRequest<'_>) -> Result<ActionContent, SynthesisError>;
}

/// Deterministic, template-based synthesizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSynthesizer;

impl BranchSynthesizer for TemplateSynthesizer {
    fn ending(&mut self, request: &EndingRequest<'_>) -> Result<StateContent, SynthesisError> {
        let goal = request.canonical_goal.description();
        let n = request.index + 1;
        Ok(match request.kind {
            StateKind::Goal => StateContent {
                description: format!("Alternative success {n}: {goal}"),
                quality: Some(7.0),
                reasoning: Some("goal reached by a different route".to_owned()),
            },
            _ => StateContent {
                description: format!("Failure {n}: {} abandoned short of '{goal}'", request.scenario),
                quality: Some(2.0),
                reasoning: Some("deviation made the goal unreachable".to_owned()),
            },
        })
    }

    fn alternative_action(
        &mut self,
        request: &DeviationRequest<'_>,
    ) -> Result<ActionContent, SynthesisError> {
        let verb = match request.deviation {
            Deviation::Risky => "Take a risk",
            Deviation::Shortcut => "Cut a corner",
            Deviation::Mistake => "Make a mistake",
        };
        Ok(ActionContent {
            description: format!(
                "{verb} instead of: {}",
                request.canonical_action.description()
            ),
            action_type: Some(request.deviation.as_str().to_owned()),
        })
    }

    fn intermediate_state(
        &mut self,
        request: &StepRequest<'_>,
    ) -> Result<StateContent, SynthesisError> {
        Ok(StateContent::new(format!(
            "{} detour from '{}', step {} of {}",
            request.deviation,
            request.branch_state.description(),
            request.step + 1,
            request.steps
        )))
    }

    fn step_action(&mut self, request: &StepRequest<'_>) -> Result<ActionContent, SynthesisError> {
        let next = if request.step + 1 == request.steps {
            request.target.description().to_owned()
        } else {
            format!("step {}", request.step + 2)
        };
        Ok(ActionContent::new(format!(
            "Carry on with the {} detour towards {next}",
            request.deviation
        )))
    }
}
