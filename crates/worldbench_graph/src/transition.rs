//! Transition types for world graphs.
//!
//! A transition is a directed, action-labelled edge. Its `(start, action)`
//! pair is the lookup key used to apply the action deterministically.

use core::fmt;

use crate::action::ActionId;
use crate::state::StateId;

/// `start --action--> end`, optionally annotated with a rationale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    start: StateId,
    action: ActionId,
    end: StateId,
    rationale: Option<String>,
}

impl Transition {
    /// Creates a transition. References are checked when the transition is
    /// added to a graph, not here.
    #[must_use]
    pub fn new(
        start: impl Into<StateId>,
        action: impl Into<ActionId>,
        end: impl Into<StateId>,
    ) -> Self {
        Self {
            start: start.into(),
            action: action.into(),
            end: end.into(),
            rationale: None,
        }
    }

    /// Attaches a free-text rationale for why the action leads to `end`.
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Returns the start state id.
    #[must_use]
    pub fn start(&self) -> &StateId {
        &self.start
    }

    /// Returns the action id.
    #[must_use]
    pub fn action(&self) -> &ActionId {
        &self.action
    }

    /// Returns the end state id.
    #[must_use]
    pub fn end(&self) -> &StateId {
        &self.end
    }

    /// Returns the rationale, if any.
    #[must_use]
    pub fn rationale(&self) -> Option<&str> {
        self.rationale.as_deref()
    }

    /// Returns the `(start, action, end)` triple with owned ids.
    #[must_use]
    pub fn triple(&self) -> (StateId, ActionId, StateId) {
        (self.start.clone(), self.action.clone(), self.end.clone())
    }

    /// Returns true if this transition links `start` to `end` via `action`.
    #[must_use]
    pub fn matches(&self, start: &str, action: &str, end: &str) -> bool {
        self.start.as_str() == start && self.action.as_str() == action && self.end.as_str() == end
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.start, self.action, self.end)
    }
}
