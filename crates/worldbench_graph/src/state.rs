//! State types for world graphs.
//!
//! States are the vertices of a world graph: natural-language snapshots of
//! the world, optionally annotated with progress and outcome metadata.

use core::borrow::Borrow;
use core::fmt;
use std::sync::Arc;

use crate::error::{EntityKind, GraphError};

/// Unique identifier for a state within a world graph.
///
/// Internally uses `Arc<str>` for cheap cloning (reference count bump only),
/// since ids are copied into indices, transitions and traversal results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(Arc<str>);

impl StateId {
    /// Creates a state id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StateId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for StateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Outcome classification of a state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StateKind {
    /// An intermediate state.
    #[default]
    Ordinary,
    /// A successful ending.
    Goal,
    /// A failed ending.
    Failure,
}

impl StateKind {
    /// Returns the stable lowercase name used in records and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StateKind::Ordinary => "ordinary",
            StateKind::Goal => "goal",
            StateKind::Failure => "failure",
        }
    }

    /// Returns true for goal and failure states.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StateKind::Ordinary)
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete state of the world.
///
/// States are immutable once inserted into a graph. To change one, build a
/// new `State` with the same id and call
/// [`WorldGraph::replace_state`](crate::graph::WorldGraph::replace_state).
///
/// # Example
///
/// ```
/// use worldbench_graph::state::{State, StateKind};
///
/// let done = State::new("s6", "Completed desk, all screws tightened")?
///     .with_progress(1.0)
///     .with_quality(9.0)
///     .with_kind(StateKind::Goal);
/// assert!(done.kind().is_terminal());
/// # Ok::<(), worldbench_graph::GraphError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    id: StateId,
    description: String,
    progress: Option<f64>,
    quality: Option<f64>,
    reasoning: Option<String>,
    kind: StateKind,
}

impl State {
    /// Creates an ordinary state.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Validation`] if the id or description is empty.
    pub fn new(id: impl Into<StateId>, description: impl Into<String>) -> Result<Self, GraphError> {
        let state = Self {
            id: id.into(),
            description: description.into(),
            progress: None,
            quality: None,
            reasoning: None,
            kind: StateKind::Ordinary,
        };
        state.check()?;
        Ok(state)
    }

    /// Sets the progress towards the canonical goal, in `0.0..=1.0`.
    #[must_use]
    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Sets the outcome quality score. Only meaningful on terminal states.
    #[must_use]
    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Sets the free-text reasoning explaining the outcome.
    #[must_use]
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Sets the outcome classification.
    #[must_use]
    pub fn with_kind(mut self, kind: StateKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns the state id.
    #[must_use]
    pub fn id(&self) -> &StateId {
        &self.id
    }

    /// Returns the natural-language description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the progress annotation, if any.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.progress
    }

    /// Returns the quality score, if any.
    #[must_use]
    pub fn quality(&self) -> Option<f64> {
        self.quality
    }

    /// Returns the outcome reasoning, if any.
    #[must_use]
    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    /// Returns the outcome classification.
    #[must_use]
    pub fn kind(&self) -> StateKind {
        self.kind
    }

    /// Checks the construction-time rules.
    ///
    /// Run again on insertion because the `with_*` setters cannot fail.
    pub(crate) fn check(&self) -> Result<(), GraphError> {
        let invalid = |reason| GraphError::Validation {
            entity: EntityKind::State,
            id: self.id.to_string(),
            reason,
        };

        if self.id.as_str().trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(invalid("description must not be empty"));
        }
        if let Some(progress) = self.progress
            && !(0.0..=1.0).contains(&progress)
        {
            return Err(invalid("progress must lie within 0.0..=1.0"));
        }
        if let Some(quality) = self.quality
            && !quality.is_finite()
        {
            return Err(invalid("quality must be a finite number"));
        }
        Ok(())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.description)
    }
}
