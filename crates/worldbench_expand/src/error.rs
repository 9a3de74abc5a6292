//! Error types for world expansion.

use worldbench_graph::GraphError;

/// Failure reported by a [`BranchSynthesizer`](crate::synth::BranchSynthesizer).
///
/// The expander never interprets the message; it only aborts the expansion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("content synthesis failed: {message}")]
pub struct SynthesisError {
    message: String,
}

impl SynthesisError {
    /// Creates a synthesis error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the collaborator's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised when a world cannot be expanded as requested.
#[derive(Debug, thiserror::Error)]
pub enum ExpansionError {
    /// The source world is not a single path.
    #[error("world is not linear at state '{state}': {reason}")]
    NotLinear {
        /// Where linearity breaks.
        state: String,
        /// What breaks it.
        reason: &'static str,
    },

    /// The single path of the source world does not end in a goal.
    #[error("linear path ends in state '{state}', which is not a goal")]
    NoCanonicalGoal {
        /// The last state of the path.
        state: String,
    },

    /// More branch points were requested than non-terminal canonical states exist.
    #[error("requested {requested} branch points but the canonical path has only {available} non-terminal states")]
    TooManyBranchPoints {
        /// Requested branch points.
        requested: usize,
        /// Non-terminal states on the canonical path.
        available: usize,
    },

    /// The ending counts cannot be satisfied.
    #[error("cannot create {endings} endings with {successes} successes: {reason}")]
    EndingCount {
        /// Requested total endings.
        endings: usize,
        /// Requested successful endings.
        successes: usize,
        /// Why the split is impossible.
        reason: &'static str,
    },

    /// The target state count is below what the expansion must create.
    #[error("cannot expand to {target} states: the requested endings need at least {minimum}")]
    TooFewStates {
        /// Requested state count.
        target: usize,
        /// Minimum reachable state count.
        minimum: usize,
    },

    /// Extra states were requested but there is no branch to hold them.
    #[error("cannot place {extra} extra state(s) without branch points")]
    NoRoomForStates {
        /// States that could not be placed.
        extra: usize,
    },

    /// The canonical path did not survive expansion.
    #[error("canonical path of '{world}' is missing after expansion")]
    CanonicalPathLost {
        /// The expanded world.
        world: String,
    },

    /// The content collaborator failed.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// Building the expanded world broke a graph invariant.
    #[error(transparent)]
    Graph(#[from] GraphError),
}
