//! Error types for media overlays.

use worldbench_graph::GraphError;

/// Failure reported by a [`MediaGenerator`](crate::generator::MediaGenerator).
///
/// Surfaced unchanged; the overlay never interprets the cause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("media generation failed: {message}")]
pub struct MediaGenerationError {
    message: String,
}

impl MediaGenerationError {
    /// Creates a generation error.
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

/// Errors raised by overlay graphs.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// A source-world lookup failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The generator failed on a direct request.
    #[error("cannot materialize '{subject}': {source}")]
    Generation {
        /// The state or transition that was being materialized.
        subject: String,
        /// The collaborator's failure.
        source: MediaGenerationError,
    },

    /// The overlay was built for a different source world.
    #[error("overlay '{overlay}' belongs to world '{expected}', not '{actual}'")]
    SourceMismatch {
        /// The overlay name.
        overlay: String,
        /// The overlay's recorded source world.
        expected: String,
        /// The world it was used with.
        actual: String,
    },

    /// An operation needs a state that has no media yet.
    #[error("state '{state}' has not been materialized")]
    NotMaterialized {
        /// The missing state.
        state: String,
    },

    /// An overlay record was stored for a different overlay kind.
    #[error("record holds a {found} overlay, expected {expected}")]
    KindMismatch {
        /// The kind the caller asked for.
        expected: &'static str,
        /// The kind found in the record.
        found: String,
    },

    /// Overlay record (de)serialization failed.
    #[error("overlay serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
