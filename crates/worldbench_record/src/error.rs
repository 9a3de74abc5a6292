//! Error type for record conversion and persistence.

use worldbench_graph::GraphError;

/// Errors raised while converting or storing world records.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The record describes a structurally invalid world.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No record is stored under the key.
    #[error("no record stored under key '{0}'")]
    NotFound(String),
}

impl RecordError {
    /// Returns the graph error, if this failure came from graph construction.
    #[must_use]
    pub fn as_graph_error(&self) -> Option<&GraphError> {
        match self {
            RecordError::Graph(err) => Some(err),
            _ => None,
        }
    }
}
