//! Action types for world graphs.

use core::borrow::Borrow;
use core::fmt;
use std::sync::Arc;

use crate::error::{EntityKind, GraphError};

/// Unique identifier for an action within a world graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(Arc<str>);

impl ActionId {
    /// Creates an action id from any string-like value.
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

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ActionId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for ActionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ActionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// An act that moves the world from one state to another.
///
/// The same action may label transitions out of several states; what it
/// leads to is decided by the `(start, action)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    id: ActionId,
    description: String,
    action_type: Option<String>,
}

impl Action {
    /// Creates an action.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Validation`] if the id or description is empty.
    pub fn new(id: impl Into<ActionId>, description: impl Into<String>) -> Result<Self, GraphError> {
        let action = Self {
            id: id.into(),
            description: description.into(),
            action_type: None,
        };
        action.check()?;
        Ok(action)
    }

    /// Sets the action category (e.g. `"assembly"`, `"risky"`).
    #[must_use]
    pub fn with_action_type(mut self, action_type: impl Into<String>) -> Self {
        self.action_type = Some(action_type.into());
        self
    }

    /// Returns the action id.
    #[must_use]
    pub fn id(&self) -> &ActionId {
        &self.id
    }

    /// Returns the natural-language description of the act.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the action category, if any.
    #[must_use]
    pub fn action_type(&self) -> Option<&str> {
        self.action_type.as_deref()
    }

    pub(crate) fn check(&self) -> Result<(), GraphError> {
        let invalid = |reason| GraphError::Validation {
            entity: EntityKind::Action,
            id: self.id.to_string(),
            reason,
        };
        if self.id.as_str().trim().is_empty() {
            return Err(invalid("id must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(invalid("description must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.description)
    }
}
