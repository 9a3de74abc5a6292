//! Structural errors raised by the world graph.
//!
//! Every variant names the offending id(s) and the invariant that was
//! violated, so authored or generated worlds can be diagnosed quickly.

use core::fmt;

use crate::action::ActionId;
use crate::state::StateId;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A [`State`](crate::state::State).
    State,
    /// An [`Action`](crate::action::Action).
    Action,
    /// A [`Transition`](crate::transition::Transition).
    Transition,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::State => write!(f, "state"),
            EntityKind::Action => write!(f, "action"),
            EntityKind::Transition => write!(f, "transition"),
        }
    }
}

/// Errors raised while constructing or querying a [`WorldGraph`](crate::graph::WorldGraph).
///
/// Structural errors (duplicate, dangling, non-deterministic) indicate an
/// authoring bug and are never recovered from inside the graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An entity failed construction-time validation.
    #[error("invalid {entity} '{id}': {reason}")]
    Validation {
        /// The kind of entity.
        entity: EntityKind,
        /// The entity id (may be empty when the id itself is the problem).
        id: String,
        /// Which rule was broken.
        reason: &'static str,
    },

    /// An id collided with an entity already in the graph.
    #[error("duplicate {entity} id '{id}': ids must be unique within a world")]
    DuplicateId {
        /// The kind of entity.
        entity: EntityKind,
        /// The colliding id.
        id: String,
    },

    /// A reference points at an id the graph does not contain.
    #[error("{referrer} references unknown {entity} '{id}'")]
    DanglingReference {
        /// The kind of entity that was referenced.
        entity: EntityKind,
        /// The missing id.
        id: String,
        /// What held the reference (a transition, the goal set, a query...).
        referrer: String,
    },

    /// A second outgoing edge was added for an existing `(start, action)` pair.
    #[error(
        "state '{start}' already leads to '{existing_end}' via action '{action}'; \
         a second transition to '{end}' would make the action non-deterministic"
    )]
    NonDeterministicTransition {
        /// The start state.
        start: StateId,
        /// The action label.
        action: ActionId,
        /// The end state of the transition already present.
        existing_end: StateId,
        /// The end state of the rejected transition.
        end: StateId,
    },

    /// `apply_action` was called with an action not available from the state.
    #[error("no transition from state '{state}' via action '{action}'")]
    NoSuchTransition {
        /// The state the action was applied to.
        state: StateId,
        /// The requested action.
        action: ActionId,
    },
}

impl GraphError {
    /// Shorthand for a dangling state reference.
    #[must_use]
    pub fn unknown_state(id: &StateId, referrer: impl Into<String>) -> Self {
        GraphError::DanglingReference {
            entity: EntityKind::State,
            id: id.to_string(),
            referrer: referrer.into(),
        }
    }

    /// Shorthand for a dangling action reference.
    #[must_use]
    pub fn unknown_action(id: &ActionId, referrer: impl Into<String>) -> Self {
        GraphError::DanglingReference {
            entity: EntityKind::Action,
            id: id.to_string(),
            referrer: referrer.into(),
        }
    }

    /// Returns true for errors that signal a corrupt graph structure.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            GraphError::DuplicateId { .. }
                | GraphError::DanglingReference { .. }
                | GraphError::NonDeterministicTransition { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_ids() {
        let err = GraphError::NonDeterministicTransition {
            start: StateId::from("s0"),
            action: ActionId::from("a0"),
            existing_end: StateId::from("s1"),
            end: StateId::from("s1b"),
        };
        let msg = err.to_string();
        assert!(msg.contains("'s0'"));
        assert!(msg.contains("'a0'"));
        assert!(msg.contains("'s1'"));
        assert!(msg.contains("'s1b'"));
        assert!(err.is_structural());
    }

    #[test]
    fn no_such_transition_is_not_structural() {
        let err = GraphError::NoSuchTransition {
            state: StateId::from("s2"),
            action: ActionId::from("a9"),
        };
        assert!(!err.is_structural());
        assert_eq!(err.to_string(), "no transition from state 's2' via action 'a9'");
    }
}
