//! Portable overlay records.
//!
//! Same conventions as world records: plain data, entities referenced by id
//! string. Overlay records add the source world's name, the overlay kind and,
//! per state and transition, the media token and parent references.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use worldbench_graph::prelude::*;

use crate::error::MediaError;
use crate::overlay::{OverlayGraph, OverlayKind, OverlayState, OverlayTransition};

/// A complete overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayRecord {
    /// Overlay name.
    pub name: String,
    /// Name of the world the overlay belongs to.
    pub source_world_name: String,
    /// `"image"` or `"video"`.
    pub kind: String,
    /// Materialized states in materialization order.
    pub states: Vec<OverlayStateRecord>,
    /// Overlay transitions in source order.
    #[serde(default)]
    pub transitions: Vec<OverlayTransitionRecord>,
}

/// One materialized state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayStateRecord {
    /// Source state id.
    pub id: String,
    /// Source state description.
    pub description: String,
    /// The state's media.
    pub media_token: String,
    /// The state this one was derived from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_state_id: Option<String>,
    /// The action leading from the parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_action_id: Option<String>,
    /// The media used as generation basis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis_token: Option<String>,
}

/// One overlay transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayTransitionRecord {
    /// Start state id.
    pub start_id: String,
    /// Action id.
    pub action_id: String,
    /// End state id.
    pub end_id: String,
    /// Source action description.
    pub action_description: String,
    /// The transition's clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_token: Option<String>,
}

impl<K> OverlayGraph<K>
where
    K: OverlayKind,
{
    /// Converts the overlay to its portable record.
    #[must_use]
    pub fn to_record(&self) -> OverlayRecord {
        OverlayRecord {
            name: self.name().to_owned(),
            source_world_name: self.source_world_name().to_owned(),
            kind: K::KIND.to_owned(),
            states: self
                .states()
                .map(|s| OverlayStateRecord {
                    id: s.state_id.to_string(),
                    description: s.description.clone(),
                    media_token: s.media_token.to_string(),
                    parent_state_id: s.parent_state_id.as_ref().map(ToString::to_string),
                    parent_action_id: s.parent_action_id.as_ref().map(ToString::to_string),
                    basis_token: s.basis_token.as_ref().map(ToString::to_string),
                })
                .collect(),
            transitions: self
                .transitions()
                .map(|t| OverlayTransitionRecord {
                    start_id: t.start.to_string(),
                    action_id: t.action.to_string(),
                    end_id: t.end.to_string(),
                    action_description: t.action_description.clone(),
                    media_token: t.media_token.as_ref().map(ToString::to_string),
                })
                .collect(),
        }
    }

    /// Rebuilds an overlay from its record.
    ///
    /// # Errors
    ///
    /// - [`MediaError::KindMismatch`] if the record holds another overlay kind
    /// - [`MediaError::Graph`] with [`GraphError::DuplicateId`] for repeated
    ///   states or transitions, or [`GraphError::DanglingReference`] for
    ///   parents or transition endpoints that are not in the record
    pub fn from_record(record: &OverlayRecord) -> Result<Self, MediaError> {
        if record.kind != K::KIND {
            return Err(MediaError::KindMismatch {
                expected: K::KIND,
                found: record.kind.clone(),
            });
        }
        let mut overlay = Self::new(record.name.clone(), record.source_world_name.clone());

        let mut states = IndexMap::with_capacity(record.states.len());
        for s in &record.states {
            let id = StateId::from(s.id.as_str());
            if states.contains_key(&id) {
                return Err(duplicate(EntityKind::State, &s.id));
            }
            states.insert(
                id.clone(),
                OverlayState {
                    state_id: id,
                    description: s.description.clone(),
                    media_token: s.media_token.as_str().into(),
                    parent_state_id: s.parent_state_id.as_deref().map(StateId::from),
                    parent_action_id: s.parent_action_id.as_deref().map(ActionId::from),
                    basis_token: s.basis_token.as_deref().map(Into::into),
                },
            );
        }
        for state in states.values() {
            if let Some(parent) = &state.parent_state_id
                && !states.contains_key(parent)
            {
                return Err(GraphError::unknown_state(parent, "parent_state_id").into());
            }
        }

        let mut transitions = IndexMap::with_capacity(record.transitions.len());
        for t in &record.transitions {
            let (start, action, end) = (
                StateId::from(t.start_id.as_str()),
                ActionId::from(t.action_id.as_str()),
                StateId::from(t.end_id.as_str()),
            );
            for endpoint in [&start, &end] {
                if !states.contains_key(endpoint) {
                    return Err(GraphError::unknown_state(endpoint, "transitions").into());
                }
            }
            let key = (start.clone(), action.clone());
            if transitions.contains_key(&key) {
                return Err(duplicate(
                    EntityKind::Transition,
                    &format!("{start} --{action}-->"),
                ));
            }
            transitions.insert(
                key,
                OverlayTransition {
                    start,
                    action,
                    end,
                    action_description: t.action_description.clone(),
                    media_token: t.media_token.as_deref().map(Into::into),
                },
            );
        }

        overlay.states = states;
        overlay.transitions = transitions;
        Ok(overlay)
    }

    /// Serializes the overlay record as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, MediaError> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }

    /// Parses an overlay from JSON.
    ///
    /// # Errors
    ///
    /// - [`MediaError::Serialization`] if the JSON does not match the schema
    /// - any error of [`from_record`](Self::from_record)
    pub fn from_json(json: &str) -> Result<Self, MediaError> {
        let record: OverlayRecord = serde_json::from_str(json)?;
        Self::from_record(&record)
    }
}

fn duplicate(entity: EntityKind, id: &str) -> MediaError {
    GraphError::DuplicateId {
        entity,
        id: id.to_owned(),
    }
    .into()
}
