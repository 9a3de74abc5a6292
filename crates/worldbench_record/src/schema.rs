//! The portable world record schema.
//!
//! Records are plain nested data: strings, numbers and sequences. Entities
//! reference each other by id string, never by embedding, so a record has no
//! cycles even when the world it describes does.
//!
//! ```json
//! {
//!   "name": "ikea_desk",
//!   "states": [{ "id": "s0", "description": "Unopened box", "progress": 0.0, "kind": "ordinary" }],
//!   "actions": [{ "id": "a0", "description": "Open the box" }],
//!   "transitions": [{ "start_id": "s0", "action_id": "a0", "end_id": "s1" }],
//!   "initial_state_id": "s0",
//!   "goal_state_ids": ["s6"],
//!   "final_state_ids": []
//! }
//! ```

use serde::{Deserialize, Serialize};
use worldbench_graph::state::StateKind;

/// A complete world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldRecord {
    /// World name.
    pub name: String,
    /// Scenario description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// States in insertion order.
    pub states: Vec<StateRecord>,
    /// Actions in insertion order.
    pub actions: Vec<ActionRecord>,
    /// Transitions in insertion order.
    pub transitions: Vec<TransitionRecord>,
    /// Id of the initial state.
    pub initial_state_id: String,
    /// Ids of the goal states.
    #[serde(default)]
    pub goal_state_ids: Vec<String>,
    /// Ids of the final (terminal, not necessarily goal) states.
    #[serde(default)]
    pub final_state_ids: Vec<String>,
}

/// One state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    /// State id.
    pub id: String,
    /// Natural-language description.
    pub description: String,
    /// Progress towards the canonical goal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    /// Outcome quality score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    /// Outcome reasoning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Outcome classification.
    #[serde(default)]
    pub kind: KindRecord,
}

/// Serialized [`StateKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindRecord {
    /// Intermediate state.
    #[default]
    Ordinary,
    /// Successful ending.
    Goal,
    /// Failed ending.
    Failure,
}

impl From<StateKind> for KindRecord {
    fn from(kind: StateKind) -> Self {
        match kind {
            StateKind::Ordinary => KindRecord::Ordinary,
            StateKind::Goal => KindRecord::Goal,
            StateKind::Failure => KindRecord::Failure,
        }
    }
}

impl From<KindRecord> for StateKind {
    fn from(kind: KindRecord) -> Self {
        match kind {
            KindRecord::Ordinary => StateKind::Ordinary,
            KindRecord::Goal => StateKind::Goal,
            KindRecord::Failure => StateKind::Failure,
        }
    }
}

/// One action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Action id.
    pub id: String,
    /// Natural-language description.
    pub description: String,
    /// Action category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
}

/// One transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Start state id.
    pub start_id: String,
    /// Action id.
    pub action_id: String,
    /// End state id.
    pub end_id: String,
    /// Why the action leads to the end state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}
