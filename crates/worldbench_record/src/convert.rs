//! Conversion between [`WorldGraph`] and [`WorldRecord`].
//!
//! [`from_record`] rebuilds the world through the regular `add_*` API, so a
//! malformed record fails with exactly the [`GraphError`] that direct
//! construction would have raised.

use serde_json::Value;
use worldbench_graph::prelude::*;

use crate::error::RecordError;
use crate::schema::{ActionRecord, StateRecord, TransitionRecord, WorldRecord};

/// Converts a world into its portable record.
#[must_use]
pub fn to_record(world: &WorldGraph) -> WorldRecord {
    WorldRecord {
        name: world.name().to_owned(),
        description: world.description().map(str::to_owned),
        states: world.states().map(state_record).collect(),
        actions: world
            .actions()
            .map(|action| ActionRecord {
                id: action.id().to_string(),
                description: action.description().to_owned(),
                action_type: action.action_type().map(str::to_owned),
            })
            .collect(),
        transitions: world
            .transitions()
            .iter()
            .map(|transition| TransitionRecord {
                start_id: transition.start().to_string(),
                action_id: transition.action().to_string(),
                end_id: transition.end().to_string(),
                rationale: transition.rationale().map(str::to_owned),
            })
            .collect(),
        initial_state_id: world.initial_state_id().to_string(),
        goal_state_ids: world.goal_state_ids().map(ToString::to_string).collect(),
        final_state_ids: world.final_state_ids().map(ToString::to_string).collect(),
    }
}

/// Rebuilds a world from its portable record.
///
/// # Errors
///
/// - [`GraphError::DanglingReference`] if the initial, a goal, a final or a
///   transition endpoint id is unknown
/// - [`GraphError::DuplicateId`] if an id appears twice
/// - [`GraphError::Validation`] if an entity breaks a construction rule
/// - [`GraphError::NonDeterministicTransition`] if two transitions share a
///   `(start, action)` pair
///
/// All are wrapped in [`RecordError::Graph`].
pub fn from_record(record: &WorldRecord) -> Result<WorldGraph, RecordError> {
    let Some(initial) = record
        .states
        .iter()
        .position(|s| s.id == record.initial_state_id)
    else {
        return Err(GraphError::DanglingReference {
            entity: EntityKind::State,
            id: record.initial_state_id.clone(),
            referrer: "initial_state_id".to_owned(),
        }
        .into());
    };

    let mut world = WorldGraph::new(&record.name, state_from(&record.states[initial])?)?;
    world.set_description(record.description.clone());

    for (i, state) in record.states.iter().enumerate() {
        if i != initial {
            world.add_state(state_from(state)?)?;
        }
    }
    for action in &record.actions {
        let mut built = Action::new(action.id.as_str(), action.description.as_str())?;
        if let Some(action_type) = &action.action_type {
            built = built.with_action_type(action_type.as_str());
        }
        world.add_action(built)?;
    }
    for transition in &record.transitions {
        let mut built = Transition::new(
            transition.start_id.as_str(),
            transition.action_id.as_str(),
            transition.end_id.as_str(),
        );
        if let Some(rationale) = &transition.rationale {
            built = built.with_rationale(rationale.as_str());
        }
        world.add_transition(built)?;
    }
    // Kind-designated states were marked on insertion; re-marking moves the
    // listed ids behind them in record order.
    for id in &record.goal_state_ids {
        world.unmark_goal(id);
        world.mark_goal(id)?;
    }
    for id in &record.final_state_ids {
        world.unmark_final(id);
        world.mark_final(id)?;
    }

    tracing::debug!(
        world = %record.name,
        states = world.state_count(),
        transitions = world.transition_count(),
        "loaded world record"
    );
    Ok(world)
}

/// Converts a world into an untyped JSON value.
///
/// # Errors
///
/// Returns [`RecordError::Serialization`] if a number cannot be represented
/// in JSON.
pub fn to_value(world: &WorldGraph) -> Result<Value, RecordError> {
    Ok(serde_json::to_value(to_record(world))?)
}

/// Rebuilds a world from an untyped JSON value.
///
/// # Errors
///
/// Returns [`RecordError::Serialization`] if the value does not match the
/// record schema, or [`RecordError::Graph`] as [`from_record`] does.
pub fn from_value(value: Value) -> Result<WorldGraph, RecordError> {
    let record: WorldRecord = serde_json::from_value(value)?;
    from_record(&record)
}

/// Serializes a world to pretty-printed JSON.
///
/// # Errors
///
/// Returns [`RecordError::Serialization`] if serialization fails.
pub fn to_json(world: &WorldGraph) -> Result<String, RecordError> {
    Ok(serde_json::to_string_pretty(&to_record(world))?)
}

/// Parses a world from JSON text.
///
/// # Errors
///
/// Returns [`RecordError::Serialization`] for malformed JSON, or
/// [`RecordError::Graph`] as [`from_record`] does.
pub fn from_json(json: &str) -> Result<WorldGraph, RecordError> {
    let record: WorldRecord = serde_json::from_str(json)?;
    from_record(&record)
}

impl From<&WorldGraph> for WorldRecord {
    fn from(world: &WorldGraph) -> Self {
        to_record(world)
    }
}

impl TryFrom<&WorldRecord> for WorldGraph {
    type Error = RecordError;

    fn try_from(record: &WorldRecord) -> Result<Self, Self::Error> {
        from_record(record)
    }
}

fn state_record(state: &State) -> StateRecord {
    StateRecord {
        id: state.id().to_string(),
        description: state.description().to_owned(),
        progress: state.progress(),
        quality: state.quality(),
        reasoning: state.reasoning().map(str::to_owned),
        kind: state.kind().into(),
    }
}

fn state_from(record: &StateRecord) -> Result<State, GraphError> {
    let mut state =
        State::new(record.id.as_str(), record.description.as_str())?.with_kind(record.kind.into());
    if let Some(progress) = record.progress {
        state = state.with_progress(progress);
    }
    if let Some(quality) = record.quality {
        state = state.with_quality(quality);
    }
    if let Some(reasoning) = &record.reasoning {
        state = state.with_reasoning(reasoning.as_str());
    }
    Ok(state)
}
