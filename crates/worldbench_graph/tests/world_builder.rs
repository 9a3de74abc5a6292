//! Tests for `WorldGraph` construction invariants.
//!
//! These tests verify that the `add_*` methods reject:
//! - duplicate ids
//! - dangling references
//! - non-deterministic `(start, action)` pairs

mod test_utils;

use test_utils::{action, diamond_world, linear_world, state};
use worldbench_graph::prelude::*;

// ─────────────────────────────────────────────────────────────────────────────
// Duplicate ids
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn duplicate_state_is_rejected() {
    let mut world = linear_world(3);
    let err = world.add_state(state("s1")).unwrap_err();
    assert_eq!(
        err,
        GraphError::DuplicateId {
            entity: EntityKind::State,
            id: "s1".into()
        }
    );
    assert_eq!(world.state_count(), 3);
}

#[test]
fn duplicate_initial_state_is_rejected() {
    let mut world = linear_world(2);
    assert!(world.add_goal_state(state("s0")).is_err());
    assert!(!world.is_goal("s0"));
}

#[test]
fn duplicate_action_is_rejected() {
    let mut world = linear_world(3);
    let err = world.add_action(action("a0")).unwrap_err();
    assert!(matches!(
        err,
        GraphError::DuplicateId {
            entity: EntityKind::Action,
            ..
        }
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Dangling references
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn transition_to_unknown_state_is_dangling() {
    let mut world = linear_world(2);
    let err = world
        .add_transition(Transition::new("s1", "a0", "s_missing"))
        .unwrap_err();
    match err {
        GraphError::DanglingReference {
            entity,
            id,
            referrer,
        } => {
            assert_eq!(entity, EntityKind::State);
            assert_eq!(id, "s_missing");
            assert!(referrer.contains("s1 --a0--> s_missing"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(world.transition_count(), 1);
}

#[test]
fn transition_with_unknown_action_is_dangling() {
    let mut world = linear_world(2);
    let err = world
        .add_transition(Transition::new("s1", "teleport", "s0"))
        .unwrap_err();
    assert!(matches!(
        err,
        GraphError::DanglingReference {
            entity: EntityKind::Action,
            ..
        }
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Determinism of action application
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn second_end_for_same_start_and_action_is_rejected() {
    let mut world = linear_world(3);
    world.add_state(state("s1b")).unwrap();

    let err = world
        .add_transition(Transition::new("s0", "a0", "s1b"))
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::NonDeterministicTransition {
            start: StateId::from("s0"),
            action: ActionId::from("a0"),
            existing_end: StateId::from("s1"),
            end: StateId::from("s1b"),
        }
    );
    assert_eq!(world.apply_action("s0", "a0").unwrap().id().as_str(), "s1");
}

#[test]
fn same_action_may_label_edges_from_different_states() {
    let world = diamond_world();
    assert_eq!(world.apply_action("s1a", "walk").unwrap().id().as_str(), "s2");
    assert_eq!(world.apply_action("s1b", "walk").unwrap().id().as_str(), "s2");
}

// ─────────────────────────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn apply_unavailable_action_fails() {
    let world = linear_world(3);
    let err = world.apply_action("s2", "a0").unwrap_err();
    assert_eq!(
        err,
        GraphError::NoSuchTransition {
            state: StateId::from("s2"),
            action: ActionId::from("a0"),
        }
    );
}

#[test]
fn available_actions_of_terminal_state_is_empty() {
    let world = diamond_world();
    let ids: Vec<_> = world
        .available_actions("s0")
        .unwrap()
        .iter()
        .map(|a| a.id().as_str())
        .collect();
    assert_eq!(ids, ["left", "right"]);
    assert!(world.available_actions("s2").unwrap().is_empty());
    assert!(world.available_actions("nope").is_err());
}

#[test]
fn goal_and_failure_kinds_designate_endings() {
    let mut world = linear_world(2);
    world
        .add_state(state("crash").with_kind(StateKind::Failure).with_quality(1.0))
        .unwrap();
    assert!(world.is_final("crash"));
    assert!(!world.is_goal("crash"));
    let finals: Vec<_> = world.final_state_ids().map(StateId::as_str).collect();
    assert_eq!(finals, ["crash"]);
}

#[test]
fn description_is_optional() {
    let world = linear_world(2).with_description("Assemble flat-pack furniture");
    assert_eq!(world.description(), Some("Assemble flat-pack furniture"));
    assert_eq!(linear_world(2).description(), None);
}

#[test]
fn invalid_state_metadata_is_rejected_on_insert() {
    let mut world = linear_world(2);
    let err = world
        .add_state(state("s9").with_progress(-0.25))
        .unwrap_err();
    assert!(matches!(err, GraphError::Validation { .. }));
    assert!(err.to_string().contains("s9"));
}
