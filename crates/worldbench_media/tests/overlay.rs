//! Integration tests for overlay graphs: memoization, source checks,
//! topology reuse and records.


use test_utils::*;
use worldbench_graph::prelude::*;
use worldbench_media::{
    ImageWorld, MediaError, MediaGenerationError, MediaRequest, MediaToken, OverlayRecord,
    VideoWorld, WalkStrategy, walk_and_materialize,
};

// ─────────────────────────────────────────────────────────────────────────────
// Memoized materialization
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn materialize_state_calls_the_generator_once() {
    let world = linear_world(3);
    let mut images = ImageWorld::for_world(&world);
    let mut generator = ScriptedGenerator::default();
    let basis = MediaToken::from("reference.png");

    let first = images
        .materialize_state(&world, "s1", Some(&basis), &mut generator)
        .unwrap();
    let again = images
        .materialize_state(&world, "s1", None, &mut generator)
        .unwrap();

    assert_eq!(first, again);
    assert_eq!(generator.calls.len(), 1);
    assert_eq!(generator.calls[0].basis.as_deref(), Some("reference.png"));
    let state = images.state("s1").unwrap();
    assert_eq!(state.basis_token(), Some(&basis));
    assert_eq!(state.description(), "state s1");
    assert!(state.parent_state_id().is_none());
}

#[test]
fn closures_are_generators() {
    let world = linear_world(2);
    let mut images = ImageWorld::for_world(&world);
    let mut seen = Vec::new();
    let mut generator = |request: &MediaRequest<'_>| {
        seen.push(request.description.to_owned());
        Ok::<_, MediaGenerationError>(MediaToken::from("still.png"))
    };

    images
        .materialize_state(&world, "s0", None, &mut generator)
        .unwrap();
    assert_eq!(seen, ["state s0"]);
}

#[test]
fn transitions_appear_once_both_endpoints_have_media() {
    let world = linear_world(3);
    let mut images = ImageWorld::for_world(&world);
    let mut generator = ScriptedGenerator::default();

    images.materialize_state(&world, "s0", None, &mut generator).unwrap();
    images.materialize_state(&world, "s2", None, &mut generator).unwrap();
    assert_eq!(images.transition_count(), 0);

    images.materialize_state(&world, "s1", None, &mut generator).unwrap();
    let transitions: Vec<_> = images.transitions().map(ToString::to_string).collect();
    assert_eq!(transitions, ["s0 --a0--> s1", "s1 --a1--> s2"]);
    assert_eq!(
        images.transition("s1", "a1").unwrap().action_description(),
        "action a1"
    );
}

#[test]
fn failed_generation_records_nothing() {
    let world = linear_world(2);
    let mut images = ImageWorld::for_world(&world);
    let mut generator = ScriptedGenerator::failing_on([1]);

    let err = images
        .materialize_state(&world, "s0", None, &mut generator)
        .unwrap_err();
    let MediaError::Generation { subject, source } = err else {
        panic!("expected a generation error, got {err}");
    };
    assert_eq!(subject, "s0");
    assert_eq!(source.message(), "quota exceeded at call 1");
    assert!(!images.is_materialized("s0"));

    images.materialize_state(&world, "s0", None, &mut generator).unwrap();
    assert!(images.is_materialized("s0"));
}

#[test]
fn unknown_state_is_a_dangling_reference() {
    let world = linear_world(2);
    let mut images = ImageWorld::for_world(&world);
    let err = images
        .materialize_state(&world, "nowhere", None, &mut ScriptedGenerator::default())
        .unwrap_err();
    assert!(matches!(
        err,
        MediaError::Graph(GraphError::DanglingReference { ref id, .. }) if id == "nowhere"
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Source checks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn overlays_refuse_other_worlds() {
    let world = linear_world(2);
    let other = branching_world();
    let mut images = ImageWorld::for_world(&world);

    let err = images
        .materialize_state(&other, "s0", None, &mut ScriptedGenerator::default())
        .unwrap_err();
    assert!(matches!(
        err,
        MediaError::SourceMismatch { ref expected, ref actual, .. }
            if expected == "linear" && actual == "branching"
    ));
}

#[test]
fn check_against_detects_drift() {
    let world = linear_world(3);
    let mut images = ImageWorld::for_world(&world);
    walk_and_materialize(
        &world,
        &mut images,
        WalkStrategy::CanonicalPath,
        &mut ScriptedGenerator::default(),
    )
    .unwrap();
    images.check_against(&world).unwrap();

    // Same name, but the world was re-authored without s2.
    let shorter = linear_world(2);
    let err = images.check_against(&shorter).unwrap_err();
    assert!(matches!(
        err,
        MediaError::Graph(GraphError::DanglingReference { ref id, .. }) if id == "s2"
    ));
}

#[test]
fn check_against_detects_rewired_transitions() {
    let world = linear_world(3);
    let mut images = ImageWorld::for_world(&world);
    walk_and_materialize(
        &world,
        &mut images,
        WalkStrategy::FullWorld,
        &mut ScriptedGenerator::default(),
    )
    .unwrap();

    // Same states, but `a0` now skips straight to s2.
    let mut rewired = WorldGraph::new("linear", State::new("s0", "state s0").unwrap()).unwrap();
    rewired
        .add_state(State::new("s1", "state s1").unwrap())
        .unwrap()
        .add_goal_state(State::new("s2", "state s2").unwrap())
        .unwrap()
        .add_action(Action::new("a0", "action a0").unwrap())
        .unwrap()
        .add_action(Action::new("a1", "action a1").unwrap())
        .unwrap()
        .add_transition(Transition::new("s0", "a0", "s2"))
        .unwrap()
        .add_transition(Transition::new("s1", "a1", "s2"))
        .unwrap();

    let err = images.check_against(&rewired).unwrap_err();
    assert!(matches!(
        err,
        MediaError::Graph(GraphError::NoSuchTransition { ref state, ref action })
            if state.as_str() == "s0" && action.as_str() == "a0"
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Topology reuse
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn topology_reuses_world_queries() {
    let world = branching_world();
    let mut images = ImageWorld::for_world(&world);
    walk_and_materialize(
        &world,
        &mut images,
        WalkStrategy::CanonicalPath,
        &mut ScriptedGenerator::default(),
    )
    .unwrap();

    let topology = images.topology(&world).unwrap();
    assert_eq!(topology.name(), "branching");
    assert_eq!(topology.state_count(), 4);
    assert_eq!(ids(topology.branch_points()), ["s2"]);
    assert_eq!(topology.all_paths().count(), 2);
    assert!(topology.is_goal("s3"));
    assert!(topology.validate().is_ok());
}

#[test]
fn topology_needs_the_initial_state() {
    let world = linear_world(3);
    let mut images = ImageWorld::for_world(&world);
    images
        .materialize_state(&world, "s2", None, &mut ScriptedGenerator::default())
        .unwrap();
    let err = images.topology(&world).unwrap_err();
    assert!(matches!(err, MediaError::NotMaterialized { ref state } if state == "s0"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

fn materialized_video() -> VideoWorld {
    let world = branching_world();
    let mut images = ImageWorld::for_world(&world);
    let mut generator = ScriptedGenerator::default();
    walk_and_materialize(&world, &mut images, WalkStrategy::FullWorld, &mut generator).unwrap();
    let mut video = VideoWorld::from_image_world(&images);
    video.materialize_transitions(WalkStrategy::CanonicalPath, &mut generator);
    video
}

#[test]
fn overlay_json_round_trip() {
    let video = materialized_video();
    let json = video.to_json().unwrap();
    assert_eq!(VideoWorld::from_json(&json).unwrap(), video);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["kind"], "video");
    assert_eq!(value["source_world_name"], "branching");
    assert_eq!(value["states"][1]["parent_state_id"], "s0");
    assert_eq!(value["states"][1]["media_token"], "media/s1");
    assert!(value["states"][0].get("parent_state_id").is_none());
}

#[test]
fn record_kind_must_match() {
    let record = materialized_video().to_record();
    let err = ImageWorld::from_record(&record).unwrap_err();
    assert!(matches!(
        err,
        MediaError::KindMismatch { expected: "image", ref found } if found == "video"
    ));
}

#[test]
fn malformed_records_are_rejected() {
    let mut record: OverlayRecord = materialized_video().to_record();
    record.transitions[0].end_id = "ghost".to_owned();
    assert!(matches!(
        VideoWorld::from_record(&record),
        Err(MediaError::Graph(GraphError::DanglingReference { ref id, .. })) if id == "ghost"
    ));

    let mut record = materialized_video().to_record();
    record.states[2].parent_state_id = Some("ghost".to_owned());
    assert!(matches!(
        VideoWorld::from_record(&record),
        Err(MediaError::Graph(GraphError::DanglingReference { .. }))
    ));

    let mut record = materialized_video().to_record();
    let copy = record.states[0].clone();
    record.states.push(copy);
    assert!(matches!(
        VideoWorld::from_record(&record),
        Err(MediaError::Graph(GraphError::DuplicateId { entity: EntityKind::State, .. }))
    ));
}
