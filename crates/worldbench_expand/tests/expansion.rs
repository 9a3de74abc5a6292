//! Integration tests for linear-to-branching expansion.


use test_utils::*;
use worldbench_expand::{
    ExpansionConfig, ExpansionError, TemplateSynthesizer, expand, is_linear, linear_path,
};
use worldbench_graph::prelude::*;

fn ids(ids: Vec<&StateId>) -> Vec<&str> {
    ids.into_iter().map(StateId::as_str).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Shape of the result
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn default_expansion_hits_every_target() {
    let desk = desk_world();
    let config = ExpansionConfig::default();
    let branching = expand(&desk, &config, &mut TemplateSynthesizer).unwrap();

    assert_eq!(branching.state_count(), 20);
    assert_eq!(branching.terminal_states().len(), 5);
    assert_eq!(branching.goal_state_ids().len(), 3);
    assert_eq!(branching.final_state_ids().len(), 2);
    // Six canonical transitions plus one per deviation step and one per alternative action.
    assert_eq!(branching.transition_count(), 19);
    assert_eq!(branching.action_count(), 19);
}

#[test]
fn branch_points_are_spread_over_the_canonical_path() {
    let branching =
        expand(&desk_world(), &ExpansionConfig::default(), &mut TemplateSynthesizer).unwrap();

    assert_eq!(ids(branching.branch_points()), ["s1", "s3", "s5"]);
    // Four deviations over three branch points: s1 gets a second one.
    assert_eq!(branching.out_degree("s1"), 3);
    assert_eq!(branching.out_degree("s3"), 2);
    assert_eq!(branching.out_degree("s5"), 2);
}

#[test]
fn endings_get_counter_ids_and_kinds() {
    let branching =
        expand(&desk_world(), &ExpansionConfig::default(), &mut TemplateSynthesizer).unwrap();

    assert_eq!(
        ids(branching.terminal_states()),
        ["s6", "s_success1", "s_success2", "s_failure1", "s_failure2"]
    );
    let success = branching.state("s_success1").unwrap();
    assert_eq!(success.kind(), StateKind::Goal);
    assert_eq!(success.quality(), Some(7.0));
    let failure = branching.state("s_failure2").unwrap();
    assert_eq!(failure.kind(), StateKind::Failure);
    assert!(branching.is_final("s_failure2"));
    assert!(!branching.is_goal("s_failure2"));
}

#[test]
fn first_deviation_chain_is_wired_in_order() {
    let branching =
        expand(&desk_world(), &ExpansionConfig::default(), &mut TemplateSynthesizer).unwrap();

    let detour: Vec<_> = branching
        .paths("s1", ["s_success1"])
        .unwrap()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(
        detour,
        ["s1 --a_dev1--> s_dev1 --a_dev2--> s_dev2 --a_dev3--> s_dev3 --a_dev4--> s_success1"]
    );
    assert_eq!(
        branching.action("a_dev1").unwrap().action_type(),
        Some("risky")
    );
}

#[test]
fn source_entities_survive_unchanged() {
    let desk = desk_world();
    let branching = expand(&desk, &ExpansionConfig::default(), &mut TemplateSynthesizer).unwrap();

    for state in desk.states() {
        assert_eq!(branching.state(state.id().as_str()), Some(state));
    }
    for action in desk.actions() {
        assert_eq!(branching.action(action.id().as_str()), Some(action));
    }
    assert_eq!(&branching.transitions()[..desk.transition_count()], desk.transitions());
    assert_eq!(branching.initial_state_id(), desk.initial_state_id());
}

#[test]
fn canonical_path_is_the_first_successful_path() {
    let desk = desk_world();
    let branching = expand(&desk, &ExpansionConfig::default(), &mut TemplateSynthesizer).unwrap();

    let first = branching.successful_paths().next().unwrap();
    assert_eq!(first.to_triples(), canonical_triples(&desk));
    assert_eq!(branching.canonical_path().unwrap().to_triples(), canonical_triples(&desk));
}

#[test]
fn expanded_world_is_named_and_described() {
    let branching =
        expand(&desk_world(), &ExpansionConfig::default(), &mut TemplateSynthesizer).unwrap();
    assert_eq!(branching.name(), "ikea_desk_branching");
    assert_eq!(branching.description(), Some("Assemble a flat-pack desk"));

    let custom = ExpansionConfig::default().with_name_suffix("_wide");
    let renamed = expand(&desk_world(), &custom, &mut TemplateSynthesizer).unwrap();
    assert_eq!(renamed.name(), "ikea_desk_wide");
}

#[test]
fn expanded_world_validates_cleanly() {
    let branching =
        expand(&desk_world(), &ExpansionConfig::default(), &mut TemplateSynthesizer).unwrap();
    let report = branching.validate();
    assert!(report.is_clean(), "{report}");
    assert!(!is_linear(&branching));
}

#[test]
fn missing_action_type_falls_back_to_the_deviation() {
    let config = ExpansionConfig::new(10, 3, 3);
    let branching = expand(&desk_world(), &config, &mut PlainSynthesizer).unwrap();

    let types: Vec<_> = branching
        .actions()
        .skip(6)
        .filter_map(Action::action_type)
        .collect();
    assert!(types.iter().all(|t| *t == "risky"), "{types:?}");
    assert!(!types.is_empty());
}

#[test]
fn no_op_expansion_only_renames() {
    let desk = desk_world();
    let branching = expand(&desk, &ExpansionConfig::new(7, 1, 0), &mut TemplateSynthesizer).unwrap();

    let mut expected = desk.clone();
    expected.rename("ikea_desk_branching");
    assert_eq!(branching, expected);
}

#[test]
fn record_round_trip_of_expanded_world() {
    let branching =
        expand(&desk_world(), &ExpansionConfig::default(), &mut TemplateSynthesizer).unwrap();
    let json = worldbench_record::to_json(&branching).unwrap();
    assert_eq!(worldbench_record::from_json(&json).unwrap(), branching);
}

// ─────────────────────────────────────────────────────────────────────────────
// Rejections
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn branching_source_is_rejected() {
    let branching =
        expand(&desk_world(), &ExpansionConfig::default(), &mut TemplateSynthesizer).unwrap();
    let err = expand(&branching, &ExpansionConfig::default(), &mut TemplateSynthesizer).unwrap_err();
    assert!(matches!(err, ExpansionError::NotLinear { ref state, .. } if state == "s1"));
}

#[test]
fn stray_state_breaks_linearity() {
    let mut world = linear_world(3);
    world.add_state(State::new("orphan", "never visited").unwrap()).unwrap();
    let err = linear_path(&world).unwrap_err();
    assert!(matches!(err, ExpansionError::NotLinear { ref state, .. } if state == "orphan"));
}

#[test]
fn cycle_breaks_linearity() {
    let mut world = linear_world(3);
    world
        .add_action(Action::new("back", "start over").unwrap())
        .unwrap()
        .add_transition(Transition::new("s2", "back", "s0"))
        .unwrap();
    let err = linear_path(&world).unwrap_err();
    assert!(matches!(err, ExpansionError::NotLinear { ref state, .. } if state == "s0"));
}

#[test]
fn path_must_end_in_a_goal() {
    let mut world = WorldGraph::new("w", State::new("s0", "start").unwrap()).unwrap();
    world
        .add_state(State::new("s1", "stuck").unwrap())
        .unwrap()
        .add_action(Action::new("a0", "go").unwrap())
        .unwrap()
        .add_transition(Transition::new("s0", "a0", "s1"))
        .unwrap();

    let err = expand(&world, &ExpansionConfig::new(4, 2, 1), &mut TemplateSynthesizer).unwrap_err();
    assert!(matches!(err, ExpansionError::NoCanonicalGoal { ref state } if state == "s1"));
}

#[test]
fn impossible_targets_are_rejected() {
    let desk = desk_world();
    let cases = [
        ExpansionConfig::new(20, 5, 7),
        ExpansionConfig::new(9, 5, 3),
        ExpansionConfig::new(12, 1, 0),
        ExpansionConfig::new(12, 3, 0),
        ExpansionConfig::new(12, 0, 2),
    ];
    let errors: Vec<_> = cases
        .iter()
        .map(|config| expand(&desk, config, &mut TemplateSynthesizer).unwrap_err())
        .collect();

    assert!(matches!(
        errors[0],
        ExpansionError::TooManyBranchPoints { requested: 7, available: 6 }
    ));
    assert!(matches!(
        errors[1],
        ExpansionError::TooFewStates { target: 9, minimum: 11 }
    ));
    assert!(matches!(errors[2], ExpansionError::NoRoomForStates { extra: 5 }));
    assert!(matches!(errors[3], ExpansionError::EndingCount { endings: 3, .. }));
    assert!(matches!(errors[4], ExpansionError::EndingCount { endings: 0, .. }));
}

#[test]
fn single_state_world_cannot_branch() {
    let world = linear_world(1);
    let unchanged = expand(&world, &ExpansionConfig::new(1, 1, 0), &mut TemplateSynthesizer).unwrap();
    assert_eq!(unchanged.state_count(), 1);

    let err = expand(&world, &ExpansionConfig::new(3, 2, 1), &mut TemplateSynthesizer).unwrap_err();
    assert!(matches!(
        err,
        ExpansionError::TooManyBranchPoints { requested: 1, available: 0 }
    ));
}

#[test]
fn synthesizer_failure_aborts_expansion() {
    for fail_at in [1, 5, 9] {
        let mut synth = FlakySynthesizer::failing_at(fail_at);
        let err = expand(&desk_world(), &ExpansionConfig::default(), &mut synth).unwrap_err();
        let ExpansionError::Synthesis(cause) = err else {
            panic!("expected a synthesis error, got {err}");
        };
        assert_eq!(cause.message(), "model quota exhausted");
        assert_eq!(synth.calls, fail_at);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Property tests
// ─────────────────────────────────────────────────────────────────────────────

mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    /// A linear length and a configuration that can be satisfied for it.
    fn feasible_case() -> impl Strategy<Value = (usize, ExpansionConfig)> {
        (2usize..10)
            .prop_flat_map(|n| (Just(n), 0..n))
            .prop_flat_map(|(n, k)| {
                let max_endings: usize = if k == 0 { 1 } else { 6 };
                (Just(n), Just(k), 1..=max_endings, 0usize..12)
            })
            .prop_map(|(n, k, endings, extra)| {
                let extra = if k == 0 { 0 } else { extra };
                (n, ExpansionConfig::new(n + endings - 1 + extra, endings, k))
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn feasible_configs_produce_exact_shapes((n, config) in feasible_case()) {
            let source = linear_world(n);
            let branching = expand(&source, &config, &mut TemplateSynthesizer).unwrap();

            prop_assert_eq!(branching.state_count(), config.target_state_count());
            prop_assert_eq!(branching.terminal_states().len(), config.target_ending_count());
            prop_assert_eq!(branching.goal_state_ids().len(), config.success_ending_count());
            prop_assert_eq!(branching.branch_points().len(), config.branch_point_count());
            prop_assert!(branching.validate().is_clean());

            let first = branching.successful_paths().next().unwrap();
            prop_assert_eq!(first.to_triples(), canonical_triples(&source));
        }
    }
}
