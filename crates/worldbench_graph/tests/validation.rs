//! Tests for `WorldGraph::validate()`.
//!
//! These tests verify that soft validation:
//! - accepts well-formed worlds without findings
//! - reports unreachable states first
//! - collects every finding instead of stopping at the first
//! - formats diagnostics with the offending ids

mod test_utils;

use test_utils::{cyclic_world, diamond_world, link, linear_world, state};
use worldbench_graph::prelude::*;

#[test]
fn well_formed_worlds_are_clean() {
    assert!(linear_world(4).validate().is_clean());
    assert!(diamond_world().validate().is_clean());
    assert!(cyclic_world().validate().is_clean());
}

#[test]
fn unreachable_states_are_reported_first() {
    let mut world = linear_world(3);
    world
        .add_state(state("stray"))
        .unwrap()
        .add_state(state("dangling_end"))
        .unwrap();
    link(&mut world, "s1", "slip", "dangling_end");

    let report = world.validate();
    assert!(report.is_ok(), "warnings only: {report}");
    let diagnostics = report.diagnostics();
    assert_eq!(
        diagnostics[0],
        Diagnostic::UnreachableState {
            state: StateId::from("stray")
        }
    );
    assert!(diagnostics.contains(&Diagnostic::DeadEnd {
        state: StateId::from("dangling_end")
    }));
    assert!(diagnostics.contains(&Diagnostic::DeadEnd {
        state: StateId::from("stray")
    }));
}

#[test]
fn missing_goal_is_an_error() {
    let mut world = WorldGraph::new("no_goal", state("s0")).unwrap();
    world.add_final_state(state("s1")).unwrap();
    link(&mut world, "s0", "go", "s1");

    let report = world.validate();
    assert!(!report.is_ok());
    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors, [&Diagnostic::NoGoalState]);
    assert!(report.clone().into_result().is_err());
}

#[test]
fn contradictory_designations_are_errors() {
    let mut world = linear_world(2);
    world
        .add_state(state("burnt").with_kind(StateKind::Failure))
        .unwrap()
        .mark_goal("burnt")
        .unwrap();
    link(&mut world, "s0", "overheat", "burnt");

    let report = world.validate();
    assert_eq!(
        report.errors().cloned().collect::<Vec<_>>(),
        [Diagnostic::GoalClassifiedAsFailure {
            state: StateId::from("burnt")
        }]
    );
}

#[test]
fn terminal_with_exits_and_stray_quality_are_warnings() {
    let mut world = linear_world(3);
    world
        .replace_state(state("s1").with_quality(7.5))
        .unwrap();
    world.mark_final("s1").unwrap();

    let report = world.validate();
    assert!(report.is_ok());
    assert_eq!(
        report.warnings().cloned().collect::<Vec<_>>(),
        [Diagnostic::TerminalHasExits {
            state: StateId::from("s1"),
            out_degree: 1
        }]
    );

    let mut world = linear_world(3);
    world
        .replace_state(state("s1").with_quality(7.5))
        .unwrap();
    let warnings: Vec<_> = world.validate().warnings().cloned().collect();
    assert_eq!(
        warnings,
        [Diagnostic::QualityOnOrdinaryState {
            state: StateId::from("s1")
        }]
    );
}

#[test]
fn report_lists_every_problem() {
    let mut world = WorldGraph::new("messy", state("s0")).unwrap();
    world
        .add_state(state("s1"))
        .unwrap()
        .add_state(state("island"))
        .unwrap();
    link(&mut world, "s0", "go", "s1");

    let report = world.validate();
    let rendered = report.to_string();
    assert_eq!(
        rendered,
        "warning: state 'island' is unreachable from the initial state\n\
         warning: state 's1' has no outgoing transitions but is not designated goal or final\n\
         warning: state 'island' has no outgoing transitions but is not designated goal or final\n\
         error: world has no goal state"
    );
    assert_eq!(report.warnings().count(), 3);
    assert_eq!((&report).into_iter().count(), 4);
}
