//! Shared fixtures for `worldbench_graph` integration tests.
//!
//! Import via `mod test_utils;` in test files.

#![allow(
    dead_code,
    missing_docs,
    reason = "shared test utilities, not all items used in every test binary"
)]

use worldbench_graph::prelude::*;

// ═══════════════════════════════════════════════════════════════════════════════
// ENTITY HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn state(id: &str) -> State {
    State::new(id, format!("state {id}")).unwrap()
}

pub fn action(id: &str) -> Action {
    Action::new(id, format!("action {id}")).unwrap()
}

/// Adds `start --action--> end`, creating the action if needed.
pub fn link(world: &mut WorldGraph, start: &str, action_id: &str, end: &str) {
    if !world.contains_action(action_id) {
        world.add_action(action(action_id)).unwrap();
    }
    world
        .add_transition(Transition::new(start, action_id, end))
        .unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// FIXTURE WORLDS
// ═══════════════════════════════════════════════════════════════════════════════

/// `s0 -a0-> s1 -a1-> ... -> s{n-1}` with the last state as goal.
pub fn linear_world(n: usize) -> WorldGraph {
    assert!(n >= 1, "a world needs at least its initial state");
    let mut world = WorldGraph::new("linear", state("s0")).unwrap();
    for i in 1..n {
        let id = format!("s{i}");
        if i == n - 1 {
            world.add_goal_state(state(&id)).unwrap();
        } else {
            world.add_state(state(&id)).unwrap();
        }
        link(&mut world, &format!("s{}", i - 1), &format!("a{}", i - 1), &id);
    }
    if n == 1 {
        world.mark_goal("s0").unwrap();
    }
    world
}

/// `s0` branches into `s1a` / `s1b`, both leading to the shared goal `s2`.
pub fn diamond_world() -> WorldGraph {
    let mut world = WorldGraph::new("diamond", state("s0")).unwrap();
    world
        .add_state(state("s1a"))
        .unwrap()
        .add_state(state("s1b"))
        .unwrap()
        .add_goal_state(state("s2"))
        .unwrap();
    link(&mut world, "s0", "left", "s1a");
    link(&mut world, "s0", "right", "s1b");
    link(&mut world, "s1a", "walk", "s2");
    link(&mut world, "s1b", "walk", "s2");
    world
}

/// A world with a cycle `s0 <-> s1` and two endings reachable from `s1`.
pub fn cyclic_world() -> WorldGraph {
    let mut world = WorldGraph::new("cyclic", state("s0")).unwrap();
    world
        .add_state(state("s1"))
        .unwrap()
        .add_goal_state(state("win"))
        .unwrap()
        .add_final_state(state("lose"))
        .unwrap();
    link(&mut world, "s0", "forward", "s1");
    link(&mut world, "s1", "back", "s0");
    link(&mut world, "s1", "finish", "win");
    link(&mut world, "s1", "fumble", "lose");
    link(&mut world, "s0", "give_up", "lose");
    world
}

/// Collects every path as `start --a--> end` strings.
pub fn rendered(paths: Paths<'_>) -> Vec<String> {
    paths.map(|p| p.to_string()).collect()
}
