//! Collision-free id allocation for synthesized entities.

use worldbench_graph::prelude::*;

/// Allocates fresh state and action ids for one expansion.
///
/// Ids are counter-based (`s_success1`, `s_failure1`, `s_dev1`, `a_dev1`,
/// ...) and skip any id the target world already uses, so authored ids are
/// never shadowed.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_success: usize,
    next_failure: usize,
    next_state: usize,
    next_action: usize,
}

impl IdAllocator {
    /// Creates an allocator whose counters start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the id of a new ending of the given kind.
    pub fn ending_id(&mut self, world: &WorldGraph, kind: StateKind) -> StateId {
        let (prefix, counter) = match kind {
            StateKind::Goal => ("s_success", &mut self.next_success),
            _ => ("s_failure", &mut self.next_failure),
        };
        Self::fresh(prefix, counter, |id| world.contains_state(id)).into()
    }

    /// Allocates the id of a new intermediate state.
    pub fn state_id(&mut self, world: &WorldGraph) -> StateId {
        Self::fresh("s_dev", &mut self.next_state, |id| world.contains_state(id)).into()
    }

    /// Allocates the id of a new action.
    pub fn action_id(&mut self, world: &WorldGraph) -> ActionId {
        Self::fresh("a_dev", &mut self.next_action, |id| world.contains_action(id)).into()
    }

    fn fresh(prefix: &str, counter: &mut usize, taken: impl Fn(&str) -> bool) -> String {
        loop {
            *counter += 1;
            let id = format!("{prefix}{counter}");
            if !taken(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_skips_taken_ids() {
        let mut world = WorldGraph::new("w", State::new("s_dev1", "authored").unwrap()).unwrap();
        world
            .add_action(Action::new("a_dev2", "authored").unwrap())
            .unwrap();

        let mut ids = IdAllocator::new();
        assert_eq!(ids.state_id(&world).as_str(), "s_dev2");
        assert_eq!(ids.state_id(&world).as_str(), "s_dev3");
        assert_eq!(ids.action_id(&world).as_str(), "a_dev1");
        assert_eq!(ids.action_id(&world).as_str(), "a_dev3");
        assert_eq!(ids.ending_id(&world, StateKind::Goal).as_str(), "s_success1");
        assert_eq!(ids.ending_id(&world, StateKind::Failure).as_str(), "s_failure1");
    }
}
