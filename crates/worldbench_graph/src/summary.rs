//! Aggregate statistics about a world.

use core::fmt;

use crate::graph::WorldGraph;
use crate::state::StateId;

/// A snapshot of a world's size and shape.
///
/// Counting paths enumerates them, so building a summary costs as much as a
/// full [`WorldGraph::all_paths`] walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSummary {
    /// World name.
    pub name: String,
    /// Number of states.
    pub state_count: usize,
    /// Number of actions.
    pub action_count: usize,
    /// Number of transitions.
    pub transition_count: usize,
    /// Number of designated goal states.
    pub goal_count: usize,
    /// Number of designated final states.
    pub final_count: usize,
    /// States with two or more outgoing actions.
    pub branch_points: Vec<StateId>,
    /// States without outgoing transitions.
    pub terminal_states: Vec<StateId>,
    /// Number of states reachable from the initial state.
    pub reachable_count: usize,
    /// States not reachable from the initial state.
    pub unreachable: Vec<StateId>,
    /// Number of paths from the initial state to a goal or final state.
    pub path_count: usize,
    /// Number of paths ending in a goal state.
    pub successful_path_count: usize,
}

impl WorldGraph {
    /// Computes a [`WorldSummary`].
    #[must_use]
    pub fn summary(&self) -> WorldSummary {
        let reachable = self.reachable_states();
        WorldSummary {
            name: self.name().to_owned(),
            state_count: self.state_count(),
            action_count: self.action_count(),
            transition_count: self.transition_count(),
            goal_count: self.goal_state_ids().len(),
            final_count: self.final_state_ids().len(),
            branch_points: self.branch_points().into_iter().cloned().collect(),
            terminal_states: self.terminal_states().into_iter().cloned().collect(),
            reachable_count: reachable.len(),
            unreachable: self
                .states()
                .map(|s| s.id())
                .filter(|id| !reachable.contains(*id))
                .cloned()
                .collect(),
            path_count: self.all_paths().count(),
            successful_path_count: self.successful_paths().count(),
        }
    }
}

fn write_ids(f: &mut fmt::Formatter<'_>, ids: &[StateId]) -> fmt::Result {
    if ids.is_empty() {
        return write!(f, "none");
    }
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{id}")?;
    }
    Ok(())
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "world: {}", self.name)?;
        writeln!(
            f,
            "  states: {} ({} reachable), actions: {}, transitions: {}",
            self.state_count, self.reachable_count, self.action_count, self.transition_count
        )?;
        writeln!(
            f,
            "  goals: {}, finals: {}, paths: {} ({} successful)",
            self.goal_count, self.final_count, self.path_count, self.successful_path_count
        )?;
        write!(f, "  branch points: ")?;
        write_ids(f, &self.branch_points)?;
        write!(f, "\n  endings: ")?;
        write_ids(f, &self.terminal_states)?;
        if !self.unreachable.is_empty() {
            write!(f, "\n  unreachable: ")?;
            write_ids(f, &self.unreachable)?;
        }
        Ok(())
    }
}
