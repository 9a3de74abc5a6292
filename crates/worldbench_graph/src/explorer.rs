//! Step-by-step exploration of a world.
//!
//! An [`Explorer`] is a cursor over a borrowed [`WorldGraph`]: it tracks the
//! current state and the transitions taken so far, and moves only through
//! [`WorldGraph::apply_action`]. Agents under evaluation and interactive demos
//! both drive a world this way.

use crate::action::Action;
use crate::error::GraphError;
use crate::graph::WorldGraph;
use crate::state::{State, StateId, StateKind};
use crate::transition::Transition;

/// How an exploration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Reached a goal state.
    Goal,
    /// Reached a final state that is not a goal.
    Failure,
    /// Stuck in a state with no exits that is neither goal nor final.
    DeadEnd,
}

/// A walk through a world, one action at a time.
///
/// # Example
///
/// ```
/// use worldbench_graph::prelude::*;
///
/// let mut world = WorldGraph::new("lamp", State::new("off", "The lamp is off")?)?;
/// world
///     .add_goal_state(State::new("on", "The lamp is on")?)?
///     .add_action(Action::new("flip", "Flip the switch")?)?
///     .add_transition(Transition::new("off", "flip", "on"))?;
///
/// let mut explorer = Explorer::new(&world);
/// explorer.take("flip")?;
/// assert_eq!(explorer.outcome(), Some(Outcome::Goal));
/// assert_eq!(explorer.steps_taken(), 1);
/// # Ok::<(), GraphError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Explorer<'g> {
    world: &'g WorldGraph,
    start: &'g State,
    current: &'g State,
    history: Vec<&'g Transition>,
}

impl<'g> Explorer<'g> {
    /// Starts exploring from the initial state.
    #[must_use]
    pub fn new(world: &'g WorldGraph) -> Self {
        let start = world.initial_state();
        Self {
            world,
            start,
            current: start,
            history: Vec::new(),
        }
    }

    /// Starts exploring from an arbitrary state.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingReference`] if the state does not exist.
    pub fn starting_at(world: &'g WorldGraph, state: &str) -> Result<Self, GraphError> {
        let start = world
            .state(state)
            .ok_or_else(|| GraphError::unknown_state(&StateId::from(state), "explorer"))?;
        Ok(Self {
            world,
            start,
            current: start,
            history: Vec::new(),
        })
    }

    /// Returns the world being explored.
    #[must_use]
    pub fn world(&self) -> &'g WorldGraph {
        self.world
    }

    /// Returns the current state.
    #[must_use]
    pub fn current(&self) -> &'g State {
        self.current
    }

    /// Returns the actions available in the current state.
    #[must_use]
    pub fn available_actions(&self) -> Vec<&'g Action> {
        self.world
            .outgoing(self.current.id().as_str())
            .filter_map(|t| self.world.action(t.action().as_str()))
            .collect()
    }

    /// Applies an action to the current state and moves there.
    ///
    /// The explorer is unchanged if the action is not available.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoSuchTransition`] if the action cannot be
    /// applied in the current state.
    pub fn take(&mut self, action: &str) -> Result<&'g State, GraphError> {
        let from = self.current.id().as_str();
        let next = self.world.apply_action(from, action)?;
        if let Some(transition) = self.world.transition(from, action) {
            self.history.push(transition);
        }
        tracing::trace!(from, action, to = %next.id(), "explorer step");
        self.current = next;
        Ok(next)
    }

    /// Returns the transitions taken so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[&'g Transition] {
        &self.history
    }

    /// Returns the number of actions taken.
    #[must_use]
    pub fn steps_taken(&self) -> usize {
        self.history.len()
    }

    /// Returns true once the current state is terminal.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.world.is_terminal(self.current.id().as_str())
    }

    /// Returns how the exploration ended, or `None` while it is still running.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_finished() {
            return None;
        }
        let id = self.current.id().as_str();
        Some(if self.world.is_goal(id) {
            Outcome::Goal
        } else if self.world.is_final(id) || self.current.kind() == StateKind::Failure {
            Outcome::Failure
        } else {
            Outcome::DeadEnd
        })
    }

    /// Returns to the starting state and clears the history.
    pub fn reset(&mut self) {
        self.current = self.start;
        self.history.clear();
    }
}
