//! Simple-path enumeration over world graphs.
//!
//! Paths are produced lazily, depth-first, exploring the outgoing transitions
//! of each state in the insertion order of their actions. A state never
//! repeats within one path, so enumeration terminates even on cyclic worlds.
//!
//! # Complexity
//!
//! The number of simple paths grows exponentially with the number of branch
//! points. Worlds are expected to stay small (a few dozen states, a handful of
//! branch points), so no memoization or pruning is attempted. Callers who need
//! only some paths should stop consuming the iterator early.

use core::fmt;
use core::iter::FusedIterator;

use hashbrown::HashSet;

use crate::action::ActionId;
use crate::error::GraphError;
use crate::graph::WorldGraph;
use crate::state::StateId;
use crate::transition::Transition;

/// A simple path: an ordered sequence of transitions without repeated states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<'g> {
    start: &'g StateId,
    transitions: Vec<&'g Transition>,
}

impl<'g> Path<'g> {
    /// Returns the state the path starts from.
    #[must_use]
    pub fn start(&self) -> &'g StateId {
        self.start
    }

    /// Returns the state the path ends in (the start for an empty path).
    #[must_use]
    pub fn end(&self) -> &'g StateId {
        self.transitions.last().map_or(self.start, |t| t.end())
    }

    /// Returns the transitions in order.
    #[must_use]
    pub fn transitions(&self) -> &[&'g Transition] {
        &self.transitions
    }

    /// Returns the number of transitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns true if the path has no transitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Returns every visited state id, start included.
    #[must_use]
    pub fn state_ids(&self) -> Vec<&'g StateId> {
        core::iter::once(self.start)
            .chain(self.transitions.iter().map(|t| t.end()))
            .collect()
    }

    /// Returns the action ids in order.
    #[must_use]
    pub fn action_ids(&self) -> Vec<&'g ActionId> {
        self.transitions.iter().map(|t| t.action()).collect()
    }

    /// Returns the path as owned `(start, action, end)` triples.
    #[must_use]
    pub fn to_triples(&self) -> Vec<(StateId, ActionId, StateId)> {
        self.transitions.iter().map(|t| t.triple()).collect()
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        for transition in &self.transitions {
            write!(f, " --{}--> {}", transition.action(), transition.end())?;
        }
        Ok(())
    }
}

/// One level of the depth-first search.
#[derive(Debug)]
struct Frame<'g> {
    state: &'g StateId,
    edges: Vec<&'g Transition>,
    cursor: usize,
}

impl<'g> Frame<'g> {
    fn new(graph: &'g WorldGraph, state: &'g StateId) -> Self {
        Self {
            state,
            edges: graph.outgoing(state.as_str()).collect(),
            cursor: 0,
        }
    }
}

/// Lazy iterator over the simple paths from one state to a set of targets.
///
/// Created by [`WorldGraph::paths`] and its shorthands. A path stops at the
/// first target it reaches; it never continues through one.
#[derive(Debug)]
pub struct Paths<'g> {
    graph: &'g WorldGraph,
    start: &'g StateId,
    targets: HashSet<&'g StateId>,
    stack: Vec<Frame<'g>>,
    current: Vec<&'g Transition>,
    on_path: HashSet<&'g StateId>,
    yield_empty: bool,
}

impl<'g> Paths<'g> {
    fn new(graph: &'g WorldGraph, start: &'g StateId, targets: HashSet<&'g StateId>) -> Self {
        let yield_empty = targets.contains(start);
        let (stack, on_path) = if yield_empty {
            (Vec::new(), HashSet::new())
        } else {
            (vec![Frame::new(graph, start)], HashSet::from([start]))
        };
        Self {
            graph,
            start,
            targets,
            stack,
            current: Vec::new(),
            on_path,
            yield_empty,
        }
    }
}

impl<'g> Iterator for Paths<'g> {
    type Item = Path<'g>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.yield_empty {
            self.yield_empty = false;
            return Some(Path {
                start: self.start,
                transitions: Vec::new(),
            });
        }

        loop {
            let frame = self.stack.last_mut()?;
            let Some(&transition) = frame.edges.get(frame.cursor) else {
                if let Some(done) = self.stack.pop() {
                    self.on_path.remove(done.state);
                }
                self.current.pop();
                continue;
            };
            frame.cursor += 1;

            let end = transition.end();
            if self.on_path.contains(end) {
                continue;
            }
            if self.targets.contains(end) {
                let mut transitions = self.current.clone();
                transitions.push(transition);
                return Some(Path {
                    start: self.start,
                    transitions,
                });
            }
            self.current.push(transition);
            self.on_path.insert(end);
            self.stack.push(Frame::new(self.graph, end));
        }
    }
}

impl FusedIterator for Paths<'_> {}

impl WorldGraph {
    /// Enumerates every simple path from `from` to any of `targets`.
    ///
    /// If `from` is itself a target, exactly one empty path is produced.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingReference`] if `from` or a target does
    /// not exist.
    pub fn paths<I, S>(&self, from: &str, targets: I) -> Result<Paths<'_>, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start = self.require_state(from, "paths")?;
        let targets = targets
            .into_iter()
            .map(|target| self.require_state(target.as_ref(), "paths"))
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Paths::new(self, start, targets))
    }

    /// Enumerates every simple path from the initial state to a goal or
    /// final state.
    ///
    /// # Example
    ///
    /// ```
    /// use worldbench_graph::prelude::*;
    ///
    /// let mut world = WorldGraph::new("door", State::new("s0", "Door is shut")?)?;
    /// world
    ///     .add_goal_state(State::new("s1", "Door is open")?)?
    ///     .add_final_state(State::new("s1x", "Handle snapped off")?)?
    ///     .add_action(Action::new("pull", "Pull the handle")?)?
    ///     .add_action(Action::new("yank", "Yank the handle hard")?)?
    ///     .add_transition(Transition::new("s0", "pull", "s1"))?
    ///     .add_transition(Transition::new("s0", "yank", "s1x"))?;
    ///
    /// let ends: Vec<_> = world.all_paths().map(|p| p.end().to_string()).collect();
    /// assert_eq!(ends, ["s1", "s1x"]);
    /// assert_eq!(world.successful_paths().count(), 1);
    /// # Ok::<(), GraphError>(())
    /// ```
    #[must_use]
    pub fn all_paths(&self) -> Paths<'_> {
        let targets = self.goal_state_ids().chain(self.final_state_ids()).collect();
        Paths::new(self, self.initial_state_id(), targets)
    }

    /// Enumerates the simple paths from the initial state to a goal state.
    #[must_use]
    pub fn successful_paths(&self) -> Paths<'_> {
        Paths::new(self, self.initial_state_id(), self.goal_state_ids().collect())
    }

    /// Enumerates the simple paths from the initial state to a final state
    /// that is not also a goal.
    #[must_use]
    pub fn failed_paths(&self) -> Paths<'_> {
        let targets = self
            .final_state_ids()
            .filter(|id| !self.is_goal(id.as_str()))
            .collect();
        Paths::new(self, self.initial_state_id(), targets)
    }

    /// Returns the first successful path in enumeration order, the world's
    /// intended route.
    #[must_use]
    pub fn canonical_path(&self) -> Option<Path<'_>> {
        self.successful_paths().next()
    }
}
