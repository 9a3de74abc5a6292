//! The world graph and its construction API.
//!
//! A [`WorldGraph`] owns every state, action and transition of one world and
//! enforces the hard structural invariants on insertion:
//!
//! - ids are unique per entity kind
//! - transitions only reference states and actions of the same graph
//! - each `(start, action)` pair has at most one outgoing transition
//!
//! Softer properties (dead ends, unreachable content, terminal states with
//! outgoing edges) are reported by [`WorldGraph::validate`] instead.

use std::collections::VecDeque;

use hashbrown::HashMap;
use indexmap::{IndexMap, IndexSet};

use crate::action::{Action, ActionId};
use crate::error::{EntityKind, GraphError};
use crate::state::{State, StateId, StateKind};
use crate::transition::Transition;

/// Outgoing edges of a single state.
#[derive(Debug, Clone, Default, PartialEq)]
struct Outgoing {
    /// Action id -> index into `WorldGraph::transitions`.
    by_action: HashMap<ActionId, usize>,
    /// Transition indices ordered by the insertion order of their actions.
    ordered: Vec<usize>,
}

/// A finite, directed, action-labelled graph of world states.
///
/// Insertion order of states, actions and transitions is preserved for
/// reproducible serialization. The initial state is always the first state.
///
/// # Example
///
/// ```
/// use worldbench_graph::prelude::*;
///
/// let mut world = WorldGraph::new("tea", State::new("s0", "Kettle is cold")?)?;
/// world
///     .add_state(State::new("s1", "Water is boiling")?.with_kind(StateKind::Goal))?
///     .add_action(Action::new("a0", "Switch the kettle on")?)?
///     .add_transition(Transition::new("s0", "a0", "s1"))?;
///
/// assert_eq!(world.apply_action("s0", "a0")?.id().as_str(), "s1");
/// assert!(world.branch_points().is_empty());
/// # Ok::<(), GraphError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WorldGraph {
    name: String,
    description: Option<String>,
    states: IndexMap<StateId, State>,
    actions: IndexMap<ActionId, Action>,
    transitions: Vec<Transition>,
    adjacency: HashMap<StateId, Outgoing>,
    initial: StateId,
    goals: IndexSet<StateId>,
    finals: IndexSet<StateId>,
}

impl WorldGraph {
    /// Creates a world containing only its initial state.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Validation`] if `initial` breaks a construction
    /// rule.
    pub fn new(name: impl Into<String>, initial: State) -> Result<Self, GraphError> {
        initial.check()?;
        let initial_id = initial.id().clone();
        let mut world = Self {
            name: name.into(),
            description: None,
            states: IndexMap::new(),
            actions: IndexMap::new(),
            transitions: Vec::new(),
            adjacency: HashMap::new(),
            initial: initial_id.clone(),
            goals: IndexSet::new(),
            finals: IndexSet::new(),
        };
        world.designate_by_kind(&initial_id, initial.kind());
        world.states.insert(initial_id, initial);
        Ok(world)
    }

    /// Sets the scenario description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the scenario description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Renames the world.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the world name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scenario description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns all states in insertion order.
    pub fn states(&self) -> impl ExactSizeIterator<Item = &State> + '_ {
        self.states.values()
    }

    /// Returns all actions in insertion order.
    pub fn actions(&self) -> impl ExactSizeIterator<Item = &Action> + '_ {
        self.actions.values()
    }

    /// Returns all transitions in insertion order.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns the number of states.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Returns the number of transitions.
    #[must_use]
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Gets a state by id.
    #[must_use]
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    /// Gets an action by id.
    #[must_use]
    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.get(id)
    }

    /// Returns true if the graph contains the state.
    #[must_use]
    pub fn contains_state(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// Returns true if the graph contains the action.
    #[must_use]
    pub fn contains_action(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    /// Returns the initial state.
    #[must_use]
    pub fn initial_state(&self) -> &State {
        // States are never removed and the initial state is inserted by `new`.
        &self.states[&self.initial]
    }

    /// Returns the initial state id.
    #[must_use]
    pub fn initial_state_id(&self) -> &StateId {
        &self.initial
    }

    /// Returns the designated goal state ids in designation order.
    pub fn goal_state_ids(&self) -> impl ExactSizeIterator<Item = &StateId> + '_ {
        self.goals.iter()
    }

    /// Returns the designated final state ids in designation order.
    pub fn final_state_ids(&self) -> impl ExactSizeIterator<Item = &StateId> + '_ {
        self.finals.iter()
    }

    /// Returns true if the state is a designated goal.
    #[must_use]
    pub fn is_goal(&self, id: &str) -> bool {
        self.goals.contains(id)
    }

    /// Returns true if the state is a designated final state.
    #[must_use]
    pub fn is_final(&self, id: &str) -> bool {
        self.finals.contains(id)
    }

    /// Returns true if the state is designated terminal or has no outgoing
    /// transitions.
    #[must_use]
    pub fn is_terminal(&self, id: &str) -> bool {
        self.is_goal(id) || self.is_final(id) || self.out_degree(id) == 0
    }

    /// Returns the number of outgoing transitions of a state (0 for unknown ids).
    #[must_use]
    pub fn out_degree(&self, id: &str) -> usize {
        self.adjacency.get(id).map_or(0, |out| out.ordered.len())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Construction API
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds a state.
    ///
    /// States classified [`StateKind::Goal`] are designated goals and states
    /// classified [`StateKind::Failure`] are designated final states.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Validation`] if the state breaks a construction rule
    /// - [`GraphError::DuplicateId`] if a state with the same id exists
    pub fn add_state(&mut self, state: State) -> Result<&mut Self, GraphError> {
        state.check()?;
        if self.states.contains_key(state.id()) {
            tracing::debug!(state = %state.id(), world = %self.name, "rejected duplicate state");
            return Err(GraphError::DuplicateId {
                entity: EntityKind::State,
                id: state.id().to_string(),
            });
        }
        let id = state.id().clone();
        self.designate_by_kind(&id, state.kind());
        self.states.insert(id, state);
        Ok(self)
    }

    /// Adds a state and designates it as a goal.
    ///
    /// # Errors
    ///
    /// Same as [`add_state`](Self::add_state).
    pub fn add_goal_state(&mut self, state: State) -> Result<&mut Self, GraphError> {
        let id = state.id().clone();
        self.add_state(state)?;
        self.goals.insert(id);
        Ok(self)
    }

    /// Adds a state and designates it as final (terminal, not necessarily a goal).
    ///
    /// # Errors
    ///
    /// Same as [`add_state`](Self::add_state).
    pub fn add_final_state(&mut self, state: State) -> Result<&mut Self, GraphError> {
        let id = state.id().clone();
        self.add_state(state)?;
        self.finals.insert(id);
        Ok(self)
    }

    /// Designates an existing state as a goal.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingReference`] if the state does not exist.
    pub fn mark_goal(&mut self, id: &str) -> Result<&mut Self, GraphError> {
        let (id, _) = self
            .states
            .get_key_value(id)
            .ok_or_else(|| GraphError::unknown_state(&StateId::from(id), "goal_state_ids"))?;
        self.goals.insert(id.clone());
        Ok(self)
    }

    /// Designates an existing state as final.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingReference`] if the state does not exist.
    pub fn mark_final(&mut self, id: &str) -> Result<&mut Self, GraphError> {
        let (id, _) = self
            .states
            .get_key_value(id)
            .ok_or_else(|| GraphError::unknown_state(&StateId::from(id), "final_state_ids"))?;
        self.finals.insert(id.clone());
        Ok(self)
    }

    /// Removes a goal designation. Returns false if the state was not a goal.
    pub fn unmark_goal(&mut self, id: &str) -> bool {
        self.goals.shift_remove(id)
    }

    /// Removes a final designation. Returns false if the state was not final.
    pub fn unmark_final(&mut self, id: &str) -> bool {
        self.finals.shift_remove(id)
    }

    /// Replaces an existing state with a new record carrying the same id.
    ///
    /// Transitions reference states by id, so they stay valid. Existing goal
    /// and final designations are kept; a `Goal` or `Failure` kind on the new
    /// state adds its designation. Use [`unmark_goal`](Self::unmark_goal) or
    /// [`unmark_final`](Self::unmark_final) to drop one. Returns the old state.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Validation`] if the new state breaks a construction rule
    /// - [`GraphError::DanglingReference`] if no state has this id
    pub fn replace_state(&mut self, state: State) -> Result<State, GraphError> {
        state.check()?;
        let Some(slot) = self.states.get_mut(state.id()) else {
            return Err(GraphError::unknown_state(state.id(), "replace_state"));
        };
        let new_kind = state.kind();
        let old = core::mem::replace(slot, state);
        let id = old.id().clone();
        self.designate_by_kind(&id, new_kind);
        Ok(old)
    }

    /// Adds an action.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Validation`] if the action breaks a construction rule
    /// - [`GraphError::DuplicateId`] if an action with the same id exists
    pub fn add_action(&mut self, action: Action) -> Result<&mut Self, GraphError> {
        action.check()?;
        if self.actions.contains_key(action.id()) {
            tracing::debug!(action = %action.id(), world = %self.name, "rejected duplicate action");
            return Err(GraphError::DuplicateId {
                entity: EntityKind::Action,
                id: action.id().to_string(),
            });
        }
        self.actions.insert(action.id().clone(), action);
        Ok(self)
    }

    /// Adds a transition.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DanglingReference`] if the start, end or action is unknown
    /// - [`GraphError::NonDeterministicTransition`] if `(start, action)` already
    ///   leads to a different state
    /// - [`GraphError::DuplicateId`] if the exact same transition exists
    pub fn add_transition(&mut self, transition: Transition) -> Result<&mut Self, GraphError> {
        let referrer = || format!("transition {transition}");
        if !self.states.contains_key(transition.start()) {
            return Err(GraphError::unknown_state(transition.start(), referrer()));
        }
        if !self.states.contains_key(transition.end()) {
            return Err(GraphError::unknown_state(transition.end(), referrer()));
        }
        let Some(action_pos) = self.actions.get_index_of(transition.action()) else {
            return Err(GraphError::unknown_action(transition.action(), referrer()));
        };

        if let Some(&existing) = self
            .adjacency
            .get(transition.start())
            .and_then(|out| out.by_action.get(transition.action()))
        {
            let existing_end = self.transitions[existing].end();
            if existing_end == transition.end() {
                return Err(GraphError::DuplicateId {
                    entity: EntityKind::Transition,
                    id: transition.to_string(),
                });
            }
            tracing::debug!(
                start = %transition.start(),
                action = %transition.action(),
                "rejected non-deterministic transition"
            );
            return Err(GraphError::NonDeterministicTransition {
                start: transition.start().clone(),
                action: transition.action().clone(),
                existing_end: existing_end.clone(),
                end: transition.end().clone(),
            });
        }

        let index = self.transitions.len();
        let out = self.adjacency.entry(transition.start().clone()).or_default();
        let insert_at = out.ordered.partition_point(|&i| {
            self.actions
                .get_index_of(self.transitions[i].action())
                .is_some_and(|pos| pos <= action_pos)
        });
        out.ordered.insert(insert_at, index);
        out.by_action.insert(transition.action().clone(), index);
        self.transitions.push(transition);
        Ok(self)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the outgoing transitions of a state, ordered by the insertion
    /// order of their actions. Unknown ids yield nothing.
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &Transition> + '_ {
        self.adjacency
            .get(id)
            .into_iter()
            .flat_map(|out| out.ordered.iter().map(|&i| &self.transitions[i]))
    }

    /// Returns the transition for a `(state, action)` pair, if any.
    #[must_use]
    pub fn transition(&self, state: &str, action: &str) -> Option<&Transition> {
        self.adjacency
            .get(state)
            .and_then(|out| out.by_action.get(action))
            .map(|&i| &self.transitions[i])
    }

    /// Returns the actions that can be applied in a state.
    ///
    /// Empty for terminal states. Ordered by action insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingReference`] if the state does not exist.
    pub fn available_actions(&self, state: &str) -> Result<Vec<&Action>, GraphError> {
        self.require_state(state, "available_actions")?;
        Ok(self
            .outgoing(state)
            .filter_map(|t| self.actions.get(t.action()))
            .collect())
    }

    /// Applies an action to a state and returns the resulting state.
    ///
    /// This is the single deterministic primitive that every kind of
    /// exploration is built on.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DanglingReference`] if the state does not exist
    /// - [`GraphError::NoSuchTransition`] if the action is not available there
    pub fn apply_action(&self, state: &str, action: &str) -> Result<&State, GraphError> {
        self.require_state(state, "apply_action")?;
        let transition =
            self.transition(state, action)
                .ok_or_else(|| GraphError::NoSuchTransition {
                    state: StateId::from(state),
                    action: ActionId::from(action),
                })?;
        Ok(&self.states[transition.end()])
    }

    /// Returns every state reachable from the initial state, in breadth-first
    /// order (the initial state first).
    #[must_use]
    pub fn reachable_states(&self) -> IndexSet<StateId> {
        self.breadth_first(&self.initial)
    }

    /// Returns every state reachable from `from`, in breadth-first order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DanglingReference`] if the state does not exist.
    pub fn reachable_states_from(&self, from: &str) -> Result<IndexSet<StateId>, GraphError> {
        let start = self.require_state(from, "reachable_states")?;
        Ok(self.breadth_first(start))
    }

    /// Returns the states with two or more distinct outgoing actions, in
    /// state insertion order.
    #[must_use]
    pub fn branch_points(&self) -> Vec<&StateId> {
        self.states
            .keys()
            .filter(|id| self.out_degree(id.as_str()) >= 2)
            .collect()
    }

    /// Returns the states with no outgoing transitions, in insertion order.
    #[must_use]
    pub fn terminal_states(&self) -> Vec<&StateId> {
        self.states
            .keys()
            .filter(|id| self.out_degree(id.as_str()) == 0)
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolves a state id to the graph's own key, or fails as dangling.
    pub(crate) fn require_state(&self, id: &str, referrer: &str) -> Result<&StateId, GraphError> {
        self.states
            .get_key_value(id)
            .map(|(key, _)| key)
            .ok_or_else(|| GraphError::unknown_state(&StateId::from(id), referrer))
    }

    fn designate_by_kind(&mut self, id: &StateId, kind: StateKind) {
        match kind {
            StateKind::Goal => {
                self.goals.insert(id.clone());
            }
            StateKind::Failure => {
                self.finals.insert(id.clone());
            }
            StateKind::Ordinary => {}
        }
    }

    fn breadth_first(&self, start: &StateId) -> IndexSet<StateId> {
        let mut seen = IndexSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start.clone());
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for transition in self.outgoing(current.as_str()) {
                if seen.insert(transition.end().clone()) {
                    queue.push_back(transition.end());
                }
            }
        }
        seen
    }
}
