//! Overlay graphs: a world's topology with media attached.
//!
//! An overlay mirrors the states and transitions of a source
//! [`WorldGraph`] that have been materialized so far. It refers to the
//! source by name only; every operation that needs the source takes it as an
//! argument and checks the name first. Traversal is never reimplemented here:
//! [`OverlayGraph::topology`] rebuilds a [`WorldGraph`] over the materialized
//! part so the world's own queries apply.

use core::fmt;
use core::marker::PhantomData;

use indexmap::IndexMap;
use worldbench_graph::prelude::*;

use crate::error::MediaError;
use crate::generator::{MediaGenerator, MediaRequest};
use crate::token::MediaToken;

/// Marker for the kind of media an overlay carries.
pub trait OverlayKind {
    /// Stable lowercase name used in records and logs.
    const KIND: &'static str;
}

/// Still images per state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image;

impl OverlayKind for Image {
    const KIND: &'static str = "image";
}

/// Still images per state plus clips per transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Video;

impl OverlayKind for Video {
    const KIND: &'static str = "video";
}

/// A world with one image per materialized state.
pub type ImageWorld = OverlayGraph<Image>;

/// A world with images per state and clips per transition.
pub type VideoWorld = OverlayGraph<Video>;

/// A materialized state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayState {
    pub(crate) state_id: StateId,
    pub(crate) description: String,
    pub(crate) media_token: MediaToken,
    pub(crate) parent_state_id: Option<StateId>,
    pub(crate) parent_action_id: Option<ActionId>,
    pub(crate) basis_token: Option<MediaToken>,
}

impl OverlayState {
    /// Returns the source state id.
    #[must_use]
    pub fn state_id(&self) -> &StateId {
        &self.state_id
    }

    /// Returns the source state's description at materialization time.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the state's media.
    #[must_use]
    pub fn media_token(&self) -> &MediaToken {
        &self.media_token
    }

    /// Returns the state this one was derived from, if any.
    #[must_use]
    pub fn parent_state_id(&self) -> Option<&StateId> {
        self.parent_state_id.as_ref()
    }

    /// Returns the action that leads from the parent to this state.
    #[must_use]
    pub fn parent_action_id(&self) -> Option<&ActionId> {
        self.parent_action_id.as_ref()
    }

    /// Returns the media the generator was given for continuity.
    #[must_use]
    pub fn basis_token(&self) -> Option<&MediaToken> {
        self.basis_token.as_ref()
    }
}

/// A source transition whose endpoints are both materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayTransition {
    pub(crate) start: StateId,
    pub(crate) action: ActionId,
    pub(crate) end: StateId,
    pub(crate) action_description: String,
    pub(crate) media_token: Option<MediaToken>,
}

impl OverlayTransition {
    /// Returns the start state id.
    #[must_use]
    pub fn start(&self) -> &StateId {
        &self.start
    }

    /// Returns the action id.
    #[must_use]
    pub fn action(&self) -> &ActionId {
        &self.action
    }

    /// Returns the end state id.
    #[must_use]
    pub fn end(&self) -> &StateId {
        &self.end
    }

    /// Returns the source action's description.
    #[must_use]
    pub fn action_description(&self) -> &str {
        &self.action_description
    }

    /// Returns the transition's clip, once generated.
    #[must_use]
    pub fn media_token(&self) -> Option<&MediaToken> {
        self.media_token.as_ref()
    }
}

impl fmt::Display for OverlayTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.start, self.action, self.end)
    }
}

/// Overlay of media onto a source world.
///
/// States are kept in materialization order. Transitions are kept in source
/// order and appear as soon as both of their endpoints are materialized.
pub struct OverlayGraph<K> {
    name: String,
    source_world_name: String,
    pub(crate) states: IndexMap<StateId, OverlayState>,
    pub(crate) transitions: IndexMap<(StateId, ActionId), OverlayTransition>,
    _kind: PhantomData<K>,
}

impl<K> fmt::Debug for OverlayGraph<K>
where
    K: OverlayKind,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayGraph")
            .field("kind", &K::KIND)
            .field("name", &self.name)
            .field("source_world_name", &self.source_world_name)
            .field("states", &self.states.len())
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

impl<K> Clone for OverlayGraph<K> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            source_world_name: self.source_world_name.clone(),
            states: self.states.clone(),
            transitions: self.transitions.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> PartialEq for OverlayGraph<K> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.source_world_name == other.source_world_name
            && self.states == other.states
            && self.transitions == other.transitions
    }
}

impl<K> OverlayGraph<K>
where
    K: OverlayKind,
{
    /// Creates an empty overlay named after the source world.
    #[must_use]
    pub fn for_world(source: &WorldGraph) -> Self {
        Self::new(source.name(), source.name())
    }

    /// Creates an empty overlay with an explicit name.
    #[must_use]
    pub fn new(name: impl Into<String>, source_world_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_world_name: source_world_name.into(),
            states: IndexMap::new(),
            transitions: IndexMap::new(),
            _kind: PhantomData,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the overlay name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the world this overlay belongs to.
    #[must_use]
    pub fn source_world_name(&self) -> &str {
        &self.source_world_name
    }

    /// Returns the overlay kind, `"image"` or `"video"`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        K::KIND
    }

    /// Returns the materialized states in materialization order.
    pub fn states(&self) -> impl ExactSizeIterator<Item = &OverlayState> + '_ {
        self.states.values()
    }

    /// Returns the overlay transitions in source order.
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &OverlayTransition> + '_ {
        self.transitions.values()
    }

    /// Looks up a materialized state.
    #[must_use]
    pub fn state(&self, id: &str) -> Option<&OverlayState> {
        self.states.get(id)
    }

    /// Looks up an overlay transition by start state and action.
    #[must_use]
    pub fn transition(&self, start: &str, action: &str) -> Option<&OverlayTransition> {
        self.transitions
            .get(&(StateId::from(start), ActionId::from(action)))
    }

    /// Returns the media of a materialized state.
    #[must_use]
    pub fn token(&self, id: &str) -> Option<&MediaToken> {
        self.states.get(id).map(OverlayState::media_token)
    }

    /// Returns true if the state has media.
    #[must_use]
    pub fn is_materialized(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// Returns the number of materialized states.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of overlay transitions.
    #[must_use]
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Materialization
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the media of a state, generating it on first use.
    ///
    /// The generator is called at most once per state id: later calls return
    /// the stored token and ignore `basis`. When it is called, `basis` is
    /// passed through unchanged.
    ///
    /// # Errors
    ///
    /// - [`MediaError::SourceMismatch`] if `source` is not this overlay's world
    /// - [`MediaError::Graph`] if the state does not exist in `source`
    /// - [`MediaError::Generation`] if the generator fails; nothing is recorded
    pub fn materialize_state<G>(
        &mut self,
        source: &WorldGraph,
        state_id: &str,
        basis: Option<&MediaToken>,
        generator: &mut G,
    ) -> Result<MediaToken, MediaError>
    where
        G: MediaGenerator + ?Sized,
    {
        self.ensure_source(source)?;
        if let Some(token) = self.token(state_id) {
            return Ok(token.clone());
        }
        let state = source
            .state(state_id)
            .ok_or_else(|| GraphError::unknown_state(&StateId::from(state_id), self.name.clone()))?;
        let token = generator
            .generate(&MediaRequest::state(state, basis))
            .map_err(|error| MediaError::Generation {
                subject: state_id.to_owned(),
                source: error,
            })?;
        self.record_state(source, state, None, basis.cloned(), token.clone());
        Ok(token)
    }

    /// Inserts a materialized state and every source transition it completes.
    pub(crate) fn record_state(
        &mut self,
        source: &WorldGraph,
        state: &State,
        parent: Option<(StateId, ActionId)>,
        basis_token: Option<MediaToken>,
        media_token: MediaToken,
    ) {
        let (parent_state_id, parent_action_id) = parent.unzip();
        tracing::debug!(
            overlay = %self.name,
            state = %state.id(),
            token = %media_token,
            "materialized state"
        );
        self.states.insert(
            state.id().clone(),
            OverlayState {
                state_id: state.id().clone(),
                description: state.description().to_owned(),
                media_token,
                parent_state_id,
                parent_action_id,
                basis_token,
            },
        );
        self.sync_transitions(source);
    }

    /// Adds the source transitions whose endpoints are both materialized, in
    /// source order.
    fn sync_transitions(&mut self, source: &WorldGraph) {
        let mut transitions = IndexMap::with_capacity(self.transitions.len() + 1);
        for transition in source.transitions() {
            if !self.is_materialized(transition.start().as_str())
                || !self.is_materialized(transition.end().as_str())
            {
                continue;
            }
            let key = (transition.start().clone(), transition.action().clone());
            let entry = self.transitions.swap_remove(&key).unwrap_or_else(|| {
                OverlayTransition {
                    start: transition.start().clone(),
                    action: transition.action().clone(),
                    end: transition.end().clone(),
                    action_description: source
                        .action(transition.action().as_str())
                        .map(|a| a.description().to_owned())
                        .unwrap_or_default(),
                    media_token: None,
                }
            });
            transitions.insert(key, entry);
        }
        self.transitions = transitions;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Source checks
    // ─────────────────────────────────────────────────────────────────────────

    /// Fails unless `source` is the world this overlay was built for.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::SourceMismatch`] on a name mismatch.
    pub fn ensure_source(&self, source: &WorldGraph) -> Result<(), MediaError> {
        if source.name() == self.source_world_name {
            return Ok(());
        }
        Err(MediaError::SourceMismatch {
            overlay: self.name.clone(),
            expected: self.source_world_name.clone(),
            actual: source.name().to_owned(),
        })
    }

    /// Verifies that every overlay state and transition exists in `source`.
    ///
    /// # Errors
    ///
    /// - [`MediaError::SourceMismatch`] on a world name mismatch
    /// - [`MediaError::Graph`] naming the first state or transition missing
    ///   from `source`
    pub fn check_against(&self, source: &WorldGraph) -> Result<(), MediaError> {
        self.ensure_source(source)?;
        for state in self.states.values() {
            if !source.contains_state(state.state_id.as_str()) {
                return Err(GraphError::unknown_state(&state.state_id, self.name.clone()).into());
            }
        }
        for t in self.transitions.values() {
            let matches = source
                .transition(t.start.as_str(), t.action.as_str())
                .is_some_and(|s| s.matches(t.start.as_str(), t.action.as_str(), t.end.as_str()));
            if !matches {
                return Err(GraphError::NoSuchTransition {
                    state: t.start.clone(),
                    action: t.action.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Rebuilds the part of `source` covered by this overlay as a world.
    ///
    /// The result keeps the source's initial state, designations and
    /// insertion order, restricted to materialized states and overlay
    /// transitions, so every [`WorldGraph`] query applies to the overlay.
    ///
    /// # Errors
    ///
    /// - [`MediaError::NotMaterialized`] if the initial state has no media
    /// - any error of [`check_against`](Self::check_against)
    pub fn topology(&self, source: &WorldGraph) -> Result<WorldGraph, MediaError> {
        self.check_against(source)?;
        let initial = source.initial_state();
        if !self.is_materialized(initial.id().as_str()) {
            return Err(MediaError::NotMaterialized {
                state: initial.id().to_string(),
            });
        }

        let mut world = WorldGraph::new(self.name.clone(), initial.clone())?;
        world.set_description(source.description().map(str::to_owned));
        for state in source.states().skip(1) {
            if self.is_materialized(state.id().as_str()) {
                world.add_state(state.clone())?;
            }
        }
        for id in source.goal_state_ids() {
            if world.contains_state(id.as_str()) {
                world.mark_goal(id.as_str())?;
            }
        }
        for id in source.final_state_ids() {
            if world.contains_state(id.as_str()) {
                world.mark_final(id.as_str())?;
            }
        }
        for action in source.actions() {
            if self.transitions.values().any(|t| &t.action == action.id()) {
                world.add_action(action.clone())?;
            }
        }
        for t in self.transitions.values() {
            if let Some(transition) = source.transition(t.start.as_str(), t.action.as_str()) {
                world.add_transition(transition.clone())?;
            }
        }
        Ok(world)
    }
}
