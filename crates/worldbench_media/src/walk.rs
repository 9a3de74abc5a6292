//! Resumable, stepwise materialization walks.
//!
//! A walk plans which states to visit and, for each, which already
//! materialized parent provides the basis token. It is driven one step at a
//! time: [`OverlayWalk::next_job`] hands out the next request,
//! the caller produces media however it likes (blocking, async, rate
//! limited), then reports back with [`OverlayWalk::complete`] or
//! [`OverlayWalk::fail`]. Stopping early is just not asking for the next
//! job; the overlay stays valid.
//!
//! Walks are idempotent. States that already have media are skipped, so
//! rerunning a walk after a failure only generates what is missing. A state
//! whose parent has no media is blocked rather than generated without its
//! basis, and picked up by a later walk.

use core::fmt;
use std::collections::VecDeque;

use hashbrown::HashSet;
use worldbench_graph::prelude::*;

use crate::error::{MediaError, MediaGenerationError};
use crate::generator::{MediaGenerator, MediaRequest, MediaSubject};
use crate::overlay::{OverlayGraph, OverlayKind};
use crate::token::MediaToken;

/// Which states a walk visits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkStrategy {
    /// The canonical path only; each state's parent is its path predecessor.
    #[default]
    CanonicalPath,
    /// Every state reachable from the initial state, breadth first; each
    /// state's parent is the state it was discovered from.
    FullWorld,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedStep {
    state: StateId,
    parent: Option<(StateId, ActionId)>,
}

impl WalkStrategy {
    fn plan(self, source: &WorldGraph) -> Vec<PlannedStep> {
        let initial = PlannedStep {
            state: source.initial_state_id().clone(),
            parent: None,
        };
        let mut plan = vec![initial];
        match self {
            WalkStrategy::CanonicalPath => {
                if let Some(path) = source.canonical_path() {
                    plan.extend(path.transitions().iter().map(|t| PlannedStep {
                        state: t.end().clone(),
                        parent: Some((t.start().clone(), t.action().clone())),
                    }));
                }
            }
            WalkStrategy::FullWorld => {
                let mut discovered: HashSet<_> = HashSet::from([source.initial_state_id()]);
                let mut queue = VecDeque::from([source.initial_state_id()]);
                while let Some(current) = queue.pop_front() {
                    for t in source.outgoing(current.as_str()) {
                        if discovered.insert(t.end()) {
                            plan.push(PlannedStep {
                                state: t.end().clone(),
                                parent: Some((current.clone(), t.action().clone())),
                            });
                            queue.push_back(t.end());
                        }
                    }
                }
            }
        }
        plan
    }
}

/// One pending generation, handed out by [`OverlayWalk::next_job`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaJob {
    state_id: StateId,
    description: String,
    parent: Option<(StateId, ActionId)>,
    basis: Option<MediaToken>,
}

impl MediaJob {
    /// Returns the state to materialize.
    #[must_use]
    pub fn state_id(&self) -> &StateId {
        &self.state_id
    }

    /// Returns the parent whose media is the basis.
    #[must_use]
    pub fn parent_state_id(&self) -> Option<&StateId> {
        self.parent.as_ref().map(|(state, _)| state)
    }

    /// Returns the basis token, `None` for the initial state.
    #[must_use]
    pub fn basis(&self) -> Option<&MediaToken> {
        self.basis.as_ref()
    }

    /// Returns the request to send to a [`MediaGenerator`].
    #[must_use]
    pub fn request(&self) -> MediaRequest<'_> {
        MediaRequest {
            subject: MediaSubject::State(&self.state_id),
            description: &self.description,
            basis: self.basis.as_ref(),
            closing: None,
        }
    }
}

/// What happened to the states a walk visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    materialized: Vec<StateId>,
    skipped: Vec<StateId>,
    failed: Vec<(StateId, MediaGenerationError)>,
    blocked: Vec<StateId>,
}

impl WalkReport {
    /// States that received media during this walk.
    #[must_use]
    pub fn materialized(&self) -> &[StateId] {
        &self.materialized
    }

    /// States that already had media.
    #[must_use]
    pub fn skipped(&self) -> &[StateId] {
        &self.skipped
    }

    /// States whose generation failed, with the collaborator's error.
    #[must_use]
    pub fn failed(&self) -> &[(StateId, MediaGenerationError)] {
        &self.failed
    }

    /// States not attempted because their parent has no media.
    #[must_use]
    pub fn blocked(&self) -> &[StateId] {
        &self.blocked
    }

    /// Returns true if every planned state now has media.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.blocked.is_empty()
    }
}

impl fmt::Display for WalkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} materialized, {} skipped, {} failed, {} blocked",
            self.materialized.len(),
            self.skipped.len(),
            self.failed.len(),
            self.blocked.len()
        )
    }
}

/// A planned walk over a source world.
///
/// # Example
///
/// ```
/// use worldbench_graph::prelude::*;
/// use worldbench_media::{ImageWorld, LabelGenerator, MediaGenerator, OverlayWalk, WalkStrategy};
///
/// let mut world = WorldGraph::new("lamp", State::new("s0", "Lamp off")?)?;
/// world
///     .add_goal_state(State::new("s1", "Lamp on")?)?
///     .add_action(Action::new("a0", "Flip the switch")?)?
///     .add_transition(Transition::new("s0", "a0", "s1"))?;
///
/// let mut images = ImageWorld::for_world(&world);
/// let mut generator = LabelGenerator::default();
/// let mut walk = OverlayWalk::new(&world, WalkStrategy::CanonicalPath);
/// while let Some(job) = walk.next_job(&images)? {
///     match generator.generate(&job.request()) {
///         Ok(token) => walk.complete(&mut images, job, token)?,
///         Err(error) => walk.fail(job, error),
///     }
/// }
///
/// assert!(walk.report().is_complete());
/// assert_eq!(images.token("s1").map(|t| t.as_str()), Some("s1.png"));
/// assert_eq!(images.state("s1").and_then(|s| s.basis_token()).map(|t| t.as_str()), Some("s0.png"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct OverlayWalk<'w> {
    source: &'w WorldGraph,
    strategy: WalkStrategy,
    plan: Vec<PlannedStep>,
    cursor: usize,
    report: WalkReport,
}

impl<'w> OverlayWalk<'w> {
    /// Plans a walk over `source`.
    #[must_use]
    pub fn new(source: &'w WorldGraph, strategy: WalkStrategy) -> Self {
        let plan = strategy.plan(source);
        tracing::debug!(world = %source.name(), ?strategy, planned = plan.len(), "planned walk");
        Self {
            source,
            strategy,
            plan,
            cursor: 0,
            report: WalkReport::default(),
        }
    }

    /// Returns the walk strategy.
    #[must_use]
    pub fn strategy(&self) -> WalkStrategy {
        self.strategy
    }

    /// Returns the planned state ids in visiting order.
    pub fn planned(&self) -> impl ExactSizeIterator<Item = &StateId> + '_ {
        self.plan.iter().map(|step| &step.state)
    }

    /// Returns the number of planned states not yet visited.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.plan.len() - self.cursor
    }

    /// Returns the report so far.
    #[must_use]
    pub fn report(&self) -> &WalkReport {
        &self.report
    }

    /// Consumes the walk and returns its report.
    #[must_use]
    pub fn into_report(self) -> WalkReport {
        self.report
    }

    /// Returns the next state that needs media, or `None` when the walk is done.
    ///
    /// Planned states that already have media are recorded as skipped and
    /// states whose parent has none as blocked. Complete or fail each job
    /// before asking for the next one, so its children see the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::SourceMismatch`] if `overlay` belongs to another world.
    pub fn next_job<K>(&mut self, overlay: &OverlayGraph<K>) -> Result<Option<MediaJob>, MediaError>
    where
        K: OverlayKind,
    {
        overlay.ensure_source(self.source)?;
        while let Some(step) = self.plan.get(self.cursor) {
            self.cursor += 1;
            if overlay.is_materialized(step.state.as_str()) {
                self.report.skipped.push(step.state.clone());
                continue;
            }
            let basis = match &step.parent {
                None => None,
                Some((parent, _)) => {
                    let Some(token) = overlay.token(parent.as_str()) else {
                        tracing::debug!(state = %step.state, %parent, "parent has no media, blocked");
                        self.report.blocked.push(step.state.clone());
                        continue;
                    };
                    Some(token.clone())
                }
            };
            let state = self
                .source
                .state(step.state.as_str())
                .ok_or_else(|| GraphError::unknown_state(&step.state, "walk"))?;
            return Ok(Some(MediaJob {
                state_id: step.state.clone(),
                description: state.description().to_owned(),
                parent: step.parent.clone(),
                basis,
            }));
        }
        Ok(None)
    }

    /// Records the media produced for `job`.
    ///
    /// If the state got media in the meantime, for example from another walk
    /// over the same overlay, the existing token is kept, `token` is dropped
    /// and the state is reported as skipped.
    ///
    /// # Errors
    ///
    /// - [`MediaError::SourceMismatch`] if `overlay` belongs to another world
    /// - [`MediaError::Graph`] if the job's state is not in the source world
    pub fn complete<K>(
        &mut self,
        overlay: &mut OverlayGraph<K>,
        job: MediaJob,
        token: MediaToken,
    ) -> Result<(), MediaError>
    where
        K: OverlayKind,
    {
        overlay.ensure_source(self.source)?;
        let state = self
            .source
            .state(job.state_id.as_str())
            .ok_or_else(|| GraphError::unknown_state(&job.state_id, "walk"))?;
        if overlay.is_materialized(job.state_id.as_str()) {
            tracing::debug!(state = %job.state_id, "already materialized, keeping existing media");
            self.report.skipped.push(job.state_id);
            return Ok(());
        }
        overlay.record_state(self.source, state, job.parent, job.basis, token);
        self.report.materialized.push(job.state_id);
        Ok(())
    }

    /// Records that generation failed for `job`. The state stays without
    /// media and its children are blocked for the rest of this walk.
    pub fn fail(&mut self, job: MediaJob, error: MediaGenerationError) {
        tracing::warn!(state = %job.state_id, %error, "media generation failed");
        self.report.failed.push((job.state_id, error));
    }

    /// Runs one job with a synchronous generator.
    ///
    /// Returns the id of the state that was attempted and whether it got
    /// media, or `None` when the walk is done.
    ///
    /// # Errors
    ///
    /// Same as [`next_job`](Self::next_job) and [`complete`](Self::complete).
    /// Generator failures are recorded, not returned.
    pub fn step<K, G>(
        &mut self,
        overlay: &mut OverlayGraph<K>,
        generator: &mut G,
    ) -> Result<Option<(StateId, bool)>, MediaError>
    where
        K: OverlayKind,
        G: MediaGenerator + ?Sized,
    {
        let Some(job) = self.next_job(overlay)? else {
            return Ok(None);
        };
        let state = job.state_id.clone();
        match generator.generate(&job.request()) {
            Ok(token) => {
                self.complete(overlay, job, token)?;
                Ok(Some((state, true)))
            }
            Err(error) => {
                self.fail(job, error);
                Ok(Some((state, false)))
            }
        }
    }

    /// Runs the walk to the end with a synchronous generator.
    ///
    /// # Errors
    ///
    /// Same as [`step`](Self::step).
    pub fn run<K, G>(
        mut self,
        overlay: &mut OverlayGraph<K>,
        generator: &mut G,
    ) -> Result<WalkReport, MediaError>
    where
        K: OverlayKind,
        G: MediaGenerator + ?Sized,
    {
        while self.step(overlay, generator)?.is_some() {}
        tracing::info!(
            world = %self.source.name(),
            overlay = %overlay.name(),
            strategy = ?self.strategy,
            report = %self.report,
            "walk finished"
        );
        Ok(self.into_report())
    }
}

/// Walks `source` with `strategy` and materializes every planned state that
/// has no media yet.
///
/// Rerunning after failures resumes: states with media are never sent to the
/// generator again.
///
/// # Errors
///
/// Same as [`OverlayWalk::run`].
pub fn walk_and_materialize<K, G>(
    source: &WorldGraph,
    overlay: &mut OverlayGraph<K>,
    strategy: WalkStrategy,
    generator: &mut G,
) -> Result<WalkReport, MediaError>
where
    K: OverlayKind,
    G: MediaGenerator + ?Sized,
{
    OverlayWalk::new(source, strategy).run(overlay, generator)
}
