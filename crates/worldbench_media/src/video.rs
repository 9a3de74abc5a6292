//! The video pass: one clip per overlay transition.

use core::fmt;

use worldbench_graph::prelude::*;

use crate::error::MediaGenerationError;
use crate::generator::{MediaGenerator, MediaRequest, MediaSubject};
use crate::overlay::{ImageWorld, OverlayGraph, VideoWorld};
use crate::walk::WalkStrategy;

/// What happened to the transitions a video pass visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipReport {
    generated: Vec<(StateId, ActionId)>,
    skipped: Vec<(StateId, ActionId)>,
    failed: Vec<((StateId, ActionId), MediaGenerationError)>,
}

impl ClipReport {
    /// Transitions that received a clip during this pass.
    #[must_use]
    pub fn generated(&self) -> &[(StateId, ActionId)] {
        &self.generated
    }

    /// Transitions that already had a clip.
    #[must_use]
    pub fn skipped(&self) -> &[(StateId, ActionId)] {
        &self.skipped
    }

    /// Transitions whose clip failed, with the collaborator's error.
    #[must_use]
    pub fn failed(&self) -> &[((StateId, ActionId), MediaGenerationError)] {
        &self.failed
    }

    /// Returns true if no clip failed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for ClipReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} generated, {} skipped, {} failed",
            self.generated.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

impl VideoWorld {
    /// Starts a video overlay from an image overlay. States and transitions
    /// are copied; no transition has a clip yet.
    #[must_use]
    pub fn from_image_world(images: &ImageWorld) -> Self {
        let mut video = OverlayGraph::new(images.name(), images.source_world_name());
        video.states = images.states.clone();
        video.transitions = images
            .transitions
            .iter()
            .map(|(key, t)| {
                let mut t = t.clone();
                t.media_token = None;
                (key.clone(), t)
            })
            .collect();
        video
    }

    /// Generates a clip for every transition that has none.
    ///
    /// Each request opens on the start state's image (`basis`) and closes on
    /// the end state's image (`closing`). With
    /// [`WalkStrategy::CanonicalPath`] only transitions that led to their
    /// end state's materialization are visited; with
    /// [`WalkStrategy::FullWorld`] all of them are. Failures are recorded and
    /// the pass continues, so rerunning it only retries what is missing.
    pub fn materialize_transitions<G>(
        &mut self,
        strategy: WalkStrategy,
        generator: &mut G,
    ) -> ClipReport
    where
        G: MediaGenerator + ?Sized,
    {
        let mut report = ClipReport::default();
        for index in 0..self.transitions.len() {
            let Some((key, transition)) = self.transitions.get_index(index) else {
                break;
            };
            let (Some(start), Some(end)) = (
                self.states.get(&transition.start),
                self.states.get(&transition.end),
            ) else {
                continue;
            };
            let is_parent_edge = end.parent_state_id.as_ref() == Some(&transition.start)
                && end.parent_action_id.as_ref() == Some(&transition.action);
            if strategy == WalkStrategy::CanonicalPath && !is_parent_edge {
                continue;
            }
            if transition.media_token.is_some() {
                report.skipped.push(key.clone());
                continue;
            }

            let request = MediaRequest {
                subject: MediaSubject::Transition {
                    start: &transition.start,
                    action: &transition.action,
                    end: &transition.end,
                },
                description: &transition.action_description,
                basis: Some(&start.media_token),
                closing: Some(&end.media_token),
            };
            let key = key.clone();
            match generator.generate(&request) {
                Ok(token) => {
                    tracing::debug!(transition = %transition, %token, "generated clip");
                    if let Some((_, t)) = self.transitions.get_index_mut(index) {
                        t.media_token = Some(token);
                    }
                    report.generated.push(key);
                }
                Err(error) => {
                    tracing::warn!(transition = %transition, %error, "clip generation failed");
                    report.failed.push((key, error));
                }
            }
        }
        tracing::info!(overlay = %self.name(), report = %report, "video pass finished");
        report
    }
}
