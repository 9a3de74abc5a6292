//! The media-generation collaborator seam.

use worldbench_graph::prelude::*;

use crate::error::MediaGenerationError;
use crate::token::MediaToken;

/// What a piece of media depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSubject<'a> {
    /// A still of one state.
    State(&'a StateId),
    /// A clip of one transition.
    Transition {
        /// The state the clip opens on.
        start: &'a StateId,
        /// The action performed.
        action: &'a ActionId,
        /// The state the clip closes on.
        end: &'a StateId,
    },
}

/// One request to the media generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaRequest<'a> {
    /// What is depicted.
    pub subject: MediaSubject<'a>,
    /// Text to render: a state or action description.
    pub description: &'a str,
    /// Media to keep continuity with, passed through unchanged.
    pub basis: Option<&'a MediaToken>,
    /// Media a clip must end on.
    pub closing: Option<&'a MediaToken>,
}

impl<'a> MediaRequest<'a> {
    /// Creates a still request for a state.
    #[must_use]
    pub fn state(state: &'a State, basis: Option<&'a MediaToken>) -> Self {
        Self {
            subject: MediaSubject::State(state.id()),
            description: state.description(),
            basis,
            closing: None,
        }
    }
}

/// Turns descriptions into media.
///
/// Implementations usually call a remote image or video model and may be
/// slow or unreliable. Overlays call the generator at most once per state or
/// transition that succeeds, so a failed call can simply be retried later.
///
/// Any `FnMut(&MediaRequest) -> Result<MediaToken, MediaGenerationError>`
/// closure is a generator.
pub trait MediaGenerator {
    /// Produces media for `request`.
    ///
    /// # Errors
    ///
    /// Returns a [`MediaGenerationError`] if no media could be produced.
    fn generate(&mut self, request: &MediaRequest<'_>) -> Result<MediaToken, MediaGenerationError>;
}

impl<F> MediaGenerator for F
where
    F: FnMut(&MediaRequest<'_>) -> Result<MediaToken, MediaGenerationError>,
{
    fn generate(&mut self, request: &MediaRequest<'_>) -> Result<MediaToken, MediaGenerationError> {
        self(request)
    }
}

/// Generator that names media after their subject, e.g. `s3.png` or
/// `s2--a2--s3.mp4`. Useful offline and in tests.
#[derive(Debug, Clone)]
pub struct LabelGenerator {
    prefix: String,
    calls: usize,
}

impl Default for LabelGenerator {
    fn default() -> Self {
        Self::new("")
    }
}

impl LabelGenerator {
    /// Creates a generator whose tokens start with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            calls: 0,
        }
    }

    /// Returns how many tokens have been produced.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl MediaGenerator for LabelGenerator {
    fn generate(&mut self, request: &MediaRequest<'_>) -> Result<MediaToken, MediaGenerationError> {
        self.calls += 1;
        let label = match request.subject {
            MediaSubject::State(id) => format!("{}{id}.png", self.prefix),
            MediaSubject::Transition { start, action, end } => {
                format!("{}{start}--{action}--{end}.mp4", self.prefix)
            }
        };
        Ok(label.into())
    }
}
