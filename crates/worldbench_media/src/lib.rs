//! Media overlays for worldbench worlds.
//!
//! An overlay attaches opaque [`MediaToken`]s (image or clip locators) to
//! the states and transitions of a source
//! [`WorldGraph`](worldbench_graph::WorldGraph). Media comes from a
//! [`MediaGenerator`], the seam to whatever image or video model is in use.
//!
//! - [`ImageWorld`] - one image per state, produced by
//!   [`OverlayGraph::materialize_state`] or an [`OverlayWalk`]
//! - [`VideoWorld`] - adds one clip per transition, produced by
//!   [`VideoWorld::materialize_transitions`]
//! - [`OverlayGraph::topology`] - the materialized part as a world, for
//!   every graph query
//!
//! Generators are assumed slow and unreliable. Every operation is memoized
//! per state or transition and resumable after failures, and walks can be
//! driven one job at a time from any execution model.
//!
//! # Example
//!
//! ```
//! use worldbench_graph::prelude::*;
//! use worldbench_media::{ImageWorld, LabelGenerator, VideoWorld, WalkStrategy, walk_and_materialize};
//!
//! let mut world = WorldGraph::new("toast", State::new("s0", "Bread on the board")?)?;
//! world
//!     .add_state(State::new("s1", "Bread in the toaster")?)?
//!     .add_goal_state(State::new("s2", "Golden toast")?)?
//!     .add_action(Action::new("a0", "Load the toaster")?)?
//!     .add_action(Action::new("a1", "Press the lever")?)?
//!     .add_transition(Transition::new("s0", "a0", "s1"))?
//!     .add_transition(Transition::new("s1", "a1", "s2"))?;
//!
//! let mut generator = LabelGenerator::new("toast/");
//! let mut images = ImageWorld::for_world(&world);
//! let report = walk_and_materialize(&world, &mut images, WalkStrategy::FullWorld, &mut generator)?;
//! assert!(report.is_complete());
//! assert_eq!(images.transition_count(), 2);
//!
//! let mut video = VideoWorld::from_image_world(&images);
//! video.materialize_transitions(WalkStrategy::FullWorld, &mut generator);
//! let clip = video.transition("s1", "a1").and_then(|t| t.media_token());
//! assert_eq!(clip.map(|t| t.as_str()), Some("toast/s1--a1--s2.mp4"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Error types.
pub mod error;

/// Media-generation collaborator seam.
pub mod generator;

/// Overlay graphs.
pub mod overlay;

/// Overlay records.
pub mod record;

/// Media tokens.
pub mod token;

/// The video pass.
pub mod video;

/// Stepwise materialization walks.
pub mod walk;

pub use error::{MediaError, MediaGenerationError};
pub use generator::{LabelGenerator, MediaGenerator, MediaRequest, MediaSubject};
pub use overlay::{
    Image, ImageWorld, OverlayGraph, OverlayKind, OverlayState, OverlayTransition, Video,
    VideoWorld,
};
pub use record::{OverlayRecord, OverlayStateRecord, OverlayTransitionRecord};
pub use token::MediaToken;
pub use video::ClipReport;
pub use walk::{MediaJob, OverlayWalk, WalkReport, WalkStrategy, walk_and_materialize};
