//! IKEA desk demo built with worldbench.
//!
//! Builds the linear desk-assembly world, expands it into a branching world,
//! then materializes an image for every state and a clip for every
//! transition with an offline [`LabelGenerator`].
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌────────┐   ┌──────────┐   ┌──────────┐   ┌────────────┐
//! │ desk_world() │──▶│ expand │──▶│ validate │──▶│ image    │──▶│ video pass │
//! │ (linear)     │   │        │   │          │   │ walk     │   │            │
//! └──────────────┘   └────────┘   └──────────┘   └──────────┘   └────────────┘
//! ```

use worldbench_expand::{ExpansionConfig, ExpansionError, TemplateSynthesizer, expand};
use worldbench_graph::prelude::*;
use worldbench_media::{
    ClipReport, ImageWorld, LabelGenerator, MediaError, VideoWorld, WalkReport, WalkStrategy,
    walk_and_materialize,
};
use worldbench_record::{MemoryStore, RecordError, load_world, save_world};

/// Store key the branching world is saved under.
pub const STORE_KEY: &str = "ikea_desk_branching";

const DESK_STEPS: [(&str, &str, &str); 6] = [
    (
        "Flat-pack box sealed on the floor",
        "Open the box and lay out the parts",
        "unpacking",
    ),
    (
        "Parts laid out and counted",
        "Attach the legs to the desktop",
        "assembly",
    ),
    (
        "Legs attached, desk upside down",
        "Fit the cross brace",
        "assembly",
    ),
    ("Cross brace fitted", "Flip the desk upright", "handling"),
    ("Desk upright but wobbly", "Tighten every cam lock", "assembly"),
    (
        "Desk sturdy, drawer missing",
        "Slide the drawer into its runners",
        "assembly",
    ),
];

/// Errors raised by the demo pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Building the desk world failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Expansion rejected the configuration.
    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    /// The expanded world has structural errors.
    #[error("expanded world is invalid:\n{0}")]
    Invalid(ValidationReport),

    /// Materialization failed.
    #[error(transparent)]
    Media(#[from] MediaError),

    /// Saving or reloading the world failed.
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Everything the demo produces.
#[derive(Debug)]
pub struct DemoRun {
    /// The expanded world, as reloaded from the store.
    pub world: WorldGraph,
    /// One image per state.
    pub images: ImageWorld,
    /// Images plus one clip per transition.
    pub video: VideoWorld,
    /// Outcome of the image walk.
    pub walk: WalkReport,
    /// Outcome of the video pass.
    pub clips: ClipReport,
}

/// The linear desk assembly: `s0 -a0-> s1 ... -a5-> s6`, with `s6` the goal.
///
/// # Errors
///
/// Only fails if the fixed step table breaks a graph invariant.
pub fn desk_world() -> Result<WorldGraph, GraphError> {
    let steps = DESK_STEPS.len();
    let progress = |i: usize| i as f64 / steps as f64;

    let mut world = WorldGraph::new(
        "ikea_desk_linear",
        State::new("s0", DESK_STEPS[0].0)?.with_progress(0.0),
    )?
    .with_description("Assemble a flat-pack desk");

    for (i, (description, _, _)) in DESK_STEPS.iter().enumerate().skip(1) {
        world.add_state(State::new(format!("s{i}"), *description)?.with_progress(progress(i)))?;
    }
    world.add_goal_state(
        State::new(format!("s{steps}"), "Desk assembled with drawer in place")?
            .with_progress(1.0)
            .with_quality(9.0)
            .with_kind(StateKind::Goal),
    )?;

    for (i, (_, action, action_type)) in DESK_STEPS.iter().enumerate() {
        world
            .add_action(Action::new(format!("a{i}"), *action)?.with_action_type(*action_type))?
            .add_transition(Transition::new(
                format!("s{i}"),
                format!("a{i}"),
                format!("s{}", i + 1),
            ))?;
    }
    Ok(world)
}

/// Runs the whole pipeline with the given expansion targets.
///
/// The expanded world goes through a [`MemoryStore`] and is reloaded before
/// materialization, so media is attached to exactly what was persisted.
///
/// # Errors
///
/// Returns [`DemoError::Invalid`] if the expanded world has structural
/// errors, or the first error of any other stage.
pub fn run(config: &ExpansionConfig) -> Result<DemoRun, DemoError> {
    let linear = desk_world()?;
    let branching = expand(&linear, config, &mut TemplateSynthesizer)?;

    let report = branching.validate();
    for warning in report.warnings() {
        tracing::warn!(%warning, "expanded world");
    }
    if !report.is_ok() {
        return Err(DemoError::Invalid(report));
    }

    let store = MemoryStore::new();
    save_world(&store, STORE_KEY, &branching)?;
    let world = load_world(&store, STORE_KEY)?;
    tracing::info!(key = STORE_KEY, states = world.state_count(), "world stored and reloaded");

    let mut generator = LabelGenerator::new(format!("{}/", world.name()));
    let mut images = ImageWorld::for_world(&world);
    let walk = walk_and_materialize(&world, &mut images, WalkStrategy::FullWorld, &mut generator)?;

    let mut video = VideoWorld::from_image_world(&images);
    let clips = video.materialize_transitions(WalkStrategy::FullWorld, &mut generator);
    tracing::info!(
        images = images.state_count(),
        clips = clips.generated().len(),
        generator_calls = generator.calls(),
        "media materialized"
    );

    Ok(DemoRun {
        world,
        images,
        video,
        walk,
        clips,
    })
}
