//! Linear-to-branching expansion of worldbench worlds.
//!
//! A linear world is a single path from the initial state to a goal. This
//! crate turns it into a branching world with a target number of states,
//! endings and branch points while keeping the original path intact:
//!
//! - [`linear_path`] / [`is_linear`] - recognise expandable worlds
//! - [`ExpansionConfig`] - the shape of the result
//! - [`expand`] - the expansion itself
//! - [`BranchSynthesizer`] - where the text of new states and actions comes
//!   from; [`TemplateSynthesizer`] works offline
//!
//! # Example
//!
//! ```
//! use worldbench_expand::{ExpansionConfig, TemplateSynthesizer, expand, is_linear};
//! use worldbench_graph::prelude::*;
//!
//! let mut world = WorldGraph::new("bike_linear", State::new("s0", "Flat tyre")?)?;
//! world
//!     .add_state(State::new("s1", "Tube patched")?)?
//!     .add_goal_state(State::new("s2", "Tyre inflated")?)?
//!     .add_action(Action::new("a0", "Patch the tube")?)?
//!     .add_action(Action::new("a1", "Pump it up")?)?
//!     .add_transition(Transition::new("s0", "a0", "s1"))?
//!     .add_transition(Transition::new("s1", "a1", "s2"))?;
//! assert!(is_linear(&world));
//!
//! let branching = expand(&world, &ExpansionConfig::new(8, 3, 2), &mut TemplateSynthesizer)?;
//! assert!(!is_linear(&branching));
//! assert_eq!(branching.branch_points().len(), 2);
//! assert!(branching.validate().is_ok());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Expansion targets.
pub mod config;

/// Error types.
pub mod error;

/// The expansion algorithm.
pub mod expand;

/// Id allocation for synthesized entities.
pub mod ids;

/// Linearity checks.
pub mod linear;

/// Content synthesis seam.
pub mod synth;

pub use config::ExpansionConfig;
pub use error::{ExpansionError, SynthesisError};
pub use expand::expand;
pub use ids::IdAllocator;
pub use linear::{is_linear, linear_path};
pub use synth::{
    ActionContent, BranchSynthesizer, Deviation, DeviationRequest, EndingRequest, StateContent,
    StepRequest, TemplateSynthesizer,
};
