//! World graph model for worldbench.
//!
//! `worldbench_graph` defines the benchmark "world": a finite, directed graph
//! of natural-language states connected by action-labelled transitions, with
//! a designated initial state and a set of goal and failure endings.
//!
//! # Core Concepts
//!
//! - [`State`], [`Action`], [`Transition`] - immutable entity records
//! - [`WorldGraph`] - owns the entities and enforces structural invariants
//! - [`Paths`] - lazy simple-path enumeration
//! - [`ValidationReport`] - soft diagnostics for authored or generated worlds
//! - [`Explorer`] - step-by-step walk through a world
//!
//! # Example
//!
//! ```
//! use worldbench_graph::prelude::*;
//!
//! let mut world = WorldGraph::new("desk", State::new("s0", "Unopened box")?)?;
//! world
//!     .add_state(State::new("s1", "Parts laid out")?.with_progress(0.5))?
//!     .add_goal_state(State::new("s2", "Desk assembled")?.with_progress(1.0))?
//!     .add_action(Action::new("a0", "Open the box")?)?
//!     .add_action(Action::new("a1", "Assemble the desk")?)?
//!     .add_transition(Transition::new("s0", "a0", "s1"))?
//!     .add_transition(Transition::new("s1", "a1", "s2"))?;
//!
//! assert!(world.validate().is_clean());
//! assert_eq!(world.all_paths().count(), 1);
//! # Ok::<(), GraphError>(())
//! ```
//!
//! # Architecture
//!
//! This crate is the base layer of worldbench:
//!
//! - **`worldbench_graph`**: world model, invariants, traversal (this crate)
//! - **`worldbench_record`**: portable records and persistence seam
//! - **`worldbench_expand`**: linear-to-branching expansion
//! - **`worldbench_media`**: media overlays and resumable materialization

/// Action entity and id.
pub mod action;

/// Structural error type.
pub mod error;

/// Step-by-step exploration.
pub mod explorer;

/// World graph structure and construction API.
pub mod graph;

/// State entity, id and classification.
pub mod state;

/// Aggregate world statistics.
pub mod summary;

/// Transition entity.
pub mod transition;

/// Simple-path enumeration.
pub mod traversal;

/// Soft validation report.
pub mod validation;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::action::{Action, ActionId};
    pub use crate::error::{EntityKind, GraphError};
    pub use crate::explorer::{Explorer, Outcome};
    pub use crate::graph::WorldGraph;
    pub use crate::state::{State, StateId, StateKind};
    pub use crate::summary::WorldSummary;
    pub use crate::transition::Transition;
    pub use crate::traversal::{Path, Paths};
    pub use crate::validation::{Diagnostic, Severity, ValidationReport};
}

pub use prelude::*;
