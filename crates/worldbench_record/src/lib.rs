//! Portable records for worldbench worlds.
//!
//! This crate converts a [`WorldGraph`](worldbench_graph::WorldGraph) to and
//! from a plain, serializable [`WorldRecord`] and defines the
//! [`RecordStore`] seam through which records reach a storage medium.
//!
//! - [`to_record`] / [`from_record`] - typed conversion
//! - [`to_json`] / [`from_json`], [`to_value`] / [`from_value`] - JSON helpers
//! - [`save_world`] / [`load_world`] - persistence through a [`RecordStore`]
//!
//! Round-trip law: `from_record(&to_record(&w))` equals `w` for every
//! well-formed world.
//!
//! # Example
//!
//! ```
//! use worldbench_graph::prelude::*;
//! use worldbench_record::{MemoryStore, load_world, save_world};
//!
//! let mut world = WorldGraph::new("note", State::new("s0", "Blank page")?)?;
//! world
//!     .add_goal_state(State::new("s1", "Page with a note")?)?
//!     .add_action(Action::new("a0", "Write a note")?)?
//!     .add_transition(Transition::new("s0", "a0", "s1"))?;
//!
//! let store = MemoryStore::new();
//! save_world(&store, "note", &world)?;
//! assert_eq!(load_world(&store, "note")?, world);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Conversion between worlds and records.
pub mod convert;

/// Record error type.
pub mod error;

/// Serializable record types.
pub mod schema;

/// Persistence seam.
pub mod store;

pub use convert::{from_json, from_record, from_value, to_json, to_record, to_value};
pub use error::RecordError;
pub use schema::{ActionRecord, KindRecord, StateRecord, TransitionRecord, WorldRecord};
pub use store::{MemoryStore, RecordStore, load_world, save_world};
