//! # Worldbench Internal Library
//!
//! Re-exports the worldbench crates for convenience.

/// Logging configuration.
pub use worldbench_core;

/// Layer 1: world graph model, invariants and traversal.
pub use worldbench_graph;

/// Layer 2: portable records and persistence.
pub use worldbench_record;

/// Layer 2: linear-to-branching expansion.
pub use worldbench_expand;

/// Layer 3: media overlays and materialization walks.
pub use worldbench_media;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use worldbench_core::{TracingConfig, TracingFormat};
    pub use worldbench_expand::{BranchSynthesizer, ExpansionConfig, TemplateSynthesizer, expand};
    pub use worldbench_graph::prelude::*;
    pub use worldbench_media::{
        ImageWorld, MediaGenerator, MediaToken, OverlayWalk, VideoWorld, WalkStrategy,
        walk_and_materialize,
    };
    pub use worldbench_record::{RecordStore, WorldRecord, from_record, to_record};
}
