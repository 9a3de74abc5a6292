//! World-model graphs for embodied task benchmarks.
//!

pub use worldbench_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use worldbench_internal::prelude::*;
}
