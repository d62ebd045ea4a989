//! # Canopy
//!
//! Adaptive tree-search controller for multi-step text generation.
//!
//! Canopy drives a text generator through rounds of exploration under
//! global budgets:
//! - **Self-tuned controls**: each round's sampling parameters come from
//!   the generator itself, validated and trust-region projected
//! - **Directive labels**: frozen, seeded-random, or model-proposed
//!   exploration directives per round
//! - **Uncertainty-weighted selection**: survivors maximize
//!   `mu + beta_eff * sigma` with depth-decayed exploration weight
//! - **Budget discipline**: token, depth, and expansion caps with at most
//!   one round of overshoot
//!
//! ## Quick Start
//!
//! ```rust
//! use canopy::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let engine = Engine::builder()
//!         .backend("stub:tiny")
//!         .verify(true)
//!         .build()?;
//!
//!     let outcome = engine.run("What is 6 * 7?", Some("42"))?;
//!     println!("{:?}", outcome.final_text);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Re-export core crate
pub use canopy_core::*;

mod backend;
mod engine;

pub use backend::{backend_from_spec, BackendKind};
pub use engine::{Engine, EngineBuilder, EngineConfig, LabelPolicy};

/// Commonly used types.
pub mod prelude {
    pub use crate::backend::{backend_from_spec, BackendKind};
    pub use crate::engine::{Engine, EngineBuilder, EngineConfig, LabelPolicy};
    pub use canopy_core::prelude::*;

    // Re-export useful external types
    pub use anyhow;
    pub use tracing;
}
