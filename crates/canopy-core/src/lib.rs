//! # Canopy Core
//!
//! Adaptive, budget-constrained tree-search controller for multi-step text
//! generation.
//!
//! This crate provides:
//! - **Control-vector schema** with validation, trust-region projection,
//!   and quantization around a fixed baseline
//! - **Round-based search controller** under global token, depth, and
//!   expansion budgets
//! - **Uncertainty-weighted selection** of surviving candidates
//! - **Bounded ledger** of past rounds rendered into tuning prompts
//! - **Majority-vote verification** of the terminal leaf
//!
//! The generation backend is an opaque capability ([`generator::Generator`]);
//! selection is deterministic given scores, with no semantic guarantee on
//! the generated text itself.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod budget;
pub mod config;
pub mod context;
pub mod control;
pub mod error;
pub mod eval;
pub mod extract;
pub mod generator;
pub mod ledger;
pub mod prompts;
pub mod retrieval;
pub mod search;
pub mod verify;

pub use error::{CanopyError, Result};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::budget::{TokenBudget, Usage};
    pub use crate::config::{BetaDecay, SearchLimits, TERMINAL_MARKER};
    pub use crate::context::Context;
    pub use crate::control::{ControlBounds, ControlVector};
    pub use crate::error::{CanopyError, Result};
    pub use crate::generator::{GenOptions, Generator, StubGenerator};
    pub use crate::ledger::{Ledger, LedgerRow};
    pub use crate::search::{
        Candidate, ControlTuner, Labeller, PolicySnapshot, RunOutcome, SearchController,
        ValueEstimator, VerifierControl,
    };
    pub use crate::verify::Verifier;
}
