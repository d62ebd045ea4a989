//! Round-based tree search: label, tune, expand, score, select, advance.
//!
//! The search system is built from modular components:
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`Labeller`] | Proposes exploration directives per round |
//! | [`ControlTuner`] | Proposes/validates/projects a control vector per directive |
//! | [`ValueEstimator`] | Scores a candidate's quality mean and uncertainty |
//! | [`select`] | Keeps the top-k candidates by uncertainty-weighted score |
//! | [`SearchController`] | Orchestrates rounds under global budgets |

mod controller;
mod estimator;
mod expand;
mod labeller;
mod select;
mod tuner;

pub use controller::{RunOutcome, SearchController, VerifierControl};
pub use estimator::ValueEstimator;
pub use expand::expand_under_label;
pub use labeller::Labeller;
pub use select::select;
pub use tuner::ControlTuner;

use crate::budget::Usage;
use crate::control::ControlVector;

/// One generated continuation plus its estimated value and score.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The generated continuation text.
    pub text: String,
    /// Estimated quality mean.
    pub mu: f64,
    /// Estimated uncertainty.
    pub sigma: f64,
    /// Selection score: `mu + beta_eff * sigma`.
    pub score: f64,
    /// Token cost of generating this candidate.
    pub usage: Usage,
    /// Directive label the candidate was generated under.
    pub label: String,
    /// Control snapshot the candidate ran under.
    pub pi: PolicySnapshot,
}

/// Snapshot of the control vector a candidate was generated under, plus the
/// depth-decayed exploration weight actually applied.
#[derive(Debug, Clone)]
pub struct PolicySnapshot {
    /// The emitted control vector.
    pub vector: ControlVector,
    /// Effective exploration weight after depth decay.
    pub beta_eff: f64,
}
