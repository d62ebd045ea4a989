//! Control-vector schema: the bounded generation/search hyperparameters
//! tuned per directive.
//!
//! A proposed vector is accepted only if every scalar lies within its
//! declared bound range; any parse or bound failure substitutes the whole
//! baseline vector. There is no per-field repair.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod project;
mod quantize;

pub use project::trust_region_project;
pub use quantize::quantize_controls;

/// The tunable hyperparameters for one expansion round under one directive.
///
/// Immutable once emitted by the tuner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlVector {
    /// Sampling temperature for candidate generation.
    pub temperature: f64,
    /// Nucleus sampling cutoff.
    pub top_p: f64,
    /// Completion length cap per candidate.
    pub max_tokens: u32,
    /// Repetition penalty passed to the backend.
    pub repetition_penalty: f64,
    /// Candidates generated under this directive.
    pub gen_count: u32,
    /// Survivors this directive argues for keeping.
    pub branch_quota: u32,
    /// Base exploration weight before depth decay.
    pub beta: f64,
    /// Verification passes requested for a terminal leaf.
    pub verify_passes: u32,
    /// Verification strictness in [0, 1].
    pub verify_strictness: f64,
    /// Per-category retrieval weights in [0, 1]. Ordered map so the
    /// canonical JSON rendering is stable.
    #[serde(default)]
    pub retrieval_weights: BTreeMap<String, f64>,
}

impl ControlVector {
    /// The fixed baseline vector P0: trust-region center and universal
    /// fallback for any invalid or unparseable proposal.
    pub fn baseline() -> Self {
        let mut retrieval_weights = BTreeMap::new();
        retrieval_weights.insert("general".to_string(), 0.0);
        retrieval_weights.insert("math-lemmas".to_string(), 0.0);
        Self {
            temperature: 0.2,
            top_p: 0.9,
            max_tokens: 128,
            repetition_penalty: 1.0,
            gen_count: 1,
            branch_quota: 2,
            beta: 0.15,
            verify_passes: 1,
            verify_strictness: 0.5,
            retrieval_weights,
        }
    }

    /// Check every scalar field against its bound range. NaN fails.
    pub fn validate(&self, bounds: &ControlBounds) -> bool {
        let in_f = |v: f64, (lo, hi): (f64, f64)| v >= lo && v <= hi;
        let in_u = |v: u32, (lo, hi): (u32, u32)| v >= lo && v <= hi;
        in_f(self.temperature, bounds.temperature)
            && in_f(self.top_p, bounds.top_p)
            && in_u(self.max_tokens, bounds.max_tokens)
            && in_f(self.repetition_penalty, bounds.repetition_penalty)
            && in_u(self.gen_count, bounds.gen_count)
            && in_u(self.branch_quota, bounds.branch_quota)
            && in_f(self.beta, bounds.beta)
            && in_u(self.verify_passes, bounds.verify_passes)
            && in_f(self.verify_strictness, bounds.verify_strictness)
    }

    /// Deserialize and bound-check a proposed object.
    ///
    /// Any type, parse, or bound failure yields the baseline wholesale.
    pub fn validate_or_baseline(
        value: serde_json::Value,
        p0: &ControlVector,
        bounds: &ControlBounds,
    ) -> ControlVector {
        match serde_json::from_value::<ControlVector>(value) {
            Ok(cv) if cv.validate(bounds) => cv,
            _ => p0.clone(),
        }
    }

    /// Clip each retrieval weight to [0, 1]; renormalize to sum 1 only when
    /// the clipped sum exceeds 1, otherwise leave the weights as-is.
    pub fn normalize_weights(&mut self) {
        for w in self.retrieval_weights.values_mut() {
            *w = w.clamp(0.0, 1.0);
        }
        let total: f64 = self.retrieval_weights.values().sum();
        if total > 1.0 {
            for w in self.retrieval_weights.values_mut() {
                *w /= total;
            }
        }
    }
}

/// Closed bound ranges, one per scalar field.
#[derive(Debug, Clone)]
pub struct ControlBounds {
    /// Range for `temperature`.
    pub temperature: (f64, f64),
    /// Range for `top_p`.
    pub top_p: (f64, f64),
    /// Range for `max_tokens`.
    pub max_tokens: (u32, u32),
    /// Range for `repetition_penalty`.
    pub repetition_penalty: (f64, f64),
    /// Range for `gen_count`.
    pub gen_count: (u32, u32),
    /// Range for `branch_quota`.
    pub branch_quota: (u32, u32),
    /// Range for `beta`.
    pub beta: (f64, f64),
    /// Range for `verify_passes`.
    pub verify_passes: (u32, u32),
    /// Range for `verify_strictness`.
    pub verify_strictness: (f64, f64),
}

impl Default for ControlBounds {
    fn default() -> Self {
        Self {
            temperature: (0.0, 1.0),
            top_p: (0.0, 1.0),
            max_tokens: (32, 512),
            repetition_penalty: (0.0, 2.0),
            gen_count: (1, 8),
            branch_quota: (1, 8),
            beta: (0.0, 1.0),
            verify_passes: (0, 5),
            verify_strictness: (0.0, 1.0),
        }
    }
}

/// Map a value into [0, 1] over a bound range. Degenerate ranges map to 0.
pub(crate) fn norm(v: f64, (lo, hi): (f64, f64)) -> f64 {
    if hi == lo {
        0.0
    } else {
        (v - lo) / (hi - lo)
    }
}

/// Map a normalized value back into a bound range.
pub(crate) fn denorm(t: f64, (lo, hi): (f64, f64)) -> f64 {
    lo + t * (hi - lo)
}
