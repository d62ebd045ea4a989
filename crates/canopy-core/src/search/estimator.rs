//! Candidate value estimation.

use crate::budget::Usage;
use crate::error::Result;
use crate::extract::extract_object;
use crate::generator::{GenOptions, Generator};
use crate::prompts;
use std::sync::Arc;

/// Scores a candidate continuation's estimated quality mean and uncertainty.
pub struct ValueEstimator {
    backend: Option<Arc<dyn Generator>>,
}

impl ValueEstimator {
    /// Stub estimator: fixed (0.35, 0.5) at zero cost, for cost-free runs.
    pub fn stub() -> Self {
        Self { backend: None }
    }

    /// Backed estimator issuing one deterministic call per candidate.
    pub fn backed(backend: Arc<dyn Generator>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Score a candidate for a task, returning (mu, sigma, usage).
    ///
    /// Parse failures never propagate: missing or unparseable fields
    /// default to 0.5.
    pub fn score(&self, task: &str, candidate: &str) -> Result<(f64, f64, Usage)> {
        let Some(backend) = &self.backend else {
            return Ok((0.35, 0.5, Usage::ZERO));
        };
        let prompt = prompts::render(
            prompts::EVALUATOR,
            &[("task", task), ("candidate", candidate)],
        );
        let (text, usage) = backend.generate(&prompt, &GenOptions::deterministic(64))?;
        let (mu, sigma) = match extract_object(&text) {
            Some(value) => (
                value.get("mu").and_then(|v| v.as_f64()).unwrap_or(0.5),
                value.get("sigma").and_then(|v| v.as_f64()).unwrap_or(0.5),
            ),
            None => (0.5, 0.5),
        };
        Ok((mu, sigma, usage))
    }
}
