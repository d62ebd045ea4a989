//! High-level search engine.

use crate::backend::backend_from_spec;
use anyhow::Result;
use canopy_core::config::SearchLimits;
use canopy_core::control::ControlVector;
use canopy_core::generator::Generator;
use canopy_core::search::{
    ControlTuner, Labeller, RunOutcome, SearchController, ValueEstimator, VerifierControl,
};
use canopy_core::verify::Verifier;
use std::sync::Arc;

/// Which label source the engine wires into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelPolicy {
    /// A single fixed "default" directive per round.
    Frozen,
    /// Seeded random draws from the built-in directive pool.
    Randomized,
    /// Labels proposed by the generation backend.
    #[default]
    Generative,
}

/// Configuration for the search engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Backend spec, e.g. `"stub:tiny"`.
    pub backend_spec: String,
    /// Maximum total generation token cost per run.
    pub token_budget: u64,
    /// Maximum rounds per run.
    pub max_depth: u32,
    /// Maximum candidates generated per run.
    pub max_total_expansions: u32,
    /// Cap on directives per round.
    pub max_labels: usize,
    /// How round directives are produced.
    pub label_policy: LabelPolicy,
    /// Seed for the randomized label policy.
    pub label_seed: u64,
    /// When true the tuner always returns the baseline vector.
    pub frozen_tuner: bool,
    /// Trust-region radius in normalized bound space; `None` disables
    /// projection.
    pub trust_region: Option<f64>,
    /// Quantization bit width for continuous controls; 0 disables.
    pub quantize_bits: u8,
    /// When true candidate values come from the backend rather than the
    /// fixed stub estimate.
    pub backed_estimator: bool,
    /// Whether to verify the terminal leaf.
    pub verify: bool,
    /// When true the verifier ignores the leaf's own controls.
    pub fixed_verifier_control: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend_spec: "stub:tiny".to_string(),
            token_budget: 8000,
            max_depth: 6,
            max_total_expansions: 128,
            max_labels: 3,
            label_policy: LabelPolicy::default(),
            label_seed: 13,
            frozen_tuner: false,
            trust_region: Some(0.15),
            quantize_bits: 0,
            backed_estimator: true,
            verify: false,
            fixed_verifier_control: false,
        }
    }
}

/// Builder for creating an Engine.
pub struct EngineBuilder {
    config: EngineConfig,
    baseline: Option<ControlVector>,
}

impl EngineBuilder {
    /// Create a new engine builder.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            baseline: None,
        }
    }

    /// Set the backend spec.
    pub fn backend(mut self, spec: impl Into<String>) -> Self {
        self.config.backend_spec = spec.into();
        self
    }

    /// Set the per-run token budget.
    pub fn token_budget(mut self, budget: u64) -> Self {
        self.config.token_budget = budget;
        self
    }

    /// Set the maximum search depth.
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Set the per-run expansion cap.
    pub fn max_total_expansions(mut self, cap: u32) -> Self {
        self.config.max_total_expansions = cap;
        self
    }

    /// Set the per-round directive cap.
    pub fn max_labels(mut self, cap: usize) -> Self {
        self.config.max_labels = cap;
        self
    }

    /// Set how round directives are produced.
    pub fn label_policy(mut self, policy: LabelPolicy) -> Self {
        self.config.label_policy = policy;
        self
    }

    /// Set the seed for the randomized label policy.
    pub fn label_seed(mut self, seed: u64) -> Self {
        self.config.label_seed = seed;
        self
    }

    /// Freeze the tuner at the baseline vector.
    pub fn frozen_tuner(mut self, frozen: bool) -> Self {
        self.config.frozen_tuner = frozen;
        self
    }

    /// Set the trust-region radius; `None` disables projection.
    pub fn trust_region(mut self, r: Option<f64>) -> Self {
        self.config.trust_region = r;
        self
    }

    /// Set the control quantization bit width; 0 disables.
    pub fn quantize_bits(mut self, bits: u8) -> Self {
        self.config.quantize_bits = bits;
        self
    }

    /// Choose whether candidate values come from the backend.
    pub fn backed_estimator(mut self, backed: bool) -> Self {
        self.config.backed_estimator = backed;
        self
    }

    /// Enable terminal-leaf verification.
    pub fn verify(mut self, on: bool) -> Self {
        self.config.verify = on;
        self
    }

    /// Make the verifier ignore the leaf's own controls.
    pub fn fixed_verifier_control(mut self, fixed: bool) -> Self {
        self.config.fixed_verifier_control = fixed;
        self
    }

    /// Override the baseline control vector.
    pub fn baseline(mut self, p0: ControlVector) -> Self {
        self.baseline = Some(p0);
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<Engine> {
        let backend = backend_from_spec(&self.config.backend_spec)?;
        Ok(Engine {
            config: self.config,
            baseline: self.baseline,
            backend,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// High-level search engine.
///
/// Owns the backend and configuration; each [`Engine::run`] call wires a
/// fresh controller with its own context and ledger, so runs never share
/// state.
pub struct Engine {
    config: EngineConfig,
    baseline: Option<ControlVector>,
    backend: Arc<dyn Generator>,
}

impl Engine {
    /// Create a new engine builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Get engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one task to termination.
    pub fn run(&self, task: &str, gold_answer: Option<&str>) -> Result<RunOutcome> {
        let labeller = match self.config.label_policy {
            LabelPolicy::Frozen => Labeller::frozen(),
            LabelPolicy::Randomized => {
                Labeller::randomized(self.config.max_labels, self.config.label_seed)
            }
            LabelPolicy::Generative => {
                Labeller::generative(Arc::clone(&self.backend), self.config.max_labels)
            }
        };

        let mut tuner = if self.config.frozen_tuner {
            ControlTuner::frozen()
        } else {
            ControlTuner::generative(Arc::clone(&self.backend))
        }
        .trust_region(self.config.trust_region)
        .quantize_bits(self.config.quantize_bits);
        if let Some(p0) = &self.baseline {
            tuner = tuner.baseline(p0.clone());
        }

        let estimator = if self.config.backed_estimator {
            ValueEstimator::backed(Arc::clone(&self.backend))
        } else {
            ValueEstimator::stub()
        };

        let limits = SearchLimits {
            max_depth: self.config.max_depth,
            max_total_expansions: self.config.max_total_expansions,
            token_budget: self.config.token_budget,
        };

        let mut controller = SearchController::new(
            Arc::clone(&self.backend),
            labeller,
            tuner,
            estimator,
            limits,
        );
        if self.config.verify {
            let control = if self.config.fixed_verifier_control {
                VerifierControl::Fixed
            } else {
                VerifierControl::FromLeaf
            };
            controller =
                controller.with_verifier(Verifier::new(Arc::clone(&self.backend)), control);
        }

        Ok(controller.run(task, gold_answer)?)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_engine_answers_and_verifies() {
        let engine = Engine::builder()
            .backend("stub:tiny")
            .verify(true)
            .build()
            .unwrap();
        let outcome = engine.run("What is 6 * 7?", Some("42")).unwrap();
        assert_eq!(outcome.correct, Some(true));
        assert_eq!(outcome.verified, Some(true));
        assert!(outcome.tokens_total > 0);
    }

    #[test]
    fn runs_are_independent() {
        let engine = Engine::builder().backend("stub:tiny").build().unwrap();
        let first = engine.run("What is 6 * 7?", Some("42")).unwrap();
        let second = engine.run("What is 6 * 7?", Some("42")).unwrap();
        assert_eq!(first.expansions, second.expansions);
        assert_eq!(first.tokens_total, second.tokens_total);
    }

    #[test]
    fn unknown_backend_fails_at_build() {
        let err = Engine::builder().backend("vllm:llama").build().unwrap_err();
        assert!(err.to_string().contains("vllm:llama"));
    }

    #[test]
    fn frozen_policies_still_terminate() {
        let engine = Engine::builder()
            .backend("stub:tiny")
            .label_policy(LabelPolicy::Frozen)
            .frozen_tuner(true)
            .backed_estimator(false)
            .build()
            .unwrap();
        let outcome = engine.run("What is 6 * 7?", Some("42")).unwrap();
        assert_eq!(outcome.correct, Some(true));
    }
}
