//! Per-directive control-vector tuning.

use crate::budget::Usage;
use crate::config::LEDGER_MAX_ROWS;
use crate::context::Context;
use crate::control::{quantize_controls, trust_region_project, ControlBounds, ControlVector};
use crate::error::Result;
use crate::extract::extract_object;
use crate::generator::{GenOptions, Generator};
use crate::ledger::{Ledger, LedgerRow};
use crate::prompts;
use std::sync::Arc;
use tracing::debug;

enum Mode {
    Frozen,
    Generative { backend: Arc<dyn Generator> },
}

/// Proposes, validates, and projects a control vector per directive.
///
/// Owns the run's [`Ledger`]; no other component mutates it.
pub struct ControlTuner {
    mode: Mode,
    bounds: ControlBounds,
    p0: ControlVector,
    trust_region: Option<f64>,
    quantize_bits: u8,
    ledger: Ledger,
}

impl ControlTuner {
    /// Frozen mode: always returns the baseline at zero cost.
    pub fn frozen() -> Self {
        Self::with_mode(Mode::Frozen)
    }

    /// Generative mode: one deterministic call per directive proposes a
    /// vector, validated and projected against the baseline.
    pub fn generative(backend: Arc<dyn Generator>) -> Self {
        Self::with_mode(Mode::Generative { backend })
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            bounds: ControlBounds::default(),
            p0: ControlVector::baseline(),
            trust_region: Some(0.15),
            quantize_bits: 0,
            ledger: Ledger::new(LEDGER_MAX_ROWS),
        }
    }

    /// Set the trust-region radius, or `None` to disable projection.
    pub fn trust_region(mut self, r: Option<f64>) -> Self {
        self.trust_region = r;
        self
    }

    /// Set the quantization bit count; zero disables quantization.
    pub fn quantize_bits(mut self, bits: u8) -> Self {
        self.quantize_bits = bits;
        self
    }

    /// Replace the baseline vector.
    pub fn baseline(mut self, p0: ControlVector) -> Self {
        self.p0 = p0;
        self
    }

    /// The run's ledger, read-only.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Append one row summarizing a directive's round.
    pub fn record_round(&mut self, row: LedgerRow) {
        self.ledger.push(row);
    }

    /// Emit a validated control vector for this directive, plus the token
    /// cost of proposing it.
    pub fn emit_controls(
        &mut self,
        parent: &str,
        label: &str,
        ctx: &Context,
    ) -> Result<(ControlVector, Usage)> {
        let backend = match &self.mode {
            Mode::Frozen => return Ok((self.p0.clone(), Usage::ZERO)),
            Mode::Generative { backend } => Arc::clone(backend),
        };

        let p0_json = serde_json::to_string(&self.p0)?;
        let ledger_block = self.ledger.render_block();
        let parent_trunc: String = parent.chars().take(1000).collect();
        let prompt = prompts::render(
            prompts::TUNER,
            &[
                ("p0_json", &p0_json),
                ("ledger_block", &ledger_block),
                ("parent", &parent_trunc),
                ("label", label),
                ("context_json", &ctx.snapshot()?),
            ],
        );
        let (text, usage) = backend.generate(&prompt, &GenOptions::deterministic(256))?;

        let mut cv = match extract_object(&text) {
            Some(value) => ControlVector::validate_or_baseline(value, &self.p0, &self.bounds),
            None => {
                debug!(label, "control proposal unparseable, using baseline");
                self.p0.clone()
            }
        };
        cv.normalize_weights();
        if let Some(r) = self.trust_region {
            cv = trust_region_project(&cv, &self.p0, &self.bounds, r);
        }
        if self.quantize_bits > 0 {
            cv = quantize_controls(&cv, &self.bounds, self.quantize_bits);
        }
        Ok((cv, usage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::StubGenerator;

    struct FixedGenerator(&'static str);

    impl Generator for FixedGenerator {
        fn generate(&self, prompt: &str, _options: &GenOptions) -> Result<(String, Usage)> {
            Ok((
                self.0.to_string(),
                Usage::new(crate::budget::approx_tokens(prompt), 1),
            ))
        }
    }

    #[test]
    fn frozen_returns_baseline_at_zero_cost() {
        let mut tuner = ControlTuner::frozen();
        let (cv, usage) = tuner
            .emit_controls("parent", "default", &Context::default())
            .unwrap();
        assert_eq!(cv, ControlVector::baseline());
        assert_eq!(usage, Usage::ZERO);
    }

    #[test]
    fn generative_projects_proposal_into_trust_region() {
        // The stub proposes max_tokens 64 and gen_count 2, both already
        // inside radius 0.15 of the baseline in normalized space, so the
        // projection leaves them alone.
        let mut tuner = ControlTuner::generative(Arc::new(StubGenerator::new("tiny")));
        let (cv, usage) = tuner
            .emit_controls("parent", "default", &Context::default())
            .unwrap();
        assert_eq!(cv.gen_count, 2);
        assert_eq!(cv.max_tokens, 64);
        assert!(usage.total() > 0);
    }

    #[test]
    fn unparseable_proposal_falls_back_to_baseline() {
        let mut tuner = ControlTuner::generative(Arc::new(FixedGenerator("not json at all")));
        let (cv, _) = tuner
            .emit_controls("parent", "default", &Context::default())
            .unwrap();
        assert_eq!(cv, ControlVector::baseline());
    }

    #[test]
    fn out_of_bounds_proposal_falls_back_wholesale() {
        let mut tuner = ControlTuner::generative(Arc::new(FixedGenerator(
            r#"{"temperature":9.0,"top_p":0.9,"max_tokens":128,"repetition_penalty":1.0,"gen_count":1,"branch_quota":2,"beta":0.15,"verify_passes":1,"verify_strictness":0.5}"#,
        )))
        .trust_region(None);
        let (cv, _) = tuner
            .emit_controls("parent", "default", &Context::default())
            .unwrap();
        assert_eq!(cv, ControlVector::baseline());
    }

    #[test]
    fn emitted_vectors_always_within_bounds() {
        let bounds = ControlBounds::default();
        let replies = [
            "garbage",
            r#"{"temperature":0.9,"top_p":0.1,"max_tokens":512,"repetition_penalty":2.0,"gen_count":8,"branch_quota":8,"beta":1.0,"verify_passes":5,"verify_strictness":1.0}"#,
            r#"{"temperature":-1}"#,
        ];
        for reply in replies {
            for (r, bits) in [(None, 0u8), (Some(0.15), 0), (Some(0.3), 3)] {
                let mut tuner = ControlTuner::generative(Arc::new(FixedGenerator(reply)))
                    .trust_region(r)
                    .quantize_bits(bits);
                let (cv, _) = tuner
                    .emit_controls("p", "l", &Context::default())
                    .unwrap();
                assert!(cv.validate(&bounds), "reply {reply:?} r {r:?} bits {bits}");
            }
        }
    }

    #[test]
    fn proposal_weights_are_normalized() {
        let mut tuner = ControlTuner::generative(Arc::new(FixedGenerator(
            r#"{"temperature":0.2,"top_p":0.9,"max_tokens":128,"repetition_penalty":1.0,"gen_count":1,"branch_quota":2,"beta":0.15,"verify_passes":1,"verify_strictness":0.5,"retrieval_weights":{"general":0.9,"math-lemmas":0.9}}"#,
        )))
        .trust_region(None);
        let (cv, _) = tuner
            .emit_controls("p", "l", &Context::default())
            .unwrap();
        let total: f64 = cv.retrieval_weights.values().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ledger_rows_appear_in_tuning_prompt_inputs() {
        let mut tuner = ControlTuner::frozen();
        assert!(tuner.ledger().is_empty());
        tuner.record_round(LedgerRow {
            label: "default".to_string(),
            vector: ControlVector::baseline(),
            mean_mu: 0.4,
            mean_sigma: 0.5,
            accept: None,
            cost: Usage::new(5, 5),
        });
        assert_eq!(tuner.ledger().len(), 1);
        assert!(tuner.ledger().render_block().contains("\"mu\": 0.400"));
    }
}
