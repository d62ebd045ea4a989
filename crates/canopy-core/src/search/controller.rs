//! Round-based search orchestration under global budgets.

use super::{expand_under_label, select, Candidate, ControlTuner, Labeller, ValueEstimator};
use crate::budget::{TokenBudget, Usage};
use crate::config::{BetaDecay, SearchLimits, TERMINAL_MARKER};
use crate::context::Context;
use crate::error::Result;
use crate::eval::ExactMatchChecker;
use crate::generator::Generator;
use crate::verify::Verifier;
use std::sync::Arc;
use tracing::debug;

/// How verification passes/strictness are chosen for the terminal leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerifierControl {
    /// Use the leaf's own recorded verify_passes / verify_strictness.
    #[default]
    FromLeaf,
    /// Ignore the leaf's controls: one pass at strictness 0.5.
    Fixed,
}

/// Result record for one controller run.
///
/// The shape is fixed: when no terminal leaf is reached, `final_text`,
/// `correct`, and `verified` are `None` while the counters stay accurate.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Text of the terminal leaf, if one was found.
    pub final_text: Option<String>,
    /// Total generation tokens consumed.
    pub tokens_total: u64,
    /// Total candidates generated.
    pub expansions: u32,
    /// Exact-match correctness against the gold answer, when both a gold
    /// answer and a leaf exist.
    pub correct: Option<bool>,
    /// Verifier outcome, when a verifier was supplied and a leaf exists.
    pub verified: Option<bool>,
}

/// Drives rounds of label / tune / expand / score / select under global
/// token, depth, and expansion budgets.
///
/// Single-threaded: the controller exclusively owns the run's [`Context`]
/// and, via the tuner, its ledger. Round boundaries are the only points
/// where budget and depth counters change.
pub struct SearchController {
    backend: Arc<dyn Generator>,
    labeller: Labeller,
    tuner: ControlTuner,
    estimator: ValueEstimator,
    verifier: Option<Verifier>,
    verifier_control: VerifierControl,
    limits: SearchLimits,
    decay: BetaDecay,
}

impl SearchController {
    /// Create a controller over a backend and its collaborators.
    pub fn new(
        backend: Arc<dyn Generator>,
        labeller: Labeller,
        tuner: ControlTuner,
        estimator: ValueEstimator,
        limits: SearchLimits,
    ) -> Self {
        Self {
            backend,
            labeller,
            tuner,
            estimator,
            verifier: None,
            verifier_control: VerifierControl::default(),
            limits,
            decay: BetaDecay::default(),
        }
    }

    /// Attach a verifier for the terminal leaf.
    pub fn with_verifier(mut self, verifier: Verifier, control: VerifierControl) -> Self {
        self.verifier = Some(verifier);
        self.verifier_control = control;
        self
    }

    /// Override the exploration-weight decay constants.
    pub fn with_decay(mut self, decay: BetaDecay) -> Self {
        self.decay = decay;
        self
    }

    /// Run one search instance to termination.
    ///
    /// Generation failures propagate; budget, depth, and expansion
    /// exhaustion terminate normally with a leafless outcome.
    pub fn run(&mut self, task: &str, gold_answer: Option<&str>) -> Result<RunOutcome> {
        let mut ctx = Context::new(self.limits.token_budget);
        let mut budget = TokenBudget::new();
        let mut parent = String::new();
        let mut expansions: u32 = 0;
        let mut leaf: Option<Candidate> = None;

        while expansions < self.limits.max_total_expansions
            && ctx.depth < self.limits.max_depth
            && budget.total() < self.limits.token_budget
        {
            let (labels, _label_usage) = self.labeller.emit_labels(&parent, &ctx)?;

            let mut round: Vec<Candidate> = Vec::new();
            let mut round_usage = Usage::ZERO;
            let mut quotas: Vec<u32> = Vec::new();
            for label in &labels {
                let (kids, usage, cv) = expand_under_label(
                    task,
                    &parent,
                    label,
                    &ctx,
                    &mut self.tuner,
                    self.backend.as_ref(),
                    &self.estimator,
                    &self.decay,
                )?;
                expansions += kids.len() as u32;
                quotas.push(cv.branch_quota);
                round_usage += usage;
                round.extend(kids);
                // Stop opening further directives once this round's usage
                // would meet or exceed the remaining budget.
                if budget.total() + round_usage.total() >= self.limits.token_budget {
                    break;
                }
            }
            budget.add(round_usage);

            if round.is_empty() {
                debug!(depth = ctx.depth, "no candidates produced, terminating");
                break;
            }

            let k_eff = quotas.iter().copied().max().unwrap_or(1) as usize;
            let survivors = select(round, k_eff);
            if let Some(hit) = survivors.iter().find(|c| c.text.contains(TERMINAL_MARKER)) {
                leaf = Some(hit.clone());
            }
            debug!(
                depth = ctx.depth,
                survivors = survivors.len(),
                tokens = budget.total(),
                expansions,
                terminal = leaf.is_some(),
                "round complete"
            );
            if leaf.is_some() || budget.total() >= self.limits.token_budget {
                break;
            }

            parent = survivors[0].text.clone();
            ctx.depth += 1;
            ctx.label_history
                .extend(survivors.iter().map(|c| c.label.clone()));
        }

        let mut verified = None;
        if let (Some(candidate), Some(verifier)) = (&leaf, &self.verifier) {
            let (passes, strictness) = match self.verifier_control {
                VerifierControl::Fixed => (1, 0.5),
                VerifierControl::FromLeaf => (
                    candidate.pi.vector.verify_passes,
                    candidate.pi.vector.verify_strictness,
                ),
            };
            let (accepted, usage) = verifier.verify(task, &candidate.text, passes, strictness)?;
            budget.add(usage);
            verified = Some(accepted);
        }

        let correct = match (gold_answer, &leaf) {
            (Some(gold), Some(candidate)) => {
                Some(ExactMatchChecker::new(gold).check(&candidate.text))
            }
            _ => None,
        };

        Ok(RunOutcome {
            final_text: leaf.map(|c| c.text),
            tokens_total: budget.total(),
            expansions,
            correct,
            verified,
        })
    }
}
