//! One expansion step under a single directive.

use super::{Candidate, ControlTuner, PolicySnapshot, ValueEstimator};
use crate::budget::Usage;
use crate::config::{BetaDecay, TERMINAL_MARKER};
use crate::context::Context;
use crate::control::ControlVector;
use crate::error::Result;
use crate::generator::{GenOptions, Generator};
use crate::ledger::LedgerRow;
use crate::retrieval::retrieval_hint;
use tracing::trace;

/// Build the continuation prompt for one candidate slot.
fn expansion_prompt(task: &str, parent: &str, hint: Option<&str>, label: &str) -> String {
    let hint_block = hint
        .map(|h| format!("\n\nRetrieved context:\n{h}"))
        .unwrap_or_default();
    format!(
        "Task:\n{task}\n\nParent step:\n{parent}{hint_block}\n\nDirective: {label}\n\n\
         Continue the reasoning. If you can conclude, write '{TERMINAL_MARKER} <answer>'."
    )
}

/// Expand `gen_count` candidate continuations under one directive.
///
/// Obtains a control vector from the tuner, issues one batch generation
/// call, scores each result, and appends a ledger row summarizing the
/// round when at least one candidate was produced. Returns the candidates,
/// the aggregated generation-plus-estimation usage, and the control vector
/// the batch ran under.
pub fn expand_under_label(
    task: &str,
    parent: &str,
    label: &str,
    ctx: &Context,
    tuner: &mut ControlTuner,
    backend: &dyn Generator,
    estimator: &ValueEstimator,
    decay: &BetaDecay,
) -> Result<(Vec<Candidate>, Usage, ControlVector)> {
    let (cv, _tuning_usage) = tuner.emit_controls(parent, label, ctx)?;

    let hint = retrieval_hint(&cv.retrieval_weights, ctx.novelty_median);
    let prompts: Vec<String> = (0..cv.gen_count)
        .map(|_| expansion_prompt(task, parent, hint.as_deref(), label))
        .collect();
    let options = GenOptions {
        temperature: cv.temperature,
        top_p: cv.top_p,
        max_tokens: cv.max_tokens,
        repetition_penalty: cv.repetition_penalty,
    };
    let results = backend.batch_generate(&prompts, &options)?;

    let beta_eff = decay.at_depth(ctx.depth, cv.beta);
    let mut children = Vec::with_capacity(results.len());
    let mut total = Usage::ZERO;
    for (text, usage) in results {
        let (mu, sigma, est_usage) = estimator.score(task, &text)?;
        total += usage;
        total += est_usage;
        children.push(Candidate {
            text,
            mu,
            sigma,
            score: mu + beta_eff * sigma,
            usage,
            label: label.to_string(),
            pi: PolicySnapshot {
                vector: cv.clone(),
                beta_eff,
            },
        });
    }

    if !children.is_empty() {
        let n = children.len() as f64;
        let mean_mu = children.iter().map(|c| c.mu).sum::<f64>() / n;
        let mean_sigma = children.iter().map(|c| c.sigma).sum::<f64>() / n;
        tuner.record_round(LedgerRow {
            label: label.to_string(),
            vector: cv.clone(),
            mean_mu,
            mean_sigma,
            accept: None,
            cost: total,
        });
        trace!(
            label,
            candidates = children.len(),
            mean_mu,
            mean_sigma,
            "expanded directive"
        );
    }
    Ok((children, total, cv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::StubGenerator;

    #[test]
    fn expands_gen_count_candidates_with_scores() {
        let mut tuner = ControlTuner::frozen();
        let stub = StubGenerator::new("tiny");
        let estimator = ValueEstimator::stub();
        let decay = BetaDecay::default();
        let ctx = Context::default();

        let (children, usage, cv) = expand_under_label(
            "What is 6 * 7?",
            "",
            "default",
            &ctx,
            &mut tuner,
            &stub,
            &estimator,
            &decay,
        )
        .unwrap();

        assert_eq!(cv, ControlVector::baseline());
        assert_eq!(children.len(), cv.gen_count as usize);
        let child = &children[0];
        assert!(child.text.contains(TERMINAL_MARKER));
        assert_eq!((child.mu, child.sigma), (0.35, 0.5));
        // beta_eff at depth 0 is the base beta.
        assert!((child.pi.beta_eff - 0.15).abs() < 1e-12);
        assert!((child.score - (0.35 + 0.15 * 0.5)).abs() < 1e-12);
        assert!(usage.total() > 0);
    }

    #[test]
    fn records_one_ledger_row_per_expansion() {
        let mut tuner = ControlTuner::frozen();
        let stub = StubGenerator::new("tiny");
        let estimator = ValueEstimator::stub();
        let decay = BetaDecay::default();
        let ctx = Context::default();

        for round in 1..=3 {
            expand_under_label(
                "task",
                "parent",
                "default",
                &ctx,
                &mut tuner,
                &stub,
                &estimator,
                &decay,
            )
            .unwrap();
            assert_eq!(tuner.ledger().len(), round);
        }
        let row = tuner.ledger().rows().next().unwrap();
        assert_eq!(row.label, "default");
        assert_eq!(row.accept, None);
        assert!((row.mean_mu - 0.35).abs() < 1e-12);
    }

    #[test]
    fn hint_included_when_category_weight_triggers() {
        let mut cv = ControlVector::baseline();
        cv.retrieval_weights.insert("general".to_string(), 0.5);
        let mut tuner = ControlTuner::frozen().baseline(cv);
        let estimator = ValueEstimator::stub();
        let decay = BetaDecay::default();
        let ctx = Context::default();

        // The stub echoes nothing about hints, so assert via the prompt
        // builder directly.
        let prompt = expansion_prompt("t", "p", Some("General background: hint"), "l");
        assert!(prompt.contains("Retrieved context:\nGeneral background: hint"));

        let (children, _, vector) = expand_under_label(
            "task",
            "parent",
            "default",
            &ctx,
            &mut tuner,
            &StubGenerator::new("tiny"),
            &estimator,
            &decay,
        )
        .unwrap();
        assert_eq!(vector.retrieval_weights["general"], 0.5);
        assert!(!children.is_empty());
    }

    #[test]
    fn prompt_omits_hint_block_without_hint() {
        let prompt = expansion_prompt("t", "p", None, "l");
        assert!(!prompt.contains("Retrieved context"));
        assert!(prompt.contains("Directive: l"));
        assert!(prompt.ends_with("write 'Final Answer: <answer>'."));
    }
}
