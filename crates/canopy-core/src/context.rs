//! Rolling search context embedded into conditioning prompts.

use crate::error::Result;
use serde::Serialize;

/// Per-run rolling statistics and history.
///
/// Created once per run and owned exclusively by the controller, which
/// advances `depth` and appends to `label_history` at round boundaries.
#[derive(Debug, Clone)]
pub struct Context {
    /// Current round depth, starting at zero.
    pub depth: u32,
    /// Median sigma across the current frontier.
    pub frontier_sigma_median: f64,
    /// Median novelty estimate for the frontier.
    pub novelty_median: f64,
    /// Best sibling mu seen this round.
    pub siblings_best_mu: f64,
    /// Sigma of the best sibling.
    pub siblings_best_sigma: f64,
    /// Directive labels of past survivors, oldest first.
    pub label_history: Vec<String>,
    /// Tokens consumed so far.
    pub tokens_used: u64,
    /// Token budget for the run.
    pub tokens_budget: u64,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl Context {
    /// Create a fresh context for a run with the given token budget.
    pub fn new(tokens_budget: u64) -> Self {
        Self {
            depth: 0,
            frontier_sigma_median: 0.5,
            novelty_median: 0.5,
            siblings_best_mu: 0.0,
            siblings_best_sigma: 0.5,
            label_history: Vec::new(),
            tokens_used: 0,
            tokens_budget,
        }
    }

    /// Canonical compact JSON snapshot for prompt embedding.
    ///
    /// The field order and the last-8 truncation of `label_history` are an
    /// external contract: this text is fed verbatim into prompts.
    pub fn snapshot(&self) -> Result<String> {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            depth: u32,
            frontier_sigma_median: f64,
            novelty_median: f64,
            siblings_best_mu: f64,
            siblings_best_sigma: f64,
            label_history: &'a [String],
            tokens_used: u64,
            tokens_budget: u64,
        }

        let start = self.label_history.len().saturating_sub(8);
        let snap = Snapshot {
            depth: self.depth,
            frontier_sigma_median: self.frontier_sigma_median,
            novelty_median: self.novelty_median,
            siblings_best_mu: self.siblings_best_mu,
            siblings_best_sigma: self.siblings_best_sigma,
            label_history: &self.label_history[start..],
            tokens_used: self.tokens_used,
            tokens_budget: self.tokens_budget,
        };
        Ok(serde_json::to_string(&snap)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_field_order_is_stable() {
        let ctx = Context::new(10_000);
        let json = ctx.snapshot().unwrap();
        assert_eq!(
            json,
            "{\"depth\":0,\"frontier_sigma_median\":0.5,\"novelty_median\":0.5,\
             \"siblings_best_mu\":0.0,\"siblings_best_sigma\":0.5,\
             \"label_history\":[],\"tokens_used\":0,\"tokens_budget\":10000}"
        );
    }

    #[test]
    fn snapshot_keeps_last_eight_labels() {
        let mut ctx = Context::new(1000);
        for i in 0..10 {
            ctx.label_history.push(format!("l{i}"));
        }
        let json = ctx.snapshot().unwrap();
        assert!(!json.contains("\"l0\""));
        assert!(!json.contains("\"l1\""));
        assert!(json.contains("\"l2\""));
        assert!(json.contains("\"l9\""));
    }
}
