//! Retrieval hints derived from control-vector weights.

use std::collections::BTreeMap;

/// Build an optional hint block from retrieval weights and frontier novelty.
///
/// A category hint is included when that category's weight exceeds 0.1. The
/// generic heuristic line fires only when no category triggered and novelty
/// exceeds 0.7.
pub fn retrieval_hint(weights: &BTreeMap<String, f64>, novelty: f64) -> Option<String> {
    let weight = |name: &str| weights.get(name).copied().unwrap_or(0.0);
    let mut parts: Vec<&str> = Vec::new();
    if weight("general") > 0.1 {
        parts.push("General background: check arithmetic; keep steps concise.");
    }
    if weight("math-lemmas") > 0.1 {
        parts.push("Math lemmas: parity, factoring identities, simple inequalities.");
    }
    if parts.is_empty() && novelty > 0.7 {
        parts.push("Heuristic: consider a simpler sub-goal or alternative representation.");
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
