//! Survivor selection by uncertainty-weighted score.

use super::Candidate;
use std::cmp::Ordering;

/// Keep the top `k` candidates by score, descending, stable for ties.
///
/// Pure: returns exactly `min(k, cands.len())` items drawn from the input,
/// with no other side effects.
pub fn select(mut cands: Vec<Candidate>, k: usize) -> Vec<Candidate> {
    cands.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    cands.truncate(k);
    cands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::Usage;
    use crate::control::ControlVector;
    use crate::search::PolicySnapshot;

    fn cand(text: &str, score: f64) -> Candidate {
        Candidate {
            text: text.to_string(),
            mu: score,
            sigma: 0.0,
            score,
            usage: Usage::ZERO,
            label: "default".to_string(),
            pi: PolicySnapshot {
                vector: ControlVector::baseline(),
                beta_eff: 0.15,
            },
        }
    }

    #[test]
    fn sorts_descending_and_truncates() {
        let cands = vec![cand("a", 0.2), cand("b", 0.9), cand("c", 0.5)];
        let kept = select(cands, 2);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].text, "b");
        assert_eq!(kept[1].text, "c");
    }

    #[test]
    fn k_larger_than_input_returns_all() {
        let kept = select(vec![cand("a", 0.1)], 10);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn zero_k_returns_empty() {
        let kept = select(vec![cand("a", 0.1)], 0);
        assert!(kept.is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let cands = vec![cand("first", 0.5), cand("second", 0.5), cand("third", 0.5)];
        let kept = select(cands, 3);
        let texts: Vec<&str> = kept.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }
}
