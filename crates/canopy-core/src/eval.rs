//! Terminal-answer extraction and exact-match correctness checking.

/// Collapse whitespace runs to single spaces, trim surrounding spaces,
/// periods, and newlines, and lowercase.
pub fn normalize_answer(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| matches!(c, ' ' | '.' | '\n' | '\t'))
        .to_lowercase()
}

/// Extract the answer after the first `Final Answer:` marker, matched
/// case-insensitively, taking the rest of that line normalized.
pub fn parse_final_answer(text: &str) -> Option<String> {
    for line in text.lines() {
        let lower = line.to_lowercase();
        if let Some(pos) = lower.find("final answer") {
            let rest = lower[pos + "final answer".len()..].trim_start();
            if let Some(answer) = rest.strip_prefix(':') {
                let answer = normalize_answer(answer);
                if !answer.is_empty() {
                    return Some(answer);
                }
            }
        }
    }
    None
}

/// Exact-match correctness check against a gold answer.
#[derive(Debug, Clone)]
pub struct ExactMatchChecker {
    gold: String,
}

impl ExactMatchChecker {
    /// Create a checker for a normalized gold answer.
    pub fn new(gold: &str) -> Self {
        Self {
            gold: normalize_answer(gold),
        }
    }

    /// Compare the prediction's marker answer (or, failing that, the whole
    /// normalized prediction) against the gold answer.
    pub fn check(&self, prediction: &str) -> bool {
        let answer =
            parse_final_answer(prediction).unwrap_or_else(|| normalize_answer(prediction));
        answer == self.gold
    }
}
