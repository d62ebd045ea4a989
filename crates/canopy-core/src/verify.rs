//! Majority-vote verification of a terminal leaf.

use crate::budget::Usage;
use crate::error::Result;
use crate::generator::{GenOptions, Generator};
use crate::prompts;
use std::sync::Arc;

/// Verifies a candidate answer by independent low-budget voting passes.
pub struct Verifier {
    backend: Arc<dyn Generator>,
}

impl Verifier {
    /// Create a verifier over a generation backend.
    pub fn new(backend: Arc<dyn Generator>) -> Self {
        Self { backend }
    }

    /// Run `max(1, passes)` single-call votes at the given strictness.
    ///
    /// A vote accepts only if the response contains "ACCEPT" and not
    /// "REJECT". The candidate is accepted iff accepting votes reach the
    /// strict majority threshold `passes / 2 + 1` of the requested count
    /// (a zero-pass request still runs one floor pass against threshold 1).
    pub fn verify(
        &self,
        task: &str,
        candidate: &str,
        passes: u32,
        strictness: f64,
    ) -> Result<(bool, Usage)> {
        let strictness = strictness.to_string();
        let prompt = prompts::render(
            prompts::VERIFIER,
            &[
                ("task", task),
                ("candidate", candidate),
                ("strictness", &strictness),
            ],
        );
        let options = GenOptions::deterministic(4);
        let mut votes = 0u32;
        let mut cost = Usage::ZERO;
        for _ in 0..passes.max(1) {
            let (text, usage) = self.backend.generate(&prompt, &options)?;
            cost += usage;
            let upper = text.trim().to_uppercase();
            if upper.contains("ACCEPT") && !upper.contains("REJECT") {
                votes += 1;
            }
        }
        Ok((votes >= passes / 2 + 1, cost))
    }
}
