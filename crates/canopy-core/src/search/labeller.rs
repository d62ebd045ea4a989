//! Directive proposal per expansion round.

use crate::budget::Usage;
use crate::context::Context;
use crate::error::Result;
use crate::generator::{GenOptions, Generator};
use crate::prompts;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;

/// Fixed directive pool for randomized labelling.
const LABEL_POOL: [&str; 5] = [
    "work backward",
    "seek a counterexample",
    "sketch plan",
    "call retrieval; summarize first",
    "prove contrapositive",
];

enum Mode {
    Frozen,
    Randomized { rng: StdRng },
    Generative { backend: Arc<dyn Generator> },
}

/// Proposes exploration directives for the next round.
///
/// Always emits a non-empty ordered sequence of distinct labels.
pub struct Labeller {
    mode: Mode,
    max_labels: usize,
}

impl Labeller {
    /// Frozen mode: always exactly `["default"]` at zero cost.
    pub fn frozen() -> Self {
        Self {
            mode: Mode::Frozen,
            max_labels: 1,
        }
    }

    /// Randomized mode: up to `max_labels` distinct directives sampled
    /// without replacement from a fixed pool, at zero cost.
    pub fn randomized(max_labels: usize, seed: u64) -> Self {
        Self {
            mode: Mode::Randomized {
                rng: StdRng::seed_from_u64(seed),
            },
            max_labels,
        }
    }

    /// Generative mode: one generation call per round proposes directives.
    pub fn generative(backend: Arc<dyn Generator>, max_labels: usize) -> Self {
        Self {
            mode: Mode::Generative { backend },
            max_labels,
        }
    }

    /// Emit the round's directives and the cost of proposing them.
    ///
    /// Degenerate generative output falls back to `["default"]`.
    pub fn emit_labels(&mut self, parent: &str, ctx: &Context) -> Result<(Vec<String>, Usage)> {
        match &mut self.mode {
            Mode::Frozen => Ok((vec!["default".to_string()], Usage::ZERO)),
            Mode::Randomized { rng } => {
                let k = self.max_labels.min(LABEL_POOL.len());
                let labels = LABEL_POOL
                    .choose_multiple(rng, k)
                    .map(|s| s.to_string())
                    .collect();
                Ok((labels, Usage::ZERO))
            }
            Mode::Generative { backend } => {
                let parent_trunc: String = parent.chars().take(1000).collect();
                let max_labels = self.max_labels.to_string();
                let prompt = prompts::render(
                    prompts::LABELLER,
                    &[
                        ("parent", &parent_trunc),
                        ("context_json", &ctx.snapshot()?),
                        ("max_labels", &max_labels),
                    ],
                );
                let options = GenOptions {
                    temperature: 0.3,
                    top_p: 0.9,
                    max_tokens: 64,
                    repetition_penalty: 1.0,
                };
                let (text, usage) = backend.generate(&prompt, &options)?;
                let mut labels: Vec<String> = Vec::new();
                for piece in text.split(['\n', ';']) {
                    let piece = piece.trim();
                    if piece.is_empty() {
                        continue;
                    }
                    if labels.iter().any(|seen| seen == piece) {
                        continue;
                    }
                    labels.push(piece.to_string());
                    if labels.len() == self.max_labels {
                        break;
                    }
                }
                if labels.is_empty() {
                    labels.push("default".to_string());
                }
                Ok((labels, usage))
            }
        }
    }
}
