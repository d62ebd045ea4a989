//! Token accounting for generation cost.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Token usage of one backend call, or an aggregate over several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u64,
    /// Tokens produced by the completion.
    pub completion_tokens: u64,
}

impl Usage {
    /// Zero-cost usage, returned by frozen components.
    pub const ZERO: Usage = Usage {
        prompt_tokens: 0,
        completion_tokens: 0,
    };

    /// Create a usage record.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    /// Total tokens, prompt plus completion.
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

impl Add for Usage {
    type Output = Usage;

    fn add(self, rhs: Usage) -> Usage {
        Usage {
            prompt_tokens: self.prompt_tokens + rhs.prompt_tokens,
            completion_tokens: self.completion_tokens + rhs.completion_tokens,
        }
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, rhs: Usage) {
        self.prompt_tokens += rhs.prompt_tokens;
        self.completion_tokens += rhs.completion_tokens;
    }
}

/// Accumulates consumed generation cost over one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenBudget {
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl TokenBudget {
    /// Create an empty budget tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a usage record to the running totals.
    pub fn add(&mut self, usage: Usage) {
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
    }

    /// Prompt tokens consumed so far.
    pub fn prompt_tokens(&self) -> u64 {
        self.prompt_tokens
    }

    /// Completion tokens consumed so far.
    pub fn completion_tokens(&self) -> u64 {
        self.completion_tokens
    }

    /// Total tokens consumed so far.
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Rough token estimate for text without a tokenizer: one token per four
/// bytes, at least one for non-empty text.
pub fn approx_tokens(text: &str) -> u64 {
    if text.is_empty() {
        0
    } else {
        (text.len() as u64 / 4).max(1)
    }
}
