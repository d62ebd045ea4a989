//! Run-level limits and fixed search constants.

/// Default maximum number of ledger rows retained.
pub const LEDGER_MAX_ROWS: usize = 32;

/// Default maximum search depth (rounds) per run.
pub const MAX_DEPTH: u32 = 6;

/// Default cap on total expansions per run.
pub const MAX_TOTAL_EXPANSIONS: u32 = 128;

/// Marker scanned for in survivor text; a survivor containing it becomes the
/// terminal leaf.
pub const TERMINAL_MARKER: &str = "Final Answer:";

/// Global stop conditions for one controller run.
///
/// Passed explicitly into the controller; there is no process-wide mutable
/// configuration.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Maximum rounds before terminating without a leaf.
    pub max_depth: u32,
    /// Maximum candidates generated across the whole run.
    pub max_total_expansions: u32,
    /// Maximum total generation token cost for the run.
    pub token_budget: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            max_total_expansions: MAX_TOTAL_EXPANSIONS,
            token_budget: 8000,
        }
    }
}

/// Depth decay applied to the exploration weight beta.
#[derive(Debug, Clone, Copy)]
pub struct BetaDecay {
    /// Decay time constant in rounds.
    pub tau: f64,
    /// Floor for the decayed weight.
    pub min_beta: f64,
}

impl Default for BetaDecay {
    fn default() -> Self {
        Self {
            tau: 3.0,
            min_beta: 0.02,
        }
    }
}

impl BetaDecay {
    /// Effective exploration weight at a depth:
    /// `clamp(base * exp(-depth / tau), min_beta, 1)`.
    pub fn at_depth(&self, depth: u32, base_beta: f64) -> f64 {
        let tau = self.tau.max(1e-6);
        (base_beta * (-(depth as f64) / tau).exp()).clamp(self.min_beta, 1.0)
    }
}
