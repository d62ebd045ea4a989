//! Bounded rolling history of past round outcomes.
//!
//! The ledger conditions the tuner: its rendered block is embedded verbatim
//! in the tuning prompt, so the rendering's field order and rounding are a
//! stable model-facing contract.

use crate::budget::Usage;
use crate::control::ControlVector;
use std::collections::VecDeque;
use std::fmt::Write;

/// One recorded round outcome for a single directive.
#[derive(Debug, Clone)]
pub struct LedgerRow {
    /// Directive label the round ran under.
    pub label: String,
    /// Control vector the round ran under.
    pub vector: ControlVector,
    /// Mean estimated quality across the round's candidates.
    pub mean_mu: f64,
    /// Mean uncertainty across the round's candidates.
    pub mean_sigma: f64,
    /// Verification outcome, unset until a leaf is verified.
    pub accept: Option<bool>,
    /// Token cost of the round.
    pub cost: Usage,
}

/// FIFO-bounded row store, owned by the control tuner for the run's
/// lifetime.
#[derive(Debug)]
pub struct Ledger {
    rows: VecDeque<LedgerRow>,
    max_rows: usize,
}

impl Ledger {
    /// Create a ledger retaining at most `max_rows` rows.
    pub fn new(max_rows: usize) -> Self {
        Self {
            rows: VecDeque::with_capacity(max_rows),
            max_rows,
        }
    }

    /// Append a row, evicting the oldest rows beyond `max_rows`.
    pub fn push(&mut self, row: LedgerRow) {
        self.rows.push_back(row);
        while self.rows.len() > self.max_rows {
            self.rows.pop_front();
        }
    }

    /// Number of retained rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the ledger holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Retained rows, oldest first.
    pub fn rows(&self) -> impl Iterator<Item = &LedgerRow> {
        self.rows.iter()
    }

    /// Render the retained rows as one JSON-ish line each, oldest first.
    ///
    /// Returns `(empty)` when no rows are held. Mu and sigma are rounded to
    /// three decimals; field order is fixed.
    pub fn render_block(&self) -> String {
        if self.rows.is_empty() {
            return "(empty)".to_string();
        }
        let mut out = String::new();
        for row in &self.rows {
            let pi = serde_json::to_string(&row.vector).unwrap_or_else(|_| "{}".to_string());
            let accept = match row.accept {
                Some(true) => "true",
                Some(false) => "false",
                None => "null",
            };
            let _ = write!(
                out,
                "{{\"L\": \"{}\", \"Pi\": {}, \"mu\": {:.3}, \"sigma\": {:.3}, \
                 \"accept\": {}, \"cost\": {{\"prompt_tokens\": {}, \"completion_tokens\": {}}}}}\n",
                row.label,
                pi,
                row.mean_mu,
                row.mean_sigma,
                accept,
                row.cost.prompt_tokens,
                row.cost.completion_tokens,
            );
        }
        out.pop();
        out
    }
}
