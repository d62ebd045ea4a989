//! Prompt templates for the labeller, tuner, estimator, and verifier.
//!
//! Templates are opaque text with named `{placeholder}` fields. Their cue
//! phrases ("edge labels", "JSON object", `"mu"`, "Return only ACCEPT or
//! REJECT") double as the dispatch keys of [`crate::generator::StubGenerator`],
//! so changing a template's wording is a contract change.

/// Directive-proposal template. Placeholders: `parent`, `context_json`,
/// `max_labels`.
pub const LABELLER: &str = "\
You are steering a tree search over reasoning steps.

Parent step:
{parent}

Search context:
{context_json}

Emit up to {max_labels} edge labels, one short directive per line, that \
would most improve the next expansion. Respond with the directives only.";

/// Control-tuning template. Placeholders: `p0_json`, `ledger_block`,
/// `parent`, `label`, `context_json`.
pub const TUNER: &str = "\
You tune generation hyperparameters for the next expansion.

Baseline JSON object:
{p0_json}

Recent rounds:
{ledger_block}

Parent step:
{parent}

Directive: {label}

Search context:
{context_json}

Propose an updated JSON object with the same keys as the baseline. Respond \
with the JSON object only.";

/// Value-estimation template. Placeholders: `task`, `candidate`.
pub const EVALUATOR: &str = "\
Rate the candidate continuation for the task below.

Task:
{task}

Candidate:
{candidate}

Respond as JSON with fields \"mu\" (estimated quality in [0, 1]) and \
\"sigma\" (uncertainty in [0, 1]).";

/// Verification template. Placeholders: `task`, `candidate`, `strictness`.
pub const VERIFIER: &str = "\
Task:
{task}

Candidate answer:
{candidate}

Strictness: {strictness}

Does the candidate correctly solve the task? Return only ACCEPT or REJECT.";

/// Substitute `{name}` placeholders with their values.
pub fn render(template: &str, fields: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in fields {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
