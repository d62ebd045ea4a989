//! Quantization of continuous control fields onto a fixed level grid.

use super::{denorm, norm, ControlBounds, ControlVector};

/// Snap the continuous fields (temperature, top_p, max_tokens,
/// repetition_penalty, beta, verify_strictness) to the nearest of `2^bits`
/// evenly spaced levels in normalized bound space.
///
/// Idempotent for a fixed bit count. Re-validates the result; on failure
/// the pre-quantization vector is returned unchanged. `bits == 0` is a
/// no-op.
pub fn quantize_controls(cv: &ControlVector, bounds: &ControlBounds, bits: u8) -> ControlVector {
    if bits == 0 {
        return cv.clone();
    }
    let levels = (1u64 << bits.min(32)) as f64;
    let q = |v: f64, range: (f64, f64)| -> f64 {
        if range.1 <= range.0 {
            return v;
        }
        let t = norm(v, range).clamp(0.0, 1.0);
        let idx = (t * (levels - 1.0)).round();
        denorm(idx / (levels - 1.0), range)
    };

    let mut out = cv.clone();
    out.temperature = q(cv.temperature, bounds.temperature);
    out.top_p = q(cv.top_p, bounds.top_p);
    out.max_tokens = q(
        cv.max_tokens as f64,
        (bounds.max_tokens.0 as f64, bounds.max_tokens.1 as f64),
    )
    .round() as u32;
    out.repetition_penalty = q(cv.repetition_penalty, bounds.repetition_penalty);
    out.beta = q(cv.beta, bounds.beta);
    out.verify_strictness = q(cv.verify_strictness, bounds.verify_strictness);

    if out.validate(bounds) {
        out
    } else {
        cv.clone()
    }
}
