//! Trust-region projection of proposed control vectors.

use super::{denorm, norm, ControlBounds, ControlVector};

/// Project `proposed` to within normalized radius `r` of the baseline.
///
/// Every scalar field is normalized into [0, 1] over its bound range,
/// clamped to within `r` of the baseline's normalized value, and mapped
/// back, rounding integer fields. Retrieval weights are clipped and
/// renormalized independently of `r`. If the projected vector fails
/// re-validation the baseline is returned wholesale.
pub fn trust_region_project(
    proposed: &ControlVector,
    p0: &ControlVector,
    bounds: &ControlBounds,
    r: f64,
) -> ControlVector {
    let r = r.max(0.0);
    let clamp_f = |v: f64, base: f64, range: (f64, f64)| -> f64 {
        let nv = norm(v, range);
        let nb = norm(base, range);
        denorm(nv.clamp(nb - r, nb + r), range)
    };
    let clamp_u = |v: u32, base: u32, range: (u32, u32)| -> u32 {
        let range = (range.0 as f64, range.1 as f64);
        clamp_f(v as f64, base as f64, range).round() as u32
    };

    let mut out = ControlVector {
        temperature: clamp_f(proposed.temperature, p0.temperature, bounds.temperature),
        top_p: clamp_f(proposed.top_p, p0.top_p, bounds.top_p),
        max_tokens: clamp_u(proposed.max_tokens, p0.max_tokens, bounds.max_tokens),
        repetition_penalty: clamp_f(
            proposed.repetition_penalty,
            p0.repetition_penalty,
            bounds.repetition_penalty,
        ),
        gen_count: clamp_u(proposed.gen_count, p0.gen_count, bounds.gen_count),
        branch_quota: clamp_u(proposed.branch_quota, p0.branch_quota, bounds.branch_quota),
        beta: clamp_f(proposed.beta, p0.beta, bounds.beta),
        verify_passes: clamp_u(proposed.verify_passes, p0.verify_passes, bounds.verify_passes),
        verify_strictness: clamp_f(
            proposed.verify_strictness,
            p0.verify_strictness,
            bounds.verify_strictness,
        ),
        retrieval_weights: proposed.retrieval_weights.clone(),
    };
    out.normalize_weights();
    if out.validate(bounds) {
        out
    } else {
        p0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_identity_inside_radius() {
        let bounds = ControlBounds::default();
        let p0 = ControlVector::baseline();
        let mut cv = p0.clone();
        cv.temperature = 0.25;
        cv.beta = 0.2;
        let projected = trust_region_project(&cv, &p0, &bounds, 0.15);
        assert!((projected.temperature - 0.25).abs() < 1e-12);
        assert!((projected.beta - 0.2).abs() < 1e-12);
    }

    #[test]
    fn projection_clamps_to_radius() {
        let bounds = ControlBounds::default();
        let p0 = ControlVector::baseline();
        let r = 0.15;

        let mut cv = p0.clone();
        cv.temperature = 1.0;
        cv.top_p = 0.0;
        cv.max_tokens = 512;
        cv.gen_count = 8;
        let projected = trust_region_project(&cv, &p0, &bounds, r);

        let dist_f = |v: f64, base: f64, range: (f64, f64)| (norm(v, range) - norm(base, range)).abs();
        assert!(dist_f(projected.temperature, p0.temperature, bounds.temperature) <= r + 1e-9);
        assert!(dist_f(projected.top_p, p0.top_p, bounds.top_p) <= r + 1e-9);

        // Integer fields round after denormalization; the distance may
        // exceed r by at most half a unit step.
        let mt_range = (bounds.max_tokens.0 as f64, bounds.max_tokens.1 as f64);
        let mt_step = 0.5 / (mt_range.1 - mt_range.0);
        assert!(
            dist_f(projected.max_tokens as f64, p0.max_tokens as f64, mt_range) <= r + mt_step
        );
        let gc_range = (bounds.gen_count.0 as f64, bounds.gen_count.1 as f64);
        let gc_step = 0.5 / (gc_range.1 - gc_range.0);
        assert!(dist_f(projected.gen_count as f64, p0.gen_count as f64, gc_range) <= r + gc_step);
    }

    #[test]
    fn projected_vector_stays_within_bounds() {
        let bounds = ControlBounds::default();
        let p0 = ControlVector::baseline();
        let mut cv = p0.clone();
        cv.temperature = 1.0;
        cv.repetition_penalty = 2.0;
        cv.verify_passes = 5;
        let projected = trust_region_project(&cv, &p0, &bounds, 0.3);
        assert!(projected.validate(&bounds));
    }

    #[test]
    fn weights_handled_independently_of_radius() {
        let bounds = ControlBounds::default();
        let p0 = ControlVector::baseline();
        let mut cv = p0.clone();
        cv.retrieval_weights.insert("general".to_string(), 0.9);
        cv.retrieval_weights.insert("math-lemmas".to_string(), 0.9);
        let projected = trust_region_project(&cv, &p0, &bounds, 0.0);
        // r = 0 pins the scalars to the baseline but weights still clip
        // and renormalize on their own.
        assert_eq!(projected.temperature, p0.temperature);
        let total: f64 = projected.retrieval_weights.values().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
}
