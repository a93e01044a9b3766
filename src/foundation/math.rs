/// Smallest denominator used when normalizing through a phase window.
pub(crate) const WINDOW_EPSILON: f64 = 1e-4;

/// Clamp `v` into `[0, 1]`. Non-finite input maps to `0`.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}

/// Linear interpolation between `a` and `b` at `t` (unclamped).
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Divide with a denominator floored to [`WINDOW_EPSILON`] in magnitude.
pub(crate) fn safe_div(num: f64, den: f64) -> f64 {
    let den = if den.abs() < WINDOW_EPSILON {
        WINDOW_EPSILON.copysign(if den == 0.0 { 1.0 } else { den })
    } else {
        den
    };
    num / den
}

/// Local position of `v` inside `[start, end]`, clamped to `[0, 1]`.
pub fn window_t(v: f64, start: f64, end: f64) -> f64 {
    clamp01(safe_div(v - start, end - start))
}

/// Sanitize an author-provided number: non-finite values fall back to `default`,
/// finite values are clamped into `[min, max]`.
pub(crate) fn sanitize(v: f64, default: f64, min: f64, max: f64) -> f64 {
    if v.is_finite() {
        v.clamp(min, max)
    } else {
        default
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
