//! Minimal float helpers.
//!
//! `f64::abs` and `f64::round` live in `std`, not `core`. The selection
//! arithmetic only applies them to finite non-negative values, which
//! these cover.

pub(crate) fn fabs(x: f64) -> f64 {
    if x < 0.0 {
        -x
    } else {
        x
    }
}

/// Round to nearest, halves up. Callers pass non-negative values only.
pub(crate) fn round_nearest(x: f64) -> f64 {
    let whole = (x as u64) as f64;
    if x - whole >= 0.5 {
        whole + 1.0
    } else {
        whole
    }
}
