//! Duty-cycle compare computation for waveform outputs

use crate::float::round_nearest;

/// Compute the output-compare value for a duty-cycle percentage.
///
/// The output is raised on reload and dropped on compare match, so the
/// compare point sits `100 - percent` percent into the period. Percent is
/// clamped to `[0, 100]`; 100% yields a compare of 0, which the counter
/// never reaches from above, leaving the output permanently high, and 0%
/// yields the full reload value.
pub fn duty_compare(reload: u32, percent: f64) -> u32 {
    let percent = clamp_percent(percent);
    round_nearest(reload as f64 * (100.0 - percent) / 100.0) as u32
}

fn clamp_percent(percent: f64) -> f64 {
    if percent > 100.0 {
        100.0
    } else if percent > 0.0 {
        percent
    } else {
        // Negative and NaN both land here.
        0.0
    }
}
