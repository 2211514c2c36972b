//! Conversions between frequencies, periods and raw tick counts

/// Period in microseconds for a frequency in Hz.
pub fn frequency_to_period_micros(hz: f64) -> f64 {
    1.0e6 / hz
}

/// Frequency in Hz for a period in microseconds.
pub fn period_micros_to_frequency(us: f64) -> f64 {
    1.0e6 / us
}

/// Microseconds represented by a tick count at a per-tick resolution.
pub fn ticks_to_micros(ticks: u32, resolution_us: f64) -> f64 {
    ticks as f64 * resolution_us
}

/// Milliseconds represented by a tick count at a per-tick resolution.
pub fn ticks_to_millis(ticks: u32, resolution_us: f64) -> f64 {
    ticks_to_micros(ticks, resolution_us) / 1.0e3
}

/// Seconds represented by a tick count at a per-tick resolution.
pub fn ticks_to_secs(ticks: u32, resolution_us: f64) -> f64 {
    ticks_to_micros(ticks, resolution_us) / 1.0e6
}
