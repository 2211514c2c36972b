//! Prescaler and reload selection for waveform and capture modes

use core::fmt;

use crate::float::{fabs, round_nearest};

/// Input-clock prescaler for a timer/counter channel.
///
/// The channel clock is the master clock divided by one of four fixed
/// divisors; no other rates exist on this hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Prescaler {
    /// Master clock / 2
    Div2,
    /// Master clock / 8
    Div8,
    /// Master clock / 32
    Div32,
    /// Master clock / 128
    Div128,
}

impl Prescaler {
    /// All prescalers, finest to coarsest.
    pub const ALL: [Prescaler; 4] = [
        Prescaler::Div2,
        Prescaler::Div8,
        Prescaler::Div32,
        Prescaler::Div128,
    ];

    /// The divisor applied to the master clock.
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Div2 => 2,
            Prescaler::Div8 => 8,
            Prescaler::Div32 => 32,
            Prescaler::Div128 => 128,
        }
    }

    /// Duration of one channel-clock tick, in microseconds.
    pub fn tick_micros(self, mck_hz: u32) -> f64 {
        self.divisor() as f64 * 1.0e6 / mck_hz as f64
    }
}

impl fmt::Display for Prescaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MCK/{}", self.divisor())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Prescaler {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "MCK/{=u32}", self.divisor());
    }
}

/// Outcome of waveform clock selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSelection {
    /// Chosen prescaler.
    pub prescaler: Prescaler,
    /// Reload (RC compare) value; the counter resets when it is reached.
    pub reload: u32,
    /// Frequency actually achieved after rounding, in Hz.
    pub actual_hz: f64,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockSelection {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "ClockSelection({}, reload={=u32})",
            self.prescaler,
            self.reload
        );
    }
}

/// Outcome of capture clock selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSelection {
    /// Chosen prescaler.
    pub prescaler: Prescaler,
    /// Duration of one tick at that prescaler, in microseconds.
    pub resolution_us: f64,
    /// Reload value bounding the capture window.
    pub reload: u32,
}

#[cfg(feature = "defmt")]
impl defmt::Format for CaptureSelection {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "CaptureSelection({}, reload={=u32})",
            self.prescaler,
            self.reload
        );
    }
}

/// Number of tick values a 32-bit channel counter can represent.
const COUNTER_RANGE_TICKS: f64 = 4_294_967_296.0;

/// Pick the prescaler and reload value that best approximate a requested
/// frequency.
///
/// Requests at or below 0 Hz (and NaN) are clamped to 1 Hz. For each
/// prescaler the ideal tick count is `mck / frequency / divisor`; the
/// rounding error is weighted by the divisor, since one tick of slack
/// costs `divisor` master-clock cycles per period. Candidates are
/// examined coarsest first and replaced only on strictly smaller error.
///
/// `reload` is the rounded tick count; values beyond the 32-bit register
/// saturate. `actual_hz` is the frequency the hardware will really
/// produce, which is what callers should report back.
pub fn best_clock(mck_hz: u32, frequency_hz: f64) -> ClockSelection {
    let frequency_hz = clamp_frequency(frequency_hz);

    let mut best = Prescaler::Div128;
    let mut best_error = f64::INFINITY;
    for &prescaler in Prescaler::ALL.iter().rev() {
        let divisor = prescaler.divisor() as f64;
        let ticks = mck_hz as f64 / frequency_hz / divisor;
        let error = divisor * fabs(ticks - round_nearest(ticks));
        if error < best_error {
            best = prescaler;
            best_error = error;
        }
    }

    let ticks = mck_hz as f64 / frequency_hz / best.divisor() as f64;
    let reload = round_nearest(ticks) as u32;
    let actual_hz = mck_hz as f64 / best.divisor() as f64 / reload as f64;
    ClockSelection {
        prescaler: best,
        reload,
        actual_hz,
    }
}

/// Pick the finest prescaler whose full 32-bit range still covers a
/// requested maximum period, in microseconds.
///
/// Prescalers are examined finest first; the first one whose range
/// exceeds the request wins. Oversize requests fall back to the coarsest
/// prescaler with the reload saturated at the register width.
pub fn best_capture_clock(mck_hz: u32, max_period_us: f64) -> CaptureSelection {
    let mut chosen = Prescaler::Div128;
    for prescaler in Prescaler::ALL {
        if prescaler.tick_micros(mck_hz) * COUNTER_RANGE_TICKS > max_period_us {
            chosen = prescaler;
            break;
        }
    }

    let resolution_us = chosen.tick_micros(mck_hz);
    let reload = round_nearest(max_period_us / resolution_us) as u32;
    CaptureSelection {
        prescaler: chosen,
        resolution_us,
        reload,
    }
}

/// The documented clamp: zero, negative and NaN requests all mean 1 Hz.
pub fn clamp_frequency(frequency_hz: f64) -> f64 {
    if frequency_hz > 0.0 {
        frequency_hz
    } else {
        1.0
    }
}
