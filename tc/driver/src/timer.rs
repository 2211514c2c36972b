//! Copyable timer handles with chained configuration calls

use crate::bank::{Timebase, TimerBank};
use crate::descriptor::TimerId;
use crate::ehal::{PwmOutput, TcPwm};
use crate::hal::{StatusFlags, TcBackend};
use crate::TcResult;

/// A cheap, copyable view of one timer channel.
///
/// The handle carries only the channel id and a reference to its bank;
/// everything it reads or writes is the bank's shared per-id state, so
/// two handles with the same id are interchangeable and compare equal.
/// Configuration calls hand the same handle back, allowing chains like
/// `timer.attach_interrupt(tick).start()`.
pub struct Timer<'a, C, const N: usize> {
    bank: &'a TimerBank<C, N>,
    id: TimerId,
}

impl<'a, C, const N: usize> Clone for Timer<'a, C, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, C, const N: usize> Copy for Timer<'a, C, N> {}

impl<'a, C, const N: usize> PartialEq for Timer<'a, C, N> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<'a, C, const N: usize> Eq for Timer<'a, C, N> {}

impl<'a, C, const N: usize> core::fmt::Debug for Timer<'a, C, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Timer").field(&self.id.raw()).finish()
    }
}

impl<'a, C: TcBackend, const N: usize> Timer<'a, C, N> {
    /// Bind a handle to a channel id.
    ///
    /// The id must be below the bank's channel count; bank operations
    /// fault on out-of-range ids. [`TimerBank::timer`] is the checked
    /// variant for runtime-computed ids.
    pub fn new(bank: &'a TimerBank<C, N>, id: TimerId) -> Self {
        Timer { bank, id }
    }

    /// The channel id this handle is bound to.
    pub fn id(self) -> TimerId {
        self.id
    }

    /// Handle for the lowest free (unreserved, no callback) channel;
    /// best-effort fallback when everything is taken.
    pub fn find_available(self) -> Self {
        Timer {
            bank: self.bank,
            id: self.bank.find_available(),
        }
    }

    /// Register the interrupt callback, replacing any previous one.
    pub fn attach_interrupt(self, callback: fn()) -> Self {
        self.bank.attach_interrupt(self.id, callback);
        self
    }

    /// Stop the timer and clear its callback.
    pub fn detach_interrupt(self) -> Self {
        self.bank.detach_interrupt(self.id);
        self
    }

    /// Start the timer (1 Hz if never configured).
    pub fn start(self) -> Self {
        self.bank.start(self.id);
        self
    }

    /// Set the period when positive, then start.
    pub fn start_with_period(self, period_us: f64) -> Self {
        self.bank.start_with_period(self.id, period_us);
        self
    }

    /// Disable the interrupt line and halt the channel.
    pub fn stop(self) -> Self {
        self.bank.stop(self.id);
        self
    }

    /// Configure the frequency in Hz; the achieved value is readable
    /// through [`Timer::frequency`].
    pub fn set_frequency(self, frequency_hz: f64) -> Self {
        self.bank.set_frequency(self.id, frequency_hz);
        self
    }

    /// Configure the period in microseconds.
    pub fn set_period(self, period_us: f64) -> Self {
        self.bank.set_period(self.id, period_us);
        self
    }

    /// Configure the period in milliseconds.
    pub fn set_period_millis(self, period_ms: f64) -> Self {
        self.bank.set_period_millis(self.id, period_ms);
        self
    }

    /// Achieved frequency in Hz; `None` outside waveform mode.
    pub fn frequency(self) -> Option<f64> {
        self.bank.frequency(self.id)
    }

    /// Achieved period in microseconds; `None` outside waveform mode.
    pub fn period_micros(self) -> Option<f64> {
        self.bank.period_micros(self.id)
    }

    /// Most recent mode configuration.
    pub fn timebase(self) -> Timebase {
        self.bank.timebase(self.id)
    }

    /// Set output A's duty cycle in percent of the current period.
    pub fn set_duty_cycle_a(self, percent: f64) -> Self {
        self.bank.set_duty_cycle_a(self.id, percent);
        self
    }

    /// Set output B's duty cycle in percent of the current period.
    pub fn set_duty_cycle_b(self, percent: f64) -> Self {
        self.bank.set_duty_cycle_b(self.id, percent);
        self
    }

    /// Set output A's on-time in microseconds.
    pub fn set_time_on_a(self, micros: f64) -> Self {
        self.bank.set_time_on_a(self.id, micros);
        self
    }

    /// Set output B's on-time in microseconds.
    pub fn set_time_on_b(self, micros: f64) -> Self {
        self.bank.set_time_on_b(self.id, micros);
        self
    }

    /// Set output A's on-time in milliseconds.
    pub fn set_time_on_a_millis(self, millis: f64) -> Self {
        self.bank.set_time_on_a_millis(self.id, millis);
        self
    }

    /// Set output B's on-time in milliseconds.
    pub fn set_time_on_b_millis(self, millis: f64) -> Self {
        self.bank.set_time_on_b_millis(self.id, millis);
        self
    }

    /// Configure input capture for periods up to `max_period_us`.
    pub fn set_capture(self, max_period_us: f64) -> TcResult<Self> {
        self.bank.set_capture(self.id, max_period_us)?;
        Ok(self)
    }

    /// Configure input capture over a window in milliseconds.
    pub fn set_capture_millis(self, max_period_ms: f64) -> TcResult<Self> {
        self.bank.set_capture_millis(self.id, max_period_ms)?;
        Ok(self)
    }

    /// Configure input capture over a window in seconds.
    pub fn set_capture_secs(self, max_period_s: f64) -> TcResult<Self> {
        self.bank.set_capture_secs(self.id, max_period_s)?;
        Ok(self)
    }

    /// Raw value latched into capture register A.
    pub fn capture_value_a(self) -> u32 {
        self.bank.capture_value_a(self.id)
    }

    /// Raw value latched into capture register B.
    pub fn capture_value_b(self) -> u32 {
        self.bank.capture_value_b(self.id)
    }

    /// Capture resolution in microseconds per tick; `None` outside
    /// capture mode.
    pub fn resolution_micros(self) -> Option<f64> {
        self.bank.resolution_micros(self.id)
    }

    /// Microseconds represented by a raw tick count.
    pub fn value_to_micros(self, ticks: u32) -> f64 {
        self.bank.value_to_micros(self.id, ticks)
    }

    /// Milliseconds represented by a raw tick count.
    pub fn value_to_millis(self, ticks: u32) -> f64 {
        self.bank.value_to_millis(self.id, ticks)
    }

    /// Seconds represented by a raw tick count.
    pub fn value_to_secs(self, ticks: u32) -> f64 {
        self.bank.value_to_secs(self.id, ticks)
    }

    /// Configure external-clock counting on the channel's XC input.
    pub fn set_counter(self) -> TcResult<Self> {
        self.bank.set_counter(self.id)?;
        Ok(self)
    }

    /// Live counter value.
    pub fn counter_value(self) -> u32 {
        self.bank.counter_value(self.id)
    }

    /// Read the counter and reset it, returning the pre-reset value.
    pub fn counter_value_and_reset(self) -> u32 {
        self.bank.counter_value_and_reset(self.id)
    }

    /// Reset the counter to zero.
    pub fn reset_counter(self) -> Self {
        self.bank.reset_counter(self.id);
        self
    }

    /// Status flags cached at the most recent interrupt.
    pub fn status_register(self) -> StatusFlags {
        self.bank.status_register(self.id)
    }

    /// Route the channel's A output/input pin.
    pub fn enable_pin_a(self) -> TcResult<Self> {
        self.bank.enable_pin_a(self.id)?;
        Ok(self)
    }

    /// Route the channel's B output pin.
    pub fn enable_pin_b(self) -> TcResult<Self> {
        self.bank.enable_pin_b(self.id)?;
        Ok(self)
    }

    /// Route the channel's external clock input pin.
    pub fn enable_pin_clock(self) -> TcResult<Self> {
        self.bank.enable_pin_clock(self.id)?;
        Ok(self)
    }

    /// `embedded-hal` duty-cycle control over output A.
    pub fn pwm_a(self) -> TcPwm<'a, C, N> {
        TcPwm::new(self, PwmOutput::A)
    }

    /// `embedded-hal` duty-cycle control over output B.
    pub fn pwm_b(self) -> TcPwm<'a, C, N> {
        TcPwm::new(self, PwmOutput::B)
    }
}
