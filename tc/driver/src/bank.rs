//! Process-wide timer bank: per-channel state and every operation

use core::cell::RefCell;

use critical_section::Mutex;
use tc_core::{
    best_capture_clock, best_clock, duty_compare, frequency_to_period_micros, ticks_to_micros,
    ticks_to_millis, ticks_to_secs,
};

use crate::descriptor::{TimerDescriptor, TimerId, XcInput};
use crate::hal::{StatusFlags, TcBackend};
use crate::timer::Timer;
use crate::{TcError, TcResult};

/// Most recent successful mode configuration of a channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timebase {
    /// Never configured.
    Unset,
    /// Waveform generation at an achieved frequency in Hz.
    Frequency {
        /// Frequency the hardware really produces, after rounding.
        hz: f64,
    },
    /// Input capture with a per-tick resolution in microseconds.
    Capture {
        /// Duration of one counter tick.
        resolution_us: f64,
    },
    /// Externally clocked counting; no internal timebase applies.
    Counter,
}

/// Mutable per-channel state, shared by every handle with the same id.
#[derive(Clone, Copy)]
struct Slot {
    callback: Option<fn()>,
    timebase: Timebase,
    last_status: StatusFlags,
}

impl Slot {
    const EMPTY: Slot = Slot {
        callback: None,
        timebase: Timebase::Unset,
        last_status: StatusFlags::empty(),
    };
}

struct Inner<C, const N: usize> {
    hw: C,
    slots: [Slot; N],
}

/// Process-wide registry of `N` timer channels over one hardware backend.
///
/// All mutable state lives behind a critical section so configuration
/// calls and interrupt dispatch cannot observe each other mid-update.
/// Registered callbacks are invoked after the section is released, so a
/// callback may itself stop or reconfigure its timer.
pub struct TimerBank<C, const N: usize> {
    descriptors: [TimerDescriptor; N],
    mck_hz: u32,
    reserved: u16,
    inner: Mutex<RefCell<Inner<C, N>>>,
}

impl<C, const N: usize> TimerBank<C, N> {
    /// Create a bank over a backend, descriptor table and master clock.
    pub const fn new(hw: C, descriptors: [TimerDescriptor; N], mck_hz: u32) -> Self {
        Self::with_reserved(hw, descriptors, mck_hz, 0)
    }

    /// Create a bank with a reservation mask over ids 0..16; reserved
    /// ids are skipped by [`TimerBank::find_available`].
    pub const fn with_reserved(
        hw: C,
        descriptors: [TimerDescriptor; N],
        mck_hz: u32,
        reserved: u16,
    ) -> Self {
        Self {
            descriptors,
            mck_hz,
            reserved,
            inner: Mutex::new(RefCell::new(Inner {
                hw,
                slots: [Slot::EMPTY; N],
            })),
        }
    }

    /// Number of channels in the bank.
    pub const fn count(&self) -> usize {
        N
    }

    /// Master clock rate the bank divides from, in Hz.
    pub const fn master_clock_hz(&self) -> u32 {
        self.mck_hz
    }

    /// Descriptor for a channel. Ids from handles are in range by
    /// construction; a hand-rolled out-of-range id faults here.
    pub fn descriptor(&self, id: TimerId) -> &TimerDescriptor {
        &self.descriptors[id.index()]
    }

    fn is_reserved(&self, index: usize) -> bool {
        index < 16 && self.reserved & (1u16 << index) != 0
    }

    fn fallback_index(&self) -> usize {
        (0..N).find(|&i| !self.is_reserved(i)).unwrap_or(0)
    }
}

impl<C: TcBackend, const N: usize> TimerBank<C, N> {
    fn with_inner<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Inner<C, N>) -> R,
    {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            f(&mut inner)
        })
    }

    /// Checked handle lookup for runtime-computed ids.
    pub fn timer(&self, id: TimerId) -> TcResult<Timer<'_, C, N>> {
        if id.index() >= N {
            return Err(TcError::InvalidTimer);
        }
        Ok(Timer::new(self, id))
    }

    /// Lowest unreserved id whose callback slot is empty.
    ///
    /// With every slot occupied this falls back to the lowest unreserved
    /// id; callers get a best-effort handle, not a guaranteed-free one.
    pub fn find_available(&self) -> TimerId {
        self.with_inner(|inner| {
            for (index, slot) in inner.slots.iter().enumerate() {
                if self.is_reserved(index) {
                    continue;
                }
                if slot.callback.is_none() {
                    return TimerId::new(index as u8);
                }
            }
            TimerId::new(self.fallback_index() as u8)
        })
    }

    /// Register a callback for a channel, replacing any previous one.
    /// Does not enable the interrupt line.
    pub fn attach_interrupt(&self, id: TimerId, callback: fn()) {
        self.with_inner(|inner| inner.slots[id.index()].callback = Some(callback));
    }

    /// Stop the channel and clear its callback slot.
    pub fn detach_interrupt(&self, id: TimerId) {
        self.stop(id);
        self.with_inner(|inner| inner.slots[id.index()].callback = None);
    }

    /// Start the channel.
    ///
    /// A channel never configured first gets a 1 Hz timebase. Any stale
    /// pending interrupt is cleared before the line is enabled, and the
    /// line is enabled only when a callback is attached; the counter
    /// itself starts either way.
    pub fn start(&self, id: TimerId) {
        let unconfigured =
            self.with_inner(|inner| matches!(inner.slots[id.index()].timebase, Timebase::Unset));
        if unconfigured {
            self.set_frequency(id, 1.0);
        }

        let d = self.descriptor(id);
        self.with_inner(|inner| {
            inner.hw.clear_pending(d.interrupt);
            if inner.slots[id.index()].callback.is_some() {
                inner.hw.enable_line(d.interrupt);
            }
            inner.hw.start(d);
        });
    }

    /// Apply a period first (when positive), then start.
    pub fn start_with_period(&self, id: TimerId, period_us: f64) {
        if period_us > 0.0 {
            self.set_period(id, period_us);
        }
        self.start(id);
    }

    /// Disable the interrupt line and halt the channel. Idempotent.
    pub fn stop(&self, id: TimerId) {
        let d = self.descriptor(id);
        self.with_inner(|inner| {
            inner.hw.disable_line(d.interrupt);
            inner.hw.stop(d);
        });
    }

    /// Configure waveform generation as close to `frequency_hz` as the
    /// prescalers allow and return the frequency actually achieved.
    ///
    /// Requests at or below 0 Hz clamp to 1 Hz. The channel is
    /// programmed for up-count with reset on reload match, output A at
    /// 50% duty, only the reload-compare interrupt source enabled, and
    /// is (re)started. The achieved frequency, not the requested one, is
    /// recorded and reported by [`TimerBank::frequency`].
    pub fn set_frequency(&self, id: TimerId, frequency_hz: f64) -> f64 {
        let selection = best_clock(self.mck_hz, frequency_hz);
        let d = self.descriptor(id);
        self.with_inner(|inner| {
            inner.hw.enable_peripheral_clock(d);
            inner.hw.configure_waveform(d, selection.prescaler);
            inner.hw.set_ra(d, selection.reload / 2);
            inner.hw.set_rc(d, selection.reload);
            inner.hw.start(d);
            inner.hw.set_interrupt_sources(d, StatusFlags::RC_COMPARE);
            inner.slots[id.index()].timebase = Timebase::Frequency {
                hz: selection.actual_hz,
            };
        });
        selection.actual_hz
    }

    /// Configure by period in microseconds; returns the achieved
    /// frequency. Non-positive periods take the 1 Hz clamp rather than
    /// dividing by zero.
    pub fn set_period(&self, id: TimerId, period_us: f64) -> f64 {
        let frequency_hz = if period_us > 0.0 { 1.0e6 / period_us } else { 0.0 };
        self.set_frequency(id, frequency_hz)
    }

    /// Configure by period in milliseconds; returns the achieved
    /// frequency.
    pub fn set_period_millis(&self, id: TimerId, period_ms: f64) -> f64 {
        self.set_period(id, period_ms * 1.0e3)
    }

    /// Achieved frequency in Hz; `None` outside waveform mode.
    pub fn frequency(&self, id: TimerId) -> Option<f64> {
        match self.timebase(id) {
            Timebase::Frequency { hz } => Some(hz),
            _ => None,
        }
    }

    /// Achieved period in microseconds; `None` outside waveform mode.
    pub fn period_micros(&self, id: TimerId) -> Option<f64> {
        self.frequency(id).map(frequency_to_period_micros)
    }

    /// Most recent mode configuration of the channel.
    pub fn timebase(&self, id: TimerId) -> Timebase {
        self.with_inner(|inner| inner.slots[id.index()].timebase)
    }

    /// Set output A's duty cycle as a percentage of the current period,
    /// returning the compare value written.
    ///
    /// The reload value is read back from hardware, so this follows any
    /// earlier frequency change. 100% writes 0 (output never drops),
    /// 0% writes the full reload value.
    pub fn set_duty_cycle_a(&self, id: TimerId, percent: f64) -> u32 {
        let d = self.descriptor(id);
        self.with_inner(|inner| {
            let compare = duty_compare(inner.hw.rc(d), percent);
            inner.hw.set_ra(d, compare);
            compare
        })
    }

    /// Set output B's duty cycle as a percentage of the current period,
    /// returning the compare value written.
    pub fn set_duty_cycle_b(&self, id: TimerId, percent: f64) -> u32 {
        let d = self.descriptor(id);
        self.with_inner(|inner| {
            let compare = duty_compare(inner.hw.rc(d), percent);
            inner.hw.set_rb(d, compare);
            compare
        })
    }

    /// Set output A's on-time in microseconds of the current period.
    pub fn set_time_on_a(&self, id: TimerId, micros: f64) -> u32 {
        self.set_duty_cycle_a(id, self.on_time_percent(id, micros))
    }

    /// Set output B's on-time in microseconds of the current period.
    pub fn set_time_on_b(&self, id: TimerId, micros: f64) -> u32 {
        self.set_duty_cycle_b(id, self.on_time_percent(id, micros))
    }

    /// Set output A's on-time in milliseconds of the current period.
    pub fn set_time_on_a_millis(&self, id: TimerId, millis: f64) -> u32 {
        self.set_time_on_a(id, millis * 1.0e3)
    }

    /// Set output B's on-time in milliseconds of the current period.
    pub fn set_time_on_b_millis(&self, id: TimerId, millis: f64) -> u32 {
        self.set_time_on_b(id, millis * 1.0e3)
    }

    /// On-time as a percentage of the configured period; channels
    /// without a period treat any on-time as 0%.
    fn on_time_percent(&self, id: TimerId, micros: f64) -> f64 {
        match self.period_micros(id) {
            Some(period_us) if period_us > 0.0 => micros / period_us * 100.0,
            _ => 0.0,
        }
    }

    /// Configure input capture over the A input for periods up to
    /// `max_period_us`.
    ///
    /// Picks the finest prescaler covering the window, routes the A
    /// input pin, latches falling edges into register A and rising edges
    /// into register B, arms the load/overflow/reload-compare interrupt
    /// sources and starts the channel. Fails when the channel has no A
    /// input pin.
    pub fn set_capture(&self, id: TimerId, max_period_us: f64) -> TcResult<()> {
        let d = self.descriptor(id);
        let route = d.tioa.ok_or(TcError::PinNotRouted)?;
        let selection = best_capture_clock(self.mck_hz, max_period_us);
        self.with_inner(|inner| {
            inner.hw.route(&route);
            inner.hw.enable_peripheral_clock(d);
            inner.hw.configure_capture(d, selection.prescaler);
            inner.hw.set_rc(d, selection.reload);
            inner.hw.set_interrupt_sources(
                d,
                StatusFlags::RA_LOADED
                    | StatusFlags::RB_LOADED
                    | StatusFlags::COUNTER_OVERFLOW
                    | StatusFlags::RC_COMPARE,
            );
            inner.hw.start(d);
            inner.slots[id.index()].timebase = Timebase::Capture {
                resolution_us: selection.resolution_us,
            };
        });
        Ok(())
    }

    /// Capture over a window given in milliseconds.
    pub fn set_capture_millis(&self, id: TimerId, max_period_ms: f64) -> TcResult<()> {
        self.set_capture(id, max_period_ms * 1.0e3)
    }

    /// Capture over a window given in seconds.
    pub fn set_capture_secs(&self, id: TimerId, max_period_s: f64) -> TcResult<()> {
        self.set_capture(id, max_period_s * 1.0e6)
    }

    /// Raw value latched into capture register A (falling edge).
    pub fn capture_value_a(&self, id: TimerId) -> u32 {
        let d = self.descriptor(id);
        self.with_inner(|inner| inner.hw.ra(d))
    }

    /// Raw value latched into capture register B (rising edge).
    pub fn capture_value_b(&self, id: TimerId) -> u32 {
        let d = self.descriptor(id);
        self.with_inner(|inner| inner.hw.rb(d))
    }

    /// Per-tick resolution in microseconds; `None` outside capture mode.
    pub fn resolution_micros(&self, id: TimerId) -> Option<f64> {
        match self.timebase(id) {
            Timebase::Capture { resolution_us } => Some(resolution_us),
            _ => None,
        }
    }

    /// Microseconds represented by a raw tick count at the channel's
    /// capture resolution. Zero outside capture mode.
    pub fn value_to_micros(&self, id: TimerId, ticks: u32) -> f64 {
        ticks_to_micros(ticks, self.resolution_micros(id).unwrap_or(0.0))
    }

    /// Milliseconds represented by a raw tick count. Zero outside
    /// capture mode.
    pub fn value_to_millis(&self, id: TimerId, ticks: u32) -> f64 {
        ticks_to_millis(ticks, self.resolution_micros(id).unwrap_or(0.0))
    }

    /// Seconds represented by a raw tick count. Zero outside capture
    /// mode.
    pub fn value_to_secs(&self, id: TimerId, ticks: u32) -> f64 {
        ticks_to_secs(ticks, self.resolution_micros(id).unwrap_or(0.0))
    }

    /// Configure external-clock counting on the channel's XC input.
    ///
    /// Routes the clock input pin, selects the channel's hard-wired XC
    /// input and enables only the overflow interrupt source. The channel
    /// stays halted until [`TimerBank::start`]. Fails when the channel
    /// has no clock input pin.
    pub fn set_counter(&self, id: TimerId) -> TcResult<()> {
        let d = self.descriptor(id);
        let route = d.tclk.ok_or(TcError::PinNotRouted)?;
        let input = XcInput::for_channel(d.channel);
        self.with_inner(|inner| {
            inner.hw.route(&route);
            inner.hw.enable_peripheral_clock(d);
            inner.hw.configure_external(d, input);
            inner.hw.set_interrupt_sources(d, StatusFlags::COUNTER_OVERFLOW);
            inner.slots[id.index()].timebase = Timebase::Counter;
        });
        Ok(())
    }

    /// Live counter value.
    pub fn counter_value(&self, id: TimerId) -> u32 {
        let d = self.descriptor(id);
        self.with_inner(|inner| inner.hw.counter(d))
    }

    /// Read the counter and reset it in one uninterruptible sequence,
    /// returning the pre-reset value.
    pub fn counter_value_and_reset(&self, id: TimerId) -> u32 {
        let d = self.descriptor(id);
        self.with_inner(|inner| {
            let value = inner.hw.counter(d);
            inner.hw.trigger(d);
            value
        })
    }

    /// Reset the counter to zero via software trigger.
    pub fn reset_counter(&self, id: TimerId) {
        let d = self.descriptor(id);
        self.with_inner(|inner| inner.hw.trigger(d));
    }

    /// Status flags cached at the channel's most recent interrupt.
    pub fn status_register(&self, id: TimerId) -> StatusFlags {
        self.with_inner(|inner| inner.slots[id.index()].last_status)
    }

    /// Route the channel's A output/input pin.
    pub fn enable_pin_a(&self, id: TimerId) -> TcResult<()> {
        self.route_pin(self.descriptor(id).tioa)
    }

    /// Route the channel's B output pin.
    pub fn enable_pin_b(&self, id: TimerId) -> TcResult<()> {
        self.route_pin(self.descriptor(id).tiob)
    }

    /// Route the channel's external clock input pin.
    pub fn enable_pin_clock(&self, id: TimerId) -> TcResult<()> {
        self.route_pin(self.descriptor(id).tclk)
    }

    fn route_pin(&self, route: Option<crate::PinRoute>) -> TcResult<()> {
        let route = route.ok_or(TcError::PinNotRouted)?;
        self.with_inner(|inner| inner.hw.route(&route));
        Ok(())
    }

    /// Interrupt entry point for a channel.
    ///
    /// Reads and clears the hardware status, caches it for
    /// [`TimerBank::status_register`], then invokes the registered
    /// callback outside the critical section. Without a callback only
    /// the status read happens.
    pub fn dispatch(&self, id: TimerId) {
        let d = self.descriptor(id);
        let callback = self.with_inner(|inner| {
            let status = inner.hw.read_status(d);
            let slot = &mut inner.slots[id.index()];
            slot.last_status = status;
            slot.callback
        });
        if let Some(callback) = callback {
            callback();
        }
    }
}
