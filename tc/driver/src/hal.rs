//! Backend traits a chip crate implements over real registers

use core::ops::{BitOr, BitOrAssign};

use tc_core::Prescaler;

use crate::descriptor::{PinRoute, TimerDescriptor, XcInput};

/// Channel status word, also used to select interrupt sources.
///
/// The bit layout is the TC block's own: a backend may write the raw
/// value straight to the interrupt enable/disable registers and return
/// the status register read unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusFlags(u32);

impl StatusFlags {
    /// Counter wrapped past its maximum.
    pub const COUNTER_OVERFLOW: StatusFlags = StatusFlags(1 << 0);
    /// A capture register was overwritten before being read.
    pub const LOAD_OVERRUN: StatusFlags = StatusFlags(1 << 1);
    /// Counter matched compare register A.
    pub const RA_COMPARE: StatusFlags = StatusFlags(1 << 2);
    /// Counter matched compare register B.
    pub const RB_COMPARE: StatusFlags = StatusFlags(1 << 3);
    /// Counter matched the reload (RC) register.
    pub const RC_COMPARE: StatusFlags = StatusFlags(1 << 4);
    /// Capture register A latched a value.
    pub const RA_LOADED: StatusFlags = StatusFlags(1 << 5);
    /// Capture register B latched a value.
    pub const RB_LOADED: StatusFlags = StatusFlags(1 << 6);
    /// External trigger edge seen.
    pub const EXTERNAL_TRIGGER: StatusFlags = StatusFlags(1 << 7);

    /// No flags set.
    pub const fn empty() -> Self {
        StatusFlags(0)
    }

    /// Wrap a raw status word.
    pub const fn from_raw(raw: u32) -> Self {
        StatusFlags(raw)
    }

    /// Get the raw status word
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check whether every flag in `other` is set.
    pub const fn contains(self, other: StatusFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check whether no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for StatusFlags {
    type Output = StatusFlags;

    fn bitor(self, rhs: StatusFlags) -> StatusFlags {
        StatusFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for StatusFlags {
    fn bitor_assign(&mut self, rhs: StatusFlags) {
        self.0 |= rhs.0;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "StatusFlags({=u32:x})", self.0);
    }
}

/// Register-level control of timer/counter channels.
///
/// Implementations locate the channel through its descriptor and perform
/// plain register writes; nothing here fails at runtime.
pub trait TcChannels: Send + Sync {
    /// Unlock register write protection and feed the peripheral clock.
    fn enable_peripheral_clock(&mut self, d: &TimerDescriptor);

    /// Program waveform mode: up-count with automatic reset on RC
    /// compare, the given prescaler as input clock, compare effects
    /// driving the A and B outputs.
    fn configure_waveform(&mut self, d: &TimerDescriptor, prescaler: Prescaler);

    /// Program capture mode: falling edge latches register A, rising
    /// edge latches register B, the A input as external trigger, RC
    /// compare resetting the counter.
    fn configure_capture(&mut self, d: &TimerDescriptor, prescaler: Prescaler);

    /// Program external-counter mode clocked from the given XC input.
    fn configure_external(&mut self, d: &TimerDescriptor, input: XcInput);

    /// Write compare/capture register A.
    fn set_ra(&mut self, d: &TimerDescriptor, value: u32);

    /// Write compare/capture register B.
    fn set_rb(&mut self, d: &TimerDescriptor, value: u32);

    /// Write the reload (RC) register.
    fn set_rc(&mut self, d: &TimerDescriptor, value: u32);

    /// Read compare/capture register A.
    fn ra(&self, d: &TimerDescriptor) -> u32;

    /// Read compare/capture register B.
    fn rb(&self, d: &TimerDescriptor) -> u32;

    /// Read the reload (RC) register.
    fn rc(&self, d: &TimerDescriptor) -> u32;

    /// Read the live counter value.
    fn counter(&self, d: &TimerDescriptor) -> u32;

    /// Enable the channel clock and software-trigger a restart from zero.
    fn start(&mut self, d: &TimerDescriptor);

    /// Disable the channel clock.
    fn stop(&mut self, d: &TimerDescriptor);

    /// Software-trigger only: reset the counter to zero.
    fn trigger(&mut self, d: &TimerDescriptor);

    /// Enable exactly `sources` as interrupt sources, disabling the rest.
    fn set_interrupt_sources(&mut self, d: &TimerDescriptor, sources: StatusFlags);

    /// Read the channel status flags; the read also clears them.
    fn read_status(&mut self, d: &TimerDescriptor) -> StatusFlags;
}

/// Interrupt-line control at the interrupt controller.
pub trait InterruptCtl: Send + Sync {
    /// Enable an interrupt line
    fn enable_line(&mut self, irq: u16);

    /// Disable an interrupt line
    fn disable_line(&mut self, irq: u16);

    /// Clear a pending interrupt
    fn clear_pending(&mut self, irq: u16);
}

/// Pin multiplexing for timer signals.
pub trait TcPins: Send + Sync {
    /// Hand a pin over to its timer peripheral function.
    fn route(&mut self, route: &PinRoute);
}

/// Everything the bank needs from a hardware backend.
pub trait TcBackend: TcChannels + InterruptCtl + TcPins {}

impl<T: TcChannels + InterruptCtl + TcPins> TcBackend for T {}
