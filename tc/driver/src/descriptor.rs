//! Static per-channel descriptors

use core::fmt;

/// Identifier of one timer channel within a bank.
///
/// The id doubles as the index into every per-timer table; handles with
/// the same id are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerId(u8);

impl TimerId {
    /// Create a timer id from a raw index.
    pub const fn new(id: u8) -> Self {
        TimerId(id)
    }

    /// Get the raw id value
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// The id as a table index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timer{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Timer{=u8}", self.0);
    }
}

/// Peripheral multiplex function a pin takes for its timer signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinFunction {
    /// Peripheral function A
    A,
    /// Peripheral function B
    B,
}

/// Physical pin assignment for one timer signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinRoute {
    /// Parallel I/O controller index (0 = PIOA, 1 = PIOB, ...).
    pub controller: u8,
    /// Line mask within that controller.
    pub line_mask: u32,
    /// Multiplex function selecting the timer signal.
    pub function: PinFunction,
}

/// External clock input of a channel.
///
/// Each channel index within a block is hard-wired to one XC input; the
/// mapping is a fixed hardware fact, not a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XcInput {
    Xc0,
    Xc1,
    Xc2,
}

impl XcInput {
    /// The XC input belonging to a channel index within a block.
    pub const fn for_channel(channel: u8) -> Self {
        match channel {
            0 => XcInput::Xc0,
            1 => XcInput::Xc1,
            _ => XcInput::Xc2,
        }
    }
}

/// Immutable description of one hardware timer channel.
///
/// Built once per chip as a const table; never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDescriptor {
    /// Identity; equals the descriptor's position in the bank table.
    pub id: TimerId,
    /// Counter block the channel belongs to.
    pub block: u8,
    /// Channel index within the block (0..=2).
    pub channel: u8,
    /// Interrupt line fired on the channel's compare/capture events.
    /// On SAM3X the number doubles as the peripheral clock id.
    pub interrupt: u16,
    /// Waveform output A / capture trigger input, where routed.
    pub tioa: Option<PinRoute>,
    /// Waveform output B, where routed.
    pub tiob: Option<PinRoute>,
    /// External clock input, where routed.
    pub tclk: Option<PinRoute>,
}
