#![no_std]
#![forbid(unsafe_code)]

//! # tc-driver
//!
//! Hardware-independent driver for SAM3X-style timer/counter channels.
//! A [`TimerBank`] owns the process-wide per-channel state (registered
//! callbacks, resolved timebases, cached status) behind a critical
//! section, and copyable [`Timer`] handles expose the configuration
//! surface: interrupt attach/detach, start/stop, frequency and period,
//! PWM duty cycle, input capture and external counting.
//!
//! Hardware access goes through the backend traits in [`hal`]; a chip
//! crate implements them over real registers, and the tests here run
//! against a mock.

use core::fmt;

pub mod bank;
pub mod descriptor;
pub mod ehal;
pub mod hal;
pub mod timer;

pub use bank::*;
pub use descriptor::*;
pub use ehal::*;
pub use hal::*;
pub use timer::*;

pub use tc_core::*;

/// Result type used throughout the timer driver
pub type TcResult<T> = Result<T, TcError>;

/// Error types for timer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TcError {
    /// Timer id outside the bank's channel count
    InvalidTimer,
    /// The channel has no pin routed for the requested signal
    PinNotRouted,
}

impl fmt::Display for TcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TcError::InvalidTimer => write!(f, "Timer id outside the bank's channel count"),
            TcError::PinNotRouted => write!(f, "No pin routed for the requested signal"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TcError {}

#[cfg(feature = "defmt")]
impl defmt::Format for TcError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TcError::InvalidTimer => defmt::write!(fmt, "InvalidTimer"),
            TcError::PinNotRouted => defmt::write!(fmt, "PinNotRouted"),
        }
    }
}
