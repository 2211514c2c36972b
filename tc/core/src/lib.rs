#![no_std]
#![forbid(unsafe_code)]

//! # tc-core
//!
//! Clock-selection arithmetic for SAM3X-style timer/counter channels.
//! Given a master clock rate and a requested frequency, period, capture
//! window or duty cycle, this crate computes which of the four fixed
//! prescalers to use and the integer reload/compare values to program.
//! It knows nothing about registers; the driver and chip crates turn
//! these results into hardware writes.

pub mod clock;
pub mod duty;
pub mod time;

mod float;

pub use clock::*;
pub use duty::*;
pub use time::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
