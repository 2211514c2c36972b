#![no_std]

//! # tc-sam3x
//!
//! Ready-made timer handles for the nine timer/counter channels of the
//! Atmel SAM3X8E, the microcontroller on the Arduino Due. The crate
//! owns a process-wide [`TimerBank`] over the real registers and wires
//! every TC interrupt handler to it; applications grab a handle and
//! chain configuration calls:
//!
//! ```no_run
//! use tc_sam3x::timer1;
//!
//! fn tick() {
//!     // runs in interrupt context once per period
//! }
//!
//! timer1().attach_interrupt(tick).start_with_period(50_000.0);
//! ```
//!
//! Interrupt dispatch needs a `critical-section` implementation; enable
//! this crate's `critical-section-single-core` feature unless the
//! application already provides one.

mod backend;
mod descriptors;
mod isr;
mod regs;

pub use backend::Sam3xHw;
pub use descriptors::DESCRIPTORS;

pub use tc_driver::*;

/// Master clock rate as set up by the Arduino Due board initialization.
pub const MASTER_CLOCK_HZ: u32 = 84_000_000;

/// Timers the Arduino Servo library drives on this chip. With the
/// `servo-compat` feature their named constructors disappear and
/// [`Timer::find_available`] skips them.
#[cfg(feature = "servo-compat")]
const RESERVED_IDS: u16 = 0b0011_1101;
#[cfg(not(feature = "servo-compat"))]
const RESERVED_IDS: u16 = 0;

static TIMERS: TimerBank<Sam3xHw, 9> =
    TimerBank::with_reserved(Sam3xHw::new(), DESCRIPTORS, MASTER_CLOCK_HZ, RESERVED_IDS);

/// Handle type for one SAM3X timer channel.
pub type TcTimer = Timer<'static, Sam3xHw, 9>;

/// The process-wide bank behind every handle.
pub fn bank() -> &'static TimerBank<Sam3xHw, 9> {
    &TIMERS
}

fn handle(id: u8) -> TcTimer {
    Timer::new(&TIMERS, TimerId::new(id))
}

/// Anonymous handle on the first channel; the usual starting point for
/// a [`Timer::find_available`] chain.
pub fn timer() -> TcTimer {
    handle(0)
}

/// TC0 channel 0.
#[cfg(not(feature = "servo-compat"))]
pub fn timer0() -> TcTimer {
    handle(0)
}

/// TC0 channel 1.
pub fn timer1() -> TcTimer {
    handle(1)
}

/// TC0 channel 2.
#[cfg(not(feature = "servo-compat"))]
pub fn timer2() -> TcTimer {
    handle(2)
}

/// TC1 channel 0.
#[cfg(not(feature = "servo-compat"))]
pub fn timer3() -> TcTimer {
    handle(3)
}

/// TC1 channel 1.
#[cfg(not(feature = "servo-compat"))]
pub fn timer4() -> TcTimer {
    handle(4)
}

/// TC1 channel 2.
#[cfg(not(feature = "servo-compat"))]
pub fn timer5() -> TcTimer {
    handle(5)
}

/// TC2 channel 0.
pub fn timer6() -> TcTimer {
    handle(6)
}

/// TC2 channel 1.
pub fn timer7() -> TcTimer {
    handle(7)
}

/// TC2 channel 2.
pub fn timer8() -> TcTimer {
    handle(8)
}
