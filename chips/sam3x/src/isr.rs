//! Interrupt entry points for the nine TC channels.
//!
//! Symbol names match the SAM3X vector table, so both cortex-m-rt and
//! the Arduino Due core pick them up by name.

#![allow(non_snake_case)]

use tc_driver::TimerId;

use crate::TIMERS;

#[no_mangle]
pub extern "C" fn TC0_Handler() {
    TIMERS.dispatch(TimerId::new(0));
}

#[no_mangle]
pub extern "C" fn TC1_Handler() {
    TIMERS.dispatch(TimerId::new(1));
}

#[no_mangle]
pub extern "C" fn TC2_Handler() {
    TIMERS.dispatch(TimerId::new(2));
}

#[no_mangle]
pub extern "C" fn TC3_Handler() {
    TIMERS.dispatch(TimerId::new(3));
}

#[no_mangle]
pub extern "C" fn TC4_Handler() {
    TIMERS.dispatch(TimerId::new(4));
}

#[no_mangle]
pub extern "C" fn TC5_Handler() {
    TIMERS.dispatch(TimerId::new(5));
}

#[no_mangle]
pub extern "C" fn TC6_Handler() {
    TIMERS.dispatch(TimerId::new(6));
}

#[no_mangle]
pub extern "C" fn TC7_Handler() {
    TIMERS.dispatch(TimerId::new(7));
}

#[no_mangle]
pub extern "C" fn TC8_Handler() {
    TIMERS.dispatch(TimerId::new(8));
}
