//! Channel table for the nine SAM3X timer/counters

use tc_driver::{PinFunction, PinRoute, TimerDescriptor, TimerId};

const fn pin(controller: u8, line: u32, function: PinFunction) -> PinRoute {
    PinRoute {
        controller,
        line_mask: 1 << line,
        function,
    }
}

const fn channel(
    id: u8,
    interrupt: u16,
    tioa: Option<PinRoute>,
    tiob: Option<PinRoute>,
    tclk: Option<PinRoute>,
) -> TimerDescriptor {
    TimerDescriptor {
        id: TimerId::new(id),
        block: id / 3,
        channel: id % 3,
        interrupt,
        tioa,
        tiob,
        tclk,
    }
}

const PIOA: u8 = 0;
const PIOB: u8 = 1;
const PIOC: u8 = 2;
const PIOD: u8 = 3;

/// The nine channels, in peripheral order.
///
/// Pin assignments are the SAM3X8E multiplexing as wired on the Arduino
/// Due; signals the board does not bring out are `None`. TC6 and TC7
/// have TCLK lines in silicon but no Due pin, and TC3..TC5 expose only
/// their clock inputs.
pub const DESCRIPTORS: [TimerDescriptor; 9] = [
    channel(
        0,
        27,
        Some(pin(PIOB, 25, PinFunction::B)),
        Some(pin(PIOB, 27, PinFunction::B)),
        Some(pin(PIOB, 26, PinFunction::B)),
    ),
    channel(
        1,
        28,
        Some(pin(PIOA, 2, PinFunction::A)),
        Some(pin(PIOA, 3, PinFunction::A)),
        Some(pin(PIOA, 4, PinFunction::A)),
    ),
    channel(
        2,
        29,
        Some(pin(PIOA, 5, PinFunction::A)),
        Some(pin(PIOA, 6, PinFunction::A)),
        Some(pin(PIOA, 7, PinFunction::A)),
    ),
    channel(3, 30, None, None, Some(pin(PIOA, 22, PinFunction::B))),
    channel(4, 31, None, None, Some(pin(PIOA, 23, PinFunction::B))),
    channel(5, 32, None, None, Some(pin(PIOB, 16, PinFunction::A))),
    channel(
        6,
        33,
        Some(pin(PIOC, 25, PinFunction::B)),
        Some(pin(PIOC, 26, PinFunction::B)),
        None,
    ),
    channel(
        7,
        34,
        Some(pin(PIOC, 28, PinFunction::B)),
        Some(pin(PIOC, 29, PinFunction::B)),
        None,
    ),
    channel(
        8,
        35,
        Some(pin(PIOD, 7, PinFunction::B)),
        Some(pin(PIOD, 8, PinFunction::B)),
        Some(pin(PIOD, 9, PinFunction::B)),
    ),
];
