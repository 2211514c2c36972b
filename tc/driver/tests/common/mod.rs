//! Shared mock hardware backend for tc-driver tests

// Each test binary compiles its own copy and uses a different subset.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tc_driver::{
    InterruptCtl, PinFunction, PinRoute, Prescaler, StatusFlags, TcChannels, TcPins,
    TimerBank, TimerDescriptor, TimerId, XcInput,
};

pub const MCK_HZ: u32 = 84_000_000;

/// What the channel's mode register was last programmed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Idle,
    Waveform(Prescaler),
    Capture(Prescaler),
    External(XcInput),
}

/// Register state of one mock channel.
#[derive(Debug, Clone, Copy)]
pub struct Channel {
    pub mode: Mode,
    pub clock_enabled: bool,
    pub ra: u32,
    pub rb: u32,
    pub rc: u32,
    pub counter: u32,
    pub running: bool,
    pub triggers: u32,
    pub sources: StatusFlags,
    pub status: StatusFlags,
}

impl Channel {
    const IDLE: Channel = Channel {
        mode: Mode::Idle,
        clock_enabled: false,
        ra: 0,
        rb: 0,
        rc: 0,
        counter: 0,
        running: false,
        triggers: 0,
        sources: StatusFlags::empty(),
        status: StatusFlags::empty(),
    };
}

/// Interrupt-controller calls in the order they were made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOp {
    Enable(u16),
    Disable(u16),
    Clear(u16),
}

/// Everything the mock hardware remembers, shared with the test body.
#[derive(Debug)]
pub struct State {
    pub channels: [Channel; 3],
    pub routed: Vec<PinRoute>,
    pub line_ops: Vec<LineOp>,
}

impl State {
    fn new() -> Self {
        State {
            channels: [Channel::IDLE; 3],
            routed: Vec::new(),
            line_ops: Vec::new(),
        }
    }

    /// Replay the op log to get a line's current enable state.
    pub fn line_enabled(&self, irq: u16) -> bool {
        let mut enabled = false;
        for op in &self.line_ops {
            match *op {
                LineOp::Enable(i) if i == irq => enabled = true,
                LineOp::Disable(i) if i == irq => enabled = false,
                _ => {}
            }
        }
        enabled
    }

    /// Position of the first matching op in the log.
    pub fn position_of(&self, op: LineOp) -> Option<usize> {
        self.line_ops.iter().position(|&o| o == op)
    }
}

pub struct MockHw {
    state: Arc<Mutex<State>>,
}

impl MockHw {
    fn channel_index(d: &TimerDescriptor) -> usize {
        d.id.index()
    }
}

impl TcChannels for MockHw {
    fn enable_peripheral_clock(&mut self, d: &TimerDescriptor) {
        let mut state = self.state.lock().unwrap();
        state.channels[Self::channel_index(d)].clock_enabled = true;
    }

    fn configure_waveform(&mut self, d: &TimerDescriptor, prescaler: Prescaler) {
        let mut state = self.state.lock().unwrap();
        state.channels[Self::channel_index(d)].mode = Mode::Waveform(prescaler);
    }

    fn configure_capture(&mut self, d: &TimerDescriptor, prescaler: Prescaler) {
        let mut state = self.state.lock().unwrap();
        state.channels[Self::channel_index(d)].mode = Mode::Capture(prescaler);
    }

    fn configure_external(&mut self, d: &TimerDescriptor, input: XcInput) {
        let mut state = self.state.lock().unwrap();
        state.channels[Self::channel_index(d)].mode = Mode::External(input);
    }

    fn set_ra(&mut self, d: &TimerDescriptor, value: u32) {
        let mut state = self.state.lock().unwrap();
        state.channels[Self::channel_index(d)].ra = value;
    }

    fn set_rb(&mut self, d: &TimerDescriptor, value: u32) {
        let mut state = self.state.lock().unwrap();
        state.channels[Self::channel_index(d)].rb = value;
    }

    fn set_rc(&mut self, d: &TimerDescriptor, value: u32) {
        let mut state = self.state.lock().unwrap();
        state.channels[Self::channel_index(d)].rc = value;
    }

    fn ra(&self, d: &TimerDescriptor) -> u32 {
        self.state.lock().unwrap().channels[Self::channel_index(d)].ra
    }

    fn rb(&self, d: &TimerDescriptor) -> u32 {
        self.state.lock().unwrap().channels[Self::channel_index(d)].rb
    }

    fn rc(&self, d: &TimerDescriptor) -> u32 {
        self.state.lock().unwrap().channels[Self::channel_index(d)].rc
    }

    fn counter(&self, d: &TimerDescriptor) -> u32 {
        self.state.lock().unwrap().channels[Self::channel_index(d)].counter
    }

    fn start(&mut self, d: &TimerDescriptor) {
        let mut state = self.state.lock().unwrap();
        let channel = &mut state.channels[Self::channel_index(d)];
        channel.running = true;
        channel.counter = 0;
        channel.triggers += 1;
    }

    fn stop(&mut self, d: &TimerDescriptor) {
        let mut state = self.state.lock().unwrap();
        state.channels[Self::channel_index(d)].running = false;
    }

    fn trigger(&mut self, d: &TimerDescriptor) {
        let mut state = self.state.lock().unwrap();
        let channel = &mut state.channels[Self::channel_index(d)];
        channel.counter = 0;
        channel.triggers += 1;
    }

    fn set_interrupt_sources(&mut self, d: &TimerDescriptor, sources: StatusFlags) {
        let mut state = self.state.lock().unwrap();
        state.channels[Self::channel_index(d)].sources = sources;
    }

    fn read_status(&mut self, d: &TimerDescriptor) -> StatusFlags {
        let mut state = self.state.lock().unwrap();
        let channel = &mut state.channels[Self::channel_index(d)];
        let status = channel.status;
        channel.status = StatusFlags::empty();
        status
    }
}

impl InterruptCtl for MockHw {
    fn enable_line(&mut self, irq: u16) {
        self.state.lock().unwrap().line_ops.push(LineOp::Enable(irq));
    }

    fn disable_line(&mut self, irq: u16) {
        self.state.lock().unwrap().line_ops.push(LineOp::Disable(irq));
    }

    fn clear_pending(&mut self, irq: u16) {
        self.state.lock().unwrap().line_ops.push(LineOp::Clear(irq));
    }
}

impl TcPins for MockHw {
    fn route(&mut self, route: &PinRoute) {
        self.state.lock().unwrap().routed.push(*route);
    }
}

pub const PIN_TIOA0: PinRoute = PinRoute {
    controller: 1,
    line_mask: 1 << 25,
    function: PinFunction::B,
};
pub const PIN_TIOB0: PinRoute = PinRoute {
    controller: 1,
    line_mask: 1 << 27,
    function: PinFunction::B,
};
pub const PIN_TCLK0: PinRoute = PinRoute {
    controller: 1,
    line_mask: 1 << 26,
    function: PinFunction::B,
};
pub const PIN_TIOA1: PinRoute = PinRoute {
    controller: 0,
    line_mask: 1 << 2,
    function: PinFunction::A,
};
pub const PIN_TIOB1: PinRoute = PinRoute {
    controller: 0,
    line_mask: 1 << 3,
    function: PinFunction::A,
};
pub const PIN_TCLK2: PinRoute = PinRoute {
    controller: 0,
    line_mask: 1 << 22,
    function: PinFunction::B,
};

/// Three channels with deliberately uneven pin routing: channel 0 has
/// every pin, channel 1 lacks the clock input, channel 2 lacks both
/// waveform pins.
pub fn descriptors() -> [TimerDescriptor; 3] {
    [
        TimerDescriptor {
            id: TimerId::new(0),
            block: 0,
            channel: 0,
            interrupt: 27,
            tioa: Some(PIN_TIOA0),
            tiob: Some(PIN_TIOB0),
            tclk: Some(PIN_TCLK0),
        },
        TimerDescriptor {
            id: TimerId::new(1),
            block: 0,
            channel: 1,
            interrupt: 28,
            tioa: Some(PIN_TIOA1),
            tiob: Some(PIN_TIOB1),
            tclk: None,
        },
        TimerDescriptor {
            id: TimerId::new(2),
            block: 0,
            channel: 2,
            interrupt: 29,
            tioa: None,
            tiob: None,
            tclk: Some(PIN_TCLK2),
        },
    ]
}

pub fn bank() -> (TimerBank<MockHw, 3>, Arc<Mutex<State>>) {
    bank_with_reserved(0)
}

pub fn bank_with_reserved(reserved: u16) -> (TimerBank<MockHw, 3>, Arc<Mutex<State>>) {
    let state = Arc::new(Mutex::new(State::new()));
    let hw = MockHw {
        state: state.clone(),
    };
    let bank = TimerBank::with_reserved(hw, descriptors(), MCK_HZ, reserved);
    (bank, state)
}
