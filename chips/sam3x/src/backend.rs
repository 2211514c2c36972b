//! Hardware backend over the SAM3X timer/counter registers

use cortex_m::interrupt::InterruptNumber;
use cortex_m::peripheral::NVIC;
use tc_driver::{
    InterruptCtl, PinFunction, PinRoute, Prescaler, StatusFlags, TcChannels, TcPins,
    TimerDescriptor, XcInput,
};

use crate::regs;

/// NVIC line of a timer channel.
#[derive(Clone, Copy)]
struct TcIrq(u16);

unsafe impl InterruptNumber for TcIrq {
    fn number(self) -> u16 {
        self.0
    }
}

fn tcclks(prescaler: Prescaler) -> u32 {
    match prescaler {
        Prescaler::Div2 => regs::CMR_TCCLKS_MCK2,
        Prescaler::Div8 => regs::CMR_TCCLKS_MCK8,
        Prescaler::Div32 => regs::CMR_TCCLKS_MCK32,
        Prescaler::Div128 => regs::CMR_TCCLKS_MCK128,
    }
}

/// Register-level backend for the SAM3X8E.
///
/// The one instance lives inside the crate's timer bank; all access is
/// serialized there.
pub struct Sam3xHw(());

impl Sam3xHw {
    pub(crate) const fn new() -> Self {
        Sam3xHw(())
    }
}

impl TcChannels for Sam3xHw {
    fn enable_peripheral_clock(&mut self, d: &TimerDescriptor) {
        // The channel's interrupt number doubles as its peripheral id.
        regs::enable_peripheral_clock(d.interrupt);
        regs::unlock_block(d.block);
    }

    fn configure_waveform(&mut self, d: &TimerDescriptor, prescaler: Prescaler) {
        // Up-count to RC, reset on match. RA drops output A, RC raises
        // it again; same for RB on output B. EEVT must name an XC input
        // so TIOB is free to drive.
        let cmr = tcclks(prescaler)
            | regs::CMR_WAVE
            | regs::CMR_WAVSEL_UP_RC
            | regs::CMR_EEVT_XC0
            | regs::CMR_ACPA_CLEAR
            | regs::CMR_ACPC_SET
            | regs::CMR_BCPB_CLEAR
            | regs::CMR_BCPC_SET;
        regs::write_channel(d.block, d.channel, regs::TC_CMR, cmr);
    }

    fn configure_capture(&mut self, d: &TimerDescriptor, prescaler: Prescaler) {
        // Falling edges latch RA, rising edges RB, TIOA is the trigger,
        // and an RC match resets the counter to bound the window.
        let cmr = tcclks(prescaler)
            | regs::CMR_ABETRG
            | regs::CMR_CPCTRG
            | regs::CMR_LDRA_FALLING
            | regs::CMR_LDRB_RISING;
        regs::write_channel(d.block, d.channel, regs::TC_CMR, cmr);
    }

    fn configure_external(&mut self, d: &TimerDescriptor, input: XcInput) {
        let (clock, shift) = match input {
            XcInput::Xc0 => (regs::CMR_TCCLKS_XC0, regs::BMR_TC0XC0S_SHIFT),
            XcInput::Xc1 => (regs::CMR_TCCLKS_XC1, regs::BMR_TC1XC1S_SHIFT),
            XcInput::Xc2 => (regs::CMR_TCCLKS_XC2, regs::BMR_TC2XC2S_SHIFT),
        };
        // Route XCx from its TCLK pin: selector 0 at the block level.
        let bmr = regs::read_block(d.block, regs::TC_BMR) & !(regs::BMR_XCS_MASK << shift);
        regs::write_block(d.block, regs::TC_BMR, bmr);
        regs::write_channel(
            d.block,
            d.channel,
            regs::TC_CMR,
            clock | regs::CMR_BURST_NONE,
        );
    }

    fn set_ra(&mut self, d: &TimerDescriptor, value: u32) {
        regs::write_channel(d.block, d.channel, regs::TC_RA, value);
    }

    fn set_rb(&mut self, d: &TimerDescriptor, value: u32) {
        regs::write_channel(d.block, d.channel, regs::TC_RB, value);
    }

    fn set_rc(&mut self, d: &TimerDescriptor, value: u32) {
        regs::write_channel(d.block, d.channel, regs::TC_RC, value);
    }

    fn ra(&self, d: &TimerDescriptor) -> u32 {
        regs::read_channel(d.block, d.channel, regs::TC_RA)
    }

    fn rb(&self, d: &TimerDescriptor) -> u32 {
        regs::read_channel(d.block, d.channel, regs::TC_RB)
    }

    fn rc(&self, d: &TimerDescriptor) -> u32 {
        regs::read_channel(d.block, d.channel, regs::TC_RC)
    }

    fn counter(&self, d: &TimerDescriptor) -> u32 {
        regs::read_channel(d.block, d.channel, regs::TC_CV)
    }

    fn start(&mut self, d: &TimerDescriptor) {
        regs::write_channel(
            d.block,
            d.channel,
            regs::TC_CCR,
            regs::CCR_CLKEN | regs::CCR_SWTRG,
        );
    }

    fn stop(&mut self, d: &TimerDescriptor) {
        regs::write_channel(d.block, d.channel, regs::TC_CCR, regs::CCR_CLKDIS);
    }

    fn trigger(&mut self, d: &TimerDescriptor) {
        regs::write_channel(d.block, d.channel, regs::TC_CCR, regs::CCR_SWTRG);
    }

    fn set_interrupt_sources(&mut self, d: &TimerDescriptor, sources: StatusFlags) {
        regs::write_channel(d.block, d.channel, regs::TC_IER, sources.raw());
        regs::write_channel(d.block, d.channel, regs::TC_IDR, !sources.raw());
    }

    fn read_status(&mut self, d: &TimerDescriptor) -> StatusFlags {
        StatusFlags::from_raw(regs::read_channel(d.block, d.channel, regs::TC_SR))
    }
}

impl InterruptCtl for Sam3xHw {
    fn enable_line(&mut self, irq: u16) {
        // The bank masks interrupt delivery through its own critical
        // section; unmasking here cannot preempt mid-update.
        unsafe { NVIC::unmask(TcIrq(irq)) };
    }

    fn disable_line(&mut self, irq: u16) {
        NVIC::mask(TcIrq(irq));
    }

    fn clear_pending(&mut self, irq: u16) {
        NVIC::unpend(TcIrq(irq));
    }
}

impl TcPins for Sam3xHw {
    fn route(&mut self, route: &PinRoute) {
        regs::assign_pin(
            route.controller,
            route.line_mask,
            matches!(route.function, PinFunction::B),
        );
    }
}
