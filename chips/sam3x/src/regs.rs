//! SAM3X8E register map for the timer/counter blocks and their plumbing.
//!
//! Addresses and field values are from the SAM3X/A datasheet. Block and
//! channel indices come from the descriptor table; an out-of-range block
//! fails the base-address lookup instead of producing a wild write.

use core::ptr;

/// Base addresses of the three TC blocks.
const TC_BLOCK_BASE: [u32; 3] = [0x4008_0000, 0x4008_4000, 0x4008_8000];
/// Byte stride between the three channels of a block.
const TC_CHANNEL_STRIDE: u32 = 0x40;

// Channel register offsets.
pub const TC_CCR: u32 = 0x00;
pub const TC_CMR: u32 = 0x04;
pub const TC_CV: u32 = 0x10;
pub const TC_RA: u32 = 0x14;
pub const TC_RB: u32 = 0x18;
pub const TC_RC: u32 = 0x1c;
pub const TC_SR: u32 = 0x20;
pub const TC_IER: u32 = 0x24;
pub const TC_IDR: u32 = 0x28;

// Block register offsets.
pub const TC_BMR: u32 = 0xc4;
pub const TC_WPMR: u32 = 0xe4;

// CCR: channel control.
pub const CCR_CLKEN: u32 = 1 << 0;
pub const CCR_CLKDIS: u32 = 1 << 1;
pub const CCR_SWTRG: u32 = 1 << 2;

// CMR TCCLKS: input clock selection. 0..=3 are the MCK prescalers,
// 5..=7 the XC external inputs.
pub const CMR_TCCLKS_MCK2: u32 = 0;
pub const CMR_TCCLKS_MCK8: u32 = 1;
pub const CMR_TCCLKS_MCK32: u32 = 2;
pub const CMR_TCCLKS_MCK128: u32 = 3;
pub const CMR_TCCLKS_XC0: u32 = 5;
pub const CMR_TCCLKS_XC1: u32 = 6;
pub const CMR_TCCLKS_XC2: u32 = 7;

/// BURST field [5:4] left clear: the clock is not gated by an external
/// signal.
pub const CMR_BURST_NONE: u32 = 0;

// CMR, waveform mode.
pub const CMR_EEVT_XC0: u32 = 1 << 10;
pub const CMR_WAVSEL_UP_RC: u32 = 2 << 13;
pub const CMR_WAVE: u32 = 1 << 15;
pub const CMR_ACPA_CLEAR: u32 = 2 << 16;
pub const CMR_ACPC_SET: u32 = 1 << 18;
pub const CMR_BCPB_CLEAR: u32 = 2 << 24;
pub const CMR_BCPC_SET: u32 = 1 << 26;

// CMR, capture mode.
pub const CMR_ABETRG: u32 = 1 << 10;
pub const CMR_CPCTRG: u32 = 1 << 14;
pub const CMR_LDRA_FALLING: u32 = 2 << 16;
pub const CMR_LDRB_RISING: u32 = 1 << 18;

// BMR: external clock signal selection, two bits per XC input.
// Selector 0 routes XCx from its TCLKx pin.
pub const BMR_TC0XC0S_SHIFT: u32 = 0;
pub const BMR_TC1XC1S_SHIFT: u32 = 2;
pub const BMR_TC2XC2S_SHIFT: u32 = 4;
pub const BMR_XCS_MASK: u32 = 0b11;

/// TC write-protect key, ASCII "TIM". Writing it with WPEN clear unlocks
/// the mode and compare registers.
const TC_WPKEY: u32 = 0x54_49_4d << 8;

// Power management controller.
const PMC_BASE: u32 = 0x400e_0600;
const PMC_PCER0: u32 = PMC_BASE + 0x10;
const PMC_PCER1: u32 = PMC_BASE + 0x100;
const PMC_WPMR: u32 = PMC_BASE + 0xe4;
/// PMC write-protect key, ASCII "PMC".
const PMC_WPKEY: u32 = 0x50_4d_43 << 8;

// Parallel I/O controllers A..D.
const PIO_BASE: [u32; 4] = [0x400e_0e00, 0x400e_1000, 0x400e_1200, 0x400e_1400];
const PIO_PDR: u32 = 0x04;
const PIO_ABSR: u32 = 0x70;

fn write(addr: u32, value: u32) {
    unsafe { ptr::write_volatile(addr as *mut u32, value) }
}

fn read(addr: u32) -> u32 {
    unsafe { ptr::read_volatile(addr as *const u32) }
}

fn channel_base(block: u8, channel: u8) -> u32 {
    TC_BLOCK_BASE[block as usize] + channel as u32 * TC_CHANNEL_STRIDE
}

pub fn write_channel(block: u8, channel: u8, offset: u32, value: u32) {
    write(channel_base(block, channel) + offset, value);
}

pub fn read_channel(block: u8, channel: u8, offset: u32) -> u32 {
    read(channel_base(block, channel) + offset)
}

pub fn write_block(block: u8, offset: u32, value: u32) {
    write(TC_BLOCK_BASE[block as usize] + offset, value);
}

pub fn read_block(block: u8, offset: u32) -> u32 {
    read(TC_BLOCK_BASE[block as usize] + offset)
}

/// Unlock the block's write-protected registers.
pub fn unlock_block(block: u8) {
    write_block(block, TC_WPMR, TC_WPKEY);
}

/// Feed the master clock to a peripheral by id.
pub fn enable_peripheral_clock(pid: u16) {
    write(PMC_WPMR, PMC_WPKEY);
    if pid < 32 {
        write(PMC_PCER0, 1 << pid);
    } else {
        write(PMC_PCER1, 1 << (pid - 32));
    }
}

/// Hand a PIO line over to peripheral function A or B.
///
/// The function is selected before the line is released to the
/// peripheral, so the pin never drives the wrong signal in between.
pub fn assign_pin(controller: u8, line_mask: u32, function_b: bool) {
    let base = PIO_BASE[controller as usize];
    let absr = read(base + PIO_ABSR);
    let absr = if function_b {
        absr | line_mask
    } else {
        absr & !line_mask
    };
    write(base + PIO_ABSR, absr);
    write(base + PIO_PDR, line_mask);
}
