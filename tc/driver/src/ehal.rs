//! `embedded-hal` adapters for timer outputs

use embedded_hal::pwm::{Error, ErrorKind, ErrorType, SetDutyCycle};

use crate::hal::TcBackend;
use crate::timer::Timer;
use crate::TcError;

impl Error for TcError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Which of the channel's two compare outputs a [`TcPwm`] drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmOutput {
    /// TIOA, the RA compare output.
    A,
    /// TIOB, the RB compare output.
    B,
}

/// [`SetDutyCycle`] over one compare output of a waveform-mode timer.
///
/// Duty steps are whole percent, so `max_duty_cycle` is 100. The timer
/// must already be running in waveform mode; duty writes against an
/// unconfigured channel fall back to a zero-length period and leave the
/// output idle.
pub struct TcPwm<'a, C, const N: usize> {
    timer: Timer<'a, C, N>,
    output: PwmOutput,
}

impl<'a, C: TcBackend, const N: usize> TcPwm<'a, C, N> {
    pub(crate) fn new(timer: Timer<'a, C, N>, output: PwmOutput) -> Self {
        TcPwm { timer, output }
    }

    /// The handle this adapter drives.
    pub fn timer(&self) -> Timer<'a, C, N> {
        self.timer
    }

    /// The compare output this adapter drives.
    pub fn output(&self) -> PwmOutput {
        self.output
    }
}

impl<'a, C: TcBackend, const N: usize> ErrorType for TcPwm<'a, C, N> {
    type Error = TcError;
}

impl<'a, C: TcBackend, const N: usize> SetDutyCycle for TcPwm<'a, C, N> {
    fn max_duty_cycle(&self) -> u16 {
        100
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let percent = duty.min(100) as f64;
        match self.output {
            PwmOutput::A => self.timer.set_duty_cycle_a(percent),
            PwmOutput::B => self.timer.set_duty_cycle_b(percent),
        };
        Ok(())
    }
}
