//! Single-channel analog input.
//!
//! `embedded-hal` 1.0 has no ADC trait, so boards adapt their ADC driver to
//! [`AnalogInput`]. Plain closures returning a sample also qualify.

use core::convert::Infallible;

/// A pin that yields one raw sample per read, nominally `0..=ANALOG_MAX`.
pub trait AnalogInput {
    type Error: core::fmt::Debug;

    /// Take a fresh sample.
    fn read(&mut self) -> Result<u16, Self::Error>;
}

impl<F> AnalogInput for F
where
    F: FnMut() -> u16,
{
    type Error = Infallible;

    fn read(&mut self) -> Result<u16, Self::Error> {
        Ok(self())
    }
}
