//! Motor channel driver: one PWM speed pin plus one direction pin.
//!
//! Speeds are raw duty values in the board's analog range and are forwarded to the
//! PWM without clamping; whatever the PWM implementation does with an out-of-range
//! duty is its own business.

use embedded_hal::{
    digital::{OutputPin, PinState},
    pwm::SetDutyCycle,
};

/// Rotation direction, as the logic level written to the direction pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Reverse = 0,
    Forward = 1,
}

impl Direction {
    /// Logic level (0 or 1) of the direction pin.
    pub const fn level(self) -> u8 {
        self as u8
    }
}

impl From<Direction> for PinState {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => PinState::High,
            Direction::Reverse => PinState::Low,
        }
    }
}

/// Errors raised by either pin of a motor channel.
#[derive(Debug)]
pub enum MotorError<S, D> {
    Speed(S),
    Direction(D),
}

/// Anything that accepts a speed and a direction.
pub trait MotorDrive {
    type Error: core::fmt::Debug;

    /// Command a raw speed and a direction.
    fn drive(
        &mut self,
        speed: u16,
        direction: Direction,
    ) -> Result<(), Self::Error>;
}

/// A motor wired to a PWM speed pin and a digital direction pin.
pub struct Motor<SPD, DIR> {
    speed: SPD,
    direction: DIR,
}

impl<SPD, DIR> Motor<SPD, DIR>
where
    SPD: SetDutyCycle,
    DIR: OutputPin,
{
    pub fn new(
        speed: SPD,
        direction: DIR,
    ) -> Self {
        Self { speed, direction }
    }

    /// Release the pins.
    pub fn free(self) -> (SPD, DIR) {
        (self.speed, self.direction)
    }

    /// Drive with a signed speed in `-ANALOG_MAX..=ANALOG_MAX`.
    ///
    /// The sign selects the direction (`>= 0` is forward) and the magnitude goes to
    /// the speed pin. The direction pin is written first.
    pub fn drive_signed(
        &mut self,
        speed: i16,
    ) -> Result<(), MotorError<SPD::Error, DIR::Error>> {
        let direction = if speed >= 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        self.direction
            .set_state(direction.into())
            .map_err(MotorError::Direction)?;
        self.speed
            .set_duty_cycle(speed.unsigned_abs())
            .map_err(MotorError::Speed)
    }
}

impl<SPD, DIR> MotorDrive for Motor<SPD, DIR>
where
    SPD: SetDutyCycle,
    DIR: OutputPin,
{
    type Error = MotorError<SPD::Error, DIR::Error>;

    /// Speed pin first, then the direction pin.
    fn drive(
        &mut self,
        speed: u16,
        direction: Direction,
    ) -> Result<(), Self::Error> {
        self.speed
            .set_duty_cycle(speed)
            .map_err(MotorError::Speed)?;
        self.direction
            .set_state(direction.into())
            .map_err(MotorError::Direction)
    }
}
