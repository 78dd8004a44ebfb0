//! The potentiometer-to-motors loop body.
//!
//! Each [`DriveLoop::tick`] samples the speed input once and forwards the raw value
//! to both motors: motor A forward, motor B reverse. Directions never change.

use super::{
    analog::AnalogInput,
    motor::{Direction, MotorDrive},
};

/// Fixed direction of motor A.
pub const MOTOR_A_DIRECTION: Direction = Direction::Forward;
/// Fixed direction of motor B.
pub const MOTOR_B_DIRECTION: Direction = Direction::Reverse;

/// Errors from one loop iteration, tagged by the pin group that failed.
#[derive(Debug)]
pub enum DriveError<I, A, B> {
    Input(I),
    MotorA(A),
    MotorB(B),
}

/// Owns the speed input and both motor channels.
pub struct DriveLoop<IN, A, B> {
    input: IN,
    motor_a: A,
    motor_b: B,
}

impl<IN, A, B> DriveLoop<IN, A, B>
where
    IN: AnalogInput,
    A: MotorDrive,
    B: MotorDrive,
{
    pub fn new(
        input: IN,
        motor_a: A,
        motor_b: B,
    ) -> Self {
        Self {
            input,
            motor_a,
            motor_b,
        }
    }

    /// Release the input and both motors.
    pub fn free(self) -> (IN, A, B) {
        (self.input, self.motor_a, self.motor_b)
    }

    /// Write `speed` and `direction` to motor A's pin pair.
    pub fn drive_motor_a(
        &mut self,
        speed: u16,
        direction: Direction,
    ) -> Result<(), A::Error> {
        self.motor_a.drive(speed, direction)
    }

    /// Write `speed` and `direction` to motor B's pin pair.
    pub fn drive_motor_b(
        &mut self,
        speed: u16,
        direction: Direction,
    ) -> Result<(), B::Error> {
        self.motor_b.drive(speed, direction)
    }

    /// Run one iteration and return the sample that was forwarded.
    ///
    /// A failed read aborts before any motor is touched.
    pub fn tick(&mut self) -> Result<u16, DriveError<IN::Error, A::Error, B::Error>> {
        let speed = self.input.read().map_err(DriveError::Input)?;
        self.drive_motor_a(speed, MOTOR_A_DIRECTION)
            .map_err(DriveError::MotorA)?;
        self.drive_motor_b(speed, MOTOR_B_DIRECTION)
            .map_err(DriveError::MotorB)?;
        Ok(speed)
    }
}
