//! Pin assignments for the micro:bit edge connector.
//!
//! The wiring is fixed at build time: one potentiometer on `P0` feeds both motor
//! channels, each channel being a PWM speed pin plus a direction pin.

use core::fmt;

/// Full-scale value of an analog read and of an analog (PWM) write.
pub const ANALOG_MAX: u16 = 1023;

/// Edge connector pins broken out on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pin {
    P0,
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
    P8,
    P9,
    P10,
    P11,
    P12,
    P13,
    P14,
    P15,
    P16,
    P19,
    P20,
}

impl Pin {
    /// Edge connector number of the pin.
    pub const fn number(self) -> u8 {
        match self {
            Pin::P0 => 0,
            Pin::P1 => 1,
            Pin::P2 => 2,
            Pin::P3 => 3,
            Pin::P4 => 4,
            Pin::P5 => 5,
            Pin::P6 => 6,
            Pin::P7 => 7,
            Pin::P8 => 8,
            Pin::P9 => 9,
            Pin::P10 => 10,
            Pin::P11 => 11,
            Pin::P12 => 12,
            Pin::P13 => 13,
            Pin::P14 => 14,
            Pin::P15 => 15,
            Pin::P16 => 16,
            Pin::P19 => 19,
            Pin::P20 => 20,
        }
    }

    /// Whether the pin is routed to the ADC.
    ///
    /// Any pin can drive PWM, but only these can be sampled.
    pub const fn supports_analog_read(self) -> bool {
        matches!(
            self,
            Pin::P0 | Pin::P1 | Pin::P2 | Pin::P3 | Pin::P4 | Pin::P10
        )
    }
}

impl fmt::Display for Pin {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "P{}", self.number())
    }
}

/// Speed (PWM) and direction pins of one motor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorPins {
    pub speed: Pin,
    pub direction: Pin,
}

/// Potentiometer shared by both motor channels.
pub const SPEED_INPUT: Pin = Pin::P0;

/// Motor A: speed on `P12`, direction on `P8`.
pub const MOTOR_A: MotorPins = MotorPins {
    speed: Pin::P12,
    direction: Pin::P8,
};

/// Motor B: speed on `P16`, direction on `P2`.
pub const MOTOR_B: MotorPins = MotorPins {
    speed: Pin::P16,
    direction: Pin::P2,
};

/// Serial motor board wiring.
pub const UART_MOTOR_TX: Pin = Pin::P15;
pub const UART_MOTOR_RX: Pin = Pin::P13;
pub const UART_MOTOR_BAUD: u32 = 9600;
