//! 4-phase unipolar stepper on four digital pins.
//!
//! The driver walks a five-entry phase table: phase 0 de-energizes every coil and
//! phases 1-4 are the running sequence. After each step the phase advances by the
//! step direction and wraps within 1..=4, so phase 0 is only ever written on the
//! first step after construction, a finished move or [`Stepper::stop`].

use embassy_time::{Duration, Timer};
use embedded_hal::digital::{OutputPin, PinState};

/// Steps per output shaft revolution (approximate, geared 28BYJ-48 class motor).
pub const STEPS_PER_ROTATION: u32 = 2056;

/// Pause between steps unless overridden.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(1);

/// Coil levels `[in1, in2, in3, in4]` for each phase.
const PHASES: [[bool; 4]; 5] = [
    [false, false, false, false],
    [true, false, false, true],
    [false, false, true, true],
    [false, true, true, false],
    [true, true, false, false],
];

/// How a move distance is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepUnit {
    Steps,
    Rotations,
}

impl StepUnit {
    /// Number of single steps in `count` units.
    pub fn steps(
        self,
        count: u32,
    ) -> u32 {
        match self {
            StepUnit::Steps => count,
            StepUnit::Rotations => count.saturating_mul(STEPS_PER_ROTATION),
        }
    }
}

pub struct Stepper<IN1, IN2, IN3, IN4> {
    in1: IN1,
    in2: IN2,
    in3: IN3,
    in4: IN4,
    delay: Duration,
    phase: u8,
}

impl<IN1, IN2, IN3, IN4, E> Stepper<IN1, IN2, IN3, IN4>
where
    IN1: OutputPin<Error = E>,
    IN2: OutputPin<Error = E>,
    IN3: OutputPin<Error = E>,
    IN4: OutputPin<Error = E>,
{
    /// Bind the four coil inputs; starts at phase 0 with a 1 ms step delay.
    pub fn new(
        in1: IN1,
        in2: IN2,
        in3: IN3,
        in4: IN4,
    ) -> Self {
        Self {
            in1,
            in2,
            in3,
            in4,
            delay: DEFAULT_STEP_DELAY,
            phase: 0,
        }
    }

    pub fn set_delay(
        &mut self,
        delay: Duration,
    ) {
        self.delay = delay;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Phase that the next step will write.
    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn free(self) -> (IN1, IN2, IN3, IN4) {
        (self.in1, self.in2, self.in3, self.in4)
    }

    /// Write the current phase to the coils, then advance by `direction`.
    pub fn step(
        &mut self,
        direction: i8,
    ) -> Result<(), E> {
        let [a, b, c, d] = PHASES[usize::from(self.phase)];
        self.in1.set_state(PinState::from(a))?;
        self.in2.set_state(PinState::from(b))?;
        self.in3.set_state(PinState::from(c))?;
        self.in4.set_state(PinState::from(d))?;

        let next = i16::from(self.phase) + i16::from(direction);
        self.phase = if next < 1 {
            4
        } else if next > 4 {
            1
        } else {
            next as u8
        };
        Ok(())
    }

    /// Run `count` units with increasing phase, then return to phase 0.
    pub async fn move_anticlockwise(
        &mut self,
        count: u32,
        unit: StepUnit,
    ) -> Result<(), E> {
        self.run(count, unit, 1).await
    }

    /// Run `count` units with decreasing phase, then return to phase 0.
    pub async fn move_clockwise(
        &mut self,
        count: u32,
        unit: StepUnit,
    ) -> Result<(), E> {
        self.run(count, unit, -1).await
    }

    /// Forget the running phase; the coils keep their last levels until the next step.
    pub fn stop(&mut self) {
        self.phase = 0;
    }

    async fn run(
        &mut self,
        count: u32,
        unit: StepUnit,
        direction: i8,
    ) -> Result<(), E> {
        let steps = unit.steps(count);
        tracing::debug!(steps, direction, "stepper move");
        for _ in 0..steps {
            self.step(direction)?;
            Timer::after(self.delay).await;
        }
        self.phase = 0;
        Ok(())
    }
}
