//! Module Exports
//!
//! - `analog`: single-channel analog input abstraction
//! - `motor`: PWM + direction motor channel driver
//! - `drive_loop`: the potentiometer-to-motors loop body
//! - `stepper`: 4-phase stepper on four digital pins
//! - `uart_motor`: framed commands for the serial motor board

pub mod analog;
pub mod drive_loop;
pub mod motor;
pub mod stepper;
pub mod uart_motor;

use embassy_time::{Duration, Timer};

pub use analog::AnalogInput;
pub use drive_loop::{DriveError, DriveLoop};
pub use motor::{Direction, Motor, MotorDrive, MotorError};
pub use stepper::{StepUnit, Stepper};
pub use uart_motor::{UartMotorCommand, UartMotorLink};

/// Pause between loop iterations, matching the micro:bit `forever` scheduler.
pub const FOREVER_PAUSE: Duration = Duration::from_millis(20);

/// Runs a [`DriveLoop`] as a never-ending cooperative task.
pub struct DriveController<IN, A, B> {
    drive: DriveLoop<IN, A, B>,
    pause: Duration,
    ticks: u64,
}

impl<IN, A, B> DriveController<IN, A, B>
where
    IN: AnalogInput,
    A: MotorDrive,
    B: MotorDrive,
{
    pub fn new(drive: DriveLoop<IN, A, B>) -> Self {
        Self {
            drive,
            pause: FOREVER_PAUSE,
            ticks: 0,
        }
    }

    /// Override the pause between iterations.
    pub fn with_pause(
        mut self,
        pause: Duration,
    ) -> Self {
        self.pause = pause;
        self
    }

    /// Number of iterations run so far, failed ones included.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn free(self) -> DriveLoop<IN, A, B> {
        self.drive
    }

    /// Run one iteration, logging instead of propagating a failure.
    ///
    /// Returns the forwarded sample, or `None` if the iteration failed.
    pub fn step(&mut self) -> Option<u16> {
        self.ticks = self.ticks.wrapping_add(1);
        match self.drive.tick() {
            Ok(speed) => {
                tracing::trace!(tick = self.ticks, speed, "drive tick");
                Some(speed)
            }
            Err(e) => {
                tracing::error!(tick = self.ticks, "drive tick failed: {:?}", e);
                None
            }
        }
    }

    /// Step forever, yielding to the executor between iterations.
    pub async fn forever(&mut self) -> ! {
        tracing::info!(
            pause_ms = self.pause.as_millis(),
            "drive loop started"
        );
        loop {
            self.step();
            Timer::after(self.pause).await;
        }
    }
}
