use clap::Parser;
use core::cell::Cell;
use dual_drive_core::mk_static;
use dual_drive_core::utils::board::{self, Pin, ANALOG_MAX};
use dual_drive_core::utils::controllers::drive_loop::{MOTOR_A_DIRECTION, MOTOR_B_DIRECTION};
use dual_drive_core::utils::controllers::{
    AnalogInput, DriveController, DriveLoop, Motor, UartMotorLink,
};
use dual_drive_core::utils::{Duration, Timer};
use embassy_executor::{Executor, Spawner};
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embedded_hal::digital::{self, OutputPin, PinState};
use embedded_hal::pwm::{self, SetDutyCycle};
use std::convert::Infallible;
use tracing::{debug, error, info, trace};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts
{
    /// Initial potentiometer reading on P0 (0-1023)
    #[clap(long, default_value_t = 512, value_parser = clap::value_parser!(u16).range(0..=1023))]
    level: u16,
    /// turn the potentiometer back and forth across its range
    #[clap(long)]
    sweep: bool,
    /// Pause between loop iterations in milliseconds
    #[clap(long, default_value_t = 20)]
    pause_ms: u64,
    /// also mirror the knob to the serial motor board
    #[clap(long)]
    uart: bool,
}

/// Simulated potentiometer position, shared by the sweep task and the ADC.
static KNOB: Mutex<CriticalSectionRawMutex, Cell<u16>> = Mutex::new(Cell::new(0));

/// ADC channel reading the simulated potentiometer.
struct SimulatedPot {
    pin: Pin,
}

impl AnalogInput for SimulatedPot {
    type Error = Infallible;

    fn read(&mut self) -> Result<u16, Self::Error> {
        let level = KNOB.lock(|k| k.get());
        trace!(pin = %self.pin, level, "analog read");
        Ok(level)
    }
}

/// PWM output that logs duty changes.
struct LoggingPwm {
    pin: Pin,
    duty: Option<u16>,
}

impl LoggingPwm {
    fn new(pin: Pin) -> Self {
        Self { pin, duty: None }
    }
}

impl pwm::ErrorType for LoggingPwm {
    type Error = Infallible;
}

impl SetDutyCycle for LoggingPwm {
    fn max_duty_cycle(&self) -> u16 {
        ANALOG_MAX
    }

    fn set_duty_cycle(
        &mut self,
        duty: u16,
    ) -> Result<(), Infallible> {
        if self.duty.replace(duty) != Some(duty) {
            info!(pin = %self.pin, duty, "analog write");
        }
        Ok(())
    }
}

/// Digital output that logs level changes.
struct LoggingOutput {
    pin: Pin,
    state: Option<PinState>,
}

impl LoggingOutput {
    fn new(pin: Pin) -> Self {
        Self { pin, state: None }
    }

    fn write(
        &mut self,
        state: PinState,
    ) {
        if self.state.replace(state) != Some(state) {
            info!(pin = %self.pin, level = state == PinState::High, "digital write");
        }
    }
}

impl digital::ErrorType for LoggingOutput {
    type Error = Infallible;
}

impl OutputPin for LoggingOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.write(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.write(PinState::High);
        Ok(())
    }
}

/// Transmit side of the motor board UART that logs outgoing bytes.
struct LoggingUart {
    tx: Pin,
    rx: Pin,
    baud: u32,
}

impl embedded_io::ErrorType for LoggingUart {
    type Error = Infallible;
}

impl embedded_io::Write for LoggingUart {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> Result<usize, Infallible> {
        debug!(tx = %self.tx, rx = %self.rx, baud = self.baud, bytes = ?buf, "uart write");
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Knob position as a percent of full scale.
fn percent(level: u16) -> i8 {
    (u32::from(level.min(ANALOG_MAX)) * 100 / u32::from(ANALOG_MAX)) as i8
}

type MockMotor = Motor<LoggingPwm, LoggingOutput>;
type MockController = DriveController<SimulatedPot, MockMotor, MockMotor>;

fn motor(pins: board::MotorPins) -> MockMotor {
    Motor::new(LoggingPwm::new(pins.speed), LoggingOutput::new(pins.direction))
}

#[embassy_executor::task]
async fn drive_task(mut ctrl: MockController) -> ! {
    ctrl.forever().await
}

#[embassy_executor::task]
async fn sweep_task() -> ! {
    const STEP: u16 = 31;
    let mut rising = true;
    loop {
        Timer::after(Duration::from_millis(100)).await;
        let level = KNOB.lock(|k| {
            let current = k.get();
            let next = if rising {
                current.saturating_add(STEP).min(ANALOG_MAX)
            } else {
                current.saturating_sub(STEP)
            };
            if next == ANALOG_MAX || next == 0 {
                rising = !rising;
            }
            k.set(next);
            next
        });
        debug!(level, "potentiometer moved");
    }
}

/// Send the knob to the serial board with the same sides as the pin motors:
/// left forward, right reverse.
#[embassy_executor::task]
async fn uart_task(
    mut link: UartMotorLink<LoggingUart>,
    pause: Duration,
) -> ! {
    let mut last = None;
    loop {
        let pct = percent(KNOB.lock(|k| k.get()));
        let (left, right) = (pct, -pct);
        if last != Some(pct) {
            info!(left, right, "uart dual drive");
            last = Some(pct);
        }
        if let Err(e) = link.dual(left, right) {
            error!("uart frame failed: {:?}", e);
        }
        Timer::after(pause).await;
    }
}

#[embassy_executor::task]
async fn main_task(spawner: Spawner) {
    let opts: Opts = Opts::parse();
    KNOB.lock(|k| k.set(opts.level));

    if !board::SPEED_INPUT.supports_analog_read() {
        error!(pin = %board::SPEED_INPUT, "speed input is not an ADC pin");
        return;
    }

    let drive = DriveLoop::new(
        SimulatedPot {
            pin: board::SPEED_INPUT,
        },
        motor(board::MOTOR_A),
        motor(board::MOTOR_B),
    );
    let pause = Duration::from_millis(opts.pause_ms);
    let ctrl = DriveController::new(drive).with_pause(pause);

    info!(
        input = %board::SPEED_INPUT,
        motor_a = ?board::MOTOR_A,
        motor_a_dir = MOTOR_A_DIRECTION.level(),
        motor_b = ?board::MOTOR_B,
        motor_b_dir = MOTOR_B_DIRECTION.level(),
        level = opts.level,
        "starting mock board"
    );

    if let Err(e) = spawner.spawn(drive_task(ctrl)) {
        error!("failed to spawn drive task: {:?}", e);
        return;
    }

    if opts.uart {
        let link = UartMotorLink::new(LoggingUart {
            tx: board::UART_MOTOR_TX,
            rx: board::UART_MOTOR_RX,
            baud: board::UART_MOTOR_BAUD,
        });
        if let Err(e) = spawner.spawn(uart_task(link, pause)) {
            error!("failed to spawn uart task: {:?}", e);
        }
    }

    if opts.sweep {
        if let Err(e) = spawner.spawn(sweep_task()) {
            error!("failed to spawn sweep task: {:?}", e);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let executor = mk_static!(Executor, Executor::new());
    executor.run(|spawner| {
        if let Err(e) = spawner.spawn(main_task(spawner)) {
            error!("failed to spawn main task: {:?}", e);
        }
    });
}
