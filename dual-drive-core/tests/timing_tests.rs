//! Tests that need simulated time. They share the global mock time driver, so each
//! one holds `CLOCK` for its whole run.

use core::{
    future::Future,
    pin::{pin, Pin},
    task::{Context, Poll, Waker},
};
use std::sync::Mutex;

use dual_drive_core::utils::controllers::{
    AnalogInput, DriveController, DriveLoop, Motor, StepUnit, Stepper,
};
use embassy_time::{Duration, MockDriver};
use embedded_hal_mock::eh1::{
    digital::{Mock as PinMock, State as PinState, Transaction as PinTrans},
    pwm::{Mock as PwmMock, Transaction as PwmTrans},
};

static CLOCK: Mutex<()> = Mutex::new(());

fn poll_once<F: Future>(fut: Pin<&mut F>) -> Poll<F::Output> {
    fut.poll(&mut Context::from_waker(Waker::noop()))
}

fn advance(ms: u64) {
    MockDriver::get().advance(Duration::from_millis(ms));
}

#[derive(Debug)]
struct AdcFault;

/// Replays a scripted list of reads, failures included.
struct ScriptedAdc(std::vec::IntoIter<Result<u16, AdcFault>>);

impl AnalogInput for ScriptedAdc {
    type Error = AdcFault;

    fn read(&mut self) -> Result<u16, Self::Error> {
        self.0.next().expect("ran out of samples")
    }
}

fn channel(
    duties: &[u16],
    state: PinState,
) -> (PwmMock, PinMock) {
    let speed: Vec<PwmTrans> = duties.iter().map(|&d| PwmTrans::set_duty_cycle(d)).collect();
    let direction: Vec<PinTrans> = duties.iter().map(|_| PinTrans::set(state)).collect();
    (PwmMock::new(&speed), PinMock::new(&direction))
}

#[test]
fn forever_ticks_once_per_pause_and_survives_failures() {
    let _clock = CLOCK.lock().unwrap_or_else(|e| e.into_inner());
    MockDriver::get().reset();

    let (mut a_speed, mut a_dir) = channel(&[100, 300], PinState::High);
    let (mut b_speed, mut b_dir) = channel(&[100, 300], PinState::Low);
    let input = ScriptedAdc(vec![Ok(100), Err(AdcFault), Ok(300)].into_iter());

    let mut ctrl = DriveController::new(DriveLoop::new(
        input,
        Motor::new(a_speed.clone(), a_dir.clone()),
        Motor::new(b_speed.clone(), b_dir.clone()),
    ))
    .with_pause(Duration::from_millis(20));

    {
        let mut fut = pin!(ctrl.forever());

        // first iteration runs immediately, then waits out the pause
        assert!(poll_once(fut.as_mut()).is_pending());
        assert!(poll_once(fut.as_mut()).is_pending());
        advance(19);
        assert!(poll_once(fut.as_mut()).is_pending());

        // failed read: logged, loop keeps going
        advance(1);
        assert!(poll_once(fut.as_mut()).is_pending());

        advance(20);
        assert!(poll_once(fut.as_mut()).is_pending());
    }

    assert_eq!(ctrl.ticks(), 3);
    a_speed.done();
    a_dir.done();
    b_speed.done();
    b_dir.done();
}

/// Expected `[in1, in2, in3, in4]` levels when stepping `steps` times from phase 0.
fn phase_walk(
    steps: usize,
    direction: i8,
) -> Vec<[bool; 4]> {
    const TABLE: [[bool; 4]; 5] = [
        [false, false, false, false],
        [true, false, false, true],
        [false, false, true, true],
        [false, true, true, false],
        [true, true, false, false],
    ];
    let mut phase = 0i16;
    (0..steps)
        .map(|_| {
            let levels = TABLE[phase as usize];
            phase += i16::from(direction);
            if phase < 1 {
                phase = 4;
            } else if phase > 4 {
                phase = 1;
            }
            levels
        })
        .collect()
}

fn coils(walk: &[[bool; 4]]) -> [PinMock; 4] {
    core::array::from_fn(|pin| {
        let levels: Vec<PinTrans> = walk
            .iter()
            .map(|p| PinTrans::set(if p[pin] { PinState::High } else { PinState::Low }))
            .collect();
        PinMock::new(&levels)
    })
}

/// Poll a stepper move to completion, advancing one step delay between polls.
/// Returns how many polls left it pending.
fn run_move<F, E>(
    mut fut: Pin<&mut F>,
    delay_ms: u64,
) -> usize
where
    F: Future<Output = Result<(), E>>,
    E: core::fmt::Debug,
{
    let mut pending = 0;
    loop {
        match poll_once(fut.as_mut()) {
            Poll::Ready(result) => {
                result.unwrap();
                return pending;
            }
            Poll::Pending => {
                pending += 1;
                advance(delay_ms);
            }
        }
    }
}

#[test]
fn stepper_moves_wait_between_steps_and_end_idle() {
    let _clock = CLOCK.lock().unwrap_or_else(|e| e.into_inner());
    MockDriver::get().reset();

    let walk: Vec<_> = [phase_walk(3, 1), phase_walk(2, -1)].concat();
    let mut pins = coils(&walk);
    let [a, b, c, d] = pins.clone();
    let mut stepper = Stepper::new(a, b, c, d);

    {
        let mut fut = pin!(stepper.move_anticlockwise(3, StepUnit::Steps));
        assert!(poll_once(fut.as_mut()).is_pending());
        // no step until the 1 ms delay has passed
        assert!(poll_once(fut.as_mut()).is_pending());
        assert_eq!(run_move(fut, 1), 3);
    }
    assert_eq!(stepper.phase(), 0);

    stepper.set_delay(Duration::from_millis(5));
    {
        let fut = pin!(stepper.move_clockwise(2, StepUnit::Steps));
        assert_eq!(run_move(fut, 5), 2);
    }
    assert_eq!(stepper.phase(), 0);

    for pin in &mut pins {
        pin.done();
    }
}

#[test]
fn stepper_rotation_is_2056_steps() {
    let _clock = CLOCK.lock().unwrap_or_else(|e| e.into_inner());
    MockDriver::get().reset();

    let mut pins = coils(&phase_walk(2056, -1));
    let [a, b, c, d] = pins.clone();
    let mut stepper = Stepper::new(a, b, c, d);

    {
        let fut = pin!(stepper.move_clockwise(1, StepUnit::Rotations));
        assert_eq!(run_move(fut, 1), 2056);
    }
    assert_eq!(stepper.phase(), 0);

    for pin in &mut pins {
        pin.done();
    }
}
