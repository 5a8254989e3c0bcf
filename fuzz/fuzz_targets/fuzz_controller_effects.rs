#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use speedctl_core::mocks::RecordingActuator;
use speedctl_core::{Bindings, Effect, MotorSpeedController, SpeedCfg};
use std::time::{Duration, Instant};

#[derive(Debug, Arbitrary)]
enum Op {
    Up(u8),
    Down(u8),
    Toggle,
    Confirm,
    Revert,
    Wait(u16),
}

#[derive(Debug, Arbitrary)]
struct Input {
    min: u8,
    max: u8,
    initial: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let speed = SpeedCfg {
        min: input.min,
        max: input.max,
        initial: input.initial,
    };
    let (lo, hi) = (input.min.min(input.max), input.min.max(input.max));
    let act = RecordingActuator::new();
    let mut ctl = MotorSpeedController::new(act.clone(), speed, Bindings::default(), true);
    let mut now = Instant::now();
    ctl.begin(now);
    let mut run_time = Duration::ZERO;

    for op in input.ops {
        let effect = match op {
            Op::Up(n) => Effect::StepUp(n),
            Op::Down(n) => Effect::StepDown(n),
            Op::Toggle => Effect::ToggleRun,
            Op::Confirm => Effect::Confirm,
            Op::Revert => Effect::Revert,
            Op::Wait(ms) => {
                now += Duration::from_millis(u64::from(ms));
                ctl.tick(now);
                continue;
            }
        };
        ctl.apply(effect, now);
        assert!((lo..=hi).contains(&ctl.speed()));
        assert!((lo..=hi).contains(&ctl.saved_speed()));
        assert!(ctl.run_time() >= run_time);
        run_time = ctl.run_time();
        let cmd = act.last().expect("every effect issues a command");
        assert!(cmd.forward);
        assert_eq!(cmd.duty, if ctl.is_running() { ctl.speed() } else { 0 });
    }
});
