use std::time::{Duration, Instant};

use rstest::rstest;
use speedctl_core::mocks::{FailingActuator, RecordingActuator};
use speedctl_core::{
    Bindings, Button, ButtonEvent, Effect, MotorCommand, MotorSpeedController, Rotation,
    SpeedCfg,
};

fn controller(initial: u8) -> (MotorSpeedController<RecordingActuator>, RecordingActuator) {
    let act = RecordingActuator::new();
    let speed = SpeedCfg {
        initial,
        ..SpeedCfg::default()
    };
    let ctl = MotorSpeedController::new(act.clone(), speed, Bindings::default(), true);
    (ctl, act)
}

#[test]
fn operator_session_walkthrough() {
    let t0 = Instant::now();
    let (mut ctl, act) = controller(60);
    ctl.begin(t0);
    assert_eq!(act.last(), Some(MotorCommand::forward(60)));

    for _ in 0..5 {
        ctl.apply(Effect::StepUp(5), t0);
    }
    assert_eq!(ctl.speed(), 85);
    assert!(ctl.snapshot().unsaved);

    ctl.apply(Effect::Confirm, t0);
    assert_eq!(ctl.saved_speed(), 85);
    assert!(!ctl.snapshot().unsaved);

    for _ in 0..3 {
        ctl.apply(Effect::StepDown(5), t0);
    }
    assert_eq!(ctl.speed(), 70);

    ctl.apply(Effect::Revert, t0);
    assert_eq!(ctl.speed(), 85);

    ctl.apply(Effect::ToggleRun, t0);
    assert!(!ctl.is_running());
    assert_eq!(act.last(), Some(MotorCommand::forward(0)));
    // Stopping keeps the speed setting
    assert_eq!(ctl.snapshot().speed, 85);

    ctl.apply(Effect::ToggleRun, t0);
    assert_eq!(act.last(), Some(MotorCommand::forward(85)));
}

#[rstest]
#[case(250, Effect::StepUp(10), 255)]
#[case(255, Effect::StepUp(1), 255)]
#[case(5, Effect::StepDown(10), 0)]
#[case(0, Effect::StepDown(1), 0)]
#[case(100, Effect::StepUp(5), 105)]
#[case(100, Effect::StepDown(5), 95)]
fn steps_saturate_at_bounds(#[case] start: u8, #[case] effect: Effect, #[case] expected: u8) {
    let (mut ctl, act) = controller(start);
    ctl.apply(effect, Instant::now());
    assert_eq!(ctl.speed(), expected);
    assert_eq!(act.last(), Some(MotorCommand::forward(expected)));
}

#[rstest]
#[case::full_mid(0, 255, 100, Effect::StepUp(10), Effect::StepDown(10), 100)]
#[case::full_at_max(0, 255, 250, Effect::StepUp(10), Effect::StepDown(10), 245)]
#[case::full_on_max(0, 255, 255, Effect::StepUp(5), Effect::StepDown(5), 250)]
#[case::full_at_min(0, 255, 3, Effect::StepDown(5), Effect::StepUp(5), 5)]
#[case::full_on_min(0, 255, 0, Effect::StepDown(5), Effect::StepUp(5), 5)]
#[case::narrow_mid(20, 40, 30, Effect::StepUp(5), Effect::StepDown(5), 30)]
#[case::narrow_at_max(20, 40, 38, Effect::StepUp(5), Effect::StepDown(5), 35)]
#[case::narrow_at_min(20, 40, 22, Effect::StepDown(5), Effect::StepUp(5), 25)]
fn opposite_steps_undo_each_other_unless_clamped(
    #[case] min: u8,
    #[case] max: u8,
    #[case] start: u8,
    #[case] first: Effect,
    #[case] second: Effect,
    #[case] expected: u8,
) {
    let act = RecordingActuator::new();
    let speed = SpeedCfg { min, max, initial: start };
    let mut ctl = MotorSpeedController::new(act.clone(), speed, Bindings::default(), true);
    let now = Instant::now();
    ctl.apply(first, now);
    ctl.apply(second, now);
    assert_eq!(ctl.speed(), expected);
    assert_eq!(act.last(), Some(MotorCommand::forward(expected)));
}

#[test]
fn narrow_range_clamps_initial_and_steps() {
    let act = RecordingActuator::new();
    let speed = SpeedCfg {
        min: 20,
        max: 40,
        initial: 10,
    };
    let mut ctl = MotorSpeedController::new(act, speed, Bindings::default(), true);
    assert_eq!(ctl.speed(), 20);
    ctl.apply(Effect::StepUp(100), Instant::now());
    assert_eq!(ctl.speed(), 40);
}

#[test]
fn every_effect_issues_a_command() {
    let (mut ctl, act) = controller(60);
    let now = Instant::now();
    ctl.apply(Effect::Confirm, now);
    ctl.apply(Effect::Revert, now);
    ctl.apply(Effect::StepUp(1), now);
    assert_eq!(act.commands().len(), 3);
}

#[test]
fn run_time_only_accrues_while_running() {
    let t0 = Instant::now();
    let at = |s: u64| t0 + Duration::from_secs(s);
    let (mut ctl, _act) = controller(60);
    ctl.begin(t0);

    ctl.apply(Effect::ToggleRun, at(10));
    ctl.tick(at(20));
    assert_eq!(ctl.run_time(), Duration::from_secs(10));

    ctl.apply(Effect::ToggleRun, at(30));
    ctl.tick(at(35));
    assert_eq!(ctl.run_time(), Duration::from_secs(15));
}

#[test]
fn rotation_uses_bound_step() {
    let act = RecordingActuator::new();
    let mut ctl = MotorSpeedController::new(act, SpeedCfg::default(), Bindings::step_buttons(), true);
    let now = Instant::now();
    assert_eq!(ctl.handle_rotation(Rotation::Clockwise, now), Effect::StepUp(10));
    assert_eq!(ctl.speed(), 70);
    assert_eq!(ctl.handle_rotation(Rotation::CounterClockwise, now), Effect::StepDown(10));
    assert_eq!(ctl.speed(), 60);
}

#[test]
fn unbound_gesture_changes_nothing() {
    let (mut ctl, act) = controller(60);
    let before = ctl.snapshot();
    let effect = ctl.handle_button(ButtonEvent::LongPressStart(Button::Back), Instant::now());
    assert_eq!(effect, None);
    assert_eq!(ctl.snapshot(), before);
    assert!(act.commands().is_empty());
}

#[test]
fn actuator_failure_does_not_block_state_changes() {
    let mut ctl =
        MotorSpeedController::new(FailingActuator, SpeedCfg::default(), Bindings::default(), true);
    let now = Instant::now();
    ctl.begin(now);
    ctl.apply(Effect::StepUp(5), now);
    assert_eq!(ctl.speed(), 65);
    assert_eq!(ctl.last_command(), Some(MotorCommand::forward(65)));
}

#[test]
fn halt_stops_run_state_and_keeps_speed() {
    let t0 = Instant::now();
    let (mut ctl, act) = controller(60);
    ctl.begin(t0);
    ctl.halt(t0 + Duration::from_secs(4));

    let snap = ctl.snapshot();
    assert!(!snap.running);
    assert_eq!(snap.speed, 60);
    assert_eq!(act.last(), Some(MotorCommand::forward(0)));
    assert_eq!(ctl.command(), MotorCommand::forward(0));

    // The running interval is closed at the halt instant
    ctl.tick(t0 + Duration::from_secs(10));
    assert_eq!(ctl.run_time(), Duration::from_secs(4));
}

#[test]
fn halt_when_stopped_only_reissues_zero_duty() {
    let t0 = Instant::now();
    let (mut ctl, act) = controller(60);
    ctl.begin(t0);
    ctl.apply(Effect::ToggleRun, t0 + Duration::from_secs(2));
    ctl.halt(t0 + Duration::from_secs(5));
    assert!(!ctl.is_running());
    assert_eq!(ctl.run_time(), Duration::from_secs(2));
    assert_eq!(act.last(), Some(MotorCommand::forward(0)));
}
