use rstest::rstest;
use speedctl_hardware::error::HwError;
use speedctl_hardware::util::{check_frequency, duty_cycle};

#[rstest]
#[case(0, 0.0)]
#[case(255, 1.0)]
fn duty_cycle_endpoints(#[case] duty: u8, #[case] expected: f64) {
    assert!((duty_cycle(duty) - expected).abs() < f64::EPSILON);
}

#[test]
fn duty_cycle_is_monotonic() {
    let mut prev = -1.0;
    for d in 0..=u8::MAX {
        let c = duty_cycle(d);
        assert!(c > prev);
        prev = c;
    }
}

#[rstest]
#[case(0.0)]
#[case(-5.0)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn rejects_unusable_frequencies(#[case] hz: f64) {
    match check_frequency(hz) {
        Err(HwError::InvalidFrequency(_)) => {}
        other => panic!("unexpected: {other:?}"),
    }
}
