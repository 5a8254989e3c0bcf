use rstest::rstest;
use speedctl_config::{EffectName, GestureName, LatchMode, Preset, load_file, load_toml};
use std::fs;
use tempfile::tempdir;

const PINS: &str = r#"
[pins]
motor_in1 = 13
motor_in2 = 12
motor_ena = 14
enc_a = 25
enc_b = 26
enc_btn = 27
back_btn = 32
confirm_btn = 33
"#;

fn with_pins(extra: &str) -> String {
    format!("{PINS}\n{extra}")
}

#[test]
fn defaults_match_reference_wiring() {
    let cfg = load_toml(PINS).expect("parse TOML");
    cfg.validate().expect("defaults should validate");
    assert_eq!(cfg.speed.min, 0);
    assert_eq!(cfg.speed.max, 255);
    assert_eq!(cfg.speed.initial, 60);
    assert_eq!(cfg.encoder.debounce_ms, 5);
    assert_eq!(cfg.encoder.latch_mode, LatchMode::Four3);
    assert_eq!(cfg.control.poll_ms, 5);
    assert_eq!(cfg.bindings.preset, Preset::RevertConfirm);
    assert!(cfg.buttons.active_low);
}

#[test]
fn missing_pins_is_a_parse_error() {
    assert!(load_toml("[speed]\ninitial = 10\n").is_err());
}

#[rstest]
#[case("[control]\npoll_ms = 10\n", "poll_ms must be <= encoder.debounce_ms")]
#[case("[control]\npoll_ms = 0\n", "poll_ms must be >= 1")]
#[case("[speed]\nmin = 200\nmax = 100\n", "speed.min must be < speed.max")]
#[case("[speed]\nmin = 10\nmax = 100\ninitial = 5\n", "speed.initial must be within")]
#[case("[encoder]\ndebounce_ms = 0\n", "encoder.debounce_ms must be >= 1")]
#[case("[encoder]\nsample_us = 10\n", "encoder.sample_us")]
#[case("[buttons]\ndebounce_ms = 50\nlong_press_ms = 40\n", "long_press_ms must be >")]
#[case("[pwm]\nfrequency_hz = 0.0\n", "pwm.frequency_hz must be > 0")]
#[case("[bindings]\nencoder_step = 0\n", "encoder_step must be >= 1")]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation")]
fn rejects_out_of_range(#[case] extra: &str, #[case] needle: &str) {
    let cfg = load_toml(&with_pins(extra)).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "expected '{needle}' in '{err}'"
    );
}

#[test]
fn rejects_duplicate_pins() {
    let toml = PINS.replace("confirm_btn = 33", "confirm_btn = 32");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("duplicate pin");
    assert!(format!("{err}").contains("reuses pin 32"));
}

#[test]
fn parses_explicit_button_table() {
    let cfg = load_toml(&with_pins(
        r#"
[bindings]
preset = "step_buttons"
encoder_step = 10

[[bindings.button]]
button = "back"
gesture = "click"
effect = "step_down"
step = 10

[[bindings.button]]
button = "confirm"
gesture = "long_press"
effect = "confirm"
"#,
    ))
    .expect("parse TOML");
    cfg.validate().expect("valid bindings");
    assert_eq!(cfg.bindings.preset, Preset::StepButtons);
    assert_eq!(cfg.bindings.encoder_step, Some(10));
    assert_eq!(cfg.bindings.buttons.len(), 2);
    assert_eq!(cfg.bindings.buttons[0].effect, EffectName::StepDown);
    assert_eq!(cfg.bindings.buttons[1].gesture, GestureName::LongPress);
}

#[test]
fn step_on_non_step_effect_is_rejected() {
    let cfg = load_toml(&with_pins(
        r#"
[[bindings.button]]
button = "back"
gesture = "click"
effect = "revert"
step = 3
"#,
    ))
    .expect("parse TOML");
    assert!(cfg.validate().is_err());
}

#[test]
fn load_file_reports_invalid_configuration() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg.toml");
    fs::write(&path, with_pins("[control]\npoll_ms = 50\n")).unwrap();
    let err = load_file(&path).expect_err("poll slower than debounce");
    assert!(format!("{err}").contains("invalid configuration"));

    fs::write(&path, PINS).unwrap();
    load_file(&path).expect("valid file");
}
