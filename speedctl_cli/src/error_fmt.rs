//! Human-readable error descriptions and structured JSON error formatting.

use speedctl_core::error::{BuildError, ControlError};

fn control_error(err: &eyre::Report) -> Option<&ControlError> {
    err.chain().find_map(|e| e.downcast_ref::<ControlError>())
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingActuator => {
                "What happened: No motor driver was provided to the control loop.\nLikely causes: The H-bridge failed to initialize or was not wired into the builder.\nHow to fix: Ensure the motor driver is created successfully and passed via with_actuator(...).".to_string()
            }
            BuildError::MissingDisplay => {
                "What happened: No status display was provided to the control loop.\nLikely causes: The display was not wired into the builder.\nHow to fix: Pass a display via with_display(...).".to_string()
            }
            BuildError::MissingEncoder => {
                "What happened: No encoder was provided to the control loop.\nLikely causes: Encoder pins failed to initialize or were not wired into the builder.\nHow to fix: Ensure the encoder is created successfully and passed via with_encoder(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/speedctl.toml for a sample."
            ),
        };
    }

    if let Some(ce) = control_error(err) {
        return match ce {
            ControlError::Config(msg) => format!(
                "What happened: Configuration is invalid or unreadable ({msg}).\nLikely causes: Wrong --config path, missing [pins], a pin used twice, or out-of-range values.\nHow to fix: Edit the TOML config and try again."
            ),
            ControlError::BringUp(msg) => format!(
                "What happened: GPIO could not be opened ({msg}).\nLikely causes: Not running on a Raspberry Pi, or no permission for /dev/gpiomem.\nHow to fix: Run on the target board as a user in the gpio group."
            ),
            ControlError::HardwareFault(msg) => format!(
                "What happened: A hardware pin could not be configured ({err}: {msg}).\nLikely causes: Incorrect pin numbers, a pin claimed by another process, or PWM unsupported on that line.\nHow to fix: Fix the [pins] values in the config and check for other GPIO users."
            ),
            ControlError::Hardware(msg) => format!(
                "What happened: Hardware error ({msg}).\nLikely causes: Wiring or power problem.\nHow to fix: Check wiring, then re-run with --log-level=debug."
            ),
        };
    }

    // String-based heuristics for errors that were not typed
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.starts_with("script line") || lower.starts_with("read script") {
        return format!(
            "What happened: The input script could not be used ({msg}).\nHow to fix: Use lines like `100 turn +1`, `200 press confirm`, `300 release confirm`."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: configuration 2, hardware 3, anything else 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(BuildError::InvalidConfig(_)) = err.downcast_ref::<BuildError>() {
        return 2;
    }
    match control_error(err) {
        Some(ControlError::Config(_)) => 2,
        Some(
            ControlError::BringUp(_) | ControlError::Hardware(_) | ControlError::HardwareFault(_),
        ) => 3,
        None => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    match control_error(err) {
        Some(ControlError::Config(_)) => "Config",
        Some(ControlError::BringUp(_)) => "BringUp",
        Some(ControlError::HardwareFault(_)) => "HardwareFault",
        Some(ControlError::Hardware(_)) => "Hardware",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_exit_2() {
        let e = eyre::Report::new(ControlError::Config("pins.enc_b reuses pin 25".into()));
        assert_eq!(exit_code_for_error(&e), 2);
        assert!(humanize(&e).contains("reuses pin"));
        let e = eyre::Report::new(BuildError::InvalidConfig("poll_ms must be >= 1"));
        assert_eq!(exit_code_for_error(&e), 2);
    }

    #[test]
    fn wrapped_hardware_errors_exit_3() {
        let e = eyre::Report::new(ControlError::BringUp("no /dev/gpiomem".into()))
            .wrap_err("open motor driver");
        assert_eq!(exit_code_for_error(&e), 3);
        assert!(humanize(&e).contains("GPIO could not be opened"));
        assert!(format_error_json(&e).contains("\"BringUp\""));
    }

    #[test]
    fn untyped_errors_exit_1() {
        let e = eyre::eyre!("script line 4: unknown action `spin`");
        assert_eq!(exit_code_for_error(&e), 1);
        assert!(humanize(&e).contains("input script"));
    }
}
