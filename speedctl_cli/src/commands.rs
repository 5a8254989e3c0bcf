//! Subcommand implementations.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use eyre::{Result, WrapErr, eyre};
use serde_json::json;
use speedctl_core::{
    ControlLoopBuilder, DynControlLoop, LoopSettings, MotorCommand, Set, StatusSnapshot,
    StopReason,
};
use speedctl_traits::clock::ManualClock;
use speedctl_traits::{Actuator, StatusDisplay};
use speedctl_ui::{Screens, TextDisplay, debug_screen, operator_screen};

use crate::hw::{self, Hardware};
use crate::script::{self, Action};

fn wire(
    hw: Hardware,
    display: impl StatusDisplay + 'static,
    settings: LoopSettings,
) -> ControlLoopBuilder<Set, Set, Set> {
    let mut builder = DynControlLoop::builder()
        .with_actuator(hw.actuator)
        .with_display(display)
        .with_encoder(hw.encoder)
        .with_settings(settings);
    for (button, input) in hw.buttons {
        builder = builder.with_button(button, input);
    }
    builder
}

/// Final state as printed by `run` and `simulate`.
fn print_report(
    snapshot: &StatusSnapshot,
    command: Option<MotorCommand>,
    hint: &str,
    json_out: bool,
    extra: serde_json::Value,
) {
    let duty = command.map_or(0, |c| c.duty);
    if json_out {
        let mut obj = json!({
            "speed": snapshot.speed,
            "saved_speed": snapshot.saved_speed,
            "running": snapshot.running,
            "unsaved": snapshot.unsaved,
            "run_time_ms": u64::try_from(snapshot.run_time.as_millis()).unwrap_or(u64::MAX),
            "duty": duty,
        });
        if let (Some(o), Some(e)) = (obj.as_object_mut(), extra.as_object()) {
            o.extend(e.clone());
        }
        println!("{obj}");
    } else {
        for line in operator_screen(snapshot, hint)
            .into_iter()
            .chain(debug_screen(snapshot))
        {
            println!("{line}");
        }
        println!("Duty: {duty}");
    }
}

pub fn run(
    cfg: &speedctl_config::Config,
    max_run_ms: Option<u64>,
    screens: Screens,
    json_out: bool,
) -> Result<()> {
    let settings = LoopSettings::from(cfg);
    let hint = settings.bindings.hint();

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
            .map_err(|e| eyre!("install Ctrl-C handler: {e}"))?;
    }

    let hw = hw::bring_up(cfg, &settings)?;
    let backend = hw.backend;
    let display = TextDisplay::new(std::io::stdout(), hint.clone()).with_screens(screens);
    let mut lp = wire(hw, display, settings).build()?;

    tracing::info!(backend, max_run_ms, "running; press Ctrl-C to stop");
    let reason = lp.run(&shutdown, max_run_ms.map(Duration::from_millis));
    let stop = match reason {
        StopReason::Shutdown => "shutdown",
        StopReason::MaxRunTime => "max_run_time",
    };
    tracing::info!(stop, "control loop stopped");

    print_report(
        &lp.snapshot(),
        lp.controller().last_command(),
        &hint,
        json_out,
        json!({ "stop": stop, "backend": backend }),
    );
    Ok(())
}

pub fn simulate(
    cfg: &speedctl_config::Config,
    script_path: &Path,
    settle_ms: u64,
    frames: bool,
    json_out: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(script_path)
        .wrap_err_with(|| format!("read script {}", script_path.display()))?;
    let events = script::parse(&text)?;

    let settings = LoopSettings::from(cfg);
    let hint = settings.bindings.hint();
    let (hw, handles) = hw::simulated(&settings);
    let clock = ManualClock::new();
    let sink: Box<dyn Write> = if frames && !json_out {
        Box::new(std::io::stdout())
    } else {
        Box::new(std::io::sink())
    };
    let display = TextDisplay::new(sink, hint.clone());
    let mut lp = wire(hw, display, settings)
        .with_clock(Box::new(clock.clone()))
        .build()?;

    let end_ms = events
        .last()
        .map_or(0, |e| e.at_ms)
        .saturating_add(settle_ms);
    let poll = lp.poll_interval();
    let mut pending = events.iter().peekable();
    loop {
        let now_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
        while let Some(ev) = pending.next_if(|e| e.at_ms <= now_ms) {
            tracing::debug!(at_ms = ev.at_ms, action = ?ev.action, "script event");
            match ev.action {
                Action::Turn(n) => handles.knob.turn(n),
                Action::Press(b) => handles.button(b).press(),
                Action::Release(b) => handles.button(b).release(),
            }
        }
        lp.tick();
        if now_ms >= end_ms {
            break;
        }
        clock.advance(poll);
    }

    print_report(
        &lp.snapshot(),
        handles.motor.last_command(),
        &hint,
        json_out,
        json!({ "events": events.len() }),
    );
    Ok(())
}

pub fn self_check(cfg: &speedctl_config::Config, json_out: bool) -> Result<()> {
    let settings = LoopSettings::from(cfg);
    speedctl_core::validate_settings(&settings)?;
    let mut hw = hw::bring_up(cfg, &settings)?;
    if let Err(e) = hw.actuator.set_command(true, 0) {
        let err = speedctl_core::hw_error::map_hw_error(&*e);
        return Err(eyre::Report::new(err).wrap_err("stop motor"));
    }
    if json_out {
        println!("{}", json!({ "status": "ok", "backend": hw.backend }));
    } else {
        println!("OK ({} backend)", hw.backend);
    }
    Ok(())
}
