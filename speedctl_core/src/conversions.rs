//! `From` implementations bridging `speedctl_config` types to `speedctl_core` types.

use crate::bindings::{Bindings, Effect};
use crate::button::{Button, Gesture};
use crate::config::{ButtonCfg, EncoderCfg, LoopCfg, LoopSettings, SpeedCfg};
use crate::quadrature::LatchMode;

// ── Speed ────────────────────────────────────────────────────────────────────

impl From<&speedctl_config::SpeedCfg> for SpeedCfg {
    fn from(c: &speedctl_config::SpeedCfg) -> Self {
        Self {
            min: c.min,
            max: c.max,
            initial: c.initial,
        }
    }
}

// ── Encoder ──────────────────────────────────────────────────────────────────

impl From<speedctl_config::LatchMode> for LatchMode {
    fn from(m: speedctl_config::LatchMode) -> Self {
        match m {
            speedctl_config::LatchMode::Four3 => LatchMode::Four3,
            speedctl_config::LatchMode::Four0 => LatchMode::Four0,
            speedctl_config::LatchMode::Two03 => LatchMode::Two03,
        }
    }
}

impl From<&speedctl_config::EncoderCfg> for EncoderCfg {
    fn from(c: &speedctl_config::EncoderCfg) -> Self {
        Self {
            debounce_ms: c.debounce_ms,
            latch_mode: c.latch_mode.into(),
            sample_us: c.sample_us,
        }
    }
}

// ── Buttons ──────────────────────────────────────────────────────────────────

impl From<&speedctl_config::ButtonsCfg> for ButtonCfg {
    fn from(c: &speedctl_config::ButtonsCfg) -> Self {
        Self {
            debounce_ms: c.debounce_ms,
            long_press_ms: c.long_press_ms,
            active_low: c.active_low,
        }
    }
}

impl From<speedctl_config::ButtonName> for Button {
    fn from(b: speedctl_config::ButtonName) -> Self {
        match b {
            speedctl_config::ButtonName::Encoder => Button::Encoder,
            speedctl_config::ButtonName::Back => Button::Back,
            speedctl_config::ButtonName::Confirm => Button::Confirm,
        }
    }
}

impl From<speedctl_config::GestureName> for Gesture {
    fn from(g: speedctl_config::GestureName) -> Self {
        match g {
            speedctl_config::GestureName::Click => Gesture::Click,
            speedctl_config::GestureName::LongPress => Gesture::LongPressStart,
        }
    }
}

// ── Bindings ─────────────────────────────────────────────────────────────────

impl From<&speedctl_config::BindingsCfg> for Bindings {
    fn from(c: &speedctl_config::BindingsCfg) -> Self {
        let mut bindings = match c.preset {
            speedctl_config::Preset::RevertConfirm => Bindings::revert_confirm(),
            speedctl_config::Preset::StepButtons => Bindings::step_buttons(),
        };
        if let Some(step) = c.encoder_step {
            bindings = bindings.with_encoder_step(step);
        }
        if c.buttons.is_empty() {
            return bindings;
        }
        let step = bindings.encoder_step();
        let mut bindings = bindings.clear_buttons();
        for row in &c.buttons {
            let n = row.step.unwrap_or(step);
            let effect = match row.effect {
                speedctl_config::EffectName::StepUp => Effect::StepUp(n),
                speedctl_config::EffectName::StepDown => Effect::StepDown(n),
                speedctl_config::EffectName::ToggleRun => Effect::ToggleRun,
                speedctl_config::EffectName::Confirm => Effect::Confirm,
                speedctl_config::EffectName::Revert => Effect::Revert,
            };
            bindings = bindings.bind(row.button.into(), row.gesture.into(), effect);
        }
        bindings
    }
}

// ── Whole config ─────────────────────────────────────────────────────────────

impl From<&speedctl_config::Config> for LoopSettings {
    fn from(c: &speedctl_config::Config) -> Self {
        Self {
            speed: (&c.speed).into(),
            encoder: (&c.encoder).into(),
            buttons: (&c.buttons).into(),
            control: LoopCfg {
                poll_ms: c.control.poll_ms,
                start_running: true,
            },
            bindings: (&c.bindings).into(),
        }
    }
}
