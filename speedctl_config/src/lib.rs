#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the motor speed controller.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Only `[pins]` is mandatory; every other section has bench defaults
//!   matching the reference wiring (L298N driver, KY-040 style encoder).
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct Pins {
    /// H-bridge direction input 1 (driven high for forward)
    pub motor_in1: u8,
    /// H-bridge direction input 2 (driven low for forward)
    pub motor_in2: u8,
    /// H-bridge enable line carrying the PWM
    pub motor_ena: u8,
    pub enc_a: u8,
    pub enc_b: u8,
    /// Encoder push switch
    pub enc_btn: u8,
    pub back_btn: u8,
    pub confirm_btn: u8,
}

impl Pins {
    fn all(&self) -> [(&'static str, u8); 8] {
        [
            ("motor_in1", self.motor_in1),
            ("motor_in2", self.motor_in2),
            ("motor_ena", self.motor_ena),
            ("enc_a", self.enc_a),
            ("enc_b", self.enc_b),
            ("enc_btn", self.enc_btn),
            ("back_btn", self.back_btn),
            ("confirm_btn", self.confirm_btn),
        ]
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct PwmCfg {
    pub frequency_hz: f64,
}

impl Default for PwmCfg {
    fn default() -> Self {
        Self {
            frequency_hz: 5000.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct SpeedCfg {
    pub min: u8,
    pub max: u8,
    /// Speed (and saved speed) at power-up
    pub initial: u8,
}

impl Default for SpeedCfg {
    fn default() -> Self {
        Self {
            min: 0,
            max: 255,
            initial: 60,
        }
    }
}

/// How many raw phase transitions make up one logical detent.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LatchMode {
    /// 4 transitions per detent, latched at state 3
    #[default]
    Four3,
    /// 4 transitions per detent, latched at state 0
    Four0,
    /// 2 transitions per detent, latched at states 0 and 3
    Two03,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct EncoderCfg {
    /// Minimum time between accepted notches
    pub debounce_ms: u64,
    pub latch_mode: LatchMode,
    /// A/B sampling interval of the decoder thread
    pub sample_us: u64,
}

impl Default for EncoderCfg {
    fn default() -> Self {
        Self {
            debounce_ms: 5,
            latch_mode: LatchMode::Four3,
            sample_us: 250,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ButtonsCfg {
    /// Raw level must be stable this long before an edge is accepted
    pub debounce_ms: u64,
    /// Hold time after which a press becomes a long press
    pub long_press_ms: u64,
    /// Treat low level as pressed when true
    pub active_low: bool,
}

impl Default for ButtonsCfg {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            long_press_ms: 800,
            active_low: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ControlCfg {
    /// Delay between control loop ticks; must not exceed encoder.debounce_ms
    pub poll_ms: u64,
}

impl Default for ControlCfg {
    fn default() -> Self {
        Self { poll_ms: 5 }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Step 5; back = revert, confirm = save
    #[default]
    RevertConfirm,
    /// Step 10; back/confirm step the speed, long press on either saves
    StepButtons,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ButtonName {
    Encoder,
    Back,
    Confirm,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GestureName {
    Click,
    LongPress,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EffectName {
    StepUp,
    StepDown,
    ToggleRun,
    Confirm,
    Revert,
}

/// One row of an explicit button table.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ButtonBinding {
    pub button: ButtonName,
    pub gesture: GestureName,
    pub effect: EffectName,
    /// Step size for `step_up` / `step_down`; defaults to the encoder step
    #[serde(default)]
    pub step: Option<u8>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BindingsCfg {
    pub preset: Preset,
    /// Overrides the preset's encoder step size
    pub encoder_step: Option<u8>,
    /// When non-empty, replaces the preset's button table entirely
    #[serde(rename = "button")]
    pub buttons: Vec<ButtonBinding>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub pins: Pins,
    #[serde(default)]
    pub pwm: PwmCfg,
    #[serde(default)]
    pub speed: SpeedCfg,
    #[serde(default)]
    pub encoder: EncoderCfg,
    #[serde(default)]
    pub buttons: ButtonsCfg,
    #[serde(default)]
    pub control: ControlCfg,
    #[serde(default)]
    pub bindings: BindingsCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("invalid configuration: {e}"))?;
    cfg.validate()
        .map_err(|e| eyre::eyre!("invalid configuration: {e}"))?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Pins
        let mut seen = HashSet::new();
        for (name, pin) in self.pins.all() {
            if !seen.insert(pin) {
                eyre::bail!("pins.{name} reuses pin {pin}");
            }
        }

        // PWM
        if !self.pwm.frequency_hz.is_finite() || self.pwm.frequency_hz <= 0.0 {
            eyre::bail!("pwm.frequency_hz must be > 0");
        }

        // Speed
        if self.speed.min >= self.speed.max {
            eyre::bail!("speed.min must be < speed.max");
        }
        if !(self.speed.min..=self.speed.max).contains(&self.speed.initial) {
            eyre::bail!("speed.initial must be within [speed.min, speed.max]");
        }

        // Encoder
        if self.encoder.debounce_ms == 0 {
            eyre::bail!("encoder.debounce_ms must be >= 1");
        }
        if !(50..=10_000).contains(&self.encoder.sample_us) {
            eyre::bail!("encoder.sample_us must be in [50, 10000]");
        }

        // Buttons
        if self.buttons.debounce_ms == 0 {
            eyre::bail!("buttons.debounce_ms must be >= 1");
        }
        if self.buttons.long_press_ms <= self.buttons.debounce_ms {
            eyre::bail!("buttons.long_press_ms must be > buttons.debounce_ms");
        }

        // Control: a poll slower than the encoder debounce can miss accepted notches
        if self.control.poll_ms == 0 {
            eyre::bail!("control.poll_ms must be >= 1");
        }
        if self.control.poll_ms > self.encoder.debounce_ms {
            eyre::bail!("control.poll_ms must be <= encoder.debounce_ms");
        }

        // Bindings
        if self.bindings.encoder_step == Some(0) {
            eyre::bail!("bindings.encoder_step must be >= 1");
        }
        for b in &self.bindings.buttons {
            let stepping = matches!(b.effect, EffectName::StepUp | EffectName::StepDown);
            if b.step.is_some() && !stepping {
                eyre::bail!("bindings.button.step only applies to step_up/step_down");
            }
            if b.step == Some(0) {
                eyre::bail!("bindings.button.step must be >= 1");
            }
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
