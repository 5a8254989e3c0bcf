//! Runtime configuration structs used by the controller and the control loop.
//!
//! They are separate from the TOML-deserialized config in `speedctl_config`;
//! see `conversions` for the mapping.

use crate::quadrature::LatchMode;

/// Speed range and power-up value. Speed doubles as PWM duty (0..=255).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedCfg {
    pub min: u8,
    pub max: u8,
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

/// Encoder debounce and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderCfg {
    /// Minimum time between accepted notches (ms).
    pub debounce_ms: u64,
    pub latch_mode: LatchMode,
    /// A/B sampling interval of the decoder thread (µs).
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

/// Button debounce, long-press threshold and polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonCfg {
    pub debounce_ms: u64,
    pub long_press_ms: u64,
    pub active_low: bool,
}

impl Default for ButtonCfg {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            long_press_ms: 800,
            active_low: true,
        }
    }
}

/// Control loop cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopCfg {
    /// Delay between ticks (ms); must not exceed `EncoderCfg::debounce_ms`.
    pub poll_ms: u64,
    /// Whether the motor starts in the running state.
    pub start_running: bool,
}

impl Default for LoopCfg {
    fn default() -> Self {
        Self {
            poll_ms: 5,
            start_running: true,
        }
    }
}

/// Everything the control loop needs besides its hardware.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopSettings {
    pub speed: SpeedCfg,
    pub encoder: EncoderCfg,
    pub buttons: ButtonCfg,
    pub control: LoopCfg,
    pub bindings: crate::bindings::Bindings,
}
