#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core speed-control logic (hardware-agnostic).
//!
//! This crate turns operator input into motor commands. All hardware
//! interactions go through the `speedctl_traits` seams: `Actuator` for the
//! H-bridge, `QuadratureCounter`/`QuadraturePins` for the encoder,
//! `DigitalInput` for buttons and `StatusDisplay` for the screen.
//!
//! ## Architecture
//!
//! - **Input**: quadrature decoding (`quadrature`), notch debouncing
//!   (`encoder`) and button gestures (`button`)
//! - **Policy**: event → effect table (`bindings`)
//! - **State**: clamped speed, saved speed, run flag and run time
//!   (`controller`, `clamped`, `runtime`)
//! - **Loop**: polling cadence and display refresh (`runner`, `builder`)
//! - **Sampling**: background A/B decoding thread (`sampler`)

pub mod bindings;
pub mod builder;
pub mod button;
pub mod clamped;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod encoder;
pub mod error;
pub mod hw_error;
pub mod mocks;
pub mod quadrature;
pub mod runner;
pub mod runtime;
pub mod sampler;

pub use bindings::{Bindings, Effect};
pub use builder::{ControlLoopBuilder, DynControlLoop, Missing, Set, build_control_loop, validate_settings};
pub use button::{Button, ButtonEvent, ButtonSource, EdgeButton, Gesture};
pub use clamped::ClampedValue;
pub use config::{ButtonCfg, EncoderCfg, LoopCfg, LoopSettings, SpeedCfg};
pub use controller::{MotorSpeedController, command_for};
pub use encoder::{DebouncedQuadratureSource, QuadratureDebouncer, Rotation};
pub use error::{BuildError, ControlError, Report, Result};
pub use quadrature::{LatchMode, QuadratureDecoder};
pub use runner::{ControlLoop, StopReason};
pub use runtime::RuntimeAccumulator;
pub use sampler::QuadratureSampler;

pub use speedctl_traits::{MotorCommand, StatusSnapshot};
