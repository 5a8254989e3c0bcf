//! Hardware seams shared by the controller core, the drivers and the CLI.
//!
//! Everything that touches a pin goes through one of these traits. The types
//! that cross them are plain data so drivers never depend on the core.

pub mod clock;

pub use clock::{Clock, MonotonicClock};

use std::error::Error;
use std::time::Duration;

/// A single command for the H-bridge: direction plus PWM duty (0..=255).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorCommand {
    pub forward: bool,
    pub duty: u8,
}

impl MotorCommand {
    /// Forward rotation at the given duty.
    pub const fn forward(duty: u8) -> Self {
        Self {
            forward: true,
            duty,
        }
    }
}

/// Render-ready view of the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub speed: u8,
    pub saved_speed: u8,
    pub running: bool,
    /// `speed != saved_speed`
    pub unsaved: bool,
    /// Cumulative time spent running.
    pub run_time: Duration,
}

/// Motor driver accepting a direction and duty cycle.
pub trait Actuator {
    fn set_command(
        &mut self,
        forward: bool,
        duty: u8,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Render target for status snapshots.
pub trait StatusDisplay {
    fn render(&mut self, snapshot: &StatusSnapshot) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Raw, freely incrementing quadrature position (already latched per detent policy).
pub trait QuadratureCounter {
    fn position(&mut self) -> i64;
}

/// Phase A/B levels of a quadrature encoder, sampled together.
pub trait QuadraturePins {
    fn read_phases(&mut self) -> Result<(bool, bool), Box<dyn Error + Send + Sync>>;
}

/// A single digital input line. Polarity is interpreted by the consumer.
pub trait DigitalInput {
    fn is_high(&mut self) -> Result<bool, Box<dyn Error + Send + Sync>>;
}

impl<T: Actuator + ?Sized> Actuator for Box<T> {
    fn set_command(
        &mut self,
        forward: bool,
        duty: u8,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        (**self).set_command(forward, duty)
    }
}

impl<T: StatusDisplay + ?Sized> StatusDisplay for Box<T> {
    fn render(&mut self, snapshot: &StatusSnapshot) -> Result<(), Box<dyn Error + Send + Sync>> {
        (**self).render(snapshot)
    }
}

impl<T: QuadratureCounter + ?Sized> QuadratureCounter for Box<T> {
    fn position(&mut self) -> i64 {
        (**self).position()
    }
}

impl<T: QuadraturePins + ?Sized> QuadraturePins for Box<T> {
    fn read_phases(&mut self) -> Result<(bool, bool), Box<dyn Error + Send + Sync>> {
        (**self).read_phases()
    }
}

impl<T: DigitalInput + ?Sized> DigitalInput for Box<T> {
    fn is_high(&mut self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        (**self).is_high()
    }
}
