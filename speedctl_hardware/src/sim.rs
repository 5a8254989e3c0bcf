//! Simulated devices.
//!
//! Every simulated device is a cheap handle: clones share state through
//! atomics, so a test or a script player keeps one clone and drives the
//! other through the control loop. They are `Send`, which lets the pins feed
//! the background quadrature sampler.

use std::error::Error;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use speedctl_traits::{Actuator, DigitalInput, MotorCommand, QuadratureCounter, QuadraturePins};

type BoxError = Box<dyn Error + Send + Sync>;

/// H-bridge stand-in that remembers the last command.
#[derive(Debug, Clone, Default)]
pub struct SimulatedActuator {
    last: Arc<Mutex<Option<MotorCommand>>>,
    commands: Arc<AtomicU64>,
}

impl SimulatedActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_command(&self) -> Option<MotorCommand> {
        self.last.lock().map(|g| *g).unwrap_or(None)
    }

    /// Number of commands received so far.
    pub fn command_count(&self) -> u64 {
        self.commands.load(Ordering::Relaxed)
    }
}

impl Actuator for SimulatedActuator {
    fn set_command(&mut self, forward: bool, duty: u8) -> Result<(), BoxError> {
        tracing::debug!(forward, duty, "motor command (simulated)");
        if let Ok(mut last) = self.last.lock() {
            *last = Some(MotorCommand { forward, duty });
        }
        self.commands.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Already-decoded encoder position, advanced by whole detents.
#[derive(Debug, Clone, Default)]
pub struct SimulatedEncoder {
    position: Arc<AtomicI64>,
}

impl SimulatedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn by `detents`; positive is clockwise.
    pub fn turn(&self, detents: i64) {
        self.position.fetch_add(detents, Ordering::AcqRel);
    }

    pub fn get(&self) -> i64 {
        self.position.load(Ordering::Acquire)
    }
}

impl QuadratureCounter for SimulatedEncoder {
    fn position(&mut self) -> i64 {
        self.get()
    }
}

// Clockwise walk of the phase state (a | b << 1) starting at rest: 3 -> 1 -> 0 -> 2.
const CW_NEXT: [u8; 4] = [2, 0, 3, 1];
const CCW_NEXT: [u8; 4] = [1, 3, 0, 2];

/// Raw A/B phase levels, driven one transition at a time.
#[derive(Debug, Clone)]
pub struct SimulatedQuadraturePins {
    state: Arc<AtomicU8>,
}

impl Default for SimulatedQuadraturePins {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedQuadraturePins {
    /// Both phases high, the rest state of a pulled-up encoder.
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(3)),
        }
    }

    pub fn set_phases(&self, a: bool, b: bool) {
        self.state
            .store(u8::from(a) | (u8::from(b) << 1), Ordering::Release);
    }

    pub fn phases(&self) -> (bool, bool) {
        let s = self.state.load(Ordering::Acquire);
        (s & 1 != 0, s & 2 != 0)
    }

    /// Advance one quarter step in the given direction.
    pub fn step(&self, clockwise: bool) {
        let table = if clockwise { &CW_NEXT } else { &CCW_NEXT };
        let s = self.state.load(Ordering::Acquire);
        self.state
            .store(table[usize::from(s & 3)], Ordering::Release);
    }
}

impl QuadraturePins for SimulatedQuadraturePins {
    fn read_phases(&mut self) -> Result<(bool, bool), BoxError> {
        Ok(self.phases())
    }
}

/// Momentary push button with configurable wiring polarity.
#[derive(Debug, Clone)]
pub struct SimulatedButton {
    pressed: Arc<AtomicBool>,
    active_low: bool,
}

impl SimulatedButton {
    pub fn new(active_low: bool) -> Self {
        Self {
            pressed: Arc::new(AtomicBool::new(false)),
            active_low,
        }
    }

    pub fn press(&self) {
        self.pressed.store(true, Ordering::Release);
    }

    pub fn release(&self) {
        self.pressed.store(false, Ordering::Release);
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Acquire)
    }
}

impl DigitalInput for SimulatedButton {
    fn is_high(&mut self) -> Result<bool, BoxError> {
        Ok(self.is_pressed() != self.active_low)
    }
}
