//! The input-to-actuation state machine.
//!
//! `MotorSpeedController` is the single writer of speed, saved speed, run
//! state and run time. Every effect is applied immediately and followed by
//! a fresh actuator command; nothing is batched or deferred.

use std::time::{Duration, Instant};

use speedctl_traits::{Actuator, MotorCommand, StatusSnapshot};

use crate::bindings::{Bindings, Effect};
use crate::button::ButtonEvent;
use crate::clamped::ClampedValue;
use crate::config::SpeedCfg;
use crate::encoder::Rotation;
use crate::hw_error::map_hw_error;
use crate::runtime::RuntimeAccumulator;

/// Command for the given state. Direction is always forward; stopping
/// drops the duty to 0 but leaves the speed setting untouched.
#[inline]
pub fn command_for(running: bool, speed: u8) -> MotorCommand {
    if running {
        MotorCommand::forward(speed)
    } else {
        MotorCommand::forward(0)
    }
}

pub struct MotorSpeedController<A: Actuator> {
    actuator: A,
    speed: ClampedValue,
    saved: u8,
    running: bool,
    runtime: RuntimeAccumulator,
    bindings: Bindings,
    last_command: Option<MotorCommand>,
}

impl<A: Actuator> core::fmt::Debug for MotorSpeedController<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MotorSpeedController")
            .field("speed", &self.speed.get())
            .field("saved", &self.saved)
            .field("running", &self.running)
            .field("run_time", &self.runtime.total())
            .finish()
    }
}

impl<A: Actuator> MotorSpeedController<A> {
    pub fn new(actuator: A, speed: SpeedCfg, bindings: Bindings, running: bool) -> Self {
        let speed = ClampedValue::new(speed.initial, speed.min, speed.max);
        Self {
            actuator,
            saved: speed.get(),
            speed,
            running,
            runtime: RuntimeAccumulator::new(),
            bindings,
            last_command: None,
        }
    }

    /// Issue the power-up command and anchor the run-time clock.
    pub fn begin(&mut self, now: Instant) {
        self.runtime.tick(now, self.running);
        self.issue();
    }

    pub fn speed(&self) -> u8 {
        self.speed.get()
    }

    pub fn saved_speed(&self) -> u8 {
        self.saved
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run_time(&self) -> Duration {
        self.runtime.total()
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Command derived from the current state.
    pub fn command(&self) -> MotorCommand {
        command_for(self.running, self.speed.get())
    }

    /// The last command handed to the actuator, if any.
    pub fn last_command(&self) -> Option<MotorCommand> {
        self.last_command
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            speed: self.speed.get(),
            saved_speed: self.saved,
            running: self.running,
            unsaved: self.speed.get() != self.saved,
            run_time: self.runtime.total(),
        }
    }

    /// Apply one effect and re-issue the actuator command.
    pub fn apply(&mut self, effect: Effect, now: Instant) {
        match effect {
            Effect::StepUp(n) => {
                self.speed.increment(n);
            }
            Effect::StepDown(n) => {
                self.speed.decrement(n);
            }
            Effect::ToggleRun => {
                // Close the running interval (or re-anchor) exactly at the toggle
                self.runtime.tick(now, self.running);
                self.running = !self.running;
                self.runtime.tick(now, self.running);
            }
            Effect::Confirm => {
                self.saved = self.speed.get();
            }
            Effect::Revert => {
                self.speed.set(self.saved);
            }
        }
        tracing::info!(
            ?effect,
            running = self.running,
            speed = self.speed.get(),
            saved = self.saved,
            "effect applied"
        );
        self.issue();
    }

    /// Map a notch through the bindings and apply it.
    pub fn handle_rotation(&mut self, rotation: Rotation, now: Instant) -> Effect {
        let effect = self.bindings.for_rotation(rotation);
        self.apply(effect, now);
        effect
    }

    /// Map a button gesture through the bindings; unbound gestures are ignored.
    pub fn handle_button(&mut self, event: ButtonEvent, now: Instant) -> Option<Effect> {
        let effect = self.bindings.for_button(event);
        match effect {
            Some(effect) => self.apply(effect, now),
            None => tracing::debug!(?event, "unbound button gesture"),
        }
        effect
    }

    /// Advance run time to `now`.
    pub fn tick(&mut self, now: Instant) {
        self.runtime.tick(now, self.running);
    }

    /// Stop the motor for good: close the running interval at `now`, clear
    /// the run state and drive the bridge to zero duty.
    pub fn halt(&mut self, now: Instant) {
        self.runtime.tick(now, self.running);
        if self.running {
            self.running = false;
            self.runtime.tick(now, self.running);
            tracing::info!(speed = self.speed.get(), saved = self.saved, "motor halted");
        }
        self.issue();
    }

    fn issue(&mut self) {
        self.send(self.command());
    }

    fn send(&mut self, cmd: MotorCommand) {
        tracing::debug!(forward = cmd.forward, duty = cmd.duty, "motor command");
        if let Err(e) = self.actuator.set_command(cmd.forward, cmd.duty) {
            let err = map_hw_error(&*e);
            tracing::warn!(error = %err, duty = cmd.duty, "actuator command failed");
        }
        self.last_command = Some(cmd);
    }
}
