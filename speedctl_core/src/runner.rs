//! The polling control loop.
//!
//! One `tick` polls the encoder, then every button, folds the resulting
//! effects into the controller, advances the run-time accumulator and
//! pushes a snapshot to the display. Effects from a single tick are applied
//! in that order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use speedctl_traits::clock::Clock;
use speedctl_traits::{Actuator, DigitalInput, QuadratureCounter, StatusDisplay, StatusSnapshot};

use crate::button::ButtonSource;
use crate::controller::MotorSpeedController;
use crate::encoder::DebouncedQuadratureSource;

/// Why `ControlLoop::run` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    MaxRunTime,
}

pub struct ControlLoop<A, D, Q, I>
where
    A: Actuator,
    D: StatusDisplay,
    Q: QuadratureCounter,
    I: DigitalInput,
{
    pub(crate) controller: MotorSpeedController<A>,
    pub(crate) encoder: DebouncedQuadratureSource<Q>,
    pub(crate) buttons: Vec<ButtonSource<I>>,
    pub(crate) display: D,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) poll: Duration,
    pub(crate) started: bool,
}

impl<A, D, Q, I> core::fmt::Debug for ControlLoop<A, D, Q, I>
where
    A: Actuator,
    D: StatusDisplay,
    Q: QuadratureCounter,
    I: DigitalInput,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControlLoop")
            .field("controller", &self.controller)
            .field("encoder", &self.encoder)
            .field("buttons", &self.buttons.len())
            .field("poll", &self.poll)
            .finish()
    }
}

impl<A, D, Q, I> ControlLoop<A, D, Q, I>
where
    A: Actuator,
    D: StatusDisplay,
    Q: QuadratureCounter,
    I: DigitalInput,
{
    /// Issue the power-up command and render the first frame. Idempotent;
    /// `tick` and `run` call it on first use.
    pub fn begin(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let now = self.clock.now();
        self.controller.begin(now);
        self.render();
        tracing::info!(
            speed = self.controller.speed(),
            running = self.controller.is_running(),
            poll_ms = millis(self.poll),
            "control loop started"
        );
    }

    /// One iteration: encoder, buttons, accumulator, display.
    pub fn tick(&mut self) -> StatusSnapshot {
        self.begin();
        let now = self.clock.now();

        if let Some(rotation) = self.encoder.poll(now) {
            self.controller.handle_rotation(rotation, now);
        }
        for source in &mut self.buttons {
            if let Some(event) = source.poll(now) {
                self.controller.handle_button(event, now);
            }
        }

        self.controller.tick(now);
        self.render()
    }

    /// Tick until `shutdown` is raised or `max_run` elapses, then stop the motor.
    pub fn run(&mut self, shutdown: &AtomicBool, max_run: Option<Duration>) -> StopReason {
        self.begin();
        let start = self.clock.now();
        let reason = loop {
            if shutdown.load(Ordering::Relaxed) {
                tracing::info!("shutdown requested");
                break StopReason::Shutdown;
            }
            if let Some(max) = max_run
                && self.clock.now().saturating_duration_since(start) >= max
            {
                tracing::info!(max_ms = millis(max), "max run time reached");
                break StopReason::MaxRunTime;
            }
            self.tick();
            self.clock.sleep(self.poll);
        };
        self.shutdown();
        reason
    }

    /// Stop the motor and render the final frame.
    pub fn shutdown(&mut self) {
        let now = self.clock.now();
        self.controller.halt(now);
        self.render();
    }

    pub fn controller(&self) -> &MotorSpeedController<A> {
        &self.controller
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.controller.snapshot()
    }

    fn render(&mut self) -> StatusSnapshot {
        let snapshot = self.controller.snapshot();
        if let Err(e) = self.display.render(&snapshot) {
            tracing::warn!(error = %e, "display render failed");
        }
        snapshot
    }
}

#[inline]
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
