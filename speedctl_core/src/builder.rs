//! Type-state builder for `ControlLoop` and generic `build_control_loop` constructor.
//!
//! The builder enforces at compile time that an actuator, a display and an
//! encoder are provided before `build()` is available. `try_build()` is always
//! available for dynamic checks. Buttons are optional; an unwired button
//! simply never produces events.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use speedctl_traits::clock::{Clock, MonotonicClock};
use speedctl_traits::{Actuator, DigitalInput, QuadratureCounter, StatusDisplay};

use crate::bindings::Bindings;
use crate::button::{Button, ButtonSource};
use crate::config::LoopSettings;
use crate::controller::MotorSpeedController;
use crate::encoder::DebouncedQuadratureSource;
use crate::error::{BuildError, Result};
use crate::runner::ControlLoop;

/// Dynamically dispatched control loop, as produced by `ControlLoopBuilder`.
pub type DynControlLoop = ControlLoop<
    Box<dyn Actuator>,
    Box<dyn StatusDisplay>,
    Box<dyn QuadratureCounter>,
    Box<dyn DigitalInput>,
>;

impl DynControlLoop {
    /// Start building a control loop.
    pub fn builder() -> ControlLoopBuilder<Missing, Missing, Missing> {
        ControlLoopBuilder::default()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `DynControlLoop`. All settings are validated on `build()`.
pub struct ControlLoopBuilder<A, D, E> {
    actuator: Option<Box<dyn Actuator>>,
    display: Option<Box<dyn StatusDisplay>>,
    encoder: Option<Box<dyn QuadratureCounter>>,
    buttons: Vec<(Button, Box<dyn DigitalInput>)>,
    settings: LoopSettings,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _a: PhantomData<A>,
    _d: PhantomData<D>,
    _e: PhantomData<E>,
}

impl Default for ControlLoopBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            actuator: None,
            display: None,
            encoder: None,
            buttons: Vec::new(),
            settings: LoopSettings::default(),
            clock: None,
            _a: PhantomData,
            _d: PhantomData,
            _e: PhantomData,
        }
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

/// Check settings for values the control loop cannot honor.
pub fn validate_settings(settings: &LoopSettings) -> Result<()> {
    let LoopSettings {
        speed,
        encoder,
        buttons,
        control,
        bindings,
    } = settings;

    if speed.min >= speed.max {
        return Err(invalid("speed.min must be below speed.max"));
    }
    if !(speed.min..=speed.max).contains(&speed.initial) {
        return Err(invalid("speed.initial must lie within [min, max]"));
    }
    if encoder.debounce_ms == 0 {
        return Err(invalid("encoder debounce must be >= 1 ms"));
    }
    if encoder.sample_us == 0 {
        return Err(invalid("encoder sample interval must be > 0"));
    }
    if buttons.debounce_ms == 0 {
        return Err(invalid("button debounce must be >= 1 ms"));
    }
    if buttons.long_press_ms <= buttons.debounce_ms {
        return Err(invalid("long press must exceed button debounce"));
    }
    if control.poll_ms == 0 {
        return Err(invalid("poll_ms must be >= 1"));
    }
    // A slower poll would let two detents land inside one debounce window
    // and collapse into a single notch.
    if control.poll_ms > encoder.debounce_ms {
        return Err(invalid("poll_ms must not exceed encoder debounce"));
    }
    if bindings.encoder_step() == 0 {
        return Err(invalid("encoder step must be > 0"));
    }
    Ok(())
}

/// Validate settings and wire up a `ControlLoop`.
///
/// Single source of truth for construction, used by both
/// `ControlLoopBuilder::try_build()` and `build_control_loop()`.
fn validate_and_build<A, D, Q, I>(
    actuator: A,
    display: D,
    encoder: Q,
    buttons: Vec<(Button, I)>,
    settings: LoopSettings,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<ControlLoop<A, D, Q, I>>
where
    A: Actuator,
    D: StatusDisplay,
    Q: QuadratureCounter,
    I: DigitalInput,
{
    validate_settings(&settings)?;

    let mut seen = [false; 3];
    for (button, _) in &buttons {
        let slot = &mut seen[button.as_index()];
        if *slot {
            return Err(invalid("button wired twice"));
        }
        *slot = true;
    }

    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };

    let LoopSettings {
        speed,
        encoder: encoder_cfg,
        buttons: button_cfg,
        control,
        bindings,
    } = settings;

    let buttons = buttons
        .into_iter()
        .map(|(button, input)| ButtonSource::new(button, input, &button_cfg))
        .collect();

    Ok(ControlLoop {
        controller: MotorSpeedController::new(actuator, speed, bindings, control.start_running),
        encoder: DebouncedQuadratureSource::new(
            encoder,
            Duration::from_millis(encoder_cfg.debounce_ms),
        ),
        buttons,
        display,
        clock,
        poll: Duration::from_millis(control.poll_ms),
        started: false,
    })
}

impl<A, D, E> ControlLoopBuilder<A, D, E> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<DynControlLoop> {
        let actuator = self
            .actuator
            .ok_or_else(|| eyre::Report::new(BuildError::MissingActuator))?;
        let display = self
            .display
            .ok_or_else(|| eyre::Report::new(BuildError::MissingDisplay))?;
        let encoder = self
            .encoder
            .ok_or_else(|| eyre::Report::new(BuildError::MissingEncoder))?;
        validate_and_build(
            actuator,
            display,
            encoder,
            self.buttons,
            self.settings,
            self.clock,
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<A, D, E> ControlLoopBuilder<A, D, E> {
    pub fn with_settings(mut self, settings: LoopSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_bindings(mut self, bindings: Bindings) -> Self {
        self.settings.bindings = bindings;
        self
    }

    /// Wire a button input. Wiring the same button twice fails at build time.
    pub fn with_button(mut self, button: Button, input: impl DigitalInput + 'static) -> Self {
        self.buttons.push((button, Box::new(input)));
        self
    }

    /// Inject a custom clock (e.g. a test clock).
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

impl<D, E> ControlLoopBuilder<Missing, D, E> {
    pub fn with_actuator(
        self,
        actuator: impl Actuator + 'static,
    ) -> ControlLoopBuilder<Set, D, E> {
        ControlLoopBuilder {
            actuator: Some(Box::new(actuator)),
            display: self.display,
            encoder: self.encoder,
            buttons: self.buttons,
            settings: self.settings,
            clock: self.clock,
            _a: PhantomData,
            _d: PhantomData,
            _e: PhantomData,
        }
    }
}

impl<A, E> ControlLoopBuilder<A, Missing, E> {
    pub fn with_display(
        self,
        display: impl StatusDisplay + 'static,
    ) -> ControlLoopBuilder<A, Set, E> {
        ControlLoopBuilder {
            actuator: self.actuator,
            display: Some(Box::new(display)),
            encoder: self.encoder,
            buttons: self.buttons,
            settings: self.settings,
            clock: self.clock,
            _a: PhantomData,
            _d: PhantomData,
            _e: PhantomData,
        }
    }
}

impl<A, D> ControlLoopBuilder<A, D, Missing> {
    pub fn with_encoder(
        self,
        encoder: impl QuadratureCounter + 'static,
    ) -> ControlLoopBuilder<A, D, Set> {
        ControlLoopBuilder {
            actuator: self.actuator,
            display: self.display,
            encoder: Some(Box::new(encoder)),
            buttons: self.buttons,
            settings: self.settings,
            clock: self.clock,
            _a: PhantomData,
            _d: PhantomData,
            _e: PhantomData,
        }
    }
}

impl ControlLoopBuilder<Set, Set, Set> {
    /// Validate and build. Only available when actuator, display and encoder are set.
    pub fn build(self) -> Result<DynControlLoop> {
        self.try_build()
    }
}

/// Build a generic, statically-dispatched `ControlLoop` from concrete parts.
///
/// Delegates to the shared `validate_and_build`.
pub fn build_control_loop<A, D, Q, I>(
    actuator: A,
    display: D,
    encoder: Q,
    buttons: Vec<(Button, I)>,
    settings: LoopSettings,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<ControlLoop<A, D, Q, I>>
where
    A: Actuator,
    D: StatusDisplay,
    Q: QuadratureCounter,
    I: DigitalInput,
{
    validate_and_build(actuator, display, encoder, buttons, settings, clock)
}
