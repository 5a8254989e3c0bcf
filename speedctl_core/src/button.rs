//! Debounced momentary buttons producing click / long-press events.
//!
//! Each button runs a small state machine over a debounced level:
//!
//! ```text
//! Idle --press--> Pressed --release (held < long_press)--> Idle   [Click]
//!                 Pressed --held >= long_press----------> LongPressed [LongPressStart]
//!                 LongPressed --release--> Idle
//! ```

use std::time::{Duration, Instant};

use speedctl_traits::DigitalInput;

use crate::config::ButtonCfg;
use crate::hw_error::map_hw_error;

/// Logical buttons on the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Push switch on the encoder shaft
    Encoder,
    Back,
    Confirm,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Encoder, Button::Back, Button::Confirm];

    pub const fn as_index(self) -> usize {
        match self {
            Button::Encoder => 0,
            Button::Back => 1,
            Button::Confirm => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Click,
    LongPressStart,
}

impl Gesture {
    pub const fn as_index(self) -> usize {
        match self {
            Gesture::Click => 0,
            Gesture::LongPressStart => 1,
        }
    }
}

/// Transient event dispatched to the controller; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Click(Button),
    LongPressStart(Button),
}

impl ButtonEvent {
    pub fn button(self) -> Button {
        match self {
            ButtonEvent::Click(b) | ButtonEvent::LongPressStart(b) => b,
        }
    }

    pub fn gesture(self) -> Gesture {
        match self {
            ButtonEvent::Click(_) => Gesture::Click,
            ButtonEvent::LongPressStart(_) => Gesture::LongPressStart,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Idle,
    Pressed { since: Instant },
    LongPressed,
}

/// Pure edge detector for one button; feed it the asserted level each poll.
#[derive(Debug, Clone)]
pub struct EdgeButton {
    button: Button,
    debounce: Duration,
    long_press: Duration,
    state: PressState,
    // Raw level as last sampled and when it last changed
    raw_asserted: bool,
    raw_changed_at: Option<Instant>,
    // Level after debounce
    stable_asserted: bool,
}

impl EdgeButton {
    pub fn new(button: Button, debounce: Duration, long_press: Duration) -> Self {
        Self {
            button,
            debounce,
            long_press,
            state: PressState::Idle,
            raw_asserted: false,
            raw_changed_at: None,
            stable_asserted: false,
        }
    }

    pub fn button(&self) -> Button {
        self.button
    }

    /// True while the debounced level is asserted.
    pub fn is_pressed(&self) -> bool {
        self.stable_asserted
    }

    /// Feed one sample of the (polarity-corrected) level.
    pub fn sample(&mut self, asserted: bool, now: Instant) -> Option<ButtonEvent> {
        if asserted != self.raw_asserted {
            self.raw_asserted = asserted;
            self.raw_changed_at = Some(now);
        }
        let changed_at = self.raw_changed_at.unwrap_or(now);

        let mut edge = None;
        if self.raw_asserted != self.stable_asserted
            && now.saturating_duration_since(changed_at) >= self.debounce
        {
            self.stable_asserted = self.raw_asserted;
            edge = Some(self.stable_asserted);
        }

        match (self.state, edge) {
            (PressState::Idle, Some(true)) => {
                tracing::trace!(button = ?self.button, "button down");
                self.state = PressState::Pressed { since: changed_at };
                // A long threshold shorter than the debounce can already be due
                self.check_long_press(now)
            }
            (PressState::Pressed { since }, Some(false)) => {
                self.state = PressState::Idle;
                let held = changed_at.saturating_duration_since(since);
                if held >= self.long_press {
                    // Threshold passed between polls; report the hold rather than a click
                    Some(ButtonEvent::LongPressStart(self.button))
                } else {
                    Some(ButtonEvent::Click(self.button))
                }
            }
            (PressState::Pressed { .. }, None) => self.check_long_press(now),
            (PressState::LongPressed, Some(false)) => {
                tracing::trace!(button = ?self.button, "long press released");
                self.state = PressState::Idle;
                None
            }
            _ => None,
        }
    }

    fn check_long_press(&mut self, now: Instant) -> Option<ButtonEvent> {
        // A pending (not yet debounced) release freezes the hold time
        if !self.raw_asserted {
            return None;
        }
        if let PressState::Pressed { since } = self.state
            && now.saturating_duration_since(since) >= self.long_press
        {
            self.state = PressState::LongPressed;
            return Some(ButtonEvent::LongPressStart(self.button));
        }
        None
    }
}

/// A button wired to a `DigitalInput` with configured polarity.
pub struct ButtonSource<I: DigitalInput> {
    input: I,
    active_low: bool,
    edge: EdgeButton,
}

impl<I: DigitalInput> core::fmt::Debug for ButtonSource<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ButtonSource")
            .field("active_low", &self.active_low)
            .field("edge", &self.edge)
            .finish()
    }
}

impl<I: DigitalInput> ButtonSource<I> {
    pub fn new(button: Button, input: I, cfg: &ButtonCfg) -> Self {
        Self {
            input,
            active_low: cfg.active_low,
            edge: EdgeButton::new(
                button,
                Duration::from_millis(cfg.debounce_ms),
                Duration::from_millis(cfg.long_press_ms),
            ),
        }
    }

    pub fn button(&self) -> Button {
        self.edge.button()
    }

    /// Sample the input once. A failed read skips this sample.
    pub fn poll(&mut self, now: Instant) -> Option<ButtonEvent> {
        let level = match self.input.is_high() {
            Ok(level) => level,
            Err(e) => {
                let err = map_hw_error(&*e);
                tracing::warn!(button = ?self.edge.button(), error = %err, "button read failed");
                return None;
            }
        };
        let asserted = level != self.active_low;
        let ev = self.edge.sample(asserted, now);
        if let Some(ev) = ev {
            tracing::debug!(?ev, "button gesture");
        }
        ev
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(20);
    const LONG: Duration = Duration::from_millis(500);

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    /// Feed (time_ms, level) samples and collect emitted events.
    fn run(samples: &[(u64, bool)]) -> Vec<ButtonEvent> {
        let t0 = Instant::now();
        let mut b = EdgeButton::new(Button::Back, DEBOUNCE, LONG);
        samples
            .iter()
            .filter_map(|&(ms, lvl)| b.sample(lvl, at(t0, ms)))
            .collect()
    }

    #[test]
    fn short_press_is_a_click() {
        let ev = run(&[(0, true), (25, true), (100, false), (125, false)]);
        assert_eq!(ev, vec![ButtonEvent::Click(Button::Back)]);
    }

    #[test]
    fn hold_emits_long_press_once_and_no_click() {
        let ev = run(&[
            (0, true),
            (25, true),
            (499, true),
            (500, true),
            (700, true),
            (800, false),
            (830, false),
        ]);
        assert_eq!(ev, vec![ButtonEvent::LongPressStart(Button::Back)]);
    }

    #[test]
    fn chatter_shorter_than_debounce_is_ignored() {
        let ev = run(&[
            (0, true),
            (5, false),
            (10, true),
            (15, false),
            (40, false),
            (100, false),
        ]);
        assert!(ev.is_empty());
    }

    #[test]
    fn release_bounce_does_not_double_click() {
        let ev = run(&[
            (0, true),
            (25, true),
            (100, false),
            (105, true),
            (110, false),
            (140, false),
            (200, false),
        ]);
        assert_eq!(ev, vec![ButtonEvent::Click(Button::Back)]);
    }

    #[test]
    fn pending_release_does_not_become_long_press() {
        // Released at 490, debounce confirms at 510, past the 500 ms threshold
        let ev = run(&[(0, true), (25, true), (490, false), (505, false), (515, false)]);
        assert_eq!(ev, vec![ButtonEvent::Click(Button::Back)]);
    }

    #[test]
    fn event_accessors() {
        let ev = ButtonEvent::LongPressStart(Button::Confirm);
        assert_eq!(ev.button(), Button::Confirm);
        assert_eq!(ev.gesture(), Gesture::LongPressStart);
    }
}
