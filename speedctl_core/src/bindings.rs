//! Event → effect policy.
//!
//! The controller never decides what a button means. A `Bindings` table is
//! injected at construction and maps encoder notches and button gestures to
//! one of five effects, so the panel can be remapped without touching the
//! state machine.

use crate::button::{Button, ButtonEvent, Gesture};
use crate::encoder::Rotation;

/// State change applied by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    StepUp(u8),
    StepDown(u8),
    ToggleRun,
    /// Save the current speed.
    Confirm,
    /// Restore the saved speed.
    Revert,
}

impl Effect {
    fn label(self) -> String {
        match self {
            Effect::StepUp(n) => format!("+{n}"),
            Effect::StepDown(n) => format!("-{n}"),
            Effect::ToggleRun => "On/Off".to_string(),
            Effect::Confirm => "Save".to_string(),
            Effect::Revert => "Revert".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    encoder_step: u8,
    // [button][gesture]
    table: [[Option<Effect>; 2]; 3],
}

impl Default for Bindings {
    fn default() -> Self {
        Self::revert_confirm()
    }
}

impl Bindings {
    /// No buttons bound; the encoder steps by `encoder_step`.
    pub fn empty(encoder_step: u8) -> Self {
        Self {
            encoder_step,
            table: [[None; 2]; 3],
        }
    }

    /// Step 5. Knob click toggles the motor, Back reverts, Confirm saves.
    pub fn revert_confirm() -> Self {
        Self::empty(5)
            .bind(Button::Encoder, Gesture::Click, Effect::ToggleRun)
            .bind(Button::Back, Gesture::Click, Effect::Revert)
            .bind(Button::Confirm, Gesture::Click, Effect::Confirm)
    }

    /// Step 10. Back/Confirm clicks step down/up; holding either saves.
    pub fn step_buttons() -> Self {
        Self::empty(10)
            .bind(Button::Encoder, Gesture::Click, Effect::ToggleRun)
            .bind(Button::Back, Gesture::Click, Effect::StepDown(10))
            .bind(Button::Confirm, Gesture::Click, Effect::StepUp(10))
            .bind(Button::Back, Gesture::LongPressStart, Effect::Confirm)
            .bind(Button::Confirm, Gesture::LongPressStart, Effect::Confirm)
    }

    pub fn bind(mut self, button: Button, gesture: Gesture, effect: Effect) -> Self {
        self.table[button.as_index()][gesture.as_index()] = Some(effect);
        self
    }

    pub fn unbind(mut self, button: Button, gesture: Gesture) -> Self {
        self.table[button.as_index()][gesture.as_index()] = None;
        self
    }

    /// Drop every button binding, keeping the encoder step.
    pub fn clear_buttons(mut self) -> Self {
        self.table = [[None; 2]; 3];
        self
    }

    pub fn with_encoder_step(mut self, step: u8) -> Self {
        self.encoder_step = step;
        self
    }

    pub fn encoder_step(&self) -> u8 {
        self.encoder_step
    }

    pub fn for_rotation(&self, rotation: Rotation) -> Effect {
        match rotation {
            Rotation::Clockwise => Effect::StepUp(self.encoder_step),
            Rotation::CounterClockwise => Effect::StepDown(self.encoder_step),
        }
    }

    pub fn for_button(&self, event: ButtonEvent) -> Option<Effect> {
        self.table[event.button().as_index()][event.gesture().as_index()]
    }

    /// One-line operator hint, e.g. `knob=On/Off | BCK=Revert | CON=Save`.
    pub fn hint(&self) -> String {
        let mut parts = Vec::new();
        for button in Button::ALL {
            let name = match button {
                Button::Encoder => "knob",
                Button::Back => "BCK",
                Button::Confirm => "CON",
            };
            let row = &self.table[button.as_index()];
            if let Some(e) = row[Gesture::Click.as_index()] {
                parts.push(format!("{name}={}", e.label()));
            }
            if let Some(e) = row[Gesture::LongPressStart.as_index()] {
                parts.push(format!("hold {name}={}", e.label()));
            }
        }
        parts.join(" | ")
    }
}
