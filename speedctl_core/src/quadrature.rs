//! Software A/B quadrature decoding.
//!
//! Produces the raw position counter that `DebouncedQuadratureSource` consumes.
//! Which transitions make up one detent is a property of the encoder, not of
//! the controller, so it is selected here through `LatchMode`.

/// Direction contribution for each `(old_state << 2) | new_state` pair.
/// Invalid double transitions (both phases flipping at once) contribute 0.
const KNOB_DIR: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// How many phase transitions constitute one logical detent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LatchMode {
    /// 4 transitions per detent, latched when both phases are high.
    #[default]
    Four3,
    /// 4 transitions per detent, latched when both phases are low.
    Four0,
    /// 2 transitions per detent, latched on both rest states.
    Two03,
}

#[inline]
fn phase_state(a: bool, b: bool) -> u8 {
    u8::from(a) | (u8::from(b) << 1)
}

/// Incremental decoder tracking sub-detent transitions and the latched position.
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    mode: LatchMode,
    old_state: u8,
    transitions: i64,
    position: i64,
}

impl QuadratureDecoder {
    /// Decoder assuming both phases idle high (pull-ups, detent at rest).
    pub fn new(mode: LatchMode) -> Self {
        Self::with_levels(mode, true, true)
    }

    /// Decoder seeded from the phase levels observed at start-up.
    pub fn with_levels(mode: LatchMode, a: bool, b: bool) -> Self {
        Self {
            mode,
            old_state: phase_state(a, b),
            transitions: 0,
            position: 0,
        }
    }

    pub fn mode(&self) -> LatchMode {
        self.mode
    }

    /// Latched position in detents.
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Feed one A/B sample and return the latched position.
    pub fn update(&mut self, a: bool, b: bool) -> i64 {
        let state = phase_state(a, b);
        if state == self.old_state {
            return self.position;
        }
        let idx = usize::from(state | (self.old_state << 2));
        self.transitions += i64::from(KNOB_DIR[idx]);
        self.old_state = state;

        match self.mode {
            LatchMode::Four3 if state == 3 => self.position = self.transitions >> 2,
            LatchMode::Four0 if state == 0 => self.position = self.transitions >> 2,
            LatchMode::Two03 if state == 0 || state == 3 => self.position = self.transitions >> 1,
            _ => {}
        }
        self.position
    }
}
