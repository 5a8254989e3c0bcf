//! Bounded speed value with saturating steps.

/// An integer held inside `[min, max]`.
///
/// Steps saturate at the bounds instead of failing; there is no way to
/// construct or mutate one into an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedValue {
    value: u8,
    min: u8,
    max: u8,
}

impl ClampedValue {
    /// Create a value in `[min, max]`; `value` is clamped and swapped bounds are reordered.
    pub fn new(value: u8, min: u8, max: u8) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    #[inline]
    pub fn get(&self) -> u8 {
        self.value
    }

    #[inline]
    pub fn min(&self) -> u8 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> u8 {
        self.max
    }

    /// `value = clamp(value + step, min, max)`; returns the new value.
    pub fn increment(&mut self, step: u8) -> u8 {
        self.value = self.value.saturating_add(step).clamp(self.min, self.max);
        self.value
    }

    /// `value = clamp(value - step, min, max)`; returns the new value.
    pub fn decrement(&mut self, step: u8) -> u8 {
        self.value = self.value.saturating_sub(step).clamp(self.min, self.max);
        self.value
    }

    /// Unconditionally clamp `v` into range and store it.
    pub fn set(&mut self, v: u8) -> u8 {
        self.value = v.clamp(self.min, self.max);
        self.value
    }
}
