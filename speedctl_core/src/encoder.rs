//! Debounced detent events from a raw quadrature counter.

use std::time::{Duration, Instant};

use speedctl_traits::QuadratureCounter;

/// One accepted encoder notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// +1 for clockwise, -1 for counter-clockwise.
    pub fn sign(self) -> i8 {
        match self {
            Rotation::Clockwise => 1,
            Rotation::CounterClockwise => -1,
        }
    }
}

/// Time-gated acceptance of raw position changes.
///
/// A change is accepted only once strictly more than `debounce` has passed
/// since the previous accepted change. Rejected changes leave the baseline
/// untouched, so they are re-evaluated on the next observation rather than
/// lost. Every acceptance yields exactly one notch whatever the size of the
/// delta; a multi-detent jump inside one window collapses to a single step.
#[derive(Debug, Clone)]
pub struct QuadratureDebouncer {
    debounce: Duration,
    baseline: i64,
    last_accepted_at: Option<Instant>,
}

impl QuadratureDebouncer {
    pub fn new(debounce: Duration, origin: i64) -> Self {
        Self {
            debounce,
            baseline: origin,
            last_accepted_at: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Last accepted raw position.
    pub fn baseline(&self) -> i64 {
        self.baseline
    }

    pub fn observe(&mut self, raw: i64, now: Instant) -> Option<Rotation> {
        let delta = raw.saturating_sub(self.baseline);
        if delta == 0 {
            return None;
        }
        if let Some(at) = self.last_accepted_at
            && now.saturating_duration_since(at) <= self.debounce
        {
            tracing::trace!(raw, baseline = self.baseline, "encoder change held by debounce");
            return None;
        }
        self.baseline = raw;
        self.last_accepted_at = Some(now);
        Some(if delta > 0 {
            Rotation::Clockwise
        } else {
            Rotation::CounterClockwise
        })
    }
}

/// Polls a `QuadratureCounter` and emits debounced notches.
pub struct DebouncedQuadratureSource<Q: QuadratureCounter> {
    counter: Q,
    debouncer: QuadratureDebouncer,
}

impl<Q: QuadratureCounter> core::fmt::Debug for DebouncedQuadratureSource<Q> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DebouncedQuadratureSource")
            .field("debouncer", &self.debouncer)
            .finish()
    }
}

impl<Q: QuadratureCounter> DebouncedQuadratureSource<Q> {
    /// Anchor on the counter's current position.
    pub fn new(mut counter: Q, debounce: Duration) -> Self {
        let origin = counter.position();
        Self {
            counter,
            debouncer: QuadratureDebouncer::new(debounce, origin),
        }
    }

    pub fn poll(&mut self, now: Instant) -> Option<Rotation> {
        let raw = self.counter.position();
        let notch = self.debouncer.observe(raw, now);
        if let Some(rot) = notch {
            tracing::debug!(raw, ?rot, "encoder notch");
        }
        notch
    }

    pub fn debouncer(&self) -> &QuadratureDebouncer {
        &self.debouncer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(base: Instant, n: u64) -> Instant {
        base + Duration::from_millis(n)
    }

    #[test]
    fn first_change_is_accepted_immediately() {
        let t0 = Instant::now();
        let mut d = QuadratureDebouncer::new(Duration::from_millis(5), 10);
        assert_eq!(d.observe(10, t0), None);
        assert_eq!(d.observe(11, t0), Some(Rotation::Clockwise));
        assert_eq!(d.baseline(), 11);
    }

    #[test]
    fn rejected_change_is_delayed_not_dropped() {
        let t0 = Instant::now();
        let mut d = QuadratureDebouncer::new(Duration::from_millis(5), 0);
        assert_eq!(d.observe(-1, t0), Some(Rotation::CounterClockwise));
        assert_eq!(d.observe(-2, ms(t0, 3)), None);
        assert_eq!(d.baseline(), -1);
        // Exactly at the threshold is still inside the window
        assert_eq!(d.observe(-2, ms(t0, 5)), None);
        assert_eq!(d.observe(-2, ms(t0, 6)), Some(Rotation::CounterClockwise));
    }

    #[test]
    fn bounce_back_to_baseline_emits_nothing() {
        let t0 = Instant::now();
        let mut d = QuadratureDebouncer::new(Duration::from_millis(5), 0);
        assert!(d.observe(1, t0).is_some());
        assert_eq!(d.observe(2, ms(t0, 1)), None);
        assert_eq!(d.observe(1, ms(t0, 2)), None);
        assert_eq!(d.observe(1, ms(t0, 20)), None);
    }

    #[test]
    fn sign_matches_direction() {
        assert_eq!(Rotation::Clockwise.sign(), 1);
        assert_eq!(Rotation::CounterClockwise.sign(), -1);
    }
}
