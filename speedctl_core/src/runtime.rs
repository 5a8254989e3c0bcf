//! Cumulative ON-time bookkeeping.

use std::time::{Duration, Instant};

/// Integrates wall-clock time spent running.
///
/// The anchor is cleared on every stopped tick, so a restart re-anchors at
/// the first running tick instead of crediting the stopped interval.
#[derive(Debug, Clone, Default)]
pub struct RuntimeAccumulator {
    total: Duration,
    anchor: Option<Instant>,
}

impl RuntimeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now: Instant, running: bool) {
        if !running {
            self.anchor = None;
            return;
        }
        if let Some(prev) = self.anchor {
            self.total = self.total.saturating_add(now.saturating_duration_since(prev));
        }
        self.anchor = Some(now);
    }

    pub fn total(&self) -> Duration {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_running_tick_only_anchors() {
        let t0 = Instant::now();
        let mut acc = RuntimeAccumulator::new();
        acc.tick(t0 + Duration::from_secs(10), true);
        assert_eq!(acc.total(), Duration::ZERO);
        acc.tick(t0 + Duration::from_secs(11), true);
        assert_eq!(acc.total(), Duration::from_secs(1));
    }

    #[test]
    fn stopped_interval_is_not_credited() {
        let t0 = Instant::now();
        let s = |n| t0 + Duration::from_secs(n);
        let mut acc = RuntimeAccumulator::new();
        acc.tick(s(0), true);
        acc.tick(s(3), true);
        acc.tick(s(3), false);
        acc.tick(s(50), false);
        acc.tick(s(60), true);
        acc.tick(s(62), true);
        assert_eq!(acc.total(), Duration::from_secs(5));
    }
}
