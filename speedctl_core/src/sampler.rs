//! Background quadrature sampling.
//!
//! Spawns a thread that owns the encoder's `QuadraturePins`, decodes A/B
//! transitions and publishes the latched position through an atomic. That
//! position is the only value shared between the sampling thread and the
//! control loop; everything else stays on the loop thread.
//!
//! Each `QuadratureSampler` spawns exactly one thread that is shut down and
//! joined when the sampler is dropped.
use speedctl_traits::clock::Clock;
use speedctl_traits::{QuadratureCounter, QuadraturePins};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use crate::hw_error::map_hw_error;
use crate::quadrature::{LatchMode, QuadratureDecoder};

pub struct QuadratureSampler {
    position: Arc<AtomicI64>,
    read_errors: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl core::fmt::Debug for QuadratureSampler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadratureSampler")
            .field("position", &self.position.load(Ordering::Relaxed))
            .field("read_errors", &self.read_errors.load(Ordering::Relaxed))
            .finish()
    }
}

impl QuadratureSampler {
    pub fn spawn<P, C>(mut pins: P, mode: LatchMode, interval: Duration, clock: C) -> Self
    where
        P: QuadraturePins + Send + 'static,
        C: Clock + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let position = Arc::new(AtomicI64::new(0));
        let position_clone = position.clone();
        let read_errors = Arc::new(AtomicU64::new(0));
        let read_errors_clone = read_errors.clone();

        // Baseline levels are taken before returning so no transition is lost
        let mut decoder = match pins.read_phases() {
            Ok((a, b)) => QuadratureDecoder::with_levels(mode, a, b),
            Err(_) => QuadratureDecoder::new(mode),
        };

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("quadrature sampler received shutdown signal");
                    break;
                }

                match pins.read_phases() {
                    Ok((a, b)) => {
                        let pos = decoder.update(a, b);
                        position_clone.store(pos, Ordering::Release);
                    }
                    Err(e) => {
                        // Log the first failure only; the count is exposed for health checks
                        if read_errors_clone.fetch_add(1, Ordering::Relaxed) == 0 {
                            let err = map_hw_error(&*e);
                            tracing::warn!(error = %err, "quadrature read failed");
                        }
                    }
                }

                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                clock.sleep(interval);
            }
            tracing::trace!("quadrature sampler exiting cleanly");
        });

        Self {
            position,
            read_errors,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Latched position in detents.
    pub fn latest(&self) -> i64 {
        self.position.load(Ordering::Acquire)
    }

    /// Number of failed A/B reads since spawn.
    pub fn read_errors(&self) -> u64 {
        self.read_errors.load(Ordering::Relaxed)
    }
}

impl QuadratureCounter for QuadratureSampler {
    fn position(&mut self) -> i64 {
        self.latest()
    }
}

impl Drop for QuadratureSampler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("quadrature sampler joined");
                }
                Err(e) => {
                    tracing::warn!(?e, "quadrature sampler panicked during shutdown");
                }
            }
        }
    }
}
