//! Generation observers — explicit logging context for MLPG runs.
//!
//! Purpose
//! -------
//! Let callers see per-dimension progress and numerical events (fallback
//! solves, unrecoverable dimensions) without the numerical core touching
//! global state. The generator calls the observer it is handed; the default
//! entry points hand it a [`TracingObserver`].
//!
//! Key behaviors
//! -------------
//! - [`GenerationObserver`] has no-op default methods, so implementors only
//!   override the events they care about.
//! - [`TracingObserver`] forwards events to `tracing` with structured fields
//!   `dimension`, `frames` and `pivot_index`.
//! - [`NullObserver`] discards everything.
//!
//! Conventions
//! -----------
//! - Observers must be `Sync`; a single observer may be shared by worker
//!   threads solving different dimensions.
use crate::generation::errors::MLPGError;
use tracing::{debug, error, warn};

/// Hooks invoked by the generator for each dimension.
pub trait GenerationObserver: Sync {
    /// A dimension is about to be assembled and solved.
    fn on_start(&self, _dimension: usize, _frames: usize) {}

    /// The banded factorization failed and the pseudo-inverse was used.
    fn on_fallback(&self, _dimension: usize, _frames: usize, _cause: &MLPGError) {}

    /// The dimension could not be solved at all.
    fn on_failure(&self, _dimension: usize, _frames: usize, _error: &MLPGError) {}

    /// The dimension finished and its column was written.
    fn on_finish(&self, _dimension: usize, _frames: usize) {}
}

/// Observer that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl GenerationObserver for TracingObserver {
    fn on_start(&self, dimension: usize, frames: usize) {
        debug!(dimension, frames, "solving MLPG dimension");
    }

    fn on_fallback(&self, dimension: usize, frames: usize, cause: &MLPGError) {
        let pivot_index = match cause {
            MLPGError::NumericalSingularity { index, .. } => Some(*index),
            _ => None,
        };
        warn!(dimension, frames, pivot_index, cause = %cause, "banded Cholesky failed, using pseudo-inverse");
    }

    fn on_failure(&self, dimension: usize, frames: usize, error: &MLPGError) {
        error!(dimension, frames, error = %error, "MLPG dimension unrecoverable");
    }

    fn on_finish(&self, dimension: usize, frames: usize) {
        debug!(dimension, frames, "MLPG dimension solved");
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl GenerationObserver for NullObserver {}
