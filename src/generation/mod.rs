//! generation — MLPG trajectory generation: core numerics, generator, errors.
//!
//! Purpose
//! -------
//! Provide the maximum-likelihood parameter generation layer: given per-frame
//! Gaussian means and diagonal variances of static, delta and delta-delta
//! features, produce the static trajectory that best explains all of them at
//! once. This is the surface most consumers (including the Python bindings)
//! should depend on.
//!
//! Key behaviors
//! -------------
//! - Collect window operators, band storage, system assembly and the banded
//!   solver in [`core`].
//! - Expose [`TrajectoryGenerator`] in [`generator`], with a strict
//!   entry point (`generate`) and a per-dimension report
//!   (`generate_report`).
//! - Centralize errors in [`errors`] and logging hooks in [`observer`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Packed inputs are `(frames × K·D)` in stream-major order: columns
//!   `0..D` static, `D..2D` delta, `2D..3D` accel for the default bank.
//! - Dimensions are numerically independent; a failure in one never alters
//!   another.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based for frames and dimensions.
//! - The numerical core performs no I/O and no logging. Events are reported
//!   to a [`GenerationObserver`] passed into each call.
//!
//! Downstream usage
//! ----------------
//! - Typical flow:
//!   1. Build [`MLPGOptions`] (or use the default static/delta/accel bank).
//!   2. Construct a [`TrajectoryGenerator`] once and share it.
//!   3. Call `generate(features, covariance, D)` per utterance, or
//!      `generate_report` to inspect fallbacks and failures.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; cross-module scenarios live in
//!   `tests/`.

pub mod core;
pub mod errors;
pub mod generator;
pub mod observer;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{MLPGOptions, Window, WindowBank};
pub use self::errors::{MLPGError, MLPGResult};
pub use self::generator::{DimensionStatus, GenerationReport, TrajectoryGenerator};
pub use self::observer::{GenerationObserver, NullObserver, TracingObserver};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mlpg::generation::prelude::*;
//
// to import the main generation surface in a single line.

pub mod prelude {
    pub use super::{
        DimensionStatus, GenerationObserver, GenerationReport, MLPGError, MLPGOptions,
        MLPGResult, NullObserver, TracingObserver, TrajectoryGenerator, Window, WindowBank,
    };
}
