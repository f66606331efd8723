//! generation::core — numerical building blocks of MLPG.
//!
//! Purpose
//! -------
//! Collect the pieces the trajectory generator composes: window operators,
//! band storage, per-dimension statistics, system assembly, the banded
//! solver, options, and input validation.
//!
//! Key behaviors
//! -------------
//! - [`window`] defines [`Window`] / [`WindowBank`] and builds the banded
//!   finite-difference operators.
//! - [`band`] stores operators ([`BandMatrix`]) and the symmetric precision
//!   matrix ([`SymBandMatrix`]) in `O(n · width)` space.
//! - [`statistics`] slices one dimension's streams out of the packed inputs.
//! - [`system`] assembles `P · c = b`; [`solver`] solves it.
//! - [`options`] and [`validation`] hold the configuration surface and the
//!   fail-fast guards.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every cost here is linear in the number of frames for a fixed window
//!   bank, except the pseudo-inverse fallback which densifies `P`.
//! - No type in this module holds interior mutability; everything can be
//!   shared across threads once built.
//!
//! Testing notes
//! -------------
//! - Each submodule carries its own unit tests. End-to-end behavior is
//!   covered in `generation::generator` and the integration tests.

pub mod band;
pub mod options;
pub mod solver;
pub mod statistics;
pub mod system;
pub mod validation;
pub mod window;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::band::{BandMatrix, SymBandMatrix};
pub use self::options::MLPGOptions;
pub use self::solver::{BandedCholesky, SolveMethod, SolveOutcome, solve, solve_pseudo_inverse};
pub use self::statistics::{FrameStatistics, VarianceSource};
pub use self::system::{PrecisionSystem, build_system, effective_variances};
pub use self::validation::{
    validate_boundary_variance, validate_packed_inputs, validate_pivot_tolerance,
    validate_static_dimension, validate_variance_floor, validate_window,
};
pub use self::window::{DEFAULT_ACCEL_WINDOW, DEFAULT_DELTA_WINDOW, Window, WindowBank};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_mlpg::generation::core::prelude::*;
//
// to import the main MLPG core surface in a single line.

pub mod prelude {
    pub use super::band::{BandMatrix, SymBandMatrix};
    pub use super::options::MLPGOptions;
    pub use super::solver::{SolveMethod, SolveOutcome};
    pub use super::statistics::{FrameStatistics, VarianceSource};
    pub use super::system::PrecisionSystem;
    pub use super::window::{Window, WindowBank};
}
