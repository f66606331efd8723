//! numerical_stability — shared tolerances and scalar guards.
//!
//! Purpose
//! -------
//! Keep every numerical constant of the MLPG stack (variance floor, boundary
//! variance, pivot and eigenvalue cutoffs) in one place so the options layer,
//! the system builder and the solver agree on them.
//!
//! Conventions
//! -----------
//! - Tolerances are relative where the quantity they guard scales with the
//!   data (pivots, eigenvalues) and absolute otherwise (variance floor).
//! - Nothing here allocates, logs, or panics.

pub mod tolerances;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::tolerances::{
    DEFAULT_BOUNDARY_VARIANCE, EIGEN_EPS, MIN_BOUNDARY_VARIANCE, PIVOT_TOLERANCE, VARIANCE_FLOOR,
    floor_variance, precision_pair,
};
