//! Numerical tolerances and guarded scalar helpers for the MLPG stack.
//!
//! # Provided items
//! - [`VARIANCE_FLOOR`]: replacement for non-positive variances (1e-12).
//! - [`DEFAULT_BOUNDARY_VARIANCE`] / [`MIN_BOUNDARY_VARIANCE`]: variance forced
//!   onto dynamic windows at the first and last frame.
//! - [`PIVOT_TOLERANCE`]: relative pivot threshold for the banded Cholesky.
//! - [`EIGEN_EPS`]: relative eigenvalue cutoff for the pseudo-inverse.
//! - [`floor_variance`], [`precision_pair`]: scalar guards used during
//!   system assembly.

/// Floor applied to every variance `≤ 0` before inversion.
///
/// With this floor the largest precision entering the system is `1e12`,
/// which keeps `P` well inside `f64` range even at thousands of frames.
pub const VARIANCE_FLOOR: f64 = 1e-12;

/// Default variance assigned to dynamic windows at the sequence edges.
///
/// A true derivative is undefined at frame 0 and frame `T-1`; a huge variance
/// drives the corresponding precision to ≈ 0 so those truncated windows
/// barely constrain the solution.
pub const DEFAULT_BOUNDARY_VARIANCE: f64 = 1e11;

/// Smallest accepted boundary variance.
pub const MIN_BOUNDARY_VARIANCE: f64 = 1e11;

/// Relative pivot tolerance for the banded Cholesky factorization.
///
/// A pivot `d_j` is accepted only when `d_j > PIVOT_TOLERANCE · P[j, j]`,
/// i.e. when elimination has not cancelled (almost) all of its own diagonal.
pub const PIVOT_TOLERANCE: f64 = 1e-13;

/// Relative eigenvalue cutoff for the Moore–Penrose fallback.
///
/// Eigenvalues `λ ≤ max(EIGEN_EPS, n · ε) · λ_max` are treated as zero, the
/// same scale as the default `rcond` of a dense pseudo-inverse.
pub const EIGEN_EPS: f64 = 1e-15;

/// Replace a non-positive variance by `floor`.
///
/// NaN and +∞ pass through unchanged: NaN must surface downstream as an
/// unrecoverable solve, and +∞ is a legitimate "no constraint" marker whose
/// precision is exactly zero.
#[inline]
pub fn floor_variance(variance: f64, floor: f64) -> f64 {
    if variance <= 0.0 { floor } else { variance }
}

/// Natural parameters `(mean · τ, τ)` of a Gaussian with `τ = 1 / variance`.
///
/// An infinite variance yields `τ = 0`, so that stream contributes nothing.
#[inline]
pub fn precision_pair(mean: f64, variance: f64) -> (f64, f64) {
    let tau = 1.0 / variance;
    (mean * tau, tau)
}
