//! MLPG options — validated configuration passed into every generation call.
//!
//! Purpose
//! -------
//! Bundle the window bank and the numerical knobs of MLPG (variance floor,
//! boundary variance, pivot tolerance, fallback policy) in one explicit,
//! typed structure that is validated once at construction and then only
//! read.
//!
//! Key behaviors
//! -------------
//! - [`MLPGOptions::new`] validates every field and returns
//!   `InvalidConfiguration` on the first violation.
//! - [`MLPGOptions::default`] reproduces the classic generator setup:
//!   static/delta/accel windows, floor `1e-12`, boundary variance `1e11`.
//! - With the `serde` feature the options deserialize through
//!   [`RawMLPGOptions`] and are validated on the way in.
//!
//! Invariants & assumptions
//! ------------------------
//! - A constructed `MLPGOptions` always satisfies:
//!   - `windows` non-empty and each window well formed,
//!   - `variance_floor` finite and `> 0`,
//!   - `boundary_variance` finite and `≥ 1e11`,
//!   - `0 ≤ pivot_tolerance < 1`.
//!
//! Downstream usage
//! ----------------
//! - Build once per process or per voice, hand to
//!   [`TrajectoryGenerator::new`](crate::generation::generator::TrajectoryGenerator::new),
//!   and share the generator by reference across worker threads.
use crate::{
    generation::{
        core::{
            validation::{
                validate_boundary_variance, validate_pivot_tolerance, validate_variance_floor,
            },
            window::WindowBank,
        },
        errors::MLPGResult,
    },
    numerical_stability::{DEFAULT_BOUNDARY_VARIANCE, PIVOT_TOLERANCE, VARIANCE_FLOOR},
};
#[cfg(feature = "serde")]
use crate::generation::errors::MLPGError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// MLPGOptions — configuration for trajectory generation.
///
/// Fields
/// ------
/// - `windows`: [`WindowBank`]
///   Static window first, then dynamic windows. Determines `K`, the number
///   of streams per dimension in the packed inputs.
/// - `variance_floor`: `f64`
///   Replacement for variances `≤ 0`.
/// - `boundary_variance`: `f64`
///   Variance forced onto every dynamic window at the first and last frame.
///   Historical pipelines used either `1e11` or `1e12`; the magnitude only
///   controls how strongly edge dynamics are suppressed.
/// - `pivot_tolerance`: `f64`
///   Relative pivot threshold of the banded Cholesky.
/// - `allow_pseudo_inverse`: `bool`
///   Whether a failed factorization falls back to a pseudo-inverse solve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMLPGOptions"))]
pub struct MLPGOptions {
    windows: WindowBank,
    variance_floor: f64,
    boundary_variance: f64,
    pivot_tolerance: f64,
    allow_pseudo_inverse: bool,
}

impl MLPGOptions {
    /// Construct validated options.
    ///
    /// Errors
    /// ------
    /// - `MLPGError::InvalidConfiguration` naming the first invalid field.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_mlpg::generation::core::{options::MLPGOptions, window::WindowBank};
    /// let opts = MLPGOptions::new(WindowBank::default(), 1e-12, 1e12, 1e-13, true).unwrap();
    /// assert_eq!(opts.boundary_variance(), 1e12);
    ///
    /// assert!(MLPGOptions::new(WindowBank::default(), 0.0, 1e11, 1e-13, true).is_err());
    /// ```
    pub fn new(
        windows: WindowBank, variance_floor: f64, boundary_variance: f64, pivot_tolerance: f64,
        allow_pseudo_inverse: bool,
    ) -> MLPGResult<Self> {
        windows.validate()?;
        validate_variance_floor(variance_floor)?;
        validate_boundary_variance(boundary_variance)?;
        validate_pivot_tolerance(pivot_tolerance)?;
        Ok(MLPGOptions {
            windows,
            variance_floor,
            boundary_variance,
            pivot_tolerance,
            allow_pseudo_inverse,
        })
    }

    /// Default numerics with custom centered delta/accel windows.
    pub fn with_windows(delta: Vec<f64>, accel: Vec<f64>) -> MLPGResult<Self> {
        Ok(MLPGOptions { windows: WindowBank::with_dynamics(delta, accel)?, ..Self::default() })
    }

    /// Replace the variance floor, re-validating it.
    pub fn with_variance_floor(mut self, value: f64) -> MLPGResult<Self> {
        validate_variance_floor(value)?;
        self.variance_floor = value;
        Ok(self)
    }

    /// Replace the boundary variance, re-validating it.
    pub fn with_boundary_variance(mut self, value: f64) -> MLPGResult<Self> {
        validate_boundary_variance(value)?;
        self.boundary_variance = value;
        Ok(self)
    }

    /// Enable or disable the pseudo-inverse fallback.
    pub fn with_pseudo_inverse(mut self, allow: bool) -> Self {
        self.allow_pseudo_inverse = allow;
        self
    }

    pub fn windows(&self) -> &WindowBank {
        &self.windows
    }

    pub fn variance_floor(&self) -> f64 {
        self.variance_floor
    }

    pub fn boundary_variance(&self) -> f64 {
        self.boundary_variance
    }

    pub fn pivot_tolerance(&self) -> f64 {
        self.pivot_tolerance
    }

    pub fn allow_pseudo_inverse(&self) -> bool {
        self.allow_pseudo_inverse
    }
}

impl Default for MLPGOptions {
    fn default() -> Self {
        MLPGOptions {
            windows: WindowBank::default(),
            variance_floor: VARIANCE_FLOOR,
            boundary_variance: DEFAULT_BOUNDARY_VARIANCE,
            pivot_tolerance: PIVOT_TOLERANCE,
            allow_pseudo_inverse: true,
        }
    }
}

/// Unvalidated mirror of [`MLPGOptions`] used for deserialization.
///
/// Missing numeric fields take their defaults.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawMLPGOptions {
    pub windows: WindowBank,
    pub variance_floor: f64,
    pub boundary_variance: f64,
    pub pivot_tolerance: f64,
    pub allow_pseudo_inverse: bool,
}

#[cfg(feature = "serde")]
impl Default for RawMLPGOptions {
    fn default() -> Self {
        let d = MLPGOptions::default();
        RawMLPGOptions {
            windows: d.windows,
            variance_floor: d.variance_floor,
            boundary_variance: d.boundary_variance,
            pivot_tolerance: d.pivot_tolerance,
            allow_pseudo_inverse: d.allow_pseudo_inverse,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<RawMLPGOptions> for MLPGOptions {
    type Error = MLPGError;

    fn try_from(raw: RawMLPGOptions) -> Result<Self, Self::Error> {
        MLPGOptions::new(
            raw.windows,
            raw.variance_floor,
            raw.boundary_variance,
            raw.pivot_tolerance,
            raw.allow_pseudo_inverse,
        )
    }
}
