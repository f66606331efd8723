//! generation::core::validation — fail-fast input and configuration guards.
//!
//! Purpose
//! -------
//! Centralize every check that must pass before numerical work starts:
//! window shape, option ranges, `static_dimension`, and the packed
//! mean/variance layout. Callers treat `Ok(())` as a guarantee that indexing
//! in the builder and generator stays in bounds.
//!
//! Conventions
//! -----------
//! - Shape problems map to [`MLPGError::ShapeMismatch`]; value-range problems
//!   to [`MLPGError::InvalidConfiguration`].
//! - No I/O, no allocation beyond error construction.
use crate::{
    generation::errors::{MLPGError, MLPGResult},
    numerical_stability::MIN_BOUNDARY_VARIANCE,
};
use ndarray::{ArrayView1, ArrayView2};

/// Validate a window triple.
///
/// Errors
/// ------
/// - `InvalidConfiguration { field: "window", .. }` when
///   `coeffs.len() != l + u + 1` or a coefficient is non-finite.
pub fn validate_window(l: usize, u: usize, coeffs: &[f64]) -> MLPGResult<()> {
    if coeffs.len() != l + u + 1 {
        return Err(MLPGError::invalid_config(
            "window",
            format!(
                "half-widths ({l}, {u}) need {} coefficients, got {}",
                l + u + 1,
                coeffs.len()
            ),
        ));
    }
    if let Some((k, c)) = coeffs.iter().enumerate().find(|(_, c)| !c.is_finite()) {
        return Err(MLPGError::invalid_config(
            "window",
            format!("coefficient {k} is non-finite: {c}"),
        ));
    }
    Ok(())
}

/// `static_dimension` must be at least 1.
pub fn validate_static_dimension(static_dimension: usize) -> MLPGResult<()> {
    if static_dimension == 0 {
        return Err(MLPGError::invalid_config("static_dimension", "must be > 0"));
    }
    Ok(())
}

/// Variance floor must be finite and strictly positive.
pub fn validate_variance_floor(value: f64) -> MLPGResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MLPGError::invalid_config(
            "variance_floor",
            format!("must be finite and > 0; got {value}"),
        ));
    }
    Ok(())
}

/// Boundary variance must be finite and at least [`MIN_BOUNDARY_VARIANCE`].
pub fn validate_boundary_variance(value: f64) -> MLPGResult<()> {
    if !value.is_finite() || value < MIN_BOUNDARY_VARIANCE {
        return Err(MLPGError::invalid_config(
            "boundary_variance",
            format!("must be finite and >= {MIN_BOUNDARY_VARIANCE:e}; got {value}"),
        ));
    }
    Ok(())
}

/// Relative pivot tolerance must lie in `[0, 1)`.
pub fn validate_pivot_tolerance(value: f64) -> MLPGResult<()> {
    if !value.is_finite() || !(0.0..1.0).contains(&value) {
        return Err(MLPGError::invalid_config(
            "pivot_tolerance",
            format!("must be finite with 0 <= tol < 1; got {value}"),
        ));
    }
    Ok(())
}

/// Validate the packed `(frames × K·D)` mean array and its variance source.
///
/// Parameters
/// ----------
/// - `features`: packed means, stream-major (`K` blocks of `D` columns).
/// - `covariance`: `Some` full variance array that must match `features`
///   exactly, or `None` when a per-column variance row is used instead.
/// - `variance_row`: `Some` row of length `K·D` broadcast across frames.
/// - `static_dimension`: `D`.
/// - `num_windows`: `K`.
///
/// Errors
/// ------
/// - `InvalidConfiguration` when `static_dimension == 0`.
/// - `ShapeMismatch` when `features` does not have `K·D` columns, when the
///   variance array differs in shape from `features`, or when the variance
///   row has the wrong length.
pub fn validate_packed_inputs(
    features: ArrayView2<'_, f64>, covariance: Option<ArrayView2<'_, f64>>,
    variance_row: Option<ArrayView1<'_, f64>>, static_dimension: usize, num_windows: usize,
) -> MLPGResult<()> {
    validate_static_dimension(static_dimension)?;
    let (frames, cols) = features.dim();
    let expected_cols = num_windows * static_dimension;
    if cols != expected_cols {
        return Err(MLPGError::shape_mismatch("features", &[frames, expected_cols], &[
            frames, cols,
        ]));
    }
    if let Some(cov) = covariance {
        if cov.dim() != features.dim() {
            return Err(MLPGError::shape_mismatch("covariance", &[frames, cols], &[
                cov.nrows(),
                cov.ncols(),
            ]));
        }
    }
    if let Some(row) = variance_row {
        if row.len() != expected_cols {
            return Err(MLPGError::shape_mismatch("variance row", &[expected_cols], &[row.len()]));
        }
    }
    Ok(())
}
