//! Errors for MLPG trajectory generation (shape checks, configuration
//! validation, and numerical failures in the banded solve).
//!
//! This module defines the single error type [`MLPGError`] used across the
//! window bank, system builder, solver, and generator, together with the
//! result alias [`MLPGResult`]. With the `python-bindings` feature enabled the
//! error converts to a Python `ValueError` at the PyO3 boundary.
//!
//! ## Conventions
//! - **Indices are 0-based** (frames and feature dimensions alike).
//! - Shapes are reported as `[rows, cols]` for matrices and `[len]` for
//!   vectors.
//! - Shape and configuration errors are raised before any arithmetic.
//! - [`MLPGError::NumericalSingularity`] is produced by the primary
//!   factorization and is normally absorbed by the pseudo-inverse fallback; it
//!   only reaches callers who disable that fallback or call the factorization
//!   directly.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use thiserror::Error;

/// Crate-wide result alias for MLPG operations that may produce [`MLPGError`].
pub type MLPGResult<T> = Result<T, MLPGError>;

/// Unified error type for MLPG.
///
/// Covers input shape validation, window/options configuration, and the two
/// numerical failure tiers of the solver (recoverable singularity and
/// unrecoverable solve).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MLPGError {
    // ---- Input validation ----
    /// Two arrays disagree in shape, or a packed array does not have
    /// `windows · static_dimension` columns.
    #[error("shape mismatch for {what}: expected {expected:?}, found {found:?}")]
    ShapeMismatch { what: &'static str, expected: Vec<usize>, found: Vec<usize> },

    // ---- Configuration ----
    /// A window or option value violates its documented constraint.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    // ---- Numerical ----
    /// The banded Cholesky factorization hit a non-positive or non-finite
    /// pivot at frame `index`.
    #[error("precision matrix is not safely factorable: pivot {pivot} at frame {index}")]
    NumericalSingularity { index: usize, pivot: f64 },

    /// Both the primary and the fallback solve failed.
    #[error("unrecoverable solve{}: {reason}", location(.dimension, .frame))]
    UnrecoverableSolve { dimension: Option<usize>, frame: Option<usize>, reason: String },
}

impl MLPGError {
    /// Build an [`MLPGError::InvalidConfiguration`].
    #[must_use]
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        MLPGError::InvalidConfiguration { field, reason: reason.into() }
    }

    /// Build an [`MLPGError::ShapeMismatch`].
    #[must_use]
    pub fn shape_mismatch(what: &'static str, expected: &[usize], found: &[usize]) -> Self {
        MLPGError::ShapeMismatch { what, expected: expected.to_vec(), found: found.to_vec() }
    }

    /// Build an [`MLPGError::UnrecoverableSolve`] not yet tied to a dimension.
    #[must_use]
    pub fn unrecoverable(frame: Option<usize>, reason: impl Into<String>) -> Self {
        MLPGError::UnrecoverableSolve { dimension: None, frame, reason: reason.into() }
    }

    /// Attach the feature dimension to an unrecoverable solve error. Other
    /// variants are returned unchanged.
    #[must_use]
    pub fn for_dimension(self, dimension: usize) -> Self {
        match self {
            MLPGError::UnrecoverableSolve { frame, reason, .. } => {
                MLPGError::UnrecoverableSolve { dimension: Some(dimension), frame, reason }
            }
            other => other,
        }
    }

    /// `true` for errors that are raised before any numerical work.
    pub fn is_input_error(&self) -> bool {
        matches!(self, MLPGError::ShapeMismatch { .. } | MLPGError::InvalidConfiguration { .. })
    }
}

fn location(dimension: &Option<usize>, frame: &Option<usize>) -> String {
    match (dimension, frame) {
        (Some(d), Some(t)) => format!(" in dimension {d} at frame {t}"),
        (Some(d), None) => format!(" in dimension {d}"),
        (None, Some(t)) => format!(" at frame {t}"),
        (None, None) => String::new(),
    }
}

/// Convert an [`MLPGError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl From<MLPGError> for PyErr {
    fn from(err: MLPGError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` messages embedding their payloads.
    // - Dimension attachment on unrecoverable solves.
    //
    // They intentionally DO NOT cover:
    // - Where each variant is raised; see the validation and solver modules.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure shape mismatches print both shapes and the offending input.
    fn shape_mismatch_display_contains_both_shapes() {
        let err = MLPGError::shape_mismatch("covariance", &[5, 3], &[5, 6]);
        let msg = err.to_string();

        assert!(msg.contains("covariance"));
        assert!(msg.contains("[5, 3]"));
        assert!(msg.contains("[5, 6]"));
        assert!(err.is_input_error());
    }

    #[test]
    // Purpose
    // -------
    // Verify that `for_dimension` tags unrecoverable solves and that the
    // message names both the dimension and the frame.
    //
    // Given
    // -----
    // - An unrecoverable error at frame 7 with no dimension.
    //
    // Expect
    // ------
    // - After `for_dimension(2)`, `dimension == Some(2)` and the message
    //   mentions "dimension 2" and "frame 7".
    fn for_dimension_tags_unrecoverable_solve() {
        // Arrange
        let err = MLPGError::unrecoverable(Some(7), "non-finite precision");

        // Act
        let tagged = err.for_dimension(2);

        // Assert
        match &tagged {
            MLPGError::UnrecoverableSolve { dimension, frame, .. } => {
                assert_eq!(*dimension, Some(2));
                assert_eq!(*frame, Some(7));
            }
            other => panic!("expected UnrecoverableSolve, got {other:?}"),
        }
        let msg = tagged.to_string();
        assert!(msg.contains("dimension 2"));
        assert!(msg.contains("frame 7"));
        assert!(!tagged.is_input_error());
    }

    #[test]
    fn for_dimension_leaves_other_variants_untouched() {
        let err = MLPGError::NumericalSingularity { index: 3, pivot: -1.0 };
        assert_eq!(err.clone().for_dimension(4), err);
    }
}
