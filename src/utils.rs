//! Python conversion helpers for the `_rust_mlpg` bindings.
use ndarray::Array2;
use numpy::PyReadonlyArray2;
use pyo3::{exceptions::PyTypeError, prelude::*, types::PyAny};

use crate::generation::{
    core::{
        options::MLPGOptions,
        window::{DEFAULT_ACCEL_WINDOW, DEFAULT_DELTA_WINDOW},
    },
    errors::MLPGResult,
};

/// Copy a 2-D float64 array-like into an owned `Array2`.
///
/// Accepts numpy arrays of any memory layout and nested Python sequences.
/// The copy lets the solve run without holding the GIL.
pub fn extract_f64_matrix(raw: &Bound<'_, PyAny>, name: &str) -> PyResult<Array2<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr.as_array().to_owned());
    }

    let rows: Vec<Vec<f64>> = raw.extract().map_err(|_| {
        PyTypeError::new_err(format!("{name} must be a 2-D numpy.ndarray or nested sequence of float64"))
    })?;
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(PyTypeError::new_err(format!("{name} rows must all have the same length")));
    }
    let nrows = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| PyTypeError::new_err(format!("{name}: {e}")))
}

/// Build validated options from the optional Python constructor arguments.
pub fn build_options(
    delta_win: Option<Vec<f64>>, acc_win: Option<Vec<f64>>, variance_floor: Option<f64>,
    boundary_variance: Option<f64>,
) -> MLPGResult<MLPGOptions> {
    let delta = delta_win.unwrap_or_else(|| DEFAULT_DELTA_WINDOW.to_vec());
    let accel = acc_win.unwrap_or_else(|| DEFAULT_ACCEL_WINDOW.to_vec());
    let mut opts = MLPGOptions::with_windows(delta, accel)?;
    if let Some(floor) = variance_floor {
        opts = opts.with_variance_floor(floor)?;
    }
    if let Some(boundary) = boundary_variance {
        opts = opts.with_boundary_variance(boundary)?;
    }
    Ok(opts)
}
