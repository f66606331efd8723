//! rust_mlpg — maximum-likelihood parameter generation with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! MLPG trajectory generation to Python via the `_rust_mlpg` extension module.
//! MLPG turns the per-frame Gaussian predictions of a statistical parametric
//! speech synthesizer (means and variances of static, delta and delta-delta
//! features) into smooth static parameter trajectories.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`generation` and
//!   `numerical_stability`) as the public crate surface.
//! - Define the `MLPG` `#[pyclass]` wrapper and the `#[pymodule]` initializer
//!   for the `_rust_mlpg` Python extension when `python-bindings` is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input conversion, and error mapping.
//! - The Python-visible `MLPG` class mirrors the call shape
//!   `MLPG(delta_win, acc_win).generation(features, covariance, D)` and the
//!   invariants of [`TrajectoryGenerator`](generation::TrajectoryGenerator).
//!
//! Conventions
//! -----------
//! - Feature arrays are `(frames × 3·D)` float64, stream-major.
//! - Errors from core Rust code are propagated as [`MLPGError`] internally and
//!   converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`generation`] directly and can ignore
//!   the PyO3 items guarded by the `python-bindings` feature.
//! - Vocoder front-ends call `MLPG.generation` once per utterance and stream.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the integration tests under `tests/`.
//!
//! [`MLPGError`]: generation::errors::MLPGError

pub mod generation;
pub mod numerical_stability;

#[cfg(feature = "python-bindings")]
mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    generation::{TracingObserver, TrajectoryGenerator},
    utils::{build_options, extract_f64_matrix},
};

/// MLPG — Python-facing wrapper around [`TrajectoryGenerator`].
///
/// Purpose
/// -------
/// Keep a configured generator alive across calls so vocoder front-ends can
/// build it once per voice and call `generation` per utterance.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `MLPG(delta_win=None, acc_win=None, variance_floor=None, boundary_variance=None)`:
/// - `delta_win`: `Option<Vec<f64>>`
///   Odd-length centered delta window; defaults to `[-0.5, 0.0, 0.5]`.
/// - `acc_win`: `Option<Vec<f64>>`
///   Odd-length centered accel window; defaults to `[1.0, -2.0, 1.0]`.
/// - `variance_floor`: `Option<f64>`
///   Positive floor for non-positive variances; defaults to `1e-12`.
/// - `boundary_variance`: `Option<f64>`
///   Edge variance forced onto dynamic windows; defaults to `1e11`.
///
/// Notes
/// -----
/// - The GIL is released while the trajectory is computed.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_mlpg", name = "MLPG", frozen)]
pub struct PyMLPG {
    inner: TrajectoryGenerator,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyMLPG {
    #[new]
    #[pyo3(
        text_signature = "(delta_win=None, acc_win=None, variance_floor=None, boundary_variance=None)",
        signature = (delta_win = None, acc_win = None, variance_floor = None, boundary_variance = None)
    )]
    pub fn new(
        delta_win: Option<Vec<f64>>, acc_win: Option<Vec<f64>>, variance_floor: Option<f64>,
        boundary_variance: Option<f64>,
    ) -> PyResult<PyMLPG> {
        let opts = build_options(delta_win, acc_win, variance_floor, boundary_variance)?;
        Ok(PyMLPG { inner: TrajectoryGenerator::new(opts) })
    }

    /// Generate the `(frames, static_dimension)` static trajectory.
    #[pyo3(text_signature = "(self, features, covariance, static_dimension)")]
    pub fn generation<'py>(
        &self, py: Python<'py>, features: &Bound<'py, PyAny>, covariance: &Bound<'py, PyAny>,
        static_dimension: usize,
    ) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let features = extract_f64_matrix(features, "features")?;
        let covariance = extract_f64_matrix(covariance, "covariance")?;
        let generator = &self.inner;
        let traj = py.allow_threads(|| {
            generator.generate_with_observer(
                features.view(),
                covariance.view(),
                static_dimension,
                &TracingObserver,
            )
        })?;
        Ok(traj.into_pyarray(py))
    }

    /// Number of feature streams per static dimension.
    #[getter]
    pub fn num_streams(&self) -> usize {
        self.inner.num_streams()
    }
}

/// _rust_mlpg — PyO3 module initializer for the Python extension.
///
/// Errors
/// ------
/// - `PyErr` if registering the class fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_mlpg<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PyMLPG>()?;
    Ok(())
}
