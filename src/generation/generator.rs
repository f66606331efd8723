//! TrajectoryGenerator — MLPG over every static dimension of an utterance.
//!
//! Purpose
//! -------
//! Turn packed per-frame means and variances of static, delta and accel
//! features into the smooth maximum-likelihood static trajectory, one
//! independent banded solve per static dimension.
//!
//! Key behaviors
//! -------------
//! - Validate options once at construction and packed inputs once per call.
//! - Build the window operators once per call and share them read-only
//!   across dimensions.
//! - For each dimension `d`, gather columns `{d, D + d, 2D + d, …}`, assemble
//!   `P · c = b`, solve, and write column `d` of the output.
//! - [`TrajectoryGenerator::generate_report`] never aborts on a single bad
//!   dimension; [`TrajectoryGenerator::generate`] surfaces the first failure.
//!
//! Invariants & assumptions
//! ------------------------
//! - Numerical failure in one dimension leaves every other dimension's
//!   column untouched; failed columns hold `NaN` in the report.
//! - `frames == 0` yields a `(0 × D)` trajectory.
//!
//! Conventions
//! -----------
//! - Inputs are `(frames × K·D)` in stream-major order, `K` being the number
//!   of windows of the bank (3 for the defaults).
//! - The generator is immutable and `Send + Sync`; share it by reference
//!   across worker threads, one utterance (or dimension) per thread.
use crate::generation::{
    core::{
        band::BandMatrix,
        options::MLPGOptions,
        solver::{SolveOutcome, solve},
        statistics::{FrameStatistics, VarianceSource},
        system::build_system,
        validation::validate_packed_inputs,
    },
    errors::{MLPGError, MLPGResult},
    observer::{GenerationObserver, TracingObserver},
};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Outcome of one dimension within a generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionStatus {
    /// Solved by the banded Cholesky factorization.
    Solved,
    /// Solved by the pseudo-inverse after the factorization failed at
    /// `pivot_index`.
    Fallback { pivot_index: Option<usize> },
    /// Could not be solved; the trajectory column is `NaN`.
    Failed(MLPGError),
}

/// GenerationReport — trajectory plus per-dimension provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    trajectory: Array2<f64>,
    statuses: Vec<DimensionStatus>,
}

impl GenerationReport {
    /// `(frames × D)` trajectory; failed columns are `NaN`.
    pub fn trajectory(&self) -> ArrayView2<'_, f64> {
        self.trajectory.view()
    }

    pub fn statuses(&self) -> &[DimensionStatus] {
        &self.statuses
    }

    /// `(dimension, error)` for every failed dimension.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &MLPGError)> + '_ {
        self.statuses.iter().enumerate().filter_map(|(d, s)| match s {
            DimensionStatus::Failed(err) => Some((d, err)),
            _ => None,
        })
    }

    /// Dimensions solved through the pseudo-inverse fallback.
    pub fn fallback_dimensions(&self) -> Vec<usize> {
        self.statuses
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, DimensionStatus::Fallback { .. }))
            .map(|(d, _)| d)
            .collect()
    }

    /// `true` when no dimension failed.
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }

    /// The trajectory, or the first dimension's failure.
    pub fn into_result(self) -> MLPGResult<Array2<f64>> {
        if let Some((_, err)) = self.failures().next() {
            return Err(err.clone());
        }
        Ok(self.trajectory)
    }
}

/// TrajectoryGenerator — configured MLPG entry point.
///
/// Fields
/// ------
/// - `opts`: [`MLPGOptions`]
///   Validated windows and numerical constants shared by every call.
///
/// Examples
/// --------
/// ```rust
/// # use rust_mlpg::generation::{core::options::MLPGOptions, generator::TrajectoryGenerator};
/// # use ndarray::{Array2, array};
/// let generator = TrajectoryGenerator::new(MLPGOptions::default());
/// // One static dimension, three frames: [static, delta, accel] per frame.
/// let features = array![[1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
/// let covariance = Array2::from_elem((3, 3), 0.1);
/// let traj = generator.generate(features.view(), covariance.view(), 1).unwrap();
/// assert_eq!(traj.dim(), (3, 1));
/// assert!((traj[[1, 0]] - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryGenerator {
    opts: MLPGOptions,
}

impl TrajectoryGenerator {
    pub fn new(opts: MLPGOptions) -> Self {
        TrajectoryGenerator { opts }
    }

    pub fn options(&self) -> &MLPGOptions {
        &self.opts
    }

    /// Number of feature streams per static dimension (`K`).
    pub fn num_streams(&self) -> usize {
        self.opts.windows().len()
    }

    /// generate — ML static trajectory for all `D` dimensions.
    ///
    /// Parameters
    /// ----------
    /// - `features`: `(frames × K·D)` means, stream-major.
    /// - `covariance`: `(frames × K·D)` diagonal variances, same layout.
    /// - `static_dimension`: `D`.
    ///
    /// Returns
    /// -------
    /// `MLPGResult<Array2<f64>>` of shape `(frames × D)`.
    ///
    /// Errors
    /// ------
    /// - `ShapeMismatch` / `InvalidConfiguration` before any computation.
    /// - `UnrecoverableSolve { dimension: Some(d), .. }` for the first
    ///   dimension whose solve failed.
    ///
    /// Notes
    /// -----
    /// - Events go to a [`TracingObserver`]; use
    ///   [`TrajectoryGenerator::generate_with_observer`] to pick another.
    pub fn generate(
        &self, features: ArrayView2<'_, f64>, covariance: ArrayView2<'_, f64>,
        static_dimension: usize,
    ) -> MLPGResult<Array2<f64>> {
        self.generate_with_observer(features, covariance, static_dimension, &TracingObserver)
    }

    /// [`generate`](Self::generate) with an explicit observer.
    pub fn generate_with_observer(
        &self, features: ArrayView2<'_, f64>, covariance: ArrayView2<'_, f64>,
        static_dimension: usize, observer: &dyn GenerationObserver,
    ) -> MLPGResult<Array2<f64>> {
        self.generate_report(features, covariance, static_dimension, observer)?.into_result()
    }

    /// Generate every dimension and report each one's outcome.
    ///
    /// Errors
    /// ------
    /// - Only input validation errors; numerical failures are recorded per
    ///   dimension in the report.
    pub fn generate_report(
        &self, features: ArrayView2<'_, f64>, covariance: ArrayView2<'_, f64>,
        static_dimension: usize, observer: &dyn GenerationObserver,
    ) -> MLPGResult<GenerationReport> {
        validate_packed_inputs(
            features,
            Some(covariance),
            None,
            static_dimension,
            self.num_streams(),
        )?;
        Ok(self.run(features, VarianceSource::Full(covariance), static_dimension, observer))
    }

    /// Generate with one variance row broadcast across all frames.
    ///
    /// Parameters
    /// ----------
    /// - `features`: `(frames × K·D)` means.
    /// - `variance_row`: length `K·D`, e.g. a per-stream global variance.
    /// - `static_dimension`: `D`.
    pub fn generate_with_global_variance(
        &self, features: ArrayView2<'_, f64>, variance_row: ArrayView1<'_, f64>,
        static_dimension: usize,
    ) -> MLPGResult<Array2<f64>> {
        validate_packed_inputs(
            features,
            None,
            Some(variance_row),
            static_dimension,
            self.num_streams(),
        )?;
        self.run(features, VarianceSource::GlobalRow(variance_row), static_dimension, &TracingObserver)
            .into_result()
    }

    /// Solve a single dimension `d`.
    ///
    /// Intended for callers that distribute dimensions over their own worker
    /// pool; the returned outcome says whether the fallback was needed.
    ///
    /// Errors
    /// ------
    /// - Input errors as in [`generate`](Self::generate), plus
    ///   `InvalidConfiguration` when `d ≥ static_dimension`.
    /// - `UnrecoverableSolve { dimension: Some(d), .. }`.
    pub fn solve_dimension(
        &self, features: ArrayView2<'_, f64>, covariance: ArrayView2<'_, f64>,
        static_dimension: usize, d: usize,
    ) -> MLPGResult<SolveOutcome> {
        validate_packed_inputs(
            features,
            Some(covariance),
            None,
            static_dimension,
            self.num_streams(),
        )?;
        if d >= static_dimension {
            return Err(MLPGError::invalid_config(
                "dimension",
                format!("index {d} out of range for static_dimension {static_dimension}"),
            ));
        }
        let operators = self.opts.windows().build(features.nrows());
        self.solve_one(features, VarianceSource::Full(covariance), static_dimension, d, &operators)
            .map_err(|e| e.for_dimension(d))
    }

    fn run(
        &self, features: ArrayView2<'_, f64>, variance: VarianceSource<'_>, static_dimension: usize,
        observer: &dyn GenerationObserver,
    ) -> GenerationReport {
        let frames = features.nrows();
        let operators = self.opts.windows().build(frames);
        let mut trajectory = Array2::<f64>::zeros((frames, static_dimension));
        let mut statuses = Vec::with_capacity(static_dimension);

        for d in 0..static_dimension {
            observer.on_start(d, frames);
            let status = match self.solve_one(features, variance, static_dimension, d, &operators)
            {
                Ok(outcome) => {
                    trajectory.column_mut(d).assign(&outcome.solution);
                    match &outcome.singularity {
                        Some(cause) => {
                            observer.on_fallback(d, frames, cause);
                            let pivot_index = match cause {
                                MLPGError::NumericalSingularity { index, .. } => Some(*index),
                                _ => None,
                            };
                            DimensionStatus::Fallback { pivot_index }
                        }
                        None => DimensionStatus::Solved,
                    }
                }
                Err(err) => {
                    let err = err.for_dimension(d);
                    observer.on_failure(d, frames, &err);
                    trajectory.column_mut(d).fill(f64::NAN);
                    DimensionStatus::Failed(err)
                }
            };
            observer.on_finish(d, frames);
            statuses.push(status);
        }

        GenerationReport { trajectory, statuses }
    }

    fn solve_one(
        &self, features: ArrayView2<'_, f64>, variance: VarianceSource<'_>, static_dimension: usize,
        d: usize, operators: &[BandMatrix],
    ) -> MLPGResult<SolveOutcome> {
        let stats =
            FrameStatistics::extract(features, variance, static_dimension, operators.len(), d);
        let system = build_system(&stats, operators, &self.opts)?;
        solve(&system.p, system.b.view(), &self.opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{core::window::WindowBank, observer::NullObserver};
    use approx::assert_relative_eq;
    use ndarray::{Array1, Axis, array, concatenate};
    use std::sync::Mutex;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The reference scenarios: smoothing of a triangle, exact line
    //   recovery, reconstruction from consistent dynamics.
    // - Degenerate variances (zero static / infinite dynamic) and the
    //   single-frame and empty-input edge cases.
    // - Per-dimension isolation of numerical failures and observer events.
    // - The global-variance entry point and `solve_dimension`.
    //
    // They intentionally DO NOT cover:
    // - Band storage or factorization internals; see `core`.
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl GenerationObserver for RecordingObserver {
        fn on_start(&self, dimension: usize, _frames: usize) {
            self.events.lock().unwrap().push(format!("start {dimension}"));
        }

        fn on_fallback(&self, dimension: usize, _frames: usize, _cause: &MLPGError) {
            self.events.lock().unwrap().push(format!("fallback {dimension}"));
        }

        fn on_failure(&self, dimension: usize, _frames: usize, _error: &MLPGError) {
            self.events.lock().unwrap().push(format!("failure {dimension}"));
        }

        fn on_finish(&self, dimension: usize, _frames: usize) {
            self.events.lock().unwrap().push(format!("finish {dimension}"));
        }
    }

    /// Pack a single static dimension: columns [static, delta, accel].
    fn pack(statics: &Array1<f64>, deltas: &Array1<f64>, accels: &Array1<f64>) -> Array2<f64> {
        concatenate(Axis(1), &[
            statics.view().insert_axis(Axis(1)),
            deltas.view().insert_axis(Axis(1)),
            accels.view().insert_axis(Axis(1)),
        ])
        .unwrap()
    }

    fn max_abs_second_difference(x: ArrayView1<'_, f64>) -> f64 {
        (1..x.len() - 1).map(|t| (x[t - 1] - 2.0 * x[t] + x[t + 1]).abs()).fold(0.0, f64::max)
    }

    #[test]
    // Purpose
    // -------
    // Reproduce the smoothing scenario: a triangle with zero dynamics is
    // pulled towards a smoother curve.
    //
    // Given
    // -----
    // - frames = 5, D = 1, static means [1, 2, 3, 2, 1], zero delta/accel
    //   means, unit variance everywhere.
    //
    // Expect
    // ------
    // - Output differs from the input.
    // - Max |second difference| is smaller than the input's (2).
    fn triangle_with_zero_dynamics_is_smoothed() {
        // Arrange
        let statics = array![1.0, 2.0, 3.0, 2.0, 1.0];
        let features = pack(&statics, &Array1::zeros(5), &Array1::zeros(5));
        let covariance = Array2::ones((5, 3));
        let generator = TrajectoryGenerator::default();

        // Act
        let traj = generator
            .generate_with_observer(features.view(), covariance.view(), 1, &NullObserver)
            .unwrap();

        // Assert
        let out = traj.column(0);
        assert!(out.iter().zip(statics.iter()).any(|(a, b)| (a - b).abs() > 1e-3));
        assert!(max_abs_second_difference(out) < max_abs_second_difference(statics.view()));
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    // Purpose
    // -------
    // A line whose delta/accel means are consistent with it is a fixed
    // point of MLPG.
    //
    // Given
    // -----
    // - x(t) = 2t + 1 over 8 frames, delta means = W_Δ x, accel means = W_A x
    //   (edge-truncated, as the operators compute them).
    //
    // Expect
    // ------
    // - Output reproduces x(t) within 1e-8 relative.
    fn consistent_line_reproduces_itself() {
        // Arrange
        let bank = WindowBank::default();
        let x: Vec<f64> = (0..8).map(|t| 2.0 * t as f64 + 1.0).collect();
        let delta = Array1::from(bank.windows()[1].apply(&x));
        let accel = Array1::from(bank.windows()[2].apply(&x));
        let features = pack(&Array1::from(x.clone()), &delta, &accel);
        let covariance = Array2::from_elem((8, 3), 0.5);

        // Act
        let traj = TrajectoryGenerator::default()
            .generate_with_observer(features.view(), covariance.view(), 1, &NullObserver)
            .unwrap();

        // Assert
        for t in 0..8 {
            assert_relative_eq!(traj[[t, 0]], x[t], max_relative = 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // Exact window-derived dynamics with tight variances reconstruct an
    // arbitrary smooth curve.
    //
    // Given
    // -----
    // - x(t) = sin(0.3 t) + 2 over 40 frames; two dimensions, the second a
    //   scaled copy; variances 1e-4 on every stream.
    //
    // Expect
    // ------
    // - Relative error below 1e-6 in every frame and dimension.
    fn exact_dynamics_reconstruct_trajectory() {
        // Arrange
        let frames = 40;
        let bank = WindowBank::default();
        let x: Vec<f64> = (0..frames).map(|t| (0.3 * t as f64).sin() + 2.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v).collect();
        let mut features = Array2::<f64>::zeros((frames, 6));
        for (d, series) in [&x, &y].iter().enumerate() {
            for (k, w) in bank.windows().iter().enumerate() {
                let stream = w.apply(series);
                for t in 0..frames {
                    features[[t, k * 2 + d]] = stream[t];
                }
            }
        }
        let covariance = Array2::from_elem((frames, 6), 1e-4);

        // Act
        let traj = TrajectoryGenerator::default()
            .generate_with_observer(features.view(), covariance.view(), 2, &NullObserver)
            .unwrap();

        // Assert
        for t in 0..frames {
            assert_relative_eq!(traj[[t, 0]], x[t], max_relative = 1e-6);
            assert_relative_eq!(traj[[t, 1]], y[t], max_relative = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // Zero static variance with infinite dynamic variance pins the output
    // to the static mean, for several lengths including one frame.
    //
    // Expect
    // ------
    // - Output equals the static mean within 1e-9 relative.
    fn zero_static_infinite_dynamic_variance_returns_static_mean() {
        for frames in [1usize, 2, 3, 17] {
            // Arrange
            let statics = Array1::from_shape_fn(frames, |t| (t as f64 * 0.7).cos() * 5.0 + 1.0);
            let features = pack(&statics, &Array1::from_elem(frames, 3.0), &Array1::from_elem(frames, -1.0));
            let mut covariance = Array2::from_elem((frames, 3), f64::INFINITY);
            covariance.column_mut(0).fill(0.0);

            // Act
            let traj = TrajectoryGenerator::default()
                .generate_with_observer(features.view(), covariance.view(), 1, &NullObserver)
                .unwrap();

            // Assert
            for t in 0..frames {
                assert_relative_eq!(traj[[t, 0]], statics[t], max_relative = 1e-9);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Pinned frames (floored variance) next to loosely constrained ones must
    // not be mistaken for a singular system.
    //
    // Given
    // -----
    // - 20 frames, static mean 5 everywhere, static variance 0 for frames
    //   0..10 and 100 for frames 10..20, zero dynamic means with variance 100.
    //
    // Expect
    // ------
    // - Dimension reported as `Solved` without any fallback event.
    // - Every frame, loose ones included, reproduces the constant 5.
    fn mixed_pinned_and_loose_frames_solve_without_fallback() {
        // Arrange
        let frames = 20;
        let features = pack(&Array1::from_elem(frames, 5.0), &Array1::zeros(frames), &Array1::zeros(frames));
        let mut covariance = Array2::from_elem((frames, 3), 100.0);
        covariance.slice_mut(ndarray::s![..10, 0]).fill(0.0);
        let observer = RecordingObserver::default();

        // Act
        let report = TrajectoryGenerator::default()
            .generate_report(features.view(), covariance.view(), 1, &observer)
            .unwrap();

        // Assert
        assert_eq!(report.statuses()[0], DimensionStatus::Solved);
        assert_eq!(observer.events(), vec!["start 0", "finish 0"]);
        for t in 0..frames {
            assert_relative_eq!(report.trajectory()[[t, 0]], 5.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn single_frame_output_matches_static_mean() {
        let features = array![[4.5, -2.0, 0.0, 0.0, 0.0, 0.0]];
        let covariance = array![[0.1, 0.2, 1.0, 1.0, 1.0, 1.0]];

        let traj = TrajectoryGenerator::default()
            .generate_with_observer(features.view(), covariance.view(), 2, &NullObserver)
            .unwrap();

        assert_eq!(traj.dim(), (1, 2));
        assert_relative_eq!(traj[[0, 0]], 4.5, max_relative = 1e-9);
        assert_relative_eq!(traj[[0, 1]], -2.0, max_relative = 1e-9);
    }

    #[test]
    fn empty_input_yields_empty_trajectory() {
        let features = Array2::<f64>::zeros((0, 9));
        let covariance = Array2::<f64>::ones((0, 9));

        let traj = TrajectoryGenerator::default()
            .generate_with_observer(features.view(), covariance.view(), 3, &NullObserver)
            .unwrap();

        assert_eq!(traj.dim(), (0, 3));
    }

    #[test]
    fn shape_errors_fail_before_computation() {
        let generator = TrajectoryGenerator::default();
        let features = Array2::<f64>::zeros((4, 6));
        let observer = RecordingObserver::default();

        let err = generator
            .generate_report(features.view(), Array2::ones((4, 5)).view(), 2, &observer)
            .unwrap_err();
        assert!(matches!(err, MLPGError::ShapeMismatch { what: "covariance", .. }));

        let err = generator
            .generate_report(features.view(), Array2::ones((4, 6)).view(), 3, &observer)
            .unwrap_err();
        assert!(matches!(err, MLPGError::ShapeMismatch { what: "features", .. }));

        assert!(observer.events().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // A NaN in one dimension fails only that dimension.
    //
    // Given
    // -----
    // - D = 3 over 6 frames; dimension 1 has a NaN static mean at frame 2.
    //
    // Expect
    // ------
    // - Report: dimensions 0 and 2 `Solved`, 1 `Failed` with
    //   `UnrecoverableSolve { dimension: Some(1) }`; column 1 is NaN and the
    //   others are finite.
    // - `generate` surfaces the same error.
    // - The observer saw exactly one failure.
    fn non_finite_input_fails_only_its_dimension() {
        // Arrange
        let frames = 6;
        let mut features = Array2::from_shape_fn((frames, 9), |(t, c)| if c < 3 { t as f64 } else { 0.0 });
        features[[2, 1]] = f64::NAN;
        let covariance = Array2::ones((frames, 9));
        let generator = TrajectoryGenerator::default();
        let observer = RecordingObserver::default();

        // Act
        let report = generator
            .generate_report(features.view(), covariance.view(), 3, &observer)
            .unwrap();

        // Assert
        assert_eq!(report.statuses()[0], DimensionStatus::Solved);
        assert_eq!(report.statuses()[2], DimensionStatus::Solved);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, 1);
        assert!(matches!(failures[0].1, MLPGError::UnrecoverableSolve { dimension: Some(1), .. }));
        assert!(report.trajectory().column(1).iter().all(|v| v.is_nan()));
        assert!(report.trajectory().column(0).iter().all(|v| v.is_finite()));
        assert!(report.trajectory().column(2).iter().all(|v| v.is_finite()));
        assert!(!report.is_complete());
        assert_eq!(observer.events().iter().filter(|e| e.starts_with("failure")).count(), 1);

        let err = generator
            .generate_with_observer(features.view(), covariance.view(), 3, &NullObserver)
            .unwrap_err();
        assert!(matches!(err, MLPGError::UnrecoverableSolve { dimension: Some(1), .. }));
    }

    #[test]
    // Purpose
    // -------
    // Infinite variance on every stream leaves interior frames without any
    // precision; the banded factorization fails and the pseudo-inverse
    // solves the system.
    //
    // Expect
    // ------
    // - Dimension reported as `Fallback`, observer saw the fallback, and
    //   the minimum-norm solution is zero.
    fn unconstrained_interior_uses_pseudo_inverse() {
        // Arrange
        let features = Array2::<f64>::zeros((5, 3));
        let covariance = Array2::from_elem((5, 3), f64::INFINITY);
        let observer = RecordingObserver::default();

        // Act
        let report = TrajectoryGenerator::default()
            .generate_report(features.view(), covariance.view(), 1, &observer)
            .unwrap();

        // Assert
        assert_eq!(report.fallback_dimensions(), vec![0]);
        assert!(matches!(report.statuses()[0], DimensionStatus::Fallback { pivot_index: Some(_) }));
        assert_eq!(observer.events(), vec!["start 0", "fallback 0", "finish 0"]);
        assert!(report.trajectory().iter().all(|v| v.abs() < 1e-9));
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn global_variance_row_matches_tiled_covariance() {
        let frames = 10;
        let features = Array2::from_shape_fn((frames, 6), |(t, c)| ((t * 7 + c * 3) % 5) as f64 - 2.0);
        let row = array![0.5, 1.5, 0.2, 0.3, 0.1, 0.4];
        let tiled = Array2::from_shape_fn((frames, 6), |(_, c)| row[c]);
        let generator = TrajectoryGenerator::default();

        let from_row = generator.generate_with_global_variance(features.view(), row.view(), 2).unwrap();
        let from_full = generator
            .generate_with_observer(features.view(), tiled.view(), 2, &NullObserver)
            .unwrap();

        assert_eq!(from_row, from_full);
    }

    #[test]
    fn global_variance_row_length_is_checked() {
        let features = Array2::<f64>::zeros((3, 6));
        let row = Array1::<f64>::ones(4);

        let err = TrajectoryGenerator::default()
            .generate_with_global_variance(features.view(), row.view(), 2)
            .unwrap_err();

        assert!(matches!(err, MLPGError::ShapeMismatch { what: "variance row", .. }));
    }

    #[test]
    fn solve_dimension_matches_full_generation_column() {
        let frames = 12;
        let features = Array2::from_shape_fn((frames, 6), |(t, c)| (t as f64 * 0.2 + c as f64).sin());
        let covariance = Array2::from_shape_fn((frames, 6), |(t, c)| 0.1 + 0.01 * (t + c) as f64);
        let generator = TrajectoryGenerator::default();

        let full = generator
            .generate_with_observer(features.view(), covariance.view(), 2, &NullObserver)
            .unwrap();
        let one = generator.solve_dimension(features.view(), covariance.view(), 2, 1).unwrap();

        assert!(!one.used_fallback());
        assert_eq!(one.solution, full.column(1).to_owned());
        assert!(matches!(
            generator.solve_dimension(features.view(), covariance.view(), 2, 2),
            Err(MLPGError::InvalidConfiguration { field: "dimension", .. })
        ));
    }

    #[test]
    fn custom_window_bank_changes_stream_count() {
        let bank = WindowBank::with_dynamics(vec![-1.0, 0.0, 1.0], vec![1.0, -2.0, 1.0]).unwrap();
        let opts = MLPGOptions::new(bank, 1e-12, 1e12, 1e-13, true).unwrap();
        let generator = TrajectoryGenerator::new(opts);
        let features = Array2::from_elem((4, 3), 1.0);
        let covariance = Array2::from_elem((4, 3), 1.0);

        let traj = generator
            .generate_with_observer(features.view(), covariance.view(), 1, &NullObserver)
            .unwrap();

        assert_eq!(generator.num_streams(), 3);
        assert_eq!(traj.dim(), (4, 1));
        assert!(traj.iter().all(|v| v.is_finite()));
    }
}
