//! Linear solver for the MLPG normal equations.
//!
//! Purpose
//! -------
//! Solve `P · c = b` for the symmetric band precision matrix `P` in time
//! linear in the number of frames, with a pseudo-inverse fallback for
//! matrices that are not safely positive definite.
//!
//! Key behaviors
//! -------------
//! - [`BandedCholesky::factor`] computes `P = L · Lᵀ` in band storage in
//!   `O(n · bw²)` and rejects pivots that are non-finite or not above
//!   `pivot_tolerance · P[j, j]`, i.e. relative to their own column.
//! - [`BandedCholesky::solve`] runs banded forward and back substitution.
//! - [`solve_pseudo_inverse`] densifies `P`, takes a symmetric
//!   eigendecomposition (nalgebra) and applies the Moore–Penrose inverse,
//!   discarding eigenvalues `≤ max(EIGEN_EPS, n · ε) · λ_max`.
//! - [`solve`] chains the two and reports which method produced the result.
//!
//! Invariants & assumptions
//! ------------------------
//! - `P` and `b` must have the same length; a mismatch is a hard
//!   `ShapeMismatch`.
//! - Non-finite entries in `P` or `b` are unrecoverable: neither method can
//!   produce a meaningful answer from them.
//!
//! Conventions
//! -----------
//! - This module is pure. It neither logs nor consults an observer; the
//!   [`SolveOutcome`] carries the singularity so the caller can report it.
use crate::{
    generation::{
        core::{band::SymBandMatrix, options::MLPGOptions},
        errors::{MLPGError, MLPGResult},
    },
    numerical_stability::EIGEN_EPS,
};
use nalgebra::DVector;
use ndarray::{Array1, ArrayView1};

/// Iteration cap for the symmetric eigen solver of the fallback path.
const EIGEN_MAX_ITERATIONS: usize = 10_000;

/// Which method produced a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMethod {
    BandedCholesky,
    PseudoInverse,
}

/// SolveOutcome — solution plus provenance.
///
/// Fields
/// ------
/// - `solution`: `Array1<f64>` of length `n`.
/// - `method`: which solver produced `solution`.
/// - `singularity`: the `NumericalSingularity` that triggered the fallback,
///   `None` when the primary factorization succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub solution: Array1<f64>,
    pub method: SolveMethod,
    pub singularity: Option<MLPGError>,
}

impl SolveOutcome {
    pub fn used_fallback(&self) -> bool {
        self.method == SolveMethod::PseudoInverse
    }
}

/// BandedCholesky — lower factor `L` of `P = L · Lᵀ` in band storage.
#[derive(Debug, Clone, PartialEq)]
pub struct BandedCholesky {
    factor: SymBandMatrix,
}

impl BandedCholesky {
    /// Factor `p`.
    ///
    /// Errors
    /// ------
    /// - `MLPGError::NumericalSingularity { index, pivot }` for the first
    ///   column whose pivot is non-finite, `≤ 0`, or `≤ pivot_tolerance · P[j, j]`.
    ///
    /// Notes
    /// -----
    /// - The threshold is per column: floored variances (precision 1e12)
    ///   may sit next to loose ones in the same system.
    pub fn factor(p: &SymBandMatrix, pivot_tolerance: f64) -> MLPGResult<Self> {
        let n = p.n();
        let bw = p.bandwidth();
        let mut l = p.clone();

        for j in 0..n {
            let k0 = j.saturating_sub(bw);
            let mut pivot = p.diag(j);
            for k in k0..j {
                let ljk = l.lower(j - k, k);
                pivot -= ljk * ljk;
            }
            if !pivot.is_finite() || pivot <= 0.0 || pivot <= pivot_tolerance * p.diag(j) {
                return Err(MLPGError::NumericalSingularity { index: j, pivot });
            }
            let ljj = pivot.sqrt();
            l.set_lower(0, j, ljj);

            for i in (j + 1)..=(j + bw).min(n.saturating_sub(1)) {
                let mut s = p.lower(i - j, j);
                for k in i.saturating_sub(bw)..j {
                    s -= l.lower(i - k, k) * l.lower(j - k, k);
                }
                l.set_lower(i - j, j, s / ljj);
            }
        }
        Ok(BandedCholesky { factor: l })
    }

    pub fn n(&self) -> usize {
        self.factor.n()
    }

    /// Solve `L · Lᵀ · x = b`.
    ///
    /// Errors
    /// ------
    /// - `MLPGError::ShapeMismatch` when `b.len() != n`.
    pub fn solve(&self, b: ArrayView1<'_, f64>) -> MLPGResult<Array1<f64>> {
        let n = self.n();
        if b.len() != n {
            return Err(MLPGError::shape_mismatch("right-hand side", &[n], &[b.len()]));
        }
        let bw = self.factor.bandwidth();
        let l = &self.factor;

        let mut y = b.to_owned();
        for i in 0..n {
            let mut s = y[i];
            for k in i.saturating_sub(bw)..i {
                s -= l.lower(i - k, k) * y[k];
            }
            y[i] = s / l.diag(i);
        }

        let mut x = y;
        for i in (0..n).rev() {
            let mut s = x[i];
            for k in (i + 1)..=(i + bw).min(n - 1) {
                s -= l.lower(k - i, i) * x[k];
            }
            x[i] = s / l.diag(i);
        }
        Ok(x)
    }
}

/// Minimum-norm least-squares solution `x = P⁺ · b`.
///
/// Errors
/// ------
/// - `MLPGError::ShapeMismatch` when `b.len() != n`.
/// - `MLPGError::UnrecoverableSolve` if the eigendecomposition does not
///   converge or the result is non-finite.
///
/// Notes
/// -----
/// - Densifies `P`, so cost is `O(n³)`. Only reached for degenerate systems.
pub fn solve_pseudo_inverse(p: &SymBandMatrix, b: ArrayView1<'_, f64>) -> MLPGResult<Array1<f64>> {
    let n = p.n();
    if b.len() != n {
        return Err(MLPGError::shape_mismatch("right-hand side", &[n], &[b.len()]));
    }
    let eigen = p
        .to_dmatrix()
        .try_symmetric_eigen(f64::EPSILON, EIGEN_MAX_ITERATIONS)
        .ok_or_else(|| MLPGError::unrecoverable(None, "eigendecomposition did not converge"))?;

    let lambda_max = eigen.eigenvalues.iter().fold(0.0_f64, |m, &v| m.max(v));
    let cutoff = EIGEN_EPS.max(n as f64 * f64::EPSILON) * lambda_max;
    let rhs = DVector::from_iterator(n, b.iter().copied());

    let mut x = DVector::<f64>::zeros(n);
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= cutoff || lambda <= 0.0 {
            continue;
        }
        let q = eigen.eigenvectors.column(k);
        let coef = q.dot(&rhs) / lambda;
        x.axpy(coef, &q, 1.0);
    }

    if let Some(t) = x.iter().position(|v| !v.is_finite()) {
        return Err(MLPGError::unrecoverable(Some(t), "pseudo-inverse solution is non-finite"));
    }
    Ok(Array1::from_iter(x.iter().copied()))
}

/// Solve `P · c = b`: banded Cholesky first, pseudo-inverse on failure.
///
/// Parameters
/// ----------
/// - `p`: symmetric band precision matrix.
/// - `b`: right-hand side of the same length.
/// - `opts`: pivot tolerance and fallback policy.
///
/// Returns
/// -------
/// `MLPGResult<SolveOutcome>` reporting the method used and, on fallback,
/// the singularity that caused it.
///
/// Errors
/// ------
/// - `MLPGError::ShapeMismatch` when `p.n() != b.len()`.
/// - `MLPGError::UnrecoverableSolve` when `p` or `b` holds non-finite
///   entries, when factorization fails with the fallback disabled, or when
///   the fallback itself fails.
pub fn solve(
    p: &SymBandMatrix, b: ArrayView1<'_, f64>, opts: &MLPGOptions,
) -> MLPGResult<SolveOutcome> {
    if p.n() != b.len() {
        return Err(MLPGError::shape_mismatch("right-hand side", &[p.n()], &[b.len()]));
    }
    if let Some(t) = p.first_non_finite() {
        return Err(MLPGError::unrecoverable(Some(t), "precision matrix has non-finite entries"));
    }
    if let Some(t) = b.iter().position(|v| !v.is_finite()) {
        return Err(MLPGError::unrecoverable(Some(t), "precision-weighted mean is non-finite"));
    }

    let singularity = match BandedCholesky::factor(p, opts.pivot_tolerance()) {
        Ok(chol) => {
            let solution = chol.solve(b)?;
            if solution.iter().all(|v| v.is_finite()) {
                return Ok(SolveOutcome {
                    solution,
                    method: SolveMethod::BandedCholesky,
                    singularity: None,
                });
            }
            let index = solution.iter().position(|v| !v.is_finite()).unwrap_or(0);
            MLPGError::NumericalSingularity { index, pivot: f64::NAN }
        }
        Err(err) => err,
    };

    if !opts.allow_pseudo_inverse() {
        let frame = match &singularity {
            MLPGError::NumericalSingularity { index, .. } => Some(*index),
            _ => None,
        };
        return Err(MLPGError::unrecoverable(
            frame,
            format!("{singularity}; pseudo-inverse fallback disabled"),
        ));
    }

    let solution = solve_pseudo_inverse(p, b)?;
    Ok(SolveOutcome { solution, method: SolveMethod::PseudoInverse, singularity: Some(singularity) })
}
