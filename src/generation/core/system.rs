//! Precision system assembly — the MLPG "product of experts".
//!
//! Purpose
//! -------
//! Combine one dimension's mean/variance streams with the window operators
//! into the normal equations `P · c = b` whose solution is the ML static
//! trajectory.
//!
//! Key behaviors
//! -------------
//! - Floor variances `≤ 0` to `variance_floor`.
//! - Override every dynamic stream's variance at frame 0 and frame `T-1`
//!   with `boundary_variance`.
//! - Compute `τ = 1/variance`, `b_local = mean · τ` and accumulate
//!   `b += Wₖᵀ b_localₖ`, `P += Wₖᵀ diag(τₖ) Wₖ` for every window `k`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `P` is symmetric by construction (lower-band storage) and PSD when all
//!   precisions are non-negative.
//! - The bandwidth of `P` is `max_k (lₖ + uₖ)` of the operators passed in.
//! - Shape checks run before any arithmetic.
//!
//! Conventions
//! -----------
//! - Stream `0` is the static stream and is never boundary-overridden.
//! - Non-finite values (NaN means, NaN variances) are carried into the
//!   system unchanged; the solver turns them into an unrecoverable error
//!   for this dimension.
use crate::{
    generation::{
        core::{
            band::{BandMatrix, SymBandMatrix},
            options::MLPGOptions,
            statistics::FrameStatistics,
        },
        errors::{MLPGError, MLPGResult},
    },
    numerical_stability::{floor_variance, precision_pair},
};
use ndarray::{Array1, Array2, Axis};

/// PrecisionSystem — `P · c = b` for one static dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionSystem {
    /// Precision-weighted mean, length `frames`.
    pub b: Array1<f64>,
    /// Symmetric band precision matrix, `frames × frames`.
    pub p: SymBandMatrix,
}

impl PrecisionSystem {
    pub fn frames(&self) -> usize {
        self.b.len()
    }
}

/// Effective variances after flooring and boundary overrides.
///
/// Exposed separately so callers and tests can inspect what the solver
/// actually weighs.
pub fn effective_variances(stats: &FrameStatistics, opts: &MLPGOptions) -> Array2<f64> {
    let floor = opts.variance_floor();
    let mut var = stats.variances().mapv(|v| floor_variance(v, floor));
    let frames = stats.frames();
    if frames > 0 {
        for t in [0, frames - 1] {
            var.row_mut(t).iter_mut().skip(1).for_each(|v| *v = opts.boundary_variance());
        }
    }
    var
}

/// build_system — assemble `(b, P)` for one dimension.
///
/// Parameters
/// ----------
/// - `stats`: `&FrameStatistics`
///   `(frames × K)` means and variances for this dimension.
/// - `operators`: `&[BandMatrix]`
///   `K` window operators built at `frames` (see `WindowBank::build`).
/// - `opts`: `&MLPGOptions`
///   Variance floor and boundary variance.
///
/// Returns
/// -------
/// `MLPGResult<PrecisionSystem>` with `P` of bandwidth
/// `max_k (lₖ + uₖ)`.
///
/// Errors
/// ------
/// - `MLPGError::ShapeMismatch` when the stream count differs from the
///   operator count, or an operator was built at a different frame count.
///
/// Notes
/// -----
/// - Cost is `O(frames · K · width²)`; no dense `frames × frames` matrix is
///   ever formed.
pub fn build_system(
    stats: &FrameStatistics, operators: &[BandMatrix], opts: &MLPGOptions,
) -> MLPGResult<PrecisionSystem> {
    let frames = stats.frames();
    if stats.num_streams() != operators.len() {
        return Err(MLPGError::shape_mismatch("stream count", &[operators.len()], &[
            stats.num_streams(),
        ]));
    }
    if let Some(op) = operators.iter().find(|op| op.n() != frames) {
        return Err(MLPGError::shape_mismatch("window operator", &[frames, frames], &[
            op.n(),
            op.n(),
        ]));
    }

    let bandwidth = operators.iter().map(|op| op.lower() + op.upper()).max().unwrap_or(0);
    let variances = effective_variances(stats, opts);
    let means = stats.means();

    let mut b = Array1::<f64>::zeros(frames);
    let mut p = SymBandMatrix::zeros(frames, bandwidth);
    let mut b_local = Array1::<f64>::zeros(frames);
    let mut tau = Array1::<f64>::zeros(frames);

    for (k, op) in operators.iter().enumerate() {
        let mean_k = means.index_axis(Axis(1), k);
        let var_k = variances.index_axis(Axis(1), k);
        for t in 0..frames {
            let (bt, tt) = precision_pair(mean_k[t], var_k[t]);
            b_local[t] = bt;
            tau[t] = tt;
        }
        op.t_dot_vec_into(b_local.view(), &mut b)?;
        p.add_weighted_gram(op, tau.view())?;
    }

    Ok(PrecisionSystem { b, p })
}
