//! Band matrices — window operators and symmetric precision storage.
//!
//! Purpose
//! -------
//! Provide the two fixed-bandwidth containers the MLPG stack needs: a general
//! `(l, u)` band operator [`BandMatrix`] for the finite-difference windows,
//! and a lower-band symmetric matrix [`SymBandMatrix`] for the precision
//! matrix `P`. Both store `O(n · width)` values, so assembly and products are
//! linear in the number of frames.
//!
//! Key behaviors
//! -------------
//! - [`BandMatrix`] stores one row per frame, `data[[i, k]] = W[i, i + k - l]`,
//!   and only treats in-range columns as present; edge rows are truncated.
//! - [`SymBandMatrix`] stores the diagonal and `bandwidth` sub-diagonals,
//!   `data[[d, j]] = P[j + d, j]`; the upper triangle is implied.
//! - [`SymBandMatrix::add_weighted_gram`] accumulates `Wᵀ · diag(τ) · W`
//!   directly into band storage, which is the core "product of experts"
//!   update.
//!
//! Invariants & assumptions
//! ------------------------
//! - Operators are square (`n × n`); the window bank builds them at the
//!   sequence's frame count.
//! - Storage slots that fall outside the matrix (e.g. the `l` leading
//!   slots of row 0) hold `0.0` and are never read as entries.
//!
//! Conventions
//! -----------
//! - Indices are `(row, col)`, 0-based.
//! - Methods that combine two containers validate sizes and return
//!   [`MLPGResult`]; single-index accessors return `0.0` outside the band.
use crate::generation::errors::{MLPGError, MLPGResult};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1};

/// BandMatrix — square `(l, u)` band operator in row-major band storage.
///
/// Entry `(i, j)` is present iff `j ∈ [i - l, i + u] ∩ [0, n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BandMatrix {
    l: usize,
    u: usize,
    n: usize,
    data: Array2<f64>,
}

impl BandMatrix {
    /// Band operator with every row equal to `coeffs` (shifted along the
    /// diagonal) and out-of-range entries omitted.
    ///
    /// Callers are responsible for `coeffs.len() == l + u + 1`. The only
    /// caller is [`Window::operator`](crate::generation::core::window::Window::operator),
    /// and every `Window` is validated on construction and deserialization.
    pub(crate) fn from_row_coefficients(l: usize, u: usize, n: usize, coeffs: &[f64]) -> Self {
        debug_assert_eq!(coeffs.len(), l + u + 1);
        let width = l + u + 1;
        let mut data = Array2::<f64>::zeros((n, width));
        for i in 0..n {
            for (k, &c) in coeffs.iter().enumerate() {
                if Self::column_of(i, k, l, n).is_some() {
                    data[[i, k]] = c;
                }
            }
        }
        BandMatrix { l, u, n, data }
    }

    #[inline]
    fn column_of(row: usize, k: usize, l: usize, n: usize) -> Option<usize> {
        let col = (row + k).checked_sub(l)?;
        (col < n).then_some(col)
    }

    /// Number of rows (= columns).
    pub fn n(&self) -> usize {
        self.n
    }

    /// Lower half-width.
    pub fn lower(&self) -> usize {
        self.l
    }

    /// Upper half-width.
    pub fn upper(&self) -> usize {
        self.u
    }

    /// Entry `(i, j)`, `0.0` outside the band or the matrix.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i >= self.n || j >= self.n || j + self.l < i || j > i + self.u {
            return 0.0;
        }
        self.data[[i, j + self.l - i]]
    }

    /// Present `(col, value)` entries of row `i`, in increasing column order.
    pub fn row_entries(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (l, n) = (self.l, self.n);
        (0..=self.l + self.u)
            .filter_map(move |k| Self::column_of(i, k, l, n).map(|col| (col, self.data[[i, k]])))
    }

    /// `W · x`.
    pub fn dot_vec(&self, x: ArrayView1<'_, f64>) -> MLPGResult<Array1<f64>> {
        self.check_len("operator input", x.len())?;
        Ok(Array1::from_iter(
            (0..self.n).map(|i| self.row_entries(i).map(|(j, w)| w * x[j]).sum::<f64>()),
        ))
    }

    /// `Wᵀ · y`, accumulated into `out` (`out += Wᵀ · y`).
    pub fn t_dot_vec_into(
        &self, y: ArrayView1<'_, f64>, out: &mut Array1<f64>,
    ) -> MLPGResult<()> {
        self.check_len("transposed operator input", y.len())?;
        self.check_len("transposed operator output", out.len())?;
        for i in 0..self.n {
            let yi = y[i];
            for (j, w) in self.row_entries(i) {
                out[j] += w * yi;
            }
        }
        Ok(())
    }

    /// Dense copy; intended for tests and diagnostics only.
    pub fn to_dense(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.n, self.n), |(i, j)| self.get(i, j))
    }

    fn check_len(&self, what: &'static str, len: usize) -> MLPGResult<()> {
        if len != self.n {
            return Err(MLPGError::shape_mismatch(what, &[self.n], &[len]));
        }
        Ok(())
    }
}

/// SymBandMatrix — symmetric band matrix stored as its lower band.
///
/// Purpose
/// -------
/// Hold the MLPG precision matrix `P` in `(bandwidth + 1) × n` storage,
/// `data[[d, j]] = P[j + d, j]`, so that both assembly and the banded
/// Cholesky run in `O(n · bandwidth²)`.
///
/// Invariants
/// ----------
/// - Symmetry is structural: only the lower band is stored and
///   [`SymBandMatrix::get`] mirrors it.
/// - Slots with `j + d ≥ n` stay `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SymBandMatrix {
    bandwidth: usize,
    n: usize,
    data: Array2<f64>,
}

impl SymBandMatrix {
    /// All-zero `n × n` matrix with the given half-bandwidth.
    pub fn zeros(n: usize, bandwidth: usize) -> Self {
        SymBandMatrix { bandwidth, n, data: Array2::zeros((bandwidth + 1, n)) }
    }

    /// Build from a dense symmetric matrix, keeping only the band.
    ///
    /// Entries outside the band are dropped without inspection.
    pub fn from_dense(dense: &Array2<f64>, bandwidth: usize) -> MLPGResult<Self> {
        let (rows, cols) = dense.dim();
        if rows != cols {
            return Err(MLPGError::shape_mismatch("dense precision matrix", &[rows, rows], &[
                rows, cols,
            ]));
        }
        let mut out = SymBandMatrix::zeros(rows, bandwidth);
        for j in 0..rows {
            for d in 0..=bandwidth.min(rows.saturating_sub(j + 1)) {
                out.data[[d, j]] = dense[[j + d, j]];
            }
        }
        Ok(out)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn bandwidth(&self) -> usize {
        self.bandwidth
    }

    /// Entry `(i, j)`, mirrored across the diagonal; `0.0` outside the band.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let (r, c) = if i >= j { (i, j) } else { (j, i) };
        if r >= self.n || r - c > self.bandwidth {
            return 0.0;
        }
        self.data[[r - c, c]]
    }

    /// Lower-band entry `(c + d, c)` without mirroring; `d ≤ bandwidth`.
    #[inline]
    pub(crate) fn lower(&self, d: usize, c: usize) -> f64 {
        self.data[[d, c]]
    }

    #[inline]
    pub(crate) fn set_lower(&mut self, d: usize, c: usize, value: f64) {
        self.data[[d, c]] = value;
    }

    /// Diagonal entry `P[i, i]`.
    pub fn diag(&self, i: usize) -> f64 {
        self.data[[0, i]]
    }

    /// Largest `|P[i, i]|`, `0.0` for an empty matrix.
    pub fn max_abs_diag(&self) -> f64 {
        self.data.row(0).iter().fold(0.0_f64, |m, &v| m.max(v.abs()))
    }

    /// Column index of the first stored non-finite entry, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        (0..self.n).find(|&j| self.data.column(j).iter().any(|v| !v.is_finite()))
    }

    /// Accumulate `Wᵀ · diag(tau) · W` into `self`.
    ///
    /// For each row `i` of `W` with present entries `(a, w_a)`, adds
    /// `w_a · τᵢ · w_b` to `P[a, b]` for every pair `b ≤ a` in that row. The
    /// result is symmetric by construction and PSD whenever all `τ ≥ 0`.
    ///
    /// Errors
    /// ------
    /// - `MLPGError::ShapeMismatch` when `W` and `self` differ in size, when
    ///   `tau.len() != n`, or when `l + u` exceeds `self.bandwidth()`.
    pub fn add_weighted_gram(
        &mut self, w: &BandMatrix, tau: ArrayView1<'_, f64>,
    ) -> MLPGResult<()> {
        if w.n() != self.n {
            return Err(MLPGError::shape_mismatch("window operator", &[self.n, self.n], &[
                w.n(),
                w.n(),
            ]));
        }
        if tau.len() != self.n {
            return Err(MLPGError::shape_mismatch("stream precision", &[self.n], &[tau.len()]));
        }
        if w.lower() + w.upper() > self.bandwidth {
            return Err(MLPGError::shape_mismatch(
                "precision bandwidth",
                &[w.lower() + w.upper()],
                &[self.bandwidth],
            ));
        }

        let mut entries: Vec<(usize, f64)> = Vec::with_capacity(w.lower() + w.upper() + 1);
        for i in 0..self.n {
            let t = tau[i];
            if t == 0.0 {
                continue;
            }
            entries.clear();
            entries.extend(w.row_entries(i));
            for (ia, &(a, wa)) in entries.iter().enumerate() {
                let scaled = wa * t;
                for &(b, wb) in &entries[..=ia] {
                    self.data[[a - b, b]] += scaled * wb;
                }
            }
        }
        Ok(())
    }

    /// `P · x`.
    pub fn dot_vec(&self, x: ArrayView1<'_, f64>) -> MLPGResult<Array1<f64>> {
        if x.len() != self.n {
            return Err(MLPGError::shape_mismatch("precision input", &[self.n], &[x.len()]));
        }
        let mut out = Array1::<f64>::zeros(self.n);
        for c in 0..self.n {
            out[c] += self.data[[0, c]] * x[c];
            for d in 1..=self.bandwidth.min(self.n - 1 - c) {
                let v = self.data[[d, c]];
                out[c + d] += v * x[c];
                out[c] += v * x[c + d];
            }
        }
        Ok(out)
    }

    /// Dense symmetric copy as an `ndarray` matrix.
    pub fn to_dense(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.n, self.n), |(i, j)| self.get(i, j))
    }

    /// Dense symmetric copy as a `nalgebra` matrix, for the eigen fallback.
    pub(crate) fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.n, self.n, |i, j| self.get(i, j))
    }
}
