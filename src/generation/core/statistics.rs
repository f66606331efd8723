//! Frame statistics — per-dimension mean/variance streams.
//!
//! Purpose
//! -------
//! Pull the `K` stream columns belonging to one static dimension out of the
//! packed `(frames × K·D)` arrays the acoustic model produces, and hold them
//! as two `(frames × K)` matrices for the system builder.
//!
//! Key behaviors
//! -------------
//! - [`VarianceSource`] abstracts over a full per-frame variance array and a
//!   single variance row broadcast across frames (the global variance vector
//!   that acoustic pipelines store per feature stream).
//! - [`FrameStatistics::extract`] copies columns `{d, D + d, 2D + d, …}`.
//! - [`FrameStatistics::from_streams`] accepts already-split streams and
//!   checks that means and variances agree in shape.
//!
//! Conventions
//! -----------
//! - Column `k` of both matrices belongs to window `k` of the bank.
//! - Values are copied verbatim; flooring and boundary overrides happen in
//!   the system builder.
use crate::generation::errors::{MLPGError, MLPGResult};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Where per-frame variances come from.
#[derive(Debug, Clone, Copy)]
pub enum VarianceSource<'a> {
    /// Full `(frames × K·D)` array, same layout as the means.
    Full(ArrayView2<'a, f64>),
    /// One `K·D` row used for every frame.
    GlobalRow(ArrayView1<'a, f64>),
}

impl VarianceSource<'_> {
    /// Variance for `(frame, col)` of the packed layout.
    #[inline]
    pub fn at(&self, frame: usize, col: usize) -> f64 {
        match self {
            VarianceSource::Full(cov) => cov[[frame, col]],
            VarianceSource::GlobalRow(row) => row[col],
        }
    }
}

/// FrameStatistics — mean and variance streams for one static dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameStatistics {
    means: Array2<f64>,
    variances: Array2<f64>,
}

impl FrameStatistics {
    /// Wrap split streams.
    ///
    /// Errors
    /// ------
    /// - `MLPGError::ShapeMismatch` when `means` and `variances` differ in
    ///   shape.
    pub fn from_streams(means: Array2<f64>, variances: Array2<f64>) -> MLPGResult<Self> {
        if means.dim() != variances.dim() {
            let (r, c) = means.dim();
            let (vr, vc) = variances.dim();
            return Err(MLPGError::shape_mismatch("stream variances", &[r, c], &[vr, vc]));
        }
        Ok(FrameStatistics { means, variances })
    }

    /// Extract dimension `d` from packed arrays.
    ///
    /// Parameters
    /// ----------
    /// - `features`: `(frames × K·D)` means.
    /// - `variance`: matching [`VarianceSource`].
    /// - `static_dimension`: `D`.
    /// - `num_streams`: `K`.
    /// - `d`: dimension index, `d < D`.
    ///
    /// Panics
    /// ------
    /// - Out-of-bounds indexing if the packed layout was not validated
    ///   beforehand (see `validation::validate_packed_inputs`) or `d ≥ D`.
    pub fn extract(
        features: ArrayView2<'_, f64>, variance: VarianceSource<'_>, static_dimension: usize,
        num_streams: usize, d: usize,
    ) -> Self {
        let frames = features.nrows();
        let means = Array2::from_shape_fn((frames, num_streams), |(t, k)| {
            features[[t, k * static_dimension + d]]
        });
        let variances = Array2::from_shape_fn((frames, num_streams), |(t, k)| {
            variance.at(t, k * static_dimension + d)
        });
        FrameStatistics { means, variances }
    }

    pub fn frames(&self) -> usize {
        self.means.nrows()
    }

    pub fn num_streams(&self) -> usize {
        self.means.ncols()
    }

    pub fn means(&self) -> ArrayView2<'_, f64> {
        self.means.view()
    }

    pub fn variances(&self) -> ArrayView2<'_, f64> {
        self.variances.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, array};

    #[test]
    // Purpose
    // -------
    // Verify the stream-major column layout `{d, D + d, 2D + d}`.
    //
    // Given
    // -----
    // - Two frames, D = 2, K = 3, with each entry encoding its column index.
    //
    // Expect
    // ------
    // - Dimension 1 picks columns 1, 3 and 5.
    fn extract_picks_stream_major_columns() {
        // Arrange
        let features = array![[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], [10.0, 11.0, 12.0, 13.0, 14.0, 15.0]];
        let cov = features.mapv(|v| v + 100.0);

        // Act
        let stats = FrameStatistics::extract(features.view(), VarianceSource::Full(cov.view()), 2, 3, 1);

        // Assert
        assert_eq!(stats.frames(), 2);
        assert_eq!(stats.num_streams(), 3);
        assert_eq!(stats.means(), array![[1.0, 3.0, 5.0], [11.0, 13.0, 15.0]]);
        assert_eq!(stats.variances(), array![[101.0, 103.0, 105.0], [111.0, 113.0, 115.0]]);
    }

    #[test]
    fn extract_broadcasts_global_variance_row() {
        let features = Array2::<f64>::zeros((3, 3));
        let row = Array1::from(vec![0.5, 2.0, 4.0]);

        let stats =
            FrameStatistics::extract(features.view(), VarianceSource::GlobalRow(row.view()), 1, 3, 0);

        for t in 0..3 {
            assert_eq!(stats.variances().row(t), row.view());
        }
    }

    #[test]
    fn from_streams_rejects_mismatched_shapes() {
        let err = FrameStatistics::from_streams(Array2::zeros((4, 3)), Array2::ones((4, 2)))
            .unwrap_err();
        assert!(matches!(err, MLPGError::ShapeMismatch { what: "stream variances", .. }));
    }
}
