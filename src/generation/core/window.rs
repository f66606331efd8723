//! Windows and the window bank — finite-difference operators for MLPG.
//!
//! Purpose
//! -------
//! Describe the static, delta and delta-delta ("accel") windows as validated
//! `(l, u, coefficients)` triples and turn them into banded linear operators
//! at a given frame count.
//!
//! Key behaviors
//! -------------
//! - [`Window::new`] validates `coefficients.len() == l + u + 1` and
//!   finiteness; [`Window::centered`] derives `l = u` from an odd-length
//!   coefficient vector.
//! - [`WindowBank::build`] returns one [`BandMatrix`] per window with entry
//!   `(i, i + offset) = c[offset + l]` for `offset ∈ [-l, u]`, omitting
//!   entries outside `[0, frames)`.
//! - [`WindowBank::default`] is the standard static / delta / accel triple.
//!
//! Invariants & assumptions
//! ------------------------
//! - The first window of a bank is the static window; all later windows are
//!   dynamic and get the boundary-variance override during assembly.
//! - Windows are shared by every dimension and frame; only their extent near
//!   the sequence edges differs.
//!
//! Conventions
//! -----------
//! - `build` is a pure function of `frames` and the bank; the bank itself is
//!   immutable after construction and safe to share across threads.
use crate::generation::{
    core::{band::BandMatrix, validation::validate_window},
    errors::{MLPGError, MLPGResult},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default delta window `[-0.5, 0.0, 0.5]`.
pub const DEFAULT_DELTA_WINDOW: [f64; 3] = [-0.5, 0.0, 0.5];

/// Default accel window `[1.0, -2.0, 1.0]`.
pub const DEFAULT_ACCEL_WINDOW: [f64; 3] = [1.0, -2.0, 1.0];

/// Window — one finite-difference operator `(l, u, c₀..c_{l+u})`.
///
/// Fields
/// ------
/// - `l`: number of past frames the window reaches.
/// - `u`: number of future frames the window reaches.
/// - `coeffs`: `l + u + 1` coefficients, `coeffs[l]` applying to the current
///   frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawWindow"))]
pub struct Window {
    l: usize,
    u: usize,
    coeffs: Vec<f64>,
}

impl Window {
    /// Construct a validated window.
    ///
    /// Errors
    /// ------
    /// - `MLPGError::InvalidConfiguration` when `coeffs.len() != l + u + 1`
    ///   or any coefficient is non-finite.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rust_mlpg::generation::core::window::Window;
    /// let delta = Window::new(1, 1, vec![-0.5, 0.0, 0.5]).unwrap();
    /// assert_eq!(delta.width(), 2);
    /// assert!(Window::new(1, 1, vec![1.0, -1.0]).is_err());
    /// ```
    pub fn new(l: usize, u: usize, coeffs: Vec<f64>) -> MLPGResult<Self> {
        validate_window(l, u, &coeffs)?;
        Ok(Window { l, u, coeffs })
    }

    /// Centered window from an odd-length coefficient vector (`l = u`).
    pub fn centered(coeffs: Vec<f64>) -> MLPGResult<Self> {
        if coeffs.len() % 2 == 0 {
            return Err(MLPGError::invalid_config(
                "window",
                format!("centered window needs an odd coefficient count, got {}", coeffs.len()),
            ));
        }
        let radius = coeffs.len() / 2;
        Window::new(radius, radius, coeffs)
    }

    /// The static identity window `[1.0]`.
    pub fn identity() -> Self {
        Window { l: 0, u: 0, coeffs: vec![1.0] }
    }

    pub fn lower(&self) -> usize {
        self.l
    }

    pub fn upper(&self) -> usize {
        self.u
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Combined half-width `l + u`; the bandwidth this window adds to `P`.
    pub fn width(&self) -> usize {
        self.l + self.u
    }

    /// Re-run construction checks, e.g. after deserialization.
    pub fn validate(&self) -> MLPGResult<()> {
        validate_window(self.l, self.u, &self.coeffs)
    }

    /// Banded operator of this window at `frames` frames.
    pub fn operator(&self, frames: usize) -> BandMatrix {
        BandMatrix::from_row_coefficients(self.l, self.u, frames, &self.coeffs)
    }

    /// Apply the window to a static sequence the same way the operator does,
    /// i.e. `W · x` with edge truncation.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        let n = x.len();
        (0..n)
            .map(|i| {
                self.coeffs
                    .iter()
                    .enumerate()
                    .filter_map(|(k, &c)| {
                        let j = (i + k).checked_sub(self.l)?;
                        (j < n).then(|| c * x[j])
                    })
                    .sum()
            })
            .collect()
    }
}

/// WindowBank — ordered set of windows, static first.
///
/// Purpose
/// -------
/// Own the window configuration shared by every dimension of a generation
/// call and build the matching banded operators per frame count.
///
/// Invariants
/// ----------
/// - At least one window.
/// - Every window passed [`Window::new`] validation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawWindowBank"))]
pub struct WindowBank {
    windows: Vec<Window>,
}

impl WindowBank {
    /// Bank from explicit windows; the first one is the static window.
    ///
    /// Errors
    /// ------
    /// - `MLPGError::InvalidConfiguration` when `windows` is empty or any
    ///   window fails [`Window::validate`].
    pub fn new(windows: Vec<Window>) -> MLPGResult<Self> {
        let bank = WindowBank { windows };
        bank.validate()?;
        Ok(bank)
    }

    /// Static identity plus centered delta and accel windows.
    ///
    /// This is the configuration surface of the classic generator
    /// (`delta_win`, `acc_win` arguments).
    pub fn with_dynamics(delta: Vec<f64>, accel: Vec<f64>) -> MLPGResult<Self> {
        WindowBank::new(vec![Window::identity(), Window::centered(delta)?, Window::centered(accel)?])
    }

    /// Number of windows (= number of streams per dimension).
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Never true for a constructed bank.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// `max_k (lₖ + uₖ)`: half-bandwidth of the assembled precision matrix.
    pub fn max_bandwidth(&self) -> usize {
        self.windows.iter().map(Window::width).max().unwrap_or(0)
    }

    /// Re-run construction checks on every window.
    pub fn validate(&self) -> MLPGResult<()> {
        if self.windows.is_empty() {
            return Err(MLPGError::invalid_config("windows", "at least one window is required"));
        }
        self.windows.iter().try_for_each(Window::validate)
    }

    /// One banded operator per window at `frames` frames.
    pub fn build(&self, frames: usize) -> Vec<BandMatrix> {
        self.windows.iter().map(|w| w.operator(frames)).collect()
    }
}

impl Default for WindowBank {
    fn default() -> Self {
        WindowBank {
            windows: vec![
                Window::identity(),
                Window { l: 1, u: 1, coeffs: DEFAULT_DELTA_WINDOW.to_vec() },
                Window { l: 1, u: 1, coeffs: DEFAULT_ACCEL_WINDOW.to_vec() },
            ],
        }
    }
}

/// Unvalidated mirror of [`Window`] used for deserialization.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWindow {
    pub l: usize,
    pub u: usize,
    pub coeffs: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawWindow> for Window {
    type Error = MLPGError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Window::new(raw.l, raw.u, raw.coeffs)
    }
}

/// Unvalidated mirror of [`WindowBank`] used for deserialization.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWindowBank {
    pub windows: Vec<Window>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawWindowBank> for WindowBank {
    type Error = MLPGError;

    fn try_from(raw: RawWindowBank) -> Result<Self, Self::Error> {
        WindowBank::new(raw.windows)
    }
}
