//! Zero-Phase Filter Bank
//!
//! ## Overview
//!
//! Motion correction integrates rate and acceleration signals, and every
//! integration amplifies slow drift. High-pass filtering after each
//! integration keeps the estimates bounded; complementary low-pass filtering
//! supplies the slow part from absolute references (gravity, compass).
//! All filtering is zero-phase so motion and wind stay aligned in time.
//!
//! ## Design
//!
//! Butterworth filters are designed in transfer-function form `(b, a)` along
//! the classical route:
//!
//! ```text
//! analog prototype poles ─► frequency transform (LP or HP, pre-warped)
//!                         ─► bilinear transform ─► expand to polynomials
//! ```
//!
//! ## Zero-Phase Application
//!
//! [`FilterCoefficients::filtfilt`] extends the signal at both ends by an odd
//! reflection of `3 · max(len(a), len(b))` samples, runs the filter forward
//! from steady-state initial conditions, then backward over the reversed
//! output, and trims the extension. The squared magnitude response is applied
//! with no phase shift.
//!
//! ## Dual Paths
//!
//! A [`FilterBank`] holds two designs:
//!
//! - the **primary** high-pass, used for tilt, acceleration and (when the
//!   compass is stable) yaw blending;
//! - the **alternate** complementary low/high-pass pair with a much lower
//!   corner, used only for yaw blending when the compass is unstable.
//!
//! [`FilterBank::select`] turns a window's [`CompassQuality`] into a
//! [`FilterPath`] once; the motion corrector only ever sees the path.

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::PI;

use num_complex::Complex64;

use crate::{compass::CompassQuality, config::FilterConfig};

/// Response type of a Butterworth design
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Pass below the corner
    Lowpass,
    /// Pass above the corner
    Highpass,
}

/// Transfer-function coefficients, `a[0]` normalized to one
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCoefficients {
    b: Vec<f64>,
    a: Vec<f64>,
}

impl FilterCoefficients {
    /// Build from raw coefficient vectors, normalizing by `a[0]`.
    ///
    /// Both vectors are zero-padded to a common length.
    pub fn new(mut b: Vec<f64>, mut a: Vec<f64>) -> Self {
        let n = b.len().max(a.len()).max(1);
        b.resize(n, 0.0);
        a.resize(n, 0.0);
        let a0 = if a[0] == 0.0 { 1.0 } else { a[0] };
        for c in b.iter_mut().chain(a.iter_mut()) {
            *c /= a0;
        }
        Self { b, a }
    }

    /// Butterworth design of `order` with corner `cutoff_hz`
    pub fn butterworth(order: usize, cutoff_hz: f64, sample_rate_hz: f64, kind: FilterKind) -> Self {
        let order = order.max(1);
        // bilinear transform at an internal rate of 2, corner pre-warped
        let fs2 = Complex64::new(4.0, 0.0);
        let wn = cutoff_hz / (sample_rate_hz / 2.0);
        let warped = 4.0 * libm::tan(PI * wn / 2.0);

        let prototype: Vec<Complex64> = (0..order)
            .map(|k| {
                let m = 2.0 * k as f64 + 1.0 - order as f64;
                let theta = PI * m / (2.0 * order as f64);
                -Complex64::new(libm::cos(theta), libm::sin(theta))
            })
            .collect();

        let (zeros, poles, gain) = match kind {
            FilterKind::Lowpass => {
                let poles: Vec<Complex64> = prototype.iter().map(|p| *p * warped).collect();
                (Vec::new(), poles, libm::pow(warped, order as f64))
            }
            FilterKind::Highpass => {
                let poles: Vec<Complex64> = prototype.iter().map(|p| warped / *p).collect();
                let prod_neg: Complex64 = prototype.iter().map(|p| -*p).product();
                (vec![Complex64::new(0.0, 0.0); order], poles, 1.0 / prod_neg.re)
            }
        };

        let mut z_digital: Vec<Complex64> = zeros.iter().map(|z| (fs2 + *z) / (fs2 - *z)).collect();
        let p_digital: Vec<Complex64> = poles.iter().map(|p| (fs2 + *p) / (fs2 - *p)).collect();
        z_digital.resize(p_digital.len(), Complex64::new(-1.0, 0.0));

        let num: Complex64 = zeros.iter().map(|z| fs2 - *z).product();
        let den: Complex64 = poles.iter().map(|p| fs2 - *p).product();
        let k_digital = gain * (num / den).re;

        let b = poly(&z_digital).into_iter().map(|c| c * k_digital).collect();
        let a = poly(&p_digital);
        Self::new(b, a)
    }

    /// Numerator coefficients
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Denominator coefficients, `a[0] == 1`
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Gain at DC
    pub fn dc_gain(&self) -> f64 {
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }

    /// Causal filtering (direct form II transposed) with optional initial state
    pub fn lfilter(&self, x: &[f64], initial: Option<&[f64]>) -> Vec<f64> {
        let n = self.a.len();
        let mut state = vec![0.0; n.saturating_sub(1)];
        if let Some(zi) = initial {
            for (s, z) in state.iter_mut().zip(zi) {
                *s = *z;
            }
        }

        let mut y = Vec::with_capacity(x.len());
        for &xi in x {
            let yi = self.b[0] * xi + state.first().copied().unwrap_or(0.0);
            for k in 1..n {
                let carry = if k < n - 1 { state[k] } else { 0.0 };
                state[k - 1] = self.b[k] * xi + carry - self.a[k] * yi;
            }
            y.push(yi);
        }
        y
    }

    /// Initial state for a step response already in steady state.
    ///
    /// Solves `(I - Aᵀ) zi = b[1:] - a[1:]·b[0]` where `A` is the companion
    /// matrix of `a`.
    pub fn steady_state(&self) -> Vec<f64> {
        let m = self.a.len().saturating_sub(1);
        if m == 0 {
            return Vec::new();
        }
        let mut matrix = vec![vec![0.0; m]; m];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = 1.0;
            row[0] += self.a[i + 1];
            if i + 1 < m {
                row[i + 1] -= 1.0;
            }
        }
        let rhs: Vec<f64> = (1..=m).map(|k| self.b[k] - self.a[k] * self.b[0]).collect();
        solve(matrix, rhs).unwrap_or_else(|| vec![0.0; m])
    }

    /// Zero-phase forward-backward filtering with odd-reflection padding
    pub fn filtfilt(&self, x: &[f64]) -> Vec<f64> {
        if x.len() < 2 {
            return x.to_vec();
        }
        let pad = (3 * self.a.len()).min(x.len() - 1);
        let extended = odd_extension(x, pad);
        let zi = self.steady_state();

        let x0 = extended[0];
        let start: Vec<f64> = zi.iter().map(|z| z * x0).collect();
        let mut y = self.lfilter(&extended, Some(&start));

        y.reverse();
        let y0 = y[0];
        let start: Vec<f64> = zi.iter().map(|z| z * y0).collect();
        let mut y = self.lfilter(&y, Some(&start));
        y.reverse();

        y.drain(..pad);
        y.truncate(x.len());
        y
    }

    /// `x` minus its zero-phase filtered version.
    ///
    /// For a high-pass design this is the complementary low-frequency part.
    pub fn complement(&self, x: &[f64]) -> Vec<f64> {
        x.iter().zip(self.filtfilt(x)).map(|(a, b)| a - b).collect()
    }
}

/// Expand roots into monic polynomial coefficients (highest power first)
fn poly(roots: &[Complex64]) -> Vec<f64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for r in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, c) in coeffs.iter().enumerate() {
            next[i] += *c;
            next[i + 1] -= *c * *r;
        }
        coeffs = next;
    }
    coeffs.into_iter().map(|c| c.re).collect()
}

/// Reflect `pad` samples about each end point: `2·x[0] - x[pad..0]`
fn odd_extension(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let mut out = Vec::with_capacity(n + 2 * pad);
    out.extend((1..=pad).rev().map(|i| 2.0 * x[0] - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=pad).map(|i| 2.0 * x[n - 1] - x[n - 1 - i]));
    out
}

/// Gaussian elimination with partial pivoting
fn solve(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
    let n = rhs.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            libm::fabs(matrix[i][col]).total_cmp(&libm::fabs(matrix[j][col]))
        })?;
        if libm::fabs(matrix[pivot][col]) < 1e-300 {
            return None;
        }
        matrix.swap(col, pivot);
        rhs.swap(col, pivot);
        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| matrix[row][k] * x[k]).sum();
        x[row] = (rhs[row] - tail) / matrix[row][row];
    }
    Some(x)
}

/// Complementary low/high-pass pair sharing one corner
#[derive(Debug, Clone, PartialEq)]
pub struct ComplementaryPair {
    /// High-pass half
    pub highpass: FilterCoefficients,
    /// Low-pass half
    pub lowpass: FilterCoefficients,
}

/// The two coefficient sets of a processor, shared read-only across windows
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBank {
    primary: FilterCoefficients,
    alternate: ComplementaryPair,
}

impl FilterBank {
    /// Design both sets for `sample_rate_hz`
    pub fn design(config: &FilterConfig, sample_rate_hz: f64) -> Self {
        let primary = FilterCoefficients::butterworth(
            config.primary_order,
            config.primary_cutoff_hz,
            sample_rate_hz,
            FilterKind::Highpass,
        );
        let alternate = ComplementaryPair {
            highpass: FilterCoefficients::butterworth(
                config.alternate_order,
                config.alternate_cutoff_hz,
                sample_rate_hz,
                FilterKind::Highpass,
            ),
            lowpass: FilterCoefficients::butterworth(
                config.alternate_order,
                config.alternate_cutoff_hz,
                sample_rate_hz,
                FilterKind::Lowpass,
            ),
        };
        Self { primary, alternate }
    }

    /// Primary high-pass
    pub fn primary(&self) -> &FilterCoefficients {
        &self.primary
    }

    /// Alternate complementary pair
    pub fn alternate(&self) -> &ComplementaryPair {
        &self.alternate
    }

    /// Filter path for a window of the given compass quality
    pub fn select(&self, quality: CompassQuality) -> FilterPath<'_> {
        match quality {
            CompassQuality::Stable => FilterPath::Stable { highpass: &self.primary },
            CompassQuality::Unstable => FilterPath::Unstable {
                highpass: &self.primary,
                yaw: &self.alternate,
            },
        }
    }
}

/// Filters one window is processed with
#[derive(Debug, Clone, Copy)]
pub enum FilterPath<'a> {
    /// Primary set for everything
    Stable {
        /// Primary high-pass
        highpass: &'a FilterCoefficients,
    },
    /// Primary set for tilt and acceleration, alternate pair for yaw
    Unstable {
        /// Primary high-pass
        highpass: &'a FilterCoefficients,
        /// Alternate pair used to blend compass and gyro yaw
        yaw: &'a ComplementaryPair,
    },
}

impl<'a> FilterPath<'a> {
    /// High-pass used for tilt and acceleration
    pub fn highpass(&self) -> &'a FilterCoefficients {
        match self {
            Self::Stable { highpass } | Self::Unstable { highpass, .. } => highpass,
        }
    }

    /// Compass quality this path was selected for
    pub fn quality(&self) -> CompassQuality {
        match self {
            Self::Stable { .. } => CompassQuality::Stable,
            Self::Unstable { .. } => CompassQuality::Unstable,
        }
    }

    /// Blend compass yaw (slow) with integrated gyro yaw (fast), radians
    pub fn blend_yaw(&self, compass_yaw: &[f64], gyro_yaw: &[f64]) -> Vec<f64> {
        let (slow, fast) = match self {
            Self::Stable { highpass } => (highpass.complement(compass_yaw), highpass.filtfilt(gyro_yaw)),
            Self::Unstable { yaw, .. } => (yaw.lowpass.filtfilt(compass_yaw), yaw.highpass.filtfilt(gyro_yaw)),
        };
        slow.iter().zip(&fast).map(|(s, f)| s + f).collect()
    }
}
