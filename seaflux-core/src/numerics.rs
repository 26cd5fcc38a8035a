//! Shared Numerical Utilities
//!
//! ## Overview
//!
//! Small pure functions used by several stages: moments, covariances,
//! cumulative trapezoidal integration, heading unwrapping and linear
//! interpolation. None of them allocate except where they return a new series.
//!
//! ## Conventions
//!
//! - Moments are population moments (divide by `N`), matching how the flux
//!   covariances are defined.
//! - Integration returns a series of the same length as its input, starting
//!   at zero, scaled by the sample period.
//! - Empty inputs yield `0.0` for moments rather than NaN; callers never pass
//!   empty windows after conditioning.

use alloc::vec::Vec;

/// Arithmetic mean
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population standard deviation
pub fn std_dev(samples: &[f64]) -> f64 {
    libm::sqrt(covariance(samples, samples))
}

/// Population covariance of two equal-length series
pub fn covariance(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let (ma, mb) = (mean(&a[..n]), mean(&b[..n]));
    a[..n]
        .iter()
        .zip(&b[..n])
        .map(|(x, y)| (x - ma) * (y - mb))
        .sum::<f64>()
        / n as f64
}

/// Cumulative trapezoidal integral, starting at zero
pub fn cumulative_trapezoid(samples: &[f64], sample_rate_hz: f64) -> Vec<f64> {
    let dt = 1.0 / sample_rate_hz;
    let mut out = Vec::with_capacity(samples.len());
    let mut acc = 0.0;
    for (i, &x) in samples.iter().enumerate() {
        if i > 0 {
            acc += 0.5 * (x + samples[i - 1]) * dt;
        }
        out.push(acc);
    }
    out
}

/// Remove 360° jumps from a heading series so it becomes continuous
pub fn unwrap_degrees(headings: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(headings.len());
    let mut offset = 0.0;
    for (i, &h) in headings.iter().enumerate() {
        if i > 0 {
            let step = h - headings[i - 1];
            let wrapped = wrap_step(step);
            offset += wrapped - step;
        }
        out.push(h + offset);
    }
    out
}

/// Map a heading step onto [-180, 180)
fn wrap_step(step: f64) -> f64 {
    let mut wrapped = step - 360.0 * libm::floor((step + 180.0) / 360.0);
    // keep +180 steps positive so a half-turn does not flip direction
    if wrapped == -180.0 && step > 0.0 {
        wrapped = 180.0;
    }
    wrapped
}

/// Linear interpolation between `(x0, y0)` and `(x1, y1)` at `x`
pub fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
