//! Flux/Covariance Reducer
//!
//! ## Overview
//!
//! Reduces a chopped, motion-corrected earth-frame wind window (and
//! optionally sonic temperature) to three kinematic fluxes:
//!
//! - `uw = ⟨u′w′⟩` alongwind momentum flux (m²/s²)
//! - `vw = ⟨v′w′⟩` crosswind momentum flux (m²/s²)
//! - `wt = ⟨w′T′⟩` buoyancy (sonic heat) flux (K·m/s)
//!
//! ## Streamwise Coordinates
//!
//! The wind is first rotated about the vertical into the mean wind direction
//! (mean crosswind becomes zero), then tilted about the new crosswind axis
//! (mean vertical becomes zero). Covariances are population covariances of
//! the rotated components.
//!
//! ## Missing Windows
//!
//! A window whose channels could not be cleaned carries
//! [`FluxEstimate::Missing`] with the fault that caused it; its accessors
//! return NaN so callers can keep one value per window.

use alloc::vec::Vec;

use crate::{
    constants::physics::{KELVIN_OFFSET, SONIC_GAS_FACTOR, SOUND_PROXY_SCALE},
    errors::DataFault,
    numerics::{covariance, mean},
    rotation::EarthWind,
};

/// Kinematic fluxes of one window
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fluxes {
    /// Alongwind momentum flux
    pub uw: f64,
    /// Crosswind momentum flux
    pub vw: f64,
    /// Buoyancy flux, NaN when no temperature was supplied
    pub wt: f64,
}

impl Fluxes {
    /// Reduce a chopped earth-frame wind window
    pub fn from_wind(wind: &EarthWind, temperature: Option<&[f64]>) -> Self {
        let s = align_streamwise(wind);
        Self {
            uw: covariance(&s.u, &s.w),
            vw: covariance(&s.v, &s.w),
            wt: temperature.map_or(f64::NAN, |t| covariance(&s.w, t)),
        }
    }
}

/// Per-window flux result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FluxEstimate {
    /// Fluxes were computed
    Values(Fluxes),
    /// Upstream data fault; all fluxes are unavailable
    Missing(DataFault),
}

impl FluxEstimate {
    /// Alongwind momentum flux or NaN
    pub fn uw(&self) -> f64 {
        self.values().map_or(f64::NAN, |f| f.uw)
    }

    /// Crosswind momentum flux or NaN
    pub fn vw(&self) -> f64 {
        self.values().map_or(f64::NAN, |f| f.vw)
    }

    /// Buoyancy flux or NaN
    pub fn wt(&self) -> f64 {
        self.values().map_or(f64::NAN, |f| f.wt)
    }

    /// `[uw, vw, wt]`
    pub fn as_array(&self) -> [f64; 3] {
        [self.uw(), self.vw(), self.wt()]
    }

    /// Computed fluxes, if any
    pub fn values(&self) -> Option<&Fluxes> {
        match self {
            Self::Values(f) => Some(f),
            Self::Missing(_) => None,
        }
    }

    /// Fault that made this window missing
    pub fn fault(&self) -> Option<DataFault> {
        match self {
            Self::Values(_) => None,
            Self::Missing(fault) => Some(*fault),
        }
    }

    /// True when no fluxes were computed
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

/// Wind in streamwise coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct StreamwiseWind {
    /// Along the mean wind
    pub u: Vec<f64>,
    /// Across the mean wind
    pub v: Vec<f64>,
    /// Normal to the mean streamline
    pub w: Vec<f64>,
    /// Horizontal rotation applied (rad)
    pub direction: f64,
    /// Tilt applied (rad)
    pub tilt: f64,
}

/// Rotate into the mean wind direction, then tilt out the mean vertical
pub fn align_streamwise(wind: &EarthWind) -> StreamwiseWind {
    let direction = libm::atan2(mean(&wind.west), mean(&wind.north));
    let (sc, cc) = (libm::sin(direction), libm::cos(direction));

    let n = wind.len();
    let mut u1 = Vec::with_capacity(n);
    let mut v = Vec::with_capacity(n);
    for (&x, &y) in wind.north.iter().zip(&wind.west) {
        u1.push(x * cc + y * sc);
        v.push(-x * sc + y * cc);
    }

    let tilt = libm::atan2(mean(&wind.up), mean(&u1));
    let (sb, cb) = (libm::sin(tilt), libm::cos(tilt));
    let mut u = Vec::with_capacity(n);
    let mut w = Vec::with_capacity(n);
    for (&x, &z) in u1.iter().zip(&wind.up) {
        u.push(x * cb + z * sb);
        w.push(-x * sb + z * cb);
    }

    StreamwiseWind { u, v, w, direction, tilt }
}

/// Sonic temperature (°C) from the sound-speed proxy
pub fn sonic_temperature(proxy: f64) -> f64 {
    let c = proxy / SOUND_PROXY_SCALE;
    c * c / SONIC_GAS_FACTOR - KELVIN_OFFSET
}

/// Sonic temperature of a whole series
pub fn sonic_temperatures(proxy: &[f64]) -> Vec<f64> {
    proxy.iter().map(|&p| sonic_temperature(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::Channel;
    use alloc::vec;

    fn signal(n: usize) -> Vec<f64> {
        (0..n).map(|i| libm::sin(i as f64 * 0.37) + 0.5 * libm::cos(i as f64 * 0.11)).collect()
    }

    fn rotated(wind: &EarthWind, angle: f64) -> EarthWind {
        let (s, c) = (libm::sin(angle), libm::cos(angle));
        EarthWind {
            north: wind.north.iter().zip(&wind.west).map(|(x, y)| x * c - y * s).collect(),
            west: wind.north.iter().zip(&wind.west).map(|(x, y)| x * s + y * c).collect(),
            up: wind.up.clone(),
        }
    }

    #[test]
    fn northerly_wind_needs_no_rotation() {
        let s = signal(2000);
        let wind = EarthWind {
            north: s.iter().map(|x| 8.0 + x).collect(),
            west: vec![0.0; 2000],
            up: s.iter().map(|x| -0.5 * x).collect(),
        };
        let expected = -0.5 * covariance(&s, &s);
        let fluxes = Fluxes::from_wind(&wind, None);
        assert!((fluxes.uw - expected).abs() < 1e-3);
        assert!(fluxes.vw.abs() < 1e-9);
        assert!(fluxes.wt.is_nan());
    }

    #[test]
    fn rotated_wind_aligns_to_zero_mean_crosswind() {
        let s = signal(3000);
        let wind = EarthWind {
            north: s.iter().map(|x| 6.0 + x).collect(),
            west: s.iter().map(|x| 0.3 * x).collect(),
            up: s.iter().map(|x| 0.1 - 0.2 * x).collect(),
        };
        let aligned = align_streamwise(&rotated(&wind, 1.1));
        assert!(mean(&aligned.v).abs() < 1e-9);
        assert!(mean(&aligned.w).abs() < 1e-9);
        assert!(mean(&aligned.u) > 6.0);
    }

    #[test]
    fn fluxes_do_not_depend_on_wind_direction() {
        let s = signal(3000);
        let wind = EarthWind {
            north: s.iter().map(|x| 6.0 + x).collect(),
            west: s.iter().map(|x| 0.3 * x).collect(),
            up: s.iter().map(|x| -0.2 * x).collect(),
        };
        let a = Fluxes::from_wind(&wind, Some(&s));
        let b = Fluxes::from_wind(&rotated(&wind, -2.4), Some(&s));
        assert!((a.uw - b.uw).abs() < 1e-9);
        assert!((a.vw - b.vw).abs() < 1e-9);
        assert!((a.wt - b.wt).abs() < 1e-9);
    }

    #[test]
    fn sonic_temperature_formula() {
        let t = sonic_temperature(34_500.0);
        assert!((t - (345.0f64.powi(2) / 403.0 - 273.15)).abs() < 1e-12);
        assert_eq!(sonic_temperatures(&[34_500.0, 34_500.0]), vec![t, t]);
    }

    #[test]
    fn missing_estimate_reports_nan() {
        let missing = FluxEstimate::Missing(DataFault::NoValidSamples { channel: Channel::WindZ });
        assert!(missing.is_missing());
        assert!(missing.as_array().iter().all(|v| v.is_nan()));
        assert_eq!(missing.fault().map(|f| f.channel()), Some(Channel::WindZ));

        let values = FluxEstimate::Values(Fluxes { uw: -0.1, vw: 0.02, wt: 0.005 });
        assert_eq!(values.as_array(), [-0.1, 0.02, 0.005]);
        assert!(values.fault().is_none());
    }
}
