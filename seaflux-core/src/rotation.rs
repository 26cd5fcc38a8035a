//! Frame Rotator
//!
//! Rotates platform-frame vectors into the earth frame and adds the
//! platform's own velocity. Earth axes are x north, y west, z up; yaw is
//! counter-clockwise from north, so a compass heading `h` is yaw `-h`.
//!
//! The rotation is the Z-Y-X direction-cosine matrix: roll `φ` about x, then
//! pitch `θ` about y, then yaw `ψ` about z.
//!
//! ```text
//!       ┌ cθ·cψ   sφ·sθ·cψ - cφ·sψ   cφ·sθ·cψ + sφ·sψ ┐
//!   R = │ cθ·sψ   sφ·sθ·sψ + cφ·cψ   cφ·sθ·sψ - sφ·cψ │
//!       └ -sθ     cθ·sφ              cθ·cφ            ┘
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::motion::MotionSolution;

/// Platform-to-earth rotation for one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionCosines([[f64; 3]; 3]);

impl DirectionCosines {
    /// Build from roll, pitch and yaw (rad)
    pub fn from_angles(roll: f64, pitch: f64, yaw: f64) -> Self {
        let (sp, cp) = (libm::sin(roll), libm::cos(roll));
        let (st, ct) = (libm::sin(pitch), libm::cos(pitch));
        let (sps, cps) = (libm::sin(yaw), libm::cos(yaw));
        Self([
            [ct * cps, sp * st * cps - cp * sps, cp * st * cps + sp * sps],
            [ct * sps, sp * st * sps + cp * cps, cp * st * sps - sp * cps],
            [-st, ct * sp, ct * cp],
        ])
    }

    /// Matrix rows
    pub fn rows(&self) -> &[[f64; 3]; 3] {
        &self.0
    }

    /// Rotate a platform-frame vector into the earth frame
    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        let r = &self.0;
        [
            r[0][0] * v[0] + r[0][1] * v[1] + r[0][2] * v[2],
            r[1][0] * v[0] + r[1][1] * v[1] + r[1][2] * v[2],
            r[2][0] * v[0] + r[2][1] * v[1] + r[2][2] * v[2],
        ]
    }
}

/// Earth-frame wind series (m/s)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EarthWind {
    /// Northward component
    pub north: Vec<f64>,
    /// Westward component
    pub west: Vec<f64>,
    /// Upward component
    pub up: Vec<f64>,
}

impl EarthWind {
    /// Series of `len` NaN samples, used for windows whose motion failed
    pub fn nan(len: usize) -> Self {
        Self {
            north: vec![f64::NAN; len],
            west: vec![f64::NAN; len],
            up: vec![f64::NAN; len],
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.north.len()
    }

    /// True when the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.north.is_empty()
    }

    /// Append another window's series
    pub fn extend(&mut self, other: &EarthWind) {
        self.north.extend_from_slice(&other.north);
        self.west.extend_from_slice(&other.west);
        self.up.extend_from_slice(&other.up);
    }

    /// Components in north, west, up order
    pub fn components(&self) -> [&[f64]; 3] {
        [&self.north, &self.west, &self.up]
    }
}

/// Rotate the motion-corrected platform wind into the earth frame
pub fn rotate_to_earth(solution: &MotionSolution) -> EarthWind {
    let n = solution.len();
    let mut wind = EarthWind {
        north: Vec::with_capacity(n),
        west: Vec::with_capacity(n),
        up: Vec::with_capacity(n),
    };
    let [pu, pv, pw] = &solution.platform_wind;
    let [vx, vy, vz] = &solution.platform_velocity;
    for i in 0..n {
        let r = solution.attitude.direction_cosines(i);
        let [x, y, z] = r.apply([pu[i], pv[i], pw[i]]);
        wind.north.push(x + vx[i]);
        wind.west.push(y + vy[i]);
        wind.up.push(z + vz[i]);
    }
    wind
}
