//! Motion Corrector
//!
//! ## Overview
//!
//! A sonic anemometer on a buoy measures the air moving past a sensor that
//! itself tilts, turns and heaves. This module reconstructs the platform's
//! attitude and velocity from the motion package so the frame rotator can
//! remove them from the measured wind.
//!
//! ## Attitude
//!
//! Each angle is the sum of a slow estimate from an absolute reference and a
//! fast estimate from the integrated gyro:
//!
//! | Angle | Slow part | Fast part |
//! |-------|-----------|-----------|
//! | roll  | accelerometer tilt, low-passed | `HP(∫ rate_x)` |
//! | pitch | accelerometer tilt, low-passed | `HP(∫ rate_y)` |
//! | yaw   | compass, low-passed | high-passed `∫ (rate_z - Ω·sin lat)` |
//!
//! The yaw blend comes from the window's [`FilterPath`]: the primary set on
//! a stable compass, the alternate complementary pair otherwise.
//!
//! ## Velocity
//!
//! Accelerations are rotated into the earth frame, gravity is removed from
//! the vertical, and each axis is integrated once between two high-pass
//! stages to suppress drift.
//!
//! ## Angular Motion at the Sonic
//!
//! The sonic sits a lever arm `L` away from the motion package, so rotation
//! alone moves it at `ω × L`. That term is added to the sonic wind before the
//! frame rotation.

use alloc::vec::Vec;

use crate::{
    config::PlatformConfig,
    constants::physics::{earth_rate_vertical, normal_gravity, DEG_TO_RAD},
    filters::FilterPath,
    numerics::{cumulative_trapezoid, mean, unwrap_degrees},
    rotation::DirectionCosines,
};

/// Despiked, conditioned channels of one window
#[derive(Debug, Clone, PartialEq)]
pub struct MotionWindow {
    /// Sonic wind, platform axes (m/s)
    pub wind: [Vec<f64>; 3],
    /// Angular rates about platform x, y, z (rad/s)
    pub rate: [Vec<f64>; 3],
    /// Linear accelerations along platform x, y, z (m/s²)
    pub accel: [Vec<f64>; 3],
    /// Compass heading (degrees, clockwise from north)
    pub heading: Vec<f64>,
    /// Latitude (degrees)
    pub latitude: Vec<f64>,
}

impl MotionWindow {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.heading.len()
    }

    /// True when the window holds no samples
    pub fn is_empty(&self) -> bool {
        self.heading.is_empty()
    }
}

/// Roll, pitch and yaw series (rad)
#[derive(Debug, Clone, PartialEq)]
pub struct Attitude {
    /// Rotation about the forward axis
    pub roll: Vec<f64>,
    /// Rotation about the lateral axis
    pub pitch: Vec<f64>,
    /// Rotation about the vertical, counter-clockwise from north
    pub yaw: Vec<f64>,
}

impl Attitude {
    /// Direction cosines at sample `i`
    pub fn direction_cosines(&self, i: usize) -> DirectionCosines {
        DirectionCosines::from_angles(self.roll[i], self.pitch[i], self.yaw[i])
    }
}

/// Output of the motion corrector, full window length
#[derive(Debug, Clone, PartialEq)]
pub struct MotionSolution {
    /// Platform attitude
    pub attitude: Attitude,
    /// Platform velocity, earth frame (m/s)
    pub platform_velocity: [Vec<f64>; 3],
    /// Sonic wind plus angular-motion term, platform frame (m/s)
    pub platform_wind: [Vec<f64>; 3],
}

impl MotionSolution {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.attitude.yaw.len()
    }

    /// True when the solution holds no samples
    pub fn is_empty(&self) -> bool {
        self.attitude.yaw.is_empty()
    }
}

/// Attitude and platform-velocity estimator
#[derive(Debug, Clone, Copy)]
pub struct MotionCorrector {
    sample_rate_hz: f64,
    platform: PlatformConfig,
}

impl MotionCorrector {
    /// Create a corrector for the given sample rate and sensor geometry
    pub fn new(sample_rate_hz: f64, platform: PlatformConfig) -> Self {
        Self { sample_rate_hz, platform }
    }

    /// Solve one window along the selected filter path
    pub fn correct(&self, window: &MotionWindow, path: FilterPath<'_>) -> MotionSolution {
        let latitude = mean(&window.latitude);
        let gravity = normal_gravity(latitude);

        let attitude = self.attitude(window, path, gravity, latitude);
        let platform_velocity = self.platform_velocity(window, &attitude, path, gravity);
        let platform_wind = self.platform_wind(window);

        MotionSolution { attitude, platform_velocity, platform_wind }
    }

    fn attitude(&self, window: &MotionWindow, path: FilterPath<'_>, gravity: f64, latitude: f64) -> Attitude {
        let hp = path.highpass();
        let [ax, ay, _] = &window.accel;
        let [rx, ry, rz] = &window.rate;

        let mut pitch_tilt = Vec::with_capacity(window.len());
        let mut roll_tilt = Vec::with_capacity(window.len());
        // at rest the accelerometers read g times the bottom row of R
        for (&x, &y) in ax.iter().zip(ay) {
            let theta = libm::asin(clamp_unit(-x / gravity));
            let phi = libm::asin(clamp_unit(y / (gravity * libm::cos(theta))));
            pitch_tilt.push(theta + self.platform.pitch_offset_rad);
            roll_tilt.push(phi + self.platform.roll_offset_rad);
        }

        let roll = sum(&hp.complement(&roll_tilt), &hp.filtfilt(&self.integrate(rx)));
        let pitch = sum(&hp.complement(&pitch_tilt), &hp.filtfilt(&self.integrate(ry)));

        let compass_yaw: Vec<f64> = unwrap_degrees(&window.heading)
            .into_iter()
            .map(|h| -h * DEG_TO_RAD)
            .collect();
        let earth_rate = earth_rate_vertical(latitude);
        let yaw_rate: Vec<f64> = rz.iter().map(|r| r - earth_rate).collect();
        let yaw = path.blend_yaw(&compass_yaw, &self.integrate(&yaw_rate));

        Attitude { roll, pitch, yaw }
    }

    fn platform_velocity(
        &self,
        window: &MotionWindow,
        attitude: &Attitude,
        path: FilterPath<'_>,
        gravity: f64,
    ) -> [Vec<f64>; 3] {
        let hp = path.highpass();
        let n = window.len();
        let [ax, ay, az] = &window.accel;

        let mut earth: [Vec<f64>; 3] = [
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
        ];
        for i in 0..n {
            let a = attitude.direction_cosines(i).apply([ax[i], ay[i], az[i]]);
            earth[0].push(a[0]);
            earth[1].push(a[1]);
            earth[2].push(a[2] - gravity);
        }

        earth.map(|axis| hp.filtfilt(&self.integrate(&hp.filtfilt(&axis))))
    }

    fn platform_wind(&self, window: &MotionWindow) -> [Vec<f64>; 3] {
        let [lx, ly, lz] = self.platform.lever_arm_m;
        let [wx, wy, wz] = &window.rate;
        let [u, v, w] = &window.wind;

        let n = window.len();
        let mut out: [Vec<f64>; 3] = [
            Vec::with_capacity(n),
            Vec::with_capacity(n),
            Vec::with_capacity(n),
        ];
        for i in 0..n {
            out[0].push(u[i] + wy[i] * lz - wz[i] * ly);
            out[1].push(v[i] + wz[i] * lx - wx[i] * lz);
            out[2].push(w[i] + wx[i] * ly - wy[i] * lx);
        }
        out
    }

    fn integrate(&self, samples: &[f64]) -> Vec<f64> {
        cumulative_trapezoid(samples, self.sample_rate_hz)
    }
}

fn clamp_unit(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

fn sum(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}
