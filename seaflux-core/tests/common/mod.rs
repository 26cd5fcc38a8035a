//! Common test utilities for integration tests
//!
//! This module provides:
//! - A deterministic random number generator
//! - A synthetic buoy record with swell-driven motion and turbulent wind
//! - Tolerance assertion helpers

#![allow(dead_code)]

use std::f64::consts::PI;

use seaflux_core::{
    constants::{earth_rate_vertical, normal_gravity, DEG_TO_RAD},
    DirectionCosines, MotionInputs, PlatformConfig,
};

/// Sample rate of every synthetic record (Hz)
pub const FS: f64 = 10.0;

/// Deterministic random number generator for tests
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        // Xorshift algorithm
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f64(&mut self) -> f64 {
        (self.next_u32() >> 8) as f64 / 16_777_216.0
    }

    pub fn gen_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// All channels of one synthetic buoy record
#[derive(Debug, Clone)]
pub struct BuoyRecord {
    pub timestamps: Vec<f64>,
    pub wind: [Vec<f64>; 3],
    pub sound: Vec<f64>,
    pub heading: Vec<f64>,
    pub rate: [Vec<f64>; 3],
    pub accel: [Vec<f64>; 3],
    pub latitude: Vec<f64>,
    /// Earth-frame north, west and up wind the sensors were derived from
    pub true_wind: [Vec<f64>; 3],
}

impl BuoyRecord {
    /// Record of `n` samples starting at `t0 + 0.1` s
    ///
    /// Simulates:
    /// - 6 s swell rolling and pitching the hull by about 3° with heave
    /// - Heading swinging ±5° around 140° over five minutes
    /// - Turbulent wind of about 7 m/s with downward momentum flux
    /// - Sound speed correlated with vertical wind (upward heat flux)
    ///
    /// The earth-frame wind is the ground truth. Every sensor channel is
    /// derived from it and the true attitude, so a correct motion correction
    /// recovers [`BuoyRecord::true_wind`].
    pub fn synthetic(n: usize, t0: f64, seed: u32) -> Self {
        let mut rng = TestRng::new(seed);
        let latitude = 38.5;
        let g = normal_gravity(latitude);
        let earth_rate = earth_rate_vertical(latitude);
        let lz = PlatformConfig::default().lever_arm_m[2];
        let swell = 2.0 * PI / 6.0;
        let amplitude = 0.05;
        let heave_accel = 0.3;

        let mut r = Self::empty(n);
        for i in 0..n {
            let t = (i + 1) as f64 / FS;
            let n1 = rng.gen_range(-1.0, 1.0);
            let n2 = rng.gen_range(-1.0, 1.0);
            let n3 = rng.gen_range(-1.0, 1.0);
            let n4 = rng.gen_range(-1.0, 1.0);

            // roll and pitch share the swell phase; heave lags them by 90°
            let phase = swell * t + 1.0;
            let tilt = amplitude * phase.sin();
            let tilt_rate = amplitude * swell * phase.cos();
            let heave_velocity = heave_accel / swell * phase.sin();
            let heading = 140.0 + 5.0 * (2.0 * PI * t / 300.0).sin();
            let yaw = -heading * DEG_TO_RAD;
            let yaw_rate = -5.0 * (2.0 * PI / 300.0) * (2.0 * PI * t / 300.0).cos() * DEG_TO_RAD;

            // Z-Y-X body rates of the true attitude
            let (roll, pitch) = (tilt, tilt);
            let p = tilt_rate - yaw_rate * pitch.sin();
            let q = tilt_rate * roll.cos() + yaw_rate * roll.sin() * pitch.cos();
            let w = -tilt_rate * roll.sin() + yaw_rate * roll.cos() * pitch.cos();
            let dcm = DirectionCosines::from_angles(roll, pitch, yaw);

            let wind = [
                7.0 + 0.8 * n1 + 0.3 * (2.0 * PI * t / 40.0).sin(),
                0.5 * n2,
                -0.3 * n1 + 0.2 * n3,
            ];
            let relative = to_platform(&dcm, [wind[0], wind[1], wind[2] - heave_velocity]);
            let accel = to_platform(&dcm, [0.0, 0.0, g + heave_accel * phase.cos()]);

            r.timestamps.push(t0 + t);
            // the sonic also moves at ω × L about the motion package
            r.wind[0].push(relative[0] - q * lz);
            r.wind[1].push(relative[1] + p * lz);
            r.wind[2].push(relative[2]);
            r.sound.push(34_500.0 + 30.0 * n3 - 20.0 * n1);
            r.heading.push(heading + 0.2 * n4);

            r.rate[0].push(p + 0.002 * n4);
            r.rate[1].push(q - 0.002 * n4);
            r.rate[2].push(w + earth_rate + 0.003 * n4);

            for k in 0..3 {
                r.accel[k].push(accel[k] + 0.01 * n4);
                r.true_wind[k].push(wind[k]);
            }

            r.latitude.push(latitude + 1e-4 * t / 1200.0);
        }
        r
    }

    fn empty(n: usize) -> Self {
        let v = || Vec::with_capacity(n);
        Self {
            timestamps: v(),
            wind: [v(), v(), v()],
            sound: v(),
            heading: v(),
            rate: [v(), v(), v()],
            accel: [v(), v(), v()],
            latitude: v(),
            true_wind: [v(), v(), v()],
        }
    }

    /// Add a 60° compass jump halfway through the record
    pub fn with_heading_splice(mut self) -> Self {
        let half = self.heading.len() / 2;
        for h in &mut self.heading[half..] {
            *h += 60.0;
        }
        self
    }

    /// Records back to back in one call
    pub fn concat(records: &[BuoyRecord]) -> Self {
        let mut out = Self::empty(records.iter().map(BuoyRecord::len).sum());
        for r in records {
            out.timestamps.extend_from_slice(&r.timestamps);
            out.sound.extend_from_slice(&r.sound);
            out.heading.extend_from_slice(&r.heading);
            out.latitude.extend_from_slice(&r.latitude);
            for k in 0..3 {
                out.wind[k].extend_from_slice(&r.wind[k]);
                out.rate[k].extend_from_slice(&r.rate[k]);
                out.accel[k].extend_from_slice(&r.accel[k]);
                out.true_wind[k].extend_from_slice(&r.true_wind[k]);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Borrowed view for the processor
    pub fn inputs(&self) -> MotionInputs<'_> {
        MotionInputs {
            timestamps: &self.timestamps,
            wind: [&self.wind[0], &self.wind[1], &self.wind[2]],
            heading: &self.heading,
            rate: [&self.rate[0], &self.rate[1], &self.rate[2]],
            accel: [&self.accel[0], &self.accel[1], &self.accel[2]],
            latitude: &self.latitude,
        }
    }
}

/// Rotate an earth-frame vector into the platform frame
pub fn to_platform(dcm: &DirectionCosines, v: [f64; 3]) -> [f64; 3] {
    let m = dcm.rows();
    [0, 1, 2].map(|j| m[0][j] * v[0] + m[1][j] * v[1] + m[2][j] * v[2])
}

#[macro_export]
macro_rules! assert_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let diff = ($actual - $expected).abs();
        if diff > $tolerance {
            panic!(
                "Value {} not within tolerance {} of expected {} (diff: {})",
                $actual, $tolerance, $expected, diff
            );
        }
    };
}

/// Element-wise tolerance check that treats NaN as equal to NaN
pub fn assert_series_close(actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "series lengths differ");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        if a.is_nan() && e.is_nan() {
            continue;
        }
        assert!(
            (a - e).abs() <= tolerance,
            "sample {}: {} not within {} of {}",
            i,
            a,
            tolerance,
            e
        );
    }
}
