//! Processing configuration
//!
//! Every tunable of the engine lives in [`ProcessingConfig`]. Defaults
//! reproduce the reference deployment (10 Hz, 20-minute windows, 30 s edge
//! trim, 1/12 Hz filter corner); change them only when the platform differs.
//!
//! ```rust
//! use seaflux_core::config::{ProcessingConfig, PlatformConfig};
//!
//! let config = ProcessingConfig::default()
//!     .with_platform(PlatformConfig::default().with_lever_arm([0.0, 0.0, 1.2]));
//! assert!(config.validate().is_ok());
//! assert_eq!(config.sampling.edge_samples(), 300);
//! ```

use crate::{
    channels::Channel,
    constants::{
        filters::{ALTERNATE_CUTOFF_HZ, ALTERNATE_ORDER, MAX_FILTER_ORDER, PRIMARY_CUTOFF_HZ, PRIMARY_ORDER},
        quality::{
            ACCEL_LIMIT_M_PER_S2, COMPASS_MAX_EXCURSION_DEG, COMPASS_MAX_STEP_DEG,
            RATE_LIMIT_RAD_PER_S, SOUND_PROXY_MAX, SOUND_PROXY_MIN, SPIKE_SIGMA_THRESHOLD,
            WIND_COMPONENT_LIMIT_M_PER_S,
        },
        sampling::{
            representative_index, CHOP_SECONDS, NOMINAL_WINDOW_LEN, SAMPLE_RATE_HZ,
            SEGMENT_GAP_SECONDS,
        },
    },
    errors::{ContractError, ContractResult},
};

/// Sampling and windowing
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SamplingConfig {
    /// Sample rate of every channel (Hz)
    pub sample_rate_hz: f64,
    /// Canonical window length (samples)
    pub window_len: usize,
    /// Seconds trimmed from each window edge
    pub chop_seconds: f64,
    /// Timestamp step that starts a new source segment (s)
    pub segment_gap_seconds: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,
            window_len: NOMINAL_WINDOW_LEN,
            chop_seconds: CHOP_SECONDS,
            segment_gap_seconds: SEGMENT_GAP_SECONDS,
        }
    }
}

impl SamplingConfig {
    /// Samples trimmed from each window edge
    pub fn edge_samples(&self) -> usize {
        libm::round(self.sample_rate_hz * self.chop_seconds) as usize
    }

    /// Samples left after trimming both edges
    pub fn chopped_len(&self) -> usize {
        self.window_len.saturating_sub(2 * self.edge_samples())
    }

    /// Index of the representative timestamp inside a conditioned window
    pub fn representative_index(&self) -> usize {
        representative_index(self.window_len)
    }

    /// Set the window length
    pub fn with_window_len(mut self, window_len: usize) -> Self {
        self.window_len = window_len;
        self
    }

    /// Set the edge trim
    pub fn with_chop_seconds(mut self, chop_seconds: f64) -> Self {
        self.chop_seconds = chop_seconds;
        self
    }

    /// Set the segment gap
    pub fn with_segment_gap(mut self, seconds: f64) -> Self {
        self.segment_gap_seconds = seconds;
        self
    }
}

/// Butterworth designs of the filter bank
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterConfig {
    /// Primary high-pass corner (Hz)
    pub primary_cutoff_hz: f64,
    /// Primary high-pass order
    pub primary_order: usize,
    /// Alternate complementary pair corner (Hz)
    pub alternate_cutoff_hz: f64,
    /// Alternate complementary pair order
    pub alternate_order: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            primary_cutoff_hz: PRIMARY_CUTOFF_HZ,
            primary_order: PRIMARY_ORDER,
            alternate_cutoff_hz: ALTERNATE_CUTOFF_HZ,
            alternate_order: ALTERNATE_ORDER,
        }
    }
}

impl FilterConfig {
    /// Set the primary high-pass design
    pub fn with_primary(mut self, order: usize, cutoff_hz: f64) -> Self {
        self.primary_order = order;
        self.primary_cutoff_hz = cutoff_hz;
        self
    }

    /// Set the alternate complementary design
    pub fn with_alternate(mut self, order: usize, cutoff_hz: f64) -> Self {
        self.alternate_order = order;
        self.alternate_cutoff_hz = cutoff_hz;
        self
    }
}

/// Physical acceptance ranges per channel family
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChannelLimits {
    /// Wind component range (m/s)
    pub wind: (f64, f64),
    /// Sound-speed proxy range
    pub sound: (f64, f64),
    /// Angular rate range (rad/s)
    pub rate: (f64, f64),
    /// Acceleration range (m/s²)
    pub accel: (f64, f64),
}

impl Default for ChannelLimits {
    fn default() -> Self {
        Self {
            wind: (-WIND_COMPONENT_LIMIT_M_PER_S, WIND_COMPONENT_LIMIT_M_PER_S),
            sound: (SOUND_PROXY_MIN, SOUND_PROXY_MAX),
            rate: (-RATE_LIMIT_RAD_PER_S, RATE_LIMIT_RAD_PER_S),
            accel: (-ACCEL_LIMIT_M_PER_S2, ACCEL_LIMIT_M_PER_S2),
        }
    }
}

impl ChannelLimits {
    /// Acceptance range of `channel`, if it is despiked at all
    pub fn range(&self, channel: Channel) -> Option<(f64, f64)> {
        match channel {
            Channel::WindX | Channel::WindY | Channel::WindZ => Some(self.wind),
            Channel::Sound => Some(self.sound),
            Channel::RateX | Channel::RateY | Channel::RateZ => Some(self.rate),
            Channel::AccelX | Channel::AccelY | Channel::AccelZ => Some(self.accel),
            Channel::Heading | Channel::Latitude => None,
        }
    }
}

/// Spike detection
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DespikeConfig {
    /// Deviation from the mean, in standard deviations, that marks a spike
    pub sigma_threshold: f64,
    /// Physical ranges
    pub limits: ChannelLimits,
}

impl Default for DespikeConfig {
    fn default() -> Self {
        Self {
            sigma_threshold: SPIKE_SIGMA_THRESHOLD,
            limits: ChannelLimits::default(),
        }
    }
}

impl DespikeConfig {
    /// Set the sigma threshold
    pub fn with_sigma_threshold(mut self, sigma: f64) -> Self {
        self.sigma_threshold = sigma;
        self
    }

    /// Set the physical ranges
    pub fn with_limits(mut self, limits: ChannelLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Compass stability thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompassConfig {
    /// Largest unwrapped heading step between samples (degrees)
    pub max_step_deg: f64,
    /// Largest unwrapped heading excursion over a window (degrees)
    pub max_excursion_deg: f64,
}

impl Default for CompassConfig {
    fn default() -> Self {
        Self {
            max_step_deg: COMPASS_MAX_STEP_DEG,
            max_excursion_deg: COMPASS_MAX_EXCURSION_DEG,
        }
    }
}

/// Sensor geometry on the platform
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlatformConfig {
    /// Position of the sonic sampling volume relative to the motion package,
    /// platform axes (m)
    pub lever_arm_m: [f64; 3],
    /// Roll mounting offset added to the accelerometer tilt (rad)
    pub roll_offset_rad: f64,
    /// Pitch mounting offset added to the accelerometer tilt (rad)
    pub pitch_offset_rad: f64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            lever_arm_m: [0.0, 0.0, 0.6],
            roll_offset_rad: 0.0,
            pitch_offset_rad: 0.0,
        }
    }
}

impl PlatformConfig {
    /// Set the sonic lever arm
    pub fn with_lever_arm(mut self, lever_arm_m: [f64; 3]) -> Self {
        self.lever_arm_m = lever_arm_m;
        self
    }

    /// Set the roll and pitch mounting offsets
    pub fn with_offsets(mut self, roll_rad: f64, pitch_rad: f64) -> Self {
        self.roll_offset_rad = roll_rad;
        self.pitch_offset_rad = pitch_rad;
        self
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProcessingConfig {
    /// Sampling and windowing
    pub sampling: SamplingConfig,
    /// Filter bank designs
    pub filters: FilterConfig,
    /// Spike detection
    pub despike: DespikeConfig,
    /// Compass stability
    pub compass: CompassConfig,
    /// Sensor geometry
    pub platform: PlatformConfig,
}

impl ProcessingConfig {
    /// Replace the sampling section
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Replace the filter section
    pub fn with_filters(mut self, filters: FilterConfig) -> Self {
        self.filters = filters;
        self
    }

    /// Replace the despike section
    pub fn with_despike(mut self, despike: DespikeConfig) -> Self {
        self.despike = despike;
        self
    }

    /// Replace the compass section
    pub fn with_compass(mut self, compass: CompassConfig) -> Self {
        self.compass = compass;
        self
    }

    /// Replace the platform section
    pub fn with_platform(mut self, platform: PlatformConfig) -> Self {
        self.platform = platform;
        self
    }

    /// Reject settings the engine cannot honour
    pub fn validate(&self) -> ContractResult<()> {
        let s = &self.sampling;
        if !(s.sample_rate_hz > 0.0) || !s.sample_rate_hz.is_finite() {
            return invalid("sample rate must be positive");
        }
        if s.window_len < 2 {
            return invalid("window must hold at least two samples");
        }
        if !(s.chop_seconds >= 0.0) {
            return invalid("chop must be non-negative");
        }
        if s.chopped_len() == 0 {
            return invalid("edge trim leaves no samples");
        }
        if !(s.segment_gap_seconds > 0.0) {
            return invalid("segment gap must be positive");
        }

        let nyquist = s.sample_rate_hz / 2.0;
        let f = &self.filters;
        for (order, cutoff) in [
            (f.primary_order, f.primary_cutoff_hz),
            (f.alternate_order, f.alternate_cutoff_hz),
        ] {
            if order == 0 || order > MAX_FILTER_ORDER {
                return invalid("filter order must be between 1 and 8");
            }
            if !(cutoff > 0.0 && cutoff < nyquist) {
                return invalid("filter corner must lie between 0 and Nyquist");
            }
        }

        if !(self.despike.sigma_threshold > 0.0) {
            return invalid("spike threshold must be positive");
        }
        if !(self.compass.max_step_deg > 0.0 && self.compass.max_excursion_deg > 0.0) {
            return invalid("compass thresholds must be positive");
        }
        Ok(())
    }
}

fn invalid(reason: &'static str) -> ContractResult<()> {
    Err(ContractError::InvalidConfig { reason })
}
