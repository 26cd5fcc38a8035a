//! Data-Quality Thresholds
//!
//! Spike detection limits per channel family and compass stability limits.
//! Ranges are deliberately generous: they reject electrical glitches and
//! datalogger fill values, not unusual weather.

// ===== SPIKE DETECTION =====

/// Deviation from the window mean, in population standard deviations, above
/// which a sample is treated as a spike.
pub const SPIKE_SIGMA_THRESHOLD: f64 = 6.0;

/// Detection passes per channel before the spike set is accepted.
///
/// Each pass recomputes the mean and deviation over the samples not yet
/// flagged. Clean data settles after one or two passes.
pub const SPIKE_MAX_PASSES: usize = 10;

/// Largest plausible magnitude of a sonic wind component (m/s).
///
/// Sonic anemometers in marine service are typically specified to ±60 m/s.
pub const WIND_COMPONENT_LIMIT_M_PER_S: f64 = 60.0;

/// Lowest plausible sound-speed proxy (100 × m/s).
///
/// 280 m/s corresponds to a sonic temperature near -78 °C.
pub const SOUND_PROXY_MIN: f64 = 28_000.0;

/// Highest plausible sound-speed proxy (100 × m/s).
///
/// 380 m/s corresponds to a sonic temperature near +85 °C.
pub const SOUND_PROXY_MAX: f64 = 38_000.0;

/// Largest plausible platform angular rate (rad/s).
///
/// Roughly 570 °/s, beyond the range of buoy motion packages.
pub const RATE_LIMIT_RAD_PER_S: f64 = 10.0;

/// Largest plausible platform acceleration magnitude per axis (m/s²).
///
/// About 5 g, including gravity on the vertical axis.
pub const ACCEL_LIMIT_M_PER_S2: f64 = 50.0;

// ===== COMPASS STABILITY =====

/// Largest unwrapped heading change between consecutive samples (degrees).
///
/// 15° in 0.1 s is 150 °/s, far faster than a moored buoy yaws. Larger steps
/// mean a glitching compass or a spliced record.
pub const COMPASS_MAX_STEP_DEG: f64 = 15.0;

/// Largest unwrapped heading excursion over one window (degrees).
///
/// A buoy swinging through more than half a turn in 20 minutes breaks the
/// slowly-varying-heading assumption of the compass low-pass.
pub const COMPASS_MAX_EXCURSION_DEG: f64 = 180.0;
