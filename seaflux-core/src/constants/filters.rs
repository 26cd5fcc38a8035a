//! Filter Bank Parameters
//!
//! Two coefficient sets are designed per processor. The primary high-pass
//! removes drift from integrated angles and accelerations. The alternate
//! complementary pair has a much lower corner and is only used to blend
//! compass and gyro yaw when the compass is judged unstable.

/// Corner frequency of the primary high-pass (Hz).
///
/// 1/12 Hz: wave-band platform motion (periods below ~12 s) is kept from the
/// integrated rate sensors, slower motion is taken from the tilt and compass
/// references.
pub const PRIMARY_CUTOFF_HZ: f64 = 1.0 / 12.0;

/// Butterworth order of the primary high-pass.
pub const PRIMARY_ORDER: usize = 4;

/// Corner frequency of the alternate complementary pair (Hz).
///
/// Ten times lower than the primary corner so that an unstable compass only
/// contributes its slowest trend to the yaw estimate.
pub const ALTERNATE_CUTOFF_HZ: f64 = 1.0 / 120.0;

/// Butterworth order of the alternate complementary pair.
///
/// Kept at 2: transfer-function coefficients of higher orders lose precision
/// this close to DC.
pub const ALTERNATE_ORDER: usize = 2;

/// Largest Butterworth order the designer accepts.
pub const MAX_FILTER_ORDER: usize = 8;
