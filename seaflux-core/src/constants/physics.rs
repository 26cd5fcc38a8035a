//! Physical Constants for SeaFlux
//!
//! Geodetic and thermodynamic constants used by the motion corrector and
//! the sonic temperature conversion.

// ===== GEODESY =====

/// Normal gravity at the equator (m/s²).
///
/// First coefficient of the Somigliana closed form of WGS-84 normal gravity.
///
/// Source: NIMA TR8350.2, WGS-84 (2000), eq. 4-1
pub const GRAVITY_EQUATOR_M_PER_S2: f64 = 9.7803267715;

/// Somigliana constant k for WGS-84 normal gravity (dimensionless).
///
/// Source: NIMA TR8350.2, WGS-84 (2000)
pub const GRAVITY_SOMIGLIANA_K: f64 = 0.001931851353;

/// First eccentricity squared of the WGS-84 ellipsoid (dimensionless).
///
/// Source: NIMA TR8350.2, WGS-84 (2000)
pub const WGS84_ECCENTRICITY_SQ: f64 = 0.0066943800229;

/// Angular velocity of the Earth (rad/s).
///
/// The gyro senses `Ω·sin(lat)` about the local vertical even on a perfectly
/// still platform; the yaw integration removes it.
///
/// Source: IERS Conventions (2010)
pub const EARTH_ROTATION_RAD_PER_S: f64 = 7.292115e-5;

// ===== SONIC THERMOMETRY =====

/// Scale between the sound-speed proxy and the speed of sound.
///
/// The datalogger reports `100 × c` with `c` in m/s.
pub const SOUND_PROXY_SCALE: f64 = 100.0;

/// Gas-constant factor relating speed of sound to sonic temperature (m²/s²/K).
///
/// `T_s = c² / 403` for moist air, the usual sonic anemometer convention.
pub const SONIC_GAS_FACTOR: f64 = 403.0;

/// Offset between kelvin and degrees Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Degrees to radians.
pub const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;

/// Normal gravity at geodetic latitude `lat_deg` (m/s²)
pub fn normal_gravity(lat_deg: f64) -> f64 {
    let s = libm::sin(lat_deg * DEG_TO_RAD);
    let s2 = s * s;
    GRAVITY_EQUATOR_M_PER_S2 * (1.0 + GRAVITY_SOMIGLIANA_K * s2)
        / libm::sqrt(1.0 - WGS84_ECCENTRICITY_SQ * s2)
}

/// Vertical component of the Earth's rotation at `lat_deg` (rad/s)
pub fn earth_rate_vertical(lat_deg: f64) -> f64 {
    EARTH_ROTATION_RAD_PER_S * libm::sin(lat_deg * DEG_TO_RAD)
}
