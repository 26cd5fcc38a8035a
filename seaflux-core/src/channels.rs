//! Input channels and the borrowed record view handed to the engine
//!
//! The engine never owns the caller's data. A [`MotionInputs`] bundles slices
//! over the timestamp channel and every channel needed for motion correction;
//! the sonic temperature proxy travels separately because several operations
//! (momentum fluxes, earth-frame winds) do not need it.

use core::fmt;

use crate::errors::{ContractError, ContractResult};

/// Every measured channel the engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Sonic wind, platform x axis (m/s)
    WindX,
    /// Sonic wind, platform y axis (m/s)
    WindY,
    /// Sonic wind, platform z axis (m/s)
    WindZ,
    /// Speed-of-sound temperature proxy (100 × c in m/s)
    Sound,
    /// Angular rate about x (rad/s)
    RateX,
    /// Angular rate about y (rad/s)
    RateY,
    /// Angular rate about z (rad/s)
    RateZ,
    /// Linear acceleration along x (m/s²)
    AccelX,
    /// Linear acceleration along y (m/s²)
    AccelY,
    /// Linear acceleration along z (m/s²)
    AccelZ,
    /// Compass heading, clockwise from north (degrees)
    Heading,
    /// Geographic latitude (degrees)
    Latitude,
}

/// Number of distinct channels
pub const CHANNEL_COUNT: usize = 12;

impl Channel {
    /// Wind channels in axis order
    pub const WIND: [Channel; 3] = [Channel::WindX, Channel::WindY, Channel::WindZ];
    /// Rate channels in axis order
    pub const RATE: [Channel; 3] = [Channel::RateX, Channel::RateY, Channel::RateZ];
    /// Acceleration channels in axis order
    pub const ACCEL: [Channel; 3] = [Channel::AccelX, Channel::AccelY, Channel::AccelZ];

    /// Snake-case channel name used in errors and logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WindX => "wind_x",
            Self::WindY => "wind_y",
            Self::WindZ => "wind_z",
            Self::Sound => "sound",
            Self::RateX => "rate_x",
            Self::RateY => "rate_y",
            Self::RateZ => "rate_z",
            Self::AccelX => "accel_x",
            Self::AccelY => "accel_y",
            Self::AccelZ => "accel_z",
            Self::Heading => "heading",
            Self::Latitude => "latitude",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Borrowed view over one call's motion-relevant channels.
///
/// All slices must have the timestamp channel's length; [`MotionInputs::validate`]
/// enforces that and rejects non-finite samples.
#[derive(Debug, Clone, Copy)]
pub struct MotionInputs<'a> {
    /// Sample times, seconds since an arbitrary epoch
    pub timestamps: &'a [f64],
    /// Sonic wind components x, y, z (m/s)
    pub wind: [&'a [f64]; 3],
    /// Compass heading (degrees)
    pub heading: &'a [f64],
    /// Angular rates x, y, z (rad/s)
    pub rate: [&'a [f64]; 3],
    /// Linear accelerations x, y, z (m/s²)
    pub accel: [&'a [f64]; 3],
    /// Latitude (degrees)
    pub latitude: &'a [f64],
}

impl<'a> MotionInputs<'a> {
    /// Iterate over every channel slice with its identity
    pub fn channels(&self) -> impl Iterator<Item = (Channel, &'a [f64])> + '_ {
        Channel::WIND
            .iter()
            .copied()
            .zip(self.wind.iter().copied())
            .chain(Channel::RATE.iter().copied().zip(self.rate.iter().copied()))
            .chain(Channel::ACCEL.iter().copied().zip(self.accel.iter().copied()))
            .chain([(Channel::Heading, self.heading), (Channel::Latitude, self.latitude)])
    }

    /// Number of samples in the call
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// True when no samples were supplied
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Check lengths and finiteness of every channel
    pub fn validate(&self) -> ContractResult<()> {
        check_timestamps(self.timestamps)?;
        for (channel, samples) in self.channels() {
            check_channel(channel.name(), samples, self.timestamps.len())?;
        }
        Ok(())
    }
}

/// Timestamps must be non-empty and finite
pub(crate) fn check_timestamps(timestamps: &[f64]) -> ContractResult<()> {
    if timestamps.is_empty() {
        return Err(ContractError::EmptyInput);
    }
    check_finite("timestamps", timestamps)
}

/// A channel must match the timestamp length and be finite
pub(crate) fn check_channel(
    channel: &'static str,
    samples: &[f64],
    expected: usize,
) -> ContractResult<()> {
    if samples.len() != expected {
        return Err(ContractError::LengthMismatch {
            channel,
            expected,
            actual: samples.len(),
        });
    }
    check_finite(channel, samples)
}

fn check_finite(channel: &'static str, samples: &[f64]) -> ContractResult<()> {
    match samples.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ContractError::NonFinite { channel, index }),
        None => Ok(()),
    }
}
