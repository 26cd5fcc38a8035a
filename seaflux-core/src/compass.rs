//! Compass-Quality Classifier
//!
//! The yaw estimate blends the compass (trusted at low frequency) with the
//! integrated yaw-rate gyro (trusted at high frequency). That blend assumes a
//! heading that varies slowly and continuously over the window. When the
//! compass glitches, the record is spliced, or the buoy swings through large
//! angles, the default blend corner lets compass artefacts into the yaw, so
//! the window is classified [`CompassQuality::Unstable`] and the motion
//! corrector switches to the alternate, lower-corner filter pair.
//!
//! Crossing north (359° → 0°) on its own is not instability: the heading is
//! unwrapped before it is judged.

use crate::{config::CompassConfig, numerics::unwrap_degrees};

/// Per-window compass classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompassQuality {
    /// Heading is slowly varying; primary filter set applies
    Stable,
    /// Heading jumps or swings widely; alternate filter pair applies
    Unstable,
}

/// Heading statistics the classification is based on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingSummary {
    /// Largest absolute step between consecutive unwrapped samples (degrees)
    pub max_step_deg: f64,
    /// Max minus min of the unwrapped heading (degrees)
    pub excursion_deg: f64,
}

impl HeadingSummary {
    /// Summarize a heading channel (degrees)
    pub fn from_heading(heading: &[f64]) -> Self {
        let unwrapped = unwrap_degrees(heading);
        let max_step_deg = unwrapped
            .windows(2)
            .map(|w| libm::fabs(w[1] - w[0]))
            .fold(0.0, f64::max);
        let (lo, hi) = unwrapped
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)));
        let excursion_deg = if unwrapped.is_empty() { 0.0 } else { hi - lo };
        Self { max_step_deg, excursion_deg }
    }
}

/// Classify one window's heading channel
pub fn classify(heading: &[f64], config: &CompassConfig) -> CompassQuality {
    let summary = HeadingSummary::from_heading(heading);
    if summary.max_step_deg > config.max_step_deg || summary.excursion_deg > config.max_excursion_deg {
        CompassQuality::Unstable
    } else {
        CompassQuality::Stable
    }
}
