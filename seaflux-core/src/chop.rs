//! Edge Chopper & Window Timestamp Selector
//!
//! Zero-phase filtering still rings near the window edges, so every
//! per-sample output drops `edge` samples from both ends before it is
//! reported or reduced to fluxes.

use alloc::vec::Vec;

use crate::{config::SamplingConfig, rotation::EarthWind};

/// Timestamps reported for one window
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowTimestamp {
    /// Single representative time of the window
    pub representative: f64,
    /// Per-sample times of the chopped interior
    pub samples: Vec<f64>,
}

/// Trims window edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeChopper {
    edge: usize,
    representative_index: usize,
}

impl EdgeChopper {
    /// Chopper for the configured sampling
    pub fn new(sampling: &SamplingConfig) -> Self {
        Self {
            edge: sampling.edge_samples(),
            representative_index: sampling.representative_index(),
        }
    }

    /// Samples dropped at each end
    pub fn edge(&self) -> usize {
        self.edge
    }

    /// Length left after chopping a series of `len` samples
    pub fn chopped_len(&self, len: usize) -> usize {
        len.saturating_sub(2 * self.edge)
    }

    /// Drop the edges of one series
    pub fn chop(&self, series: &[f64]) -> Vec<f64> {
        let end = series.len().saturating_sub(self.edge);
        series.get(self.edge..end).map_or_else(Vec::new, <[f64]>::to_vec)
    }

    /// Drop the edges of all three wind components
    pub fn chop_wind(&self, wind: &EarthWind) -> EarthWind {
        EarthWind {
            north: self.chop(&wind.north),
            west: self.chop(&wind.west),
            up: self.chop(&wind.up),
        }
    }

    /// Representative and chopped timestamps of a conditioned window
    pub fn timestamps(&self, window: &[f64]) -> WindowTimestamp {
        WindowTimestamp {
            representative: window_timestamp(window, self.representative_index),
            samples: self.chop(window),
        }
    }
}

/// Timestamp at `index`, falling back to the last sample for short windows
pub fn window_timestamp(window: &[f64], index: usize) -> f64 {
    window
        .get(index)
        .or_else(|| window.last())
        .copied()
        .unwrap_or(f64::NAN)
}
