//! Constants for SeaFlux Core
//!
//! Centralized, documented constants used throughout the flux engine. Every
//! default in [`crate::config`] is taken from here.
//!
//! ## Organization
//!
//! - **Physics**: geodesy and sonic thermometry
//! - **Sampling**: sample rate, window length, edge trimming
//! - **Filters**: corner frequencies and orders of the filter bank
//! - **Quality**: spike limits and compass stability thresholds

/// Geodetic and thermodynamic constants.
pub mod physics;

/// Sample rate, window length and edge trimming.
pub mod sampling;

/// Filter bank corner frequencies and orders.
pub mod filters;

/// Spike detection ranges and compass stability thresholds.
pub mod quality;

pub use physics::{earth_rate_vertical, normal_gravity, DEG_TO_RAD, KELVIN_OFFSET};

pub use sampling::{
    CHOPPED_WINDOW_LEN, CHOP_SECONDS, EDGE_SAMPLES, NOMINAL_WINDOW_LEN, SAMPLE_RATE_HZ,
    SEGMENT_GAP_SECONDS,
};

pub use filters::{ALTERNATE_CUTOFF_HZ, ALTERNATE_ORDER, PRIMARY_CUTOFF_HZ, PRIMARY_ORDER};

pub use quality::{
    COMPASS_MAX_EXCURSION_DEG, COMPASS_MAX_STEP_DEG, SPIKE_MAX_PASSES, SPIKE_SIGMA_THRESHOLD,
};
