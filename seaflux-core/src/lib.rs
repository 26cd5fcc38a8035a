//! Motion-corrected eddy-covariance flux engine
//!
//! Turns 10 Hz records from a buoy-mounted sonic anemometer and motion
//! package into earth-frame wind and air-sea fluxes of momentum and heat,
//! one 20-minute window at a time.
//!
//! Pipeline per window:
//! - Condition to exactly 12000 samples
//! - Despike wind, sound, rate and acceleration channels
//! - Classify compass stability and pick the filter path
//! - Estimate attitude and platform velocity, rotate wind to earth axes
//! - Trim 30 s from each edge, reduce to `uw`, `vw`, `wT`
//!
//! ```no_run
//! use seaflux_core::{FluxProcessor, MotionInputs, ProcessingConfig};
//!
//! # let n = 12_000;
//! # let zeros = vec![0.0; n];
//! let inputs = MotionInputs {
//!     timestamps: &zeros,
//!     wind: [&zeros, &zeros, &zeros],
//!     heading: &zeros,
//!     rate: [&zeros, &zeros, &zeros],
//!     accel: [&zeros, &zeros, &zeros],
//!     latitude: &zeros,
//! };
//! let processor = FluxProcessor::new(ProcessingConfig::default())?;
//! let uw = processor.flux_alongwind(&inputs)?;
//! # Ok::<(), seaflux_core::ContractError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod logging;

pub mod channels;
pub mod chop;
pub mod compass;
pub mod config;
pub mod constants;
pub mod despike;
pub mod errors;
pub mod filters;
pub mod flux;
pub mod motion;
pub mod numerics;
pub mod pipeline;
pub mod rotation;
pub mod window;

// Public API
pub use channels::{Channel, MotionInputs};
pub use chop::{EdgeChopper, WindowTimestamp};
pub use compass::CompassQuality;
pub use config::{
    ChannelLimits, CompassConfig, DespikeConfig, FilterConfig, PlatformConfig, ProcessingConfig,
    SamplingConfig,
};
pub use despike::{DespikeReport, SpikeRemover};
pub use errors::{ContractError, ContractResult, DataFault};
pub use filters::{FilterBank, FilterCoefficients, FilterKind, FilterPath};
pub use flux::{FluxEstimate, Fluxes};
pub use motion::{Attitude, MotionCorrector, MotionSolution, MotionWindow};
pub use pipeline::{
    flux_alongwind, flux_and_wind, flux_crosswind, heat_flux, temperature, time_l1, time_l2,
    wind_north, wind_up, wind_west, FluxAndWind, FluxProcessor, PerWindow, WindowReport,
};
pub use rotation::{DirectionCosines, EarthWind};
pub use window::{WindowPlan, WindowSpan};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
