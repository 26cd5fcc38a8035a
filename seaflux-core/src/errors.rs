//! Error Types for Flux Processing
//!
//! ## Design Philosophy
//!
//! SeaFlux separates two very different kinds of failure:
//!
//! 1. **Contract violations** ([`ContractError`]): the caller handed the engine
//!    something it cannot process at all. Channels of different lengths, NaN
//!    samples, an empty record, a configuration whose edge margin swallows the
//!    whole window. These fail fast with `Err` before any window is touched.
//!
//! 2. **Data-quality faults** ([`DataFault`]): the input is well formed but a
//!    window's data cannot be repaired, e.g. a spike at the first sample that
//!    would need extrapolation to replace. These are *not* errors. They travel
//!    inside the window's result (`FluxEstimate::Missing`) and turn its fluxes
//!    into NaN while every other window is processed normally.
//!
//! Both enums are `Copy` and carry only integers and `&'static str`, so they
//! can be stored per window without allocation.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use seaflux_core::{ContractError, FluxEstimate};
//!
//! fn describe(result: Result<FluxEstimate, ContractError>) -> &'static str {
//!     match result {
//!         Ok(FluxEstimate::Values(_)) => "fluxes available",
//!         Ok(FluxEstimate::Missing(_)) => "window degraded to missing",
//!         Err(ContractError::LengthMismatch { .. }) => "fix the caller",
//!         Err(_) => "rejected input",
//!     }
//! }
//! # let _ = describe;
//! ```

use thiserror_no_std::Error;

use crate::channels::Channel;

/// Result type for operations that validate their inputs
pub type ContractResult<T> = Result<T, ContractError>;

/// Caller-contract violations. Raised before any processing starts.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ContractError {
    /// No samples were supplied
    #[error("Input contains no samples")]
    EmptyInput,

    /// A channel does not have the same length as the timestamp channel
    #[error("Channel {channel} has {actual} samples, expected {expected}")]
    LengthMismatch {
        /// Name of the offending channel
        channel: &'static str,
        /// Length of the timestamp channel
        expected: usize,
        /// Length of the offending channel
        actual: usize,
    },

    /// A sample is NaN or infinite
    #[error("Channel {channel} holds a non-finite sample at index {index}")]
    NonFinite {
        /// Name of the offending channel
        channel: &'static str,
        /// Index of the first non-finite sample
        index: usize,
    },

    /// Processing configuration is internally inconsistent
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected
        reason: &'static str,
    },
}

/// Data-quality faults that degrade a single window to missing values
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFault {
    /// A spike could only be replaced by extrapolating past the window edge
    #[error("Spike in {channel} at sample {index} needs extrapolation")]
    Extrapolation {
        /// Channel holding the spike
        channel: Channel,
        /// Window-relative index of the unrecoverable spike
        index: usize,
    },

    /// Every sample of the channel was rejected
    #[error("No valid samples left in {channel}")]
    NoValidSamples {
        /// Channel that was rejected entirely
        channel: Channel,
    },
}

impl DataFault {
    /// Channel the fault was raised on
    pub fn channel(&self) -> Channel {
        match self {
            Self::Extrapolation { channel, .. } | Self::NoValidSamples { channel } => *channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn contract_error_messages_name_the_channel() {
        let err = ContractError::LengthMismatch {
            channel: "accel_z",
            expected: 12000,
            actual: 11999,
        };
        assert_eq!(err.to_string(), "Channel accel_z has 11999 samples, expected 12000");
    }

    #[test]
    fn fault_reports_its_channel() {
        let fault = DataFault::Extrapolation { channel: Channel::RateX, index: 0 };
        assert_eq!(fault.channel(), Channel::RateX);
        assert_eq!(fault.to_string(), "Spike in rate_x at sample 0 needs extrapolation");
    }
}
