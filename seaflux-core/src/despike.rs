//! Spike Remover
//!
//! ## Overview
//!
//! Sonic anemometers and motion packages occasionally emit single-sample
//! glitches: a dropped bit, a fill value such as `99999.9`, an acoustic path
//! blocked by spray. Left in, one such sample dominates a 20-minute covariance.
//!
//! ## Detection
//!
//! A sample is a spike when either test fails:
//!
//! 1. **Physical range**: outside the channel family's acceptance range
//!    ([`ChannelLimits`](crate::config::ChannelLimits)).
//! 2. **Statistical outlier**: further than `sigma_threshold` population
//!    standard deviations from the mean of the samples not yet flagged.
//!
//! The statistical test repeats until a pass flags nothing new, so a fill
//! value removed in one pass no longer widens the limit for the next.
//!
//! ## Replacement
//!
//! Each spike is replaced by linear interpolation between the nearest valid
//! samples before and after it. Runs of consecutive spikes are bridged by one
//! straight line.
//!
//! ```text
//!  value
//!    │        x  (spike)
//!    │   o             o
//!    │ o   o ─ ─ ─ ─ o   o      o valid, ─ interpolated
//!    └──────────────────────► sample
//! ```
//!
//! ## Extrapolation Fault
//!
//! A spike with no valid sample on one side, i.e. at the first or last sample
//! or in a run touching a window edge, cannot be interpolated. Rather than
//! invent data the remover reports a [`DataFault`]; the pipeline then marks
//! that window's fluxes as missing and carries on with the next window.

use alloc::vec::Vec;

use heapless::Vec as FixedVec;

use crate::{
    channels::{Channel, CHANNEL_COUNT},
    config::DespikeConfig,
    constants::quality::SPIKE_MAX_PASSES,
    errors::DataFault,
    numerics::{lerp, mean, std_dev},
};

/// Outcome of despiking one channel
#[derive(Debug, Clone, PartialEq)]
pub struct Despiked {
    /// Cleaned samples, same length as the input
    pub samples: Vec<f64>,
    /// Number of samples that were replaced
    pub replaced: usize,
}

/// Per-window despike bookkeeping across all channels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DespikeReport {
    replaced: FixedVec<(Channel, usize), CHANNEL_COUNT>,
    faults: FixedVec<DataFault, CHANNEL_COUNT>,
}

impl DespikeReport {
    /// Record a successfully cleaned channel
    pub fn record(&mut self, channel: Channel, replaced: usize) {
        // one entry per channel, capacity covers every channel
        let _ = self.replaced.push((channel, replaced));
    }

    /// Record a channel that could not be cleaned
    pub fn record_fault(&mut self, fault: DataFault) {
        let _ = self.faults.push(fault);
    }

    /// Samples replaced in `channel` (zero when not despiked)
    pub fn replaced(&self, channel: Channel) -> usize {
        self.replaced
            .iter()
            .find(|(c, _)| *c == channel)
            .map_or(0, |(_, n)| *n)
    }

    /// Samples replaced across all channels
    pub fn total_replaced(&self) -> usize {
        self.replaced.iter().map(|(_, n)| n).sum()
    }

    /// Faults in detection order
    pub fn faults(&self) -> &[DataFault] {
        &self.faults
    }

    /// First fault on a wind, rate or acceleration channel
    pub fn motion_fault(&self) -> Option<DataFault> {
        self.faults.iter().copied().find(|f| f.channel() != Channel::Sound)
    }

    /// Fault on the sound-speed channel, if any
    pub fn sound_fault(&self) -> Option<DataFault> {
        self.faults.iter().copied().find(|f| f.channel() == Channel::Sound)
    }
}

/// Stateless spike detector and interpolator
#[derive(Debug, Clone, Copy)]
pub struct SpikeRemover {
    config: DespikeConfig,
}

impl Default for SpikeRemover {
    fn default() -> Self {
        Self::new(DespikeConfig::default())
    }
}

impl SpikeRemover {
    /// Create a remover with the given thresholds
    pub fn new(config: DespikeConfig) -> Self {
        Self { config }
    }

    /// Flag spikes in `samples` for `channel`
    pub fn detect(&self, channel: Channel, samples: &[f64]) -> Vec<bool> {
        let (lo, hi) = self
            .config
            .limits
            .range(channel)
            .unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
        let mut spikes: Vec<bool> = samples.iter().map(|&x| x < lo || x > hi).collect();

        for _ in 0..SPIKE_MAX_PASSES {
            let kept: Vec<f64> = samples
                .iter()
                .zip(&spikes)
                .filter(|(_, &spike)| !spike)
                .map(|(&x, _)| x)
                .collect();
            if kept.is_empty() {
                break;
            }
            let centre = mean(&kept);
            let limit = self.config.sigma_threshold * std_dev(&kept);

            let mut flagged = false;
            for (spike, &x) in spikes.iter_mut().zip(samples) {
                if !*spike && libm::fabs(x - centre) > limit {
                    *spike = true;
                    flagged = true;
                }
            }
            if !flagged {
                break;
            }
        }
        spikes
    }

    /// Detect and replace spikes in one channel of one window
    pub fn despike(&self, channel: Channel, samples: &[f64]) -> Result<Despiked, DataFault> {
        let spikes = self.detect(channel, samples);
        let replaced = spikes.iter().filter(|&&s| s).count();
        if replaced == 0 {
            return Ok(Despiked { samples: samples.to_vec(), replaced });
        }

        let first_valid = spikes.iter().position(|&s| !s);
        let last_valid = spikes.iter().rposition(|&s| !s);
        let (first_valid, last_valid) = match (first_valid, last_valid) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(DataFault::NoValidSamples { channel }),
        };
        if first_valid > 0 {
            return Err(DataFault::Extrapolation { channel, index: 0 });
        }
        if last_valid < samples.len() - 1 {
            return Err(DataFault::Extrapolation { channel, index: last_valid + 1 });
        }

        // every spike now sits strictly between two valid samples
        let mut out = samples.to_vec();
        let mut previous = 0;
        let mut i = 1;
        while i < samples.len() {
            if !spikes[i] {
                previous = i;
                i += 1;
                continue;
            }
            let mut next = i;
            while spikes[next] {
                next += 1;
            }
            for (j, value) in out.iter_mut().enumerate().take(next).skip(i) {
                *value = lerp(
                    previous as f64,
                    samples[previous],
                    next as f64,
                    samples[next],
                    j as f64,
                );
            }
            i = next;
        }

        Ok(Despiked { samples: out, replaced })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use proptest::prelude::*;

    fn wavy(n: usize) -> Vec<f64> {
        (0..n).map(|i| 5.0 + libm::sin(i as f64 * 0.1)).collect()
    }

    #[test]
    fn clean_channel_is_untouched() {
        let data = wavy(500);
        let out = SpikeRemover::default().despike(Channel::WindX, &data).unwrap();
        assert_eq!(out.replaced, 0);
        assert_eq!(out.samples, data);
    }

    #[test]
    fn interior_spike_is_interpolated() {
        let mut data = wavy(500);
        data[200] = 99_999.9;
        let out = SpikeRemover::default().despike(Channel::RateY, &data).unwrap();
        assert_eq!(out.replaced, 1);
        let expected = 0.5 * (data[199] + data[201]);
        assert!((out.samples[200] - expected).abs() < 1e-12);
    }

    #[test]
    fn fill_value_does_not_mask_smaller_glitch() {
        let mut data: Vec<f64> = (0..12_000).map(|i| 7.0 + libm::sin(i as f64 * 0.01)).collect();
        data[6_000] = 99_999.9;
        data[3_000] = 40.0;
        let out = SpikeRemover::default().despike(Channel::WindX, &data).unwrap();
        assert_eq!(out.replaced, 2);
        let expected = 0.5 * (data[2_999] + data[3_001]);
        assert!((out.samples[3_000] - expected).abs() < 1e-12);
        assert!((out.samples[6_000] - 0.5 * (data[5_999] + data[6_001])).abs() < 1e-12);
    }

    #[test]
    fn spike_run_is_bridged_linearly() {
        let mut data: Vec<f64> = (0..100).map(|i| i as f64 * 0.5).collect();
        for v in &mut data[11..14] {
            *v = 1e6;
        }
        let out = SpikeRemover::default().despike(Channel::WindZ, &data).unwrap();
        assert_eq!(out.replaced, 3);
        assert_eq!(&out.samples[10..15], &[5.0, 5.5, 6.0, 6.5, 7.0]);
    }

    #[test]
    fn leading_spike_needs_extrapolation() {
        let mut data = wavy(500);
        data[0] = 99_999.9;
        let fault = SpikeRemover::default().despike(Channel::RateX, &data).unwrap_err();
        assert_eq!(fault, DataFault::Extrapolation { channel: Channel::RateX, index: 0 });
    }

    #[test]
    fn trailing_spike_needs_extrapolation() {
        let mut data = wavy(500);
        data[499] = -99_999.9;
        let fault = SpikeRemover::default().despike(Channel::AccelX, &data).unwrap_err();
        assert_eq!(fault, DataFault::Extrapolation { channel: Channel::AccelX, index: 499 });
    }

    #[test]
    fn out_of_range_sound_is_a_spike() {
        let mut data = vec![34_500.0; 50];
        data[25] = 20_000.0;
        let flags = SpikeRemover::default().detect(Channel::Sound, &data);
        assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
        assert!(flags[25]);
    }

    #[test]
    fn fully_invalid_channel_is_reported() {
        let data = vec![1e6; 10];
        let fault = SpikeRemover::default().despike(Channel::WindY, &data).unwrap_err();
        assert_eq!(fault, DataFault::NoValidSamples { channel: Channel::WindY });
    }

    #[test]
    fn report_separates_sound_and_motion_faults() {
        let mut report = DespikeReport::default();
        report.record(Channel::WindX, 2);
        report.record(Channel::RateZ, 1);
        report.record_fault(DataFault::NoValidSamples { channel: Channel::Sound });
        assert_eq!(report.total_replaced(), 3);
        assert_eq!(report.replaced(Channel::RateZ), 1);
        assert_eq!(report.replaced(Channel::AccelX), 0);
        assert!(report.motion_fault().is_none());
        assert_eq!(report.sound_fault().map(|f| f.channel()), Some(Channel::Sound));

        report.record_fault(DataFault::Extrapolation { channel: Channel::AccelX, index: 0 });
        assert_eq!(report.faults().len(), 2);
        assert_eq!(report.motion_fault().map(|f| f.channel()), Some(Channel::AccelX));
    }

    proptest! {
        #[test]
        fn output_length_matches_input(values in prop::collection::vec(-20.0f64..20.0, 3..300)) {
            match SpikeRemover::default().despike(Channel::WindX, &values) {
                Ok(out) => {
                    prop_assert_eq!(out.samples.len(), values.len());
                    prop_assert!(out.samples.iter().all(|v| v.is_finite()));
                }
                Err(fault) => prop_assert_eq!(fault.channel(), Channel::WindX),
            }
        }
    }
}
