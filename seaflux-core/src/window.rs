//! Window Conditioner
//!
//! ## Overview
//!
//! Flux statistics are defined over windows of exactly `window_len` samples
//! (12000 = 20 minutes at 10 Hz). Callers hand over records of any length,
//! possibly several independent datasets back to back. The conditioner turns
//! that into a [`WindowPlan`]: an ordered list of [`WindowSpan`]s, each of
//! which can cut any channel down to a canonical window.
//!
//! ## Rules
//!
//! ```text
//! timestamps ──► segments (split on gaps or time reversals)
//!                   │
//!                   ├─ len ≥ N : len / N full windows, tail residual dropped
//!                   └─ len < N : one window, last sample replicated up to N
//! ```
//!
//! A window never spans two segments, and the head of a segment is always
//! kept: for a 12009-sample dataset the window is samples `[0, 12000)`.
//!
//! The plan only stores offsets, so conditioning happens lazily per window
//! and windows can be materialized on different threads.

use alloc::vec::Vec;
use core::ops::Range;

use crate::{
    channels::check_timestamps,
    config::SamplingConfig,
    errors::ContractResult,
};

/// One canonical window inside the caller's record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpan {
    /// Position of the window in the output sequence
    pub index: usize,
    /// Source segment the window was cut from
    pub segment: usize,
    /// Offset of the first sample in the caller's record
    pub start: usize,
    /// Real samples available; the rest of the window is padding
    pub available: usize,
}

impl WindowSpan {
    /// Number of replicated samples appended to reach the window length
    pub fn padding(&self, window_len: usize) -> usize {
        window_len.saturating_sub(self.available)
    }

    /// Range of the caller's record covered by this window
    pub fn source_range(&self) -> Range<usize> {
        self.start..self.start + self.available
    }

    /// Cut `channel` to exactly `window_len` samples
    pub fn condition(&self, channel: &[f64], window_len: usize) -> Vec<f64> {
        let source = &channel[self.source_range()];
        let mut out = Vec::with_capacity(window_len);
        out.extend_from_slice(&source[..source.len().min(window_len)]);
        if let Some(&last) = source.last() {
            out.resize(window_len, last);
        }
        out
    }
}

/// Ordered windows of one call
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPlan {
    spans: Vec<WindowSpan>,
    window_len: usize,
}

impl WindowPlan {
    /// Plan windows from the caller's timestamp channel
    pub fn from_timestamps(timestamps: &[f64], sampling: &SamplingConfig) -> ContractResult<Self> {
        check_timestamps(timestamps)?;
        let window_len = sampling.window_len;

        let mut spans = Vec::new();
        for (segment, range) in segments(timestamps, sampling.segment_gap_seconds)
            .into_iter()
            .enumerate()
        {
            let len = range.len();
            if len < window_len {
                spans.push(WindowSpan {
                    index: spans.len(),
                    segment,
                    start: range.start,
                    available: len,
                });
                continue;
            }
            for k in 0..len / window_len {
                spans.push(WindowSpan {
                    index: spans.len(),
                    segment,
                    start: range.start + k * window_len,
                    available: window_len,
                });
            }
        }

        Ok(Self { spans, window_len })
    }

    /// Windows in output order
    pub fn spans(&self) -> &[WindowSpan] {
        &self.spans
    }

    /// Number of windows
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// True when the plan holds no windows
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Canonical window length
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Condition a whole channel into one vector per window
    pub fn condition(&self, channel: &[f64]) -> Vec<Vec<f64>> {
        self.spans
            .iter()
            .map(|span| span.condition(channel, self.window_len))
            .collect()
    }
}

/// Split a record into contiguous segments.
///
/// A new segment starts where the timestamp step is negative or larger than
/// `gap_seconds`.
pub fn segments(timestamps: &[f64], gap_seconds: f64) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    if timestamps.is_empty() {
        return out;
    }
    let mut start = 0;
    for i in 1..timestamps.len() {
        let step = timestamps[i] - timestamps[i - 1];
        if step < 0.0 || step > gap_seconds {
            out.push(start..i);
            start = i;
        }
    }
    out.push(start..timestamps.len());
    out
}
