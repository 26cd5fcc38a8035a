//! Sampling and Windowing Constants
//!
//! The reference deployment samples a sonic anemometer and motion package at
//! 10 Hz and reduces fluxes over 20-minute windows. Filter transients near
//! each window edge are trimmed before statistics are computed.

/// Sample rate of every channel (Hz).
pub const SAMPLE_RATE_HZ: f64 = 10.0;

/// Canonical analysis window length (samples).
///
/// 12000 samples = 20 minutes at 10 Hz. Inputs are truncated or padded to
/// this length before processing.
pub const NOMINAL_WINDOW_LEN: usize = 12_000;

/// Seconds trimmed from each end of a processed window.
///
/// The zero-phase filters ring near the window boundaries; 30 s covers
/// several periods of the 1/12 Hz high-pass corner.
pub const CHOP_SECONDS: f64 = 30.0;

/// Samples trimmed from each end of a processed window.
pub const EDGE_SAMPLES: usize = 300;

/// Samples remaining after trimming both edges.
pub const CHOPPED_WINDOW_LEN: usize = NOMINAL_WINDOW_LEN - 2 * EDGE_SAMPLES;

/// Timestamp step that starts a new source segment (seconds).
///
/// Ten sample periods. Independent datasets concatenated into one call are
/// separated by much larger gaps (hours), while datalogger jitter stays far
/// below this.
pub const SEGMENT_GAP_SECONDS: f64 = 1.0;

/// Index of the representative window timestamp for a window of `len` samples
pub const fn representative_index(len: usize) -> usize {
    (len / 2).saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_matches_rate_and_chop() {
        assert_eq!(EDGE_SAMPLES as f64, SAMPLE_RATE_HZ * CHOP_SECONDS);
        assert_eq!(CHOPPED_WINDOW_LEN, 11_400);
        assert_eq!(representative_index(NOMINAL_WINDOW_LEN), 5_999);
    }
}
