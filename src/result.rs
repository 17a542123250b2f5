//! Measurement report types.

use serde::{Deserialize, Serialize};

use crate::measurement::Calibration;

/// All-ones sentinel reserved for an explicit "measurement failed" value.
///
/// No operation in this crate produces it; it exists so callers layering
/// their own failure signaling on top of raw cycle counts have an agreed
/// value that a real measurement can never plausibly reach.
pub const INVALID_MEASUREMENT: u64 = u64::MAX;

/// Result of an averaged measurement run.
///
/// Carries every per-trial corrected value (useful for eyeballing variance)
/// along with the aggregate mean and a snapshot of the calibration the
/// values were corrected against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementReport {
    /// Calibration in effect when the trials were measured.
    pub calibration: Calibration,

    /// Corrected elapsed cycles for each trial, in execution order.
    pub trials: Vec<u64>,

    /// Arithmetic mean of the trials, truncated to integer cycles.
    pub mean_cycles: u64,
}

impl MeasurementReport {
    /// Fastest trial in the run.
    pub fn min_cycles(&self) -> u64 {
        self.trials.iter().copied().min().unwrap_or(0)
    }

    /// Slowest trial in the run.
    pub fn max_cycles(&self) -> u64 {
        self.trials.iter().copied().max().unwrap_or(0)
    }
}
