//! Instrument overhead calibration.
//!
//! Two back-to-back counter reads are never zero cycles apart: the
//! serializing read itself costs time. Calibration measures that cost by
//! sampling many read pairs and keeping the minimum delta as the best
//! estimate of pure instrument overhead (any larger delta includes
//! interference such as interrupts or cache effects). The spread between
//! the largest and smallest delta is the noise floor of the instrument;
//! a large spread means the environment is too unstable to trust
//! subsequent measurements.

use serde::{Deserialize, Serialize};

use super::counter::CycleSource;

/// Calibrated instrument overhead for a cycle source.
///
/// Holds the correction factor subtracted from raw measurements and the
/// accuracy bound quantifying measurement noise. Values are immutable once
/// computed; recalibrating produces a fresh `Calibration` and replaces the
/// old values wholesale.
///
/// A `Calibration` is only obtainable through [`Calibration::run`], so any
/// code holding one is past the uncalibrated state by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calibration {
    /// Minimum observed delta between back-to-back reads.
    correction_factor: u64,
    /// Spread between the maximum and minimum observed delta.
    accuracy: u64,
}

impl Calibration {
    /// Calibrate a cycle source by sampling `samples` back-to-back read pairs.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is zero; the sample count is an internal constant
    /// ([`crate::Config::calibration_samples`]), not user input.
    pub fn run<C: CycleSource>(source: &mut C, samples: usize) -> Self {
        assert!(samples > 0, "calibration requires at least one sample pair");

        // Warmup: drain the pipeline a few times before sampling
        for _ in 0..3 {
            source.serialize();
        }

        let mut min_diff = u64::MAX;
        let mut max_diff = 0u64;

        for _ in 0..samples {
            let first = source.read_serialized();
            let second = source.read_serialized();
            let diff = second.saturating_sub(first);
            if diff < min_diff {
                min_diff = diff;
            }
            if diff > max_diff {
                max_diff = diff;
            }
        }

        Self {
            correction_factor: min_diff,
            accuracy: max_diff - min_diff,
        }
    }

    /// The minimum self-measured overhead of the timing instrument, in
    /// counter ticks.
    pub fn correction_factor(&self) -> u64 {
        self.correction_factor
    }

    /// Spread between best-case and worst-case self-measured overhead.
    ///
    /// Zero means every calibration pair observed the same delta; large
    /// values indicate an unreliable measurement environment.
    pub fn accuracy(&self) -> u64 {
        self.accuracy
    }

    /// Apply the overhead correction to a raw elapsed value.
    ///
    /// The correction factor is subtracted only when the raw value strictly
    /// exceeds it. A raw value at or below the factor is returned unchanged
    /// rather than clamped to zero; this keeps tiny measurements visible
    /// instead of collapsing them, and can never wrap below zero.
    #[inline]
    pub fn correct(&self, raw_elapsed: u64) -> u64 {
        if raw_elapsed > self.correction_factor {
            raw_elapsed - self.correction_factor
        } else {
            raw_elapsed
        }
    }
}
