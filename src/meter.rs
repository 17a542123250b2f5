//! The calibrated cycle meter.

use std::hint::black_box;

use crate::config::Config;
use crate::measurement::{flush_cache, Calibration, CycleSource, Tsc};
use crate::result::MeasurementReport;

/// Error type for measurement failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasureError {
    /// An averaged measurement was requested with zero trials.
    ZeroTrials,
}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureError::ZeroTrials => {
                write!(f, "averaged measurement requires at least one trial")
            }
        }
    }
}

impl std::error::Error for MeasureError {}

/// A calibrated timer for counting elapsed CPU cycles around a workload.
///
/// Constructing a meter runs calibration against its cycle source, so a
/// `CycleMeter` is calibrated by the time you can call anything on it;
/// there is no uncalibrated state to misuse. The calibration is threaded
/// into every corrected measurement and replaced wholesale by
/// [`recalibrate`](Self::recalibrate).
///
/// Measurements are strictly sequential on the calling thread. Cycle
/// counts are only comparable within one sequential instruction stream on
/// one logical core; a meter must not be shared across threads (the
/// `&mut self` receivers enforce per-thread ownership, and each thread
/// wanting to measure should build and calibrate its own meter).
///
/// # Example
///
/// ```ignore
/// use cycle_meter::CycleMeter;
///
/// let mut meter = CycleMeter::new();
/// let cycles = meter.measure_once(|| expensive_function());
/// println!("Elapsed clocks: {}", cycles);
/// ```
#[derive(Debug, Clone)]
pub struct CycleMeter<C: CycleSource = Tsc> {
    source: C,
    calibration: Calibration,
    config: Config,
}

impl CycleMeter<Tsc> {
    /// Create a meter over the hardware counter and calibrate it.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a meter over the hardware counter with explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self::from_source(Tsc, config)
    }
}

impl Default for CycleMeter<Tsc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CycleSource> CycleMeter<C> {
    /// Create a meter over an arbitrary cycle source and calibrate it.
    ///
    /// Tests use this with a scripted source to make measurements
    /// deterministic.
    pub fn from_source(mut source: C, config: Config) -> Self {
        let calibration = Calibration::run(&mut source, config.calibration_samples);
        Self {
            source,
            calibration,
            config,
        }
    }

    /// The calibration currently applied to corrected measurements.
    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Re-run calibration, replacing the stored correction factor and
    /// accuracy bound with fresh values.
    pub fn recalibrate(&mut self) {
        self.calibration = Calibration::run(&mut self.source, self.config.calibration_samples);
    }

    /// Measure one execution of `workload`, returning corrected elapsed
    /// cycles.
    ///
    /// The pipeline is serialized before the start read so out-of-order
    /// execution cannot bleed prior unrelated work into the window. The
    /// workload's return value is routed through `black_box`, so the
    /// computation cannot be proven dead and optimized away; workloads
    /// should return their result rather than discard it internally.
    #[inline]
    pub fn measure_once<F, T>(&mut self, workload: F) -> u64
    where
        F: FnOnce() -> T,
    {
        self.source.serialize();
        let start = self.source.read_serialized();
        black_box(workload());
        let end = self.source.read_serialized();
        self.calibration.correct(end.saturating_sub(start))
    }

    /// Measure `trials` executions of `workload` and report per-trial
    /// corrected cycles plus the truncating integer mean.
    ///
    /// When [`Config::flush_between_trials`] is set, the cache hierarchy is
    /// flushed before each trial, outside the measured region. A failed
    /// flush is logged to stderr and the trial proceeds unflushed; it never
    /// aborts the run.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::ZeroTrials`] if `trials` is zero.
    pub fn measure_averaged<F, T>(
        &mut self,
        trials: usize,
        mut workload: F,
    ) -> Result<MeasurementReport, MeasureError>
    where
        F: FnMut() -> T,
    {
        if trials == 0 {
            return Err(MeasureError::ZeroTrials);
        }

        let mut samples = Vec::with_capacity(trials);
        let mut total = 0u64;

        for _ in 0..trials {
            if self.config.flush_between_trials {
                if let Err(e) = flush_cache() {
                    eprintln!("[cycle-meter] cache flush skipped: {}", e);
                }
            }

            let elapsed = self.measure_once(&mut workload);
            total = total.saturating_add(elapsed);
            samples.push(elapsed);
        }

        Ok(MeasurementReport {
            calibration: self.calibration,
            trials: samples,
            mean_cycles: total / trials as u64,
        })
    }
}
