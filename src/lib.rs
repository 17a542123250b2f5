//! # cycle-meter
//!
//! Cycle-accurate timing with calibrated instrument overhead correction.
//!
//! This crate reads the hardware cycle counter behind a serializing
//! instruction, self-measures the overhead of the read itself, and reports
//! corrected elapsed cycles for a workload:
//! - **Correction factor**: the minimum delta between back-to-back reads,
//!   subtracted from raw measurements as pure instrument overhead
//! - **Accuracy bound**: the spread between the largest and smallest
//!   calibration delta, quantifying the noise floor of the instrument
//! - Optional cache flushing between trials, and trial averaging with
//!   per-trial values preserved
//!
//! ## Quick Start
//!
//! ```ignore
//! use cycle_meter::CycleMeter;
//!
//! let mut meter = CycleMeter::new(); // calibrates on construction
//! let cycles = meter.measure_once(|| my_function());
//! println!("Elapsed clocks: {}", cycles);
//! ```
//!
//! ## Workloads must be observable
//!
//! The meter routes the workload's return value through
//! `std::hint::black_box`, which is what stops the optimizer from deleting
//! the measured computation. Return the result of the work instead of
//! discarding it:
//!
//! ```ignore
//! // ❌ WRONG - the loop has no observable effect and may be removed
//! meter.measure_once(|| { for i in 0..n { let _ = i * i; } });
//!
//! // ✅ CORRECT - the sum is returned and consumed by the meter
//! meter.measure_once(|| (0..n).fold(0u64, |acc, i| acc.wrapping_add(i * i)));
//! ```
//!
//! ## Caveats
//!
//! Cycle counts are only comparable within one sequential instruction
//! stream on one logical core. The meter is single-threaded by design;
//! give each measuring thread its own calibrated meter. On targets without
//! a cycle counter instruction the crate falls back to
//! `std::time::Instant`, trading precision for portability.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod meter;
mod result;

// Functional modules
pub mod measurement;
pub mod output;
pub mod workload;

// Re-exports for public API
pub use config::Config;
pub use measurement::{
    cycles_per_ns, flush_cache, read_cycles, Calibration, CycleSource, FlushError, Tsc,
};
pub use meter::{CycleMeter, MeasureError};
pub use result::{MeasurementReport, INVALID_MEASUREMENT};

/// Convenience function for a one-shot corrected measurement with default
/// configuration.
///
/// Builds a fresh meter (which calibrates against the hardware counter)
/// and measures a single execution of `workload`. For repeated
/// measurements, build a [`CycleMeter`] once and reuse it so calibration
/// cost is paid once.
///
/// # Arguments
///
/// * `workload` - Zero-argument closure to execute and time; must return
///   its result so the computation stays observable
///
/// # Returns
///
/// Corrected elapsed cycles for the single execution.
pub fn measure<F, T>(workload: F) -> u64
where
    F: FnOnce() -> T,
{
    CycleMeter::new().measure_once(workload)
}
