//! Measurement infrastructure for cycle-accurate timing.
//!
//! This module provides:
//! - Serialized cycle counter reads with platform-specific implementations
//! - Instrument overhead calibration (correction factor + accuracy bound)
//! - Best-effort cache eviction between trials
//!
//! # Counter selection
//!
//! Counter reads use platform instructions selected at compile time:
//! - **x86_64**: `lfence; rdtsc` (~1ns resolution)
//! - **aarch64**: `isb; mrs cntvct_el0` (resolution varies by SoC)
//! - other targets fall back to `std::time::Instant`
//!
//! All of the measurement logic is written against the [`CycleSource`]
//! trait, so tests can substitute a deterministic counter.

pub mod cache;
mod calibration;
mod counter;

pub use cache::{flush_cache, FlushError, FLUSH_BUFFER_BYTES};
pub use calibration::Calibration;
pub use counter::{cycles_per_ns, read_cycles, CycleSource, Tsc};
