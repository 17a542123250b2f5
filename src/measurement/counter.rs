//! Platform-specific cycle counter access.
//!
//! Provides serialized counter reads using:
//! - x86_64: `lfence; rdtsc` with compiler fence
//! - aarch64: `isb; mrs cntvct_el0`
//! - Fallback: `std::time::Instant` for other platforms
//!
//! Counter values are monotonically non-decreasing for the lifetime of the
//! process on a given logical core. Counters on different logical cores are
//! not guaranteed to be directly comparable; keep a measurement on one
//! sequential instruction stream.

use std::time::Instant;

/// A source of serialized cycle counter readings.
///
/// The trait splits the two halves of a correct counter read: `serialize`
/// drains the pipeline so no prior instruction is still in flight, and
/// `read` returns the raw counter. Production code uses [`Tsc`]; tests
/// substitute a scripted source to make measurements deterministic.
pub trait CycleSource {
    /// Force all previously issued instructions to retire.
    fn serialize(&mut self);

    /// Read the raw counter value.
    fn read(&mut self) -> u64;

    /// Serialize, then read. This is the only safe way to bracket a
    /// measured region.
    #[inline]
    fn read_serialized(&mut self) -> u64 {
        self.serialize();
        self.read()
    }
}

/// The hardware timestamp counter for the current platform.
///
/// Zero-sized; the actual instruction sequence is selected per target
/// architecture at compile time. On targets with neither `rdtsc` nor
/// `cntvct_el0`, readings come from `Instant` and are nanoseconds rather
/// than cycles (less precise but still usable).
#[derive(Debug, Clone, Copy, Default)]
pub struct Tsc;

impl CycleSource for Tsc {
    #[inline]
    fn serialize(&mut self) {
        serialize_pipeline();
    }

    #[inline]
    fn read(&mut self) -> u64 {
        read_raw()
    }

    #[inline]
    fn read_serialized(&mut self) -> u64 {
        read_cycles()
    }
}

/// Read the cycle counter with appropriate serialization.
///
/// On x86_64, this uses `lfence; rdtsc` to ensure all prior instructions
/// complete before reading the timestamp counter.
///
/// On aarch64, this uses `isb; mrs cntvct_el0` for the virtual timer count.
///
/// On other platforms, falls back to `Instant::now()` based measurement.
#[inline]
pub fn read_cycles() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        read_cycles_x86_64()
    }

    #[cfg(target_arch = "aarch64")]
    {
        read_cycles_aarch64()
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        read_cycles_fallback()
    }
}

/// Issue a pipeline-serializing instruction without reading the counter.
#[inline]
fn serialize_pipeline() {
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    #[cfg(target_arch = "x86_64")]
    unsafe {
        std::arch::asm!("lfence", options(nostack, nomem, preserves_flags));
    }

    #[cfg(target_arch = "aarch64")]
    unsafe {
        std::arch::asm!("isb", options(nostack, nomem, preserves_flags));
    }
}

/// Read the raw counter without a preceding serializing instruction.
#[inline]
fn read_raw() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        let cycles: u64;
        unsafe {
            std::arch::asm!(
                "rdtsc",
                "shl rdx, 32",
                "or rax, rdx",
                out("rax") cycles,
                out("rdx") _,
                options(nostack, nomem),
            );
        }
        cycles
    }

    #[cfg(target_arch = "aarch64")]
    {
        let cycles: u64;
        unsafe {
            std::arch::asm!(
                "mrs {}, cntvct_el0",
                out(reg) cycles,
                options(nostack, nomem),
            );
        }
        cycles
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        read_cycles_fallback()
    }
}

/// x86_64 implementation using lfence + rdtsc.
#[cfg(target_arch = "x86_64")]
#[inline]
fn read_cycles_x86_64() -> u64 {
    // Compiler fence to prevent reordering
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    let cycles: u64;
    unsafe {
        // lfence serializes instruction execution
        // rdtsc reads the timestamp counter
        std::arch::asm!(
            "lfence",
            "rdtsc",
            "shl rdx, 32",
            "or rax, rdx",
            out("rax") cycles,
            out("rdx") _,
            options(nostack, nomem),
        );
    }

    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    cycles
}

/// aarch64 implementation using isb + mrs cntvct_el0.
#[cfg(target_arch = "aarch64")]
#[inline]
fn read_cycles_aarch64() -> u64 {
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    let cycles: u64;
    unsafe {
        // isb ensures all prior instructions are complete
        // mrs reads the virtual timer count register
        std::arch::asm!(
            "isb",
            "mrs {}, cntvct_el0",
            out(reg) cycles,
            options(nostack, nomem),
        );
    }

    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    cycles
}

/// Fallback implementation using std::time::Instant.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline]
fn read_cycles_fallback() -> u64 {
    // Use a static reference point for consistency within a run
    use std::sync::OnceLock;
    static START: OnceLock<Instant> = OnceLock::new();

    let start = START.get_or_init(Instant::now);
    start.elapsed().as_nanos() as u64
}

/// Calibrate the cycle counter against wall-clock time.
///
/// Runs repeated cycles-vs-`Instant` comparisons and returns the median
/// ratio of counter ticks per nanosecond. For a 3 GHz CPU with a TSC at
/// core frequency this is approximately 3.0; ARM virtual timers report
/// much smaller values (~0.024 on a 24 MHz counter).
pub fn cycles_per_ns() -> f64 {
    const CALIBRATION_MS: u64 = 1;
    const CALIBRATION_ITERATIONS: usize = 20;

    let mut ratios = Vec::with_capacity(CALIBRATION_ITERATIONS);

    for _ in 0..CALIBRATION_ITERATIONS {
        let start_cycles = read_cycles();
        let start_time = Instant::now();

        std::thread::sleep(std::time::Duration::from_millis(CALIBRATION_MS));

        let end_cycles = read_cycles();
        let elapsed_nanos = start_time.elapsed().as_nanos() as u64;

        if elapsed_nanos == 0 {
            continue;
        }

        let cycles = end_cycles.saturating_sub(start_cycles);
        ratios.push(cycles as f64 / elapsed_nanos as f64);
    }

    if ratios.is_empty() {
        return 3.0;
    }

    ratios.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = ratios.len() / 2;
    if ratios.len() % 2 == 0 {
        (ratios[mid - 1] + ratios[mid]) / 2.0
    } else {
        ratios[mid]
    }
}
