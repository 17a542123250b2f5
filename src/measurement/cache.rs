//! Best-effort cache eviction between measured trials.
//!
//! Residual cache state from a previous trial can bias the next one in
//! either direction: warm data makes it look faster, displaced data makes
//! it look slower. [`flush_cache`] walks a scratch buffer larger than the
//! last-level cache and invalidates every touched line, so each trial
//! starts from a comparably cold cache.
//!
//! The flush is called *before* a measured region, never inside it, so its
//! cost stays out of the reported elapsed time.

use std::collections::TryReserveError;

/// Scratch buffer size; must exceed the largest cache level on the target.
pub const FLUSH_BUFFER_BYTES: usize = 10 * 1024 * 1024;

/// Stride between touched addresses, one cache line.
const CACHE_LINE_BYTES: usize = 64;

/// Error type for cache flush failures.
#[derive(Debug)]
pub enum FlushError {
    /// The scratch buffer could not be allocated.
    Allocation(TryReserveError),
}

impl std::fmt::Display for FlushError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlushError::Allocation(e) => write!(
                f,
                "could not allocate {} byte flush buffer: {}",
                FLUSH_BUFFER_BYTES, e
            ),
        }
    }
}

impl std::error::Error for FlushError {}

/// Evict unrelated data from the cache hierarchy.
///
/// Allocates a scratch buffer, writes into it at cache-line strides to pull
/// the lines into cache, then invalidates each touched line and fences so
/// the invalidations are globally visible before returning. The buffer is
/// released before returning.
///
/// On non-x86_64 targets there is no portable per-line invalidate; the
/// strided writes still displace most of the cache by capacity, followed by
/// a sequentially consistent fence.
///
/// # Errors
///
/// Returns [`FlushError::Allocation`] if the scratch buffer cannot be
/// allocated. Callers should log and continue unflushed rather than abort
/// the timing session.
pub fn flush_cache() -> Result<(), FlushError> {
    let mut buffer: Vec<u8> = Vec::new();
    buffer
        .try_reserve_exact(FLUSH_BUFFER_BYTES)
        .map_err(FlushError::Allocation)?;
    buffer.resize(FLUSH_BUFFER_BYTES, 0);

    let base = buffer.as_mut_ptr();

    #[cfg(target_arch = "x86_64")]
    unsafe {
        use std::arch::x86_64::{_mm_clflush, _mm_mfence};

        for offset in (0..FLUSH_BUFFER_BYTES).step_by(CACHE_LINE_BYTES) {
            // Load the line into cache, then invalidate it
            std::ptr::write_volatile(base.add(offset), offset as u8);
            _mm_clflush(base.add(offset));
        }
        _mm_mfence();
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        for offset in (0..FLUSH_BUFFER_BYTES).step_by(CACHE_LINE_BYTES) {
            unsafe {
                std::ptr::write_volatile(base.add(offset), offset as u8);
            }
        }
        std::sync::atomic::fence(std::sync::atomic::Ordering::SeqCst);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_succeeds() {
        assert!(flush_cache().is_ok());
    }

    #[test]
    fn test_flush_is_repeatable() {
        for _ in 0..3 {
            flush_cache().expect("flush should not fail on a healthy system");
        }
    }
}
