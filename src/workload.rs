//! Demonstration workloads for the demo binaries and tests.
//!
//! Workloads follow the observe/consume contract of
//! [`CycleMeter::measure_once`](crate::CycleMeter::measure_once): they
//! return their result so the meter can route it through `black_box`,
//! which is what keeps the optimizer from deleting the loop.

/// A long counting loop: sums `0..iterations` with wrapping addition.
///
/// The demo binaries time this with 100 million iterations, mirroring a
/// classic rdtsc measurement workload.
pub fn counting_loop(iterations: u64) -> u64 {
    let mut acc = 0u64;
    for i in 0..iterations {
        acc = acc.wrapping_add(i);
    }
    acc
}
