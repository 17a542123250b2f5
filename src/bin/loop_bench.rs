//! Single-measurement demo: calibrate, then time one long counting loop.

use cycle_meter::workload::counting_loop;
use cycle_meter::{cycles_per_ns, CycleMeter};

const LOOP_ITERATIONS: u64 = 100_000_000;

fn main() {
    println!("Calibrating the cycle counter...");
    let mut meter = CycleMeter::new();

    let calibration = meter.calibration();
    println!(
        "Correction factor {} clocks",
        calibration.correction_factor()
    );
    println!(
        "Measurement Accuracy (in clocks) : {}",
        calibration.accuracy()
    );

    let elapsed = meter.measure_once(|| counting_loop(LOOP_ITERATIONS));
    println!("Elapsed clocks for loop: {}", elapsed);

    let ratio = cycles_per_ns();
    println!(
        "Approximate wall time: {:.1} ms ({:.3} clocks/ns)",
        elapsed as f64 / ratio / 1e6,
        ratio
    );
}
