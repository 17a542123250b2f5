//! Averaged-measurement demo: flush the cache before each trial, run the
//! counting loop repeatedly, and report per-trial and mean cycles.

use cycle_meter::workload::counting_loop;
use cycle_meter::{output, Config, CycleMeter};

const LOOP_ITERATIONS: u64 = 100_000_000;

fn main() {
    println!("Calibrating the cycle counter...");
    let config = Config {
        flush_between_trials: true,
        ..Config::default()
    };
    let trials = config.trials;
    let mut meter = CycleMeter::with_config(config);

    let calibration = meter.calibration();
    println!(
        "Correction factor {} clocks",
        calibration.correction_factor()
    );
    println!(
        "Measurement Accuracy (in clocks) : {}",
        calibration.accuracy()
    );

    let report = meter
        .measure_averaged(trials, || counting_loop(LOOP_ITERATIONS))
        .expect("trial count is a fixed nonzero constant");

    for (i, elapsed) in report.trials.iter().enumerate() {
        println!("Iteration {} - Elapsed clocks: {}", i + 1, elapsed);
    }
    println!("Average clocks for loop: {}", report.mean_cycles);

    println!();
    println!("{}", output::terminal::format_report(&report));
}
