//! End-to-end measurement scenarios against a scripted counter.
//!
//! Hardware counters are non-deterministic, so these tests inject a
//! `CycleSource` that replays a fixed tape of counter values. Every
//! corrected result is then exactly predictable.

use cycle_meter::{Calibration, Config, CycleMeter, CycleSource, MeasureError};

/// Replays a pre-recorded tape of counter readings.
struct ScriptedCounter {
    ticks: Vec<u64>,
    next: usize,
}

impl ScriptedCounter {
    fn new(ticks: Vec<u64>) -> Self {
        Self { ticks, next: 0 }
    }
}

impl CycleSource for ScriptedCounter {
    fn serialize(&mut self) {}

    fn read(&mut self) -> u64 {
        let tick = self.ticks[self.next];
        self.next += 1;
        tick
    }
}

/// Tape for a full calibration run: `pairs` read pairs, each `delta` apart,
/// with a gap between pairs so the tape stays monotonic.
fn calibration_tape(delta: u64, pairs: usize) -> Vec<u64> {
    let mut ticks = Vec::with_capacity(pairs * 2);
    let mut now = 1_000u64;
    for _ in 0..pairs {
        ticks.push(now);
        ticks.push(now + delta);
        now += 1_000;
    }
    ticks
}

fn default_samples() -> usize {
    Config::default().calibration_samples
}

#[test]
fn calibration_of_eighty_identical_deltas() {
    let mut source = ScriptedCounter::new(calibration_tape(5, 80));
    let calibration = Calibration::run(&mut source, 80);
    assert_eq!(calibration.correction_factor(), 5);
    assert_eq!(calibration.accuracy(), 0);
}

#[test]
fn calibration_tracks_min_and_spread() {
    let deltas = [9u64, 5, 12, 7, 5, 30, 6, 8];
    let mut ticks = Vec::new();
    let mut now = 1_000u64;
    for &delta in &deltas {
        ticks.push(now);
        ticks.push(now + delta);
        now += 1_000;
    }

    let mut source = ScriptedCounter::new(ticks);
    let calibration = Calibration::run(&mut source, deltas.len());

    assert_eq!(calibration.correction_factor(), 5);
    assert_eq!(calibration.accuracy(), 30 - 5);
    for delta in deltas {
        assert!(calibration.correction_factor() <= delta);
    }
}

#[test]
fn corrected_measurement_subtracts_overhead() {
    // Calibration sees uniform deltas of 5, then the measured region spans
    // raw ticks 100 -> 100000
    let mut ticks = calibration_tape(5, default_samples());
    ticks.extend([100, 100_000]);

    let mut meter = CycleMeter::from_source(ScriptedCounter::new(ticks), Config::default());
    assert_eq!(meter.calibration().correction_factor(), 5);

    let corrected = meter.measure_once(|| ());
    assert_eq!(corrected, 99_895);
}

#[test]
fn raw_elapsed_at_or_below_factor_is_reported_unchanged() {
    // Raw elapsed 3 with correction factor 5: the guard must report the
    // raw value, never a wrapped near-maximum quantity
    let mut ticks = calibration_tape(5, default_samples());
    ticks.extend([100, 103]);
    ticks.extend([200, 205]);

    let mut meter = CycleMeter::from_source(ScriptedCounter::new(ticks), Config::default());

    assert_eq!(meter.measure_once(|| ()), 3);
    // Exactly at the factor: still unchanged
    assert_eq!(meter.measure_once(|| ()), 5);
}

#[test]
fn averaged_equals_truncated_mean_of_single_measurements() {
    // Three trials with raw deltas 10, 11, 13 against a factor of 5 give
    // corrected values 5, 6, 8; the truncated mean is 19 / 3 = 6
    let mut ticks = calibration_tape(5, default_samples());
    for (start, delta) in [(10_000u64, 10u64), (20_000, 11), (30_000, 13)] {
        ticks.push(start);
        ticks.push(start + delta);
    }

    let mut averaged_meter =
        CycleMeter::from_source(ScriptedCounter::new(ticks.clone()), Config::default());
    let report = averaged_meter.measure_averaged(3, || ()).unwrap();

    assert_eq!(report.trials, vec![5, 6, 8]);
    assert_eq!(report.mean_cycles, 6);

    // The same tape measured one trial at a time must agree exactly
    let mut single_meter =
        CycleMeter::from_source(ScriptedCounter::new(ticks), Config::default());
    let singles: Vec<u64> = (0..3).map(|_| single_meter.measure_once(|| ())).collect();
    let truncated_mean = singles.iter().sum::<u64>() / singles.len() as u64;

    assert_eq!(report.trials, singles);
    assert_eq!(report.mean_cycles, truncated_mean);
}

#[test]
fn zero_trials_fails_fast_without_measuring() {
    // Tape only covers calibration; a rejected run must not read further
    let ticks = calibration_tape(5, default_samples());
    let mut meter = CycleMeter::from_source(ScriptedCounter::new(ticks), Config::default());

    let result = meter.measure_averaged(0, || ());
    assert_eq!(result.unwrap_err(), MeasureError::ZeroTrials);
}

#[test]
fn report_snapshots_the_calibration_in_effect() {
    let mut ticks = calibration_tape(7, default_samples());
    ticks.extend([500, 600]);

    let mut meter = CycleMeter::from_source(ScriptedCounter::new(ticks), Config::default());
    let report = meter.measure_averaged(1, || ()).unwrap();

    assert_eq!(report.calibration, meter.calibration());
    assert_eq!(report.calibration.correction_factor(), 7);
}
