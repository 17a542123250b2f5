//! JSON serialization for measurement reports.

use crate::result::MeasurementReport;

/// Serialize a MeasurementReport to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// MeasurementReport).
pub fn to_json(report: &MeasurementReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a MeasurementReport to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// MeasurementReport).
pub fn to_json_pretty(report: &MeasurementReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{Calibration, CycleSource};

    struct FixedDelta(u64, u64);
    impl CycleSource for FixedDelta {
        fn serialize(&mut self) {}
        fn read(&mut self) -> u64 {
            self.0 += self.1;
            self.0
        }
    }

    fn make_report() -> MeasurementReport {
        let mut source = FixedDelta(0, 5);
        MeasurementReport {
            calibration: Calibration::run(&mut source, 80),
            trials: vec![120, 110, 130],
            mean_cycles: 120,
        }
    }

    #[test]
    fn test_to_json() {
        let report = make_report();
        let json = to_json(&report).unwrap();
        assert!(json.contains("\"correction_factor\":5"));
        assert!(json.contains("\"mean_cycles\":120"));
    }

    #[test]
    fn test_to_json_pretty() {
        let report = make_report();
        let json = to_json_pretty(&report).unwrap();
        assert!(json.contains('\n')); // Pretty print has newlines
        assert!(json.contains("mean_cycles"));
    }
}
