//! Terminal output formatting with colors.

use colored::Colorize;

use crate::result::MeasurementReport;

/// Format a MeasurementReport for human-readable terminal output.
pub fn format_report(report: &MeasurementReport) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(48);

    output.push_str("cycle-meter\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    output.push_str(&format!(
        "  Correction factor: {} clocks\n",
        report.calibration.correction_factor()
    ));
    output.push_str(&format!(
        "  Measurement accuracy: {} clocks ({})\n",
        report.calibration.accuracy(),
        format_stability(report)
    ));
    output.push('\n');

    for (i, elapsed) in report.trials.iter().enumerate() {
        output.push_str(&format!("  Trial {:>3}: {} clocks\n", i + 1, elapsed));
    }
    output.push('\n');

    output.push_str(&format!(
        "  Spread: {} \u{2013} {} clocks\n",
        report.min_cycles(),
        report.max_cycles()
    ));
    output.push_str(&format!(
        "  {}\n",
        format!("Mean: {} clocks", report.mean_cycles).bold()
    ));

    output.push('\n');
    output.push_str(&sep);
    output.push('\n');

    output
}

/// Label the calibration accuracy relative to the measured mean.
///
/// The accuracy bound is the noise floor of the instrument; when it is a
/// meaningful fraction of what was measured, the numbers should not be
/// trusted trial-to-trial.
fn format_stability(report: &MeasurementReport) -> String {
    let accuracy = report.calibration.accuracy();
    if report.mean_cycles == 0 || accuracy >= report.mean_cycles / 10 {
        "noisy environment".yellow().to_string()
    } else {
        "stable".green().to_string()
    }
}
