//! Configuration for cycle measurements.

/// Configuration options for [`crate::CycleMeter`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Back-to-back read pairs sampled during calibration (default: 80).
    ///
    /// More pairs give a better chance of catching the true minimum
    /// instrument overhead between interference from interrupts and
    /// cache effects.
    pub calibration_samples: usize,

    /// Trials used by the averaged demo workload (default: 20).
    pub trials: usize,

    /// Flush the cache hierarchy before each measured trial (default: false).
    ///
    /// Enabling this keeps residual cache state from one trial out of the
    /// next one. The flush runs outside the measured region, so its cost
    /// never appears in reported elapsed cycles.
    pub flush_between_trials: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calibration_samples: 80,
            trials: 20,
            flush_between_trials: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behavior() {
        let config = Config::default();
        assert_eq!(config.calibration_samples, 80);
        assert_eq!(config.trials, 20);
        assert!(!config.flush_between_trials);
    }
}
