//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use crate::lifecycle::RollbackTrigger;
use proptest::prelude::*;

fn arb_valid_config() -> impl Strategy<Value = LifecycleConfig> {
    (
        1e-4f64..5.0,  // psi_threshold
        1usize..100,   // bins
        1usize..1000,  // min_live_samples
        1u64..100_000, // interval_seconds
        1e-4f64..5.0,  // shift threshold
    )
        .prop_map(|(psi_threshold, bins, min_live_samples, interval_seconds, shift)| {
            LifecycleConfig {
                drift: DriftConfig { psi_threshold, bins, min_live_samples, ..Default::default() },
                scheduler: SchedulerConfig { interval_seconds },
                rollback: RollbackConfig {
                    trigger: RollbackTrigger::PredictionShift { threshold: shift, min_samples: 20 },
                },
                ..Default::default()
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_config_passes(config in arb_valid_config()) {
        prop_assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn prop_non_positive_threshold_fails(threshold in -10.0f64..=0.0) {
        let mut config = LifecycleConfig::default();
        config.drift.psi_threshold = threshold;
        prop_assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidPsiThreshold(_))
        ));
    }

    #[test]
    fn prop_yaml_roundtrip(config in arb_valid_config()) {
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: LifecycleConfig = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
