//! End-to-end tests of the flows behind the CLI commands.
//!
//! The CLI is a binary crate, so these drive the same calls the commands
//! make through the underlying crates.

// ============================================================================
// compare flow
// ============================================================================

mod compare_tests {
    use qrandom_adapter_sim::SimulatorBackend;
    use qrandom_core::{
        BitSource, Bounds, CircuitSource, DistributionSummary, Method, QubitEmulator,
        RandomNumberGenerator,
    };

    /// Mirrors `build_source` for a `--seed` run.
    async fn source_for(method: Method, seed: u64) -> Box<dyn BitSource> {
        let seed = method.stream_seed(seed);
        match method {
            Method::PseudoRandom => Box::new(QubitEmulator::seeded(seed)),
            Method::Simulate => Box::new(
                CircuitSource::validated(method, Box::new(SimulatorBackend::with_seed(seed)))
                    .await
                    .unwrap(),
            ),
            Method::Real => unreachable!("no hardware in tests"),
        }
    }

    #[tokio::test]
    async fn test_compare_writes_one_summary_per_method() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plots");
        let bounds = Bounds::new(0, 255).unwrap();

        for method in [Method::PseudoRandom, Method::Simulate] {
            let mut generator =
                RandomNumberGenerator::new(source_for(method, 7).await, 8, bounds).unwrap();
            let values = generator.generate_many(5).await.unwrap();
            assert_eq!(values.len(), 5);
            assert!(values.iter().all(|v| bounds.contains(*v)));

            let summary = DistributionSummary::for_method(method, &values).unwrap();
            summary.write_json(&out).unwrap();
        }

        assert!(out.join("pseudo_random.json").is_file());
        assert!(out.join("simulate.json").is_file());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_written_summary_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let bounds = Bounds::new(-10, 10).unwrap();
        let mut generator =
            RandomNumberGenerator::new(source_for(Method::Simulate, 3).await, 6, bounds).unwrap();
        let values = generator.generate_many(20).await.unwrap();

        let summary = DistributionSummary::for_method(Method::Simulate, &values).unwrap();
        let path = summary.write_json(dir.path()).unwrap();

        let json = std::fs::read_to_string(path).unwrap();
        let back: DistributionSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.values, values);
        assert_eq!(back.label, "Statevector Simulator");
        assert_eq!(back.method, Some(Method::Simulate));
        assert!(back.box_stats.min >= -10.0 && back.box_stats.max <= 10.0);
    }

    #[tokio::test]
    async fn test_seeded_runs_repeat() {
        let bounds = Bounds::default();
        for method in [Method::PseudoRandom, Method::Simulate] {
            let mut a = RandomNumberGenerator::new(source_for(method, 99).await, 8, bounds).unwrap();
            let mut b = RandomNumberGenerator::new(source_for(method, 99).await, 8, bounds).unwrap();
            assert_eq!(
                a.generate_many(10).await.unwrap(),
                b.generate_many(10).await.unwrap()
            );
        }
    }

    #[tokio::test]
    async fn test_seeded_compare_methods_are_independent() {
        let bounds = Bounds::new(0, 255).unwrap();
        for seed in [0, 7, 42] {
            let mut emulator =
                RandomNumberGenerator::new(source_for(Method::PseudoRandom, seed).await, 8, bounds)
                    .unwrap();
            let mut simulator =
                RandomNumberGenerator::new(source_for(Method::Simulate, seed).await, 8, bounds)
                    .unwrap();
            let a = emulator.generate_many(32).await.unwrap();
            let b = simulator.generate_many(32).await.unwrap();

            assert_ne!(a, b);
            assert!(
                a.iter().zip(&b).any(|(x, y)| x + y != 255),
                "seed {seed} produced bitwise complements"
            );
        }
    }

    #[test]
    fn test_method_list_parsing() {
        let methods: Vec<Method> = "pseudo-random,simulate,real"
            .split(',')
            .map(|m| m.parse().unwrap())
            .collect();
        assert_eq!(methods, Method::ALL.to_vec());
        assert!("quantum".parse::<Method>().is_err());
    }
}

// ============================================================================
// error paths
// ============================================================================

mod error_tests {
    use qrandom_core::{Bounds, CoreError, QubitEmulator, RandomNumberGenerator};

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = Bounds::new(10, 1).unwrap_err();
        assert!(matches!(err, CoreError::InvalidBounds { lower: 10, upper: 1 }));
        // Surfaces through anyhow the way the commands report it.
        let err = anyhow::Error::from(err);
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_too_many_bits_rejected() {
        let result = RandomNumberGenerator::new(
            Box::new(QubitEmulator::seeded(1)),
            65,
            Bounds::default(),
        );
        assert!(matches!(result, Err(CoreError::TooManyBits(65))));
    }

    #[test]
    fn test_empty_sample_has_no_summary() {
        let err = qrandom_core::DistributionSummary::new("empty", &[]).unwrap_err();
        assert!(matches!(err, CoreError::EmptySample(_)));
    }
}

// ============================================================================
// IBM configuration
// ============================================================================

#[cfg(feature = "ibm")]
mod ibm_tests {
    use qrandom_adapter_ibm::{DEFAULT_BACKEND, IbmConfig, IbmError};

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_config_from_environment() {
        let vars = [("IBM_API_KEY", "key"), ("IBM_SERVICE_CRN", "crn:v1:test")];
        let config = IbmConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.backend, DEFAULT_BACKEND);
        assert_eq!(config.service_crn, "crn:v1:test");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_credentials_error() {
        let err = IbmConfig::from_lookup(lookup(&[("IBM_API_KEY", "key")])).unwrap_err();
        assert!(matches!(err, IbmError::MissingServiceCrn));
    }

    #[test]
    fn test_blank_key_fails_validation() {
        let config = IbmConfig::new("  ", "crn").with_backend("ibm_fez");
        assert!(matches!(config.validate(), Err(IbmError::MissingApiKey)));
        assert!(format!("{config:?}").contains("[REDACTED]"));
    }
}
