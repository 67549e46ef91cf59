//! CLI command parsing and utility tests.
//!
//! The CLI is a binary crate, so argument parsing is tested against a
//! mirror of its clap structs, and helpers against the crates they call.

// ============================================================================
// Circuit arguments
// ============================================================================

mod circuit_args {
    use qbatch_adapter_sim::{ParseCircuitError, SimCircuit};

    #[test]
    fn test_name_only_defaults_width() {
        let c: SimCircuit = "bell".parse().unwrap();
        assert_eq!(c.name, "bell");
        assert_eq!(c.num_qubits, 2);
    }

    #[test]
    fn test_name_and_width() {
        let c: SimCircuit = "ghz:5".parse().unwrap();
        assert_eq!(c.num_qubits, 5);
    }

    #[test]
    fn test_bad_width() {
        assert!(matches!(
            "ghz:x".parse::<SimCircuit>(),
            Err(ParseCircuitError::InvalidQubits(_))
        ));
        assert!(matches!(
            ":3".parse::<SimCircuit>(),
            Err(ParseCircuitError::EmptyName)
        ));
    }
}

// ============================================================================
// Sweep arguments
// ============================================================================

mod sweep_args {
    use qbatch_params::Sweep;

    /// Equivalent to commands::common::parse_sweep for the linear form.
    fn linear(key: &str, start: f64, stop: f64, n: usize) -> Sweep {
        Sweep::linspace(key, start, stop, n).unwrap()
    }

    #[test]
    fn test_linear_endpoints() {
        let points = linear("theta", 0.0, 2.0, 3).resolvers();
        let values: Vec<f64> = points.iter().map(|p| p.get("theta").unwrap()).collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_single_point_linear() {
        let points = linear("theta", 0.5, 2.0, 1).resolvers();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].get("theta"), Some(0.5));
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(Sweep::values("", [1.0]).is_err());
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "qbatch")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,
        #[arg(long, global = true)]
        config: Option<String>,
        #[arg(long, global = true)]
        run_name: Option<String>,
        #[arg(long, global = true)]
        device_config: Option<String>,
        #[arg(long, global = true)]
        seed: Option<u64>,
        #[arg(long, global = true)]
        blocking: bool,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Run {
            #[arg(short, long)]
            circuit: String,
            #[arg(short, long)]
            sweep: Option<String>,
            #[arg(short, long, default_value = "1000")]
            repetitions: u32,
            #[arg(short, long, default_value = "table")]
            format: String,
        },
        Batch {
            #[arg(short, long, required = true)]
            circuit: Vec<String>,
            #[arg(short, long)]
            sweep: Vec<String>,
            #[arg(short, long, value_delimiter = ',', default_value = "1000")]
            repetitions: Vec<u32>,
            #[arg(short, long, default_value = "table")]
            format: String,
        },
        Config,
    }

    #[test]
    fn test_run_defaults() {
        let cli = TestCli::try_parse_from(["qbatch", "run", "-c", "bell"]).unwrap();
        match cli.command {
            TestCommands::Run {
                circuit,
                sweep,
                repetitions,
                format,
            } => {
                assert_eq!(circuit, "bell");
                assert!(sweep.is_none());
                assert_eq!(repetitions, 1000);
                assert_eq!(format, "table");
            }
            _ => panic!("expected Run"),
        }
        assert!(!cli.blocking);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_run_all_options() {
        let cli = TestCli::try_parse_from([
            "qbatch",
            "run",
            "--circuit",
            "ghz:3",
            "--sweep",
            "theta=0:1:5",
            "-r",
            "250",
            "--seed",
            "7",
            "--blocking",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(7));
        assert!(cli.blocking);
        match cli.command {
            TestCommands::Run {
                sweep, repetitions, ..
            } => {
                assert_eq!(sweep.as_deref(), Some("theta=0:1:5"));
                assert_eq!(repetitions, 250);
            }
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn test_run_requires_circuit() {
        assert!(TestCli::try_parse_from(["qbatch", "run"]).is_err());
    }

    #[test]
    fn test_batch_uniform_repetitions() {
        let cli =
            TestCli::try_parse_from(["qbatch", "batch", "-c", "a", "-c", "b", "-r", "3"]).unwrap();
        match cli.command {
            TestCommands::Batch {
                circuit,
                repetitions,
                sweep,
                ..
            } => {
                assert_eq!(circuit, vec!["a", "b"]);
                assert_eq!(repetitions, vec![3]);
                assert!(sweep.is_empty());
            }
            _ => panic!("expected Batch"),
        }
    }

    #[test]
    fn test_batch_per_circuit_repetitions() {
        let cli = TestCli::try_parse_from([
            "qbatch",
            "batch",
            "-c",
            "a",
            "-c",
            "b",
            "--repetitions",
            "2,5",
            "-s",
            "unit",
            "-s",
            "x=1,2",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Batch {
                repetitions, sweep, ..
            } => {
                assert_eq!(repetitions, vec![2, 5]);
                assert_eq!(sweep, vec!["unit", "x=1,2"]);
            }
            _ => panic!("expected Batch"),
        }
    }

    #[test]
    fn test_batch_requires_circuit() {
        assert!(TestCli::try_parse_from(["qbatch", "batch", "-r", "3"]).is_err());
    }

    #[test]
    fn test_batch_rejects_non_numeric_repetitions() {
        assert!(TestCli::try_parse_from(["qbatch", "batch", "-c", "a", "-r", "many"]).is_err());
    }

    #[test]
    fn test_global_identity_flags() {
        let cli = TestCli::try_parse_from([
            "qbatch",
            "config",
            "--run-name",
            "nightly",
            "--device-config",
            "config-a",
            "--config",
            "qbatch.yaml",
        ])
        .unwrap();
        assert!(matches!(cli.command, TestCommands::Config));
        assert_eq!(cli.run_name.as_deref(), Some("nightly"));
        assert_eq!(cli.device_config.as_deref(), Some("config-a"));
        assert_eq!(cli.config.as_deref(), Some("qbatch.yaml"));
    }

    #[test]
    fn test_verbosity_count() {
        let cli = TestCli::try_parse_from(["qbatch", "-vv", "config"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
