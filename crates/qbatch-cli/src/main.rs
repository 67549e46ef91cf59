//! qbatch Command-Line Interface
//!
//! Runs circuits through the batching sampler against the in-process
//! simulated processor.
//!
//! ```text
//!   qbatch run   --circuit bell:2 --sweep theta=0:1:5 -r 1000
//!   qbatch batch --circuit a --circuit b:3 -r 100,200
//!   qbatch config --config qbatch.yaml
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use qbatch_core::SamplerConfig;

mod commands;

use commands::common::{Options, OutputFormat};
use commands::{batch, config, run};

/// qbatch - batch parameterized circuits onto a processor
#[derive(Parser)]
#[command(name = "qbatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML)
    #[arg(long, global = true, env = "QBATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Automation run name (requires --device-config)
    #[arg(long, global = true)]
    run_name: Option<String>,

    /// Device configuration name (requires --run-name)
    #[arg(long, global = true)]
    device_config: Option<String>,

    /// Seed for the simulated processor
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Use the blocking sampler surface from a worker thread
    #[arg(long, global = true)]
    blocking: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one circuit over a parameter sweep
    Run {
        /// Circuit as NAME[:QUBITS]
        #[arg(short, long)]
        circuit: String,

        /// Parameter sweep (key=start:stop:n or key=v1,v2,...)
        #[arg(short, long)]
        sweep: Option<String>,

        /// Repetitions per parameter point
        #[arg(short, long, default_value = "1000")]
        repetitions: u32,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Run several circuits as one batch
    Batch {
        /// Circuit as NAME[:QUBITS] (repeatable)
        #[arg(short, long, required = true)]
        circuit: Vec<String>,

        /// Parameter sweep per circuit, in circuit order ("unit" for none)
        #[arg(short, long)]
        sweep: Vec<String>,

        /// Repetitions: one count for all circuits, or a comma-separated list
        #[arg(short, long, value_delimiter = ',', default_value = "1000")]
        repetitions: Vec<u32>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = SamplerConfig::load(cli.config.as_deref());

    // Setup logging
    let (level, format) = match &loaded {
        Ok(cfg) => (cfg.logging.level.as_str(), cfg.logging.format.as_str()),
        Err(_) => ("warn", "console"),
    };
    let filter = match cli.verbose {
        0 => level,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    if format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::new(filter))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_target(false)
            .init();
    }

    let result = match loaded {
        Ok(mut cfg) => {
            if let Some(run_name) = cli.run_name {
                cfg.run_name = run_name;
            }
            if let Some(device_config) = cli.device_config {
                cfg.device_config_name = device_config;
            }
            let options = Options {
                config: cfg,
                seed: cli.seed,
                blocking: cli.blocking,
            };

            match cli.command {
                Commands::Run {
                    circuit,
                    sweep,
                    repetitions,
                    format,
                } => run::execute(&options, &circuit, sweep.as_deref(), repetitions, format).await,

                Commands::Batch {
                    circuit,
                    sweep,
                    repetitions,
                    format,
                } => batch::execute(&options, &circuit, &sweep, &repetitions, format).await,

                Commands::Config => config::execute(&options),
            }
        }
        Err(e) => Err(e.into()),
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
