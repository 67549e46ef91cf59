//! Shared helpers for CLI commands.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use qbatch_adapter_sim::{SimCircuit, SimulatedProcessor};
use qbatch_core::{ProcessorSampler, Repetitions, SamplerConfig};
use qbatch_hal::ExecutionResult;
use qbatch_params::Sweep;

/// Settings shared by every command.
pub struct Options {
    /// Effective configuration (file, environment, then flags).
    pub config: SamplerConfig,
    /// Seed for the simulated processor.
    pub seed: Option<u64>,
    /// Route calls through the blocking surface.
    pub blocking: bool,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Parse a `NAME[:QUBITS]` circuit argument.
pub fn parse_circuit(arg: &str) -> Result<SimCircuit> {
    arg.parse()
        .with_context(|| format!("Invalid circuit '{arg}'"))
}

/// Parse a sweep argument.
///
/// Accepts `key=start:stop:n` (linear), `key=v1,v2,...` (explicit values),
/// or `unit`.
pub fn parse_sweep(arg: &str) -> Result<Sweep> {
    if arg.eq_ignore_ascii_case("unit") {
        return Ok(Sweep::unit());
    }

    let (key, range) = arg
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Invalid sweep '{arg}': expected key=start:stop:n"))?;

    if range.contains(':') {
        let parts: Vec<&str> = range.split(':').collect();
        let [start, stop, n] = parts.as_slice() else {
            anyhow::bail!("Invalid sweep '{arg}': expected key=start:stop:n");
        };
        let start: f64 = start
            .trim()
            .parse()
            .with_context(|| format!("Invalid sweep start in '{arg}'"))?;
        let stop: f64 = stop
            .trim()
            .parse()
            .with_context(|| format!("Invalid sweep stop in '{arg}'"))?;
        let n: usize = n
            .trim()
            .parse()
            .with_context(|| format!("Invalid sweep length in '{arg}'"))?;
        return Sweep::linspace(key.trim(), start, stop, n)
            .with_context(|| format!("Invalid sweep '{arg}'"));
    }

    let values = range
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid sweep values in '{arg}'"))?;
    Sweep::values(key.trim(), values).with_context(|| format!("Invalid sweep '{arg}'"))
}

/// A single count applies to every circuit; a list is per circuit.
pub fn repetitions_from(counts: &[u32]) -> Repetitions {
    match counts {
        [one] => Repetitions::Uniform(*one),
        many => Repetitions::PerCircuit(many.to_vec()),
    }
}

/// Build a sampler over the simulated processor.
pub fn build_sampler(options: &Options) -> Result<ProcessorSampler<SimulatedProcessor>> {
    let mut processor = SimulatedProcessor::new();
    if let Some(seed) = options.seed {
        processor = processor.with_seed(seed);
    }
    if !options.config.run_name.is_empty() {
        processor = processor.with_device_config(
            &options.config.run_name,
            &options.config.device_config_name,
        );
    }
    let sampler = ProcessorSampler::from_config(processor, &options.config)?;
    debug!(?sampler, blocking = options.blocking, "sampler ready");
    Ok(sampler)
}

/// Spinner shown while jobs are outstanding.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print the results of one circuit in table or JSON form.
pub fn print_circuit_results(
    circuit: &SimCircuit,
    results: &[ExecutionResult],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "circuit": circuit.name,
                "num_qubits": circuit.num_qubits,
                "results": results,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => {
            println!(
                "\n{} {} ({} points)",
                style("■").cyan().bold(),
                style(circuit).green(),
                results.len()
            );
            for result in results {
                print_results(result);
            }
        }
    }
    Ok(())
}

/// Print one result as a histogram table.
pub fn print_results(result: &ExecutionResult) {
    let label = if result.params.is_empty() {
        "no parameters".to_string()
    } else {
        result.params.to_string()
    };
    println!(
        "\n{} {} ({} shots):",
        style("✓").green().bold(),
        style(label).yellow(),
        result.repetitions
    );

    let sorted = result.counts.sorted();
    let total = result.counts.total_shots() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = **count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }

    if let Some(time_ms) = result.execution_time_ms {
        println!("  Execution time: {} ms", style(time_ms).yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_linear_sweep() {
        let sweep = parse_sweep("theta=0:1:5").unwrap();
        assert_eq!(sweep.len(), 5);
        assert_eq!(sweep.keys(), vec!["theta".to_string()]);
    }

    #[test]
    fn test_parse_value_sweep() {
        let sweep = parse_sweep("phi=0.1, 0.2,0.3").unwrap();
        assert_eq!(sweep.len(), 3);
        assert_eq!(sweep.resolvers()[1].get("phi"), Some(0.2));
    }

    #[test]
    fn test_parse_unit_sweep() {
        assert!(parse_sweep("unit").unwrap().is_unit());
    }

    #[test]
    fn test_parse_sweep_errors() {
        assert!(parse_sweep("theta").is_err());
        assert!(parse_sweep("theta=0:1").is_err());
        assert!(parse_sweep("theta=a:1:2").is_err());
        assert!(parse_sweep("=1,2").is_err());
    }

    #[test]
    fn test_repetitions_from() {
        assert_eq!(repetitions_from(&[5]), Repetitions::Uniform(5));
        assert_eq!(
            repetitions_from(&[2, 5]),
            Repetitions::PerCircuit(vec![2, 5])
        );
    }

    #[test]
    fn test_build_sampler_rejects_half_identity() {
        let options = Options {
            config: SamplerConfig {
                run_name: "nightly".into(),
                ..Default::default()
            },
            seed: None,
            blocking: false,
        };
        assert!(build_sampler(&options).is_err());
    }

    #[test]
    fn test_build_sampler_with_identity() {
        let options = Options {
            config: SamplerConfig {
                run_name: "nightly".into(),
                device_config_name: "config-a".into(),
                ..Default::default()
            },
            seed: Some(1),
            blocking: false,
        };
        let sampler = build_sampler(&options).unwrap();
        assert_eq!(sampler.identity().to_string(), "nightly/config-a");
    }
}
