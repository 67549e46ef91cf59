//! Batch command implementation.

use anyhow::Result;
use console::style;

use qbatch_core::{BlockingSampler, Repetitions, Sampler};
use qbatch_hal::Processor;

use super::common::{
    Options, OutputFormat, build_sampler, parse_circuit, parse_sweep, print_circuit_results,
    repetitions_from, spinner,
};

/// Execute the batch command.
pub async fn execute(
    options: &Options,
    circuits: &[String],
    sweeps: &[String],
    repetitions: &[u32],
    format: OutputFormat,
) -> Result<()> {
    let circuits = circuits
        .iter()
        .map(|c| parse_circuit(c))
        .collect::<Result<Vec<_>>>()?;
    let sweeps = if sweeps.is_empty() {
        None
    } else {
        Some(
            sweeps
                .iter()
                .map(|s| parse_sweep(s))
                .collect::<Result<Vec<_>>>()?,
        )
    };
    let repetitions = repetitions_from(repetitions);
    let sampler = build_sampler(options)?;

    if format == OutputFormat::Table {
        let path = match &repetitions {
            Repetitions::Uniform(_) => "one batch job".to_string(),
            Repetitions::PerCircuit(counts) if counts.windows(2).all(|w| w[0] == w[1]) => {
                "one batch job".to_string()
            }
            Repetitions::PerCircuit(_) => format!("{:?} fallback", sampler.fallback()),
        };
        println!(
            "{} Running {} circuits on {} ({}, identity {})",
            style("→").cyan().bold(),
            circuits.len(),
            style(sampler.processor().name()).yellow(),
            path,
            sampler.identity()
        );
    }

    let pb = spinner(format!("Waiting for {} circuits...", circuits.len()));
    let groups = if options.blocking {
        let worker_circuits = circuits.clone();
        tokio::task::spawn_blocking(move || {
            sampler.run_batch_blocking(&worker_circuits, sweeps.as_deref(), repetitions)
        })
        .await??
    } else {
        sampler
            .run_batch(&circuits, sweeps.as_deref(), repetitions)
            .await?
    };
    pb.finish_and_clear();

    for (circuit, results) in circuits.iter().zip(&groups) {
        print_circuit_results(circuit, results, format)?;
    }
    Ok(())
}
