//! Run command implementation.

use anyhow::Result;
use console::style;

use qbatch_core::{BlockingSampler, Sampler};
use qbatch_hal::Processor;

use super::common::{
    Options, OutputFormat, build_sampler, parse_circuit, parse_sweep, print_circuit_results,
    spinner,
};

/// Execute the run command.
pub async fn execute(
    options: &Options,
    circuit: &str,
    sweep: Option<&str>,
    repetitions: u32,
    format: OutputFormat,
) -> Result<()> {
    let circuit = parse_circuit(circuit)?;
    let sweep = sweep.map(parse_sweep).transpose()?;
    let sampler = build_sampler(options)?;

    if format == OutputFormat::Table {
        println!(
            "{} Running {} on {} ({} repetitions, identity {})",
            style("→").cyan().bold(),
            style(&circuit).green(),
            style(sampler.processor().name()).yellow(),
            repetitions,
            sampler.identity()
        );
    }

    let pb = spinner("Waiting for results...");
    let results = if options.blocking {
        let worker_circuit = circuit.clone();
        tokio::task::spawn_blocking(move || {
            sampler.run_blocking(&worker_circuit, sweep.as_ref(), repetitions)
        })
        .await??
    } else {
        sampler.run(&circuit, sweep.as_ref(), repetitions).await?
    };
    pb.finish_and_clear();

    print_circuit_results(&circuit, &results, format)
}
