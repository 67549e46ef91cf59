//! Config command implementation.

use anyhow::Result;
use console::style;

use super::common::Options;

/// Print the effective configuration as YAML.
pub fn execute(options: &Options) -> Result<()> {
    options.config.validate()?;
    let identity = options.config.identity()?;

    println!(
        "{} Effective configuration (identity {})",
        style("→").cyan().bold(),
        style(identity).green()
    );
    print!("{}", options.config.to_yaml()?);
    Ok(())
}
