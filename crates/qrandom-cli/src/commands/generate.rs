//! Generate command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use serde::Serialize;
use tracing::info;

use qrandom_core::{DistributionSummary, Method, RandomNumberGenerator};

use super::common::{GenerationOptions, IbmArgs, build_source, print_summary, spinner};

#[derive(Serialize)]
struct GenerateOutput<'a> {
    method: Method,
    bits: u32,
    lower: i64,
    upper: i64,
    values: &'a [i64],
}

/// Execute the generate command.
pub async fn execute(
    method: Method,
    count: u32,
    options: &GenerationOptions,
    format: &str,
    output: Option<&Path>,
    ibm: &IbmArgs,
) -> Result<()> {
    if !matches!(format, "table" | "json") {
        anyhow::bail!("Unknown format: '{format}'. Available: table, json");
    }
    let bounds = options.bounds()?;
    let quiet = format == "json";

    if !quiet {
        println!(
            "{} {} {}-bit integer(s) in {} with {}",
            style("→").cyan().bold(),
            count,
            options.bits,
            style(bounds).yellow(),
            style(method.label()).green()
        );
    }

    let source = build_source(method, options.seed, ibm).await?;
    let mut generator = RandomNumberGenerator::new(source, options.bits, bounds)?;

    info!(%method, count, bits = options.bits, %bounds, "generating");
    let values = if method.is_remote() && !quiet {
        let pb = spinner(format!(
            "Running {} circuit shot(s) on hardware...",
            u64::from(count) * u64::from(options.bits)
        ));
        let values = generator.generate_many(count as usize).await;
        pb.finish_and_clear();
        values?
    } else {
        generator.generate_many(count as usize).await?
    };

    if quiet {
        let out = GenerateOutput {
            method,
            bits: options.bits,
            lower: bounds.lower(),
            upper: bounds.upper(),
            values: &values,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!();
        println!("  {:>5}  {:>20}", style("#").bold(), style("Value").bold());
        println!("  {}", "─".repeat(27));
        for (i, value) in values.iter().enumerate() {
            println!("  {:>5}  {:>20}", i + 1, value);
        }
        println!();
    }

    if let Some(dir) = output {
        let summary = DistributionSummary::for_method(method, &values)?;
        let path = summary.write_json(dir)?;
        if !quiet {
            print_summary(&summary);
            println!();
            println!(
                "{} Summary written to {}",
                style("✓").green().bold(),
                style(path.display()).cyan()
            );
        }
    }

    Ok(())
}
