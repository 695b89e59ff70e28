//! Compare command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qrandom_core::{DistributionSummary, Method, RandomNumberGenerator};

use super::common::{GenerationOptions, IbmArgs, build_source, print_summary, spinner};

/// Execute the compare command.
///
/// Generates `count` integers per method, writes one summary per method
/// into `output` and prints a side-by-side table.
pub async fn execute(
    methods: &[Method],
    count: u32,
    options: &GenerationOptions,
    output: &Path,
    ibm: &IbmArgs,
) -> Result<()> {
    if methods.is_empty() {
        anyhow::bail!("No methods selected");
    }
    let bounds = options.bounds()?;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    println!(
        "{} Comparing {} method(s): {} {}-bit integer(s) each in {}",
        style("→").cyan().bold(),
        methods.len(),
        count,
        options.bits,
        style(bounds).yellow()
    );
    println!();

    let mut summaries = Vec::with_capacity(methods.len());
    for &method in methods {
        let source = build_source(method, options.seed, ibm).await?;
        let mut generator = RandomNumberGenerator::new(source, options.bits, bounds)?;

        let pb = spinner(format!("Generating with {}...", method.label()));
        let values = generator.generate_many(count as usize).await;
        pb.finish_and_clear();
        let values = values.with_context(|| format!("{} failed", method.label()))?;

        info!(%method, ?values, "generated");
        let summary = DistributionSummary::for_method(method, &values)?;
        let path = summary.write_json(output)?;

        print_summary(&summary);
        println!("  {} {}", style("values:").dim(), format_values(&values));
        println!("  {} {}", style("written:").dim(), path.display());
        println!();

        summaries.push(summary);
    }

    print_comparison(&summaries);
    Ok(())
}

fn format_values(values: &[i64]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_comparison(summaries: &[DistributionSummary]) {
    println!(
        "  {:<28} {:>10} {:>10} {:>10} {:>10} {:>10}",
        style("Method").bold(),
        style("Mean").bold(),
        style("Std").bold(),
        style("Median").bold(),
        style("IQR").bold(),
        style("Bandwidth").bold()
    );
    println!("  {}", "─".repeat(83));
    for summary in summaries {
        println!(
            "  {:<28} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            summary.label,
            summary.mean,
            summary.std_dev,
            summary.box_stats.median,
            summary.box_stats.iqr(),
            summary.bandwidth
        );
    }
}
