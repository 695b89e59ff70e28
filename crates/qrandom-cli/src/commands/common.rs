//! Shared helpers for CLI commands.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qrandom_adapter_sim::SimulatorBackend;
use qrandom_core::{
    BitSource, Bounds, CircuitSource, DistributionSummary, MAX_BITS, Method, QubitEmulator,
};

/// Bit width, bounds and seed shared by `generate` and `compare`.
#[derive(Args, Debug, Clone)]
pub struct GenerationOptions {
    /// Bits drawn per integer
    #[arg(short, long, default_value = "8", value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_BITS)))]
    pub bits: u32,

    /// Inclusive lower bound
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub lower: i64,

    /// Inclusive upper bound
    #[arg(long, default_value = "255", allow_hyphen_values = true)]
    pub upper: i64,

    /// Seed for the pseudo-random and simulator methods
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GenerationOptions {
    pub fn bounds(&self) -> Result<Bounds> {
        Ok(Bounds::new(self.lower, self.upper)?)
    }
}

/// IBM Quantum credentials for the `real` method.
#[derive(Args, Debug, Clone, Default)]
pub struct IbmArgs {
    /// IBM Cloud API key
    #[arg(long, env = "IBM_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// IBM Quantum service instance CRN
    #[arg(long, env = "IBM_SERVICE_CRN", hide_env_values = true)]
    pub service_crn: Option<String>,

    /// IBM device name
    #[arg(long = "ibm-backend", env = "IBM_BACKEND", default_value = "ibm_torino")]
    pub backend: String,

    /// IBM Quantum Runtime endpoint
    #[arg(long = "ibm-endpoint", env = "IBM_QUANTUM_ENDPOINT")]
    pub endpoint: Option<String>,
}

/// Build the bit source for a method.
///
/// `seed` makes the pseudo-random and simulator methods reproducible; real
/// hardware ignores it. Each method draws from its own stream derived from
/// the seed, so one seed never yields mirrored sequences across methods.
pub async fn build_source(
    method: Method,
    seed: Option<u64>,
    ibm: &IbmArgs,
) -> Result<Box<dyn BitSource>> {
    match method {
        Method::PseudoRandom => {
            let emulator = match seed {
                Some(seed) => QubitEmulator::seeded(method.stream_seed(seed)),
                None => QubitEmulator::from_entropy(),
            };
            Ok(Box::new(emulator))
        }
        Method::Simulate => {
            let backend = match seed {
                Some(seed) => SimulatorBackend::with_seed(method.stream_seed(seed)),
                None => SimulatorBackend::new(),
            };
            let source = CircuitSource::validated(method, Box::new(backend)).await?;
            Ok(Box::new(source))
        }
        Method::Real => build_ibm_source(ibm).await,
    }
}

#[cfg(feature = "ibm")]
async fn build_ibm_source(ibm: &IbmArgs) -> Result<Box<dyn BitSource>> {
    use qrandom_adapter_ibm::{IbmBackend, IbmConfig};

    let (Some(api_key), Some(service_crn)) = (&ibm.api_key, &ibm.service_crn) else {
        anyhow::bail!(
            "IBM Quantum credentials not set.\n\n\
             Set IBM_API_KEY + IBM_SERVICE_CRN, or pass --api-key and --service-crn"
        );
    };

    let mut config = IbmConfig::new(api_key, service_crn).with_backend(&ibm.backend);
    if let Some(endpoint) = &ibm.endpoint {
        config = config.with_endpoint(endpoint);
    }
    config.validate()?;

    let pb = spinner(format!("Connecting to {}...", ibm.backend));
    let backend = IbmBackend::connect(&config).await;
    pb.finish_and_clear();

    let source = CircuitSource::validated(Method::Real, Box::new(backend?)).await?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "ibm"))]
async fn build_ibm_source(_ibm: &IbmArgs) -> Result<Box<dyn BitSource>> {
    anyhow::bail!(
        "The 'real' method requires the 'ibm' feature.\nRebuild with: cargo build --features ibm"
    )
}

/// Spinner for operations of unknown length.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print statistics and a text histogram for one summary.
pub fn print_summary(summary: &DistributionSummary) {
    println!("{}", style(&summary.label).cyan().bold());
    println!(
        "  {} {}   {} {:.2}   {} {:.2}",
        style("n:").dim(),
        summary.count,
        style("mean:").dim(),
        summary.mean,
        style("std:").dim(),
        summary.std_dev
    );
    let b = &summary.box_stats;
    println!(
        "  {} {:.1} / {:.1} / {:.1} / {:.1} / {:.1}",
        style("min/q1/median/q3/max:").dim(),
        b.min,
        b.q1,
        b.median,
        b.q3,
        b.max
    );

    let max_count = summary.histogram.iter().map(|bin| bin.count).max().unwrap_or(0);
    if max_count == 0 {
        return;
    }
    for bin in summary.histogram.iter().filter(|bin| bin.count > 0) {
        let bar_len = (bin.count * 40 / max_count).max(1);
        println!(
            "  [{:>9.1}, {:>9.1}) {} {}",
            bin.start,
            bin.end,
            style("█".repeat(bar_len)).green(),
            bin.count
        );
    }
}
