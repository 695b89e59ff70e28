//! qrandom Command-Line Interface
//!
//! Generates random integers from emulated, simulated or real qubit
//! measurements and summarises their distributions.
//!
//! ```text
//! qrandom generate --method simulate --count 10 --bits 8
//! qrandom compare --output plots
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use qrandom_core::Method;

mod commands;

use commands::common::{GenerationOptions, IbmArgs};
use commands::{compare, generate, version};

/// qrandom - random integers from qubit measurements
#[derive(Parser)]
#[command(name = "qrandom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random integers with one method
    Generate {
        /// Generation method: pseudo-random (alias pseudo), simulate (sim,
        /// simulator) or real (ibm, hardware)
        #[arg(short, long, default_value = "pseudo-random")]
        method: Method,

        /// Number of integers to generate
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,

        #[command(flatten)]
        options: GenerationOptions,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Directory to write a distribution summary into
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        ibm: IbmArgs,
    },

    /// Generate a small sample with every method and summarise each
    Compare {
        /// Methods to compare, comma-separated (aliases as for `generate`)
        #[arg(
            long,
            value_delimiter = ',',
            default_value = "pseudo-random,simulate,real"
        )]
        methods: Vec<Method>,

        /// Integers per method
        #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,

        #[command(flatten)]
        options: GenerationOptions,

        /// Directory for the per-method summaries
        #[arg(short, long, default_value = "plots")]
        output: PathBuf,

        #[command(flatten)]
        ibm: IbmArgs,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Generate {
            method,
            count,
            options,
            format,
            output,
            ibm,
        } => generate::execute(method, count, &options, &format, output.as_deref(), &ibm).await,

        Commands::Compare {
            methods,
            count,
            options,
            output,
            ibm,
        } => compare::execute(&methods, count, &options, &output, &ibm).await,

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    #[test]
    fn test_generate_defaults() {
        let cli = parse(&["qrandom", "generate"]).unwrap();
        match cli.command {
            Commands::Generate {
                method,
                count,
                options,
                format,
                output,
                ..
            } => {
                assert_eq!(method, Method::PseudoRandom);
                assert_eq!(count, 1);
                assert_eq!(options.bits, 8);
                assert_eq!(options.lower, 0);
                assert_eq!(options.upper, 255);
                assert_eq!(options.seed, None);
                assert_eq!(format, "table");
                assert!(output.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_generate_all_args() {
        let cli = parse(&[
            "qrandom", "generate", "-m", "simulate", "-c", "10", "--bits", "4", "--lower", "-5",
            "--upper", "5", "--seed", "42", "-f", "json", "-o", "out",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                method,
                count,
                options,
                format,
                output,
                ..
            } => {
                assert_eq!(method, Method::Simulate);
                assert_eq!(count, 10);
                assert_eq!(options.bits, 4);
                assert_eq!(options.lower, -5);
                assert_eq!(options.upper, 5);
                assert_eq!(options.seed, Some(42));
                assert_eq!(format, "json");
                assert_eq!(output, Some(PathBuf::from("out")));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_generate_rejects_bad_values() {
        assert!(parse(&["qrandom", "generate", "--method", "coin"]).is_err());
        assert!(parse(&["qrandom", "generate", "--bits", "65"]).is_err());
        assert!(parse(&["qrandom", "generate", "--count", "0"]).is_err());
    }

    #[test]
    fn test_compare_defaults() {
        let cli = parse(&["qrandom", "compare"]).unwrap();
        match cli.command {
            Commands::Compare {
                methods,
                count,
                options,
                output,
                ..
            } => {
                assert_eq!(methods, Method::ALL.to_vec());
                assert_eq!(count, 5);
                assert_eq!(options.bits, 8);
                assert_eq!(output, PathBuf::from("plots"));
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_compare_method_subset() {
        let cli = parse(&["qrandom", "compare", "--methods", "pseudo-random,sim"]).unwrap();
        match cli.command {
            Commands::Compare { methods, .. } => {
                assert_eq!(methods, vec![Method::PseudoRandom, Method::Simulate]);
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_method_help_lists_aliases() {
        let mut cmd = Cli::command();
        let generate = cmd.find_subcommand_mut("generate").unwrap();
        let help = generate.render_long_help().to_string();
        for alias in ["pseudo", "sim", "simulator", "ibm", "hardware"] {
            assert!(help.contains(alias), "help is missing alias '{alias}'");
        }

        let cli = parse(&["qrandom", "generate", "--method", "hardware"]).unwrap();
        assert!(matches!(cli.command, Commands::Generate { method: Method::Real, .. }));
    }

    #[test]
    fn test_ibm_flags() {
        let cli = parse(&[
            "qrandom",
            "generate",
            "-m",
            "real",
            "--api-key",
            "key",
            "--service-crn",
            "crn:v1",
            "--ibm-backend",
            "ibm_fez",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { ibm, .. } => {
                assert_eq!(ibm.api_key.as_deref(), Some("key"));
                assert_eq!(ibm.service_crn.as_deref(), Some("crn:v1"));
                assert_eq!(ibm.backend, "ibm_fez");
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_verbose_and_version() {
        let cli = parse(&["qrandom", "-vv", "version"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Version));
        assert!(parse(&["qrandom"]).is_err());
    }
}
