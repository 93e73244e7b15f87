//! Heston CLI - Command Line Front End for the Monte Carlo Engine
//!
//! # Commands
//!
//! - `heston price` - Price the configured European option
//! - `heston parity` - Call, put and put-call parity on one batch
//! - `heston greeks` - Finite-difference Greeks with common random numbers
//! - `heston compare` - Schemes and variance reduction side by side
//! - `heston simulate` - Terminal statistics and optional CSV path dump
//!
//! Runs are configured from a TOML file (`heston.toml` by default),
//! `HESTON_*` environment variables and command line flags, in increasing
//! order of precedence.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

use commands::OutputFormat;
use config::RunArgs;
pub use error::{CliError, Result};

const DEFAULT_CONFIG: &str = "heston.toml";

/// Heston Monte Carlo option pricing CLI
#[derive(Parser)]
#[command(name = "heston")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (defaults to heston.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a European option
    Price {
        #[command(flatten)]
        run: RunArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Check put-call parity on one shared batch
    Parity {
        #[command(flatten)]
        run: RunArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Compute Greeks by bump-and-revalue
    Greeks {
        #[command(flatten)]
        run: RunArgs,

        /// Single parameter to bump (S0, V0, sigma0, r, T); all Greeks if omitted
        #[arg(short, long)]
        parameter: Option<String>,

        /// Absolute bump for --parameter
        #[arg(short, long, requires = "parameter")]
        bump: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Compare schemes and variance reduction techniques
    Compare {
        #[command(flatten)]
        run: RunArgs,

        /// Reference price to compare every estimate against
        #[arg(short, long)]
        reference: Option<f64>,
    },

    /// Simulate paths and report terminal statistics
    Simulate {
        #[command(flatten)]
        run: RunArgs,

        /// CSV file for path histories
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum number of paths written to the CSV file
        #[arg(short, long, default_value = "100")]
        max_paths: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialise tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let config_path = resolve_config_path(cli.config.as_deref());
    if let Some(path) = &config_path {
        info!(file = %path.display(), "Loading configuration");
    }

    let run = |args: &RunArgs| {
        config::build_config(config_path.as_deref(), args)
            .with_context(|| "failed to build run configuration")
    };

    match cli.command {
        Commands::Price { run: args, format } => commands::price::run(&run(&args)?, format)?,
        Commands::Parity { run: args, format } => commands::parity::run(&run(&args)?, format)?,
        Commands::Greeks {
            run: args,
            parameter,
            bump,
            format,
        } => commands::greeks::run(&run(&args)?, parameter.as_deref(), bump, format)?,
        Commands::Compare {
            run: args,
            reference,
        } => commands::compare::run(&run(&args)?, reference)?,
        Commands::Simulate {
            run: args,
            output,
            max_paths,
        } => commands::simulate::run(&run(&args)?, output.as_deref(), max_paths)?,
    }

    Ok(())
}

/// Explicit path, else `heston.toml` in the working directory when present.
fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            default.exists().then_some(default)
        }
    }
}
