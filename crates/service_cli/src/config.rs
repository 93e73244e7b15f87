//! Run configuration management
//!
//! Handles loading a run from a TOML file, `HESTON_*` environment variables
//! and CLI arguments.
//!
//! Priority (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Config file
//! 4. Default values
//!
//! ```toml
//! [model]
//! spot = 100.0
//! v0 = 0.04
//! theta = 0.04
//! kappa = 2.0
//! eta = 0.3
//! rho = -0.7
//! rate = 0.05
//! maturity = 1.0
//!
//! [simulation]
//! n_paths = 50000
//! n_steps = 100
//! scheme = "milstein"
//! antithetic = true
//! seed = 42
//!
//! [option]
//! strike = 100.0
//! kind = "call"
//! ```

use std::path::Path;
use std::str::FromStr;

use pricer_models::models::HestonParams;
use pricer_pricing::mc::{
    DiscretisationScheme, OptionKind, SimulationSpec, SimulationSpecBuilder, VanillaPayoff,
    DEFAULT_CHUNK_SIZE,
};
use serde::Deserialize;

use crate::{CliError, Result};

/// `[model]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSection {
    pub spot: f64,
    pub v0: f64,
    pub theta: f64,
    pub kappa: f64,
    pub eta: f64,
    pub rho: f64,
    pub rate: f64,
    pub maturity: f64,
}

impl Default for ModelSection {
    fn default() -> Self {
        let params = HestonParams::default();
        Self {
            spot: params.spot,
            v0: params.v0,
            theta: params.theta,
            kappa: params.kappa,
            eta: params.eta,
            rho: params.rho,
            rate: params.rate,
            maturity: params.maturity,
        }
    }
}

/// `[simulation]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    pub n_paths: usize,
    pub n_steps: usize,
    pub scheme: String,
    pub antithetic: bool,
    pub quasi_random: bool,
    pub seed: Option<u64>,
    pub parallel: bool,
    pub chunk_size: usize,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            n_paths: 50_000,
            n_steps: 100,
            scheme: DiscretisationScheme::default().name().to_string(),
            antithetic: false,
            quasi_random: false,
            seed: None,
            parallel: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// `[option]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionSection {
    pub strike: f64,
    pub kind: String,
}

impl Default for OptionSection {
    fn default() -> Self {
        Self {
            strike: 100.0,
            kind: "call".to_string(),
        }
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub model: ModelSection,
    pub simulation: SimulationSection,
    pub option: OptionSection,
}

/// Simulation and option overrides from the command line.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Number of Monte Carlo paths
    #[arg(short = 'n', long)]
    pub n_paths: Option<usize>,

    /// Number of time steps
    #[arg(short = 's', long)]
    pub n_steps: Option<usize>,

    /// Variance discretisation scheme (euler, milstein)
    #[arg(long)]
    pub scheme: Option<String>,

    /// Use antithetic variates
    #[arg(long, overrides_with = "no_antithetic")]
    pub antithetic: bool,

    /// Disable antithetic variates set in the config file or environment
    #[arg(long, overrides_with = "antithetic")]
    pub no_antithetic: bool,

    /// Use Sobol quasi-random numbers
    #[arg(long, overrides_with = "no_quasi_random")]
    pub quasi_random: bool,

    /// Use pseudo-random numbers even if the config file asks for Sobol
    #[arg(long, overrides_with = "quasi_random")]
    pub no_quasi_random: bool,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run on a single thread
    #[arg(long, overrides_with = "parallel")]
    pub sequential: bool,

    /// Run on the rayon thread pool
    #[arg(long, overrides_with = "sequential")]
    pub parallel: bool,

    /// Option strike
    #[arg(short = 'k', long)]
    pub strike: Option<f64>,

    /// Option type (call, put)
    #[arg(long)]
    pub kind: Option<String>,
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::ConfigFile(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CliError::ConfigFile(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply `HESTON_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `HESTON_*` overrides from an arbitrary lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("HESTON_N_PATHS") {
            self.simulation.n_paths = parse_env("HESTON_N_PATHS", &value)?;
        }
        if let Some(value) = lookup("HESTON_N_STEPS") {
            self.simulation.n_steps = parse_env("HESTON_N_STEPS", &value)?;
        }
        if let Some(value) = lookup("HESTON_SEED") {
            self.simulation.seed = Some(parse_env("HESTON_SEED", &value)?);
        }
        if let Some(value) = lookup("HESTON_SCHEME") {
            self.simulation.scheme = value;
        }
        if let Some(value) = lookup("HESTON_ANTITHETIC") {
            self.simulation.antithetic = parse_env("HESTON_ANTITHETIC", &value)?;
        }
        if let Some(value) = lookup("HESTON_QUASI_RANDOM") {
            self.simulation.quasi_random = parse_env("HESTON_QUASI_RANDOM", &value)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, args: &RunArgs) {
        if let Some(n_paths) = args.n_paths {
            self.simulation.n_paths = n_paths;
        }
        if let Some(n_steps) = args.n_steps {
            self.simulation.n_steps = n_steps;
        }
        if let Some(scheme) = &args.scheme {
            self.simulation.scheme = scheme.clone();
        }
        if args.antithetic || args.no_antithetic {
            self.simulation.antithetic = args.antithetic;
        }
        if args.quasi_random || args.no_quasi_random {
            self.simulation.quasi_random = args.quasi_random;
        }
        if args.seed.is_some() {
            self.simulation.seed = args.seed;
        }
        if args.sequential || args.parallel {
            self.simulation.parallel = args.parallel;
        }
        if let Some(strike) = args.strike {
            self.option.strike = strike;
        }
        if let Some(kind) = &args.kind {
            self.option.kind = kind.clone();
        }
    }

    /// Validated model parameters
    pub fn params(&self) -> Result<HestonParams> {
        let m = &self.model;
        Ok(HestonParams::new(
            m.spot, m.v0, m.theta, m.kappa, m.eta, m.rho, m.rate, m.maturity,
        )?)
    }

    /// Validated simulation configuration
    pub fn spec(&self) -> Result<SimulationSpec> {
        Ok(self.spec_builder()?.build()?)
    }

    /// Simulation builder pre-filled from the `[simulation]` table
    pub fn spec_builder(&self) -> Result<SimulationSpecBuilder> {
        let s = &self.simulation;
        let scheme = DiscretisationScheme::from_str(&s.scheme)?;
        Ok(SimulationSpec::builder()
            .n_paths(s.n_paths)
            .n_steps(s.n_steps)
            .scheme(scheme)
            .antithetic(s.antithetic)
            .quasi_random(s.quasi_random)
            .maybe_seed(s.seed)
            .parallel(s.parallel)
            .chunk_size(s.chunk_size))
    }

    /// Option payoff from the `[option]` table
    pub fn payoff(&self) -> Result<VanillaPayoff> {
        let kind = match self.option.kind.to_ascii_lowercase().as_str() {
            "call" => OptionKind::Call,
            "put" => OptionKind::Put,
            other => {
                return Err(CliError::InvalidArgument(format!(
                    "Unknown option kind: {}. Supported: call, put",
                    other
                )))
            }
        };
        Ok(VanillaPayoff::new(kind, self.option.strike))
    }
}

fn parse_env<T: FromStr>(name: &'static str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| CliError::Env {
        name,
        message: format!("cannot parse '{}'", value),
    })
}

/// Build configuration from all sources
pub fn build_config(path: Option<&Path>, args: &RunArgs) -> Result<RunConfig> {
    let mut config = match path {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };
    config.apply_env()?;
    config.merge_with_cli(args);
    Ok(config)
}
