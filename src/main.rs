//! Privflow - command-line front end for the workflow analysis engine
//!
//! Reads a JSON array of session records, transforms them under the effective
//! privacy config and prints either the transformed workflows or the
//! expressiveness metrics.

use anyhow::Context;
use clap::{Parser, Subcommand};
use privflow_core::{EngineConfig, PrivacyConfigUpdate, PrivacyEngine, SessionRecord};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(name = "privflow")]
#[command(about = "Privacy-preserving workflow analysis engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Engine config file (TOML)
    #[arg(long, env = "PRIVFLOW_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect, transform and evaluate; prints the metrics as JSON
    Analyze {
        /// JSON array of session records
        records: PathBuf,

        /// Seed for reproducible redaction, noise and clustering
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        overrides: Overrides,

        /// Also write the transformed workflows to this file
        #[arg(long)]
        transformed_out: Option<PathBuf>,
    },

    /// Collect and transform; prints the transformed workflows as JSON
    Transform {
        /// JSON array of session records
        records: PathBuf,

        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print the effective configuration as TOML
    Config {
        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Privacy settings layered over the config file
#[derive(clap::Args, Debug, Default)]
struct Overrides {
    #[arg(long)]
    epsilon: Option<f64>,

    #[arg(long)]
    redaction_level: Option<f64>,

    /// 1 = token … 5 = workflow
    #[arg(long)]
    abstraction_level: Option<u8>,

    #[arg(long)]
    redact_names: Option<bool>,

    #[arg(long)]
    redact_numbers: Option<bool>,

    #[arg(long)]
    redact_emails: Option<bool>,
}

impl From<Overrides> for PrivacyConfigUpdate {
    fn from(o: Overrides) -> Self {
        PrivacyConfigUpdate {
            epsilon: o.epsilon,
            redaction_level: o.redaction_level,
            abstraction_level: o.abstraction_level,
            redact_names: o.redact_names,
            redact_numbers: o.redact_numbers,
            redact_emails: o.redact_emails,
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn build_engine(config: &EngineConfig, overrides: Overrides) -> anyhow::Result<PrivacyEngine> {
    let engine = PrivacyEngine::from_config(config.clone())?;
    engine
        .update_config(overrides.into())
        .context("Invalid privacy override")?;
    Ok(engine)
}

fn read_records(path: &Path) -> anyhow::Result<Vec<SessionRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records from {}", path.display()))?;
    let records: Vec<SessionRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse records in {}", path.display()))?;
    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::new(format!("privflow={}", level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Privflow v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            records,
            seed,
            overrides,
            transformed_out,
        } => {
            let engine = build_engine(&config, overrides)?;
            let records = read_records(&records)?;
            let mut rng = make_rng(seed);

            let report = engine.analyze(&records, &mut rng)?;
            if let Some(path) = transformed_out {
                let json = serde_json::to_string_pretty(&report.transformed)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Wrote {} transformed workflows to {}", report.transformed.len(), path.display());
            }

            println!("{}", serde_json::to_string_pretty(&report.metrics)?);
        }
        Commands::Transform {
            records,
            seed,
            overrides,
        } => {
            let engine = build_engine(&config, overrides)?;
            let records = read_records(&records)?;
            let mut rng = make_rng(seed);

            let original = engine.collect(&records);
            let transformed = engine.transform_current(&original, &mut rng)?;
            println!("{}", serde_json::to_string_pretty(&transformed)?);
        }
        Commands::Config { overrides } => {
            let engine = build_engine(&config, overrides)?;
            let effective = EngineConfig {
                privacy: engine.config(),
                evaluation: engine.evaluation_config().clone(),
            };
            print!("{}", effective.to_toml()?);
        }
    }

    Ok(())
}
