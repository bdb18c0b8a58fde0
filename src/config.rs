use anyhow::{Context, Result};
use clap::Parser;
use std::{env, path::PathBuf};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub seed_dir: PathBuf,
    /// Skip artificial store latency and progress pauses.
    pub instant: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Drag-and-drop upload demo with a simulated upload queue")]
pub struct Args {
    /// Host to bind to (overrides FILEDROP_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides FILEDROP_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory holding files.json, uploadSessions.json and users.json
    /// (overrides FILEDROP_SEED_DIR)
    #[arg(long)]
    pub seed_dir: Option<PathBuf>,

    /// Disable simulated latency (overrides FILEDROP_INSTANT)
    #[arg(long)]
    pub instant: bool,
}

impl AppConfig {
    /// Parse CLI args and merge them over the environment.
    pub fn from_env_and_args() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Merge already-parsed args over the environment.
    pub fn from_args(args: Args) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = env::var("FILEDROP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("FILEDROP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing FILEDROP_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading FILEDROP_PORT"),
        };
        let env_seed = env::var("FILEDROP_SEED_DIR").unwrap_or_else(|_| "./seed".into());
        let env_instant = match env::var("FILEDROP_INSTANT") {
            Ok(value) => parse_flag(&value)
                .with_context(|| format!("parsing FILEDROP_INSTANT value `{}`", value))?,
            Err(env::VarError::NotPresent) => false,
            Err(err) => return Err(err).context("reading FILEDROP_INSTANT"),
        };

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            seed_dir: args.seed_dir.unwrap_or_else(|| env_seed.into()),
            instant: args.instant || env_instant,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("expected a boolean, got `{}`", other),
    }
}
