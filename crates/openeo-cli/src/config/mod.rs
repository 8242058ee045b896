//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── command: Command           # processes | compile
//! ├── compiler: CompilerArgs     # Depth limit, step ids, module discovery
//! └── actinia: ReqwestConfig     # actinia URL, credentials, timeouts
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! openeo-actinia --actinia-url "http://actinia:8088/api/v3/" compile graph.json
//!
//! # Or via environment variables
//! ACTINIA_URL="http://actinia:8088/api/v3/" openeo-actinia compile graph.json
//! ```

mod compiler;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
pub use compiler::CompilerArgs;
use openeo_actinia::reqwest::ReqwestConfig;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
///
/// Combines all configuration groups:
/// - [`Command`]: The operation to run
/// - [`CompilerArgs`]: Graph compiler settings
/// - [`ReqwestConfig`]: Connection to the actinia backend
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "openeo-actinia")]
#[command(about = "Compiles openEO process graphs into actinia process chains")]
#[command(version)]
pub struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,

    /// Graph compiler configuration.
    #[clap(flatten)]
    pub compiler: CompilerArgs,

    /// actinia connection configuration.
    #[clap(flatten)]
    pub actinia: ReqwestConfig,
}

/// Operations offered by the CLI.
#[derive(Debug, Clone, Subcommand, Serialize, Deserialize)]
pub enum Command {
    /// Lists the descriptions of all available processes as JSON.
    Processes,

    /// Compiles a process graph and prints the resulting process chain.
    Compile {
        /// Path of the process graph JSON file, or `-` for stdin.
        path: PathBuf,

        /// Submits the chain to actinia instead of printing it.
        #[arg(long)]
        #[serde(default)]
        submit: bool,
    },
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// This is the preferred way to initialize the CLI configuration as it ensures
    /// .env files are loaded before clap parses arguments, allowing environment
    /// variables from .env to be used as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs are written to stderr; stdout carries the command output.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.compiler.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            actinia_url = %self.actinia.actinia_url,
            actinia_user = %self.actinia.actinia_user,
            http_timeout_secs = self.actinia.http_timeout,
            "actinia configuration"
        );
    }

    /// Returns whether the command talks to the backend.
    pub fn needs_backend(&self) -> bool {
        self.compiler.discover || matches!(self.command, Command::Compile { submit: true, .. })
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile() {
        let cli = Cli::try_parse_from([
            "openeo-actinia",
            "--sequential-ids",
            "--actinia-url",
            "https://actinia.example.com/api/v3/",
            "compile",
            "graph.json",
            "--submit",
        ])
        .unwrap();

        assert!(cli.compiler.sequential_ids);
        assert!(cli.needs_backend());
        assert_eq!(
            cli.actinia.actinia_url.as_str(),
            "https://actinia.example.com/api/v3/"
        );
        match cli.command {
            Command::Compile { path, submit } => {
                assert_eq!(path, PathBuf::from("graph.json"));
                assert!(submit);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_processes() {
        let cli = Cli::try_parse_from(["openeo-actinia", "processes"]).unwrap();
        assert!(matches!(cli.command, Command::Processes));
        assert!(!cli.needs_backend());
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["openeo-actinia"]).is_err());
    }
}
