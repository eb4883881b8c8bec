//! # feaform CLI Module
//!
//! This module implements the CLI interface for feaform.
//!
//! ## Available Commands
//!
//! - `sample` - Write a demonstration model
//! - `inspect` - Summarize a saved model graph
//! - `copy` - Duplicate a saved graph, fresh or identity-preserving
//! - `roundtrip` - Verify load + describe reproduces a file
//! - `kinds` - List the registered record kinds

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use feaform_core::{Catalog, Engine, FeaError};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// feaform - CAE model graph materializer
///
/// Loads, inspects, copies and round-trips self-describing JSON model files
/// while keeping shared references shared.
#[derive(Parser, Debug)]
#[command(name = "feaform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output style for saved files: "pretty", "compact" or "minimal"
    #[arg(short = 'f', long, global = true)]
    pub format: Option<String>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a demonstration model
    Sample {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Load a model file and summarize its graph
    Inspect {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Copy a model file through the clone service
    Copy {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Keep identity tokens instead of minting new ones
        #[arg(short, long)]
        preserve_identity: bool,
    },

    /// Load, describe again, and compare with the input
    Roundtrip {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Write the re-described form here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered record kinds
    Kinds,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), FeaError> {
    let config = AppConfig::resolve(cli.config.as_deref())?
        .with_format_override(cli.format.as_deref())?;
    let engine = Engine::new(Catalog::standard(), config.engine.clone());
    let format = config.output.format;
    let json_mode = cli.json_mode;

    if cli.verbose {
        tracing::info!(?config, "effective configuration");
    }

    match cli.command {
        Some(Commands::Sample { output }) => cmd_sample(&output, format, json_mode),
        Some(Commands::Inspect { input }) => cmd_inspect(&engine, &input, json_mode),
        Some(Commands::Copy {
            input,
            output,
            preserve_identity,
        }) => cmd_copy(&engine, &input, &output, preserve_identity, format, json_mode),
        Some(Commands::Roundtrip { input, output }) => {
            cmd_roundtrip(&engine, &input, output.as_deref(), format, json_mode)
        }
        Some(Commands::Kinds) => cmd_kinds(&engine, json_mode),
        None => {
            // No subcommand - list kinds by default
            cmd_kinds(&engine, json_mode)
        }
    }
}
