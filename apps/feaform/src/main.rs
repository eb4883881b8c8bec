//! # feaform - CAE Model Graph Materializer
//!
//! The main binary for the feaform materialization engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            apps/feaform (THE BINARY)         │
//! │                                              │
//! │   ┌─────────────┐      ┌────────────────┐    │
//! │   │    CLI      │      │  Config (TOML) │    │
//! │   │   (clap)    │      │                │    │
//! │   └──────┬──────┘      └───────┬────────┘    │
//! │          └──────────┬──────────┘             │
//! │                     ▼                        │
//! │             ┌───────────────┐                │
//! │             │ feaform-core  │                │
//! │             │ (THE ENGINE)  │                │
//! │             └───────────────┘                │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! feaform sample -o model.json
//! feaform inspect -i model.json
//! feaform copy -i model.json -o copy.json
//! feaform roundtrip -i model.json --format minimal -o min.json
//! ```

use clap::Parser;
use feaform::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // FEAFORM_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("FEAFORM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "feaform=info,feaform_core=info".into());

    // Logs go to stderr so --json-mode output on stdout stays parseable.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the feaform startup banner.
fn print_banner() {
    println!(
        r#"
  feaform v{}

  Describe • Materialize • Copy
"#,
        env!("CARGO_PKG_VERSION")
    );
}
