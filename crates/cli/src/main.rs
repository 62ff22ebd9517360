//! `racelog` -- race timeline analysis from per-frame labels.
//!
//! Reads a JSON array of labeled frames, repairs short scene-classifier
//! dropouts, segments the sequence into races and writes a JSON report.
//!
//! # Usage
//!
//! ```text
//! racelog [FRAMES_JSON]
//! ```
//!
//! The positional argument overrides `RACELOG_INPUT`; see
//! [`racelog_cli::config::CliConfig::from_env`] for every variable.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use racelog_cli::config::CliConfig;
use racelog_cli::report;

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "racelog_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match CliConfig::from_env() {
        Ok(config) => config.with_input_arg(std::env::args().nth(1)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        impute_min_gap = config.analysis.impute_min_gap,
        merge_min_gap = config.analysis.merge_min_gap,
        skip_imputation = config.analysis.skip_imputation,
        "Starting racelog",
    );

    match report::run(&config) {
        Ok(report) => tracing::info!(status = %report.status, "Done"),
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            std::process::exit(1);
        }
    }
}
