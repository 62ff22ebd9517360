use racelog_core::error::CoreError;

/// Errors surfaced by the command-line front end.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A domain-level error from `racelog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type CliResult<T> = Result<T, CliError>;
