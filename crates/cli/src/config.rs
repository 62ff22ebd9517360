use std::path::PathBuf;

use racelog_core::analysis::AnalysisConfig;
use racelog_core::imputation::DEFAULT_IMPUTE_MIN_GAP;
use racelog_core::segmentation::DEFAULT_MERGE_MIN_GAP;

use crate::error::{CliError, CliResult};

/// Where to read frames from or write a document to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stream {
    Std,
    File(PathBuf),
}

impl Stream {
    /// `-` means stdin/stdout; anything else is a file path.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "-" => Self::Std,
            path => Self::File(PathBuf::from(path)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Std => "-".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Command-line configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Frame sequence JSON to analyze (default: stdin).
    pub input: Stream,
    /// Race report destination (default: stdout).
    pub output: Stream,
    /// Optional destination for the repaired frame sequence.
    pub frames_output: Option<Stream>,
    pub analysis: AnalysisConfig,
}

impl CliConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                   | Default  |
    /// |---------------------------|----------|
    /// | `RACELOG_INPUT`           | `-`      |
    /// | `RACELOG_OUTPUT`          | `-`      |
    /// | `RACELOG_FRAMES_OUTPUT`   | unset    |
    /// | `RACELOG_IMPUTE_MIN_GAP`  | `5`      |
    /// | `RACELOG_MERGE_MIN_GAP`   | `5`      |
    /// | `RACELOG_SKIP_IMPUTATION` | `false`  |
    pub fn from_env() -> CliResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CliResult<Self> {
        let input = lookup("RACELOG_INPUT").map_or(Stream::Std, |v| Stream::parse(&v));
        let output = lookup("RACELOG_OUTPUT").map_or(Stream::Std, |v| Stream::parse(&v));
        let frames_output = lookup("RACELOG_FRAMES_OUTPUT")
            .filter(|v| !v.trim().is_empty())
            .map(|v| Stream::parse(&v));

        let impute_min_gap = parse_var(&lookup, "RACELOG_IMPUTE_MIN_GAP", DEFAULT_IMPUTE_MIN_GAP)?;
        let merge_min_gap = parse_var(&lookup, "RACELOG_MERGE_MIN_GAP", DEFAULT_MERGE_MIN_GAP)?;
        let skip_imputation = match lookup("RACELOG_SKIP_IMPUTATION") {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                CliError::Config(format!("RACELOG_SKIP_IMPUTATION must be a boolean, got '{v}'"))
            })?,
            None => false,
        };

        let analysis = AnalysisConfig {
            impute_min_gap,
            merge_min_gap,
            skip_imputation,
        };
        analysis.validate()?;

        Ok(Self {
            input,
            output,
            frames_output,
            analysis,
        })
    }

    /// A positional argument overrides `RACELOG_INPUT`.
    pub fn with_input_arg(mut self, arg: Option<String>) -> Self {
        if let Some(arg) = arg {
            self.input = Stream::parse(&arg);
        }
        self
    }
}

fn parse_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: usize,
) -> CliResult<usize> {
    match lookup(key) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| CliError::Config(format!("{key} must be a non-negative integer, got '{v}'"))),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
