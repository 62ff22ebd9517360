//! Read a frame sequence, run the relabel pipeline, write the race report.

use std::io::{Read, Write};

use serde::Serialize;

use racelog_core::analysis::{analyze, AnalysisOutcome};
use racelog_core::labels::{decode_frames, encode_frames, Frame};
use racelog_core::segmentation::RaceRecord;
use racelog_core::stats::{label_stats, LabelStats, SessionSummary};

use crate::config::{CliConfig, Stream};
use crate::error::{CliError, CliResult};

/// JSON document written to the report output.
#[derive(Debug, Clone, Serialize)]
pub struct RaceReport {
    pub status: String,
    pub frame_count: usize,
    pub imputed: usize,
    pub labels: LabelStats,
    pub summary: SessionSummary,
    pub races: Vec<RaceRecord>,
}

impl RaceReport {
    pub fn new(outcome: AnalysisOutcome, frames: &[Frame]) -> Self {
        Self {
            status: outcome.status_line(),
            frame_count: outcome.frame_count,
            imputed: outcome.imputed,
            labels: label_stats(frames),
            summary: outcome.summary,
            races: outcome.races,
        }
    }
}

fn io_error(stream: &Stream, source: std::io::Error) -> CliError {
    CliError::Io {
        path: stream.describe(),
        source,
    }
}

/// Read and decode a frame sequence.
pub fn read_frames(stream: &Stream) -> CliResult<Vec<Frame>> {
    let mut raw = String::new();
    match stream {
        Stream::Std => std::io::stdin().read_to_string(&mut raw),
        Stream::File(path) => std::fs::File::open(path).and_then(|mut f| f.read_to_string(&mut raw)),
    }
    .map_err(|e| io_error(stream, e))?;

    Ok(decode_frames(&raw)?)
}

/// Write a document, followed by a newline.
pub fn write_document(stream: &Stream, contents: &str) -> CliResult<()> {
    let result = match stream {
        Stream::Std => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{contents}").and_then(|()| out.flush())
        }
        Stream::File(path) => std::fs::write(path, format!("{contents}\n")),
    };
    result.map_err(|e| io_error(stream, e))
}

/// Run the full read / analyze / write cycle described by `config`.
pub fn run(config: &CliConfig) -> CliResult<RaceReport> {
    let mut frames = read_frames(&config.input)?;
    tracing::info!(
        input = %config.input.describe(),
        frames = frames.len(),
        "Loaded frame sequence"
    );

    let outcome = analyze(&mut frames, &config.analysis);
    tracing::info!(
        imputed = outcome.imputed,
        races = outcome.races.len(),
        "Analysis complete"
    );
    if outcome.races.is_empty() {
        tracing::warn!("No races detected; check scene labels");
    }

    let report = RaceReport::new(outcome, &frames);
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::Core(e.into()))?;
    write_document(&config.output, &json)?;

    if let Some(frames_output) = &config.frames_output {
        write_document(frames_output, &encode_frames(&frames)?)?;
        tracing::debug!(output = %frames_output.describe(), "Wrote repaired frames");
    }

    Ok(report)
}
