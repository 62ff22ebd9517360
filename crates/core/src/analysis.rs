//! Relabel pipeline: imputation followed by segmentation.
//!
//! Run after every change to the label set (initial analysis, manual
//! correction, import). Races are always rebuilt from the full sequence.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::imputation::{impute_scene, DEFAULT_IMPUTE_MIN_GAP};
use crate::labels::Frame;
use crate::segmentation::{segment_races, RaceRecord, DEFAULT_MERGE_MIN_GAP};
use crate::stats::{session_summary, SessionSummary};

/// Largest gap threshold accepted by [`AnalysisConfig::validate`].
pub const MAX_MIN_GAP: usize = 1000;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Gap thresholds for the pipeline, in frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Non-race runs shorter than this are imputed. `0` disables imputation.
    pub impute_min_gap: usize,
    /// Races separated by fewer frames than this merge. `0` disables merging.
    pub merge_min_gap: usize,
    /// Segment the labels as given, without imputation.
    pub skip_imputation: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            impute_min_gap: DEFAULT_IMPUTE_MIN_GAP,
            merge_min_gap: DEFAULT_MERGE_MIN_GAP,
            skip_imputation: false,
        }
    }
}

impl AnalysisConfig {
    /// Reject thresholds above [`MAX_MIN_GAP`].
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_gap(self.impute_min_gap, "impute_min_gap")?;
        validate_gap(self.merge_min_gap, "merge_min_gap")
    }
}

fn validate_gap(value: usize, name: &str) -> Result<(), CoreError> {
    if value > MAX_MIN_GAP {
        return Err(CoreError::Validation(format!(
            "{name} must be at most {MAX_MIN_GAP} frames, got {value}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Result of one pass of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub frame_count: usize,
    pub imputed: usize,
    pub races: Vec<RaceRecord>,
    pub summary: SessionSummary,
}

impl AnalysisOutcome {
    /// One-line status, e.g. `"2 race(s) from 340 frames (4 imputed)"`.
    pub fn status_line(&self) -> String {
        let mut line = format!(
            "{} race(s) from {} frames",
            self.races.len(),
            self.frame_count
        );
        if self.imputed > 0 {
            line.push_str(&format!(" ({} imputed)", self.imputed));
        }
        line
    }
}

/// Impute in place (unless skipped), then segment.
pub fn analyze(frames: &mut [Frame], config: &AnalysisConfig) -> AnalysisOutcome {
    let imputed = if config.skip_imputation {
        0
    } else {
        impute_scene(frames, config.impute_min_gap)
    };
    let races = segment_races(frames, config.merge_min_gap);
    let summary = session_summary(&races);

    AnalysisOutcome {
        frame_count: frames.len(),
        imputed,
        races,
        summary,
    }
}

/// Like [`analyze`] but leaves `frames` untouched, returning the repaired
/// copy alongside the outcome.
pub fn analyze_copy(frames: &[Frame], config: &AnalysisConfig) -> (Vec<Frame>, AnalysisOutcome) {
    let mut repaired = frames.to_vec();
    let outcome = analyze(&mut repaired, config);
    (repaired, outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
