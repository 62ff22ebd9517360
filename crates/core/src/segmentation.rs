//! Race segmentation and per-race statistics.
//!
//! Groups contiguous `in_race` frames into race spans, merges spans that are
//! separated by fewer than `min_gap` frames, and projects each merged span
//! into a [`RaceRecord`]. Records are recomputed from scratch on every call;
//! nothing is cached between calls.

use serde::{Deserialize, Serialize};

use crate::labels::Frame;
use crate::types::{round2, FrameIndex, Seconds};

/// Default gap (exclusive, in frames) below which adjacent races merge.
pub const DEFAULT_MERGE_MIN_GAP: usize = 5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` frame index range of a race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceSpan {
    pub start: FrameIndex,
    pub end: FrameIndex,
}

impl RaceSpan {
    /// Number of frames covered, endpoints included.
    pub fn frame_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// A position reading inside a race.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub timestamp: Seconds,
    pub position: i32,
    pub relative_time: Seconds,
}

/// A coin reading inside a race.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinSample {
    pub timestamp: Seconds,
    pub coins: i32,
    pub relative_time: Seconds,
}

/// Summary of one (possibly merged) race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceRecord {
    pub race_number: u32,
    pub start_time: Seconds,
    pub end_time: Seconds,
    pub duration: Seconds,
    /// Every frame in the span, including absorbed non-race frames.
    pub total_frames: usize,
    /// Only the frames labeled `in_race`.
    pub in_race_frames: usize,
    pub position_history: Vec<PositionSample>,
    pub coin_history: Vec<CoinSample>,
    pub best_position: Option<i32>,
    pub worst_position: Option<i32>,
    pub final_position: Option<i32>,
    pub avg_position: Option<f64>,
    pub position_changes: usize,
    pub final_coins: Option<i32>,
    pub max_coins: Option<i32>,
    pub min_coins: Option<i32>,
}

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

/// Maximal runs of consecutive `in_race` frames, in order.
///
/// `not_in_race` and unset frames both break a run.
pub fn raw_segments(frames: &[Frame]) -> Vec<RaceSpan> {
    let mut spans = Vec::new();
    let mut open: Option<FrameIndex> = None;

    for (i, frame) in frames.iter().enumerate() {
        match (frame.labels.is_in_race(), open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                spans.push(RaceSpan { start, end: i - 1 });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        spans.push(RaceSpan {
            start,
            end: frames.len() - 1,
        });
    }

    spans
}

/// Merge spans whose gap (`next.start - prev.end - 1`) is below `min_gap`.
///
/// The merged span absorbs the frames between its parts.
pub fn merge_segments(spans: &[RaceSpan], min_gap: usize) -> Vec<RaceSpan> {
    let mut merged: Vec<RaceSpan> = Vec::with_capacity(spans.len());

    for span in spans {
        match merged.last_mut() {
            Some(prev) if span.start.saturating_sub(prev.end + 1) < min_gap => {
                prev.end = prev.end.max(span.end)
            }
            _ => merged.push(*span),
        }
    }

    merged
}

/// Segment a frame sequence into numbered race records.
///
/// Returns an empty list when no frame is `in_race`.
pub fn segment_races(frames: &[Frame], min_gap: usize) -> Vec<RaceRecord> {
    merge_segments(&raw_segments(frames), min_gap)
        .iter()
        .enumerate()
        .map(|(i, span)| build_record(i as u32 + 1, &frames[span.start..=span.end]))
        .collect()
}

/// Project the frames of one merged span into a [`RaceRecord`].
fn build_record(race_number: u32, span: &[Frame]) -> RaceRecord {
    let start_time = span.first().map_or(0.0, |f| f.timestamp);
    let end_time = span.last().map_or(start_time, |f| f.timestamp);

    let mut in_race_frames = 0;
    let mut position_history = Vec::new();
    let mut coin_history = Vec::new();

    for frame in span.iter().filter(|f| f.labels.is_in_race()) {
        in_race_frames += 1;
        let relative_time = frame.timestamp - start_time;
        if let Some(position) = frame.labels.rank() {
            position_history.push(PositionSample {
                timestamp: frame.timestamp,
                position,
                relative_time,
            });
        }
        if let Some(coins) = frame.labels.coins {
            coin_history.push(CoinSample {
                timestamp: frame.timestamp,
                coins,
                relative_time,
            });
        }
    }

    let positions: Vec<i32> = position_history.iter().map(|p| p.position).collect();
    let coins: Vec<i32> = coin_history.iter().map(|c| c.coins).collect();

    RaceRecord {
        race_number,
        start_time,
        end_time,
        duration: round2(end_time - start_time),
        total_frames: span.len(),
        in_race_frames,
        best_position: positions.iter().copied().min(),
        worst_position: positions.iter().copied().max(),
        final_position: positions.last().copied(),
        avg_position: mean(&positions).map(round2),
        position_changes: count_changes(&positions),
        final_coins: coins.last().copied(),
        max_coins: coins.iter().copied().max(),
        min_coins: coins.iter().copied().min(),
        position_history,
        coin_history,
    }
}

fn mean(values: &[i32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().map(|&v| v as i64).sum();
    Some(sum as f64 / values.len() as f64)
}

/// Number of adjacent pairs whose values differ.
fn count_changes(values: &[i32]) -> usize {
    values.windows(2).filter(|w| w[0] != w[1]).count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
