//! Label coverage statistics and multi-race session summaries.

use serde::Serialize;

use crate::labels::{Frame, Scene};
use crate::segmentation::RaceRecord;
use crate::types::{round2, round_to, Seconds};

/// Final positions at or below this count as a podium finish.
pub const PODIUM_POSITIONS: i32 = 3;

// ---------------------------------------------------------------------------
// LabelStats
// ---------------------------------------------------------------------------

/// How much of a frame sequence carries each kind of label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelStats {
    pub total: usize,
    pub labeled: usize,
    pub in_race: usize,
    pub not_in_race: usize,
    /// Frames with any position, including not-visible.
    pub positions: usize,
    pub coins: usize,
    pub events: usize,
}

pub fn label_stats(frames: &[Frame]) -> LabelStats {
    frames.iter().fold(
        LabelStats {
            total: frames.len(),
            ..LabelStats::default()
        },
        |mut acc, frame| {
            let labels = &frame.labels;
            acc.labeled += usize::from(labels.is_labeled());
            acc.in_race += usize::from(labels.scene == Some(Scene::InRace));
            acc.not_in_race += usize::from(labels.scene == Some(Scene::NotInRace));
            acc.positions += usize::from(labels.position.is_some());
            acc.coins += usize::from(labels.coins.is_some());
            acc.events += usize::from(!labels.events.is_empty());
            acc
        },
    )
}

// ---------------------------------------------------------------------------
// SessionSummary
// ---------------------------------------------------------------------------

/// Headline numbers across every race in a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub races: usize,
    /// Mean final position to 1 decimal, over races that have one.
    pub avg_finish: Option<f64>,
    pub wins: usize,
    pub podiums: usize,
    pub total_race_time: Seconds,
}

pub fn session_summary(races: &[RaceRecord]) -> SessionSummary {
    // A zero final position is treated as no finish.
    let finals: Vec<i32> = races
        .iter()
        .filter_map(|r| r.final_position)
        .filter(|&p| p != 0)
        .collect();

    let avg_finish = if finals.is_empty() {
        None
    } else {
        let sum: i64 = finals.iter().map(|&p| p as i64).sum();
        Some(round_to(sum as f64 / finals.len() as f64, 1))
    };

    SessionSummary {
        races: races.len(),
        avg_finish,
        wins: finals.iter().filter(|&&p| p == 1).count(),
        podiums: finals.iter().filter(|&&p| p <= PODIUM_POSITIONS).count(),
        total_race_time: round2(races.iter().map(|r| r.duration).sum()),
    }
}
