//! Selection consensus and batch label edits.
//!
//! The labeling tools operate on a selection of frame indices. Consensus
//! reports which labels the whole selection agrees on so the tool can show
//! the shared value; the edit helpers apply one change to every selected
//! frame.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::labels::{Frame, FrameLabels, Position, Scene};
use crate::types::FrameIndex;

// ---------------------------------------------------------------------------
// Consensus
// ---------------------------------------------------------------------------

/// Agreement of one label across a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Consensus<T> {
    /// Every selected frame holds this value (which may be unset).
    Unanimous(T),
    Mixed,
}

impl<T: PartialEq> Consensus<T> {
    fn fold(self, value: T) -> Self {
        match self {
            Self::Unanimous(current) if current == value => Self::Unanimous(current),
            _ => Self::Mixed,
        }
    }
}

/// Consensus over every label of a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelConsensus {
    pub scene: Consensus<Option<Scene>>,
    pub position: Consensus<Option<Position>>,
    pub coins: Consensus<Option<i32>>,
    /// For each vocabulary tag, whether every selected frame carries it.
    pub events: BTreeMap<String, bool>,
}

/// Compute label consensus over `selection`.
///
/// Indices beyond the sequence are skipped. An empty (or fully skipped)
/// selection is `Mixed` everywhere with every event `false`.
pub fn selection_consensus(
    frames: &[Frame],
    selection: &[FrameIndex],
    vocabulary: &[&str],
) -> LabelConsensus {
    let mut selected = selection.iter().filter_map(|&i| frames.get(i)).map(|f| &f.labels);

    let Some(first) = selected.next() else {
        return LabelConsensus {
            scene: Consensus::Mixed,
            position: Consensus::Mixed,
            coins: Consensus::Mixed,
            events: vocabulary.iter().map(|ev| (ev.to_string(), false)).collect(),
        };
    };

    let mut consensus = LabelConsensus {
        scene: Consensus::Unanimous(first.scene),
        position: Consensus::Unanimous(first.position),
        coins: Consensus::Unanimous(first.coins),
        events: vocabulary
            .iter()
            .map(|ev| (ev.to_string(), first.events.contains(*ev)))
            .collect(),
    };

    for labels in selected {
        consensus.scene = consensus.scene.fold(labels.scene);
        consensus.position = consensus.position.fold(labels.position);
        consensus.coins = consensus.coins.fold(labels.coins);
        for (ev, all) in consensus.events.iter_mut() {
            *all = *all && labels.events.contains(ev);
        }
    }

    consensus
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// A single scalar label assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelEdit {
    Scene(Option<Scene>),
    Position(Option<Position>),
    Coins(Option<i32>),
}

fn check_selection(frames: &[Frame], selection: &[FrameIndex]) -> Result<(), CoreError> {
    match selection.iter().find(|&&i| i >= frames.len()) {
        Some(&index) => Err(CoreError::IndexOutOfRange {
            index,
            len: frames.len(),
        }),
        None => Ok(()),
    }
}

/// Apply `edit` to every selected frame.
///
/// Fails without mutating anything if any index is out of range. Returns the
/// number of distinct frames touched.
pub fn apply_label(
    frames: &mut [Frame],
    selection: &[FrameIndex],
    edit: LabelEdit,
) -> Result<usize, CoreError> {
    check_selection(frames, selection)?;

    let mut touched: Vec<FrameIndex> = selection.to_vec();
    touched.sort_unstable();
    touched.dedup();

    for &i in &touched {
        let labels = &mut frames[i].labels;
        match edit {
            LabelEdit::Scene(scene) => labels.scene = scene,
            LabelEdit::Position(position) => labels.position = position,
            LabelEdit::Coins(coins) => labels.coins = coins,
        }
    }

    Ok(touched.len())
}

/// Toggle an event tag across the selection.
///
/// If every selected frame already carries `tag` it is removed from all of
/// them; otherwise it is added where missing. Returns whether the tag is now
/// present on the selection.
pub fn toggle_event(
    frames: &mut [Frame],
    selection: &[FrameIndex],
    tag: &str,
) -> Result<bool, CoreError> {
    check_selection(frames, selection)?;

    let all_have = selection
        .iter()
        .all(|&i| frames[i].labels.events.contains(tag));

    for &i in selection {
        let events = &mut frames[i].labels.events;
        if all_have {
            events.remove(tag);
        } else {
            events.insert(tag.to_string());
        }
    }

    Ok(!all_have)
}

/// Reset every selected frame to unset labels.
pub fn clear_labels(frames: &mut [Frame], selection: &[FrameIndex]) -> Result<(), CoreError> {
    check_selection(frames, selection)?;
    for &i in selection {
        frames[i].labels = FrameLabels::default();
    }
    Ok(())
}

/// First frame with no labels at all, searching after `after` to the end
/// and then wrapping around from the start (`after` itself included).
/// Searches from 0 when `after` is `None`.
pub fn next_unlabeled(frames: &[Frame], after: Option<FrameIndex>) -> Option<FrameIndex> {
    let start = after.map_or(0, |i| i + 1).min(frames.len());
    (start..frames.len())
        .chain(0..start)
        .find(|&i| !frames[i].labels.is_labeled())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
