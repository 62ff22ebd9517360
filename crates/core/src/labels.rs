//! Per-frame label model and its JSON wire format.
//!
//! A frame carries four independently settable labels: scene, position,
//! coins, and a set of event tags. Every scalar label may be unset, which
//! is represented as `None` and serialized as `null`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Seconds;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest race position shown on the HUD.
pub const MIN_POSITION: i32 = 1;

/// Highest race position shown on the HUD.
pub const MAX_POSITION: i32 = 24;

/// Highest coin count shown on the HUD.
pub const MAX_COINS: i32 = 20;

/// Wire marker for a position that is not visible on screen.
pub const NOT_VISIBLE_MARKER: &str = "x";

/// Event tags offered by the labeling tools.
///
/// The vocabulary is open; frames may carry tags outside this list.
pub const EVENT_TYPES: &[&str] = &["shock", "item_hit"];

/// Human-readable label for a known event tag.
pub fn event_label(tag: &str) -> Option<&'static str> {
    match tag {
        "shock" => Some("Shock"),
        "item_hit" => Some("Item Hit"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Scene classification of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scene {
    InRace,
    NotInRace,
}

impl Scene {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InRace => "in_race",
            Self::NotInRace => "not_in_race",
        }
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Race position read from the HUD.
///
/// Numeric ranks are not range-checked here; values outside
/// [`MIN_POSITION`]..=[`MAX_POSITION`] are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub enum Position {
    Rank(i32),
    NotVisible,
}

impl Position {
    /// The numeric rank, if this position has one.
    pub fn rank(self) -> Option<i32> {
        match self {
            Self::Rank(n) => Some(n),
            Self::NotVisible => None,
        }
    }
}

/// Untagged wire shape: a bare integer or the not-visible marker string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Rank(i32),
    Marker(String),
}

impl TryFrom<RawPosition> for Position {
    type Error = String;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        match raw {
            RawPosition::Rank(n) => Ok(Self::Rank(n)),
            RawPosition::Marker(s) if s == NOT_VISIBLE_MARKER => Ok(Self::NotVisible),
            // Saved sessions store numeric positions as strings.
            RawPosition::Marker(s) => s.trim().parse().map(Self::Rank).map_err(|_| {
                format!("invalid position '{s}', expected an integer or '{NOT_VISIBLE_MARKER}'")
            }),
        }
    }
}

impl From<Position> for RawPosition {
    fn from(position: Position) -> Self {
        match position {
            Position::Rank(n) => Self::Rank(n),
            Position::NotVisible => Self::Marker(NOT_VISIBLE_MARKER.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Frame labels
// ---------------------------------------------------------------------------

/// The label set attached to one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameLabels {
    #[serde(default)]
    pub scene: Option<Scene>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub coins: Option<i32>,
    #[serde(default)]
    pub events: BTreeSet<String>,
}

impl FrameLabels {
    /// Whether any label has been set on this frame.
    pub fn is_labeled(&self) -> bool {
        self.scene.is_some()
            || self.position.is_some()
            || self.coins.is_some()
            || !self.events.is_empty()
    }

    pub fn is_in_race(&self) -> bool {
        self.scene == Some(Scene::InRace)
    }

    /// Numeric position, treating unset and not-visible as absent.
    pub fn rank(&self) -> Option<i32> {
        self.position.and_then(Position::rank)
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One sampled frame: a media timestamp plus its labels.
///
/// Serialized flat, so `{"timestamp": 1.5, "scene": "in_race", ...}`.
/// Unknown fields (thumbnail URLs and the like) are ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp: Seconds,
    #[serde(flatten)]
    pub labels: FrameLabels,
}

impl Frame {
    /// An unlabeled frame at `timestamp`.
    pub fn new(timestamp: Seconds) -> Self {
        Self {
            timestamp,
            labels: FrameLabels::default(),
        }
    }

    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.labels.scene = Some(scene);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.labels.position = Some(position);
        self
    }

    pub fn with_rank(self, rank: i32) -> Self {
        self.with_position(Position::Rank(rank))
    }

    pub fn with_coins(mut self, coins: i32) -> Self {
        self.labels.coins = Some(coins);
        self
    }

    pub fn with_event(mut self, tag: impl Into<String>) -> Self {
        self.labels.events.insert(tag.into());
        self
    }
}

// ---------------------------------------------------------------------------
// JSON encode / decode
// ---------------------------------------------------------------------------

/// Decode a JSON array of frames.
///
/// Rejects negative or non-finite timestamps. Ordering is not enforced;
/// callers are expected to supply frames in ascending timestamp order.
pub fn decode_frames(json: &str) -> Result<Vec<Frame>, CoreError> {
    let frames: Vec<Frame> = serde_json::from_str(json)?;
    for (index, frame) in frames.iter().enumerate() {
        if !frame.timestamp.is_finite() || frame.timestamp < 0.0 {
            return Err(CoreError::Validation(format!(
                "frame {index} has invalid timestamp {}",
                frame.timestamp
            )));
        }
    }
    Ok(frames)
}

/// Encode frames as a pretty-printed JSON array.
pub fn encode_frames(frames: &[Frame]) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(frames)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
