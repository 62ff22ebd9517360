//! Scene gap imputation.
//!
//! The upstream scene classifier occasionally drops a handful of frames in
//! the middle of a race (item flashes, screen shake). A short run of
//! `not_in_race` frames with race frames on both sides is reclassified as
//! `in_race`, and its positions are interpolated from the bounding frames.
//! Longer runs are treated as genuine non-race screens and left alone.

use crate::labels::{Frame, Position, Scene};
use crate::types::FrameIndex;

/// Default maximum gap (exclusive, in frames) that imputation will repair.
pub const DEFAULT_IMPUTE_MIN_GAP: usize = 5;

/// Reclassify short `not_in_race` runs bounded by `in_race` frames.
///
/// A run of length `run_len` is repaired only when both neighbours are
/// `in_race` and `run_len < min_gap`; a `min_gap` of 0 disables imputation.
/// Runs touching either end of the sequence are never repaired. Coins and
/// events are left untouched.
///
/// Returns the number of frames reclassified.
pub fn impute_scene(frames: &mut [Frame], min_gap: usize) -> usize {
    let n = frames.len();
    let mut imputed = 0;
    let mut i = 0;

    while i < n {
        if frames[i].labels.scene != Some(Scene::NotInRace) {
            i += 1;
            continue;
        }

        let start = i;
        let mut end = i;
        while end < n && frames[end].labels.scene == Some(Scene::NotInRace) {
            end += 1;
        }
        let run_len = end - start;

        let bounded_left = start > 0 && frames[start - 1].labels.is_in_race();
        let bounded_right = end < n && frames[end].labels.is_in_race();

        if bounded_left && bounded_right && run_len < min_gap {
            let left = frames[start - 1].labels.rank();
            let right = frames[end].labels.rank();
            for k in start..end {
                frames[k].labels.scene = Some(Scene::InRace);
                if let Some(rank) = fill_rank(left, right, k, start - 1, end) {
                    frames[k].labels.position = Some(Position::Rank(rank));
                }
                imputed += 1;
            }
        }

        i = end;
    }

    imputed
}

/// Position to assign to frame `k` lying strictly between `before` and
/// `after`.
///
/// Both bounds numeric: linear interpolation rounded to the nearest integer.
/// One bound numeric: that value. Neither: `None` (position left as is).
fn fill_rank(
    left: Option<i32>,
    right: Option<i32>,
    k: FrameIndex,
    before: FrameIndex,
    after: FrameIndex,
) -> Option<i32> {
    match (left, right) {
        (Some(lp), Some(rp)) => {
            let t = (k - before) as f64 / (after - before) as f64;
            let (lp, rp) = (lp as f64, rp as f64);
            Some((lp + t * (rp - lp)).round() as i32)
        }
        (Some(lp), None) => Some(lp),
        (None, Some(rp)) => Some(rp),
        (None, None) => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn race(ts: f64) -> Frame {
        Frame::new(ts).with_scene(Scene::InRace)
    }

    fn gap(ts: f64) -> Frame {
        Frame::new(ts).with_scene(Scene::NotInRace)
    }

    fn scenes(frames: &[Frame]) -> Vec<Option<Scene>> {
        frames.iter().map(|f| f.labels.scene).collect()
    }

    fn ranks(frames: &[Frame]) -> Vec<Option<i32>> {
        frames.iter().map(|f| f.labels.rank()).collect()
    }

    // -- interpolation ---------------------------------------------------------

    #[test]
    fn interpolates_positions_across_short_gap() {
        let mut frames = vec![
            race(0.0).with_rank(4),
            gap(1.0),
            gap(2.0),
            gap(3.0),
            race(4.0).with_rank(8),
        ];

        let imputed = impute_scene(&mut frames, 5);

        assert_eq!(imputed, 3);
        assert!(frames.iter().all(|f| f.labels.is_in_race()));
        assert_eq!(
            ranks(&frames),
            vec![Some(4), Some(5), Some(6), Some(7), Some(8)]
        );
    }

    #[test]
    fn interpolation_rounds_to_nearest() {
        // 1 -> 2 over a span of 3: 1.33 rounds to 1, 1.67 rounds to 2.
        let mut frames = vec![race(0.0).with_rank(1), gap(1.0), gap(2.0), race(3.0).with_rank(2)];

        impute_scene(&mut frames, 5);

        assert_eq!(ranks(&frames), vec![Some(1), Some(1), Some(2), Some(2)]);
    }

    #[test]
    fn interpolates_extreme_ranks_without_overflow() {
        let mut frames = vec![
            race(0.0).with_rank(i32::MIN),
            gap(1.0),
            race(2.0).with_rank(i32::MAX),
        ];

        assert_eq!(impute_scene(&mut frames, 5), 1);
        // Midpoint of i32::MIN and i32::MAX is -0.5, rounded away from zero.
        assert_eq!(frames[1].labels.rank(), Some(-1));
    }

    #[test]
    fn propagates_single_known_side() {
        let mut left_only = vec![race(0.0).with_rank(6), gap(1.0), gap(2.0), race(3.0)];
        impute_scene(&mut left_only, 5);
        assert_eq!(ranks(&left_only), vec![Some(6), Some(6), Some(6), None]);

        let mut right_only = vec![
            race(0.0).with_position(Position::NotVisible),
            gap(1.0),
            race(2.0).with_rank(9),
        ];
        impute_scene(&mut right_only, 5);
        assert_eq!(right_only[1].labels.rank(), Some(9));
    }

    #[test]
    fn leaves_position_when_neither_side_known() {
        let mut frames = vec![race(0.0), gap(1.0).with_position(Position::NotVisible), race(2.0)];

        impute_scene(&mut frames, 5);

        assert!(frames[1].labels.is_in_race());
        assert_eq!(frames[1].labels.position, Some(Position::NotVisible));
    }

    #[test]
    fn coins_and_events_untouched() {
        let mut frames = vec![
            race(0.0).with_coins(3),
            gap(1.0).with_event("shock"),
            race(2.0).with_coins(5),
        ];

        impute_scene(&mut frames, 5);

        assert_eq!(frames[1].labels.coins, None);
        assert!(frames[1].labels.events.contains("shock"));
    }

    // -- thresholds and boundaries ---------------------------------------------

    #[test]
    fn long_gap_is_left_unchanged() {
        let mut frames = vec![race(0.0).with_rank(2)];
        frames.extend((1..=5).map(|i| gap(i as f64)));
        frames.push(race(6.0).with_rank(2));
        let before = frames.clone();

        assert_eq!(impute_scene(&mut frames, 5), 0);
        assert_eq!(frames, before);
    }

    #[test]
    fn gap_one_below_threshold_is_repaired() {
        let mut frames = vec![race(0.0)];
        frames.extend((1..=4).map(|i| gap(i as f64)));
        frames.push(race(5.0));

        assert_eq!(impute_scene(&mut frames, 5), 4);
    }

    #[test]
    fn runs_touching_sequence_ends_are_never_repaired() {
        let mut frames = vec![gap(0.0), race(1.0), gap(2.0)];

        assert_eq!(impute_scene(&mut frames, 100), 0);
        assert_eq!(
            scenes(&frames),
            vec![Some(Scene::NotInRace), Some(Scene::InRace), Some(Scene::NotInRace)]
        );
    }

    #[test]
    fn unset_neighbour_does_not_bound_a_run() {
        let mut frames = vec![race(0.0), Frame::new(1.0), gap(2.0), race(3.0)];

        assert_eq!(impute_scene(&mut frames, 5), 0);
        assert_eq!(frames[2].labels.scene, Some(Scene::NotInRace));
    }

    #[test]
    fn zero_min_gap_disables_imputation() {
        let mut frames = vec![race(0.0), gap(1.0), race(2.0)];

        assert_eq!(impute_scene(&mut frames, 0), 0);
        assert_eq!(frames[1].labels.scene, Some(Scene::NotInRace));
    }

    #[test]
    fn never_regresses_race_frames() {
        let mut frames = vec![
            race(0.0),
            gap(1.0),
            race(2.0),
            Frame::new(3.0),
            gap(4.0),
            gap(5.0),
            race(6.0),
            gap(7.0),
        ];
        let were_racing: Vec<bool> = frames.iter().map(|f| f.labels.is_in_race()).collect();

        impute_scene(&mut frames, 3);

        for (frame, was) in frames.iter().zip(were_racing) {
            if was {
                assert!(frame.labels.is_in_race());
            }
        }
    }

    #[test]
    fn repairs_multiple_runs_independently() {
        let mut frames = vec![race(0.0), gap(1.0), race(2.0), gap(3.0), gap(4.0), race(5.0)];

        assert_eq!(impute_scene(&mut frames, 5), 3);
        assert!(frames.iter().all(|f| f.labels.is_in_race()));
    }

    #[test]
    fn empty_sequence_imputes_nothing() {
        let mut frames: Vec<Frame> = Vec::new();
        assert_eq!(impute_scene(&mut frames, DEFAULT_IMPUTE_MIN_GAP), 0);
    }
}
