//! Gesture checklist assessment (hand function)
//!
//! The patient works through a fixed, ordered list of gestures. Only the
//! current entry is ever evaluated; the index never regresses and completed
//! entries are never re-checked, so a lingering pose cannot double-score.
//! A detection-rate bonus rewards keeping the hand visible.

use crate::overlay::OverlayCmd;
use crate::step::{StepInput, StepOutput};
use rehab_vision::{Color, GestureKind};

/// Points per completed gesture
pub const POINTS_PER_GESTURE: i64 = 20;

/// Maximum detection-rate completion bonus
pub const BONUS_MAX: i64 = 10;

/// Detection rate above which the bonus starts accruing
pub const BONUS_RATE_FLOOR: f64 = 0.80;

/// The assessment's gesture sequence, in order
pub const CHECKLIST: [GestureKind; 5] = [
    GestureKind::OpenHand,
    GestureKind::Fist,
    GestureKind::PeaceSign,
    GestureKind::ThumbUp,
    GestureKind::Pinch,
];

/// One checklist entry
#[derive(Debug, Clone)]
pub struct ChecklistEntry {
    pub gesture: GestureKind,
    pub completed: bool,
}

/// Gesture checklist state
#[derive(Debug, Clone)]
pub struct ChecklistState {
    pub entries: Vec<ChecklistEntry>,
    pub current_index: usize,
    pub score: u32,
    ticks_total: u64,
    ticks_with_hand: u64,
}

impl ChecklistState {
    pub fn new() -> Self {
        Self {
            entries: CHECKLIST
                .iter()
                .map(|&gesture| ChecklistEntry {
                    gesture,
                    completed: false,
                })
                .collect(),
            current_index: 0,
            score: 0,
            ticks_total: 0,
            ticks_with_hand: 0,
        }
    }

    pub fn score(&self) -> i64 {
        self.score as i64
    }

    /// All entries completed
    pub fn all_completed(&self) -> bool {
        self.entries.iter().all(|e| e.completed)
    }

    /// Fraction of ticks in which at least one hand was detected
    pub fn detection_rate(&self) -> f64 {
        self.ticks_with_hand as f64 / self.ticks_total.max(1) as f64
    }

    /// Detection-rate bonus awarded at session end
    pub fn completion_bonus(&self) -> i64 {
        let rate = self.detection_rate();
        if rate > BONUS_RATE_FLOOR {
            ((BONUS_MAX as f64) * (rate - BONUS_RATE_FLOOR) / (1.0 - BONUS_RATE_FLOOR)) as i64
        } else {
            0
        }
    }

    /// Advance one tick, evaluating only the current entry
    pub fn step(&mut self, input: &StepInput) -> StepOutput {
        let mut out = StepOutput::default();
        self.ticks_total += 1;
        if !input.hands.is_empty() {
            self.ticks_with_hand += 1;
        }

        if let Some(entry) = self.entries.get_mut(self.current_index) {
            if !entry.completed {
                if let Some(hand) = input.hands.first() {
                    if entry.gesture.matches(hand) {
                        entry.completed = true;
                        self.score += POINTS_PER_GESTURE as u32;
                        out.score_delta = POINTS_PER_GESTURE;
                        log::info!(
                            "checklist: {} completed ({}/{})",
                            entry.gesture.name(),
                            self.current_index + 1,
                            self.entries.len()
                        );
                        if self.current_index < self.entries.len() - 1 {
                            self.current_index += 1;
                        }
                    }
                }
            }
        }

        out.finished = self.all_completed();
        self.render(input, &mut out.overlay);
        out
    }

    fn render(&self, input: &StepInput, overlay: &mut Vec<OverlayCmd>) {
        let current = &self.entries[self.current_index];
        overlay.push(OverlayCmd::text(
            20,
            30,
            format!("Make this gesture: {}", current.gesture.name()),
            Color::WHITE,
        ));
        overlay.push(OverlayCmd::Text {
            x: 20,
            y: 60,
            text: current.gesture.instruction().to_string(),
            scale: 1,
            color: Color::TEAL,
        });

        // Progress ticks down the left edge
        for (i, entry) in self.entries.iter().enumerate() {
            let color = if entry.completed { Color::GREEN } else { Color::PANEL };
            overlay.push(OverlayCmd::Circle {
                center: rehab_vision::Point::new(30.0, 100.0 + i as f32 * 30.0),
                radius: 8,
                color,
            });
        }

        if input.hands.is_empty() {
            overlay.push(OverlayCmd::text(
                20,
                110,
                "No hand detected - show your hand to camera",
                Color::RED,
            ));
        }
    }
}

impl Default for ChecklistState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepInput;
    use rehab_vision::{Handedness, LandmarkSet, Point, FINGER_PIPS, FINGER_TIPS, KEYPOINT_COUNT, THUMB_IP, THUMB_TIP};
    use std::time::Duration;

    /// Right-hand fixture with the given digits extended
    fn hand_with(flags: [bool; 5]) -> LandmarkSet {
        let mut pts = vec![Point::new(100.0, 100.0); KEYPOINT_COUNT];
        pts[THUMB_IP] = Point::new(80.0, 90.0);
        pts[THUMB_TIP] = if flags[0] {
            Point::new(60.0, 90.0)
        } else {
            Point::new(90.0, 90.0)
        };
        for (i, (&tip, &pip)) in FINGER_TIPS.iter().zip(FINGER_PIPS.iter()).enumerate() {
            pts[pip] = Point::new(150.0 + i as f32 * 10.0, 80.0);
            pts[tip] = if flags[i + 1] {
                Point::new(150.0 + i as f32 * 10.0, 40.0)
            } else {
                Point::new(150.0 + i as f32 * 10.0, 95.0)
            };
        }
        LandmarkSet::from_keypoints(Handedness::Right, pts)
    }

    fn input(hands: &[LandmarkSet]) -> StepInput<'_> {
        StepInput {
            frame_width: 640,
            frame_height: 480,
            control: Point::new(320.0, 240.0),
            control_live: !hands.is_empty(),
            hands,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn index_is_monotonic_and_advances_at_most_one_per_tick() {
        let mut state = ChecklistState::new();
        let open = [hand_with([true, true, true, true, true])];
        let mut last_index = state.current_index;
        for _ in 0..10 {
            state.step(&input(&open));
            assert!(state.current_index >= last_index);
            assert!(state.current_index - last_index <= 1);
            last_index = state.current_index;
        }
        // Open hand only satisfies the first entry; fist never matches it
        assert_eq!(state.current_index, 1);
        assert_eq!(state.score, POINTS_PER_GESTURE as u32);
    }

    #[test]
    fn completed_entries_are_never_reevaluated() {
        let mut state = ChecklistState::new();
        // Complete OpenHand, then Fist
        state.step(&input(&[hand_with([true, true, true, true, true])]));
        state.step(&input(&[hand_with([false, false, false, false, false])]));
        assert_eq!(state.current_index, 2); // now at Peace

        // A fist again: matches the completed entry 1, but must not score
        let score_before = state.score;
        state.step(&input(&[hand_with([false, false, false, false, false])]));
        assert_eq!(state.score, score_before);
        assert_eq!(state.current_index, 2);
    }

    #[test]
    fn peace_at_index_two_scores_and_advances() {
        let mut state = ChecklistState::new();
        state.entries[0].completed = true;
        state.entries[1].completed = true;
        state.current_index = 2;

        let out = state.step(&input(&[hand_with([false, true, true, false, false])]));

        assert_eq!(state.current_index, 3);
        assert_eq!(out.score_delta, POINTS_PER_GESTURE);
        assert_eq!(state.score, POINTS_PER_GESTURE as u32);
    }

    #[test]
    fn finishes_when_all_completed() {
        let mut state = ChecklistState::new();
        let sequences: [[bool; 5]; 4] = [
            [true, true, true, true, true],    // open hand
            [false, false, false, false, false], // fist
            [false, true, true, false, false], // peace
            [true, false, false, false, false], // thumb up
        ];
        for flags in sequences {
            let out = state.step(&input(&[hand_with(flags)]));
            assert!(!out.finished);
        }
        // Pinch: thumb tip and index tip brought together
        let mut pts = vec![Point::new(200.0, 200.0); KEYPOINT_COUNT];
        pts[THUMB_TIP] = Point::new(100.0, 100.0);
        pts[rehab_vision::INDEX_TIP] = Point::new(110.0, 100.0);
        let pinch = LandmarkSet::from_keypoints(Handedness::Right, pts);
        let out = state.step(&input(&[pinch]));
        assert!(out.finished);
        assert!(state.all_completed());
        assert_eq!(state.score, 5 * POINTS_PER_GESTURE as u32);
    }

    #[test]
    fn completion_bonus_tracks_detection_rate() {
        let mut state = ChecklistState::new();
        state.ticks_total = 100;
        state.ticks_with_hand = 100;
        assert_eq!(state.completion_bonus(), BONUS_MAX);

        state.ticks_with_hand = 90;
        assert_eq!(state.completion_bonus(), 5);

        state.ticks_with_hand = 70;
        assert_eq!(state.completion_bonus(), 0);
    }
}
