//! Gesture predicates over hand landmarks
//!
//! Each gesture is a pure function of one landmark set: either a pattern over
//! the five-digit extension vector, or (for pinch) a thumb-to-index distance
//! test. The checklist game evaluates exactly one of these per tick.

use crate::landmarks::{
    Handedness, LandmarkSet, FINGER_PIPS, FINGER_TIPS, THUMB_IP, THUMB_TIP,
};
use serde::{Deserialize, Serialize};

/// Pinch detection threshold between thumb tip and index tip, in pixels
pub const PINCH_THRESHOLD: f32 = 40.0;

/// Minimum extended digits for an open hand
pub const OPEN_HAND_MIN_FINGERS: u32 = 4;

/// Maximum extended digits for a fist (the thumb often reads extended)
pub const FIST_MAX_FINGERS: u32 = 1;

/// Per-digit extension flags: [thumb, index, middle, ring, pinky]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerExtension(pub [bool; 5]);

impl FingerExtension {
    /// Derive the extension vector from landmark geometry
    ///
    /// Fingers count as extended when the tip sits above its PIP joint in
    /// image coordinates; the thumb when its tip is lateral to the IP joint
    /// (side depends on handedness, since frames are mirrored).
    pub fn from_landmarks(hand: &LandmarkSet) -> Option<Self> {
        let tip = hand.keypoints.get(THUMB_TIP)?;
        let ip = hand.keypoints.get(THUMB_IP)?;
        let thumb = match hand.handedness {
            Handedness::Right => tip.x < ip.x,
            Handedness::Left => tip.x > ip.x,
        };
        let mut flags = [thumb, false, false, false, false];
        for (i, (&tip_idx, &pip_idx)) in FINGER_TIPS.iter().zip(FINGER_PIPS.iter()).enumerate() {
            let tip = hand.keypoints.get(tip_idx)?;
            let pip = hand.keypoints.get(pip_idx)?;
            flags[i + 1] = tip.y < pip.y;
        }
        Some(Self(flags))
    }

    /// Number of extended digits
    pub fn count(&self) -> u32 {
        self.0.iter().filter(|&&f| f).count() as u32
    }
}

/// The gestures the checklist assessment asks for, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    OpenHand,
    Fist,
    PeaceSign,
    ThumbUp,
    Pinch,
}

impl GestureKind {
    /// Display name shown in the guidance overlay
    pub fn name(&self) -> &'static str {
        match self {
            GestureKind::OpenHand => "Open Hand",
            GestureKind::Fist => "Fist",
            GestureKind::PeaceSign => "Peace Sign",
            GestureKind::ThumbUp => "Thumb Up",
            GestureKind::Pinch => "Pinch",
        }
    }

    /// Short instruction for the patient
    pub fn instruction(&self) -> &'static str {
        match self {
            GestureKind::OpenHand => "Spread all fingers",
            GestureKind::Fist => "Close all fingers",
            GestureKind::PeaceSign => "Index and middle finger up",
            GestureKind::ThumbUp => "Only thumb extended",
            GestureKind::Pinch => "Thumb and index finger together",
        }
    }

    /// Evaluate the gesture against one hand
    pub fn matches(&self, hand: &LandmarkSet) -> bool {
        match self {
            GestureKind::Pinch => is_pinch(hand),
            other => {
                let Some(fingers) = FingerExtension::from_landmarks(hand) else {
                    return false;
                };
                match other {
                    GestureKind::OpenHand => fingers.count() >= OPEN_HAND_MIN_FINGERS,
                    GestureKind::Fist => fingers.count() <= FIST_MAX_FINGERS,
                    GestureKind::PeaceSign => {
                        fingers.0 == [false, true, true, false, false]
                    }
                    GestureKind::ThumbUp => fingers.0 == [true, false, false, false, false],
                    GestureKind::Pinch => unreachable!(),
                }
            }
        }
    }
}

/// Pinch: thumb tip and index tip within `PINCH_THRESHOLD` pixels
fn is_pinch(hand: &LandmarkSet) -> bool {
    match (hand.thumb_tip(), hand.index_tip()) {
        (Some(thumb), Some(index)) => thumb.distance(&index) < PINCH_THRESHOLD,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Point, KEYPOINT_COUNT};

    /// Hand fixture with the given digits extended, right-handed
    fn hand_with(flags: [bool; 5]) -> LandmarkSet {
        let mut pts = vec![Point::new(100.0, 100.0); KEYPOINT_COUNT];
        // Thumb: tip left of IP means extended on a right hand
        pts[THUMB_IP] = Point::new(80.0, 90.0);
        pts[THUMB_TIP] = if flags[0] {
            Point::new(60.0, 90.0)
        } else {
            Point::new(90.0, 90.0)
        };
        for (i, (&tip, &pip)) in FINGER_TIPS.iter().zip(FINGER_PIPS.iter()).enumerate() {
            pts[pip] = Point::new(100.0 + i as f32 * 10.0, 80.0);
            pts[tip] = if flags[i + 1] {
                Point::new(100.0 + i as f32 * 10.0, 40.0)
            } else {
                Point::new(100.0 + i as f32 * 10.0, 95.0)
            };
        }
        LandmarkSet::from_keypoints(Handedness::Right, pts)
    }

    #[test]
    fn extension_vector_matches_fixture() {
        let hand = hand_with([true, true, false, false, true]);
        let fingers = FingerExtension::from_landmarks(&hand).unwrap();
        assert_eq!(fingers.0, [true, true, false, false, true]);
        assert_eq!(fingers.count(), 3);
    }

    #[test]
    fn open_hand_and_fist() {
        assert!(GestureKind::OpenHand.matches(&hand_with([true, true, true, true, true])));
        assert!(GestureKind::OpenHand.matches(&hand_with([false, true, true, true, true])));
        assert!(!GestureKind::OpenHand.matches(&hand_with([false, true, true, true, false])));
        assert!(GestureKind::Fist.matches(&hand_with([true, false, false, false, false])));
        assert!(!GestureKind::Fist.matches(&hand_with([true, true, false, false, false])));
    }

    #[test]
    fn peace_and_thumb_up_are_exact_patterns() {
        assert!(GestureKind::PeaceSign.matches(&hand_with([false, true, true, false, false])));
        assert!(!GestureKind::PeaceSign.matches(&hand_with([true, true, true, false, false])));
        assert!(GestureKind::ThumbUp.matches(&hand_with([true, false, false, false, false])));
        assert!(!GestureKind::ThumbUp.matches(&hand_with([true, true, false, false, false])));
    }

    #[test]
    fn pinch_uses_tip_distance() {
        let mut pts = vec![Point::new(0.0, 0.0); KEYPOINT_COUNT];
        pts[THUMB_TIP] = Point::new(100.0, 100.0);
        pts[crate::landmarks::INDEX_TIP] = Point::new(130.0, 100.0);
        let near = LandmarkSet::from_keypoints(Handedness::Right, pts.clone());
        assert!(GestureKind::Pinch.matches(&near)); // 30 < 40

        pts[crate::landmarks::INDEX_TIP] = Point::new(141.0, 100.0);
        let far = LandmarkSet::from_keypoints(Handedness::Right, pts);
        assert!(!GestureKind::Pinch.matches(&far)); // 41 >= 40
    }
}
