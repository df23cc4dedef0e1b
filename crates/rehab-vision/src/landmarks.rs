//! Hand landmark types and the detector capability seam
//!
//! The actual landmark model (MediaPipe or similar) lives outside this
//! repository; the pipeline only depends on the `HandDetector` trait. A
//! detector may fail to construct at all, in which case the session runs
//! degraded on the smoothed fallback control point.

use crate::frame::Frame;
use serde::{Deserialize, Serialize};

/// Number of keypoints in a full hand landmark set
pub const KEYPOINT_COUNT: usize = 21;

/// Keypoint index of the thumb tip
pub const THUMB_TIP: usize = 4;

/// Keypoint index of the thumb interphalangeal joint
pub const THUMB_IP: usize = 3;

/// Keypoint index of the index fingertip (the snake/cursor control point)
pub const INDEX_TIP: usize = 8;

/// Tip keypoint indices for the four fingers (index, middle, ring, pinky)
pub const FINGER_TIPS: [usize; 4] = [8, 12, 16, 20];

/// PIP joint keypoint indices matching `FINGER_TIPS`
pub const FINGER_PIPS: [usize; 4] = [6, 10, 14, 18];

/// Error type for perception operations
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("Detector unavailable: {0}")]
    Unavailable(String),

    #[error("Detection failed: {0}")]
    Failed(String),
}

/// Which hand a landmark set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// A 2D/3D keypoint in frame pixel coordinates (z is relative depth)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Euclidean distance in the image plane
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned bounding box in frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One detected hand for one frame; never persisted
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    pub handedness: Handedness,
    /// Ordered keypoints; a well-formed set has `KEYPOINT_COUNT` entries
    pub keypoints: Vec<Point>,
    pub bounding_box: BoundingBox,
    pub center: Point,
}

impl LandmarkSet {
    /// Build a set from keypoints, deriving the bounding box and center
    pub fn from_keypoints(handedness: Handedness, keypoints: Vec<Point>) -> Self {
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for p in &keypoints {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let bounding_box = if keypoints.is_empty() {
            BoundingBox::default()
        } else {
            BoundingBox {
                x: min_x,
                y: min_y,
                width: max_x - min_x,
                height: max_y - min_y,
            }
        };
        let center = bounding_box.center();
        Self {
            handedness,
            keypoints,
            bounding_box,
            center,
        }
    }

    /// Index fingertip position, if the set is well formed
    pub fn index_tip(&self) -> Option<Point> {
        self.keypoints.get(INDEX_TIP).copied()
    }

    /// Thumb tip position, if the set is well formed
    pub fn thumb_tip(&self) -> Option<Point> {
        self.keypoints.get(THUMB_TIP).copied()
    }
}

/// External hand-landmark capability
///
/// `detect` is invoked on a subsample of ticks only; results are cached by
/// the session between invocations. Implementations must be cheap to drop.
pub trait HandDetector: Send {
    /// Detect up to `max_hands` hands in the frame
    fn detect(&mut self, frame: &Frame, max_hands: usize) -> Result<Vec<LandmarkSet>, DetectError>;
}
