//! Smoothed control point
//!
//! Games are driven by one point (usually the index fingertip). When the
//! detector is absent or loses the hand, the tracker coasts toward the frame
//! center with exponential smoothing instead of snapping, so the cursor never
//! jumps on a dropped detection.

use crate::landmarks::Point;

/// Weight kept from the previous point per coasting tick (80/20 toward center)
pub const SMOOTHING_PREVIOUS: f32 = 0.8;

/// Tracks the active control point across ticks
#[derive(Debug, Clone)]
pub struct ControlTracker {
    point: Point,
    /// Whether the current point comes from a live detection
    live: bool,
}

impl ControlTracker {
    /// Start at the frame center
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            point: Point::new(frame_width as f32 / 2.0, frame_height as f32 / 2.0),
            live: false,
        }
    }

    /// Feed a fresh detection; the point snaps to it
    pub fn update(&mut self, detected: Point) {
        self.point = detected;
        self.live = true;
    }

    /// No detection this tick: ease toward the frame center
    pub fn coast(&mut self, frame_width: u32, frame_height: u32) {
        let cx = frame_width as f32 / 2.0;
        let cy = frame_height as f32 / 2.0;
        self.point = Point::new(
            self.point.x * SMOOTHING_PREVIOUS + cx * (1.0 - SMOOTHING_PREVIOUS),
            self.point.y * SMOOTHING_PREVIOUS + cy * (1.0 - SMOOTHING_PREVIOUS),
        );
        self.live = false;
    }

    /// The current control point
    pub fn point(&self) -> Point {
        self.point
    }

    /// True when the point comes from a live detection rather than coasting
    pub fn is_live(&self) -> bool {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coasting_converges_to_center_without_snapping() {
        let mut tracker = ControlTracker::new(640, 480);
        tracker.update(Point::new(0.0, 0.0));
        tracker.coast(640, 480);
        // One tick: 0 * 0.8 + 320 * 0.2 = 64
        assert!((tracker.point().x - 64.0).abs() < 1e-3);
        assert!(!tracker.is_live());
        for _ in 0..100 {
            tracker.coast(640, 480);
        }
        assert!((tracker.point().x - 320.0).abs() < 1.0);
        assert!((tracker.point().y - 240.0).abs() < 1.0);
    }

    #[test]
    fn detection_snaps_immediately() {
        let mut tracker = ControlTracker::new(640, 480);
        tracker.update(Point::new(100.0, 50.0));
        assert_eq!(tracker.point(), Point::new(100.0, 50.0));
        assert!(tracker.is_live());
    }
}
