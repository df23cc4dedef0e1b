//! Common per-tick step contract shared by all four games

use crate::overlay::OverlayCmd;
use rehab_vision::{LandmarkSet, Point};
use std::time::Duration;

/// Everything a game sees for one tick
#[derive(Debug)]
pub struct StepInput<'a> {
    pub frame_width: u32,
    pub frame_height: u32,
    /// Smoothed control point (index fingertip or coasting fallback)
    pub control: Point,
    /// True when `control` comes from a live detection this cycle
    pub control_live: bool,
    /// Most recent detection result (empty when no hands were found)
    pub hands: &'a [LandmarkSet],
    /// Wall-clock time since the session started
    pub elapsed: Duration,
}

/// What one tick produced
#[derive(Debug, Default)]
pub struct StepOutput {
    /// Drawing instructions for the compositor, in paint order
    pub overlay: Vec<OverlayCmd>,
    /// Points awarded (or revoked) this tick
    pub score_delta: i64,
    /// Game-internal end condition reached (board exhausted, checklist done)
    pub finished: bool,
}
