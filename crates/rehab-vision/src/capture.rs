//! Paced frame source
//!
//! Wraps an opened camera device, enforces the target frame interval, applies
//! mirroring plus the brightness/contrast transform, and rides out transient
//! capture failures by reusing the last good frame. Downstream consumers
//! never see frames faster than the target rate.

use crate::camera::CameraDevice;
use crate::frame::Frame;
use std::time::{Duration, Instant};

/// Contrast gain applied to every captured frame (helps hand detection)
pub const ENHANCE_GAIN: f32 = 1.2;

/// Brightness offset applied to every captured frame
pub const ENHANCE_OFFSET: f32 = 10.0;

/// Backoff after a capture failure with no previous good frame
pub const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Result of a paced capture attempt
#[derive(Debug)]
pub enum Capture {
    /// A fresh (or reused-last-good) frame, mirrored and enhanced
    Frame(Frame),
    /// Nothing to hand out yet; the caller should loop and try again
    Retry,
}

/// Paced, self-healing frame source owning the camera device
pub struct FrameSource {
    device: Box<dyn CameraDevice>,
    interval: Duration,
    last_frame_at: Option<Instant>,
    last_good: Option<Frame>,
    mirror: bool,
}

impl FrameSource {
    /// Create a source targeting `fps` frames per second
    pub fn new(device: Box<dyn CameraDevice>, fps: u32) -> Self {
        Self {
            device,
            interval: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            last_frame_at: None,
            last_good: None,
            mirror: true,
        }
    }

    /// Disable horizontal mirroring (some fixtures pre-mirror)
    pub fn without_mirror(mut self) -> Self {
        self.mirror = false;
        self
    }

    /// Target interval between frames
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Capture the next frame, sleeping first if called before the target
    /// interval has elapsed
    pub fn next_frame(&mut self) -> Capture {
        if let Some(last) = self.last_frame_at {
            let since = last.elapsed();
            if since < self.interval {
                std::thread::sleep(self.interval - since);
            }
        }

        let mut frame = match self.device.read_frame() {
            Ok(frame) => {
                self.last_good = Some(frame.clone());
                frame
            }
            Err(e) => match &self.last_good {
                Some(prev) => {
                    log::warn!("capture: read failed ({}), reusing last good frame", e);
                    prev.clone()
                }
                None => {
                    log::warn!("capture: read failed ({}) with no prior frame, backing off", e);
                    std::thread::sleep(RETRY_BACKOFF);
                    return Capture::Retry;
                }
            },
        };
        self.last_frame_at = Some(Instant::now());

        if self.mirror {
            frame.mirror_horizontal();
        }
        frame.enhance(ENHANCE_GAIN, ENHANCE_OFFSET);
        Capture::Frame(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraBackend, CameraError, SyntheticCamera};

    /// Device that fails on every read
    struct DeadCamera;

    impl CameraDevice for DeadCamera {
        fn read_frame(&mut self) -> Result<Frame, CameraError> {
            Err(CameraError::CaptureFailed("dead".into()))
        }
        fn backend(&self) -> CameraBackend {
            CameraBackend::Synthetic
        }
    }

    #[test]
    fn reuses_last_good_frame_on_failure() {
        let cam = SyntheticCamera::new(32, 24).failing_every(2);
        let mut source = FrameSource::new(Box::new(cam), 1000);
        // First read succeeds, second fails and must fall back
        let first = match source.next_frame() {
            Capture::Frame(f) => f,
            Capture::Retry => panic!("first capture should succeed"),
        };
        match source.next_frame() {
            Capture::Frame(second) => {
                assert_eq!((second.width(), second.height()), (first.width(), first.height()));
            }
            Capture::Retry => panic!("fallback frame expected"),
        }
    }

    #[test]
    fn signals_retry_without_prior_frame() {
        let mut source = FrameSource::new(Box::new(DeadCamera), 1000);
        assert!(matches!(source.next_frame(), Capture::Retry));
    }

    #[test]
    fn paces_to_target_interval() {
        let cam = SyntheticCamera::new(8, 8);
        let mut source = FrameSource::new(Box::new(cam), 100); // 10ms interval
        let start = Instant::now();
        let _ = source.next_frame();
        let _ = source.next_frame();
        let _ = source.next_frame();
        // Two paced gaps of ~10ms each
        assert!(start.elapsed() >= Duration::from_millis(18));
    }
}
