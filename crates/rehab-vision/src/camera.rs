//! Camera device acquisition
//!
//! The physical camera sits behind the `CameraDevice` trait so the session
//! pipeline, tests and headless runs are independent of any particular
//! capture backend. Acquisition walks an ordered backend preference list and
//! succeeds on the first backend that opens, mirroring how capture stacks
//! behave on Windows (DirectShow first, then the default API).

use crate::frame::Frame;
use serde::{Deserialize, Serialize};

/// Error type for camera operations
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Backend {0:?} is not available on this host")]
    BackendUnavailable(CameraBackend),

    #[error("Failed to open camera device {index} via {backend:?}: {reason}")]
    OpenFailed {
        backend: CameraBackend,
        index: u32,
        reason: String,
    },

    #[error("No camera backend could open device {0}")]
    AllBackendsFailed(u32),

    #[error("Transient capture failure: {0}")]
    CaptureFailed(String),

    #[error("Camera device disconnected")]
    Disconnected,
}

/// Capture backend identifiers, in the order callers prefer them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraBackend {
    /// Platform default (whatever the OS capture API picks)
    Default,
    /// DirectShow (Windows)
    DirectShow,
    /// Video4Linux2 (Linux)
    V4l2,
    /// AVFoundation (macOS)
    AvFoundation,
    /// In-process synthetic source (tests, headless demos)
    Synthetic,
}

/// Camera acquisition hints from the session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionHints {
    /// OS device index
    pub device_index: u32,
    /// Backends to try, in order; first success wins
    pub backends: Vec<CameraBackend>,
    /// Requested capture width
    pub width: u32,
    /// Requested capture height
    pub height: u32,
    /// Requested capture rate
    pub fps: u32,
    /// Driver-side frame queue depth; 1 minimizes latency
    pub buffer_size: u32,
}

impl Default for AcquisitionHints {
    fn default() -> Self {
        Self {
            device_index: 0,
            backends: vec![CameraBackend::DirectShow, CameraBackend::Default],
            width: 640,
            height: 480,
            fps: 30,
            buffer_size: 1,
        }
    }
}

/// An opened capture device
///
/// `read_frame` may fail transiently; the frame source above this layer
/// decides whether to reuse the last good frame or back off.
pub trait CameraDevice: Send {
    /// Grab the next frame from the device
    fn read_frame(&mut self) -> Result<Frame, CameraError>;

    /// Which backend actually opened the device
    fn backend(&self) -> CameraBackend;
}

/// Opens `CameraDevice`s for specific backends
///
/// Platform integrations implement this once; the acquisition walk below is
/// shared. A provider returns `BackendUnavailable` for backends it does not
/// support so the walk can continue down the preference list.
pub trait CameraProvider {
    fn open(
        &self,
        backend: CameraBackend,
        hints: &AcquisitionHints,
    ) -> Result<Box<dyn CameraDevice>, CameraError>;
}

/// Try each hinted backend in order and return the first device that opens
pub fn acquire(
    provider: &dyn CameraProvider,
    hints: &AcquisitionHints,
) -> Result<Box<dyn CameraDevice>, CameraError> {
    for &backend in &hints.backends {
        match provider.open(backend, hints) {
            Ok(device) => {
                log::info!(
                    "camera: opened device {} via {:?} at {}x{}@{}",
                    hints.device_index,
                    backend,
                    hints.width,
                    hints.height,
                    hints.fps
                );
                return Ok(device);
            }
            Err(e) => {
                log::debug!("camera: backend {:?} failed: {}", backend, e);
            }
        }
    }
    Err(CameraError::AllBackendsFailed(hints.device_index))
}

/// Synthetic camera that renders a moving gradient test pattern
///
/// Used by tests and headless sessions; also handy for demoing the pipeline
/// without hardware.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    tick: u32,
    /// When set, every read at a multiple of this interval fails transiently
    fail_every: Option<u32>,
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
            fail_every: None,
        }
    }

    /// Make every `n`th read fail, for capture-recovery tests
    pub fn failing_every(mut self, n: u32) -> Self {
        self.fail_every = Some(n.max(1));
        self
    }
}

impl CameraDevice for SyntheticCamera {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        self.tick = self.tick.wrapping_add(1);
        if let Some(n) = self.fail_every {
            if self.tick % n == 0 {
                return Err(CameraError::CaptureFailed("synthetic fault".into()));
            }
        }
        let mut frame = Frame::new(self.width, self.height);
        let shift = (self.tick % 256) as u8;
        let data = frame.data_mut();
        for (i, v) in data.iter_mut().enumerate() {
            *v = ((i % 251) as u8).wrapping_add(shift);
        }
        Ok(frame)
    }

    fn backend(&self) -> CameraBackend {
        CameraBackend::Synthetic
    }
}

/// Provider exposing only the synthetic backend
pub struct SyntheticProvider;

impl CameraProvider for SyntheticProvider {
    fn open(
        &self,
        backend: CameraBackend,
        hints: &AcquisitionHints,
    ) -> Result<Box<dyn CameraDevice>, CameraError> {
        match backend {
            CameraBackend::Synthetic => {
                Ok(Box::new(SyntheticCamera::new(hints.width, hints.height)))
            }
            other => Err(CameraError::BackendUnavailable(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_walks_fallback_order() {
        let hints = AcquisitionHints {
            backends: vec![
                CameraBackend::DirectShow,
                CameraBackend::V4l2,
                CameraBackend::Synthetic,
            ],
            ..Default::default()
        };
        let device = acquire(&SyntheticProvider, &hints).expect("synthetic backend opens");
        assert_eq!(device.backend(), CameraBackend::Synthetic);
    }

    #[test]
    fn acquire_fails_when_no_backend_opens() {
        let hints = AcquisitionHints {
            backends: vec![CameraBackend::DirectShow, CameraBackend::Default],
            ..Default::default()
        };
        assert!(matches!(
            acquire(&SyntheticProvider, &hints),
            Err(CameraError::AllBackendsFailed(0))
        ));
    }

    #[test]
    fn synthetic_camera_produces_frames_of_requested_size() {
        let mut cam = SyntheticCamera::new(64, 48);
        let frame = cam.read_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (64, 48));
    }
}
