//! Camera capture and hand perception for NeuroWell assessment sessions
//!
//! This crate provides:
//! - BGR frame buffers and software drawing primitives
//! - Camera acquisition with an ordered backend fallback walk
//! - A paced frame source with last-good-frame recovery
//! - Hand landmark types and the external detector capability trait
//! - Control-point smoothing and gesture predicates
//!
//! # Architecture
//!
//! ```text
//! CameraDevice → FrameSource (pace/mirror/enhance) → HandDetector → games
//! ```
//!
//! The camera and the detector both sit behind traits: sessions keep running
//! (degraded) when either is unavailable.

mod camera;
mod capture;
mod control;
mod frame;
mod gesture;
mod landmarks;

pub use camera::{
    acquire, AcquisitionHints, CameraBackend, CameraDevice, CameraError, CameraProvider,
    SyntheticCamera, SyntheticProvider,
};
pub use capture::{Capture, FrameSource, ENHANCE_GAIN, ENHANCE_OFFSET, RETRY_BACKOFF};
pub use control::{ControlTracker, SMOOTHING_PREVIOUS};
pub use frame::{Color, Frame, Sprite, BYTES_PER_PIXEL};
pub use gesture::{FingerExtension, GestureKind, FIST_MAX_FINGERS, OPEN_HAND_MIN_FINGERS, PINCH_THRESHOLD};
pub use landmarks::{
    BoundingBox, DetectError, HandDetector, Handedness, LandmarkSet, Point, FINGER_PIPS,
    FINGER_TIPS, INDEX_TIP, KEYPOINT_COUNT, THUMB_IP, THUMB_TIP,
};
