//! Assessment session runtime for NeuroWell games
//!
//! Wires the capture/perception layer and the game state machines into a
//! runnable session: one worker thread drives the pipeline, a single-slot
//! relay carries composed frames to the display loop, and a bounded event
//! channel reports progress. Scores go to a pluggable sink exactly once per
//! session, whether it completes or is aborted.
//!
//! A host embeds this as:
//!
//! ```no_run
//! use std::sync::Arc;
//! use rehab_session::{config::SessionConfig, scoring::NullSink, session};
//! use rehab_vision::{acquire, AcquisitionHints, SyntheticProvider, CameraBackend};
//! use rehab_games::GameType;
//!
//! let config = SessionConfig::new(GameType::Snake, "patient-7");
//! let hints = AcquisitionHints {
//!     backends: vec![CameraBackend::Synthetic],
//!     ..Default::default()
//! };
//! let camera = acquire(&SyntheticProvider, &hints)?;
//! let mut handle = session::start(config, camera, None, Arc::new(NullSink))?;
//! // ... run a display loop on handle.relay(), then:
//! handle.stop();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compositor;
pub mod config;
pub mod consumer;
pub mod events;
pub mod font;
pub mod relay;
pub mod scoring;
pub mod session;

pub use compositor::{Compositor, Hud};
pub use config::SessionConfig;
pub use consumer::DisplayLoop;
pub use events::SessionEvent;
pub use relay::FrameRelay;
pub use scoring::{MemorySink, NullSink, ScoreRecord, ScoreSink};
pub use session::{SessionError, SessionHandle, SessionStatus};
