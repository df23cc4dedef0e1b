//! Session configuration
//!
//! Loaded from a YAML file or built in code by the host application. Every
//! field except the game type and patient id has a sensible default, so a
//! minimal clinic config is two lines. Validation runs before any thread is
//! spawned or camera is opened.

use anyhow::{Context, Result};
use rehab_games::{Difficulty, GameType};
use rehab_vision::AcquisitionHints;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Bounds accepted for the session timer
pub const MIN_DURATION_SECONDS: u64 = 5;
pub const MAX_DURATION_SECONDS: u64 = 3600;

/// Configuration for one assessment session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub game_type: GameType,
    pub patient_id: String,

    /// Session length; defaults per game when absent
    #[serde(default)]
    pub duration_seconds: Option<u64>,

    #[serde(default = "default_frame_width")]
    pub frame_width: u32,

    #[serde(default = "default_frame_height")]
    pub frame_height: u32,

    /// Producer loop target rate
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,

    /// Run hand detection on every Nth frame; intermediate frames coast on
    /// the smoothed control point
    #[serde(default = "default_process_every")]
    pub process_every_n_frames: u32,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    pub camera: AcquisitionHints,
}

fn default_frame_width() -> u32 {
    640
}

fn default_frame_height() -> u32 {
    480
}

fn default_target_fps() -> u32 {
    30
}

fn default_process_every() -> u32 {
    3
}

impl SessionConfig {
    pub fn new(game_type: GameType, patient_id: impl Into<String>) -> Self {
        Self {
            game_type,
            patient_id: patient_id.into(),
            duration_seconds: None,
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            target_fps: default_target_fps(),
            process_every_n_frames: default_process_every(),
            difficulty: Difficulty::default(),
            camera: AcquisitionHints::default(),
        }
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("neurowell")
            .join("session.yaml")
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading session config {}", path.display()))?;
        let config: SessionConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing session config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Effective session length
    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
            .unwrap_or_else(|| self.game_type.default_duration_seconds())
    }

    /// Reject configurations the pipeline cannot run
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.patient_id.trim().is_empty(), "patient_id must be set");
        anyhow::ensure!(
            self.frame_width >= 160 && self.frame_height >= 120,
            "frame dimensions too small: {}x{}",
            self.frame_width,
            self.frame_height
        );
        anyhow::ensure!(self.target_fps >= 1, "target_fps must be at least 1");
        anyhow::ensure!(
            self.process_every_n_frames >= 1,
            "process_every_n_frames must be at least 1"
        );
        let duration = self.duration_seconds();
        anyhow::ensure!(
            (MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&duration),
            "duration_seconds {} outside {}..={}",
            duration,
            MIN_DURATION_SECONDS,
            MAX_DURATION_SECONDS
        );
        anyhow::ensure!(
            !self.camera.backends.is_empty(),
            "camera.backends must list at least one backend"
        );
        Ok(())
    }
}
