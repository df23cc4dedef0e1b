//! Session orchestration
//!
//! A session owns one worker thread running the whole pipeline: paced
//! capture, subsampled hand detection, one game step per frame, composition,
//! and publication to the frame relay. The host observes progress over the
//! event channel and stops the session through the handle.
//!
//! Architecture:
//!
//! ```text
//!   [worker thread]                                [host thread]
//!   FrameSource -> HandDetector -> GameState
//!        |                            |
//!        +---------> Compositor <-----+
//!                        |
//!                   FrameRelay  ----------------->  DisplayLoop
//!                   SessionEvent channel --------->  host
//! ```
//!
//! The score sink is called exactly once per session, on the single exit
//! path shared by completion and abort.

use crate::compositor::{Compositor, Hud};
use crate::config::SessionConfig;
use crate::events::{event_channel, send_event, SessionEvent};
use crate::relay::FrameRelay;
use crate::scoring::{ScoreRecord, ScoreSink};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rehab_games::{GameState, GameType, OverlayCmd, StepInput};
use rehab_vision::{
    Capture, CameraDevice, Color, ControlTracker, Frame, FrameSource, HandDetector, LandmarkSet,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Minimum interval between ScoreChanged events
pub const SCORE_EVENT_INTERVAL: Duration = Duration::from_millis(250);

/// How long the final frame stays published after completion
pub const FINAL_FRAME_HOLD: Duration = Duration::from_secs(3);

/// Increment used while holding the final frame, so stop stays responsive
const HOLD_SLICE: Duration = Duration::from_millis(100);

/// How long `stop` waits for the worker to wind down before detaching
const JOIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors surfaced before the worker thread starts
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Camera(#[from] rehab_vision::CameraError),

    #[error("Failed to spawn session worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Lifecycle of a session, observable from the handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Completed,
    Aborted,
}

/// Handle to a running session
///
/// Dropping the handle stops the worker and joins it, same as `stop`.
pub struct SessionHandle {
    id: String,
    stop: Arc<AtomicBool>,
    alive: Arc<AtomicBool>,
    status: Arc<Mutex<SessionStatus>>,
    worker: Option<JoinHandle<()>>,
    relay: Arc<FrameRelay>,
    events: flume::Receiver<SessionEvent>,
}

impl SessionHandle {
    /// Identifier assigned to this session at start
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Latest-frame mailbox for the display loop
    pub fn relay(&self) -> Arc<FrameRelay> {
        Arc::clone(&self.relay)
    }

    /// Progress events; drain with `try_recv` from the host loop
    pub fn events(&self) -> &flume::Receiver<SessionEvent> {
        &self.events
    }

    /// Whether the worker thread is still running
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    /// Current lifecycle status
    pub fn status(&self) -> SessionStatus {
        match self.status.lock() {
            Ok(status) => *status,
            Err(_) => SessionStatus::Aborted,
        }
    }

    /// Request shutdown and wait (bounded) for the worker to finish
    ///
    /// If the worker does not wind down within the timeout the thread is
    /// detached rather than blocking the host indefinitely.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        let Some(worker) = self.worker.take() else {
            return;
        };
        let deadline = Instant::now() + JOIN_TIMEOUT;
        while self.alive.load(Ordering::Relaxed) {
            if Instant::now() >= deadline {
                log::error!("session: worker did not stop in time, detaching");
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        if worker.join().is_err() {
            log::error!("session: worker thread panicked");
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start a session on the given camera device
///
/// The config is validated and the camera handed over before the worker
/// spawns, so misconfiguration fails here rather than inside the thread.
/// `detector` may be None; the session then runs degraded, with every game
/// coasting on the centered control point.
pub fn start(
    config: SessionConfig,
    camera: Box<dyn CameraDevice>,
    detector: Option<Box<dyn HandDetector>>,
    sink: Arc<dyn ScoreSink>,
) -> Result<SessionHandle, SessionError> {
    config
        .validate()
        .map_err(|e| SessionError::InvalidConfig(e.to_string()))?;
    if detector.is_none() {
        log::warn!("session: no hand detector wired, running degraded");
    }

    let id = format!(
        "{}-{}",
        config.game_type,
        chrono::Utc::now().timestamp_millis()
    );
    let stop = Arc::new(AtomicBool::new(false));
    let alive = Arc::new(AtomicBool::new(true));
    let status = Arc::new(Mutex::new(SessionStatus::Running));
    let relay = Arc::new(FrameRelay::new());
    let (event_tx, event_rx) = event_channel();

    let worker = {
        let id = id.clone();
        let stop = Arc::clone(&stop);
        let alive = Arc::clone(&alive);
        let status = Arc::clone(&status);
        let relay = Arc::clone(&relay);
        std::thread::Builder::new()
            .name("session-worker".to_string())
            .spawn(move || {
                let mut worker = Worker {
                    id,
                    config,
                    camera: Some(camera),
                    detector,
                    sink,
                    stop,
                    status,
                    relay,
                    event_tx,
                };
                worker.run();
                alive.store(false, Ordering::Relaxed);
            })?
    };

    Ok(SessionHandle {
        id,
        stop,
        alive,
        status,
        worker: Some(worker),
        relay,
        events: event_rx,
    })
}

/// Everything the worker thread owns
struct Worker {
    id: String,
    config: SessionConfig,
    camera: Option<Box<dyn CameraDevice>>,
    detector: Option<Box<dyn HandDetector>>,
    sink: Arc<dyn ScoreSink>,
    stop: Arc<AtomicBool>,
    status: Arc<Mutex<SessionStatus>>,
    relay: Arc<FrameRelay>,
    event_tx: flume::Sender<SessionEvent>,
}

/// How the frame loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed,
    Aborted,
}

impl Worker {
    fn run(&mut self) {
        let config = self.config.clone();
        let duration = Duration::from_secs(config.duration_seconds());
        let max_hands = match config.game_type {
            GameType::Ball => 2,
            _ => 1,
        };

        let mut source = match self.camera.take() {
            Some(camera) => FrameSource::new(camera, config.target_fps),
            None => return,
        };

        let mut rng = SmallRng::from_entropy();
        let mut game = GameState::new(
            config.game_type,
            config.difficulty,
            config.frame_width,
            config.frame_height,
            &mut rng,
        );
        let mut compositor = Compositor::new(config.game_type);
        let mut tracker = ControlTracker::new(config.frame_width, config.frame_height);
        let mut hands: Vec<LandmarkSet> = Vec::new();
        let mut hand_visible = false;
        let mut last_score: i64 = 0;
        let mut last_score_event: Option<Instant> = None;

        log::info!(
            "session: starting {} ({} for patient {}, {}s)",
            self.id,
            config.game_type,
            config.patient_id,
            duration.as_secs()
        );

        let started = Instant::now();
        let mut tick: u64 = 0;
        let mut last_frame: Option<Frame> = None;
        let outcome = loop {
            if self.stop.load(Ordering::Relaxed) {
                break Outcome::Aborted;
            }
            let elapsed = started.elapsed();
            if elapsed >= duration {
                break Outcome::Completed;
            }

            let mut frame = match source.next_frame() {
                Capture::Frame(frame) => frame,
                Capture::Retry => continue,
            };
            tick += 1;

            // Detection runs on every Nth frame; intermediate frames reuse
            // the last result so games see a stable control point
            if tick % config.process_every_n_frames as u64 == 1
                || config.process_every_n_frames == 1
            {
                if let Some(detector) = &mut self.detector {
                    match detector.detect(&frame, max_hands) {
                        Ok(detected) => hands = detected,
                        Err(e) => {
                            log::warn!("session: hand detection failed: {}", e);
                            hands.clear();
                        }
                    }
                } else {
                    hands.clear();
                }
                match hands.first().and_then(|h| h.index_tip()) {
                    Some(tip) => tracker.update(tip),
                    None => tracker.coast(config.frame_width, config.frame_height),
                }

                let visible = !hands.is_empty();
                if visible != hand_visible {
                    hand_visible = visible;
                    send_event(&self.event_tx, SessionEvent::HandStatus { visible });
                }
            } else if hands.is_empty() {
                // Degraded ticks keep easing toward center between detections
                tracker.coast(config.frame_width, config.frame_height);
            }

            let input = StepInput {
                frame_width: frame.width(),
                frame_height: frame.height(),
                control: tracker.point(),
                control_live: tracker.is_live(),
                hands: &hands,
                elapsed,
            };
            let mut out = game.step(&input, &mut rng);

            // Cursor feedback for control-point games: yellow when coasting
            if matches!(config.game_type, GameType::Snake | GameType::Emoji) {
                let fill = if tracker.is_live() {
                    Color::GREEN
                } else {
                    Color::YELLOW
                };
                out.overlay.push(OverlayCmd::Circle {
                    center: tracker.point(),
                    radius: 8,
                    color: fill,
                });
                out.overlay.push(OverlayCmd::Ring {
                    center: tracker.point(),
                    radius: 12,
                    thickness: 2,
                    color: Color::WHITE,
                });
            }

            let score = game.score();
            if score != last_score {
                let due = match last_score_event {
                    Some(at) => at.elapsed() >= SCORE_EVENT_INTERVAL,
                    None => true,
                };
                if due {
                    send_event(&self.event_tx, SessionEvent::ScoreChanged(score));
                    last_score = score;
                    last_score_event = Some(Instant::now());
                }
            }

            let remaining = duration.saturating_sub(elapsed).as_secs();
            compositor.compose(
                &mut frame,
                &out.overlay,
                Hud {
                    score,
                    remaining_seconds: remaining,
                },
            );
            self.relay.publish(frame.clone());
            last_frame = Some(frame);

            if out.finished {
                log::info!("session: game reached its end condition");
                break Outcome::Completed;
            }
        };

        self.finish(outcome, &config, &game, last_frame);
    }

    /// Single exit path for both completion and abort: the score is
    /// submitted here and nowhere else, so no run can submit twice
    fn finish(
        &mut self,
        outcome: Outcome,
        config: &SessionConfig,
        game: &GameState,
        last_frame: Option<Frame>,
    ) {
        if let Ok(mut status) = self.status.lock() {
            *status = match outcome {
                Outcome::Completed => SessionStatus::Completed,
                Outcome::Aborted => SessionStatus::Aborted,
            };
        }

        let score = game.score() + game.completion_bonus();
        let record = ScoreRecord::new(
            self.id.clone(),
            config.patient_id.clone(),
            config.game_type,
            score,
        );
        if !self.sink.record_score(&record) {
            log::error!(
                "session: score sink rejected {} score {} for {}",
                record.game_type,
                record.score,
                record.patient_id
            );
        }

        match outcome {
            Outcome::Completed => {
                log::info!("session: completed with score {}", score);
                send_event(
                    &self.event_tx,
                    SessionEvent::Completed {
                        game_type: config.game_type,
                        score,
                    },
                );
                if let Some(frame) = last_frame {
                    self.hold_final_frame(frame, score);
                }
            }
            Outcome::Aborted => {
                log::info!("session: aborted with score {}", score);
                send_event(
                    &self.event_tx,
                    SessionEvent::Aborted {
                        game_type: config.game_type,
                        score,
                    },
                );
            }
        }
    }

    /// Publish a closing banner over the last frame and keep it up briefly,
    /// checking the stop flag so shutdown stays prompt
    fn hold_final_frame(&self, mut frame: Frame, score: i64) {
        let w = frame.width() as i32;
        let h = frame.height() as i32;
        frame.fill_rect(0, h / 2 - 40, w, 80, Color::PANEL);
        let banner = format!("SESSION COMPLETE! SCORE: {}", score);
        crate::font::draw_text(
            &mut frame,
            (w - crate::font::text_width(&banner, 2)) / 2,
            h / 2 - 7,
            &banner,
            2,
            Color::WHITE,
        );
        self.relay.publish(frame);

        let until = Instant::now() + FINAL_FRAME_HOLD;
        while Instant::now() < until {
            if self.stop.load(Ordering::Relaxed) {
                return;
            }
            std::thread::sleep(HOLD_SLICE);
        }
    }
}
