//! Mini-game state machines for guided rehabilitation sessions
//!
//! Each game is a pure state machine: one `step` per pipeline tick, taking a
//! [`StepInput`] (frame dimensions, control point, detected hands, elapsed
//! time) and returning a [`StepOutput`] (overlay commands, score delta,
//! finished flag). Games never touch pixels or the clock directly, which
//! keeps every one of them testable without a camera.
//!
//! Architecture:
//!
//! ```text
//!            StepInput
//!                |
//!                v
//!   +------------------------+
//!   | GameState              |
//!   |  Ball  | Snake         |
//!   |  Emoji | Gesture       |
//!   +------------------------+
//!                |
//!                v
//!            StepOutput  --->  compositor (overlay commands)
//!                        --->  session worker (score delta, finished)
//! ```

pub mod ball;
pub mod checklist;
pub mod emoji;
pub mod overlay;
pub mod snake;
pub mod step;

pub use ball::BallState;
pub use checklist::ChecklistState;
pub use emoji::{Difficulty, EmojiState};
pub use overlay::{OverlayCmd, SpriteKind};
pub use snake::SnakeState;
pub use step::{StepInput, StepOutput};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which mini-game a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Ball,
    Snake,
    Emoji,
    Gesture,
}

impl GameType {
    /// Default session length when the config does not set one
    pub fn default_duration_seconds(&self) -> u64 {
        match self {
            GameType::Gesture => 30,
            _ => 60,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameType::Ball => "ball",
            GameType::Snake => "snake",
            GameType::Emoji => "emoji",
            GameType::Gesture => "gesture",
        };
        f.write_str(name)
    }
}

/// Running state for whichever game the session selected
#[derive(Debug, Clone)]
pub enum GameState {
    Ball(BallState),
    Snake(SnakeState),
    Emoji(EmojiState),
    Gesture(ChecklistState),
}

impl GameState {
    pub fn new(
        game_type: GameType,
        difficulty: Difficulty,
        frame_width: u32,
        frame_height: u32,
        rng: &mut dyn RngCore,
    ) -> Self {
        match game_type {
            GameType::Ball => GameState::Ball(BallState::new(frame_width, frame_height)),
            GameType::Snake => GameState::Snake(SnakeState::new(frame_width, frame_height, rng)),
            GameType::Emoji => GameState::Emoji(EmojiState::new(difficulty, rng)),
            GameType::Gesture => GameState::Gesture(ChecklistState::new()),
        }
    }

    /// Advance one tick
    pub fn step(&mut self, input: &StepInput, rng: &mut dyn RngCore) -> StepOutput {
        match self {
            GameState::Ball(s) => s.step(input, rng),
            GameState::Snake(s) => s.step(input, rng),
            GameState::Emoji(s) => s.step(input, rng),
            GameState::Gesture(s) => s.step(input),
        }
    }

    /// Current accumulated score
    pub fn score(&self) -> i64 {
        match self {
            GameState::Ball(s) => s.score(),
            GameState::Snake(s) => s.score(),
            GameState::Emoji(s) => s.score(),
            GameState::Gesture(s) => s.score(),
        }
    }

    /// One-off bonus applied when the session ends (gesture detection rate)
    pub fn completion_bonus(&self) -> i64 {
        match self {
            GameState::Gesture(s) => s.completion_bonus(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rehab_vision::Point;
    use std::time::Duration;

    #[test]
    fn every_game_type_constructs_and_steps() {
        let mut rng = SmallRng::seed_from_u64(1);
        for game_type in [GameType::Ball, GameType::Snake, GameType::Emoji, GameType::Gesture] {
            let mut state = GameState::new(game_type, Difficulty::Easy, 640, 480, &mut rng);
            let input = StepInput {
                frame_width: 640,
                frame_height: 480,
                control: Point::new(320.0, 240.0),
                control_live: true,
                hands: &[],
                elapsed: Duration::ZERO,
            };
            let out = state.step(&input, &mut rng);
            assert!(!out.overlay.is_empty(), "{game_type} produced no overlay");
            assert_eq!(state.score(), out.score_delta.max(0));
        }
    }

    #[test]
    fn default_durations() {
        assert_eq!(GameType::Gesture.default_duration_seconds(), 30);
        assert_eq!(GameType::Ball.default_duration_seconds(), 60);
        assert_eq!(GameType::Snake.default_duration_seconds(), 60);
        assert_eq!(GameType::Emoji.default_duration_seconds(), 60);
    }

    #[test]
    fn game_type_serde_round_trip() {
        let yaml = serde_yaml::to_string(&GameType::Emoji).unwrap();
        assert_eq!(yaml.trim(), "emoji");
        let back: GameType = serde_yaml::from_str("gesture").unwrap();
        assert_eq!(back, GameType::Gesture);
    }
}
