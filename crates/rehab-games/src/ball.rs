//! Ball bounce game (bilateral coordination)
//!
//! Two paddles track the patient's left and right hands; the ball bounces
//! between them. A paddle bounce only fires when the ball is already moving
//! toward that paddle, which prevents the ball sticking inside an expanded
//! hit-box and double-bouncing. The session timer alone ends the game.

use crate::overlay::{OverlayCmd, SpriteKind};
use crate::step::{StepInput, StepOutput};
use rand::Rng;
use rand::RngCore;
use rehab_vision::{Color, Handedness, Point};

/// Paddle glyph width
pub const PADDLE_WIDTH: f32 = 20.0;

/// Paddle glyph height
pub const PADDLE_HEIGHT: f32 = 80.0;

/// Expansion of the paddle hit-box on every side
pub const PADDLE_HIT_MARGIN: f32 = 10.0;

/// X of the left paddle's left edge
pub const LEFT_PADDLE_X: f32 = 20.0;

/// Distance of the right paddle's left edge from the right frame edge
pub const RIGHT_PADDLE_INSET: f32 = 40.0;

/// Vertical clamp margin for paddle placement
pub const PADDLE_CLAMP: f32 = 20.0;

/// Horizontal nudge past the paddle edge applied on bounce
pub const BOUNCE_NUDGE: f32 = 20.0;

/// Bound of the random vertical perturbation added per bounce
pub const VY_PERTURB: f32 = 1.0;

/// Hard limit on vertical speed after perturbation
pub const VY_LIMIT: f32 = 10.0;

/// Top edge below which vertical velocity reflects
pub const EDGE_TOP: f32 = 20.0;

/// Inset from the bottom edge above which vertical velocity reflects
pub const EDGE_BOTTOM_INSET: f32 = 40.0;

/// Inset from left/right edges where the ball is clamped and turned around
pub const EDGE_SIDE_INSET: f32 = 40.0;

/// Initial speed on both axes
pub const INITIAL_SPEED: f32 = 7.0;

/// Ball game state
#[derive(Debug, Clone)]
pub struct BallState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub score_left: u32,
    pub score_right: u32,
    /// Last placed paddle tops, kept so paddles stay visible between detections
    paddle_left_y: Option<f32>,
    paddle_right_y: Option<f32>,
}

impl BallState {
    /// Ball starts at the frame center moving down-right
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            x: frame_width as f32 / 2.0,
            y: frame_height as f32 / 2.0,
            vx: INITIAL_SPEED,
            vy: INITIAL_SPEED,
            score_left: 0,
            score_right: 0,
            paddle_left_y: None,
            paddle_right_y: None,
        }
    }

    /// Combined score reported to the scoring sink
    pub fn score(&self) -> i64 {
        (self.score_left + self.score_right) as i64
    }

    /// Advance one tick
    pub fn step(&mut self, input: &StepInput, rng: &mut dyn RngCore) -> StepOutput {
        let w = input.frame_width as f32;
        let h = input.frame_height as f32;
        let mut out = StepOutput::default();
        let mut delta: i64 = 0;

        // Position paddles from the most recent matching hands and test hits
        for hand in input.hands {
            let paddle_top = (hand.center.y - PADDLE_HEIGHT / 2.0)
                .clamp(PADDLE_CLAMP, h - PADDLE_HEIGHT - PADDLE_CLAMP);
            match hand.handedness {
                Handedness::Left => {
                    self.paddle_left_y = Some(paddle_top);
                    if self.hit_left(paddle_top) && self.vx < 0.0 {
                        self.bounce(rng);
                        self.x += BOUNCE_NUDGE;
                        self.score_left += 1;
                        delta += 1;
                    }
                }
                Handedness::Right => {
                    self.paddle_right_y = Some(paddle_top);
                    if self.hit_right(paddle_top, w) && self.vx > 0.0 {
                        self.bounce(rng);
                        self.x -= BOUNCE_NUDGE;
                        self.score_right += 1;
                        delta += 1;
                    }
                }
            }
        }

        // Vertical edges always reflect
        if self.y >= h - EDGE_BOTTOM_INSET || self.y <= EDGE_TOP {
            self.vy = -self.vy;
        }

        self.x += self.vx;
        self.y += self.vy;

        // Horizontal edges clamp and force the velocity sign outward, paddle
        // or not: the ball never leaves the visible field
        if self.x < EDGE_SIDE_INSET {
            self.x = EDGE_SIDE_INSET;
            self.vx = self.vx.abs();
        } else if self.x > w - EDGE_SIDE_INSET {
            self.x = w - EDGE_SIDE_INSET;
            self.vx = -self.vx.abs();
        }
        self.y = self.y.clamp(0.0, h);

        self.render(input, &mut out.overlay);
        out.score_delta = delta;
        out
    }

    /// Reverse horizontal velocity and perturb vertical velocity
    fn bounce(&mut self, rng: &mut dyn RngCore) {
        self.vx = -self.vx;
        self.vy += rng.gen_range(-VY_PERTURB..=VY_PERTURB);
        self.vy = self.vy.clamp(-VY_LIMIT, VY_LIMIT);
    }

    fn hit_left(&self, paddle_top: f32) -> bool {
        let left = LEFT_PADDLE_X - PADDLE_HIT_MARGIN / 2.0;
        let right = LEFT_PADDLE_X + PADDLE_WIDTH + PADDLE_HIT_MARGIN;
        let top = paddle_top - PADDLE_HIT_MARGIN;
        let bottom = paddle_top + PADDLE_HEIGHT + PADDLE_HIT_MARGIN;
        left < self.x && self.x < right && top < self.y && self.y < bottom
    }

    fn hit_right(&self, paddle_top: f32, frame_width: f32) -> bool {
        let paddle_x = frame_width - RIGHT_PADDLE_INSET;
        let left = paddle_x - PADDLE_WIDTH - PADDLE_HIT_MARGIN * 2.0;
        let right = paddle_x + PADDLE_HIT_MARGIN;
        let top = paddle_top - PADDLE_HIT_MARGIN;
        let bottom = paddle_top + PADDLE_HEIGHT + PADDLE_HIT_MARGIN;
        left < self.x && self.x < right && top < self.y && self.y < bottom
    }

    fn render(&self, input: &StepInput, overlay: &mut Vec<OverlayCmd>) {
        let w = input.frame_width as f32;
        let h = input.frame_height as f32;

        if let Some(y) = self.paddle_left_y {
            overlay.push(OverlayCmd::Sprite {
                kind: SpriteKind::PaddleLeft,
                center: Point::new(LEFT_PADDLE_X + PADDLE_WIDTH / 2.0, y + PADDLE_HEIGHT / 2.0),
            });
        }
        if let Some(y) = self.paddle_right_y {
            overlay.push(OverlayCmd::Sprite {
                kind: SpriteKind::PaddleRight,
                center: Point::new(
                    w - RIGHT_PADDLE_INSET + PADDLE_WIDTH / 2.0,
                    y + PADDLE_HEIGHT / 2.0,
                ),
            });
        }
        overlay.push(OverlayCmd::Sprite {
            kind: SpriteKind::Ball,
            center: Point::new(self.x, self.y),
        });

        if input.hands.is_empty() {
            overlay.push(OverlayCmd::text(
                20,
                70,
                "No hands detected - show both hands to camera",
                Color::RED,
            ));
            // Positioning guides for each hand
            let center_y = h / 2.0;
            for (x, label) in [(80.0, "Left hand"), (w - 80.0, "Right hand")] {
                overlay.push(OverlayCmd::Ring {
                    center: Point::new(x, center_y),
                    radius: 70,
                    thickness: 2,
                    color: Color::ORANGE,
                });
                overlay.push(OverlayCmd::Text {
                    x: x as i32 - 40,
                    y: center_y as i32 - 80,
                    text: label.to_string(),
                    scale: 1,
                    color: Color::ORANGE,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use rehab_vision::{Handedness, LandmarkSet, Point};

    fn hand(handedness: Handedness, center_y: f32) -> LandmarkSet {
        // Two keypoints straddling the desired center
        LandmarkSet::from_keypoints(
            handedness,
            vec![
                Point::new(40.0, center_y - 30.0),
                Point::new(60.0, center_y + 30.0),
            ],
        )
    }

    fn input<'a>(hands: &'a [LandmarkSet]) -> StepInput<'a> {
        StepInput {
            frame_width: 640,
            frame_height: 480,
            control: Point::new(320.0, 240.0),
            control_live: false,
            hands,
            elapsed: std::time::Duration::ZERO,
        }
    }

    #[test]
    fn left_paddle_bounce_scenario() {
        // Ball at (35, 200) moving left, left paddle spanning y in [180, 260]
        let mut state = BallState::new(640, 480);
        state.x = 35.0;
        state.y = 200.0;
        state.vx = -7.0;
        state.vy = 0.0;
        let hands = [hand(Handedness::Left, 220.0)];
        let mut rng = SmallRng::seed_from_u64(7);

        let out = state.step(&input(&hands), &mut rng);

        assert_eq!(state.vx, 7.0);
        assert_eq!(state.score_left, 1);
        assert_eq!(out.score_delta, 1);
        assert!(state.x >= 40.0);
    }

    #[test]
    fn no_bounce_when_moving_away_from_paddle() {
        let mut state = BallState::new(640, 480);
        state.x = 35.0;
        state.y = 200.0;
        state.vx = 7.0; // moving away from the left paddle
        state.vy = 0.0;
        let hands = [hand(Handedness::Left, 220.0)];
        let mut rng = SmallRng::seed_from_u64(7);

        state.step(&input(&hands), &mut rng);

        assert_eq!(state.score_left, 0);
        assert_eq!(state.vx, 7.0);
    }

    #[test]
    fn position_stays_in_bounds_over_many_ticks() {
        let mut state = BallState::new(640, 480);
        let mut rng = SmallRng::seed_from_u64(42);
        let hands: [LandmarkSet; 0] = [];
        for _ in 0..2000 {
            state.step(&input(&hands), &mut rng);
            assert!(state.x >= 0.0 && state.x <= 640.0, "x out of bounds: {}", state.x);
            assert!(state.y >= 0.0 && state.y <= 480.0, "y out of bounds: {}", state.y);
        }
    }

    #[test]
    fn horizontal_edge_forces_velocity_outward() {
        let mut state = BallState::new(640, 480);
        state.x = 41.0;
        state.y = 240.0;
        state.vx = -7.0;
        state.vy = 0.0;
        let mut rng = SmallRng::seed_from_u64(1);
        let hands: [LandmarkSet; 0] = [];
        state.step(&input(&hands), &mut rng);
        assert_eq!(state.x, 40.0);
        assert!(state.vx > 0.0);
    }

    #[test]
    fn vertical_perturbation_stays_clamped() {
        let mut state = BallState::new(640, 480);
        state.vy = 9.8;
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            state.bounce(&mut rng);
            assert!(state.vy.abs() <= VY_LIMIT);
        }
    }
}
