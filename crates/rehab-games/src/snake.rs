//! Snake game (fine motor control)
//!
//! The snake head follows the control point. Total trail length is a sliding
//! window: the trail grows by the distance moved each tick and is trimmed
//! from the oldest end whenever it exceeds the allowed length. Eating food
//! extends the allowance and scores a point.

use crate::overlay::{OverlayCmd, SpriteKind};
use crate::step::{StepInput, StepOutput};
use rand::Rng;
use rand::RngCore;
use rehab_vision::{Color, Point};
use std::collections::VecDeque;

/// Starting trail length allowance, in pixels
pub const INITIAL_ALLOWED_LENGTH: f32 = 150.0;

/// Allowance growth per food eaten
pub const GROWTH_PER_FOOD: f32 = 50.0;

/// Food glyph edge length (collision box matches the glyph)
pub const FOOD_SIZE: f32 = 50.0;

/// Safe placement margins: x in [100, w-50], y in [80, h-50]
pub const FOOD_MARGIN_LEFT: f32 = 100.0;
pub const FOOD_MARGIN_TOP: f32 = 80.0;
pub const FOOD_MARGIN_RIGHT: f32 = 50.0;
pub const FOOD_MARGIN_BOTTOM: f32 = 50.0;

/// Trail line thickness
const TRAIL_THICKNESS: i32 = 15;

/// Snake game state
#[derive(Debug, Clone)]
pub struct SnakeState {
    /// Trail points, oldest first
    pub trail: VecDeque<Point>,
    /// Segment length between consecutive trail points, oldest first
    pub segment_lengths: VecDeque<f32>,
    pub total_length: f32,
    pub allowed_length: f32,
    pub food: Point,
    pub score: u32,
    previous_head: Point,
}

impl SnakeState {
    pub fn new(frame_width: u32, frame_height: u32, rng: &mut dyn RngCore) -> Self {
        let mut state = Self {
            trail: VecDeque::new(),
            segment_lengths: VecDeque::new(),
            total_length: 0.0,
            allowed_length: INITIAL_ALLOWED_LENGTH,
            food: Point::default(),
            score: 0,
            previous_head: Point::default(),
        };
        state.relocate_food(frame_width, frame_height, rng);
        state
    }

    pub fn score(&self) -> i64 {
        self.score as i64
    }

    /// Advance one tick with the current control point as the new head
    pub fn step(&mut self, input: &StepInput, rng: &mut dyn RngCore) -> StepOutput {
        let mut out = StepOutput::default();
        let head = input.control;

        let distance = head.distance(&self.previous_head);
        self.trail.push_back(head);
        self.segment_lengths.push_back(distance);
        self.total_length += distance;
        self.previous_head = head;

        // Sliding-window trim from the oldest end
        while self.total_length > self.allowed_length {
            match self.segment_lengths.pop_front() {
                Some(oldest) => {
                    self.total_length -= oldest;
                    self.trail.pop_front();
                }
                None => break,
            }
        }

        // Food collision: point-in-box sized to the glyph
        let half = FOOD_SIZE / 2.0;
        if (self.food.x - half) < head.x
            && head.x < (self.food.x + half)
            && (self.food.y - half) < head.y
            && head.y < (self.food.y + half)
        {
            self.relocate_food(input.frame_width, input.frame_height, rng);
            self.allowed_length += GROWTH_PER_FOOD;
            self.score += 1;
            out.score_delta = 1;
            log::debug!("snake: food eaten, score {}", self.score);
        }

        self.render(input, &mut out.overlay);
        out
    }

    /// Move the food to a random point within the safe margins
    fn relocate_food(&mut self, frame_width: u32, frame_height: u32, rng: &mut dyn RngCore) {
        let max_x = (frame_width as f32 - FOOD_MARGIN_RIGHT).max(FOOD_MARGIN_LEFT + 1.0);
        let max_y = (frame_height as f32 - FOOD_MARGIN_BOTTOM).max(FOOD_MARGIN_TOP + 1.0);
        self.food = Point::new(
            rng.gen_range(FOOD_MARGIN_LEFT..max_x),
            rng.gen_range(FOOD_MARGIN_TOP..max_y),
        );
    }

    fn render(&self, input: &StepInput, overlay: &mut Vec<OverlayCmd>) {
        // Body, then head on top, then food
        for pair in self.trail.iter().collect::<Vec<_>>().windows(2) {
            overlay.push(OverlayCmd::Line {
                from: *pair[0],
                to: *pair[1],
                thickness: TRAIL_THICKNESS,
                color: Color::RED,
            });
        }
        if let Some(head) = self.trail.back() {
            overlay.push(OverlayCmd::Circle {
                center: *head,
                radius: 15,
                color: Color::GREEN,
            });
        }
        overlay.push(OverlayCmd::Sprite {
            kind: SpriteKind::Food,
            center: self.food,
        });

        if !input.control_live {
            overlay.push(OverlayCmd::text(
                20,
                110,
                "No hand detected - show your hand to camera",
                Color::RED,
            ));
            // Positioning guide: center circle with a tick at each cardinal
            let cx = input.frame_width as f32 / 2.0;
            let cy = input.frame_height as f32 / 2.0;
            let radius = 70.0;
            overlay.push(OverlayCmd::Ring {
                center: Point::new(cx, cy),
                radius: radius as i32,
                thickness: 2,
                color: Color::ORANGE,
            });
            for (dx, dy) in [(0.0, -1.0), (0.0, 1.0), (-1.0, 0.0), (1.0, 0.0)] {
                overlay.push(OverlayCmd::Line {
                    from: Point::new(cx + dx * radius, cy + dy * radius),
                    to: Point::new(cx + dx * (radius + 12.0), cy + dy * (radius + 12.0)),
                    thickness: 2,
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

    fn input(control: Point) -> StepInput<'static> {
        StepInput {
            frame_width: 640,
            frame_height: 480,
            control,
            control_live: true,
            hands: &[],
            elapsed: std::time::Duration::ZERO,
        }
    }

    #[test]
    fn trail_length_never_exceeds_allowance() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut state = SnakeState::new(640, 480, &mut rng);
        let mut x = 100.0;
        for _ in 0..200 {
            x += 9.0;
            if x > 600.0 {
                x = 100.0;
            }
            state.step(&input(Point::new(x, 240.0)), &mut rng);
            assert!(
                state.total_length <= state.allowed_length + 1e-3,
                "window overflow: {} > {}",
                state.total_length,
                state.allowed_length
            );
        }
    }

    #[test]
    fn trim_scenario_149_plus_5() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut state = SnakeState::new(640, 480, &mut rng);
        // Build the trail to total_length just below the allowance
        state.previous_head = Point::new(100.0, 100.0);
        state.trail.push_back(Point::new(100.0, 100.0));
        state.segment_lengths.push_back(0.0);
        let mut x = 100.0;
        while state.total_length < 149.0 {
            x += 1.0;
            state.trail.push_back(Point::new(x, 100.0));
            state.segment_lengths.push_back(1.0);
            state.total_length += 1.0;
            state.previous_head = Point::new(x, 100.0);
        }
        assert_eq!(state.total_length, 149.0);

        // Move food out of the way so only the trim path runs
        state.food = Point::new(600.0, 400.0);
        state.step(&input(Point::new(x + 5.0, 100.0)), &mut rng);

        assert!(state.total_length <= 150.0);
        assert!(state.total_length > 140.0);
    }

    #[test]
    fn lost_hand_renders_guide_circle_with_tick_marks() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut state = SnakeState::new(640, 480, &mut rng);
        let coasting = StepInput {
            control_live: false,
            ..input(Point::new(320.0, 240.0))
        };

        let out = state.step(&coasting, &mut rng);

        let rings = out
            .overlay
            .iter()
            .filter(|c| matches!(c, OverlayCmd::Ring { .. }))
            .count();
        let ticks = out
            .overlay
            .iter()
            .filter(|c| matches!(c, OverlayCmd::Line { .. }))
            .count();
        assert_eq!(rings, 1);
        // Fresh trail has a single point, so every line is a tick mark
        assert_eq!(ticks, 4);
    }

    #[test]
    fn eating_food_grows_allowance_and_scores() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut state = SnakeState::new(640, 480, &mut rng);
        let food = state.food;
        let allowance_before = state.allowed_length;

        let out = state.step(&input(food), &mut rng);

        assert_eq!(state.score, 1);
        assert_eq!(out.score_delta, 1);
        assert_eq!(state.allowed_length, allowance_before + GROWTH_PER_FOOD);
        // Food moved somewhere else within the margins
        assert!(state.food.x >= FOOD_MARGIN_LEFT && state.food.x <= 640.0 - FOOD_MARGIN_RIGHT);
        assert!(state.food.y >= FOOD_MARGIN_TOP && state.food.y <= 480.0 - FOOD_MARGIN_BOTTOM);
    }
}
