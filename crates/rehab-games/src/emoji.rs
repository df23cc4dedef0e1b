//! Emoji matching game (visual recognition / cognitive processing)
//!
//! A 6x6 board of symbols refreshes on a timer and after every click. The
//! board must always offer at least one unclicked target cell while unclicked
//! cells remain: the probabilistic placement pass is followed by a forced
//! placement when it comes up empty. Clicks are synthesized from control
//! point dwell, or injected directly by embedders with a pointer.

use crate::overlay::OverlayCmd;
use crate::step::{StepInput, StepOutput};
use rand::Rng;
use rand::RngCore;
use rehab_vision::{Color, Point};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Board edge length in cells
pub const GRID_SIZE: usize = 6;

/// Periodic board refresh interval
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Chance for each unclicked cell to become the target during a refresh pass
pub const TARGET_PROBABILITY: f64 = 0.1;

/// Points per correct click
pub const POINTS_PER_HIT: i64 = 10;

/// The game ends when fewer unclicked cells than this remain
pub const MIN_UNCLICKED_CELLS: usize = 2;

/// Consecutive ticks the control point must stay inside one cell to click it
pub const CLICK_DWELL_TICKS: u32 = 15;

/// Horizontal margin around the board
const BOARD_MARGIN_X: i32 = 70;

/// Top margin above the board (leaves room for the HUD)
const BOARD_MARGIN_TOP: i32 = 70;

/// Symbol bank tiers (single-scalar symbols only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

const FOODS: &[char] = &[
    '🍏', '🍎', '🍐', '🍊', '🍋', '🍌', '🍉', '🍇', '🍓', '🍈', '🍒', '🍑', '🍍', '🥝', '🍅',
    '🥑', '🥦', '🥒', '🌽', '🥕', '🥔', '🍞', '🥐', '🧀', '🍗', '🍔', '🍟', '🍕', '🍦', '🍩',
];

const ANIMALS: &[char] = &[
    '🐶', '🐱', '🐭', '🐹', '🐰', '🦊', '🐻', '🐼', '🐨', '🐯', '🦁', '🐮', '🐷', '🐸', '🐵',
    '🐔', '🐧', '🐦', '🦆', '🦉', '🐺', '🐴', '🦄', '🐝', '🦋', '🐢', '🐍', '🐙', '🐬', '🐳',
];

const VEHICLES: &[char] = &[
    '🚗', '🚕', '🚙', '🚌', '🚑', '🚒', '🚚', '🚜', '🚲', '🚔', '🚘', '🚀', '🚁', '🚤', '🚢',
];

impl Difficulty {
    /// Symbol bank for this tier
    pub fn bank(&self) -> Vec<char> {
        match self {
            Difficulty::Easy => FOODS.to_vec(),
            Difficulty::Medium => ANIMALS.to_vec(),
            Difficulty::Hard => {
                let mut bank = ANIMALS.to_vec();
                bank.extend_from_slice(VEHICLES);
                bank
            }
        }
    }
}

/// One board cell
#[derive(Debug, Clone)]
pub struct Cell {
    pub symbol: char,
    pub clicked: bool,
    pub is_target: bool,
    /// Styling after a click: Some(true) correct, Some(false) incorrect
    pub verdict: Option<bool>,
}

/// Emoji game state
#[derive(Debug, Clone)]
pub struct EmojiState {
    pub grid: Vec<Cell>,
    pub target: char,
    pub score: u32,
    bank: Vec<char>,
    last_refresh: Duration,
    dwell_cell: Option<usize>,
    dwell_ticks: u32,
}

impl EmojiState {
    pub fn new(difficulty: Difficulty, rng: &mut dyn RngCore) -> Self {
        let bank = difficulty.bank();
        let target = bank[rng.gen_range(0..bank.len())];
        let mut state = Self {
            grid: (0..GRID_SIZE * GRID_SIZE)
                .map(|_| Cell {
                    symbol: ' ',
                    clicked: false,
                    is_target: false,
                    verdict: None,
                })
                .collect(),
            target,
            score: 0,
            bank,
            last_refresh: Duration::ZERO,
            dwell_cell: None,
            dwell_ticks: 0,
        };
        state.refresh(rng);
        state
    }

    pub fn score(&self) -> i64 {
        self.score as i64
    }

    /// Number of cells still playable
    pub fn unclicked_count(&self) -> usize {
        self.grid.iter().filter(|c| !c.clicked).count()
    }

    /// Whether an unclicked target cell is still on the board
    pub fn has_unclicked_target(&self) -> bool {
        self.grid.iter().any(|c| !c.clicked && c.is_target)
    }

    /// Advance one tick
    pub fn step(&mut self, input: &StepInput, rng: &mut dyn RngCore) -> StepOutput {
        let mut out = StepOutput::default();

        if input.elapsed.saturating_sub(self.last_refresh) >= REFRESH_INTERVAL {
            self.refresh(rng);
            self.last_refresh = input.elapsed;
        }

        // Dwell-to-click on the control point
        if input.control_live {
            match self.cell_at(input.control, input.frame_width, input.frame_height) {
                Some(idx) if self.dwell_cell == Some(idx) => {
                    self.dwell_ticks += 1;
                    if self.dwell_ticks >= CLICK_DWELL_TICKS {
                        out.score_delta += self.click(idx, rng);
                        self.dwell_cell = None;
                        self.dwell_ticks = 0;
                    }
                }
                other => {
                    self.dwell_cell = other;
                    self.dwell_ticks = 0;
                }
            }
        } else {
            self.dwell_cell = None;
            self.dwell_ticks = 0;
        }

        out.finished = self.unclicked_count() < MIN_UNCLICKED_CELLS;
        self.render(input, &mut out.overlay);
        out
    }

    /// Handle a click on the cell at `index`; returns the score delta
    ///
    /// Clicked cells are disabled regardless of correctness. A correct last
    /// target triggers an immediate new target + board refresh.
    pub fn click(&mut self, index: usize, rng: &mut dyn RngCore) -> i64 {
        let Some(cell) = self.grid.get_mut(index) else {
            return 0;
        };
        if cell.clicked {
            return 0;
        }
        cell.clicked = true;
        let delta = if cell.symbol == self.target {
            cell.verdict = Some(true);
            self.score += POINTS_PER_HIT as u32;
            POINTS_PER_HIT
        } else {
            cell.verdict = Some(false);
            0
        };

        // Never leave a board with playable cells but nothing to find
        if !self.has_unclicked_target() && self.unclicked_count() >= MIN_UNCLICKED_CELLS {
            self.target = self.bank[rng.gen_range(0..self.bank.len())];
        }
        // The board reshuffles after every handled click
        self.refresh(rng);
        delta
    }

    /// Click at a frame position (for embedders with a real pointer)
    pub fn click_at(
        &mut self,
        position: Point,
        frame_width: u32,
        frame_height: u32,
        rng: &mut dyn RngCore,
    ) -> i64 {
        match self.cell_at(position, frame_width, frame_height) {
            Some(idx) => self.click(idx, rng),
            None => 0,
        }
    }

    /// Refresh every unclicked cell with the standard target probability
    pub fn refresh(&mut self, rng: &mut dyn RngCore) {
        self.refresh_with_probability(rng, TARGET_PROBABILITY);
    }

    /// Placement pass with an explicit probability (tests drive the forced
    /// placement branch with probability 0)
    pub fn refresh_with_probability(&mut self, rng: &mut dyn RngCore, probability: f64) {
        let mut placed_target = false;
        for cell in self.grid.iter_mut().filter(|c| !c.clicked) {
            if rng.gen_bool(probability) {
                cell.symbol = self.target;
            } else {
                cell.symbol = self.bank[rng.gen_range(0..self.bank.len())];
            }
            cell.is_target = cell.symbol == self.target;
            placed_target |= cell.is_target;
        }

        // Hard invariant: force one target cell if the pass placed none
        if !placed_target {
            let unclicked: Vec<usize> = self
                .grid
                .iter()
                .enumerate()
                .filter(|(_, c)| !c.clicked)
                .map(|(i, _)| i)
                .collect();
            if !unclicked.is_empty() {
                let idx = unclicked[rng.gen_range(0..unclicked.len())];
                let cell = &mut self.grid[idx];
                cell.symbol = self.target;
                cell.is_target = true;
                log::debug!("emoji: forced target placement into cell {}", idx);
            }
        }
    }

    /// Cell side length for the given frame dimensions
    fn cell_size(frame_width: u32, frame_height: u32) -> i32 {
        let avail_w = frame_width as i32 - 2 * BOARD_MARGIN_X;
        let avail_h = frame_height as i32 - BOARD_MARGIN_TOP - 30;
        (avail_w / GRID_SIZE as i32).min(avail_h / GRID_SIZE as i32).max(1)
    }

    /// Top-left corner of a cell
    fn cell_origin(index: usize, frame_width: u32, frame_height: u32) -> (i32, i32) {
        let size = Self::cell_size(frame_width, frame_height);
        let row = (index / GRID_SIZE) as i32;
        let col = (index % GRID_SIZE) as i32;
        (BOARD_MARGIN_X + col * size, BOARD_MARGIN_TOP + row * size)
    }

    /// Map a frame position to a cell index
    fn cell_at(&self, p: Point, frame_width: u32, frame_height: u32) -> Option<usize> {
        let size = Self::cell_size(frame_width, frame_height);
        let col = (p.x as i32 - BOARD_MARGIN_X).checked_div(size)?;
        let row = (p.y as i32 - BOARD_MARGIN_TOP).checked_div(size)?;
        if p.x as i32 >= BOARD_MARGIN_X
            && p.y as i32 >= BOARD_MARGIN_TOP
            && (0..GRID_SIZE as i32).contains(&col)
            && (0..GRID_SIZE as i32).contains(&row)
        {
            Some(row as usize * GRID_SIZE + col as usize)
        } else {
            None
        }
    }

    fn render(&self, input: &StepInput, overlay: &mut Vec<OverlayCmd>) {
        let size = Self::cell_size(input.frame_width, input.frame_height);
        for (i, cell) in self.grid.iter().enumerate() {
            let (x, y) = Self::cell_origin(i, input.frame_width, input.frame_height);
            overlay.push(OverlayCmd::SymbolCell {
                x,
                y,
                size,
                symbol: cell.symbol,
                clicked: cell.verdict,
            });
        }
        // Target reminder beside the HUD
        overlay.push(OverlayCmd::Text {
            x: 20,
            y: BOARD_MARGIN_TOP - 30,
            text: "FIND:".to_string(),
            scale: 2,
            color: Color::WHITE,
        });
        overlay.push(OverlayCmd::SymbolCell {
            x: 90,
            y: BOARD_MARGIN_TOP - 38,
            size: 30,
            symbol: self.target,
            clicked: None,
        });

        if !input.control_live {
            overlay.push(OverlayCmd::text(
                20,
                input.frame_height as i32 - 30,
                "No hand detected - point with your index finger",
                Color::RED,
            ));
        }

        // Dwell progress ring around the cell being held
        if let Some(idx) = self.dwell_cell {
            if self.dwell_ticks > 0 {
                let (x, y) = Self::cell_origin(idx, input.frame_width, input.frame_height);
                overlay.push(OverlayCmd::Frame {
                    x,
                    y,
                    width: size,
                    height: size,
                    thickness: 2,
                    color: Color::YELLOW,
                });
            }
        }
    }
}
