//! Frame composition
//!
//! Turns a captured camera frame plus a game's overlay commands into the
//! frame the display loop shows. Static chrome (playfield border, HUD
//! panels) is rendered once per frame size and blended beneath the live
//! video at a fixed weight; dynamic overlay and HUD text draw on top at
//! full opacity.

use crate::font;
use rehab_games::{GameType, OverlayCmd, SpriteKind};
use rehab_vision::{Color, Frame, Sprite};
use std::collections::HashMap;

/// Weight of the chrome layer blended beneath the live video
pub const CHROME_BLEND_WEIGHT: f32 = 0.2;

/// Playfield border inset from the frame edge
const BORDER_INSET: i32 = 5;

/// HUD panel height
const PANEL_HEIGHT: i32 = 50;

/// Per-tick HUD values drawn over everything else
#[derive(Debug, Clone, Copy)]
pub struct Hud {
    pub score: i64,
    pub remaining_seconds: u64,
}

/// Stateful compositor owning the chrome cache and sprite store
pub struct Compositor {
    game_type: GameType,
    /// Chrome rendered for the last seen frame size
    chrome: Option<((u32, u32), Frame)>,
    sprites: HashMap<SpriteKind, Sprite>,
}

impl Compositor {
    pub fn new(game_type: GameType) -> Self {
        let mut sprites = HashMap::new();
        for kind in [
            SpriteKind::Food,
            SpriteKind::Ball,
            SpriteKind::PaddleLeft,
            SpriteKind::PaddleRight,
        ] {
            sprites.insert(kind, synthesize_sprite(kind));
        }
        Self {
            game_type,
            chrome: None,
            sprites,
        }
    }

    /// Compose one output frame in place
    pub fn compose(&mut self, frame: &mut Frame, overlay: &[OverlayCmd], hud: Hud) {
        let dims = (frame.width(), frame.height());
        let rebuild = match &self.chrome {
            Some((cached, _)) => *cached != dims,
            None => true,
        };
        if rebuild {
            log::debug!("compositor: rendering chrome for {}x{}", dims.0, dims.1);
            self.chrome = Some((dims, self.render_chrome(dims.0, dims.1)));
        }
        if let Some((_, chrome)) = &self.chrome {
            frame.blend_under(chrome, CHROME_BLEND_WEIGHT);
        }

        for cmd in overlay {
            self.resolve(frame, cmd);
        }
        self.draw_hud(frame, hud);
    }

    /// Static chrome for one frame size
    fn render_chrome(&self, width: u32, height: u32) -> Frame {
        let mut chrome = Frame::new(width, height);
        let w = width as i32;
        let h = height as i32;
        chrome.stroke_rect(
            BORDER_INSET,
            BORDER_INSET,
            w - 2 * BORDER_INSET,
            h - 2 * BORDER_INSET,
            2,
            Color::BORDER,
        );
        match self.game_type {
            GameType::Snake => {
                chrome.fill_rect(10, 10, 140, PANEL_HEIGHT, Color::PANEL);
                chrome.fill_rect(w - 160, 10, 150, PANEL_HEIGHT, Color::PANEL);
            }
            GameType::Ball => {
                // Score strip along the bottom, timer panel top-right
                chrome.fill_rect(BORDER_INSET, h - PANEL_HEIGHT - BORDER_INSET, w - 2 * BORDER_INSET, PANEL_HEIGHT, Color::PANEL);
                chrome.fill_rect(w - 160, 10, 150, PANEL_HEIGHT, Color::PANEL);
            }
            GameType::Emoji | GameType::Gesture => {
                chrome.fill_rect(w - 260, 10, 250, PANEL_HEIGHT, Color::PANEL);
            }
        }
        chrome
    }

    /// Score and remaining time, positioned per game so they never cover
    /// the play area
    fn draw_hud(&self, frame: &mut Frame, hud: Hud) {
        let w = frame.width() as i32;
        let h = frame.height() as i32;
        let score = format!("SCORE: {}", hud.score);
        let time = format!("TIME: {}:{:02}", hud.remaining_seconds / 60, hud.remaining_seconds % 60);
        match self.game_type {
            GameType::Snake => {
                font::draw_text(frame, 20, 25, &score, 2, Color::WHITE);
                font::draw_text(frame, w - 150, 25, &time, 2, Color::WHITE);
            }
            GameType::Ball => {
                font::draw_text(frame, 20, h - 40, &score, 2, Color::WHITE);
                font::draw_text(frame, w - 150, 25, &time, 2, Color::WHITE);
            }
            GameType::Emoji | GameType::Gesture => {
                font::draw_text(frame, w - 250, 15, &score, 2, Color::WHITE);
                font::draw_text(frame, w - 250, 38, &time, 2, Color::WHITE);
            }
        }
    }

    fn resolve(&self, frame: &mut Frame, cmd: &OverlayCmd) {
        match cmd {
            OverlayCmd::Line {
                from,
                to,
                thickness,
                color,
            } => frame.draw_line(
                from.x as i32,
                from.y as i32,
                to.x as i32,
                to.y as i32,
                *thickness,
                *color,
            ),
            OverlayCmd::Circle {
                center,
                radius,
                color,
            } => frame.fill_circle(center.x as i32, center.y as i32, *radius, *color),
            OverlayCmd::Ring {
                center,
                radius,
                thickness,
                color,
            } => frame.stroke_circle(center.x as i32, center.y as i32, *radius, *thickness, *color),
            OverlayCmd::Rect {
                x,
                y,
                width,
                height,
                color,
            } => frame.fill_rect(*x, *y, *width, *height, *color),
            OverlayCmd::Frame {
                x,
                y,
                width,
                height,
                thickness,
                color,
            } => frame.stroke_rect(*x, *y, *width, *height, *thickness, *color),
            OverlayCmd::Sprite { kind, center } => self.place_sprite(frame, *kind, center.x, center.y),
            OverlayCmd::Text {
                x,
                y,
                text,
                scale,
                color,
            } => font::draw_text(frame, *x, *y, text, *scale, *color),
            OverlayCmd::SymbolCell {
                x,
                y,
                size,
                symbol,
                clicked,
            } => draw_symbol_cell(frame, *x, *y, *size, *symbol, *clicked),
        }
    }

    /// Place a sprite centered at (cx, cy); positions where the glyph would
    /// spill outside the frame fall back to an equivalent primitive shape,
    /// which clips safely
    fn place_sprite(&self, frame: &mut Frame, kind: SpriteKind, cx: f32, cy: f32) {
        let (sw, sh) = kind.size();
        let x = cx as i32 - sw as i32 / 2;
        let y = cy as i32 - sh as i32 / 2;
        let in_bounds = x >= 0
            && y >= 0
            && x + sw as i32 <= frame.width() as i32
            && y + sh as i32 <= frame.height() as i32;

        if in_bounds {
            if let Some(sprite) = self.sprites.get(&kind) {
                sprite.blit(frame, x, y);
                return;
            }
        }
        match kind {
            SpriteKind::Food => frame.fill_circle(cx as i32, cy as i32, sw as i32 / 2, Color::ORANGE),
            SpriteKind::Ball => frame.fill_circle(cx as i32, cy as i32, sw as i32 / 2, Color::YELLOW),
            SpriteKind::PaddleLeft | SpriteKind::PaddleRight => {
                frame.fill_rect(x, y, sw as i32, sh as i32, Color::TEAL)
            }
        }
    }
}

/// Synthesized glyph art, used until real art assets ship
fn synthesize_sprite(kind: SpriteKind) -> Sprite {
    let (w, h) = kind.size();
    match kind {
        SpriteKind::Food => Sprite::disc(w, Color::ORANGE),
        SpriteKind::Ball => Sprite::disc(w, Color::YELLOW),
        SpriteKind::PaddleLeft | SpriteKind::PaddleRight => Sprite::block(w, h, Color::TEAL),
    }
}

/// Emoji board cell: a panel square with a color-hashed disc standing in
/// for the symbol, which the bitmap font cannot raster
fn draw_symbol_cell(frame: &mut Frame, x: i32, y: i32, size: i32, symbol: char, clicked: Option<bool>) {
    let pad = (size / 10).max(1);
    frame.fill_rect(x + pad, y + pad, size - 2 * pad, size - 2 * pad, Color::PANEL);

    let disc_color = match clicked {
        None => symbol_color(symbol),
        Some(_) => Color(70, 70, 70),
    };
    let radius = (size / 2 - 2 * pad).max(1);
    frame.fill_circle(x + size / 2, y + size / 2, radius, disc_color);

    match clicked {
        Some(true) => frame.stroke_rect(x + pad, y + pad, size - 2 * pad, size - 2 * pad, 2, Color::GREEN),
        Some(false) => frame.stroke_rect(x + pad, y + pad, size - 2 * pad, size - 2 * pad, 2, Color::RED),
        None => {}
    }
}

/// Deterministic color for a symbol scalar, distinct enough to tell cells
/// apart at a glance
fn symbol_color(symbol: char) -> Color {
    let v = (symbol as u32).wrapping_mul(2654435761);
    Color(
        (64 + (v & 0xBF) as u32) as u8,
        (64 + ((v >> 8) & 0xBF) as u32) as u8,
        (64 + ((v >> 16) & 0xBF) as u32) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rehab_vision::Point;

    fn hud() -> Hud {
        Hud {
            score: 3,
            remaining_seconds: 42,
        }
    }

    #[test]
    fn chrome_is_cached_per_frame_size() {
        let mut comp = Compositor::new(GameType::Snake);
        let mut frame = Frame::new(640, 480);
        comp.compose(&mut frame, &[], hud());
        let first = comp.chrome.as_ref().map(|(d, _)| *d);
        assert_eq!(first, Some((640, 480)));

        // Same size keeps the cache; new size rebuilds it
        let mut frame = Frame::new(640, 480);
        comp.compose(&mut frame, &[], hud());
        assert_eq!(comp.chrome.as_ref().map(|(d, _)| *d), Some((640, 480)));

        let mut frame = Frame::new(320, 240);
        comp.compose(&mut frame, &[], hud());
        assert_eq!(comp.chrome.as_ref().map(|(d, _)| *d), Some((320, 240)));
    }

    #[test]
    fn sprite_out_of_bounds_falls_back_to_primitive() {
        let comp = Compositor::new(GameType::Ball);
        let mut frame = Frame::new(100, 100);
        // Centered on the edge: glyph would spill, fallback must clip cleanly
        comp.place_sprite(&mut frame, SpriteKind::Ball, 0.0, 50.0);
        assert_eq!(frame.get(0, 50), Color::YELLOW);
    }

    #[test]
    fn sprite_in_bounds_uses_glyph_art() {
        let comp = Compositor::new(GameType::Snake);
        let mut frame = Frame::new(200, 200);
        comp.place_sprite(&mut frame, SpriteKind::Food, 100.0, 100.0);
        assert_eq!(frame.get(100, 100), Color::ORANGE);
        // Disc corners stay untouched
        assert_eq!(frame.get(76, 76), Color::BLACK);
    }

    #[test]
    fn symbol_colors_are_deterministic() {
        assert_eq!(symbol_color('🍎'), symbol_color('🍎'));
        assert_ne!(symbol_color('🍎'), symbol_color('🐶'));
    }

    #[test]
    fn overlay_commands_draw_onto_frame() {
        let mut comp = Compositor::new(GameType::Snake);
        let mut frame = Frame::new(640, 480);
        let overlay = vec![
            OverlayCmd::Circle {
                center: Point::new(300.0, 300.0),
                radius: 10,
                color: Color::GREEN,
            },
            OverlayCmd::text(200, 200, "HI", Color::WHITE),
        ];
        comp.compose(&mut frame, &overlay, hud());
        assert_eq!(frame.get(300, 300), Color::GREEN);
    }
}
