//! Drawing instructions emitted by game steps
//!
//! Games never touch pixels. Each step returns a list of commands; the
//! compositor resolves them against the frame, substituting primitive shapes
//! when sprite art cannot be placed.

use rehab_vision::{Color, Point};

/// Glyph art the compositor keeps loaded per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// 50x50 food glyph for the snake game
    Food,
    /// 20x20 ball glyph
    Ball,
    /// 20x80 left paddle
    PaddleLeft,
    /// 20x80 right paddle
    PaddleRight,
}

impl SpriteKind {
    /// Native glyph dimensions (width, height)
    pub fn size(&self) -> (u32, u32) {
        match self {
            SpriteKind::Food => (50, 50),
            SpriteKind::Ball => (20, 20),
            SpriteKind::PaddleLeft | SpriteKind::PaddleRight => (20, 80),
        }
    }
}

/// One drawing instruction
#[derive(Debug, Clone)]
pub enum OverlayCmd {
    /// Thick line segment
    Line {
        from: Point,
        to: Point,
        thickness: i32,
        color: Color,
    },
    /// Filled circle
    Circle {
        center: Point,
        radius: i32,
        color: Color,
    },
    /// Circle outline
    Ring {
        center: Point,
        radius: i32,
        thickness: i32,
        color: Color,
    },
    /// Filled rectangle
    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        color: Color,
    },
    /// Rectangle outline
    Frame {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        thickness: i32,
        color: Color,
    },
    /// Sprite centered at a point, with a primitive fallback on bounds failure
    Sprite { kind: SpriteKind, center: Point },
    /// Text drawn with the built-in bitmap font
    Text {
        x: i32,
        y: i32,
        text: String,
        scale: i32,
        color: Color,
    },
    /// Symbol cell for the emoji board: a color-hashed disc plus styling state
    SymbolCell {
        x: i32,
        y: i32,
        size: i32,
        symbol: char,
        /// None = playable, Some(true) = clicked correct, Some(false) = clicked wrong
        clicked: Option<bool>,
    },
}

impl OverlayCmd {
    /// Convenience for guidance text at default scale
    pub fn text(x: i32, y: i32, text: impl Into<String>, color: Color) -> Self {
        OverlayCmd::Text {
            x,
            y,
            text: text.into(),
            scale: 2,
            color,
        }
    }
}
