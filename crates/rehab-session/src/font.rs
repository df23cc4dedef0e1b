//! Built-in 5x7 bitmap font
//!
//! Enough glyphs for the HUD and guidance messages: digits, the latin
//! alphabet (input is uppercased) and the handful of punctuation the
//! overlays use. Unknown characters render as a hollow box so missing
//! glyphs are visible rather than silent.

use rehab_vision::{Color, Frame};

/// Glyph width in font pixels
pub const GLYPH_WIDTH: i32 = 5;

/// Glyph height in font pixels
pub const GLYPH_HEIGHT: i32 = 7;

/// Horizontal spacing between glyphs, in font pixels
pub const GLYPH_SPACING: i32 = 1;

/// Rows top to bottom, low 5 bits per row, bit 4 leftmost
type Glyph = [u8; 7];

const FALLBACK: Glyph = [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F];

fn glyph(c: char) -> Option<Glyph> {
    let g: Glyph = match c {
        ' ' => [0x00; 7],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '%' => [0x19, 0x19, 0x02, 0x04, 0x08, 0x13, 0x13],
        _ => return None,
    };
    Some(g)
}

/// Width in frame pixels of `text` rendered at `scale`
pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * (GLYPH_WIDTH + GLYPH_SPACING) * scale.max(1)
}

/// Draw `text` with its top-left corner at (x, y)
pub fn draw_text(frame: &mut Frame, x: i32, y: i32, text: &str, scale: i32, color: Color) {
    let scale = scale.max(1);
    let mut pen_x = x;
    for c in text.chars() {
        let g = glyph(c.to_ascii_uppercase()).unwrap_or(FALLBACK);
        for (row, bits) in g.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    frame.fill_rect(
                        pen_x + col * scale,
                        y + row as i32 * scale,
                        scale,
                        scale,
                        color,
                    );
                }
            }
        }
        pen_x += (GLYPH_WIDTH + GLYPH_SPACING) * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_within_expected_extent() {
        let mut f = Frame::new(100, 20);
        draw_text(&mut f, 2, 2, "SCORE: 42", 1, Color::WHITE);
        // Some ink was laid down
        assert!(f.data().iter().any(|&b| b != 0));
        // Nothing beyond the computed width
        let extent = 2 + text_width("SCORE: 42", 1);
        for y in 0..20 {
            for x in extent..100 {
                assert_eq!(f.get(x, y), Color::BLACK);
            }
        }
    }

    #[test]
    fn lowercase_maps_to_uppercase_glyphs() {
        let mut upper = Frame::new(40, 10);
        let mut lower = Frame::new(40, 10);
        draw_text(&mut upper, 0, 0, "HAND", 1, Color::WHITE);
        draw_text(&mut lower, 0, 0, "hand", 1, Color::WHITE);
        assert_eq!(upper, lower);
    }

    #[test]
    fn scale_multiplies_width() {
        assert_eq!(text_width("AB", 1) * 3, text_width("AB", 3));
    }
}
