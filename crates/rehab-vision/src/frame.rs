//! Raster frame buffer and drawing primitives
//!
//! Frames are packed BGR, 3 bytes per pixel, row-major. Games and the
//! compositor draw onto frames through the primitives here; nothing in the
//! pipeline assumes a particular camera pixel format beyond this.

/// A BGR color, in camera byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);
    pub const RED: Color = Color(0, 0, 255);
    pub const GREEN: Color = Color(0, 255, 0);
    pub const YELLOW: Color = Color(0, 255, 255);
    pub const ORANGE: Color = Color(0, 165, 255);
    pub const TEAL: Color = Color(200, 200, 0);
    /// Panel background used behind score/timer labels
    pub const PANEL: Color = Color(40, 40, 40);
    /// Subtle border tone for the playfield frame
    pub const BORDER: Color = Color(100, 50, 50);
}

/// Bytes per pixel for packed BGR
pub const BYTES_PER_PIXEL: usize = 3;

/// An owned BGR frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Create a black frame of the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    /// Wrap an existing BGR buffer; returns None if the length doesn't match
    pub fn from_bgr(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * BYTES_PER_PIXEL {
            return None;
        }
        Some(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Read a pixel; out-of-bounds reads return black
    pub fn get(&self, x: i32, y: i32) -> Color {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return Color::BLACK;
        }
        let o = self.offset(x as u32, y as u32);
        Color(self.data[o], self.data[o + 1], self.data[o + 2])
    }

    /// Write a pixel; out-of-bounds writes are ignored
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let o = self.offset(x as u32, y as u32);
        self.data[o] = color.0;
        self.data[o + 1] = color.1;
        self.data[o + 2] = color.2;
    }

    /// Fill an axis-aligned rectangle, clipped to the frame
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for yy in y0..y1 {
            for xx in x0..x1 {
                self.put(xx, yy, color);
            }
        }
    }

    /// Draw a rectangle outline of the given stroke thickness
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: Color) {
        let t = thickness.max(1);
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, y + h - t, w, t, color);
        self.fill_rect(x, y, t, h, color);
        self.fill_rect(x + w - t, y, t, h, color);
    }

    /// Draw a filled circle, clipped to the frame
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Draw a circle outline of the given stroke thickness
    pub fn stroke_circle(&mut self, cx: i32, cy: i32, radius: i32, thickness: i32, color: Color) {
        let outer = radius * radius;
        let inner_r = (radius - thickness.max(1)).max(0);
        let inner = inner_r * inner_r;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let d2 = dx * dx + dy * dy;
                if d2 <= outer && d2 >= inner {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Draw a thick line segment
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, thickness: i32, color: Color) {
        // Bresenham core, stamping a disc per step for thickness
        let radius = (thickness / 2).max(0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            if radius == 0 {
                self.put(x, y, color);
            } else {
                self.fill_circle(x, y, radius, color);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Mirror the frame horizontally in place (natural hand-to-cursor mapping)
    pub fn mirror_horizontal(&mut self) {
        let w = self.width as usize;
        for row in self.data.chunks_exact_mut(w * BYTES_PER_PIXEL) {
            for x in 0..w / 2 {
                let a = x * BYTES_PER_PIXEL;
                let b = (w - 1 - x) * BYTES_PER_PIXEL;
                for i in 0..BYTES_PER_PIXEL {
                    row.swap(a + i, b + i);
                }
            }
        }
    }

    /// Apply a linear brightness/contrast transform: `v' = v * gain + offset`,
    /// saturating at the u8 range
    pub fn enhance(&mut self, gain: f32, offset: f32) {
        for v in &mut self.data {
            *v = (*v as f32 * gain + offset).clamp(0.0, 255.0) as u8;
        }
    }

    /// Blend `under` beneath this frame: `self = under * weight + self * (1 - weight)`
    ///
    /// Dimensions must match; mismatched frames are left untouched.
    pub fn blend_under(&mut self, under: &Frame, weight: f32) {
        if under.width != self.width || under.height != self.height {
            log::warn!(
                "frame: blend skipped, dimension mismatch {}x{} vs {}x{}",
                under.width,
                under.height,
                self.width,
                self.height
            );
            return;
        }
        let w = weight.clamp(0.0, 1.0);
        for (dst, src) in self.data.iter_mut().zip(under.data.iter()) {
            *dst = (*src as f32 * w + *dst as f32 * (1.0 - w)).round() as u8;
        }
    }
}

/// A BGRA sprite with per-pixel alpha, used for food/ball/paddle glyphs
#[derive(Debug, Clone)]
pub struct Sprite {
    width: u32,
    height: u32,
    /// Packed BGRA, 4 bytes per pixel
    data: Vec<u8>,
}

impl Sprite {
    /// Create a fully transparent sprite
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Create a filled disc sprite (the synthesized fallback for missing art)
    pub fn disc(diameter: u32, color: Color) -> Self {
        let mut sprite = Self::new(diameter, diameter);
        let r = diameter as i32 / 2;
        for y in 0..diameter as i32 {
            for x in 0..diameter as i32 {
                let dx = x - r;
                let dy = y - r;
                if dx * dx + dy * dy <= r * r {
                    sprite.put(x as u32, y as u32, color, 255);
                }
            }
        }
        sprite
    }

    /// Create a filled rectangle sprite
    pub fn block(width: u32, height: u32, color: Color) -> Self {
        let mut sprite = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                sprite.put(x, y, color, 255);
            }
        }
        sprite
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn put(&mut self, x: u32, y: u32, color: Color, alpha: u8) {
        let o = (y as usize * self.width as usize + x as usize) * 4;
        self.data[o] = color.0;
        self.data[o + 1] = color.1;
        self.data[o + 2] = color.2;
        self.data[o + 3] = alpha;
    }

    /// Alpha-blend the sprite onto a frame with its top-left at (x, y)
    ///
    /// The caller is responsible for bounds checking; pixels falling outside
    /// the frame are clipped here as a second line of defense.
    pub fn blit(&self, frame: &mut Frame, x: i32, y: i32) {
        for sy in 0..self.height as i32 {
            for sx in 0..self.width as i32 {
                let o = (sy as usize * self.width as usize + sx as usize) * 4;
                let a = self.data[o + 3] as f32 / 255.0;
                if a <= 0.0 {
                    continue;
                }
                let under = frame.get(x + sx, y + sy);
                let blended = Color(
                    (self.data[o] as f32 * a + under.0 as f32 * (1.0 - a)) as u8,
                    (self.data[o + 1] as f32 * a + under.1 as f32 * (1.0 - a)) as u8,
                    (self.data[o + 2] as f32 * a + under.2 as f32 * (1.0 - a)) as u8,
                );
                frame.put(x + sx, y + sy, blended);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_roundtrip() {
        let mut f = Frame::new(10, 10);
        f.put(3, 4, Color::RED);
        assert_eq!(f.get(3, 4), Color::RED);
        assert_eq!(f.get(0, 0), Color::BLACK);
    }

    #[test]
    fn out_of_bounds_writes_ignored() {
        let mut f = Frame::new(4, 4);
        f.put(-1, 0, Color::WHITE);
        f.put(4, 0, Color::WHITE);
        f.put(0, 100, Color::WHITE);
        assert!(f.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn mirror_swaps_columns() {
        let mut f = Frame::new(4, 1);
        f.put(0, 0, Color::RED);
        f.mirror_horizontal();
        assert_eq!(f.get(3, 0), Color::RED);
        assert_eq!(f.get(0, 0), Color::BLACK);
    }

    #[test]
    fn enhance_saturates() {
        let mut f = Frame::new(1, 1);
        f.put(0, 0, Color(250, 10, 0));
        f.enhance(1.2, 10.0);
        // 250 * 1.2 + 10 saturates; 10 * 1.2 + 10 = 22; 0 * 1.2 + 10 = 10
        assert_eq!(f.get(0, 0), Color(255, 22, 10));
    }

    #[test]
    fn blend_under_weights_layers() {
        let mut top = Frame::new(1, 1);
        top.put(0, 0, Color(100, 100, 100));
        let mut under = Frame::new(1, 1);
        under.put(0, 0, Color(200, 200, 200));
        top.blend_under(&under, 0.2);
        // 200 * 0.2 + 100 * 0.8 = 120
        assert_eq!(top.get(0, 0), Color(120, 120, 120));
    }

    #[test]
    fn blend_under_dimension_mismatch_is_noop() {
        let mut top = Frame::new(2, 2);
        let under = Frame::new(3, 3);
        let before = top.clone();
        top.blend_under(&under, 0.2);
        assert_eq!(top, before);
    }

    #[test]
    fn sprite_blit_clips() {
        let mut f = Frame::new(8, 8);
        let s = Sprite::disc(6, Color::RED);
        // Partially off-frame: must not panic, visible part drawn
        s.blit(&mut f, -3, -3);
        assert_eq!(f.get(0, 0), Color::RED);
    }
}
