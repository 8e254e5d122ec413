//! Pixel drawing primitives over an `RgbImage`
//!
//! All drawing is alpha-blended and clipped against the canvas clip rectangle,
//! so callers can draw in unbounded pixel coordinates.

use image::{Rgb, RgbImage};

use super::font::{self, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Convert a palette triple to an image color
pub fn rgb(triple: [u8; 3]) -> Rgb<u8> {
    Rgb(triple)
}

/// Blend `src` over `dst` with opacity `alpha`
pub fn blend_color(dst: Rgb<u8>, src: Rgb<u8>, alpha: f64) -> Rgb<u8> {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |d: u8, s: u8| ((1.0 - a) * d as f64 + a * s as f64).round() as u8;
    Rgb([
        mix(dst.0[0], src.0[0]),
        mix(dst.0[1], src.0[1]),
        mix(dst.0[2], src.0[2]),
    ])
}

/// Half-open pixel rectangle `[left, right) x [top, bottom)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl PixelRect {
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle spanning two corner points in either order
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(
            x0.min(x1).round() as i64,
            y0.min(y1).round() as i64,
            x0.max(x1).round() as i64,
            y0.max(y1).round() as i64,
        )
    }

    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn intersect(&self, other: &PixelRect) -> PixelRect {
        PixelRect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Grow a degenerate rectangle to at least one pixel each way
    fn ensure_visible(mut self) -> Self {
        if self.width() <= 0 {
            self.right = self.left + 1;
        }
        if self.height() <= 0 {
            self.bottom = self.top + 1;
        }
        self
    }
}

/// Drawing surface
pub struct Canvas {
    image: RgbImage,
    clip: PixelRect,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
            clip: PixelRect::new(0, 0, width as i64, height as i64),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width() as i64, self.height() as i64)
    }

    /// Restrict drawing to `rect`, or to the whole canvas with `None`
    pub fn set_clip(&mut self, rect: Option<PixelRect>) {
        self.clip = match rect {
            Some(r) => r.intersect(&self.bounds()),
            None => self.bounds(),
        };
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Smallest rectangle holding every pixel that differs from `background`
    pub fn content_bounds(&self, background: Rgb<u8>) -> Option<PixelRect> {
        let mut extent: Option<PixelRect> = None;
        for (x, y, pixel) in self.image.enumerate_pixels() {
            if *pixel == background {
                continue;
            }
            let (x, y) = (x as i64, y as i64);
            extent = Some(match extent {
                None => PixelRect::new(x, y, x + 1, y + 1),
                Some(r) => PixelRect::new(
                    r.left.min(x),
                    r.top.min(y),
                    r.right.max(x + 1),
                    r.bottom.max(y + 1),
                ),
            });
        }
        extent
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Blend one pixel, ignoring anything outside the clip
    pub fn blend(&mut self, x: i64, y: i64, color: Rgb<u8>, alpha: f64) {
        if !self.clip.contains(x, y) {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let out = if alpha >= 1.0 {
            color
        } else {
            blend_color(*self.image.get_pixel(x, y), color, alpha)
        };
        self.image.put_pixel(x, y, out);
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgb<u8>, alpha: f64) {
        let area = rect.intersect(&self.clip);
        if area.is_empty() {
            return;
        }
        for y in area.top..area.bottom {
            for x in area.left..area.right {
                self.blend(x, y, color, alpha);
            }
        }
    }

    /// Rectangle outline drawn inside `rect`
    pub fn stroke_rect(&mut self, rect: PixelRect, thickness: i64, color: Rgb<u8>) {
        let t = thickness.max(1);
        let PixelRect {
            left,
            top,
            right,
            bottom,
        } = rect;
        self.fill_rect(PixelRect::new(left, top, right, top + t), color, 1.0);
        self.fill_rect(PixelRect::new(left, bottom - t, right, bottom), color, 1.0);
        self.fill_rect(PixelRect::new(left, top, left + t, bottom), color, 1.0);
        self.fill_rect(PixelRect::new(right - t, top, right, bottom), color, 1.0);
    }

    /// Horizontal line centred on `y`
    pub fn hline(&mut self, y: f64, x0: f64, x1: f64, thickness: f64, color: Rgb<u8>, alpha: f64) {
        let half = thickness.max(1.0) / 2.0;
        self.fill_rect(
            PixelRect::from_corners(x0, y - half, x1, y + half).ensure_visible(),
            color,
            alpha,
        );
    }

    /// Vertical line centred on `x`
    pub fn vline(&mut self, x: f64, y0: f64, y1: f64, thickness: f64, color: Rgb<u8>, alpha: f64) {
        let half = thickness.max(1.0) / 2.0;
        self.fill_rect(
            PixelRect::from_corners(x - half, y0, x + half, y1).ensure_visible(),
            color,
            alpha,
        );
    }

    /// Dotted horizontal line
    #[allow(clippy::too_many_arguments)]
    pub fn dotted_hline(
        &mut self,
        y: f64,
        x0: f64,
        x1: f64,
        thickness: f64,
        dash: f64,
        color: Rgb<u8>,
        alpha: f64,
    ) {
        let (start, end) = (x0.min(x1), x0.max(x1));
        let dash = dash.max(1.0);
        let mut x = start;
        while x < end {
            self.hline(y, x, (x + dash).min(end), thickness, color, alpha);
            x += dash * 2.0;
        }
    }

    /// Dotted vertical line
    #[allow(clippy::too_many_arguments)]
    pub fn dotted_vline(
        &mut self,
        x: f64,
        y0: f64,
        y1: f64,
        thickness: f64,
        dash: f64,
        color: Rgb<u8>,
        alpha: f64,
    ) {
        let (start, end) = (y0.min(y1), y0.max(y1));
        let dash = dash.max(1.0);
        let mut y = start;
        while y < end {
            self.vline(x, y, (y + dash).min(end), thickness, color, alpha);
            y += dash * 2.0;
        }
    }

    /// Anti-alias-free thick segment; each covered pixel is blended once
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb<u8>, alpha: f64) {
        let half = width.max(1.0) / 2.0;
        let area = PixelRect::new(
            (from.0.min(to.0) - half).floor() as i64,
            (from.1.min(to.1) - half).floor() as i64,
            (from.0.max(to.0) + half).ceil() as i64 + 1,
            (from.1.max(to.1) + half).ceil() as i64 + 1,
        )
        .intersect(&self.clip);

        for y in area.top..area.bottom {
            for x in area.left..area.right {
                let center = (x as f64 + 0.5, y as f64 + 0.5);
                if distance_to_segment(center, from, to) <= half {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    /// Filled circle
    pub fn disc(&mut self, center: (f64, f64), radius: f64, color: Rgb<u8>, alpha: f64) {
        let r = radius.max(0.5);
        let area = PixelRect::new(
            (center.0 - r).floor() as i64,
            (center.1 - r).floor() as i64,
            (center.0 + r).ceil() as i64 + 1,
            (center.1 + r).ceil() as i64 + 1,
        )
        .intersect(&self.clip);

        for y in area.top..area.bottom {
            for x in area.left..area.right {
                let dx = x as f64 + 0.5 - center.0;
                let dy = y as f64 + 0.5 - center.1;
                if dx * dx + dy * dy <= r * r {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`
    pub fn text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let s = scale.max(1) as i64;
        for (i, c) in text.chars().enumerate() {
            let rows = font::glyph(c);
            let origin = x + i as i64 * GLYPH_ADVANCE as i64 * s;
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if font::is_set(&rows, row, col) {
                        let px = origin + col as i64 * s;
                        let py = y + row as i64 * s;
                        self.fill_rect(PixelRect::new(px, py, px + s, py + s), color, 1.0);
                    }
                }
            }
        }
    }

    /// Draw `text` rotated a quarter turn counter-clockwise (reads bottom to
    /// top) with the rotated bounding box's top-left corner at `(x, y)`
    pub fn text_vertical(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let s = scale.max(1) as i64;
        let (text_width, _) = font::text_size(text, scale.max(1));
        let text_width = text_width as i64;

        for (i, c) in text.chars().enumerate() {
            let rows = font::glyph(c);
            let origin = i as i64 * GLYPH_ADVANCE as i64 * s;
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if font::is_set(&rows, row, col) {
                        let ux = origin + col as i64 * s;
                        let uy = row as i64 * s;
                        let px = x + uy;
                        let py = y + text_width - ux - s;
                        self.fill_rect(PixelRect::new(px, py, px + s, py + s), color, 1.0);
                    }
                }
            }
        }
    }
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn test_content_bounds() {
        let background = Rgb([0, 0, 0]);
        let mut canvas = Canvas::new(20, 10, background);
        assert_eq!(canvas.content_bounds(background), None);

        canvas.fill_rect(PixelRect::new(3, 2, 6, 4), Rgb([255, 255, 255]), 1.0);
        canvas.blend(15, 8, Rgb([255, 0, 0]), 1.0);
        assert_eq!(
            canvas.content_bounds(background),
            Some(PixelRect::new(3, 2, 16, 9))
        );
    }

    #[test]
    fn test_blend_color() {
        assert_eq!(blend_color(BLACK, WHITE, 0.5), Rgb([128, 128, 128]));
        assert_eq!(blend_color(BLACK, WHITE, 1.0), WHITE);
        assert_eq!(blend_color(BLACK, WHITE, 0.0), BLACK);
        assert_eq!(
            blend_color(Rgb([0x21, 0x2F, 0x3C]), Rgb([0x00, 0xFF, 0x8C]), 0.8),
            Rgb([7, 213, 124])
        );
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut canvas = Canvas::new(10, 10, BLACK);
        canvas.set_clip(Some(PixelRect::new(0, 0, 5, 5)));
        canvas.fill_rect(PixelRect::new(-3, -3, 8, 8), WHITE, 1.0);

        assert_eq!(canvas.pixel(0, 0), WHITE);
        assert_eq!(canvas.pixel(4, 4), WHITE);
        assert_eq!(canvas.pixel(5, 5), BLACK);
        assert_eq!(canvas.pixel(9, 0), BLACK);
    }

    #[test]
    fn test_line_and_disc() {
        let mut canvas = Canvas::new(20, 20, BLACK);
        canvas.line((2.0, 10.0), (18.0, 10.0), 2.0, WHITE, 1.0);
        assert_eq!(canvas.pixel(10, 10), WHITE);
        assert_eq!(canvas.pixel(10, 15), BLACK);

        canvas.disc((5.0, 5.0), 2.0, WHITE, 1.0);
        assert_eq!(canvas.pixel(4, 4), WHITE);
        assert_eq!(canvas.pixel(0, 0), BLACK);
    }

    #[test]
    fn test_text_pixels() {
        let mut canvas = Canvas::new(20, 10, BLACK);
        canvas.text(1, 1, "-", 1, WHITE);
        // Minus bar sits on glyph row 3
        assert_eq!(canvas.pixel(1, 4), WHITE);
        assert_eq!(canvas.pixel(5, 4), WHITE);
        assert_eq!(canvas.pixel(1, 3), BLACK);
    }

    #[test]
    fn test_vertical_text_pixels() {
        let mut canvas = Canvas::new(10, 10, BLACK);
        canvas.text_vertical(0, 0, "-", 1, WHITE);
        // Rotated minus becomes a vertical bar at column 3
        for y in 0..5 {
            assert_eq!(canvas.pixel(3, y), WHITE);
        }
        assert_eq!(canvas.pixel(2, 2), BLACK);
    }
}
