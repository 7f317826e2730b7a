use std::collections::{HashMap, VecDeque};
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

use fontdue::{Font, Metrics};

use crate::color::Rgb;
use crate::font::ScaledFont;
use crate::label::LinkLabel;
use crate::layout::{FontMetrics, Point, Size, TextLayout};

#[derive(Clone)]
pub struct GlyphBitmap {
    pub metrics: Metrics,
    pub alpha: Vec<u8>,
}

#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
struct GlyphKey {
    ch: char,
    px: u16,
}

/// Rasterized glyphs keyed by char and pixel size, evicting the least
/// recently used entry once `cap` is reached.
pub struct GlyphCache {
    map: HashMap<GlyphKey, GlyphBitmap>,
    order: VecDeque<GlyphKey>,
    cap: usize,
}

impl GlyphCache {
    pub fn new(cap: usize) -> Self {
        Self {
            map: HashMap::new(),
            order: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    fn touch(&mut self, key: GlyphKey) {
        if let Some(i) = self.order.iter().position(|k| *k == key) {
            self.order.remove(i);
        }
        self.order.push_back(key);
    }

    pub fn get_or_insert(&mut self, font: &Font, ch: char, px: f32) -> GlyphBitmap {
        let key = GlyphKey {
            ch,
            px: px.round() as u16,
        };
        if let Some(bmp) = self.map.get(&key).cloned() {
            self.touch(key);
            return bmp;
        }
        let (metrics, alpha) = font.rasterize(ch, px);
        let bmp = GlyphBitmap { metrics, alpha };
        if self.map.len() >= self.cap {
            if let Some(old) = self.order.pop_front() {
                self.map.remove(&old);
            }
        }
        self.map.insert(key, bmp.clone());
        self.order.push_back(key);
        bmp
    }
}

pub struct PixelCanvas {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl PixelCanvas {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width.saturating_mul(height)];
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color.to_u32());
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: usize, h: usize, color: Rgb) {
        let x1 = x.max(0) as usize;
        let y1 = y.max(0) as usize;
        let x2 = ((x + w as i32).max(0) as usize).min(self.width);
        let y2 = ((y + h as i32).max(0) as usize).min(self.height);
        let c = color.to_u32();
        for yy in y1..y2 {
            let row = yy * self.width;
            for xx in x1..x2 {
                self.pixels[row + xx] = c;
            }
        }
    }

    fn blend_pixel(&mut self, x: usize, y: usize, fg: Rgb, alpha: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        let bg = Rgb::from_u32(self.pixels[idx]);
        self.pixels[idx] = fg.blend_over(bg, alpha).to_u32();
    }
}

impl Default for PixelCanvas {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
    pub link: Rgb,
}

/// Software renderer drawing a [`LinkLabel`] at its bounds, with the same
/// alignment offset the hit tester applies.
pub struct Renderer {
    pub font: ScaledFont,
    pub canvas: PixelCanvas,
    pub palette: Palette,
    pub padding_x: usize,
    pub padding_y: usize,
    cache: Arc<Mutex<GlyphCache>>,
}

impl Renderer {
    pub fn new(font: Font, px: f32, palette: Palette) -> Self {
        Self {
            font: ScaledFont::new(font, px),
            canvas: PixelCanvas::new(),
            palette,
            padding_x: 12,
            padding_y: 12,
            cache: Arc::new(Mutex::new(GlyphCache::new(1024))),
        }
    }

    /// Label bounds for a surface of the given pixel size.
    pub fn label_bounds_for_pixels(&self, width: usize, height: usize) -> Size {
        Size::new(
            width.saturating_sub(self.padding_x * 2) as f32,
            height.saturating_sub(self.padding_y * 2) as f32,
        )
    }

    /// Converts a surface position into label coordinates.
    pub fn to_label_point(&self, x: f64, y: f64) -> Point {
        Point::new(
            (x - self.padding_x as f64) as f32,
            (y - self.padding_y as f64) as f32,
        )
    }

    pub fn set_font_size(&mut self, px: f32) {
        let font = self.font.font.clone();
        self.font = ScaledFont::new(font, px.clamp(6.0, 96.0));
    }

    pub fn render(&mut self, label: &LinkLabel, width: usize, height: usize) {
        self.canvas.resize(width.max(1), height.max(1));
        self.canvas.clear(self.palette.background);

        let styled = label.styled_text();
        let config = &label.config;
        let text = styled.to_plain_string();
        let layout = TextLayout::new(
            &text,
            &self.font,
            config.bounds,
            config.line_break,
            config.max_lines,
        );
        let used = layout.used_rect();
        let factor = config.alignment.offset_factor();
        let x_offset = (config.bounds.width - used.width) * factor - used.x;
        let y_offset = (config.bounds.height - used.height) * factor - used.y;

        let ascent = self.font.ascent();
        let is_link: Vec<bool> = styled.chars_with_links().map(|(_, link)| link).collect();
        for glyph in layout.glyphs() {
            let link = is_link.get(glyph.index).copied().unwrap_or(false);
            let color = if link {
                self.palette.link
            } else {
                self.palette.foreground
            };
            let x = (glyph.x + x_offset).round() as i32 + self.padding_x as i32;
            let top = (glyph.y + y_offset).round() as i32 + self.padding_y as i32;
            if !glyph.ch.is_whitespace() {
                self.draw_glyph(glyph.ch, color, x, top + ascent as i32);
            }
            if link {
                let underline_y = top + ascent as i32 + 2;
                self.canvas
                    .fill_rect(x, underline_y, glyph.advance.ceil() as usize, 1, color);
            }
        }
    }

    fn draw_glyph(&mut self, ch: char, color: Rgb, pen_x: i32, baseline: i32) {
        let glyph = match self.cache.lock() {
            Ok(mut cache) => cache.get_or_insert(&self.font.font, ch, self.font.px),
            Err(_) => return,
        };
        if glyph.metrics.width == 0 || glyph.metrics.height == 0 {
            return;
        }
        let gx = pen_x + glyph.metrics.xmin;
        let gy = baseline - glyph.metrics.height as i32 - glyph.metrics.ymin;
        for yy in 0..glyph.metrics.height {
            for xx in 0..glyph.metrics.width {
                let a = glyph.alpha[yy * glyph.metrics.width + xx];
                if a == 0 {
                    continue;
                }
                let px = gx + xx as i32;
                let py = gy + yy as i32;
                if px >= 0 && py >= 0 {
                    self.canvas.blend_pixel(px as usize, py as usize, color, a);
                }
            }
        }
    }

    pub fn nonzero_dims(width: u32, height: u32) -> (NonZeroU32, NonZeroU32) {
        let w = NonZeroU32::new(width.max(1)).unwrap_or(NonZeroU32::MIN);
        let h = NonZeroU32::new(height.max(1)).unwrap_or(NonZeroU32::MIN);
        (w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_fill_clips_to_bounds() {
        let mut canvas = PixelCanvas::new();
        canvas.resize(4, 3);
        canvas.clear(Rgb::new(0, 0, 0));
        canvas.fill_rect(-2, 1, 5, 10, Rgb::new(255, 0, 0));
        let red = Rgb::new(255, 0, 0).to_u32();
        let filled: Vec<bool> = canvas.pixels.iter().map(|&p| p == red).collect();
        assert_eq!(
            filled,
            vec![
                false, false, false, false, //
                true, true, true, false, //
                true, true, true, false,
            ]
        );
    }

    #[test]
    fn blend_outside_canvas_is_ignored() {
        let mut canvas = PixelCanvas::new();
        canvas.resize(2, 2);
        canvas.clear(Rgb::new(1, 2, 3));
        canvas.blend_pixel(5, 0, Rgb::new(255, 255, 255), 255);
        assert!(canvas.pixels.iter().all(|&p| p == Rgb::new(1, 2, 3).to_u32()));
    }

    #[test]
    fn nonzero_dims_clamps_zero() {
        let (w, h) = Renderer::nonzero_dims(0, 7);
        assert_eq!((w.get(), h.get()), (1, 7));
    }
}
