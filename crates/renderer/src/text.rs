//! Glyph atlas for overlay text.
//!
//! Printable ASCII is always available from a built-in 5x7 bitmap face. When a
//! TrueType face is loaded (needed for Hangul), glyphs are rasterized from it on
//! first use and packed into the same atlas; the bitmap face stays as fallback.

use std::collections::HashMap;

use anyhow::Result;
use glam::Vec2;

/// Atlas texture edge in pixels (single-channel coverage).
pub const ATLAS_SIZE: u32 = 1024;
/// Pixel height a loaded face is rasterized at.
const RASTER_PX: f32 = 32.0;
/// Bitmap cell: 5x7 ink plus one column and one row of spacing.
const CELL_W: u32 = 6;
const CELL_H: u32 = 8;
/// Gap between packed glyphs so linear filtering never bleeds.
const PADDING: u32 = 1;
const MISSING: char = '?';

const BLANK: Glyph = Glyph {
    uv: [0.0; 4],
    offset: Vec2::ZERO,
    size: Vec2::ZERO,
    advance: 0.0,
};

/// Placement of one glyph, in units of line height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// u0, v0, u1, v1 into the atlas.
    pub uv: [f32; 4],
    /// Top-left of the quad relative to the pen at the top of the line.
    pub offset: Vec2,
    pub size: Vec2,
    pub advance: f32,
}

impl Glyph {
    pub fn is_blank(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

pub struct GlyphAtlas {
    pixels: Vec<u8>,
    /// Glyphs from the loaded face.
    glyphs: HashMap<char, Glyph>,
    /// Built-in bitmap glyphs.
    bitmap: HashMap<char, Glyph>,
    font: Option<fontdue::Font>,
    /// Shelf packer: next free position and the current row's height.
    cursor: (u32, u32),
    row_height: u32,
    dirty: bool,
    full: bool,
}

impl Default for GlyphAtlas {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphAtlas {
    /// Atlas with the bitmap face baked in.
    pub fn new() -> Self {
        let mut atlas = Self {
            pixels: vec![0; (ATLAS_SIZE * ATLAS_SIZE) as usize],
            glyphs: HashMap::new(),
            bitmap: HashMap::new(),
            font: None,
            cursor: (0, 0),
            row_height: 0,
            dirty: true,
            full: false,
        };
        for code in 32u8..127 {
            atlas.bake_bitmap(code as char);
        }
        atlas
    }

    /// Use a TrueType/OpenType face (or the first face of a collection) for every
    /// character it covers.
    pub fn load_font(&mut self, bytes: Vec<u8>) -> Result<()> {
        let settings = fontdue::FontSettings {
            scale: RASTER_PX,
            ..Default::default()
        };
        let font = fontdue::Font::from_bytes(bytes, settings).map_err(|e| anyhow::anyhow!("Invalid font: {}", e))?;
        log::info!("Loaded font face with {} glyphs", font.glyph_count());
        self.glyphs.clear();
        self.font = Some(font);
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Whether `ch` renders as itself rather than the missing-glyph mark.
    pub fn supports(&self, ch: char) -> bool {
        ch.is_whitespace()
            || self.bitmap.contains_key(&ch)
            || self.font.as_ref().is_some_and(|f| f.lookup_glyph_index(ch) != 0)
    }

    pub fn covers(&self, text: &str) -> bool {
        text.chars().all(|ch| self.supports(ch))
    }

    /// Look up or rasterize `ch`. Never fails: unknown characters get the
    /// missing-glyph mark.
    pub fn glyph(&mut self, ch: char) -> Glyph {
        if let Some(glyph) = self.glyphs.get(&ch) {
            return *glyph;
        }
        if self.font.as_ref().is_some_and(|f| f.lookup_glyph_index(ch) != 0 || ch == ' ') {
            if let Some(glyph) = self.rasterize(ch) {
                self.glyphs.insert(ch, glyph);
                return glyph;
            }
        }
        let fallback = if ch.is_whitespace() { ' ' } else { ch };
        self.bitmap
            .get(&fallback)
            .or_else(|| self.bitmap.get(&MISSING))
            .copied()
            .unwrap_or(BLANK)
    }

    /// Width of `text` at line height `size`, in pixels.
    pub fn measure(&mut self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.glyph(ch).advance * size).sum()
    }

    /// Greedy word wrap to `max_width` pixels. Explicit newlines are kept and
    /// words wider than a line are split between characters.
    pub fn wrap(&mut self, text: &str, size: f32, max_width: f32) -> Vec<String> {
        let space = self.measure(" ", size);
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut line = String::new();
            let mut width = 0.0;
            for word in paragraph.split_whitespace() {
                let word_width = self.measure(word, size);
                let gap = if line.is_empty() { 0.0 } else { space };
                if width + gap + word_width <= max_width {
                    if !line.is_empty() {
                        line.push(' ');
                    }
                    line.push_str(word);
                    width += gap + word_width;
                    continue;
                }
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    width = 0.0;
                }
                for ch in word.chars() {
                    let w = self.glyph(ch).advance * size;
                    if width + w > max_width && !line.is_empty() {
                        lines.push(std::mem::take(&mut line));
                        width = 0.0;
                    }
                    line.push(ch);
                    width += w;
                }
            }
            lines.push(line);
        }
        lines
    }

    /// Coverage bytes, `ATLAS_SIZE` square, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// True once after new glyphs were packed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    fn bake_bitmap(&mut self, ch: char) {
        let Some(rows) = (ch as usize).checked_sub(32).and_then(|i| FONT_5X7.get(i)) else {
            return;
        };
        let line = CELL_H as f32;
        let advance = CELL_W as f32 / line;
        if rows.iter().all(|&bits| bits == 0) {
            self.bitmap.insert(ch, Glyph { advance, ..BLANK });
            return;
        }
        let Some((x, y)) = self.allocate(CELL_W, CELL_H) else {
            return;
        };
        for (gy, bits) in rows.iter().enumerate() {
            for gx in 0..5u32 {
                if (bits >> (4 - gx)) & 1 != 0 {
                    let index = (y + gy as u32) * ATLAS_SIZE + x + gx;
                    self.pixels[index as usize] = 255;
                }
            }
        }
        self.bitmap.insert(
            ch,
            Glyph {
                uv: uv_rect(x, y, CELL_W, CELL_H),
                offset: Vec2::ZERO,
                size: Vec2::new(advance, 1.0),
                advance,
            },
        );
    }

    fn rasterize(&mut self, ch: char) -> Option<Glyph> {
        let font = self.font.as_ref()?;
        let (metrics, coverage) = font.rasterize(ch, RASTER_PX);
        let (ascent, line) = font
            .horizontal_line_metrics(RASTER_PX)
            .map_or((RASTER_PX * 0.8, RASTER_PX), |m| (m.ascent, m.ascent - m.descent));
        let advance = metrics.advance_width / line;
        if metrics.width == 0 || metrics.height == 0 {
            return Some(Glyph { advance, ..BLANK });
        }

        let (w, h) = (metrics.width as u32, metrics.height as u32);
        let (x, y) = self.allocate(w, h)?;
        for row in 0..h {
            let src = (row * w) as usize;
            let dst = ((y + row) * ATLAS_SIZE + x) as usize;
            self.pixels[dst..dst + w as usize].copy_from_slice(&coverage[src..src + w as usize]);
        }

        // fontdue measures ymin from the baseline upward.
        let top = ascent - (metrics.ymin as f32 + metrics.height as f32);
        Some(Glyph {
            uv: uv_rect(x, y, w, h),
            offset: Vec2::new(metrics.xmin as f32, top) / line,
            size: Vec2::new(w as f32, h as f32) / line,
            advance,
        })
    }

    fn allocate(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        let (pw, ph) = (w + PADDING, h + PADDING);
        if self.cursor.0 + pw > ATLAS_SIZE {
            self.cursor = (0, self.cursor.1 + self.row_height);
            self.row_height = 0;
        }
        if pw > ATLAS_SIZE || self.cursor.1 + ph > ATLAS_SIZE {
            if !self.full {
                log::warn!("Glyph atlas full; further characters use the fallback face");
                self.full = true;
            }
            return None;
        }
        let at = self.cursor;
        self.cursor.0 += pw;
        self.row_height = self.row_height.max(ph);
        self.dirty = true;
        Some(at)
    }
}

fn uv_rect(x: u32, y: u32, w: u32, h: u32) -> [f32; 4] {
    let s = ATLAS_SIZE as f32;
    [x as f32 / s, y as f32 / s, (x + w) as f32 / s, (y + h) as f32 / s]
}

/// 5x7 bitmap font data for ASCII 32..126.
/// Each entry is 7 bytes; each byte encodes one row (5 LSBs used, bit4=leftmost).
#[rustfmt::skip]
const FONT_5X7: [[u8; 7]; 95] = [
    [0x00,0x00,0x00,0x00,0x00,0x00,0x00], // ' '
    [0x04,0x04,0x04,0x04,0x04,0x00,0x04], // '!'
    [0x0A,0x0A,0x00,0x00,0x00,0x00,0x00], // '"'
    [0x0A,0x1F,0x0A,0x0A,0x1F,0x0A,0x00], // '#'
    [0x04,0x0F,0x14,0x0E,0x05,0x1E,0x04], // '$'
    [0x18,0x19,0x02,0x04,0x08,0x13,0x03], // '%'
    [0x08,0x14,0x14,0x08,0x15,0x12,0x0D], // '&'
    [0x04,0x04,0x00,0x00,0x00,0x00,0x00], // '''
    [0x02,0x04,0x08,0x08,0x08,0x04,0x02], // '('
    [0x08,0x04,0x02,0x02,0x02,0x04,0x08], // ')'
    [0x04,0x15,0x0E,0x1F,0x0E,0x15,0x04], // '*'
    [0x00,0x04,0x04,0x1F,0x04,0x04,0x00], // '+'
    [0x00,0x00,0x00,0x00,0x00,0x04,0x08], // ','
    [0x00,0x00,0x00,0x1F,0x00,0x00,0x00], // '-'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x04], // '.'
    [0x01,0x01,0x02,0x04,0x08,0x10,0x10], // '/'
    [0x0E,0x11,0x13,0x15,0x19,0x11,0x0E], // '0'
    [0x04,0x0C,0x04,0x04,0x04,0x04,0x0E], // '1'
    [0x0E,0x11,0x01,0x06,0x08,0x10,0x1F], // '2'
    [0x0E,0x11,0x01,0x06,0x01,0x11,0x0E], // '3'
    [0x02,0x06,0x0A,0x12,0x1F,0x02,0x02], // '4'
    [0x1F,0x10,0x1E,0x01,0x01,0x11,0x0E], // '5'
    [0x06,0x08,0x10,0x1E,0x11,0x11,0x0E], // '6'
    [0x1F,0x01,0x02,0x04,0x08,0x08,0x08], // '7'
    [0x0E,0x11,0x11,0x0E,0x11,0x11,0x0E], // '8'
    [0x0E,0x11,0x11,0x0F,0x01,0x02,0x0C], // '9'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x00], // ':'
    [0x00,0x00,0x04,0x00,0x00,0x04,0x08], // ';'
    [0x02,0x04,0x08,0x10,0x08,0x04,0x02], // '<'
    [0x00,0x00,0x1F,0x00,0x1F,0x00,0x00], // '='
    [0x08,0x04,0x02,0x01,0x02,0x04,0x08], // '>'
    [0x0E,0x11,0x01,0x02,0x04,0x00,0x04], // '?'
    [0x0E,0x11,0x17,0x15,0x17,0x10,0x0E], // '@'
    [0x0E,0x11,0x11,0x1F,0x11,0x11,0x11], // 'A'
    [0x1E,0x11,0x11,0x1E,0x11,0x11,0x1E], // 'B'
    [0x0E,0x11,0x10,0x10,0x10,0x11,0x0E], // 'C'
    [0x1E,0x11,0x11,0x11,0x11,0x11,0x1E], // 'D'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x1F], // 'E'
    [0x1F,0x10,0x10,0x1E,0x10,0x10,0x10], // 'F'
    [0x0E,0x11,0x10,0x17,0x11,0x11,0x0F], // 'G'
    [0x11,0x11,0x11,0x1F,0x11,0x11,0x11], // 'H'
    [0x0E,0x04,0x04,0x04,0x04,0x04,0x0E], // 'I'
    [0x07,0x02,0x02,0x02,0x02,0x12,0x0C], // 'J'
    [0x11,0x12,0x14,0x18,0x14,0x12,0x11], // 'K'
    [0x10,0x10,0x10,0x10,0x10,0x10,0x1F], // 'L'
    [0x11,0x1B,0x15,0x15,0x11,0x11,0x11], // 'M'
    [0x11,0x19,0x15,0x13,0x11,0x11,0x11], // 'N'
    [0x0E,0x11,0x11,0x11,0x11,0x11,0x0E], // 'O'
    [0x1E,0x11,0x11,0x1E,0x10,0x10,0x10], // 'P'
    [0x0E,0x11,0x11,0x11,0x15,0x12,0x0D], // 'Q'
    [0x1E,0x11,0x11,0x1E,0x14,0x12,0x11], // 'R'
    [0x0E,0x11,0x10,0x0E,0x01,0x11,0x0E], // 'S'
    [0x1F,0x04,0x04,0x04,0x04,0x04,0x04], // 'T'
    [0x11,0x11,0x11,0x11,0x11,0x11,0x0E], // 'U'
    [0x11,0x11,0x11,0x11,0x0A,0x0A,0x04], // 'V'
    [0x11,0x11,0x11,0x15,0x15,0x1B,0x11], // 'W'
    [0x11,0x11,0x0A,0x04,0x0A,0x11,0x11], // 'X'
    [0x11,0x11,0x0A,0x04,0x04,0x04,0x04], // 'Y'
    [0x1F,0x01,0x02,0x04,0x08,0x10,0x1F], // 'Z'
    [0x0E,0x08,0x08,0x08,0x08,0x08,0x0E], // '['
    [0x10,0x10,0x08,0x04,0x02,0x01,0x01], // '\'
    [0x0E,0x02,0x02,0x02,0x02,0x02,0x0E], // ']'
    [0x04,0x0A,0x11,0x00,0x00,0x00,0x00], // '^'
    [0x00,0x00,0x00,0x00,0x00,0x00,0x1F], // '_'
    [0x08,0x04,0x00,0x00,0x00,0x00,0x00], // '`'
    [0x00,0x00,0x0E,0x01,0x0F,0x11,0x0F], // 'a'
    [0x10,0x10,0x1E,0x11,0x11,0x11,0x1E], // 'b'
    [0x00,0x00,0x0E,0x11,0x10,0x11,0x0E], // 'c'
    [0x01,0x01,0x0F,0x11,0x11,0x11,0x0F], // 'd'
    [0x00,0x00,0x0E,0x11,0x1F,0x10,0x0E], // 'e'
    [0x06,0x08,0x1E,0x08,0x08,0x08,0x08], // 'f'
    [0x00,0x00,0x0F,0x11,0x0F,0x01,0x0E], // 'g'
    [0x10,0x10,0x1E,0x11,0x11,0x11,0x11], // 'h'
    [0x04,0x00,0x0C,0x04,0x04,0x04,0x0E], // 'i'
    [0x02,0x00,0x06,0x02,0x02,0x12,0x0C], // 'j'
    [0x10,0x10,0x12,0x14,0x18,0x14,0x12], // 'k'
    [0x0C,0x04,0x04,0x04,0x04,0x04,0x0E], // 'l'
    [0x00,0x00,0x1A,0x15,0x15,0x15,0x11], // 'm'
    [0x00,0x00,0x1E,0x11,0x11,0x11,0x11], // 'n'
    [0x00,0x00,0x0E,0x11,0x11,0x11,0x0E], // 'o'
    [0x00,0x00,0x1E,0x11,0x1E,0x10,0x10], // 'p'
    [0x00,0x00,0x0F,0x11,0x0F,0x01,0x01], // 'q'
    [0x00,0x00,0x16,0x19,0x10,0x10,0x10], // 'r'
    [0x00,0x00,0x0F,0x10,0x0E,0x01,0x1E], // 's'
    [0x08,0x08,0x1E,0x08,0x08,0x09,0x06], // 't'
    [0x00,0x00,0x11,0x11,0x11,0x13,0x0D], // 'u'
    [0x00,0x00,0x11,0x11,0x11,0x0A,0x04], // 'v'
    [0x00,0x00,0x11,0x15,0x15,0x15,0x0A], // 'w'
    [0x00,0x00,0x11,0x0A,0x04,0x0A,0x11], // 'x'
    [0x00,0x00,0x11,0x11,0x0F,0x01,0x0E], // 'y'
    [0x00,0x00,0x1F,0x02,0x04,0x08,0x1F], // 'z'
    [0x02,0x04,0x04,0x08,0x04,0x04,0x02], // '{'
    [0x04,0x04,0x04,0x04,0x04,0x04,0x04], // '|'
    [0x08,0x04,0x04,0x02,0x04,0x04,0x08], // '}'
    [0x00,0x08,0x15,0x02,0x00,0x00,0x00], // '~'
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_face_covers_ascii_only() {
        let atlas = GlyphAtlas::new();
        assert!(!atlas.has_font());
        assert!(atlas.covers("Mars Rover v2.0 (2025)"));
        assert!(!atlas.covers("화성"));
    }

    #[test]
    fn unknown_characters_use_the_missing_mark() {
        let mut atlas = GlyphAtlas::new();
        let question = atlas.glyph('?');
        assert_eq!(atlas.glyph('화'), question);
        assert!(atlas.glyph(' ').is_blank());
    }

    #[test]
    fn bitmap_pixels_are_baked() {
        let atlas = GlyphAtlas::new();
        // 'A' sits in the second row of packed cells; something must be inked.
        assert!(atlas.pixels().iter().any(|&p| p == 255));
        let a = atlas.bitmap[&'A'];
        assert!(a.uv[2] > a.uv[0] && a.uv[3] > a.uv[1]);
    }

    #[test]
    fn measure_scales_with_size() {
        let mut atlas = GlyphAtlas::new();
        assert_eq!(atlas.measure("abcd", 8.0), 24.0);
        assert_eq!(atlas.measure("abcd", 16.0), 48.0);
    }

    #[test]
    fn wrap_breaks_on_words_and_long_words() {
        let mut atlas = GlyphAtlas::new();
        // Each glyph is 6 px wide at size 8.
        let lines = atlas.wrap("one two three", 8.0, 48.0);
        assert_eq!(lines, vec!["one two", "three"]);
        let lines = atlas.wrap("abcdefghij", 8.0, 30.0);
        assert_eq!(lines, vec!["abcde", "fghij"]);
        assert_eq!(atlas.wrap("a\nb", 8.0, 100.0), vec!["a", "b"]);
    }

    #[test]
    fn dirty_flag_is_taken_once() {
        let mut atlas = GlyphAtlas::new();
        assert!(atlas.take_dirty());
        assert!(!atlas.take_dirty());
    }
}
