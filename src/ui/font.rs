//! Bitmap text rasterizing
//!
//! Three ways to put an 8x8 glyph on screen:
//! - whole-number scale: every set bit becomes a scale×scale block
//! - whole-number scale clipped to a horizontal window (marquee lines)
//! - "three halves": rows and columns repeated 1,2,1,2,... giving a 12x12 cell,
//!   an approximate 1.5× without any fractional arithmetic
//!
//! Text is a plain left-to-right run of cells. No kerning, no wrapping.
//! Characters outside ASCII keep their cell but draw nothing.

use super::font8x8::{glyph, GLYPH_SIZE};
use super::pixel_buffer::PixelBuffer;

/// Repeat counts per source row/column for the 1.5× mode
const THREE_HALVES_REPS: [i32; GLYPH_SIZE] = [1, 2, 1, 2, 1, 2, 1, 2];

/// Cell edge for the 1.5× mode (sum of THREE_HALVES_REPS)
pub const THREE_HALVES_CELL: i32 = 12;

/// How a run of text is scaled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphScale {
    /// Integer multiple of the 8px cell
    Whole(i32),
    /// 12px cell from the 1,2,1,2 repeat pattern
    ThreeHalves,
}

impl GlyphScale {
    /// Horizontal advance per character
    pub fn cell_width(self) -> i32 {
        match self {
            GlyphScale::Whole(scale) => GLYPH_SIZE as i32 * scale,
            GlyphScale::ThreeHalves => THREE_HALVES_CELL,
        }
    }

    pub fn cell_height(self) -> i32 {
        self.cell_width()
    }
}

/// Horizontal window outside of which nothing is written
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipSpan {
    pub x: i32,
    pub width: i32,
}

impl ClipSpan {
    #[inline]
    fn contains(self, px: i32) -> bool {
        px >= self.x && px < self.x + self.width
    }
}

/// Draw one glyph at an integer scale. No-op for codes past 127 or scale <= 0.
pub fn draw_glyph(buf: &mut PixelBuffer, x: i32, y: i32, colour: u16, code: u32, scale: i32) {
    draw_glyph_inner(buf, x, y, colour, code, scale, None);
}

/// Same as `draw_glyph` but only columns inside `clip` are written.
///
/// Rows are never clipped here; keeping the line on screen vertically is the
/// caller's job.
pub fn draw_glyph_clipped(
    buf: &mut PixelBuffer,
    x: i32,
    y: i32,
    colour: u16,
    code: u32,
    scale: i32,
    clip: ClipSpan,
) {
    draw_glyph_inner(buf, x, y, colour, code, scale, Some(clip));
}

fn draw_glyph_inner(
    buf: &mut PixelBuffer,
    x: i32,
    y: i32,
    colour: u16,
    code: u32,
    scale: i32,
    clip: Option<ClipSpan>,
) {
    if scale <= 0 {
        return;
    }
    let Some(rows) = glyph(code) else {
        return;
    };

    for (row, &bits) in rows.iter().enumerate() {
        if bits == 0 {
            continue;
        }
        let py0 = y + row as i32 * scale;
        for col in 0..GLYPH_SIZE {
            if bits & (1 << col) == 0 {
                continue;
            }
            let px0 = x + col as i32 * scale;
            for xx in 0..scale {
                let px = px0 + xx;
                if let Some(span) = clip {
                    if !span.contains(px) {
                        continue;
                    }
                }
                for yy in 0..scale {
                    buf.put_pixel(px, py0 + yy, colour);
                }
            }
        }
    }
}

/// Draw one glyph into a 12x12 cell using the 1,2,1,2 repeat pattern
pub fn draw_glyph_three_halves(buf: &mut PixelBuffer, x: i32, y: i32, colour: u16, code: u32) {
    let Some(rows) = glyph(code) else {
        return;
    };

    let mut dy = 0;
    for (row, &bits) in rows.iter().enumerate() {
        let reps_y = THREE_HALVES_REPS[row];
        let mut dx = 0;
        for (col, &reps_x) in THREE_HALVES_REPS.iter().enumerate() {
            if bits & (1 << col) != 0 {
                for ry in 0..reps_y {
                    for rx in 0..reps_x {
                        buf.put_pixel(x + dx + rx, y + dy + ry, colour);
                    }
                }
            }
            dx += reps_x;
        }
        dy += reps_y;
    }
}

/// Draw `text` left to right at `scale`, returns the x just past the last cell
pub fn draw_text(buf: &mut PixelBuffer, x: i32, y: i32, colour: u16, text: &str, scale: GlyphScale) -> i32 {
    let advance = scale.cell_width();
    let mut cursor = x;
    for ch in text.chars() {
        match scale {
            GlyphScale::Whole(s) => draw_glyph(buf, cursor, y, colour, ch as u32, s),
            GlyphScale::ThreeHalves => draw_glyph_three_halves(buf, cursor, y, colour, ch as u32),
        }
        cursor += advance;
    }
    cursor
}

/// Whole-scale text clipped horizontally to `clip`
pub fn draw_text_clipped(
    buf: &mut PixelBuffer,
    x: i32,
    y: i32,
    colour: u16,
    text: &str,
    scale: i32,
    clip: ClipSpan,
) {
    let advance = GlyphScale::Whole(scale).cell_width();
    let mut cursor = x;
    for ch in text.chars() {
        // Cells entirely outside the window cost nothing to skip
        if cursor + advance > clip.x && cursor < clip.x + clip.width {
            draw_glyph_clipped(buf, cursor, y, colour, ch as u32, scale, clip);
        }
        cursor += advance;
    }
}

/// Rendered width of `text` in pixels
pub fn text_width(text: &str, scale: GlyphScale) -> i32 {
    text.chars().count() as i32 * scale.cell_width()
}
