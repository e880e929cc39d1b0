//! Looping marquee for lines wider than their window
//!
//! A line either fits its window (drawn once, static) or scrolls: the text is
//! laid out twice, one period apart, and slid left by the scroll offset, so the
//! second copy walks in as the first walks out. A period is the text plus a
//! three-cell gap, `(chars + 3) * cell_width`.

use super::font::{draw_text_clipped, ClipSpan, GlyphScale};
use super::pixel_buffer::PixelBuffer;

/// Blank cells between the end of the text and its next copy
const LOOP_GAP_CHARS: usize = 3;

/// Scroll position for one marquee line, in pixels
///
/// Whoever owns the line's text decides when it changed and calls `reset`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollState {
    offset: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Back to the left edge
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }
}

/// Marquee geometry: glyph scale plus how many cells are visible at once
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Marquee {
    pub scale: i32,
    pub visible_chars: usize,
}

impl Marquee {
    pub const fn new(scale: i32, visible_chars: usize) -> Self {
        Self {
            scale,
            visible_chars,
        }
    }

    pub fn cell_width(&self) -> i32 {
        GlyphScale::Whole(self.scale).cell_width()
    }

    pub fn visible_px(&self) -> i32 {
        self.visible_chars as i32 * self.cell_width()
    }

    /// True when `text` is wider than the window
    pub fn scrolls(&self, text: &str) -> bool {
        text.chars().count() > self.visible_chars
    }

    /// Loop period in pixels for `text` (text plus gap)
    pub fn period_px(&self, text: &str) -> usize {
        (text.chars().count() + LOOP_GAP_CHARS) * self.cell_width().max(0) as usize
    }

    /// Move `state` forward by `step` pixels.
    ///
    /// Static lines stay at 0; the offset is observably unused there. Scrolling
    /// lines are kept reduced modulo the period so the counter never grows.
    pub fn advance(&self, state: &mut ScrollState, text: &str, step: usize) {
        if !self.scrolls(text) {
            state.offset = 0;
            return;
        }
        let period = self.period_px(text);
        if period == 0 {
            return;
        }
        state.offset = (state.offset % period + step % period) % period;
    }

    /// Draw `text` at (x, y) through the window [x, x + visible_px)
    pub fn draw(&self, buf: &mut PixelBuffer, x: i32, y: i32, colour: u16, text: &str, state: &ScrollState) {
        let clip = ClipSpan {
            x,
            width: self.visible_px(),
        };

        if !self.scrolls(text) {
            draw_text_clipped(buf, x, y, colour, text, self.scale, clip);
            return;
        }

        let period = self.period_px(text);
        if period == 0 {
            return;
        }

        let shift = (state.offset % period) as i32;
        let period = period as i32;
        for copy in 0..2 {
            let start_x = x - shift + copy * period;
            draw_text_clipped(buf, start_x, y, colour, text, self.scale, clip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: u16 = 0xFFFF;
    const LONG: &str = "A Song That Is Definitely Long Enough To Scroll";

    fn render(marquee: &Marquee, text: &str, offset: usize) -> PixelBuffer {
        let mut buf = PixelBuffer::new(320, 24);
        let mut state = ScrollState::new();
        state.set_offset(offset);
        marquee.draw(&mut buf, 20, 4, INK, text, &state);
        buf
    }

    #[test]
    fn test_reset_returns_to_left_edge() {
        let mut state = ScrollState::new();
        state.set_offset(40);
        assert_eq!(state.offset(), 40);
        state.reset();
        assert_eq!(state, ScrollState::default());
    }

    #[test]
    fn test_gap_between_copies_is_blank() {
        // 15 chars at 16px: text ends at 240, next copy starts at 288
        let m = Marquee::new(2, 14);
        let text = "fifteen chars!!";
        let mut buf = PixelBuffer::new(400, 16);
        let mut state = ScrollState::new();
        state.set_offset(100);
        m.draw(&mut buf, 0, 0, INK, text, &state);

        // Window shows [100, 324) of the loop; the gap sits at x 140..188
        for y in 0..16 {
            for x in 140..188 {
                assert_eq!(buf.get_pixel(x, y), Some(0), "({}, {})", x, y);
            }
        }
        // '!' at the end of the first copy and 'f' at the start of the second
        assert!((124..140).any(|x| (0..16).any(|y| buf.get_pixel(x, y) == Some(INK))));
        assert!((188..204).any(|x| (0..16).any(|y| buf.get_pixel(x, y) == Some(INK))));
    }

    #[test]
    fn test_scroll_threshold() {
        let m = Marquee::new(2, 14);
        assert_eq!(m.visible_px(), 224);
        assert!(!m.scrolls("exactly14chars"));
        assert!(m.scrolls("fifteen chars!!"));
        assert_eq!(m.period_px("fifteen chars!!"), 18 * 16);
    }

    #[test]
    fn test_scrolling_is_periodic() {
        let m = Marquee::new(2, 14);
        let period = m.period_px(LONG);
        for offset in [0, 8, 100, 333] {
            let a = render(&m, LONG, offset);
            let b = render(&m, LONG, offset + period);
            assert!(a.pixels() == b.pixels(), "offset {}", offset);
        }
    }

    #[test]
    fn test_scrolling_actually_moves() {
        let m = Marquee::new(2, 14);
        let a = render(&m, LONG, 0);
        let b = render(&m, LONG, 8);
        assert!(a.pixels() != b.pixels());
    }

    #[test]
    fn test_static_line_ignores_offset() {
        let m = Marquee::new(2, 14);
        let base = render(&m, "Short", 0);
        assert!(base.count_colour(INK) > 0);
        for offset in [1, 8, 57, 10_000] {
            assert!(render(&m, "Short", offset).pixels() == base.pixels());
        }
    }

    #[test]
    fn test_output_stays_inside_window() {
        let m = Marquee::new(2, 14);
        for offset in [0, 5, 64, 301] {
            let buf = render(&m, LONG, offset);
            for y in 0..24 {
                for x in 0..320 {
                    if !(20..20 + 224).contains(&x) {
                        assert_eq!(buf.get_pixel(x, y), Some(0), "({}, {}) offset {}", x, y, offset);
                    }
                }
            }
        }
    }

    #[test]
    fn test_advance_wraps_and_freezes_static() {
        let m = Marquee::new(2, 14);
        let period = m.period_px(LONG);

        let mut state = ScrollState::new();
        for _ in 0..period {
            m.advance(&mut state, LONG, 8);
        }
        // period steps of 8px is exactly 8 full loops
        assert_eq!(state.offset(), 0);
        m.advance(&mut state, LONG, 8);
        assert_eq!(state.offset(), 8);

        let mut fixed = ScrollState::new();
        fixed.set_offset(24);
        m.advance(&mut fixed, "Short", 8);
        assert_eq!(fixed.offset(), 0);
    }
}
