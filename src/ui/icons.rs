//! Procedural playback glyphs

use super::pixel_buffer::PixelBuffer;

/// Filled right-pointing triangle, left edge at `cx`, vertically centred on `cy`
pub fn draw_play_icon(buf: &mut PixelBuffer, cx: i32, cy: i32, size: i32, colour: u16) {
    let half = size / 2;
    for dy in -half..=half {
        for dx in 0..=size {
            if dy.abs() * 2 <= size - dx {
                buf.put_pixel(cx + dx, cy + dy, colour);
            }
        }
    }
}

/// Two vertical bars, each size/5 wide and size tall, separated by size/5,
/// symmetric about (cx, cy)
pub fn draw_pause_icon(buf: &mut PixelBuffer, cx: i32, cy: i32, size: i32, colour: u16) {
    let bar_w = size / 5;
    let gap = bar_w;
    let top = cy - size / 2;
    buf.fill_rect(cx - gap / 2 - bar_w, top, bar_w, size, colour);
    buf.fill_rect(cx + gap / 2, top, bar_w, size, colour);
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: u16 = 0x07E0;

    #[test]
    fn test_play_triangle_shape() {
        let mut buf = PixelBuffer::new(40, 40);
        draw_play_icon(&mut buf, 5, 20, 28, INK);

        // Full height column at the left edge, single pixel at the tip
        for dy in -14..=14 {
            assert_eq!(buf.get_pixel(5, 20 + dy), Some(INK), "dy {}", dy);
        }
        assert_eq!(buf.get_pixel(5 + 28, 20), Some(INK));
        assert_eq!(buf.get_pixel(5 + 28, 19), Some(0));
        assert_eq!(buf.get_pixel(4, 20), Some(0));

        // Rows narrow as |dy| grows
        let width_at = |dy: i32| (0..40).filter(|&x| buf.get_pixel(x, 20 + dy) == Some(INK)).count();
        assert_eq!(width_at(0), 29);
        assert_eq!(width_at(7), 15);
        assert_eq!(width_at(-7), 15);
        assert_eq!(width_at(14), 1);
    }

    #[test]
    fn test_pause_bars() {
        let mut buf = PixelBuffer::new(40, 40);
        draw_pause_icon(&mut buf, 20, 20, 25, INK);

        // bar_w = gap = 5, top = 20 - 12
        assert_eq!(buf.count_colour(INK), 2 * 5 * 25);
        for x in 13..18 {
            assert_eq!(buf.get_pixel(x, 8), Some(INK));
        }
        for x in 22..27 {
            assert_eq!(buf.get_pixel(x, 32), Some(INK));
        }
        assert_eq!(buf.get_pixel(20, 20), Some(0));
        assert_eq!(buf.get_pixel(18, 20), Some(0));
        assert_eq!(buf.get_pixel(21, 20), Some(0));
    }
}
