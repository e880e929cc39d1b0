//! Frame composition and presentation
//!
//! Every frame is rebuilt from scratch in the backbuffer, in fixed z-order:
//! album art (or placeholder), title, artist, status text, status icon, repeat
//! line, shuffle line. The backbuffer is then copied row by row into display
//! memory, honouring the display's row stride.
//!
//! Layout, left to right: margin, art box, gap, text column. Vertically the
//! title hangs from the art's top edge and the repeat/shuffle lines stand on its
//! bottom edge; the status text sits under the artist and the icon is centred in
//! whatever space is left between status text and repeat line.

use crate::platform::Surface;
use crate::types::PlaybackState;

use super::album_art::{blit_scaled, fit_within, ArtView};
use super::font::{draw_text, text_width, GlyphScale};
use super::icons::{draw_pause_icon, draw_play_icon};
use super::marquee::{Marquee, ScrollState};
use super::pixel_buffer::PixelBuffer;
use super::theme;

/// Status block glyph scale (12px cells)
const STATUS_SCALE: GlyphScale = GlyphScale::ThreeHalves;

/// Everything one frame is drawn from
pub struct Frame<'a> {
    /// `None` until the first successful poll
    pub state: Option<&'a PlaybackState>,
    /// `None` draws the placeholder box
    pub art: Option<ArtView<'a>>,
    pub title_scroll: &'a ScrollState,
    pub artist_scroll: &'a ScrollState,
}

/// Pixel positions for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub art_x: i32,
    pub art_y: i32,
    pub art_w: i32,
    pub art_h: i32,
    pub text_x: i32,
    pub title_y: i32,
    pub artist_y: i32,
    pub status_y: i32,
    pub icon_x: i32,
    pub icon_y: i32,
    pub repeat_y: i32,
    pub shuffle_y: i32,
}

impl Layout {
    /// Lay out a screen `screen_h` tall around art drawn at art_w×art_h
    pub fn new(screen_h: i32, art_w: i32, art_h: i32, status_text: &str) -> Self {
        let art_x = theme::ART_MARGIN_LEFT;
        let art_y = (screen_h - art_h) / 2;
        let art_top = art_y;
        let art_bottom = art_y + art_h;

        // Text column is anchored to the full art box so it never jumps with art size
        let text_x = art_x + theme::ART_BOX + theme::ART_TEXT_GAP;

        let title_h = GlyphScale::Whole(theme::TITLE_SCALE).cell_height();
        let title_y = art_top;
        let artist_y = title_y + title_h + theme::TITLE_ARTIST_PADDING;
        let status_y = artist_y + title_h + theme::ARTIST_STATUS_PADDING;

        let status_h = STATUS_SCALE.cell_height();
        let shuffle_y = art_bottom - status_h;
        let repeat_y = shuffle_y - status_h;

        let icon_y = (status_y + status_h + repeat_y) / 2;
        let icon_x = text_x + text_width(status_text, STATUS_SCALE) / 2;

        Self {
            art_x,
            art_y,
            art_w,
            art_h,
            text_x,
            title_y,
            artist_y,
            status_y,
            icon_x,
            icon_y,
            repeat_y,
            shuffle_y,
        }
    }
}

/// Draws frames into a backbuffer
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    pub title: Marquee,
    pub artist: Marquee,
}

impl Default for Compositor {
    fn default() -> Self {
        let line = Marquee::new(theme::TITLE_SCALE, theme::TITLE_VISIBLE_CHARS);
        Self {
            title: line,
            artist: line,
        }
    }
}

impl Compositor {
    /// Clear `buf` and draw `frame` into it
    pub fn compose(&self, buf: &mut PixelBuffer, frame: &Frame<'_>) {
        buf.clear(theme::BACKGROUND);

        let Some(state) = frame.state else {
            let y = buf.height() as i32 / 2;
            draw_text(
                buf,
                theme::WAITING_MARGIN_LEFT,
                y,
                theme::TEXT_COLOUR,
                theme::WAITING_TEXT,
                GlyphScale::Whole(1),
            );
            return;
        };

        let (art_w, art_h) = match frame.art {
            Some(art) => {
                let (w, h) = fit_within(art.width, art.height, theme::ART_BOX as usize);
                (w as i32, h as i32)
            }
            None => (theme::ART_BOX, theme::ART_BOX),
        };
        let status_text = state.status_text();
        let layout = Layout::new(buf.height() as i32, art_w, art_h, status_text);

        // Album art
        match frame.art {
            Some(art) => blit_scaled(
                buf,
                art.pixels,
                art.width,
                art.height,
                art_w as usize,
                art_h as usize,
                layout.art_x,
                layout.art_y,
            ),
            None => buf.fill_rect(
                layout.art_x,
                layout.art_y,
                art_w,
                art_h,
                theme::ART_PLACEHOLDER,
            ),
        }

        // Title & artist
        self.title.draw(
            buf,
            layout.text_x,
            layout.title_y,
            theme::TEXT_COLOUR,
            &state.track,
            frame.title_scroll,
        );
        self.artist.draw(
            buf,
            layout.text_x,
            layout.artist_y,
            theme::ARTIST_COLOUR,
            &state.artist,
            frame.artist_scroll,
        );

        // Status
        draw_text(
            buf,
            layout.text_x,
            layout.status_y,
            theme::TEXT_COLOUR,
            status_text,
            STATUS_SCALE,
        );
        if state.is_playing {
            draw_play_icon(buf, layout.icon_x, layout.icon_y, theme::ICON_SIZE, theme::PLAY_COLOUR);
        } else {
            draw_pause_icon(buf, layout.icon_x, layout.icon_y, theme::ICON_SIZE, theme::PAUSE_COLOUR);
        }

        draw_text(
            buf,
            layout.text_x,
            layout.repeat_y,
            theme::TEXT_COLOUR,
            &state.repeat_line(),
            STATUS_SCALE,
        );
        draw_text(
            buf,
            layout.text_x,
            layout.shuffle_y,
            theme::TEXT_COLOUR,
            &state.shuffle_line(),
            STATUS_SCALE,
        );
    }
}

/// Copy the backbuffer into display memory row by row.
///
/// Only the overlapping width×height is copied; padding past the display's
/// visible width in each hardware row is left alone.
pub fn present<S: Surface + ?Sized>(backbuffer: &PixelBuffer, surface: &mut S) {
    let geometry = surface.geometry();
    let stride = geometry.stride_px;
    let copy_width = geometry.width.min(backbuffer.width());
    let copy_height = geometry.height.min(backbuffer.height());

    let dst = surface.pixels_mut();
    for y in 0..copy_height {
        let start = y * stride;
        // Driver-reported mapping can be shorter than stride * height
        let Some(dst_row) = dst.get_mut(start..start + copy_width) else {
            break;
        };
        dst_row.copy_from_slice(&backbuffer.row(y)[..copy_width]);
    }
}
