//! Render loop
//!
//! One thread owns everything: the backbuffer, the album art cache, both scroll
//! states and the last good playback snapshot. Each tick polls (every Nth tick
//! only), composites, presents, advances the marquees and sleeps out the rest of
//! the frame. Polls and art downloads run inline and stall the frame while they
//! run; the HTTP timeout bounds that.

use std::thread;
use std::time::{Duration, Instant};

use crate::config::LoopConfig;
use crate::network::{ImageProvider, StateProvider};
use crate::platform::Surface;
use crate::types::PlaybackState;
use crate::ui::album_art::{AlbumArtCache, ArtDecoder};
use crate::ui::compositing::{present, Compositor, Frame};
use crate::ui::marquee::ScrollState;
use crate::ui::pixel_buffer::PixelBuffer;

/// Mutable rendering state, owned by the loop and lent to the compositor
pub struct Dashboard {
    backbuffer: PixelBuffer,
    compositor: Compositor,
    art: AlbumArtCache,
    title_scroll: ScrollState,
    artist_scroll: ScrollState,
    state: Option<PlaybackState>,
}

impl Dashboard {
    pub fn new(width: usize, height: usize, art_retry: Duration) -> Self {
        Self {
            backbuffer: PixelBuffer::new(width, height),
            compositor: Compositor::default(),
            art: AlbumArtCache::new(art_retry),
            title_scroll: ScrollState::new(),
            artist_scroll: ScrollState::new(),
            state: None,
        }
    }

    pub fn backbuffer(&self) -> &PixelBuffer {
        &self.backbuffer
    }

    pub fn state(&self) -> Option<&PlaybackState> {
        self.state.as_ref()
    }

    pub fn art_cache(&self) -> &AlbumArtCache {
        &self.art
    }

    pub fn title_scroll(&self) -> &ScrollState {
        &self.title_scroll
    }

    pub fn artist_scroll(&self) -> &ScrollState {
        &self.artist_scroll
    }

    /// Replace the snapshot; a line whose text changed restarts its marquee
    pub fn apply_state(&mut self, state: PlaybackState) {
        let (track_changed, artist_changed) = match &self.state {
            Some(prev) => (prev.track != state.track, prev.artist != state.artist),
            None => (true, true),
        };
        if track_changed {
            self.title_scroll.reset();
            log::info!("Now playing: {} - {}", state.artist, state.track);
        }
        if artist_changed {
            self.artist_scroll.reset();
        }
        self.state = Some(state);
    }

    /// Composite one frame into the backbuffer
    pub fn render(&mut self, images: &mut dyn ImageProvider, decoder: &dyn ArtDecoder, now: Instant) {
        let art = match &self.state {
            Some(state) => self.art.resolve(&state.album_art_url, images, decoder, now),
            None => None,
        };
        let frame = Frame {
            state: self.state.as_ref(),
            art,
            title_scroll: &self.title_scroll,
            artist_scroll: &self.artist_scroll,
        };
        self.compositor.compose(&mut self.backbuffer, &frame);
    }

    /// Move both marquees forward by `step` pixels
    pub fn advance_scroll(&mut self, step: usize) {
        if let Some(state) = &self.state {
            self.compositor.title.advance(&mut self.title_scroll, &state.track, step);
            self.compositor.artist.advance(&mut self.artist_scroll, &state.artist, step);
        }
    }
}

/// Fixed-tick driver tying providers, dashboard and display together
pub struct RenderLoop<S, P, I, D> {
    surface: S,
    states: P,
    images: I,
    decoder: D,
    config: LoopConfig,
    dashboard: Dashboard,
    frame_counter: u64,
    failed_polls: u32,
}

impl<S, P, I, D> RenderLoop<S, P, I, D>
where
    S: Surface,
    P: StateProvider,
    I: ImageProvider,
    D: ArtDecoder,
{
    /// Backbuffer is sized to the surface's visible geometry
    pub fn new(surface: S, states: P, images: I, decoder: D, config: LoopConfig) -> Self {
        let geometry = surface.geometry();
        Self {
            dashboard: Dashboard::new(geometry.width, geometry.height, config.art_retry),
            surface,
            states,
            images,
            decoder,
            config,
            frame_counter: 0,
            failed_polls: 0,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Run one frame at `now`
    pub fn tick(&mut self, now: Instant) {
        if self.frame_counter % self.config.poll_every.max(1) == 0 {
            self.poll();
        }

        self.dashboard.render(&mut self.images, &self.decoder, now);
        present(self.dashboard.backbuffer(), &mut self.surface);
        self.dashboard.advance_scroll(self.config.scroll_px);
        self.frame_counter = self.frame_counter.wrapping_add(1);
    }

    /// Tick forever at the configured period
    pub fn run(mut self) -> ! {
        log::info!(
            "Render loop: {:?} ticks, polling every {} ticks",
            self.config.tick,
            self.config.poll_every
        );
        loop {
            let start = Instant::now();
            self.tick(start);
            let elapsed = start.elapsed();
            if elapsed > self.config.tick {
                log::debug!("Frame {} overran: {:?}", self.frame_counter, elapsed);
            }
            thread::sleep(self.config.tick.saturating_sub(elapsed));
        }
    }

    fn poll(&mut self) {
        match self.states.poll() {
            Ok(state) => {
                if self.failed_polls > 0 {
                    log::info!("State: recovered after {} failed polls", self.failed_polls);
                    self.failed_polls = 0;
                }
                self.dashboard.apply_state(state);
            }
            Err(e) => {
                // Keep showing the last good snapshot
                if self.failed_polls == 0 {
                    log::warn!("State: poll failed: {}", e);
                } else {
                    log::debug!("State: poll failed ({} in a row): {}", self.failed_polls + 1, e);
                }
                self.failed_polls = self.failed_polls.saturating_add(1);
            }
        }
    }
}
