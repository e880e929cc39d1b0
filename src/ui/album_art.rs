//! Album art: decode, convert to RGB565, cache one entry, resample on blit
//!
//! The cache holds exactly one converted image keyed by its URL. Asking for a
//! different key replaces the entry outright; a failed decode leaves whatever
//! was cached in place. Resizing happens at blit time with nearest-neighbour
//! sampling, so the cached pixels are always the source resolution.

use std::time::{Duration, Instant};

use crate::error::{DecodeError, LoadError};
use crate::network::ImageProvider;

use super::pixel_buffer::PixelBuffer;
use super::theme::rgb565;

/// Raw 8-bit RGB samples, 3 bytes per pixel, row-major
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub samples: Vec<u8>,
}

/// Turns encoded image bytes (JPEG, PNG, ...) into raw RGB samples
pub trait ArtDecoder {
    fn decode_rgb8(&self, bytes: &[u8]) -> Result<RgbImage, DecodeError>;
}

/// `image` crate backed decoder
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateDecoder;

impl ArtDecoder for ImageCrateDecoder {
    fn decode_rgb8(&self, bytes: &[u8]) -> Result<RgbImage, DecodeError> {
        // Note: image crate has default memory limits (~512MB decoded).
        // Cover art is a few hundred pixels square, far below that.
        let img = image::load_from_memory(bytes)?;
        let rgb = img.to_rgb8();
        Ok(RgbImage {
            width: rgb.width() as usize,
            height: rgb.height() as usize,
            samples: rgb.into_raw(),
        })
    }
}

/// Convert packed RGB888 samples to RGB565, one u16 per pixel
pub fn convert_rgb565(samples: &[u8]) -> Vec<u16> {
    samples
        .chunks_exact(3)
        .map(|px| rgb565(px[0], px[1], px[2]))
        .collect()
}

/// Borrowed view of the cached art
#[derive(Clone, Copy)]
pub struct ArtView<'a> {
    pub pixels: &'a [u16],
    pub width: usize,
    pub height: usize,
}

struct CachedArt {
    key: String,
    pixels: Vec<u16>,
    width: usize,
    height: usize,
}

impl CachedArt {
    fn view(&self) -> ArtView<'_> {
        ArtView {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
        }
    }
}

/// Key that failed recently, and when we may try it again
struct FailedKey {
    key: String,
    retry_at: Instant,
}

/// Single-slot decoded album art cache
pub struct AlbumArtCache {
    entry: Option<CachedArt>,
    failed: Option<FailedKey>,
    retry_after: Duration,
}

impl AlbumArtCache {
    pub fn new(retry_after: Duration) -> Self {
        Self {
            entry: None,
            failed: None,
            retry_after,
        }
    }

    /// Key of the cached entry, if any
    pub fn key(&self) -> Option<&str> {
        self.entry.as_ref().map(|e| e.key.as_str())
    }

    /// Dimensions of the cached entry, if any
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.entry.as_ref().map(|e| (e.width, e.height))
    }

    /// Cached art for `key` without touching the decoder
    pub fn lookup(&self, key: &str) -> Option<ArtView<'_>> {
        self.entry
            .as_ref()
            .filter(|e| e.key == key)
            .map(CachedArt::view)
    }

    /// Return the cached art for `key`, decoding `raw` on a miss.
    ///
    /// A hit never calls the decoder. A successful miss drops the previous entry
    /// before installing the new one. A failed decode leaves the cache as it was.
    pub fn get_or_decode(
        &mut self,
        key: &str,
        raw: &[u8],
        decoder: &dyn ArtDecoder,
    ) -> Result<ArtView<'_>, DecodeError> {
        let hit = self.entry.as_ref().is_some_and(|e| e.key == key);
        if !hit {
            let decoded = decoder.decode_rgb8(raw)?;
            let expected = decoded.width * decoded.height * 3;
            if decoded.width == 0 || decoded.height == 0 || decoded.samples.len() < expected {
                return Err(DecodeError::EmptyImage {
                    width: decoded.width,
                    height: decoded.height,
                });
            }
            let pixels = convert_rgb565(&decoded.samples[..expected]);

            // Free the old buffer before the new one goes in
            self.entry = None;
            self.entry = Some(CachedArt {
                key: key.to_string(),
                pixels,
                width: decoded.width,
                height: decoded.height,
            });
        }

        match self.entry.as_ref() {
            Some(entry) => Ok(entry.view()),
            None => Err(DecodeError::EmptyImage { width: 0, height: 0 }),
        }
    }

    /// Art for `url`, fetching and decoding on a miss.
    ///
    /// An empty URL means "no art" and does no I/O. A URL that failed within the
    /// last `retry_after` is not fetched again; the caller draws the placeholder.
    pub fn resolve(
        &mut self,
        url: &str,
        provider: &mut dyn ImageProvider,
        decoder: &dyn ArtDecoder,
        now: Instant,
    ) -> Option<ArtView<'_>> {
        if url.is_empty() {
            return None;
        }
        if self.key() == Some(url) {
            return self.lookup(url);
        }
        if let Some(failed) = &self.failed {
            if failed.key == url && now < failed.retry_at {
                return None;
            }
        }

        log::info!("Album art: fetching {}", url);
        let loaded = provider
            .fetch_bytes(url)
            .map_err(LoadError::from)
            .and_then(|bytes| {
                self.get_or_decode(url, &bytes, decoder)
                    .map(|art| (art.width, art.height))
                    .map_err(LoadError::from)
            });

        match loaded {
            Ok((w, h)) => {
                log::info!("Album art: cached {}x{}", w, h);
                self.failed = None;
                self.lookup(url)
            }
            Err(e) => {
                log::warn!("Album art: {} (placeholder for {:?})", e, self.retry_after);
                self.failed = Some(FailedKey {
                    key: url.to_string(),
                    retry_at: now + self.retry_after,
                });
                None
            }
        }
    }
}

/// Size `art` should be drawn at inside a `max_box` square.
///
/// Art bigger than the box shrinks to fit, keeping its aspect ratio. Smaller
/// art is left at native size.
pub fn fit_within(width: usize, height: usize, max_box: usize) -> (usize, usize) {
    if width <= max_box && height <= max_box {
        return (width, height);
    }
    // min(box/w, box/h) applied to both axes, in integer arithmetic
    if width >= height {
        (max_box, (height * max_box / width).max(1))
    } else {
        ((width * max_box / height).max(1), max_box)
    }
}

/// Nearest-neighbour resize of `src` (sw×sh) into a dw×dh rectangle at (x, y).
///
/// Destination pixel (dx, dy) samples source
/// (round(dx/(dw-1)·(sw-1)), round(dy/(dh-1)·(sh-1))), with the denominator
/// taken as 1 when dw or dh is 1. Pixels are copied verbatim.
pub fn blit_scaled(
    dst: &mut PixelBuffer,
    src: &[u16],
    sw: usize,
    sh: usize,
    dw: usize,
    dh: usize,
    x: i32,
    y: i32,
) {
    if sw == 0 || sh == 0 || dw == 0 || dh == 0 || src.len() < sw * sh {
        return;
    }

    let den_x = dw.saturating_sub(1).max(1);
    let den_y = dh.saturating_sub(1).max(1);

    for dy in 0..dh {
        let ty = y + dy as i32;
        if ty < 0 || ty as usize >= dst.height() {
            continue;
        }
        let sy = nearest(dy, sh, den_y);
        let src_row = &src[sy * sw..(sy + 1) * sw];

        for dx in 0..dw {
            let tx = x + dx as i32;
            if tx < 0 || tx as usize >= dst.width() {
                continue;
            }
            let sx = nearest(dx, sw, den_x);
            dst.put_pixel(tx, ty, src_row[sx]);
        }
    }
}

/// round(d / den · (s - 1)), clamped to the source range
#[inline]
fn nearest(d: usize, s: usize, den: usize) -> usize {
    let num = d * (s - 1);
    ((2 * num + den) / (2 * den)).min(s - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::cell::Cell;

    /// Decoder that hands back a fixed image and counts its calls
    struct CountingDecoder {
        calls: Cell<u32>,
        image: Option<(usize, usize, [u8; 3])>,
    }

    impl CountingDecoder {
        fn solid(w: usize, h: usize, rgb: [u8; 3]) -> Self {
            Self {
                calls: Cell::new(0),
                image: Some((w, h, rgb)),
            }
        }

        fn broken() -> Self {
            Self {
                calls: Cell::new(0),
                image: None,
            }
        }
    }

    impl ArtDecoder for CountingDecoder {
        fn decode_rgb8(&self, _bytes: &[u8]) -> Result<RgbImage, DecodeError> {
            self.calls.set(self.calls.get() + 1);
            match self.image {
                Some((width, height, rgb)) => Ok(RgbImage {
                    width,
                    height,
                    samples: rgb.repeat(width * height),
                }),
                None => Err(DecodeError::EmptyImage { width: 0, height: 0 }),
            }
        }
    }

    struct FakeProvider {
        fetches: u32,
        fail: bool,
    }

    impl ImageProvider for FakeProvider {
        fn fetch_bytes(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.fetches += 1;
            if self.fail {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            } else {
                Ok(vec![1, 2, 3])
            }
        }
    }

    #[test]
    fn test_rgb565_conversion() {
        let px = convert_rgb565(&[255, 255, 255, 0, 0, 0, 255, 0, 0]);
        assert_eq!(px, vec![0xFFFF, 0x0000, 0xF800]);
    }

    #[test]
    fn test_hit_never_redecodes() {
        let decoder = CountingDecoder::solid(4, 2, [255, 0, 0]);
        let mut cache = AlbumArtCache::new(Duration::from_secs(10));

        for _ in 0..5 {
            let art = cache.get_or_decode("a", &[], &decoder).unwrap();
            assert_eq!((art.width, art.height), (4, 2));
            assert!(art.pixels.iter().all(|&p| p == 0xF800));
        }
        assert_eq!(decoder.calls.get(), 1);
    }

    #[test]
    fn test_new_key_evicts_old_entry() {
        let a = CountingDecoder::solid(4, 2, [0, 0, 0]);
        let b = CountingDecoder::solid(3, 7, [255, 255, 255]);
        let mut cache = AlbumArtCache::new(Duration::from_secs(10));

        cache.get_or_decode("a", &[], &a).unwrap();
        cache.get_or_decode("b", &[], &b).unwrap();

        assert_eq!(cache.key(), Some("b"));
        assert_eq!(cache.dimensions(), Some((3, 7)));
        assert!(cache.lookup("a").is_none());
    }

    #[test]
    fn test_decode_failure_leaves_cache_untouched() {
        let good = CountingDecoder::solid(2, 2, [0, 255, 0]);
        let bad = CountingDecoder::broken();
        let mut cache = AlbumArtCache::new(Duration::from_secs(10));

        cache.get_or_decode("a", &[], &good).unwrap();
        assert!(cache.get_or_decode("b", &[], &bad).is_err());
        assert_eq!(cache.key(), Some("a"));
        assert_eq!(cache.dimensions(), Some((2, 2)));

        let mut empty = AlbumArtCache::new(Duration::from_secs(10));
        assert!(empty.get_or_decode("b", &[], &bad).is_err());
        assert!(empty.key().is_none());
    }

    #[test]
    fn test_resolve_skips_io_for_empty_url_and_hits() {
        let decoder = CountingDecoder::solid(2, 2, [0, 0, 255]);
        let mut provider = FakeProvider { fetches: 0, fail: false };
        let mut cache = AlbumArtCache::new(Duration::from_secs(10));
        let now = Instant::now();

        assert!(cache.resolve("", &mut provider, &decoder, now).is_none());
        assert_eq!(provider.fetches, 0);

        for _ in 0..3 {
            assert!(cache.resolve("http://art/1", &mut provider, &decoder, now).is_some());
        }
        assert_eq!(provider.fetches, 1);
        assert_eq!(decoder.calls.get(), 1);
    }

    #[test]
    fn test_resolve_backs_off_after_failure() {
        let decoder = CountingDecoder::solid(2, 2, [0, 0, 255]);
        let mut provider = FakeProvider { fetches: 0, fail: true };
        let mut cache = AlbumArtCache::new(Duration::from_secs(10));
        let start = Instant::now();

        assert!(cache.resolve("http://art/x", &mut provider, &decoder, start).is_none());
        assert!(cache
            .resolve("http://art/x", &mut provider, &decoder, start + Duration::from_secs(1))
            .is_none());
        assert_eq!(provider.fetches, 1);

        provider.fail = false;
        let later = start + Duration::from_secs(11);
        assert!(cache.resolve("http://art/x", &mut provider, &decoder, later).is_some());
        assert_eq!(provider.fetches, 2);
    }

    #[test]
    fn test_single_pixel_source_fills_destination() {
        for (dw, dh) in [(1, 1), (1, 9), (9, 1), (17, 5)] {
            let mut buf = PixelBuffer::new(20, 20);
            blit_scaled(&mut buf, &[0xABCD], 1, 1, dw, dh, 1, 1);
            assert_eq!(buf.count_colour(0xABCD), dw * dh, "{}x{}", dw, dh);
        }
    }

    #[test]
    fn test_blit_samples_corners_exactly() {
        // 3x3 source with distinct values; any upscale keeps the corners
        let src: Vec<u16> = (1..=9).collect();
        let mut buf = PixelBuffer::new(7, 7);
        blit_scaled(&mut buf, &src, 3, 3, 7, 7, 0, 0);

        assert_eq!(buf.get_pixel(0, 0), Some(1));
        assert_eq!(buf.get_pixel(6, 0), Some(3));
        assert_eq!(buf.get_pixel(0, 6), Some(7));
        assert_eq!(buf.get_pixel(6, 6), Some(9));
        // dx=3 → round(3/6·2) = 1, the middle column
        assert_eq!(buf.get_pixel(3, 3), Some(5));
    }

    #[test]
    fn test_blit_identity_and_clipping() {
        let src: Vec<u16> = (0..16).collect();
        let mut buf = PixelBuffer::new(4, 4);
        blit_scaled(&mut buf, &src, 4, 4, 4, 4, 0, 0);
        assert_eq!(buf.pixels(), src.as_slice());

        let mut small = PixelBuffer::new(3, 3);
        blit_scaled(&mut small, &src, 4, 4, 4, 4, -1, -1);
        assert_eq!(small.get_pixel(0, 0), Some(5));
        assert_eq!(small.get_pixel(2, 2), Some(15));
    }

    #[test]
    fn test_fit_within_box() {
        assert_eq!(fit_within(150, 100, 200), (150, 100));
        assert_eq!(fit_within(640, 640, 200), (200, 200));
        assert_eq!(fit_within(400, 200, 200), (200, 100));
        assert_eq!(fit_within(300, 600, 200), (100, 200));
    }
}
