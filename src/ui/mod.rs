pub mod album_art;
pub mod compositing;
pub mod font;
pub mod font8x8;
pub mod icons;
pub mod marquee;
pub mod pixel_buffer;
pub mod theme;

pub use album_art::{AlbumArtCache, ArtDecoder, ImageCrateDecoder};
pub use compositing::{present, Compositor, Frame, Layout};
pub use marquee::{Marquee, ScrollState};
pub use pixel_buffer::PixelBuffer;
