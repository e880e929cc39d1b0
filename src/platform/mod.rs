#[cfg(target_os = "linux")]
pub mod framebuffer;
pub mod surface;

#[cfg(target_os = "linux")]
pub use framebuffer::Framebuffer;
pub use surface::{Geometry, MemorySurface, Surface};
