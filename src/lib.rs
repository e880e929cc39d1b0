/// State endpoint used when none is configured
/// Serves the player snapshot as JSON (track_title, artist_list, album_cover, ...)
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/state";

/// Primary framebuffer on every Linux board we target
pub const DEFAULT_DEVICE: &str = "/dev/fb0";

pub mod app;
pub mod config;
pub mod error;
pub mod network;
pub mod platform;
pub mod types;
pub mod ui;

// Re-export commonly used items from submodules
pub use app::{Dashboard, RenderLoop};
pub use config::{Config, LoopConfig};
pub use error::{DecodeError, DeviceError, FetchError, LoadError};

pub use types::*;
