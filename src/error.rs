//! Error taxonomy for the dashboard.
//!
//! Only `DeviceError` is ever fatal, and only before the render loop starts.
//! Everything a poll or an album art load can produce is recovered by the loop.

use thiserror::Error;

/// Network failure talking to the state endpoint or the album art host
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("reading body from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Bytes arrived but could not be understood
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed state JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("state JSON root is not an object")]
    NotAnObject,

    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("decoded image has no pixels ({width}x{height})")]
    EmptyImage { width: usize, height: usize },
}

/// Either half of a fetch-then-decode operation
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// The framebuffer never became usable
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{request} failed on {path}: {source}")]
    Query {
        path: String,
        request: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} reported no usable geometry after {attempts} attempts")]
    NotReady { path: String, attempts: u32 },

    #[error("{path} is {bits_per_pixel} bpp, only 16 bpp (RGB565) is supported")]
    UnsupportedDepth { path: String, bits_per_pixel: u32 },

    #[error("mmap of {len} bytes failed: {source}")]
    Map {
        len: usize,
        #[source]
        source: std::io::Error,
    },
}
