//! Command line / environment configuration

use std::time::Duration;

use clap::Parser;

use crate::{DEFAULT_DEVICE, DEFAULT_ENDPOINT};

#[derive(Debug, Clone, Parser)]
#[command(name = "nowplaying-fb", version, about = "Now-playing dashboard for a Linux framebuffer")]
pub struct Config {
    /// Playback state endpoint (JSON)
    #[arg(env = "NOWPLAYING_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Framebuffer device
    #[arg(long, env = "NOWPLAYING_FB", default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// Frame period in milliseconds
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// How often to poll the state endpoint, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub poll_ms: u64,

    /// HTTP timeout for state polls and album art, in seconds
    #[arg(long, default_value_t = 5)]
    pub timeout_secs: u64,

    /// Marquee scroll speed in pixels per frame
    #[arg(long, default_value_t = 8)]
    pub scroll_px: usize,

    /// Attempts to get valid framebuffer geometry before giving up
    #[arg(long, default_value_t = 50)]
    pub device_retries: u32,

    /// Pause between framebuffer attempts, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub device_backoff_ms: u64,

    /// Seconds before a failed album art URL is fetched again
    #[arg(long, default_value_t = 10)]
    pub art_retry_secs: u64,

    /// Accept self-signed TLS certificates from the state host
    #[arg(long, env = "NOWPLAYING_INSECURE")]
    pub insecure: bool,
}

/// Timing the render loop runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub tick: Duration,
    /// Poll on every Nth tick
    pub poll_every: u64,
    pub scroll_px: usize,
    pub art_retry: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(50),
            poll_every: 20,
            scroll_px: 8,
            art_retry: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn loop_config(&self) -> LoopConfig {
        let tick_ms = self.tick_ms.max(1);
        LoopConfig {
            tick: Duration::from_millis(tick_ms),
            poll_every: (self.poll_ms / tick_ms).max(1),
            scroll_px: self.scroll_px,
            art_retry: Duration::from_secs(self.art_retry_secs),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn device_backoff(&self) -> Duration {
        Duration::from_millis(self.device_backoff_ms)
    }
}
