//! Album art download

use crate::error::FetchError;

use super::{get_bytes, ImageProvider};

/// Fetches album art bytes over HTTP
pub struct HttpImageProvider {
    client: reqwest::blocking::Client,
}

impl HttpImageProvider {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl ImageProvider for HttpImageProvider {
    fn fetch_bytes(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        let bytes = get_bytes(&self.client, url)?;
        log::debug!("Album art: {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }
}
