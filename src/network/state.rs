//! Playback state endpoint client

use crate::error::LoadError;
use crate::types::PlaybackState;

use super::{get_bytes, StateProvider};

/// Polls a JSON state endpoint over HTTP
pub struct HttpStateProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpStateProvider {
    pub fn new(client: reqwest::blocking::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl StateProvider for HttpStateProvider {
    fn poll(&mut self) -> Result<PlaybackState, LoadError> {
        let body = get_bytes(&self.client, &self.endpoint)?;
        Ok(PlaybackState::from_json(&body)?)
    }
}
