use serde_json::Value;

use crate::error::DecodeError;

pub const DEFAULT_TRACK: &str = "No Track";
pub const DEFAULT_ARTIST: &str = "Unknown Artist";

/// Repeat mode as reported by the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepeatMode {
    #[default]
    Off,
    Context,
    Track,
}

impl RepeatMode {
    /// Parse the player's repeat string; anything unrecognised is `Off`
    pub fn from_wire(s: &str) -> Self {
        match s {
            "context" => RepeatMode::Context,
            "track" => RepeatMode::Track,
            _ => RepeatMode::Off,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::Context => "context",
            RepeatMode::Track => "track",
        }
    }
}

/// Snapshot of what the player is doing, replaced wholesale on every good poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub track: String,
    pub artist: String,
    pub album_art_url: String,
    pub is_playing: bool,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            track: DEFAULT_TRACK.to_string(),
            artist: DEFAULT_ARTIST.to_string(),
            album_art_url: String::new(),
            is_playing: false,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

impl PlaybackState {
    /// Parse the state endpoint's JSON body.
    ///
    /// Expected shape:
    /// `{"track_title": str, "artist_list": [str], "album_cover": str,
    ///   "is_playing": bool, "shuffle_state": bool, "repeat_state": str}`
    ///
    /// Each field falls back to its default on its own when missing or of the
    /// wrong type. Only unparseable JSON or a non-object root is an error.
    pub fn from_json(body: &[u8]) -> Result<Self, DecodeError> {
        let root: Value = serde_json::from_slice(body)?;
        let obj = root.as_object().ok_or(DecodeError::NotAnObject)?;

        let string = |key: &str| obj.get(key).and_then(Value::as_str);
        let flag = |key: &str| obj.get(key).and_then(Value::as_bool).unwrap_or(false);

        // Only the first credited artist is shown
        let artist = obj
            .get("artist_list")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
            .and_then(Value::as_str);

        Ok(Self {
            track: string("track_title").unwrap_or(DEFAULT_TRACK).to_string(),
            artist: artist.unwrap_or(DEFAULT_ARTIST).to_string(),
            album_art_url: string("album_cover").unwrap_or_default().to_string(),
            is_playing: flag("is_playing"),
            shuffle: flag("shuffle_state"),
            repeat: string("repeat_state").map(RepeatMode::from_wire).unwrap_or_default(),
        })
    }

    /// Status line text: "PLAYING" / "PAUSED"
    pub fn status_text(&self) -> &'static str {
        if self.is_playing {
            "PLAYING"
        } else {
            "PAUSED"
        }
    }

    pub fn repeat_line(&self) -> String {
        format!("Repeat: {}", self.repeat.as_str())
    }

    pub fn shuffle_line(&self) -> String {
        format!("Shuffle: {}", if self.shuffle { "ON" } else { "OFF" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_payload() {
        let body = br#"{
            "track_title": "Windowlicker",
            "artist_list": ["Aphex Twin", "Someone Else"],
            "album_cover": "https://i.scdn.co/image/abc",
            "is_playing": true,
            "shuffle_state": true,
            "repeat_state": "context"
        }"#;
        let state = PlaybackState::from_json(body).unwrap();
        assert_eq!(state.track, "Windowlicker");
        assert_eq!(state.artist, "Aphex Twin");
        assert_eq!(state.album_art_url, "https://i.scdn.co/image/abc");
        assert!(state.is_playing);
        assert!(state.shuffle);
        assert_eq!(state.repeat, RepeatMode::Context);
        assert_eq!(state.repeat_line(), "Repeat: context");
        assert_eq!(state.shuffle_line(), "Shuffle: ON");
    }

    #[test]
    fn test_missing_fields_default() {
        let state = PlaybackState::from_json(b"{}").unwrap();
        assert_eq!(state, PlaybackState::default());
        assert_eq!(state.track, "No Track");
        assert_eq!(state.artist, "Unknown Artist");
        assert_eq!(state.status_text(), "PAUSED");
        assert_eq!(state.repeat_line(), "Repeat: off");
        assert_eq!(state.shuffle_line(), "Shuffle: OFF");
    }

    #[test]
    fn test_wrong_types_default_per_field() {
        let body = br#"{
            "track_title": 42,
            "artist_list": [],
            "album_cover": null,
            "is_playing": "yes",
            "shuffle_state": 1,
            "repeat_state": "sometimes"
        }"#;
        let state = PlaybackState::from_json(body).unwrap();
        assert_eq!(state, PlaybackState::default());

        let body = br#"{"track_title": "Kept", "artist_list": [7, "Skipped"]}"#;
        let state = PlaybackState::from_json(body).unwrap();
        assert_eq!(state.track, "Kept");
        assert_eq!(state.artist, "Unknown Artist");
    }

    #[test]
    fn test_malformed_body_is_error() {
        assert!(matches!(
            PlaybackState::from_json(b"<html>"),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(
            PlaybackState::from_json(b"[1, 2]"),
            Err(DecodeError::NotAnObject)
        ));
    }

    #[test]
    fn test_repeat_parsing() {
        assert_eq!(RepeatMode::from_wire("track"), RepeatMode::Track);
        assert_eq!(RepeatMode::from_wire("off"), RepeatMode::Off);
        assert_eq!(RepeatMode::from_wire("TRACK"), RepeatMode::Off);
    }
}
