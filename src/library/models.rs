//! Data models for catalog entries

use serde::{Deserialize, Serialize};

/// Opaque, unique track identifier.
pub type TrackId = String;

/// A track as stored in the catalog.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub track_id: TrackId,
    pub title: String,
    pub artist_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Cover image reference (data URL or path).
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl Track {
    pub fn new(track_id: &str, title: &str, artist_name: &str) -> Self {
        Track {
            track_id: track_id.to_string(),
            title: title.to_string(),
            artist_name: artist_name.to_string(),
            tags: Vec::new(),
            cover: None,
            duration_ms: None,
            created_at: 0,
        }
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_cover(mut self, cover: &str) -> Self {
        self.cover = Some(cover.to_string());
        self
    }
}
