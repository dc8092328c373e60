use async_trait::async_trait;
use bytes::Bytes;

use super::error::LibraryError;
use super::models::{Track, TrackId};

/// Read access to the track catalog.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// All tracks, in the catalog's own order (treated as opaque by the player).
    async fn get_all_tracks(&self) -> Result<Vec<Track>, LibraryError>;

    async fn get_track(&self, track_id: &str) -> Result<Option<Track>, LibraryError>;
}

/// Binary audio payloads keyed by track identifier.
#[async_trait]
pub trait AudioStore: Send + Sync {
    async fn get_audio_resource(&self, track_id: &str) -> Result<Option<Bytes>, LibraryError>;
}

/// The "recently played" ledger.
#[async_trait]
pub trait RecentsLedger: Send + Sync {
    /// Moves `track_id` to the most recent slot, evicting the oldest entries past the cap.
    async fn append_recent(&self, track_id: &str) -> Result<(), LibraryError>;

    /// Most recent first.
    async fn recents(&self) -> Result<Vec<TrackId>, LibraryError>;
}
