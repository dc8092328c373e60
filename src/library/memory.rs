//! In-memory library, used by tests and embedders that manage their own storage.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex as TokioMutex;
use tracing::debug;

use super::catalog::{AudioStore, RecentsLedger, TrackCatalog};
use super::error::LibraryError;
use super::models::{Track, TrackId};
use super::recents::Recents;

const LOG_TARGET: &str = "r_playdeck::library::memory";

#[derive(Default)]
struct Inner {
    // Most recently added first.
    tracks: Vec<Track>,
    blobs: HashMap<TrackId, Bytes>,
    recents: Recents,
}

/// Catalog, payload store and recents ledger held in memory.
pub struct MemoryLibrary {
    inner: TokioMutex<Inner>,
}

impl MemoryLibrary {
    pub fn new(recents_limit: usize) -> Self {
        Self {
            inner: TokioMutex::new(Inner {
                tracks: Vec::new(),
                blobs: HashMap::new(),
                recents: Recents::new(recents_limit),
            }),
        }
    }

    /// Adds a track at the front of the catalog, replacing any entry with the same id.
    pub async fn add_track(&self, track: Track, audio: Option<Bytes>) {
        let mut inner = self.inner.lock().await;
        debug!(target: LOG_TARGET, track_id = %track.track_id, "Adding track to memory library.");
        inner.tracks.retain(|t| t.track_id != track.track_id);
        match audio {
            Some(bytes) => {
                inner.blobs.insert(track.track_id.clone(), bytes);
            }
            None => {
                inner.blobs.remove(&track.track_id);
            }
        }
        inner.tracks.insert(0, track);
    }

    /// Removes the track and its payload. Recents are left untouched.
    pub async fn remove_track(&self, track_id: &str) {
        let mut inner = self.inner.lock().await;
        inner.tracks.retain(|t| t.track_id != track_id);
        inner.blobs.remove(track_id);
    }
}

impl Default for MemoryLibrary {
    fn default() -> Self {
        Self::new(super::recents::DEFAULT_RECENTS_LIMIT)
    }
}

#[async_trait]
impl TrackCatalog for MemoryLibrary {
    async fn get_all_tracks(&self) -> Result<Vec<Track>, LibraryError> {
        Ok(self.inner.lock().await.tracks.clone())
    }

    async fn get_track(&self, track_id: &str) -> Result<Option<Track>, LibraryError> {
        let inner = self.inner.lock().await;
        Ok(inner.tracks.iter().find(|t| t.track_id == track_id).cloned())
    }
}

#[async_trait]
impl AudioStore for MemoryLibrary {
    async fn get_audio_resource(&self, track_id: &str) -> Result<Option<Bytes>, LibraryError> {
        Ok(self.inner.lock().await.blobs.get(track_id).cloned())
    }
}

#[async_trait]
impl RecentsLedger for MemoryLibrary {
    async fn append_recent(&self, track_id: &str) -> Result<(), LibraryError> {
        self.inner.lock().await.recents.push(track_id.to_string());
        Ok(())
    }

    async fn recents(&self) -> Result<Vec<TrackId>, LibraryError> {
        Ok(self.inner.lock().await.recents.to_vec())
    }
}
