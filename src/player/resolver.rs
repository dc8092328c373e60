use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::audio::AudioResource;
use crate::error::PlaybackError;
use crate::library::{AudioStore, RecentsLedger, Track, TrackCatalog, TrackId};

use super::PLAYER_LOG_TARGET;

/// Metadata plus a loadable resource for one track.
#[derive(Debug, Clone)]
pub struct ResolvedTrack {
    pub metadata: Track,
    pub resource: AudioResource,
}

/// Maps track identifiers to metadata and audio payloads. Never mutates the catalog.
#[derive(Clone)]
pub struct TrackResolver {
    catalog: Arc<dyn TrackCatalog>,
    store: Arc<dyn AudioStore>,
    recents: Arc<dyn RecentsLedger>,
}

impl TrackResolver {
    pub fn new(
        catalog: Arc<dyn TrackCatalog>,
        store: Arc<dyn AudioStore>,
        recents: Arc<dyn RecentsLedger>,
    ) -> Self {
        Self { catalog, store, recents }
    }

    /// Uses one object for all three collaborators.
    pub fn from_library<L>(library: Arc<L>) -> Self
    where
        L: TrackCatalog + AudioStore + RecentsLedger + 'static,
    {
        Self {
            catalog: library.clone(),
            store: library.clone(),
            recents: library,
        }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, track_id: &str) -> Result<ResolvedTrack, PlaybackError> {
        let metadata = match self.catalog.get_track(track_id).await {
            Ok(Some(track)) => track,
            Ok(None) => {
                warn!(target: PLAYER_LOG_TARGET, "Track {} is not in the catalog.", track_id);
                return Err(PlaybackError::NotFound(track_id.to_string()));
            }
            Err(e) => {
                error!(target: PLAYER_LOG_TARGET, "Catalog lookup for {} failed: {}", track_id, e);
                return Err(e.into());
            }
        };

        let data = match self.store.get_audio_resource(track_id).await {
            Ok(Some(data)) if !data.is_empty() => data,
            Ok(_) => {
                warn!(target: PLAYER_LOG_TARGET, "No audio payload stored for {}.", track_id);
                return Err(PlaybackError::ResourceUnavailable(format!("no audio payload for {}", track_id)));
            }
            Err(e) => {
                error!(target: PLAYER_LOG_TARGET, "Audio payload for {} could not be read: {}", track_id, e);
                return Err(PlaybackError::ResourceUnavailable(e.to_string()));
            }
        };

        debug!(target: PLAYER_LOG_TARGET, bytes = data.len(), "Resolved {} ({}).", metadata.title, track_id);
        let resource = AudioResource::new(track_id, data).with_duration_hint(metadata.duration_ms);
        Ok(ResolvedTrack { metadata, resource })
    }

    /// Identifiers of the whole catalog, in catalog order.
    pub async fn catalog_ids(&self) -> Result<Vec<TrackId>, PlaybackError> {
        let tracks = self.catalog.get_all_tracks().await.map_err(|e| {
            error!(target: PLAYER_LOG_TARGET, "Failed to list catalog: {}", e);
            PlaybackError::ResourceUnavailable(e.to_string())
        })?;
        Ok(tracks.into_iter().map(|t| t.track_id).collect())
    }

    /// Appends to the recents ledger. Failures are logged, never propagated.
    pub async fn record_played(&self, track_id: &str) {
        match self.recents.append_recent(track_id).await {
            Ok(()) => debug!(target: PLAYER_LOG_TARGET, "Recorded {} as recently played.", track_id),
            Err(e) => warn!(target: PLAYER_LOG_TARGET, "Failed to record recent play of {}: {}", track_id, e),
        }
    }

    /// Recently played tracks, most recent first, skipping ids no longer in the catalog.
    pub async fn recent_tracks(&self) -> Result<Vec<Track>, PlaybackError> {
        let ids = self
            .recents
            .recents()
            .await
            .map_err(|e| PlaybackError::ResourceUnavailable(e.to_string()))?;
        let catalog = self
            .catalog
            .get_all_tracks()
            .await
            .map_err(|e| PlaybackError::ResourceUnavailable(e.to_string()))?;

        let tracks: Vec<Track> = ids
            .iter()
            .filter_map(|id| catalog.iter().find(|t| &t.track_id == id).cloned())
            .collect();
        info!(target: PLAYER_LOG_TARGET, "{} of {} recent entries still in catalog.", tracks.len(), ids.len());
        Ok(tracks)
    }
}
