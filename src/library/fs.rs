//! Directory-backed library.
//!
//! Layout under the root directory:
//!
//! ```text
//! tracks.json     JSON array of tracks, most recently added first
//! recents.json    JSON array of track ids, most recent first
//! audio/<id>      raw audio payload for each track
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::sync::Mutex as TokioMutex;
use tracing::{debug, info, instrument, warn};

use super::catalog::{AudioStore, RecentsLedger, TrackCatalog};
use super::error::LibraryError;
use super::models::{Track, TrackId};
use super::recents::Recents;

const LOG_TARGET: &str = "r_playdeck::library::fs";

const TRACKS_FILE: &str = "tracks.json";
const RECENTS_FILE: &str = "recents.json";
const AUDIO_DIR: &str = "audio";

pub struct FsLibrary {
    root: PathBuf,
    recents: TokioMutex<Recents>,
}

impl FsLibrary {
    /// Opens the library at `root`. A missing directory behaves as an empty library.
    #[instrument(skip(root), fields(root = %root.as_ref().display()))]
    pub async fn open<P: AsRef<Path>>(root: P, recents_limit: usize) -> Result<Self, LibraryError> {
        let root = root.as_ref().to_path_buf();
        let persisted: Vec<TrackId> = read_json_or_default(&root.join(RECENTS_FILE)).await?;
        info!(target: LOG_TARGET, "Opened library at {} ({} recents).", root.display(), persisted.len());
        Ok(Self {
            root,
            recents: TokioMutex::new(Recents::from_entries(persisted, recents_limit)),
        })
    }

    fn audio_path(&self, track_id: &str) -> Option<PathBuf> {
        // Identifiers are opaque, but they must not escape the audio directory.
        if track_id.is_empty()
            || track_id.contains('/')
            || track_id.contains('\\')
            || track_id.contains("..")
        {
            return None;
        }
        Some(self.root.join(AUDIO_DIR).join(track_id))
    }
}

async fn read_json_or_default<T>(path: &Path) -> Result<T, LibraryError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match fs::read_to_string(path).await {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl TrackCatalog for FsLibrary {
    async fn get_all_tracks(&self) -> Result<Vec<Track>, LibraryError> {
        read_json_or_default(&self.root.join(TRACKS_FILE)).await
    }

    async fn get_track(&self, track_id: &str) -> Result<Option<Track>, LibraryError> {
        let tracks = self.get_all_tracks().await?;
        Ok(tracks.into_iter().find(|t| t.track_id == track_id))
    }
}

#[async_trait]
impl AudioStore for FsLibrary {
    async fn get_audio_resource(&self, track_id: &str) -> Result<Option<Bytes>, LibraryError> {
        let Some(path) = self.audio_path(track_id) else {
            warn!(target: LOG_TARGET, track_id, "Rejected audio lookup for unsafe identifier.");
            return Ok(None);
        };
        match fs::read(&path).await {
            Ok(data) => {
                debug!(target: LOG_TARGET, track_id, bytes = data.len(), "Loaded audio payload.");
                Ok(Some(Bytes::from(data)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RecentsLedger for FsLibrary {
    async fn append_recent(&self, track_id: &str) -> Result<(), LibraryError> {
        let mut recents = self.recents.lock().await;
        let mut updated = recents.clone();
        updated.push(track_id.to_string());
        let content = serde_json::to_string_pretty(&updated.to_vec())?;
        // The in-memory ledger only moves once the file agrees with it.
        fs::create_dir_all(&self.root).await?;
        fs::write(self.root.join(RECENTS_FILE), content).await?;
        *recents = updated;
        Ok(())
    }

    async fn recents(&self) -> Result<Vec<TrackId>, LibraryError> {
        Ok(self.recents.lock().await.to_vec())
    }
}
