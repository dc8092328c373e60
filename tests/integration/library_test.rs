//! Integration tests for the directory-backed library
//!
//! These run the player against `FsLibrary` on a temporary directory.

use crate::test_utils::{clock_sink, one_second_wav, seed_fs_library, spawn_player, wait_for_status, wait_until};
use r_playdeck::library::{FsLibrary, RecentsLedger, Track};
use r_playdeck::player::{PlayerCommand, TrackResolver, TransportStatus};
use std::error::Error;
use std::sync::Arc;
use tempfile::tempdir;

#[cfg(test)]
mod library_integration_tests {
    use super::*;

    fn catalog() -> Vec<(Track, Option<bytes::Bytes>)> {
        vec![
            (Track::new("newest", "Newest", "Band").with_duration_ms(1000), Some(one_second_wav())),
            (Track::new("middle", "Middle", "Band"), Some(one_second_wav())),
            (Track::new("oldest", "Oldest", "Band"), None),
        ]
    }

    #[tokio::test]
    async fn test_play_track_uses_catalog_order_and_persists_recents() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        seed_fs_library(dir.path(), &catalog())?;
        let library = Arc::new(FsLibrary::open(dir.path(), 50).await?);
        let (tx, _task) = spawn_player(library.clone(), clock_sink(), None);

        tx.send(PlayerCommand::PlayTrack { track_id: "middle".into() }).await?;
        let snap = wait_for_status(&tx, TransportStatus::Playing).await;
        assert_eq!(snap.queue_ids, vec!["newest", "middle", "oldest"]);
        assert_eq!(snap.queue_position, Some(1));

        // A fresh handle on the same directory sees the persisted ledger.
        let reopened = FsLibrary::open(dir.path(), 50).await?;
        assert_eq!(reopened.recents().await?, vec!["middle".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_payload_on_disk() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        seed_fs_library(dir.path(), &catalog())?;
        let library = Arc::new(FsLibrary::open(dir.path(), 50).await?);
        let (tx, _task) = spawn_player(library, clock_sink(), None);

        tx.send(PlayerCommand::PlayTrack { track_id: "oldest".into() }).await?;
        let snap = wait_for_status(&tx, TransportStatus::Error).await;
        assert_eq!(snap.toast.as_deref(), Some("Audio file not found"));
        Ok(())
    }

    #[tokio::test]
    async fn test_recent_tracks_skip_removed_entries() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        seed_fs_library(dir.path(), &catalog())?;
        let library = Arc::new(FsLibrary::open(dir.path(), 50).await?);
        library.append_recent("newest").await?;
        library.append_recent("gone").await?;
        library.append_recent("middle").await?;

        let resolver = TrackResolver::from_library(library);
        let recent: Vec<String> = resolver
            .recent_tracks()
            .await?
            .into_iter()
            .map(|t| t.track_id)
            .collect();
        assert_eq!(recent, vec!["middle", "newest"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_known_duration_is_used_before_probe() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        seed_fs_library(dir.path(), &catalog())?;
        let library = Arc::new(FsLibrary::open(dir.path(), 50).await?);
        let (tx, _task) = spawn_player(library, clock_sink(), None);

        tx.send(PlayerCommand::PlayTrack { track_id: "newest".into() }).await?;
        let snap = wait_until(&tx, "loaded", |s| s.current_track.is_some()).await;
        assert_eq!(snap.transport.duration_ms, 1000);
        Ok(())
    }
}
