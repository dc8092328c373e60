//! Integration tests for the playback engine
//!
//! These drive a player through its command channel against the clock-driven
//! sink and an in-memory library.

use crate::test_utils::{clock_sink, one_second_wav, wav_bytes, snapshot, spawn_player, wait_for_status, wait_until};
use bytes::Bytes;
use r_playdeck::library::{MemoryLibrary, RecentsLedger, Track};
use r_playdeck::notify::{ChannelMediaSession, MediaCommand};
use r_playdeck::player::{PlayerCommand, RepeatMode, TransportStatus};
use std::sync::Arc;
use std::time::Duration as StdDuration;

#[cfg(test)]
mod playback_flow_tests {
    use super::*;

    async fn library(tracks: &[(&str, &str, Option<Bytes>)]) -> Arc<MemoryLibrary> {
        let library = MemoryLibrary::new(50);
        for (id, title, audio) in tracks.iter().rev() {
            library.add_track(Track::new(id, title, "Test Artist"), audio.clone()).await;
        }
        Arc::new(library)
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Two one-second tracks play back to back, then the queue is exhausted.
    #[tokio::test(start_paused = true)]
    async fn test_queue_plays_through_and_stops() {
        let lib = library(&[("a", "First", Some(one_second_wav())), ("b", "Second", Some(one_second_wav()))]).await;
        let (tx, _task) = spawn_player(lib.clone(), clock_sink(), None);

        tx.send(PlayerCommand::PlayQueue { track_ids: ids(&["a", "b"]), start_index: 0 }).await.unwrap();
        let snap = wait_until(&tx, "first track with duration", |s| {
            s.transport.status == TransportStatus::Playing && s.transport.duration_ms == 1000
        })
        .await;
        assert_eq!(snap.current_track.unwrap().track_id, "a");

        let snap = wait_until(&tx, "second track", |s| s.queue_position == Some(1)).await;
        assert_eq!(snap.current_track.unwrap().track_id, "b");

        let snap = wait_for_status(&tx, TransportStatus::Stopped).await;
        assert_eq!(snap.queue_position, Some(1));
        assert_eq!(lib.recents().await.unwrap(), ids(&["b", "a"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_one_keeps_replaying() {
        let lib = library(&[("a", "Loop", Some(one_second_wav())), ("b", "Never", Some(one_second_wav()))]).await;
        let (tx, _task) = spawn_player(lib.clone(), clock_sink(), None);

        tx.send(PlayerCommand::SetRepeat(RepeatMode::One)).await.unwrap();
        tx.send(PlayerCommand::PlayQueue { track_ids: ids(&["a", "b"]), start_index: 0 }).await.unwrap();
        wait_for_status(&tx, TransportStatus::Playing).await;

        tokio::time::sleep(StdDuration::from_millis(3500)).await;
        let snap = snapshot(&tx).await;
        assert_eq!(snap.transport.status, TransportStatus::Playing);
        assert_eq!(snap.queue_position, Some(0));
        assert_eq!(lib.recents().await.unwrap(), ids(&["a"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_clears_after_delay() {
        let lib = library(&[("a", "First", Some(one_second_wav()))]).await;
        let (tx, _task) = spawn_player(lib, clock_sink(), None);

        tx.send(PlayerCommand::PlayTrack { track_id: "nope".into() }).await.unwrap();
        let snap = wait_until(&tx, "toast", |s| s.toast.is_some()).await;
        assert_eq!(snap.toast.as_deref(), Some("Track not found"));

        tokio::time::sleep(StdDuration::from_millis(2500)).await;
        assert!(snapshot(&tx).await.toast.is_some());

        tokio::time::sleep(StdDuration::from_millis(1000)).await;
        assert_eq!(snapshot(&tx).await.toast, None);
    }

    /// An earlier toast's timer must not clear a later toast.
    #[tokio::test(start_paused = true)]
    async fn test_toast_last_write_wins() {
        let lib = library(&[("silent", "Silent", None)]).await;
        let (tx, _task) = spawn_player(lib, clock_sink(), None);

        tx.send(PlayerCommand::PlayTrack { track_id: "nope".into() }).await.unwrap();
        wait_until(&tx, "first toast", |s| s.toast.as_deref() == Some("Track not found")).await;

        tokio::time::sleep(StdDuration::from_millis(1000)).await;
        tx.send(PlayerCommand::PlayTrack { track_id: "silent".into() }).await.unwrap();
        wait_until(&tx, "second toast", |s| s.toast.as_deref() == Some("Audio file not found")).await;

        // Past the first toast's deadline, before the second's.
        tokio::time::sleep(StdDuration::from_millis(2500)).await;
        assert_eq!(snapshot(&tx).await.toast.as_deref(), Some("Audio file not found"));

        tokio::time::sleep(StdDuration::from_millis(1000)).await;
        assert_eq!(snapshot(&tx).await.toast, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrecognised_payload_fails_without_advancing() {
        let lib = library(&[
            ("junk", "Corrupt", Some(Bytes::from_static(b"this is not audio at all"))),
            ("b", "Fine", Some(one_second_wav())),
        ])
        .await;
        let (tx, _task) = spawn_player(lib, clock_sink(), None);

        tx.send(PlayerCommand::PlayQueue { track_ids: ids(&["junk", "b"]), start_index: 0 }).await.unwrap();
        let snap = wait_for_status(&tx, TransportStatus::Error).await;

        assert_eq!(snap.toast.as_deref(), Some("Playback error: Corrupt"));
        assert_eq!(snap.queue_position, Some(0));

        // Recovery is the next explicit command.
        tx.send(PlayerCommand::Next).await.unwrap();
        let snap = wait_for_status(&tx, TransportStatus::Playing).await;
        assert_eq!(snap.current_track.unwrap().track_id, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrecognised_payload_fails_with_known_duration() {
        let lib = MemoryLibrary::new(50);
        lib.add_track(
            Track::new("junk", "Corrupt", "Test Artist").with_duration_ms(5000),
            Some(Bytes::from_static(b"this is not audio at all")),
        )
        .await;
        let (tx, _task) = spawn_player(Arc::new(lib), clock_sink(), None);

        tx.send(PlayerCommand::PlayTrack { track_id: "junk".into() }).await.unwrap();
        let snap = wait_for_status(&tx, TransportStatus::Error).await;

        assert_eq!(snap.transport.duration_ms, 5000);
        assert_eq!(snap.toast.as_deref(), Some("Playback error: Corrupt"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_device_rejects_then_recovers() {
        let lib = library(&[("a", "First", Some(one_second_wav()))]).await;
        let sink = clock_sink();
        let device = sink.device_handle();
        device.set_available(false);
        let (tx, _task) = spawn_player(lib, sink, None);

        tx.send(PlayerCommand::PlayTrack { track_id: "a".into() }).await.unwrap();
        let snap = wait_for_status(&tx, TransportStatus::Error).await;
        assert_eq!(snap.toast.as_deref(), Some("Could not start playback"));

        device.set_available(true);
        tx.send(PlayerCommand::PlayPauseToggle).await.unwrap();
        let snap = wait_for_status(&tx, TransportStatus::Playing).await;
        assert_eq!(snap.current_track.unwrap().track_id, "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_and_previous_restart() {
        let long = wav_seconds(10);
        let lib = library(&[("a", "First", Some(one_second_wav())), ("b", "Long", Some(long))]).await;
        let (tx, _task) = spawn_player(lib, clock_sink(), None);

        tx.send(PlayerCommand::PlayQueue { track_ids: ids(&["a", "b"]), start_index: 1 }).await.unwrap();
        wait_for_status(&tx, TransportStatus::Playing).await;

        tx.send(PlayerCommand::Seek { position_ms: 60_000 }).await.unwrap();
        let snap = snapshot(&tx).await;
        assert_eq!(snap.transport.current_time_ms, 10_000, "seek clamps to the duration");

        tx.send(PlayerCommand::Seek { position_ms: 5000 }).await.unwrap();
        tx.send(PlayerCommand::Previous).await.unwrap();
        let snap = snapshot(&tx).await;
        assert_eq!(snap.queue_position, Some(1));
        assert!(snap.transport.current_time_ms < 1000);

        tx.send(PlayerCommand::Previous).await.unwrap();
        let snap = wait_until(&tx, "previous track", |s| {
            s.queue_position == Some(0) && s.transport.status == TransportStatus::Playing
        })
        .await;
        assert_eq!(snap.current_track.unwrap().track_id, "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_media_session_mirrors_and_controls() {
        let lib = library(&[("a", "Mirrored", Some(wav_seconds(30)))]).await;
        let (session, handle) = ChannelMediaSession::new();
        let (tx, _task) = spawn_player(lib, clock_sink(), Some(Box::new(session)));

        tx.send(PlayerCommand::PlayTrack { track_id: "a".into() }).await.unwrap();
        wait_for_status(&tx, TransportStatus::Playing).await;

        let now_playing = handle.now_playing.borrow().clone().expect("now playing pushed");
        assert_eq!(now_playing.title, "Mirrored");
        assert_eq!(now_playing.artist, "Test Artist");
        assert_eq!(*handle.status.borrow(), TransportStatus::Playing);

        let controls = handle.controls().expect("controls registered");
        assert!(controls.dispatch(MediaCommand::Pause).await);
        wait_for_status(&tx, TransportStatus::Paused).await;
        assert_eq!(*handle.status.borrow(), TransportStatus::Paused);

        assert!(controls.dispatch(MediaCommand::Play).await);
        wait_for_status(&tx, TransportStatus::Playing).await;

        tx.send(PlayerCommand::Shutdown).await.unwrap();
    }

    fn wav_seconds(seconds: u32) -> Bytes {
        wav_bytes(8000, 8000 * seconds)
    }
}
