//! Optional OS-level "now playing" surface.
//!
//! Platforms that offer a media-control integration implement [`MediaSession`].
//! The player mirrors track metadata and transport status into it and hands it
//! a [`MediaControls`] handle for forwarding external play/pause/seek/next/prev
//! requests.

use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tracing::{debug, error};

use crate::library::Track;
use crate::player::{PlayerCommand, TransportStatus};

const LOG_TARGET: &str = "r_playdeck::notify::media_session";

/// Metadata pushed to the media surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub cover: Option<String>,
}

impl From<&Track> for NowPlaying {
    fn from(track: &Track) -> Self {
        NowPlaying {
            title: track.title.clone(),
            artist: track.artist_name.clone(),
            cover: track.cover.clone(),
        }
    }
}

/// Transport requests arriving from the media surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCommand {
    Play,
    Pause,
    PlayPause,
    Next,
    Previous,
    SeekTo { position_ms: u64 },
}

impl From<MediaCommand> for PlayerCommand {
    fn from(command: MediaCommand) -> Self {
        match command {
            MediaCommand::Play => PlayerCommand::Play,
            MediaCommand::Pause => PlayerCommand::Pause,
            MediaCommand::PlayPause => PlayerCommand::PlayPauseToggle,
            MediaCommand::Next => PlayerCommand::Next,
            MediaCommand::Previous => PlayerCommand::Previous,
            MediaCommand::SeekTo { position_ms } => PlayerCommand::Seek { position_ms },
        }
    }
}

/// Forwards media-surface requests into the player's command channel.
#[derive(Debug, Clone)]
pub struct MediaControls {
    command_tx: mpsc::Sender<PlayerCommand>,
}

impl MediaControls {
    pub fn new(command_tx: mpsc::Sender<PlayerCommand>) -> Self {
        Self { command_tx }
    }

    /// Returns false if the player is gone.
    pub async fn dispatch(&self, command: MediaCommand) -> bool {
        debug!(target: LOG_TARGET, ?command, "Forwarding media command.");
        match self.command_tx.send(command.into()).await {
            Ok(()) => true,
            Err(e) => {
                error!(target: LOG_TARGET, "Failed to forward media command to player task: {}", e);
                false
            }
        }
    }
}

/// A platform media-control integration.
pub trait MediaSession: Send {
    fn register_controls(&mut self, controls: MediaControls);

    fn set_now_playing(&mut self, now_playing: &NowPlaying);

    /// Nothing is loaded any more.
    fn clear_now_playing(&mut self);

    fn set_status(&mut self, status: TransportStatus);
}

/// In-process media session backed by watch channels.
///
/// Useful for front ends living in the same process, and for tests.
pub struct ChannelMediaSession {
    now_playing_tx: watch::Sender<Option<NowPlaying>>,
    status_tx: watch::Sender<TransportStatus>,
    controls: Arc<Mutex<Option<MediaControls>>>,
}

/// Observer side of a [`ChannelMediaSession`].
#[derive(Clone)]
pub struct MediaSessionHandle {
    pub now_playing: watch::Receiver<Option<NowPlaying>>,
    pub status: watch::Receiver<TransportStatus>,
    controls: Arc<Mutex<Option<MediaControls>>>,
}

impl ChannelMediaSession {
    pub fn new() -> (Self, MediaSessionHandle) {
        let (now_playing_tx, now_playing) = watch::channel(None);
        let (status_tx, status) = watch::channel(TransportStatus::Idle);
        let controls = Arc::new(Mutex::new(None));
        let session = Self {
            now_playing_tx,
            status_tx,
            controls: controls.clone(),
        };
        let handle = MediaSessionHandle {
            now_playing,
            status,
            controls,
        };
        (session, handle)
    }
}

impl MediaSession for ChannelMediaSession {
    fn register_controls(&mut self, controls: MediaControls) {
        if let Ok(mut slot) = self.controls.lock() {
            *slot = Some(controls);
        }
    }

    fn set_now_playing(&mut self, now_playing: &NowPlaying) {
        self.now_playing_tx.send_replace(Some(now_playing.clone()));
    }

    fn clear_now_playing(&mut self) {
        self.now_playing_tx.send_replace(None);
    }

    fn set_status(&mut self, status: TransportStatus) {
        self.status_tx.send_replace(status);
    }
}

impl MediaSessionHandle {
    /// Controls registered by the player, once it has been constructed.
    pub fn controls(&self) -> Option<MediaControls> {
        self.controls.lock().ok().and_then(|c| c.clone())
    }
}
