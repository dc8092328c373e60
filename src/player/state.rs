use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::PlaybackError;
use crate::library::{Track, TrackId};

use super::resolver::ResolvedTrack;

/// What happens when the current track or the queue runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop at the end of the queue.
    #[default]
    Off,
    /// Wrap to the start of the queue.
    All,
    /// Replay the current track on natural end.
    One,
}

impl RepeatMode {
    /// `off -> all -> one -> off`
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RepeatMode::Off => "off",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        };
        f.write_str(s)
    }
}

impl FromStr for RepeatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(RepeatMode::Off),
            "all" => Ok(RepeatMode::All),
            "one" => Ok(RepeatMode::One),
            other => Err(format!("unknown repeat mode '{}' (expected off, all or one)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportStatus {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Stopped,
    Error,
}

impl fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportStatus::Idle => "idle",
            TransportStatus::Loading => "loading",
            TransportStatus::Playing => "playing",
            TransportStatus::Paused => "paused",
            TransportStatus::Stopped => "stopped",
            TransportStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Transport state, mutated only by the player task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportState {
    pub status: TransportStatus,
    pub current_time_ms: u64,
    /// 0 when unknown.
    pub duration_ms: u64,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

/// Commands that can be sent to the Player task.
#[derive(Debug)]
pub enum PlayerCommand {
    /// Queue the whole catalog and start at `track_id`.
    PlayTrack { track_id: TrackId },
    PlayQueue { track_ids: Vec<TrackId>, start_index: usize },
    PlayPauseToggle,
    Play,
    Pause,
    Seek { position_ms: u64 },
    Next,
    Previous,
    Stop,
    ToggleShuffle,
    CycleRepeat,
    SetRepeat(RepeatMode),
    ClearToast,
    GetFullState(oneshot::Sender<PlayerSnapshot>),
    Shutdown,
}

/// Detailed state returned by `PlayerCommand::GetFullState`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub transport: TransportState,
    pub queue_ids: Vec<TrackId>,
    /// `None` when the queue is empty.
    pub queue_position: Option<usize>,
    pub current_track: Option<Track>,
    pub toast: Option<String>,
}

/// Updates broadcast by the Player task about its state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerUpdate {
    Transport(TransportState),
    TrackChanged(Track),
    Progress { position_ms: u64, duration_ms: u64 },
    QueueChanged { queue_ids: Vec<TrackId>, position: Option<usize> },
    Toast(Option<String>),
}

/// Results fed back into the player loop by its own background work.
#[derive(Debug)]
pub(crate) enum InternalEvent {
    Resolved {
        generation: u64,
        index: usize,
        result: Result<ResolvedTrack, PlaybackError>,
    },
}
