//! The audio output contract consumed by the player.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::PlaybackError;
use crate::library::TrackId;

/// Identifies one bound resource. Every successful `load` yields a fresh id.
pub type SessionId = u64;

/// A playable handle to one track's audio payload.
#[derive(Debug, Clone)]
pub struct AudioResource {
    track_id: TrackId,
    data: Bytes,
    duration_hint_ms: Option<u64>,
}

impl AudioResource {
    pub fn new(track_id: &str, data: Bytes) -> Self {
        Self {
            track_id: track_id.to_string(),
            data,
            duration_hint_ms: None,
        }
    }

    /// Duration known from catalog metadata, used when the payload headers don't carry one.
    pub fn with_duration_hint(mut self, duration_ms: Option<u64>) -> Self {
        self.duration_hint_ms = duration_ms;
        self
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn duration_hint_ms(&self) -> Option<u64> {
        self.duration_hint_ms
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Lifecycle notifications for a bound resource.
///
/// For a given session the order is `Started -> Progress* -> (Ended | Failed | Stopped)`.
/// `Stopped` is also sent when output is paused; a later `Started` resumes the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEventKind {
    Started,
    Progress { current_ms: u64 },
    DurationKnown { duration_ms: u64 },
    Stopped,
    Ended,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SinkEvent {
    pub session: SessionId,
    pub kind: SinkEventKind,
}

pub type SinkEventSender = mpsc::UnboundedSender<SinkEvent>;
pub type SinkEventReceiver = mpsc::UnboundedReceiver<SinkEvent>;

/// Trait defining the controls for the single audio output.
///
/// Exactly one resource is bound at a time. Loading a new resource releases the
/// previous one before `load` returns.
#[async_trait]
pub trait AudioSink: Send {
    /// Wires the event stream. Called once by the player at construction.
    fn attach_events(&mut self, events: SinkEventSender);

    /// Binds `resource`, releasing any previous one. Fails with
    /// `ResourceUnavailable` if the resource carries no payload.
    fn load(&mut self, resource: AudioResource) -> Result<SessionId, PlaybackError>;

    /// Starts audible output. No-op without a bound resource.
    async fn play(&mut self) -> Result<(), PlaybackError>;

    /// Halts audible output. No-op without a bound resource.
    fn pause(&mut self);

    /// Moves the playhead, clamped to `[0, duration]`.
    fn seek(&mut self, time_ms: u64);

    /// Releases the bound resource, if any.
    fn release(&mut self);

    fn is_bound(&self) -> bool;

    fn is_paused(&self) -> bool;

    fn position_ms(&self) -> u64;

    /// Full shutdown of the output. The sink is not used afterwards.
    async fn shutdown(&mut self) -> Result<(), PlaybackError>;
}
