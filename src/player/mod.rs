//! Playback controller: owns the audio sink, the queue and the transport state,
//! and drives them from a single command/event loop.

use std::time::Duration as StdDuration;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, instrument};

use crate::audio::{AudioSink, SessionId, SinkEventReceiver};
use crate::config::Settings;
use crate::library::Track;
use crate::notify::{MediaControls, MediaSession, Notifier};

mod command_handler;
mod load_task;
mod playback_starter;
mod queue;
mod resolver;
mod run_loop;
mod state;

pub use queue::{Advance, QueueManager, Retreat, DEFAULT_RESTART_THRESHOLD, DEFAULT_SHUFFLE_RETRY_LIMIT};
pub use resolver::{ResolvedTrack, TrackResolver};
pub use state::{PlayerCommand, PlayerSnapshot, PlayerUpdate, RepeatMode, TransportState, TransportStatus};

use state::InternalEvent;

const PLAYER_LOG_TARGET: &str = "r_playdeck::player";

/// Construction-time tuning for a [`Player`].
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub restart_threshold: StdDuration,
    pub shuffle_retry_limit: u32,
    pub toast_clear_delay: StdDuration,
    pub command_buffer_size: usize,
    pub state_update_capacity: usize,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    /// Fixed shuffle seed. `None` seeds from entropy.
    pub shuffle_seed: Option<u64>,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            restart_threshold: DEFAULT_RESTART_THRESHOLD,
            shuffle_retry_limit: DEFAULT_SHUFFLE_RETRY_LIMIT,
            toast_clear_delay: crate::notify::DEFAULT_TOAST_CLEAR_DELAY,
            command_buffer_size: 32,
            state_update_capacity: 64,
            shuffle: false,
            repeat: RepeatMode::Off,
            shuffle_seed: None,
        }
    }
}

impl From<&Settings> for PlayerOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            restart_threshold: StdDuration::from_millis(settings.restart_threshold_ms),
            shuffle_retry_limit: settings.shuffle_retry_limit,
            toast_clear_delay: StdDuration::from_millis(settings.toast_clear_ms),
            command_buffer_size: settings.command_buffer_size,
            state_update_capacity: settings.state_update_capacity,
            shuffle: settings.shuffle,
            repeat: settings.repeat,
            shuffle_seed: None,
        }
    }
}

/// Manages transport state, the queue, and the single audio output.
pub struct Player {
    // --- Collaborators ---
    resolver: TrackResolver,
    sink: Box<dyn AudioSink>,
    notifier: Notifier,

    // --- State ---
    queue: QueueManager,
    transport: TransportState,
    current_track: Option<Track>,
    /// Session of the resource currently bound to the sink.
    bound_session: Option<SessionId>,
    /// Bumped on every load request; resolve results carrying an older value are stale.
    generation: u64,
    load_task: Option<load_task::LoadTask>,

    // --- Communication ---
    command_rx: mpsc::Receiver<PlayerCommand>,
    internal_tx: mpsc::UnboundedSender<InternalEvent>,
    internal_rx: mpsc::UnboundedReceiver<InternalEvent>,
    sink_rx: SinkEventReceiver,
}

impl Player {
    /// Creates a new Player and the command channel sender.
    /// The Player itself should be run in a separate task using `Player::run`.
    ///
    /// When a media session is supplied it receives a [`MediaControls`] handle
    /// holding a command sender, so the loop then ends only on `Shutdown`.
    pub fn new(
        resolver: TrackResolver,
        mut sink: Box<dyn AudioSink>,
        media: Option<Box<dyn MediaSession>>,
        options: PlayerOptions,
    ) -> (Self, mpsc::Sender<PlayerCommand>) {
        let (command_tx, command_rx) = mpsc::channel(options.command_buffer_size.max(1));
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (sink_tx, sink_rx) = mpsc::unbounded_channel();
        sink.attach_events(sink_tx);

        let mut notifier = Notifier::new(options.state_update_capacity, options.toast_clear_delay, media);
        if notifier.has_media_session() {
            notifier.register_controls(MediaControls::new(command_tx.clone()));
        }

        let queue = match options.shuffle_seed {
            Some(seed) => QueueManager::with_seed(seed, options.shuffle_retry_limit, options.restart_threshold),
            None => QueueManager::new(options.shuffle_retry_limit, options.restart_threshold),
        };

        let transport = TransportState {
            shuffle: options.shuffle,
            repeat: options.repeat,
            ..TransportState::default()
        };

        let player = Player {
            resolver,
            sink,
            notifier,
            queue,
            transport,
            current_track: None,
            bound_session: None,
            generation: 0,
            load_task: None,
            command_rx,
            internal_tx,
            internal_rx,
            sink_rx,
        };

        (player, command_tx)
    }

    /// Subscribes to player state updates.
    pub fn subscribe_state_updates(&self) -> broadcast::Receiver<PlayerUpdate> {
        self.notifier.subscribe()
    }

    /// Constructs the full current state object.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            transport: self.transport,
            queue_ids: self.queue.ids().to_vec(),
            queue_position: self.queue.position(),
            current_track: self.current_track.clone(),
            toast: self.notifier.toast().map(str::to_string),
        }
    }

    // --- Private Helper Methods ---

    fn set_status(&mut self, status: TransportStatus) {
        if self.transport.status != status {
            debug!(target: PLAYER_LOG_TARGET, from = %self.transport.status, to = %status, "Transport status change.");
            self.transport.status = status;
        }
        self.notifier.transport_changed(self.transport);
    }

    fn broadcast_queue(&self) {
        self.notifier.broadcast(PlayerUpdate::QueueChanged {
            queue_ids: self.queue.ids().to_vec(),
            position: self.queue.position(),
        });
    }

    /// Cancels the in-flight load, if any, and invalidates its result.
    fn supersede_load(&mut self) {
        self.generation += 1;
        if let Some(task) = self.load_task.take() {
            task.cancel();
        }
    }

    /// Releases the bound resource. Events from the released session are ignored afterwards.
    fn release_output(&mut self) {
        if self.bound_session.take().is_some() {
            self.sink.release();
        }
        self.transport.current_time_ms = 0;
    }

    // --- Main Run Loop ---

    /// Runs the player's command processing loop. This should be spawned as a Tokio task.
    #[instrument(skip(self))]
    pub async fn run(&mut self) {
        info!(target: PLAYER_LOG_TARGET, "Starting player.");
        run_loop::run_player_loop(self).await;
    }
}
