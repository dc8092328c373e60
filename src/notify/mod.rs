//! Notification channel: mirrors player state to observers and owns the
//! ephemeral user-facing message.

mod media_session;
mod toast;

pub use media_session::{
    ChannelMediaSession, MediaCommand, MediaControls, MediaSession, MediaSessionHandle, NowPlaying,
};
pub use toast::{ToastSlot, ToastTicket};

use std::time::Duration as StdDuration;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, trace};

use crate::library::Track;
use crate::player::{PlayerUpdate, TransportState};

const NOTIFY_LOG_TARGET: &str = "r_playdeck::notify";

pub const DEFAULT_TOAST_CLEAR_DELAY: StdDuration = StdDuration::from_millis(3000);

pub struct Notifier {
    updates_tx: broadcast::Sender<PlayerUpdate>,
    toast: ToastSlot,
    clear_delay: StdDuration,
    expired_tx: mpsc::UnboundedSender<ToastTicket>,
    expired_rx: mpsc::UnboundedReceiver<ToastTicket>,
    media: Option<Box<dyn MediaSession>>,
}

impl Notifier {
    pub fn new(
        update_capacity: usize,
        clear_delay: StdDuration,
        media: Option<Box<dyn MediaSession>>,
    ) -> Self {
        let (updates_tx, _) = broadcast::channel(update_capacity.max(1));
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        if media.is_some() {
            info!(target: NOTIFY_LOG_TARGET, "Media session integration available.");
        }
        Self {
            updates_tx,
            toast: ToastSlot::new(),
            clear_delay,
            expired_tx,
            expired_rx,
            media,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlayerUpdate> {
        self.updates_tx.subscribe()
    }

    pub fn has_media_session(&self) -> bool {
        self.media.is_some()
    }

    pub fn register_controls(&mut self, controls: MediaControls) {
        if let Some(media) = self.media.as_mut() {
            media.register_controls(controls);
        }
    }

    /// Sends an update, logging when nobody listens.
    pub fn broadcast(&self, update: PlayerUpdate) {
        trace!(target: NOTIFY_LOG_TARGET, "Broadcasting update: {:?}", update);
        if self.updates_tx.send(update).is_err() {
            // Normal when no front end is subscribed.
            trace!(target: NOTIFY_LOG_TARGET, "No active listeners for update.");
        }
    }

    pub fn transport_changed(&mut self, transport: TransportState) {
        if let Some(media) = self.media.as_mut() {
            media.set_status(transport.status);
        }
        self.broadcast(PlayerUpdate::Transport(transport));
    }

    pub fn track_changed(&mut self, track: &Track) {
        if let Some(media) = self.media.as_mut() {
            media.set_now_playing(&NowPlaying::from(track));
        }
        self.broadcast(PlayerUpdate::TrackChanged(track.clone()));
    }

    pub fn track_cleared(&mut self) {
        if let Some(media) = self.media.as_mut() {
            media.clear_now_playing();
        }
    }

    /// Shows `message`, replacing any pending one, and schedules its clearing.
    pub fn show(&mut self, message: &str) -> ToastTicket {
        let ticket = self.toast.show(message);
        info!(target: NOTIFY_LOG_TARGET, ticket, "Toast: {}", message);
        self.broadcast(PlayerUpdate::Toast(Some(message.to_string())));

        let expired_tx = self.expired_tx.clone();
        let delay = self.clear_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = expired_tx.send(ticket);
        });
        ticket
    }

    /// Timer callback for `ticket`. A stale ticket leaves a newer message in place.
    pub fn expire(&mut self, ticket: ToastTicket) {
        if self.toast.expire(ticket) {
            debug!(target: NOTIFY_LOG_TARGET, ticket, "Toast cleared after delay.");
            self.broadcast(PlayerUpdate::Toast(None));
        } else {
            trace!(target: NOTIFY_LOG_TARGET, ticket, "Stale toast timer ignored.");
        }
    }

    pub fn clear_toast(&mut self) {
        if self.toast.clear() {
            self.broadcast(PlayerUpdate::Toast(None));
        }
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.message()
    }

    /// Next fired toast timer. Pending forever if none is scheduled.
    pub async fn next_expired(&mut self) -> Option<ToastTicket> {
        self.expired_rx.recv().await
    }
}
