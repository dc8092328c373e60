// src/player/load_task.rs

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace};

use super::state::InternalEvent;
use super::{TrackResolver, PLAYER_LOG_TARGET};
use crate::library::TrackId;

/// Manages a single in-flight resolve.
#[derive(Debug)]
pub struct LoadTask {
    task_handle: JoinHandle<()>,
    track_id: TrackId,
    generation: u64,
}

impl LoadTask {
    /// Aborts the resolve. Consumes the task.
    ///
    /// A result already sent before the abort still reaches the loop and is
    /// dropped there by its generation.
    pub fn cancel(self) {
        if self.task_handle.is_finished() {
            trace!(target: PLAYER_LOG_TARGET, track_id = %self.track_id, "Load task already finished.");
            return;
        }
        debug!(target: PLAYER_LOG_TARGET, track_id = %self.track_id, generation = self.generation, "Aborting superseded load task.");
        self.task_handle.abort();
    }
}

/// Spawns a Tokio task resolving `track_id` and reporting back on `internal_tx`.
#[instrument(skip(resolver, internal_tx))]
pub fn spawn_resolve(
    resolver: TrackResolver,
    track_id: TrackId,
    generation: u64,
    index: usize,
    internal_tx: mpsc::UnboundedSender<InternalEvent>,
) -> LoadTask {
    info!(target: PLAYER_LOG_TARGET, generation, index, "Spawning resolve task for {}", track_id);
    let task_track_id = track_id.clone();
    let task_handle = tokio::spawn(async move {
        let result = resolver.resolve(&task_track_id).await;
        if internal_tx
            .send(InternalEvent::Resolved { generation, index, result })
            .is_err()
        {
            trace!(target: PLAYER_LOG_TARGET, track_id = %task_track_id, "Player gone before resolve finished.");
        }
    });

    LoadTask {
        task_handle,
        track_id,
        generation,
    }
}
