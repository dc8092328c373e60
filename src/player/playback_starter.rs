// src/player/playback_starter.rs
use tracing::{debug, error, info, instrument, warn};

use super::state::TransportStatus;
use super::{load_task, Player, ResolvedTrack, PLAYER_LOG_TARGET};
use crate::error::PlaybackError;

/// Starts loading the track at the current queue position.
///
/// Any previous load is superseded and the bound resource is released, so the
/// sink never carries more than one resource and stale results are dropped.
#[instrument(skip(player), fields(position = ?player.queue.position()))]
pub async fn begin_load(player: &mut Player) {
    let (Some(index), Some(track_id)) = (player.queue.position(), player.queue.current_id().cloned()) else {
        warn!(target: PLAYER_LOG_TARGET, "begin_load called with an empty queue.");
        return;
    };

    player.supersede_load();
    player.release_output();
    player.transport.duration_ms = 0;
    player.set_status(TransportStatus::Loading);

    info!(target: PLAYER_LOG_TARGET, generation = player.generation, "Loading track {} at queue index {}.", track_id, index);
    let task = load_task::spawn_resolve(
        player.resolver.clone(),
        track_id,
        player.generation,
        index,
        player.internal_tx.clone(),
    );
    player.load_task = Some(task);
}

/// Applies a resolve result, unless a newer request superseded it.
#[instrument(skip(player, result), fields(current_generation = player.generation))]
pub async fn on_resolved(
    player: &mut Player,
    generation: u64,
    index: usize,
    result: Result<ResolvedTrack, PlaybackError>,
) {
    if generation != player.generation {
        debug!(target: PLAYER_LOG_TARGET, generation, "Discarding result of superseded load.");
        return;
    }
    player.load_task = None;

    let resolved = match result {
        Ok(resolved) => resolved,
        Err(e) => {
            fail_load(player, e);
            return;
        }
    };

    let ResolvedTrack { metadata, resource } = resolved;
    let session = match player.sink.load(resource) {
        Ok(session) => session,
        Err(e) => {
            fail_load(player, e);
            return;
        }
    };

    info!(target: PLAYER_LOG_TARGET, session, index, "Bound {} - {} ({}).", metadata.artist_name, metadata.title, metadata.track_id);
    player.bound_session = Some(session);
    player.transport.current_time_ms = 0;
    player.transport.duration_ms = metadata.duration_ms.unwrap_or(0);
    player.notifier.track_changed(&metadata);
    player.resolver.record_played(&metadata.track_id).await;
    player.current_track = Some(metadata);

    start_output(player).await;
}

/// Activates the sink. A refusal leaves the resource bound so a later play can retry.
pub async fn start_output(player: &mut Player) {
    match player.sink.play().await {
        Ok(()) => {
            if player.sink.is_bound() {
                player.set_status(TransportStatus::Playing);
            }
        }
        Err(e) => {
            warn!(target: PLAYER_LOG_TARGET, "Output activation failed: {}", e);
            player.set_status(TransportStatus::Error);
            player.notifier.show(&e.user_message());
        }
    }
}

/// Puts the machine in `error` after a failed resolve or bind.
fn fail_load(player: &mut Player, e: PlaybackError) {
    error!(target: PLAYER_LOG_TARGET, "Failed to load track: {}", e);
    player.release_output();
    player.current_track = None;
    player.set_status(TransportStatus::Error);
    player.notifier.show(&e.user_message());
}
