use std::time::Duration as StdDuration;

use tracing::{debug, error, info, instrument, trace, warn};

use super::state::{RepeatMode, TransportStatus};
use super::{playback_starter, Advance, Player, Retreat, PLAYER_LOG_TARGET};
use crate::audio::{SinkEvent, SinkEventKind};
use crate::error::PlaybackError;
use crate::library::TrackId;

#[instrument(skip(player))]
pub async fn handle_play_track(player: &mut Player, track_id: TrackId) {
    info!(target: PLAYER_LOG_TARGET, "Handling PlayTrack command for {}.", track_id);

    let ids = match player.resolver.catalog_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            error!(target: PLAYER_LOG_TARGET, "Failed to list catalog: {}", e);
            player.notifier.show(&e.user_message());
            return;
        }
    };

    match ids.iter().position(|id| *id == track_id) {
        Some(start_index) => handle_play_queue(player, ids, start_index).await,
        None => {
            warn!(target: PLAYER_LOG_TARGET, "PlayTrack: {} is not in the catalog.", track_id);
            player.notifier.show(&PlaybackError::NotFound(track_id).user_message());
        }
    }
}

#[instrument(skip(player, track_ids), fields(item_count = track_ids.len(), start_index = start_index))]
pub async fn handle_play_queue(player: &mut Player, track_ids: Vec<TrackId>, start_index: usize) {
    info!(target: PLAYER_LOG_TARGET, "Handling PlayQueue command with {} items, starting at index {}.", track_ids.len(), start_index);

    if let Err(e) = player.queue.set_queue(track_ids, start_index, player.transport.shuffle) {
        error!(target: PLAYER_LOG_TARGET, "PlayQueue rejected: {}", e);
        player.notifier.show(&e.user_message());
        return;
    }
    player.broadcast_queue();

    if player.queue.is_empty() {
        info!(target: PLAYER_LOG_TARGET, "PlayQueue: empty queue, stopping.");
        player.current_track = None;
        player.notifier.track_cleared();
        stop_output(player);
        return;
    }
    playback_starter::begin_load(player).await;
}

/// Toggles output of the bound resource. No-op with nothing bound.
#[instrument(skip(player))]
pub async fn handle_play_pause_toggle(player: &mut Player) {
    if !player.sink.is_bound() {
        trace!(target: PLAYER_LOG_TARGET, "PlayPauseToggle with no bound resource.");
        return;
    }
    if player.sink.is_paused() {
        handle_play(player).await;
    } else {
        handle_pause(player).await;
    }
}

#[instrument(skip(player))]
pub async fn handle_play(player: &mut Player) {
    if !player.sink.is_bound() {
        trace!(target: PLAYER_LOG_TARGET, "Play with no bound resource.");
        return;
    }
    info!(target: PLAYER_LOG_TARGET, "Handling Play command.");
    playback_starter::start_output(player).await;
}

#[instrument(skip(player))]
pub async fn handle_pause(player: &mut Player) {
    if !player.sink.is_bound() {
        trace!(target: PLAYER_LOG_TARGET, "Pause with no bound resource.");
        return;
    }
    info!(target: PLAYER_LOG_TARGET, "Handling Pause command.");
    player.sink.pause();
    if player.transport.status == TransportStatus::Playing {
        player.set_status(TransportStatus::Paused);
    }
}

#[instrument(skip(player))]
pub async fn handle_seek(player: &mut Player, position_ms: u64) {
    if !player.sink.is_bound() {
        trace!(target: PLAYER_LOG_TARGET, "Seek with no bound resource.");
        return;
    }
    player.sink.seek(position_ms);
    player.transport.current_time_ms = player.sink.position_ms();
    debug!(target: PLAYER_LOG_TARGET, requested = position_ms, applied = player.transport.current_time_ms, "Seek applied.");
}

#[instrument(skip(player))]
pub async fn handle_next(player: &mut Player) {
    info!(target: PLAYER_LOG_TARGET, "Handling Next command.");
    match player.queue.advance(player.transport.repeat, player.transport.shuffle) {
        Advance::Next(index) => {
            debug!(target: PLAYER_LOG_TARGET, index, "Advancing.");
            player.broadcast_queue();
            playback_starter::begin_load(player).await;
        }
        Advance::Ended => {
            info!(target: PLAYER_LOG_TARGET, "Next: end of queue reached.");
            player.supersede_load();
            if player.sink.is_bound() {
                player.sink.pause();
            }
            player.set_status(TransportStatus::Stopped);
        }
    }
}

#[instrument(skip(player), fields(elapsed_ms = player.transport.current_time_ms))]
pub async fn handle_previous(player: &mut Player) {
    info!(target: PLAYER_LOG_TARGET, "Handling Previous command.");
    if player.queue.is_empty() {
        debug!(target: PLAYER_LOG_TARGET, "Previous: queue empty.");
        return;
    }

    let elapsed = StdDuration::from_millis(player.transport.current_time_ms);
    match player.queue.retreat(player.transport.repeat, elapsed) {
        Retreat::Previous(index) => {
            debug!(target: PLAYER_LOG_TARGET, index, "Moving back.");
            player.broadcast_queue();
            playback_starter::begin_load(player).await;
        }
        Retreat::Restart if player.sink.is_bound() => {
            debug!(target: PLAYER_LOG_TARGET, "Restarting current track.");
            player.sink.seek(0);
            player.transport.current_time_ms = 0;
            player.notifier.broadcast(super::PlayerUpdate::Progress {
                position_ms: 0,
                duration_ms: player.transport.duration_ms,
            });
        }
        Retreat::Restart => {
            // Nothing bound (failed or stopped): reload the current track.
            playback_starter::begin_load(player).await;
        }
    }
}

#[instrument(skip(player))]
pub async fn handle_stop(player: &mut Player) {
    info!(target: PLAYER_LOG_TARGET, "Handling Stop command.");
    stop_output(player);
}

pub async fn handle_toggle_shuffle(player: &mut Player) {
    player.transport.shuffle = !player.transport.shuffle;
    info!(target: PLAYER_LOG_TARGET, shuffle = player.transport.shuffle, "Shuffle toggled.");
    player.notifier.transport_changed(player.transport);
}

pub async fn handle_set_repeat(player: &mut Player, mode: RepeatMode) {
    info!(target: PLAYER_LOG_TARGET, from = %player.transport.repeat, to = %mode, "Repeat mode set.");
    player.transport.repeat = mode;
    player.notifier.transport_changed(player.transport);
}

/// Stops output, cancels any in-flight load and keeps the queue.
fn stop_output(player: &mut Player) {
    player.supersede_load();
    player.release_output();
    player.set_status(TransportStatus::Stopped);
}

/// Single dispatch point for audio lifecycle notifications.
#[instrument(skip(player, event), fields(session = event.session))]
pub async fn handle_sink_event(player: &mut Player, event: SinkEvent) {
    if player.bound_session != Some(event.session) {
        trace!(target: PLAYER_LOG_TARGET, kind = ?event.kind, "Ignoring event from released session.");
        return;
    }

    match event.kind {
        SinkEventKind::Started => {
            if player.transport.status != TransportStatus::Playing {
                player.set_status(TransportStatus::Playing);
            }
        }
        SinkEventKind::Progress { current_ms } => {
            player.transport.current_time_ms = current_ms;
            player.notifier.broadcast(super::PlayerUpdate::Progress {
                position_ms: current_ms,
                duration_ms: player.transport.duration_ms,
            });
        }
        SinkEventKind::DurationKnown { duration_ms } => {
            debug!(target: PLAYER_LOG_TARGET, duration_ms, "Duration known.");
            player.transport.duration_ms = duration_ms;
            player.notifier.transport_changed(player.transport);
        }
        SinkEventKind::Stopped => {
            if player.transport.status == TransportStatus::Playing {
                player.set_status(TransportStatus::Paused);
            }
        }
        SinkEventKind::Ended => handle_track_ended(player).await,
        SinkEventKind::Failed(reason) => {
            let title = player
                .current_track
                .as_ref()
                .map(|t| t.title.clone())
                .unwrap_or_else(|| "unknown track".to_string());
            error!(target: PLAYER_LOG_TARGET, "Playback of {} failed: {}", title, reason);
            player.release_output();
            player.set_status(TransportStatus::Error);
            player.notifier.show(&format!("Playback error: {}", title));
        }
    }
}

#[instrument(skip(player), fields(repeat = %player.transport.repeat))]
async fn handle_track_ended(player: &mut Player) {
    info!(target: PLAYER_LOG_TARGET, "Track ended.");
    if player.transport.repeat == RepeatMode::One {
        player.sink.seek(0);
        player.transport.current_time_ms = 0;
        playback_starter::start_output(player).await;
    } else {
        handle_next(player).await;
    }
}
