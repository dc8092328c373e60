// src/player/run_loop.rs
use super::state::InternalEvent;
use super::{command_handler, playback_starter, Player, PlayerCommand, PLAYER_LOG_TARGET};
use tracing::{error, info, trace};

/// Runs the player's command processing loop.
pub async fn run_player_loop(player: &mut Player) {
    info!(target: PLAYER_LOG_TARGET, "Player run loop started.");

    loop {
        tokio::select! {
            biased; // Check commands first

            // --- Command Processing ---
            command = player.command_rx.recv() => {
                let Some(command) = command else {
                    info!(target: PLAYER_LOG_TARGET, "Command channel closed. Exiting run loop.");
                    break;
                };
                trace!(target: PLAYER_LOG_TARGET, "Received command: {:?}", command);
                if !dispatch_command(player, command).await {
                    break;
                }
            }

            // --- Resolve Results ---
            Some(event) = player.internal_rx.recv() => {
                match event {
                    InternalEvent::Resolved { generation, index, result } => {
                        playback_starter::on_resolved(player, generation, index, result).await;
                    }
                }
            }

            // --- Audio Lifecycle Events ---
            Some(event) = player.sink_rx.recv() => {
                trace!(target: PLAYER_LOG_TARGET, "Sink event: {:?}", event);
                command_handler::handle_sink_event(player, event).await;
            }

            // --- Toast Timers ---
            Some(ticket) = player.notifier.next_expired() => {
                player.notifier.expire(ticket);
            }
        }
    }

    info!(target: PLAYER_LOG_TARGET, "Player run loop finished. Performing final cleanup.");
    // 1. Ensure any in-flight load is cancelled
    player.supersede_load();
    // 2. Release the resource and shut the sink down
    player.release_output();
    match player.sink.shutdown().await {
        Ok(()) => info!(target: PLAYER_LOG_TARGET, "Audio sink shutdown successful."),
        Err(e) => error!(target: PLAYER_LOG_TARGET, "Error shutting down audio sink: {}", e),
    }
    info!(target: PLAYER_LOG_TARGET, "Player task cleanup complete.");
}

/// Returns false when the loop should exit.
async fn dispatch_command(player: &mut Player, command: PlayerCommand) -> bool {
    match command {
        PlayerCommand::PlayTrack { track_id } => command_handler::handle_play_track(player, track_id).await,
        PlayerCommand::PlayQueue { track_ids, start_index } => {
            command_handler::handle_play_queue(player, track_ids, start_index).await
        }
        PlayerCommand::PlayPauseToggle => command_handler::handle_play_pause_toggle(player).await,
        PlayerCommand::Play => command_handler::handle_play(player).await,
        PlayerCommand::Pause => command_handler::handle_pause(player).await,
        PlayerCommand::Seek { position_ms } => command_handler::handle_seek(player, position_ms).await,
        PlayerCommand::Next => command_handler::handle_next(player).await,
        PlayerCommand::Previous => command_handler::handle_previous(player).await,
        PlayerCommand::Stop => command_handler::handle_stop(player).await,
        PlayerCommand::ToggleShuffle => command_handler::handle_toggle_shuffle(player).await,
        PlayerCommand::CycleRepeat => {
            let mode = player.transport.repeat.cycled();
            command_handler::handle_set_repeat(player, mode).await
        }
        PlayerCommand::SetRepeat(mode) => command_handler::handle_set_repeat(player, mode).await,
        PlayerCommand::ClearToast => player.notifier.clear_toast(),
        PlayerCommand::GetFullState(responder) => {
            let _ = responder.send(player.snapshot()); // Ignore error if receiver dropped
        }
        PlayerCommand::Shutdown => {
            info!(target: PLAYER_LOG_TARGET, "Shutdown command received. Exiting run loop.");
            command_handler::handle_stop(player).await;
            return false;
        }
    }
    true
}
