use r_playdeck::audio::ClockSink;
use r_playdeck::config::Settings;
use r_playdeck::init_app_dirs;
use r_playdeck::library::FsLibrary;
use r_playdeck::notify::ChannelMediaSession;
use r_playdeck::player::{Player, PlayerCommand, PlayerOptions, TrackResolver};
use r_playdeck::ui::{parse_input, Cli, UserInput};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "r_playdeck=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    // stdout belongs to the prompt.
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Parse command-line arguments and initialize CLI
    let cli = Arc::new(Cli::new());
    let args = &cli.args;
    init_tracing(args.json_logs);

    // Load configuration from file or defaults, then apply overrides
    let config_path = args.config_path();
    let mut settings = Settings::load(&config_path)?;
    args.apply_to(&mut settings);
    settings.validate()?;
    info!("Using config {} and library {}", config_path.display(), settings.library_dir.display());

    // Initialize application directories
    init_app_dirs(&settings)?;

    let library = Arc::new(FsLibrary::open(&settings.library_dir, settings.recents_limit).await?);
    let resolver = TrackResolver::from_library(library);
    let sink = ClockSink::new(StdDuration::from_millis(settings.progress_interval_ms));
    let (media_session, media_handle) = ChannelMediaSession::new();

    let (mut player, command_tx) = Player::new(
        resolver.clone(),
        Box::new(sink),
        Some(Box::new(media_session)),
        PlayerOptions::from(&settings),
    );
    let mut updates = player.subscribe_state_updates();
    let player_task = tokio::spawn(async move { player.run().await });

    // Print player updates as they happen
    let printer_cli = cli.clone();
    let printer = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => printer_cli.display_update(&update),
                Err(broadcast::error::RecvError::Lagged(n)) => debug!("Update printer lagged by {} updates.", n),
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    if let Some(command) = args.initial_command() {
        command_tx.send(command).await?;
    }

    cli.display_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_input(&line) {
            Ok(UserInput::Command(command)) => {
                if command_tx.send(command).await.is_err() {
                    error!("Player task is gone.");
                    break;
                }
            }
            Ok(UserInput::Status) => {
                let (tx, rx) = oneshot::channel();
                command_tx.send(PlayerCommand::GetFullState(tx)).await?;
                match rx.await {
                    Ok(snapshot) => cli.display_status(&snapshot),
                    Err(e) => cli.display_error(&e),
                }
                let status = *media_handle.status.borrow();
                cli.display_now_playing(media_handle.now_playing.borrow().as_ref(), status);
            }
            Ok(UserInput::Recent) => match resolver.recent_tracks().await {
                Ok(tracks) => cli.display_tracks("Recently played", &tracks),
                Err(e) => cli.display_error(&e),
            },
            Ok(UserInput::Help) => cli.display_help(),
            Ok(UserInput::Quit) => break,
            Err(message) => eprintln!("{}", message),
        }
    }

    info!("Shutting down.");
    if command_tx.send(PlayerCommand::Shutdown).await.is_err() {
        warn!("Player task already stopped.");
    }
    if let Err(e) = player_task.await {
        error!("Player task failed: {}", e);
    }
    printer.abort();
    Ok(())
}
