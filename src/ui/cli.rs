//! Command-line interface implementation

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

use crate::config::Settings;
use crate::library::Track;
use crate::notify::NowPlaying;
use crate::player::{PlayerCommand, PlayerSnapshot, PlayerUpdate, RepeatMode, TransportStatus};

/// Command-line arguments for r-playdeck
#[derive(Parser, Debug)]
#[command(author, version, about = "Personal audio library player", long_about = None)]
pub struct Args {
    /// Track to start with; the whole catalog becomes the queue
    pub track_id: Option<String>,

    /// Explicit queue of track ids, comma separated
    #[arg(short, long, value_delimiter = ',', conflicts_with = "track_id")]
    pub queue: Vec<String>,

    /// Queue index to start at (with --queue)
    #[arg(short, long, default_value_t = 0)]
    pub start: usize,

    /// Library directory
    #[arg(short, long, env = "PLAYDECK_LIBRARY")]
    pub library: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, env = "PLAYDECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Start with shuffle on
    #[arg(long)]
    pub shuffle: bool,

    /// Initial repeat mode (off, all, one)
    #[arg(short, long)]
    pub repeat: Option<RepeatMode>,

    /// Emit logs as JSON
    #[arg(long, env = "PLAYDECK_JSON_LOGS")]
    pub json_logs: bool,
}

impl Args {
    /// Resolved config file location.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Settings::default_path)
    }

    /// Command-line values override the settings file.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(dir) = &self.library {
            settings.library_dir = dir.clone();
        }
        if self.shuffle {
            settings.shuffle = true;
        }
        if let Some(repeat) = self.repeat {
            settings.repeat = repeat;
        }
    }

    /// The command that starts playback, if the arguments ask for one.
    pub fn initial_command(&self) -> Option<PlayerCommand> {
        if !self.queue.is_empty() {
            return Some(PlayerCommand::PlayQueue {
                track_ids: self.queue.clone(),
                start_index: self.start,
            });
        }
        self.track_id
            .as_ref()
            .map(|id| PlayerCommand::PlayTrack { track_id: id.clone() })
    }
}

/// One line typed at the prompt.
#[derive(Debug)]
pub enum UserInput {
    Command(PlayerCommand),
    Recent,
    Status,
    Help,
    Quit,
}

/// Parses a prompt line.
pub fn parse_input(line: &str) -> Result<UserInput, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Err("empty input".to_string());
    };
    let arg = parts.next();

    let command = match (word.to_ascii_lowercase().as_str(), arg) {
        ("n" | "next", None) => PlayerCommand::Next,
        ("p" | "prev" | "previous", None) => PlayerCommand::Previous,
        ("t" | "toggle", None) => PlayerCommand::PlayPauseToggle,
        ("play", None) => PlayerCommand::Play,
        ("play", Some(id)) => PlayerCommand::PlayTrack { track_id: id.to_string() },
        ("pause", None) => PlayerCommand::Pause,
        ("seek", Some(secs)) => {
            let secs: f64 = secs.parse().map_err(|_| format!("invalid seconds '{}'", secs))?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(format!("invalid seconds '{}'", secs));
            }
            PlayerCommand::Seek { position_ms: (secs * 1000.0) as u64 }
        }
        ("s" | "shuffle", None) => PlayerCommand::ToggleShuffle,
        ("r", None) => PlayerCommand::CycleRepeat,
        ("repeat", None) => PlayerCommand::CycleRepeat,
        ("repeat", Some(mode)) => PlayerCommand::SetRepeat(mode.parse()?),
        ("stop", None) => PlayerCommand::Stop,
        ("c" | "clear", None) => PlayerCommand::ClearToast,
        ("recent", None) => return Ok(UserInput::Recent),
        ("status", None) => return Ok(UserInput::Status),
        ("h" | "help" | "?", None) => return Ok(UserInput::Help),
        ("q" | "quit", None) => return Ok(UserInput::Quit),
        (other, _) => return Err(format!("unknown command '{}' (type 'help')", other)),
    };
    Ok(UserInput::Command(command))
}

/// `m:ss`
pub fn format_time(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// One-line rendering of an update, or `None` for updates not worth printing.
pub fn format_update(update: &PlayerUpdate) -> Option<String> {
    match update {
        PlayerUpdate::TrackChanged(track) => Some(format!("Now playing: {} - {}", track.artist_name, track.title)),
        PlayerUpdate::Transport(t) => Some(format!(
            "[{}] shuffle: {} repeat: {}",
            t.status,
            if t.shuffle { "on" } else { "off" },
            t.repeat
        )),
        PlayerUpdate::Toast(Some(message)) => Some(format!("! {}", message)),
        PlayerUpdate::Toast(None) | PlayerUpdate::Progress { .. } | PlayerUpdate::QueueChanged { .. } => None,
    }
}

/// One-line summary of what the media session currently shows.
pub fn format_now_playing(now_playing: Option<&NowPlaying>, status: TransportStatus) -> String {
    match now_playing {
        Some(n) => format!("Media session: {} - {} [{}]", n.artist, n.title, status),
        None => format!("Media session: nothing loaded [{}]", status),
    }
}

/// CLI user interface for interacting with the application
pub struct Cli {
    pub args: Args,
}

impl Cli {
    /// Create a new CLI instance
    pub fn new() -> Self {
        Cli { args: Args::parse() }
    }

    /// Display a list of tracks
    pub fn display_tracks(&self, heading: &str, tracks: &[Track]) {
        println!("\n{}:", heading);
        if tracks.is_empty() {
            println!("  (none)");
            return;
        }
        println!("{:<5} {:<30} {:<20} {}", "#", "Title", "Artist", "ID");
        println!("{}", "-".repeat(80));
        for (index, track) in tracks.iter().enumerate() {
            let title = if track.title.len() > 28 {
                format!("{:.25}...", track.title)
            } else {
                track.title.clone()
            };
            println!("{:<5} {:<30} {:<20} {}", index + 1, title, track.artist_name, track.track_id);
        }
        println!();
    }

    /// Display the full player state
    pub fn display_status(&self, snapshot: &PlayerSnapshot) {
        let t = &snapshot.transport;
        match &snapshot.current_track {
            Some(track) => println!("{} - {}", track.artist_name, track.title),
            None => println!("Nothing loaded"),
        }
        println!(
            "[{}] {} / {}  shuffle: {}  repeat: {}",
            t.status,
            format_time(t.current_time_ms),
            format_time(t.duration_ms),
            if t.shuffle { "on" } else { "off" },
            t.repeat
        );
        match snapshot.queue_position {
            Some(position) => println!("Queue: {} of {}", position + 1, snapshot.queue_ids.len()),
            None => println!("Queue: empty"),
        }
        if let Some(toast) = &snapshot.toast {
            println!("! {}", toast);
        }
    }

    /// Display a player update, if it is worth a line
    pub fn display_update(&self, update: &PlayerUpdate) {
        if let Some(line) = format_update(update) {
            println!("{}", line);
        }
    }

    pub fn display_now_playing(&self, now_playing: Option<&NowPlaying>, status: TransportStatus) {
        println!("{}", format_now_playing(now_playing, status));
    }

    pub fn display_help(&self) {
        println!("Commands:");
        println!("  n | p            next / previous track");
        println!("  t | play | pause toggle, resume or pause output");
        println!("  seek <sec>       jump to a position");
        println!("  s                toggle shuffle");
        println!("  r | repeat <m>   cycle repeat, or set it to off/all/one");
        println!("  play <id>        play a track from the catalog");
        println!("  stop | c         stop output / dismiss the message");
        println!("  recent | status  recently played / current state");
        println!("  q                quit");
    }

    /// Display error messages
    pub fn display_error(&self, error: &dyn Error) {
        eprintln!("Error: {}", error);
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}
