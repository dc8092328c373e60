//! Tests for the command-line interface

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::Settings;
    use crate::library::Track;
    use crate::notify::NowPlaying;
    use crate::player::{PlayerCommand, PlayerSnapshot, PlayerUpdate, RepeatMode, TransportState, TransportStatus};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_args_parsing() {
        use clap::CommandFactory;
        let app = Args::command();
        app.debug_assert();
    }

    #[test]
    fn test_args_queue_and_overrides() {
        let args = Args::try_parse_from([
            "r-playdeck", "--queue", "a,b,c", "--start", "2", "--library", "/tmp/lib", "--shuffle", "--repeat", "all",
        ])
        .unwrap();

        assert_eq!(args.queue, vec!["a", "b", "c"]);
        match args.initial_command() {
            Some(PlayerCommand::PlayQueue { track_ids, start_index }) => {
                assert_eq!(track_ids.len(), 3);
                assert_eq!(start_index, 2);
            }
            other => panic!("unexpected initial command: {:?}", other),
        }

        let mut settings = Settings::default();
        args.apply_to(&mut settings);
        assert_eq!(settings.library_dir, PathBuf::from("/tmp/lib"));
        assert!(settings.shuffle);
        assert_eq!(settings.repeat, RepeatMode::All);
    }

    #[test]
    fn test_args_single_track() {
        let args = Args::try_parse_from(["r-playdeck", "t-42"]).unwrap();
        assert!(matches!(
            args.initial_command(),
            Some(PlayerCommand::PlayTrack { track_id }) if track_id == "t-42"
        ));

        let none = Args::try_parse_from(["r-playdeck"]).unwrap();
        assert!(none.initial_command().is_none());
        assert!(Args::try_parse_from(["r-playdeck", "--repeat", "twice"]).is_err());
    }

    #[test]
    fn test_parse_input() {
        assert!(matches!(parse_input("n"), Ok(UserInput::Command(PlayerCommand::Next))));
        assert!(matches!(parse_input("  p "), Ok(UserInput::Command(PlayerCommand::Previous))));
        assert!(matches!(parse_input("t"), Ok(UserInput::Command(PlayerCommand::PlayPauseToggle))));
        assert!(matches!(parse_input("play"), Ok(UserInput::Command(PlayerCommand::Play))));
        assert!(matches!(
            parse_input("play abc"),
            Ok(UserInput::Command(PlayerCommand::PlayTrack { track_id })) if track_id == "abc"
        ));
        assert!(matches!(
            parse_input("seek 12.5"),
            Ok(UserInput::Command(PlayerCommand::Seek { position_ms: 12_500 }))
        ));
        assert!(matches!(
            parse_input("repeat one"),
            Ok(UserInput::Command(PlayerCommand::SetRepeat(RepeatMode::One)))
        ));
        assert!(matches!(parse_input("r"), Ok(UserInput::Command(PlayerCommand::CycleRepeat))));
        assert!(matches!(parse_input("recent"), Ok(UserInput::Recent)));
        assert!(matches!(parse_input("q"), Ok(UserInput::Quit)));

        assert!(parse_input("").is_err());
        assert!(parse_input("seek -3").is_err());
        assert!(parse_input("seek soon").is_err());
        assert!(parse_input("repeat sometimes").is_err());
        assert!(parse_input("dance").is_err());
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(61_999), "1:01");

        let track = Track::new("t1", "So What", "Miles Davis");
        assert_eq!(
            format_update(&PlayerUpdate::TrackChanged(track)).as_deref(),
            Some("Now playing: Miles Davis - So What")
        );
        assert_eq!(format_update(&PlayerUpdate::Toast(None)), None);
        assert_eq!(
            format_update(&PlayerUpdate::Transport(TransportState {
                status: TransportStatus::Paused,
                repeat: RepeatMode::One,
                ..TransportState::default()
            }))
            .as_deref(),
            Some("[paused] shuffle: off repeat: one")
        );
    }

    #[test]
    fn test_format_now_playing() {
        let track = Track::new("t1", "So What", "Miles Davis");
        let now_playing = NowPlaying::from(&track);
        assert_eq!(
            format_now_playing(Some(&now_playing), TransportStatus::Playing),
            "Media session: Miles Davis - So What [playing]"
        );
        assert_eq!(
            format_now_playing(None, TransportStatus::Stopped),
            "Media session: nothing loaded [stopped]"
        );
    }

    #[test]
    fn test_display_functions() {
        let cli = Cli {
            args: Args::try_parse_from(["r-playdeck"]).unwrap(),
        };
        let tracks = vec![
            Track::new("t1", "A very long title that will be shortened", "Someone"),
            Track::new("t2", "Short", "Someone Else"),
        ];
        cli.display_tracks("Recently played", &tracks);
        cli.display_tracks("Recently played", &[]);
        cli.display_status(&PlayerSnapshot {
            transport: TransportState::default(),
            queue_ids: Vec::new(),
            queue_position: None,
            current_track: None,
            toast: Some("Track not found".to_string()),
        });
        cli.display_help();
        cli.display_update(&PlayerUpdate::Toast(Some("Audio file not found".to_string())));
        cli.display_now_playing(None, TransportStatus::Idle);

        let error = std::io::Error::new(std::io::ErrorKind::Other, "Test error");
        cli.display_error(&error);
    }
}
