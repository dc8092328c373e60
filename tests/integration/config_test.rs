//! Integration tests for configuration management
//!
//! These tests verify that the configuration system works correctly
//! across module boundaries.

use r_playdeck::config::Settings;
use r_playdeck::player::{PlayerOptions, RepeatMode};
use std::error::Error;
use std::time::Duration as StdDuration;
use tempfile::tempdir;

#[cfg(test)]
mod config_integration_tests {
    use super::*;

    /// Test complete configuration workflow
    #[test]
    fn test_config_lifecycle() -> Result<(), Box<dyn Error>> {
        let dir = tempdir()?;
        let config_path = dir.path().join("config.json");

        let settings = Settings {
            library_dir: dir.path().join("music"),
            restart_threshold_ms: 5000,
            shuffle_retry_limit: 3,
            repeat: RepeatMode::All,
            ..Settings::default()
        };
        settings.validate()?;
        settings.save(&config_path)?;

        let loaded = Settings::load(&config_path)?;
        assert_eq!(loaded, settings);

        // Test overriding settings
        let mut updated = loaded;
        updated.shuffle = true;
        updated.save(&config_path)?;
        assert!(Settings::load(&config_path)?.shuffle);

        Ok(())
    }

    /// Settings feed the player's construction options.
    #[test]
    fn test_settings_to_player_options() {
        let settings = Settings {
            toast_clear_ms: 1200,
            restart_threshold_ms: 4000,
            shuffle_retry_limit: 7,
            command_buffer_size: 8,
            shuffle: true,
            repeat: RepeatMode::One,
            ..Settings::default()
        };
        let options = PlayerOptions::from(&settings);

        assert_eq!(options.toast_clear_delay, StdDuration::from_millis(1200));
        assert_eq!(options.restart_threshold, StdDuration::from_millis(4000));
        assert_eq!(options.shuffle_retry_limit, 7);
        assert_eq!(options.command_buffer_size, 8);
        assert!(options.shuffle);
        assert_eq!(options.repeat, RepeatMode::One);
        assert_eq!(options.shuffle_seed, None);
    }

    /// Test invalid configuration handling
    #[test]
    fn test_invalid_config_validation() {
        let invalid = Settings {
            recents_limit: 0,
            ..Settings::default()
        };
        let result = invalid.validate();
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("recents_limit"));
        }

        let bad_repeat = r#"{ "repeat": "sometimes" }"#;
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, bad_repeat).unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
