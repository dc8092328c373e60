//! r-playdeck library core functionality

pub mod audio;
pub mod config;
pub mod error;
pub mod library;
pub mod notify;
pub mod player;
pub mod ui;

/// Initialize the application directories
pub fn init_app_dirs(settings: &config::Settings) -> std::io::Result<()> {
    let default_path = config::Settings::default_path();
    if let Some(config_dir) = default_path.parent() {
        std::fs::create_dir_all(config_dir)?;
    }
    std::fs::create_dir_all(&settings.library_dir)?;
    Ok(())
}
