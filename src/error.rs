//! Error taxonomy shared by the playback engine components.

use std::error::Error;
use std::fmt;

use crate::library::LibraryError;

/// Failures surfaced by the resolver, the audio sink and the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The identifier is absent from the catalog.
    NotFound(String),
    /// Metadata exists but the audio payload is missing or unreadable.
    ResourceUnavailable(String),
    /// The output device refused to start.
    PlaybackRejected(String),
    /// A caller asked for a queue position outside the queue.
    InvalidIndex { index: usize, len: usize },
}

impl PlaybackError {
    /// Short text suitable for the transient toast.
    pub fn user_message(&self) -> String {
        match self {
            PlaybackError::NotFound(_) => "Track not found".to_string(),
            PlaybackError::ResourceUnavailable(_) => "Audio file not found".to_string(),
            PlaybackError::PlaybackRejected(_) => "Could not start playback".to_string(),
            PlaybackError::InvalidIndex { .. } => "Could not start playback".to_string(),
        }
    }
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::NotFound(id) => write!(f, "Track not found: {}", id),
            PlaybackError::ResourceUnavailable(msg) => write!(f, "Audio resource unavailable: {}", msg),
            PlaybackError::PlaybackRejected(msg) => write!(f, "Playback rejected: {}", msg),
            PlaybackError::InvalidIndex { index, len } => {
                write!(f, "Invalid queue index {} for queue of length {}", index, len)
            }
        }
    }
}

impl Error for PlaybackError {}

// Catalog-level failures that reach the player are payload problems from the
// listener's point of view.
impl From<LibraryError> for PlaybackError {
    fn from(e: LibraryError) -> Self {
        match e {
            LibraryError::Missing(id) => PlaybackError::NotFound(id),
            other => PlaybackError::ResourceUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_error_display() {
        let not_found = PlaybackError::NotFound("t-1".to_string());
        let invalid = PlaybackError::InvalidIndex { index: 4, len: 3 };

        assert_eq!(format!("{}", not_found), "Track not found: t-1");
        assert_eq!(format!("{}", invalid), "Invalid queue index 4 for queue of length 3");
    }

    #[test]
    fn test_library_error_conversion() {
        let missing: PlaybackError = LibraryError::Missing("t-9".to_string()).into();
        assert_eq!(missing, PlaybackError::NotFound("t-9".to_string()));

        let parse: PlaybackError = LibraryError::Parse("bad json".to_string()).into();
        assert!(matches!(parse, PlaybackError::ResourceUnavailable(_)));
    }

    #[test]
    fn test_user_messages_are_short() {
        assert_eq!(PlaybackError::NotFound("x".into()).user_message(), "Track not found");
        assert_eq!(
            PlaybackError::ResourceUnavailable("x".into()).user_message(),
            "Audio file not found"
        );
    }
}
