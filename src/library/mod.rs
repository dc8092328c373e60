//! Library collaborators consumed by the playback engine: the track catalog,
//! the audio payload store and the recently played ledger.

mod catalog;
mod error;
mod fs;
mod memory;
pub mod models;
mod recents;

pub use catalog::{AudioStore, RecentsLedger, TrackCatalog};
pub use error::LibraryError;
pub use fs::FsLibrary;
pub use memory::MemoryLibrary;
pub use models::{Track, TrackId};
pub use recents::{Recents, DEFAULT_RECENTS_LIMIT};
