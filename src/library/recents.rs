//! Bounded, most-recent-first list of played track identifiers.

use std::collections::VecDeque;

use super::models::TrackId;

pub const DEFAULT_RECENTS_LIMIT: usize = 50;

/// Recently played identifiers, front = most recent.
///
/// Each identifier appears at most once; pushing an identifier already in the
/// list moves it to the front. Entries past `limit` are dropped from the back.
#[derive(Debug, Clone)]
pub struct Recents {
    entries: VecDeque<TrackId>,
    limit: usize,
}

impl Recents {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Rebuilds a list from persisted entries, enforcing uniqueness and the cap.
    pub fn from_entries(entries: Vec<TrackId>, limit: usize) -> Self {
        let mut recents = Self::new(limit);
        // Oldest first so the persisted head ends up at the front.
        for id in entries.into_iter().rev() {
            recents.push(id);
        }
        recents
    }

    pub fn push(&mut self, track_id: TrackId) {
        self.entries.retain(|id| *id != track_id);
        self.entries.push_front(track_id);
        self.entries.truncate(self.limit);
    }

    pub fn to_vec(&self) -> Vec<TrackId> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for Recents {
    fn default() -> Self {
        Self::new(DEFAULT_RECENTS_LIMIT)
    }
}
