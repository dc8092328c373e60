//! Ordered playback sequence and position under shuffle and repeat policy.

use std::time::Duration as StdDuration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use super::state::RepeatMode;
use super::PLAYER_LOG_TARGET;
use crate::error::PlaybackError;
use crate::library::TrackId;

pub const DEFAULT_SHUFFLE_RETRY_LIMIT: u32 = 10;
pub const DEFAULT_RESTART_THRESHOLD: StdDuration = StdDuration::from_millis(3000);

/// Outcome of moving forward in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(usize),
    /// Queue exhausted; the position did not move.
    Ended,
}

/// Outcome of moving backward in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    Previous(usize),
    /// Restart the current track from zero; the position did not move.
    Restart,
}

/// Owns the queue of track identifiers and the current position.
///
/// Invariant: `position` is `Some(i)` with `i < ids.len()` for a non-empty
/// queue and `None` for an empty one.
pub struct QueueManager {
    ids: Vec<TrackId>,
    position: Option<usize>,
    rng: StdRng,
    shuffle_retry_limit: u32,
    restart_threshold: StdDuration,
}

impl QueueManager {
    pub fn new(shuffle_retry_limit: u32, restart_threshold: StdDuration) -> Self {
        Self::with_rng(StdRng::from_entropy(), shuffle_retry_limit, restart_threshold)
    }

    /// Deterministic shuffle order, for reproducible tests.
    pub fn with_seed(seed: u64, shuffle_retry_limit: u32, restart_threshold: StdDuration) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), shuffle_retry_limit, restart_threshold)
    }

    fn with_rng(rng: StdRng, shuffle_retry_limit: u32, restart_threshold: StdDuration) -> Self {
        Self {
            ids: Vec::new(),
            position: None,
            rng,
            shuffle_retry_limit: shuffle_retry_limit.max(1),
            restart_threshold,
        }
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn current_id(&self) -> Option<&TrackId> {
        self.position.and_then(|p| self.ids.get(p))
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.position = None;
    }

    /// Replaces the queue and position. On error nothing changes.
    ///
    /// With `shuffle`, the track at `start_index` is pinned to the front, the
    /// rest is permuted (Fisher-Yates) and the position becomes 0.
    pub fn set_queue(&mut self, mut ids: Vec<TrackId>, start_index: usize, shuffle: bool) -> Result<(), PlaybackError> {
        if ids.is_empty() {
            debug!(target: PLAYER_LOG_TARGET, "Queue set to empty.");
            self.clear();
            return Ok(());
        }
        if start_index >= ids.len() {
            return Err(PlaybackError::InvalidIndex { index: start_index, len: ids.len() });
        }

        let position = if shuffle {
            let pinned = ids.remove(start_index);
            ids.shuffle(&mut self.rng);
            ids.insert(0, pinned);
            0
        } else {
            start_index
        };

        debug!(target: PLAYER_LOG_TARGET, len = ids.len(), position, shuffle, "Queue replaced.");
        self.ids = ids;
        self.position = Some(position);
        Ok(())
    }

    /// Moves to the next position.
    pub fn advance(&mut self, repeat: RepeatMode, shuffle: bool) -> Advance {
        let Some(current) = self.position else {
            return Advance::Ended;
        };
        let len = self.ids.len();

        let next = if shuffle {
            let mut candidate = current;
            if len > 1 {
                for attempt in 1..=self.shuffle_retry_limit {
                    candidate = self.rng.gen_range(0..len);
                    if candidate != current {
                        break;
                    }
                    trace!(target: PLAYER_LOG_TARGET, attempt, "Shuffle picked the current track, retrying.");
                }
            }
            candidate
        } else if current + 1 < len {
            current + 1
        } else if repeat == RepeatMode::All {
            0
        } else {
            return Advance::Ended;
        };

        self.position = Some(next);
        Advance::Next(next)
    }

    /// Moves to the previous position, or asks for a restart of the current track.
    ///
    /// `elapsed` is how far into the current track playback is; past the restart
    /// threshold the answer is always `Restart`.
    pub fn retreat(&mut self, repeat: RepeatMode, elapsed: StdDuration) -> Retreat {
        let Some(current) = self.position else {
            return Retreat::Restart;
        };
        if elapsed > self.restart_threshold {
            return Retreat::Restart;
        }

        let previous = if current > 0 {
            current - 1
        } else if repeat == RepeatMode::All {
            self.ids.len() - 1
        } else {
            return Retreat::Restart;
        };

        self.position = Some(previous);
        Retreat::Previous(previous)
    }
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new(DEFAULT_SHUFFLE_RETRY_LIMIT, DEFAULT_RESTART_THRESHOLD)
    }
}
