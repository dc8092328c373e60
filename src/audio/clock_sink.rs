//! `ClockSink`: an output that renders a bound resource against a wall clock.
//!
//! Playback position advances in real time while playing and lifecycle events
//! are pushed to the player. Stream parameters come from the container headers
//! (see [`probe`](super::probe)); samples are never decoded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace, warn};

use super::probe::probe_duration_ms;
use super::sink::{AudioResource, AudioSink, SessionId, SinkEvent, SinkEventKind, SinkEventSender};
use crate::error::PlaybackError;

const LOG_TARGET: &str = "r_playdeck::audio::clock_sink";

pub const DEFAULT_TICK: StdDuration = StdDuration::from_millis(250);

/// Shared availability flag for the output device.
///
/// While unavailable, `play()` is refused with `PlaybackRejected`.
#[derive(Debug, Clone)]
pub struct DeviceHandle {
    available: Arc<AtomicBool>,
}

impl DeviceHandle {
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
struct Clock {
    position_ms: u64,
    duration_ms: Option<u64>,
    paused: bool,
}

struct BoundSession {
    id: SessionId,
    track_id: String,
    clock: Arc<Mutex<Clock>>,
    ticker: Option<JoinHandle<()>>,
    // Set when the payload could not be recognised; reported on the first play().
    unplayable: Option<String>,
}

impl BoundSession {
    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

pub struct ClockSink {
    events: Option<SinkEventSender>,
    tick: StdDuration,
    next_session: SessionId,
    bound: Option<BoundSession>,
    device: DeviceHandle,
}

impl ClockSink {
    pub fn new(tick: StdDuration) -> Self {
        info!(target: LOG_TARGET, "Creating clock sink with {:?} tick.", tick);
        Self {
            events: None,
            tick: tick.max(StdDuration::from_millis(1)),
            next_session: 1,
            bound: None,
            device: DeviceHandle {
                available: Arc::new(AtomicBool::new(true)),
            },
        }
    }

    pub fn device_handle(&self) -> DeviceHandle {
        self.device.clone()
    }

    fn emit(&self, session: SessionId, kind: SinkEventKind) {
        if let Some(tx) = &self.events {
            if tx.send(SinkEvent { session, kind }).is_err() {
                trace!(target: LOG_TARGET, session, "No listener for sink event.");
            }
        }
    }

    fn spawn_ticker(&self, session: SessionId, clock: Arc<Mutex<Clock>>) -> Option<JoinHandle<()>> {
        let events = self.events.clone()?;
        let tick = self.tick;
        let tick_ms = tick.as_millis() as u64;
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + tick, tick);
            loop {
                interval.tick().await;
                let (current_ms, ended) = {
                    let Ok(mut clock) = clock.lock() else { return };
                    if clock.paused {
                        return;
                    }
                    clock.position_ms = clock.position_ms.saturating_add(tick_ms);
                    let ended = match clock.duration_ms {
                        Some(duration) if clock.position_ms >= duration => {
                            clock.position_ms = duration;
                            clock.paused = true;
                            true
                        }
                        _ => false,
                    };
                    (clock.position_ms, ended)
                };

                let progress = SinkEvent { session, kind: SinkEventKind::Progress { current_ms } };
                if events.send(progress).is_err() {
                    return;
                }
                if ended {
                    let _ = events.send(SinkEvent { session, kind: SinkEventKind::Ended });
                    return;
                }
            }
        }))
    }
}

impl Default for ClockSink {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}

impl Drop for ClockSink {
    fn drop(&mut self) {
        if let Some(bound) = self.bound.as_mut() {
            bound.stop_ticker();
        }
    }
}

#[async_trait]
impl AudioSink for ClockSink {
    fn attach_events(&mut self, events: SinkEventSender) {
        debug!(target: LOG_TARGET, "Sink event channel attached.");
        self.events = Some(events);
    }

    #[instrument(skip(self, resource), fields(track_id = %resource.track_id()))]
    fn load(&mut self, resource: AudioResource) -> Result<SessionId, PlaybackError> {
        if resource.is_empty() {
            warn!(target: LOG_TARGET, "Refusing to bind an empty resource.");
            return Err(PlaybackError::ResourceUnavailable(format!(
                "no audio data for {}",
                resource.track_id()
            )));
        }

        self.release();

        let (duration_ms, unplayable) = match probe_duration_ms(resource.data()) {
            Ok(probed) => (probed.or(resource.duration_hint_ms()), None),
            // A known catalog duration does not make an unreadable payload playable.
            Err(reason) => {
                warn!(target: LOG_TARGET, "Payload probe failed: {}", reason);
                (resource.duration_hint_ms(), Some(reason))
            }
        };

        let id = self.next_session;
        self.next_session += 1;
        let clock = Clock {
            position_ms: 0,
            duration_ms,
            paused: true,
        };
        self.bound = Some(BoundSession {
            id,
            track_id: resource.track_id().to_string(),
            clock: Arc::new(Mutex::new(clock)),
            ticker: None,
            unplayable,
        });
        info!(target: LOG_TARGET, session = id, ?duration_ms, "Resource bound.");

        if let Some(duration_ms) = duration_ms {
            self.emit(id, SinkEventKind::DurationKnown { duration_ms });
        }
        Ok(id)
    }

    async fn play(&mut self) -> Result<(), PlaybackError> {
        // Activation completes asynchronously on a real device.
        tokio::task::yield_now().await;

        let Some(bound) = self.bound.as_ref() else {
            trace!(target: LOG_TARGET, "play() with no bound resource.");
            return Ok(());
        };
        if !self.device.is_available() {
            warn!(target: LOG_TARGET, session = bound.id, "Output device refused activation.");
            return Err(PlaybackError::PlaybackRejected("output device unavailable".to_string()));
        }

        let session = bound.id;
        let clock = bound.clock.clone();
        {
            let Ok(mut guard) = clock.lock() else {
                return Err(PlaybackError::PlaybackRejected("sink clock poisoned".to_string()));
            };
            if !guard.paused {
                return Ok(());
            }
            if let Some(duration) = guard.duration_ms {
                if guard.position_ms >= duration {
                    guard.position_ms = 0;
                }
            }
            guard.paused = false;
        }

        self.emit(session, SinkEventKind::Started);
        if let Some(reason) = bound.unplayable.clone() {
            if let Ok(mut guard) = clock.lock() {
                guard.paused = true;
            }
            self.emit(session, SinkEventKind::Failed(reason));
            return Ok(());
        }

        let ticker = self.spawn_ticker(session, clock);
        if let Some(bound) = self.bound.as_mut() {
            bound.stop_ticker();
            bound.ticker = ticker;
            debug!(target: LOG_TARGET, session, track_id = %bound.track_id, "Output started.");
        }
        Ok(())
    }

    fn pause(&mut self) {
        let Some(bound) = self.bound.as_mut() else { return };
        let was_playing = match bound.clock.lock() {
            Ok(mut clock) => !std::mem::replace(&mut clock.paused, true),
            Err(_) => false,
        };
        bound.stop_ticker();
        if was_playing {
            let session = bound.id;
            debug!(target: LOG_TARGET, session, "Output paused.");
            self.emit(session, SinkEventKind::Stopped);
        }
    }

    fn seek(&mut self, time_ms: u64) {
        let Some(bound) = self.bound.as_ref() else { return };
        let clamped = match bound.clock.lock() {
            Ok(mut clock) => {
                let clamped = clock.duration_ms.map_or(time_ms, |d| time_ms.min(d));
                clock.position_ms = clamped;
                clamped
            }
            Err(_) => return,
        };
        let session = bound.id;
        debug!(target: LOG_TARGET, session, requested = time_ms, clamped, "Seek.");
        self.emit(session, SinkEventKind::Progress { current_ms: clamped });
    }

    fn release(&mut self) {
        let Some(mut bound) = self.bound.take() else { return };
        bound.stop_ticker();
        let was_playing = bound.clock.lock().map(|c| !c.paused).unwrap_or(false);
        info!(target: LOG_TARGET, session = bound.id, "Releasing bound resource.");
        if was_playing {
            self.emit(bound.id, SinkEventKind::Stopped);
        }
    }

    fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    fn is_paused(&self) -> bool {
        self.bound
            .as_ref()
            .and_then(|b| b.clock.lock().ok().map(|c| c.paused))
            .unwrap_or(true)
    }

    fn position_ms(&self) -> u64 {
        self.bound
            .as_ref()
            .and_then(|b| b.clock.lock().ok().map(|c| c.position_ms))
            .unwrap_or(0)
    }

    async fn shutdown(&mut self) -> Result<(), PlaybackError> {
        info!(target: LOG_TARGET, "Shutting down clock sink.");
        self.release();
        self.events = None;
        Ok(())
    }
}
