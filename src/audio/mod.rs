//! Audio output: the sink contract, its lifecycle events and the clock-driven device.

mod clock_sink;
mod probe;
mod sink;

pub use clock_sink::{ClockSink, DeviceHandle, DEFAULT_TICK};
pub use probe::probe_duration_ms;
pub use sink::{
    AudioResource, AudioSink, SessionId, SinkEvent, SinkEventKind, SinkEventReceiver,
    SinkEventSender,
};
