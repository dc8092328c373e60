//! Container header probing. Reads stream parameters only; nothing is decoded.

use std::io::Cursor;

use bytes::Bytes;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::trace;

const LOG_TARGET: &str = "r_playdeck::audio::probe";

/// Probes the payload's container and returns its duration if the headers state one.
///
/// An error means the format wasn't recognised or the container has no audio track.
pub fn probe_duration_ms(data: &Bytes) -> Result<Option<u64>, String> {
    let source = MediaSourceStream::new(
        Box::new(Cursor::new(data.clone())),
        MediaSourceStreamOptions::default(),
    );
    let probed = symphonia::default::get_probe()
        .format(&Hint::new(), source, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| format!("unrecognised audio format: {}", e))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| "no audio track in container".to_string())?;
    let params = &track.codec_params;

    let duration_ms = match (params.n_frames, params.time_base, params.sample_rate) {
        (Some(frames), Some(time_base), _) => {
            let time = time_base.calc_time(frames);
            Some(time.seconds * 1000 + (time.frac * 1000.0) as u64)
        }
        (Some(frames), None, Some(rate)) if rate > 0 => Some(frames * 1000 / u64::from(rate)),
        _ => None,
    };
    trace!(target: LOG_TARGET, ?duration_ms, "Probed container headers.");
    Ok(duration_ms)
}
