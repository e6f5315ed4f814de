//! Helpers for creating `rodio` sinks from fetched stream bytes.
//!
//! The transport keeps the current track's bytes around so seeks can
//! rebuild the sink without refetching from the server.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

/// Shared, decodable copy of a fetched audio stream.
#[derive(Debug, Clone)]
pub(super) struct StreamBytes(Arc<Vec<u8>>);

impl StreamBytes {
    pub(super) fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }

    pub(super) fn len(&self) -> usize {
        self.0.len()
    }
}

impl AsRef<[u8]> for StreamBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

/// Create a paused `Sink` over `bytes` starting at `start_at`, along with
/// the decoder-reported total duration (when the format carries one).
pub(super) fn create_sink_at(
    handle: &OutputStream,
    bytes: StreamBytes,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), rodio::decoder::DecoderError> {
    let decoder = Decoder::new(Cursor::new(bytes))?;
    let total = decoder.total_duration();

    // `skip_duration` is the seeking primitive; Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
