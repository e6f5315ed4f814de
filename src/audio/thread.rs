use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};

use crate::api::ApiClient;

use super::source::{StreamBytes, create_sink_at};
use super::types::{AudioCmd, PlaybackHandle};

const TICK: Duration = Duration::from_millis(250);

pub(super) fn spawn_audio_thread(
    api: ApiClient,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                // No output device: keep draining commands so senders never
                // block, but nothing will ever play.
                log::error!("no audio output device: {e}");
                while let Ok(cmd) = rx.recv() {
                    if matches!(cmd, AudioCmd::Quit) {
                        break;
                    }
                }
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful
        // in debugging, but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let mut bytes: Option<StreamBytes> = None;
        let mut sink: Option<Sink> = None;
        let mut paused = true;

        // Ticker thread advancing the shared elapsed time while playing.
        let info_for_ticker = playback_info.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(TICK);
                let Ok(mut info) = info_for_ticker.lock() else {
                    break;
                };
                if info.playing {
                    info.position += TICK;
                }
            }
        });

        let set_info = |position: Option<Duration>,
                        total: Option<Option<Duration>>,
                        playing: Option<bool>| {
            if let Ok(mut info) = playback_info.lock() {
                if let Some(p) = position {
                    info.position = p;
                }
                if let Some(t) = total {
                    info.total = t;
                }
                if let Some(pl) = playing {
                    info.playing = pl;
                }
            }
        };

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(AudioCmd::Load { url }) => {
                    // Replace whatever is loaded. Failures are logged and
                    // leave the transport idle; the controller keeps its
                    // optimistic play intent.
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    paused = true;
                    // Clear the shared state before the fetch so progress
                    // reads never mix the old track's position or duration
                    // into the new selection.
                    set_info(Some(Duration::ZERO), Some(None), Some(false));

                    let fetched = match api.fetch_bytes(&url) {
                        Ok(b) => StreamBytes::new(b),
                        Err(e) => {
                            log::warn!("failed to fetch stream {url}: {e}");
                            bytes = None;
                            continue;
                        }
                    };
                    log::debug!("loaded {} bytes from {url}", fetched.len());

                    match create_sink_at(&stream, fetched.clone(), Duration::ZERO) {
                        Ok((new_sink, total)) => {
                            bytes = Some(fetched);
                            sink = Some(new_sink);
                            set_info(None, Some(total), None);
                        }
                        Err(e) => {
                            log::warn!("failed to decode stream {url}: {e}");
                            bytes = None;
                        }
                    }
                }

                Ok(AudioCmd::SetPlaying(true)) => {
                    // Resume may arrive right after a track played to its
                    // end; rebuild from the retained bytes in that case.
                    if sink.is_none()
                        && let Some(b) = bytes.clone()
                    {
                        match create_sink_at(&stream, b, Duration::ZERO) {
                            Ok((new_sink, _)) => sink = Some(new_sink),
                            Err(e) => log::warn!("failed to rebuild source: {e}"),
                        }
                        set_info(Some(Duration::ZERO), None, None);
                    }

                    match sink.as_ref() {
                        Some(s) => {
                            s.play();
                            paused = false;
                            set_info(None, None, Some(true));
                        }
                        // The accepted inconsistency window: the controller
                        // stays "playing" while nothing is loaded.
                        None => log::warn!("play requested with no source loaded"),
                    }
                }

                Ok(AudioCmd::SetPlaying(false)) => {
                    if let Some(s) = sink.as_ref() {
                        s.pause();
                    }
                    paused = true;
                    set_info(None, None, Some(false));
                }

                Ok(AudioCmd::SeekTo(pos)) => {
                    // Scrubbing: rebuild the sink and skip into the stream.
                    let Some(b) = bytes.clone() else {
                        continue;
                    };
                    if let Some(s) = sink.take() {
                        s.stop();
                    }

                    match create_sink_at(&stream, b, pos) {
                        Ok((new_sink, _)) => {
                            if !paused {
                                new_sink.play();
                            }
                            sink = Some(new_sink);
                            set_info(Some(pos), None, None);
                        }
                        Err(e) => log::warn!("failed to seek: {e}"),
                    }
                }

                Ok(AudioCmd::Unload) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    bytes = None;
                    paused = true;
                    set_info(Some(Duration::ZERO), Some(None), Some(false));
                }

                Ok(AudioCmd::Quit) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    set_info(None, None, Some(false));
                    break;
                }

                Err(RecvTimeoutError::Timeout) => {
                    // Periodic check for end-of-track. The bytes are kept so
                    // an immediate re-selection can restart without a fetch.
                    let finished = sink.as_ref().is_some_and(|s| !paused && s.empty());
                    if finished {
                        sink = None;
                        paused = true;
                        if let Ok(mut info) = playback_info.lock() {
                            info.position = Duration::ZERO;
                            info.playing = false;
                            info.ended += 1;
                        }
                    }
                }

                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
