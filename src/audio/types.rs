//! Command and shared-state types for the audio transport.

use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Point the media source at a new stream URL. The source is fetched,
    /// decoded and left paused at position zero.
    Load { url: String },
    /// Start or stop the current source without reloading it.
    SetPlaying(bool),
    /// Seek the current source to an absolute position.
    SeekTo(Duration),
    /// Drop the current source entirely (nothing selected anymore).
    Unload,
    /// Shut the transport thread down.
    Quit,
}

/// Transport-side playback state shared with the UI thread.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// Elapsed time in the current source.
    pub position: Duration,
    /// Real duration as reported by the decoder, once known.
    pub total: Option<Duration>,
    /// Whether the transport is actually producing audio. This is the
    /// transport's view, not the controller's intent.
    pub playing: bool,
    /// Incremented every time a source plays to its end. The event loop
    /// turns increments into auto-advance.
    pub ended: u64,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            position: Duration::ZERO,
            total: None,
            playing: false,
            ended: 0,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
