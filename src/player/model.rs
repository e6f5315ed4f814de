use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::api::{ApiClient, Track};
use crate::audio::AudioCmd;

/// Playback state machine.
///
/// Invariants:
/// - `current == None` implies `playing == false` and no media source is
///   attached.
/// - `current` is `None` or a valid index into the library snapshot the
///   operations were called with.
/// - `duration` holds the track's catalog duration until the transport
///   reports the real one through [`Player::report_progress`].
///
/// Index changes reload the media source (stream URL resolved through the
/// API client); flag-only changes start/stop the transport without a
/// reload. That split is what keeps pause/resume glitch-free.
pub struct Player {
    tx: Sender<AudioCmd>,
    api: ApiClient,
    current: Option<usize>,
    playing: bool,
    position: f64,
    duration: f64,
}

impl Player {
    pub fn new(tx: Sender<AudioCmd>, api: ApiClient) -> Self {
        Self {
            tx,
            api,
            current: None,
            playing: false,
            position: 0.0,
            duration: 0.0,
        }
    }

    /// Index of the current track, if any.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// The play intent. Kept optimistic even when the transport rejects a
    /// play request; there is no reliable signal to distinguish "paused by
    /// the user" from "blocked by the platform".
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Elapsed seconds in the current track.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Total seconds: catalog duration until the real one is known.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn current_track<'a>(&self, tracks: &'a [Track]) -> Option<&'a Track> {
        self.current.and_then(|i| tracks.get(i))
    }

    /// Progress through the current track, clamped to `[0, 1]`; 0 while the
    /// duration is unknown or zero.
    pub fn progress_fraction(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.position / self.duration).clamp(0.0, 1.0)
    }

    /// Row-click semantics: re-selecting the playing track pauses it;
    /// anything else selects and plays.
    pub fn select_and_toggle(&mut self, index: usize, tracks: &[Track]) {
        self.select(index, tracks, false);
    }

    /// Flip play/pause for the current track. No-op with nothing selected.
    pub fn toggle_play_pause(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.playing = !self.playing;
        let _ = self.tx.send(AudioCmd::SetPlaying(self.playing));
    }

    /// Select the previous track, wrapping from the first to the last.
    /// Always plays; never toggle-pauses. No-op on an empty library.
    pub fn previous(&mut self, tracks: &[Track]) {
        if tracks.is_empty() {
            return;
        }
        let target = match self.current {
            Some(i) if i > 0 => i - 1,
            _ => tracks.len() - 1,
        };
        self.select(target, tracks, true);
    }

    /// Select the next track, wrapping from the last to the first.
    /// Always plays; never toggle-pauses. No-op on an empty library.
    pub fn next(&mut self, tracks: &[Track]) {
        if tracks.is_empty() {
            return;
        }
        let target = match self.current {
            Some(i) if i + 1 < tracks.len() => i + 1,
            _ => 0,
        };
        self.select(target, tracks, true);
    }

    /// Per-tick progress report from the transport. A positive finite
    /// `media_duration` is authoritative and overwrites the catalog value.
    pub fn report_progress(&mut self, time: f64, media_duration: f64) {
        self.position = time;
        if media_duration.is_finite() && media_duration > 0.0 {
            self.duration = media_duration;
        }
    }

    /// Jump to an absolute position in the current track.
    pub fn seek(&mut self, time: f64) {
        if self.current.is_none() {
            return;
        }
        let time = if self.duration > 0.0 {
            time.clamp(0.0, self.duration)
        } else {
            time.max(0.0)
        };
        self.position = time;
        let _ = self.tx.send(AudioCmd::SeekTo(Duration::from_secs_f64(time)));
    }

    /// Scrub relative to the current position (progress-bar arrow keys).
    pub fn seek_by(&mut self, delta: f64) {
        self.seek(self.position + delta);
    }

    /// The current track played to its end: auto-advance with wraparound,
    /// never stopping at the end of the library.
    pub fn on_track_ended(&mut self, tracks: &[Track]) {
        self.next(tracks);
    }

    /// Detach playback entirely (current track deleted, or the library
    /// shrank underneath the playing index).
    pub fn stop(&mut self) {
        self.current = None;
        self.playing = false;
        self.position = 0.0;
        self.duration = 0.0;
        let _ = self.tx.send(AudioCmd::Unload);
    }

    fn select(&mut self, index: usize, tracks: &[Track], force_play: bool) {
        // Defensive: the UI can't produce an out-of-range index, but a
        // stale event could.
        let Some(track) = tracks.get(index) else {
            log::debug!("ignoring selection of out-of-range index {index}");
            return;
        };

        if self.current == Some(index) && self.playing && !force_play {
            self.playing = false;
            let _ = self.tx.send(AudioCmd::SetPlaying(false));
            return;
        }

        let reload = self.current != Some(index);
        let restart = !reload && force_play;

        self.current = Some(index);
        self.position = 0.0;
        self.duration = track.duration as f64;
        self.playing = true;

        if reload {
            let _ = self.tx.send(AudioCmd::Load {
                url: self.api.audio_url(track.id),
            });
        } else if restart {
            // Forced re-selection of the current track (wraparound on a
            // one-track library): restart from the top, no reload.
            let _ = self.tx.send(AudioCmd::SeekTo(Duration::ZERO));
        }
        let _ = self.tx.send(AudioCmd::SetPlaying(true));
    }
}
