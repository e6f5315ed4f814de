use crate::app::App;
use crate::mpris::{MprisHandle, PlaybackStatus};

pub fn playback_status(app: &App) -> PlaybackStatus {
    match (app.player.current(), app.player.is_playing()) {
        (None, _) => PlaybackStatus::Stopped,
        (Some(_), true) => PlaybackStatus::Playing,
        (Some(_), false) => PlaybackStatus::Paused,
    }
}

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let index = app.player.current();
    let track = app.player.current_track(&app.tracks);
    mpris.set_track_metadata(index, track, app.current_stream_url());
    mpris.set_playback(playback_status(app));
}
