use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use super::*;
use crate::api::{ApiClient, ApiError, ConversionResult, Track};
use crate::audio::AudioCmd;
use crate::config::ServerSettings;
use crate::net::{NetCmd, NetEvent};
use crate::player::Player;

fn t(id: i64, title: &str) -> Track {
    Track {
        id,
        title: title.into(),
        artist: "Unknown Artist".into(),
        duration: 180,
        file_size: None,
        created_at: None,
    }
}

fn conversion() -> ConversionResult {
    ConversionResult {
        file_id: "f1".into(),
        title: "X".into(),
        artist: None,
        duration: 200,
        youtube_url: Some("https://youtu.be/abc".into()),
        safe_title: "X".into(),
    }
}

fn app() -> (App, Receiver<AudioCmd>) {
    let api = ApiClient::new(&ServerSettings {
        base_url: "http://localhost:5000".into(),
        timeout_secs: 5,
    })
    .unwrap();
    let (tx, rx) = mpsc::channel();
    let player = Player::new(tx, api.clone());
    (App::new(api, player), rx)
}

/// An app already sitting on a loaded library view.
fn app_with_library(tracks: Vec<Track>) -> (App, Receiver<AudioCmd>) {
    let (mut app, rx) = app();
    let cmd = app.goto(Route::Library).unwrap();
    let NetCmd::LoadLibrary { epoch } = cmd else {
        panic!("expected a library fetch");
    };
    app.apply_net_event(NetEvent::Library {
        epoch,
        result: Ok(tracks),
    });
    (app, rx)
}

#[test]
fn starts_on_the_add_view_with_no_tracks() {
    let (app, _rx) = app();
    assert_eq!(app.route, Route::AddMusic);
    assert!(!app.has_tracks());
    assert!(app.add.status.is_none());
}

#[test]
fn empty_url_submission_never_reaches_the_network() {
    // Scenario A: validation message, no command, control stays enabled.
    let (mut app, _rx) = app();

    app.push_url_char(' ');
    assert!(app.submit_convert().is_none());

    let status = app.add.status.clone().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.text, "Please enter a YouTube URL");
    assert!(!app.add.converting);
}

#[test]
fn submission_clears_previous_result_and_status_immediately() {
    let (mut app, _rx) = app();
    app.add.result = Some(conversion());
    app.add.status = Some(StatusMessage::error("old"));

    for c in "https://youtu.be/abc".chars() {
        app.push_url_char(c);
    }
    let cmd = app.submit_convert().unwrap();
    assert!(matches!(cmd, NetCmd::Convert { ref url, .. } if url == "https://youtu.be/abc"));
    assert!(app.add.converting);
    assert!(app.add.result.is_none());
    assert!(app.add.status.is_none());

    // A second submission while one is outstanding is refused.
    assert!(app.submit_convert().is_none());
}

#[test]
fn successful_conversion_shows_the_result_card() {
    // Scenario B, first half.
    let (mut app, _rx) = app();
    for c in "https://youtu.be/abc".chars() {
        app.push_url_char(c);
    }
    let NetCmd::Convert { epoch, .. } = app.submit_convert().unwrap() else {
        panic!("expected a convert command");
    };

    app.apply_net_event(NetEvent::Converted {
        epoch,
        result: Ok(conversion()),
    });

    assert!(!app.add.converting);
    let result = app.add.result.as_ref().unwrap();
    assert_eq!(result.title, "X");
    assert_eq!(crate::api::format_duration(result.duration as f64), "3:20");
}

#[test]
fn download_builds_the_file_url_and_changes_nothing() {
    // Scenario B, second half.
    let (mut app, _rx) = app();
    app.add.result = Some(conversion());

    let cmd = app.download_request().unwrap();
    match cmd {
        NetCmd::Download { url, file_name } => {
            assert_eq!(url, "http://localhost:5000/download/f1?title=X");
            assert_eq!(file_name, "X.mp3");
        }
        other => panic!("expected a download, got {other:?}"),
    }

    assert!(app.add.result.is_some());
    assert!(app.add.status.is_none());
    assert!(!app.add.converting && !app.add.saving);
}

#[test]
fn download_without_a_result_is_a_no_op() {
    let (app, _rx) = app();
    assert!(app.download_request().is_none());
}

#[test]
fn application_and_transport_failures_surface_differently() {
    let (mut app, _rx) = app();
    for c in "https://youtu.be/abc".chars() {
        app.push_url_char(c);
    }

    let NetCmd::Convert { epoch, .. } = app.submit_convert().unwrap() else {
        panic!("expected a convert command");
    };
    app.apply_net_event(NetEvent::Converted {
        epoch,
        result: Err(ApiError::Api("Video is unavailable or private".into())),
    });
    assert_eq!(
        app.add.status.as_ref().unwrap().text,
        "Video is unavailable or private"
    );
    assert!(!app.add.converting); // control re-enabled

    let NetCmd::Convert { epoch, .. } = app.submit_convert().unwrap() else {
        panic!("expected a convert command");
    };
    app.apply_net_event(NetEvent::Converted {
        epoch,
        result: Err(ApiError::Io(std::io::Error::other("conn reset"))),
    });
    assert_eq!(
        app.add.status.as_ref().unwrap().text,
        "Network error. Please try again."
    );
}

#[test]
fn save_success_confirms_then_navigates_after_the_delay() {
    let (mut app, _rx) = app();
    app.add.result = Some(conversion());

    let NetCmd::Save { request, epoch } = app.save_result().unwrap() else {
        panic!("expected a save command");
    };
    assert_eq!(request.file_id, "f1");
    assert!(app.add.saving);

    app.apply_net_event(NetEvent::Saved {
        epoch,
        result: Ok(()),
    });
    assert_eq!(app.add.status.as_ref().unwrap().kind, StatusKind::Success);
    assert_eq!(app.route, Route::AddMusic);

    // Not yet: the confirmation lingers for the fixed delay.
    assert!(app.tick(Instant::now()).is_none());
    assert_eq!(app.route, Route::AddMusic);

    let cmd = app.tick(Instant::now() + Duration::from_secs(2)).unwrap();
    assert!(matches!(cmd, NetCmd::LoadLibrary { .. }));
    assert_eq!(app.route, Route::Library);
}

#[test]
fn stale_completions_are_dropped() {
    let (mut app, _rx) = app();
    for c in "https://youtu.be/abc".chars() {
        app.push_url_char(c);
    }
    let NetCmd::Convert { epoch, .. } = app.submit_convert().unwrap() else {
        panic!("expected a convert command");
    };

    // The user navigates away before the conversion finishes.
    app.goto(Route::Library);
    app.goto(Route::AddMusic);

    app.apply_net_event(NetEvent::Converted {
        epoch,
        result: Ok(conversion()),
    });
    assert!(app.add.result.is_none());
    assert!(app.add.status.is_none());
}

#[test]
fn navigation_away_discards_the_add_view_state() {
    let (mut app, _rx) = app();
    for c in "abc".chars() {
        app.push_url_char(c);
    }
    app.add.result = Some(conversion());
    app.add.status = Some(StatusMessage::error("old"));

    app.goto(Route::Library);
    app.goto(Route::AddMusic);

    assert!(app.add.url.is_empty());
    assert!(app.add.result.is_none());
    assert!(app.add.status.is_none());
}

#[test]
fn entering_the_library_always_refetches() {
    let (mut app, _rx) = app();

    let cmd = app.goto(Route::Library).unwrap();
    assert!(matches!(cmd, NetCmd::LoadLibrary { .. }));
    assert!(app.library.loading);

    // Re-entering later fetches again with a fresh epoch.
    app.goto(Route::AddMusic);
    let NetCmd::LoadLibrary { epoch } = app.goto(Route::Library).unwrap() else {
        panic!("expected a library fetch");
    };
    assert_eq!(epoch, app.library.epoch);
}

#[test]
fn stale_library_fetches_do_not_clobber_the_list() {
    let (mut app, _rx) = app();
    let NetCmd::LoadLibrary { epoch: old } = app.goto(Route::Library).unwrap() else {
        panic!("expected a library fetch");
    };

    // A manual reload supersedes the first fetch.
    let NetCmd::LoadLibrary { epoch: new } = app.request_library_reload().unwrap() else {
        panic!("expected a library fetch");
    };

    app.apply_net_event(NetEvent::Library {
        epoch: old,
        result: Ok(vec![t(1, "stale")]),
    });
    assert!(app.tracks.is_empty());
    assert!(app.library.loading);

    app.apply_net_event(NetEvent::Library {
        epoch: new,
        result: Ok(vec![t(2, "fresh")]),
    });
    assert_eq!(app.tracks.len(), 1);
    assert_eq!(app.tracks[0].title, "fresh");
    assert!(!app.library.loading);
}

#[test]
fn cursor_wraps_both_ways() {
    let (mut app, _rx) = app_with_library(vec![t(1, "a"), t(2, "b"), t(3, "c")]);

    assert_eq!(app.library.selected, 0);
    app.select_prev();
    assert_eq!(app.library.selected, 2);
    app.select_next();
    assert_eq!(app.library.selected, 0);
    app.select_last();
    assert_eq!(app.library.selected, 2);
    app.select_first();
    assert_eq!(app.library.selected, 0);
}

#[test]
fn activating_the_playing_row_toggles_pause_not_restart() {
    // Scenario C: row activation twice nets a single pause.
    let (mut app, rx) = app_with_library(vec![t(1, "a"), t(2, "b"), t(3, "c")]);

    app.select_next();
    app.play_selected();
    assert_eq!(app.player.current(), Some(1));
    assert!(app.player.is_playing());
    while rx.try_recv().is_ok() {}

    app.play_selected();
    assert_eq!(app.player.current(), Some(1));
    assert!(!app.player.is_playing());

    // Only a flag change went to the transport; no reload.
    let mut cmds = Vec::new();
    while let Ok(c) = rx.try_recv() {
        cmds.push(c);
    }
    assert_eq!(cmds, vec![AudioCmd::SetPlaying(false)]);
}

#[test]
fn confirmed_delete_issues_the_command_for_the_right_track() {
    let (mut app, _rx) = app_with_library(vec![t(10, "a"), t(20, "b")]);

    app.select_next();
    app.request_delete();
    assert_eq!(app.library.confirm_delete, Some(1));

    let cmd = app.confirm_delete().unwrap();
    assert!(matches!(cmd, NetCmd::Delete { id: 20, .. }));
    assert!(app.library.deleting);

    // The popup is gone and a second confirm does nothing.
    assert!(app.confirm_delete().is_none());
}

#[test]
fn cancelled_delete_sends_nothing() {
    let (mut app, _rx) = app_with_library(vec![t(10, "a")]);

    app.request_delete();
    app.cancel_delete();
    assert!(app.confirm_delete().is_none());
    assert!(!app.library.deleting);
}

#[test]
fn deleting_the_playing_track_stops_playback_before_the_refresh() {
    // Scenario D.
    let (mut app, _rx) = app_with_library(vec![t(10, "a"), t(20, "b")]);

    app.play_selected(); // playing track id 10
    app.request_delete();
    let NetCmd::Delete { id, epoch } = app.confirm_delete().unwrap() else {
        panic!("expected a delete command");
    };

    let follow_up = app.apply_net_event(NetEvent::Deleted {
        epoch,
        id,
        result: Ok(()),
    });

    // Playback stopped already, while the refresh is still in flight.
    assert_eq!(app.player.current(), None);
    assert!(!app.player.is_playing());
    assert!(matches!(follow_up, Some(NetCmd::LoadLibrary { .. })));
}

#[test]
fn deleting_another_track_keeps_playback_running() {
    let (mut app, _rx) = app_with_library(vec![t(10, "a"), t(20, "b")]);

    app.play_selected(); // playing id 10
    app.select_next();
    app.request_delete();
    let NetCmd::Delete { id, epoch } = app.confirm_delete().unwrap() else {
        panic!("expected a delete command");
    };
    assert_eq!(id, 20);

    let follow_up = app.apply_net_event(NetEvent::Deleted {
        epoch,
        id,
        result: Ok(()),
    });
    assert!(app.player.is_playing());
    assert!(matches!(follow_up, Some(NetCmd::LoadLibrary { .. })));
}

#[test]
fn failed_delete_leaves_the_list_unchanged() {
    let (mut app, _rx) = app_with_library(vec![t(10, "a")]);

    app.request_delete();
    let NetCmd::Delete { id, epoch } = app.confirm_delete().unwrap() else {
        panic!("expected a delete command");
    };

    let follow_up = app.apply_net_event(NetEvent::Deleted {
        epoch,
        id,
        result: Err(ApiError::Api("Failed to delete song".into())),
    });
    assert!(follow_up.is_none());
    assert_eq!(app.tracks.len(), 1);
    assert!(!app.library.deleting);
    assert_eq!(
        app.library.status.as_ref().unwrap().text,
        "Failed to delete song"
    );
}

#[test]
fn shrinking_reload_stops_an_out_of_range_player() {
    let (mut app, _rx) = app_with_library(vec![t(1, "a"), t(2, "b"), t(3, "c")]);

    app.select_last();
    app.play_selected();
    assert_eq!(app.player.current(), Some(2));

    let NetCmd::LoadLibrary { epoch } = app.request_library_reload().unwrap() else {
        panic!("expected a library fetch");
    };
    app.apply_net_event(NetEvent::Library {
        epoch,
        result: Ok(vec![t(1, "a")]),
    });

    assert_eq!(app.player.current(), None);
    assert!(!app.player.is_playing());
    assert_eq!(app.library.selected, 0);
}
