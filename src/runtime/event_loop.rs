use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Route};
use crate::audio::AudioPlayer;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle, PlaybackStatus};
use crate::net::{NetEvent, NetWorker};
use crate::runtime::mpris_sync::{playback_status, update_mpris};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Last seen value of the transport's ended counter; increments are
    /// turned into auto-advance.
    pub last_ended: u64,
    /// Last-known playing index as emitted to MPRIS.
    pub last_mpris_index: Option<usize>,
    /// Last-known playback status as emitted to MPRIS.
    pub last_mpris_status: PlaybackStatus,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            last_ended: 0,
            last_mpris_index: app.player.current(),
            last_mpris_status: playback_status(app),
        }
    }
}

/// Main terminal event loop: drains keyboard input, MPRIS control
/// commands, net-worker completions and playback progress, redrawing
/// after each pass. Returns `Ok(())` when shutdown is requested.
#[allow(clippy::too_many_arguments)]
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    net: &NetWorker,
    net_events: &mpsc::Receiver<NetEvent>,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Pending time-based transitions (the post-save navigation delay).
        if let Some(cmd) = app.tick(Instant::now()) {
            net.send(cmd);
        }

        // Sync playback progress from the transport into the controller.
        // The play/pause flag is NOT synced back: the controller's intent
        // is authoritative even when the transport could not comply.
        let handle = audio_player.playback_handle();
        let (position, total, ended) = match handle.lock() {
            Ok(info) => (
                info.position.as_secs_f64(),
                info.total.map(|t| t.as_secs_f64()).unwrap_or(0.0),
                info.ended,
            ),
            Err(_) => (0.0, 0.0, state.last_ended),
        };
        app.player.report_progress(position, total);

        if ended != state.last_ended {
            state.last_ended = ended;
            app.player.on_track_ended(&app.tracks);
        }

        // Keep MPRIS in sync even when changes come from media keys or
        // auto-advance.
        let status = playback_status(app);
        if app.player.current() != state.last_mpris_index || status != state.last_mpris_status {
            update_mpris(mpris, app);
            state.last_mpris_index = app.player.current();
            state.last_mpris_status = status;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        // Worker completions; a completion may issue a follow-up request
        // (delete -> reload).
        while let Ok(ev) = net_events.try_recv() {
            if let Some(cmd) = app.apply_net_event(ev) {
                net.send(cmd);
            }
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, audio_player, mpris) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player, net, control_tx) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply a transport command from the session bus. Returns `true` on quit.
fn handle_control_cmd(
    cmd: ControlCmd,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
) -> bool {
    match cmd {
        ControlCmd::Quit => {
            audio_player.shutdown();
            return true;
        }
        ControlCmd::Play => {
            if app.player.current().is_some() {
                if !app.player.is_playing() {
                    app.player.toggle_play_pause();
                }
            } else if app.has_tracks() {
                app.player
                    .select_and_toggle(app.library.selected, &app.tracks);
            }
        }
        ControlCmd::Pause => {
            if app.player.is_playing() {
                app.player.toggle_play_pause();
            }
        }
        ControlCmd::PlayPause => {
            if app.player.current().is_some() {
                app.player.toggle_play_pause();
            } else if app.has_tracks() {
                app.player
                    .select_and_toggle(app.library.selected, &app.tracks);
            }
        }
        ControlCmd::Stop => {
            app.player.stop();
        }
        ControlCmd::Next => {
            app.player.next(&app.tracks);
        }
        ControlCmd::Prev => {
            app.player.previous(&app.tracks);
        }
    }

    update_mpris(mpris, app);
    false
}

/// Dispatch a key press to the active view. Returns `true` on quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    net: &NetWorker,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> bool {
    match app.route {
        Route::AddMusic => handle_add_music_key(key, app, audio_player, net),
        Route::Library => handle_library_key(key, settings, app, audio_player, net, control_tx),
    }
}

fn handle_add_music_key(
    key: KeyEvent,
    app: &mut App,
    audio_player: &AudioPlayer,
    net: &NetWorker,
) -> bool {
    // The whole view is a text field; control-modified keys carry the
    // actions so typing stays unambiguous.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') => {
                audio_player.shutdown();
                return true;
            }
            KeyCode::Char('s') => {
                if let Some(cmd) = app.save_result() {
                    net.send(cmd);
                }
            }
            KeyCode::Char('d') => {
                if let Some(cmd) = app.download_request() {
                    net.send(cmd);
                }
            }
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Tab => {
            if let Some(cmd) = app.goto(Route::Library) {
                net.send(cmd);
            }
        }
        KeyCode::Enter => {
            if let Some(cmd) = app.submit_convert() {
                net.send(cmd);
            }
        }
        KeyCode::Esc => app.clear_input(),
        KeyCode::Backspace => app.pop_url_char(),
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.push_url_char(c);
            }
        }
        _ => {}
    }

    false
}

fn handle_library_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    net: &NetWorker,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> bool {
    // The confirmation popup swallows everything except its own answers.
    if app.library.confirm_delete.is_some() {
        match key.code {
            KeyCode::Char('y') => {
                if let Some(cmd) = app.confirm_delete() {
                    net.send(cmd);
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            audio_player.shutdown();
            return true;
        }
        KeyCode::Tab | KeyCode::Char('1') => {
            if let Some(cmd) = app.goto(Route::AddMusic) {
                net.send(cmd);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Char('g') => app.select_first(),
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter => app.play_selected(),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            // Behave exactly like the MPRIS PlayPause.
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') | KeyCode::Right => {
            let secs = settings.controls.seek_seconds as f64;
            app.player.seek_by(secs);
        }
        KeyCode::Char('H') | KeyCode::Left => {
            let secs = settings.controls.seek_seconds as f64;
            app.player.seek_by(-secs);
        }
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('r') => {
            if let Some(cmd) = app.request_library_reload() {
                net.send(cmd);
            }
        }
        KeyCode::Char('K') => app.toggle_metadata(),
        KeyCode::Esc => {
            if app.library.show_metadata {
                app.toggle_metadata();
            }
        }
        _ => {}
    }

    false
}
