//! UI rendering for the terminal interface.
//!
//! Layout, top to bottom: header, the active view (Add Music or Library),
//! the persistent player bar, and the navigation/controls bar.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::api::format_duration;
use crate::app::{App, Route, StatusKind, StatusMessage};
use crate::config::{ControlsSettings, UiSettings};

/// Render the whole frame from the current app snapshot.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, ui_settings, chunks[0]);

    match app.route {
        Route::AddMusic => draw_add_music(frame, app, chunks[1]),
        Route::Library => draw_library(frame, app, chunks[1]),
    }

    draw_player_bar(frame, app, chunks[2]);
    draw_nav_bar(frame, app, controls_settings, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &App, ui_settings: &UiSettings, area: Rect) {
    let title = match app.route {
        Route::AddMusic => " musicbox ",
        Route::Library => " my library ",
    };
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, area);
}

fn status_line(status: &StatusMessage) -> Line<'_> {
    let span = Span::raw(status.text.as_str());
    match status.kind {
        StatusKind::Error => Line::from(span.red()),
        StatusKind::Success => Line::from(span.green()),
    }
}

fn draw_add_music(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(area);

    // URL input with a block cursor while the view is idle.
    let mut input = app.add.url.clone();
    if !app.add.converting {
        input.push('█');
    }
    let input_box = Paragraph::new(input).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" paste a youtube url, enter converts ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(input_box, chunks[0]);

    if let Some(status) = &app.add.status {
        let msg = Paragraph::new(status_line(status))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(msg, chunks[1]);
    }

    if app.add.converting {
        let busy = Paragraph::new("Extracting audio...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" working "));
        frame.render_widget(busy, chunks[2]);
        return;
    }

    if let Some(result) = &app.add.result {
        let artist = result.artist.as_deref().unwrap_or("Unknown Artist");
        let text = format!(
            "{}\n{}\n{}\n\n[ctrl+s] save to library    [ctrl+d] download",
            result.title,
            artist,
            format_duration(result.duration as f64),
        );
        let card = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" result ")
                    .padding(Padding::horizontal(1)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(card, chunks[2]);
    }
}

fn draw_library(frame: &mut Frame, app: &App, area: Rect) {
    if app.library.loading {
        let loading = Paragraph::new("Loading library...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" tracks "));
        frame.render_widget(loading, area);
        return;
    }

    if !app.has_tracks() {
        let empty = Paragraph::new("No songs yet\n\nAdd music from YouTube: press 1, paste a URL")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" tracks "));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if app.player.current() == Some(i) {
                if app.player.is_playing() { "▶ " } else { "⏸ " }
            } else {
                "  "
            };
            ListItem::new(format!(
                "{}{} — {}  [{}]",
                marker,
                track.title,
                track.artist,
                format_duration(track.duration as f64)
            ))
        })
        .collect();

    let title = format!(
        " tracks ({} song{}) ",
        app.tracks.len(),
        if app.tracks.len() == 1 { "" } else { "s" }
    );
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(app.library.selected));
    frame.render_stateful_widget(list, area, &mut state);

    if let Some(status) = &app.library.status {
        let line = Paragraph::new(status_line(status)).alignment(Alignment::Center);
        let bottom = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(2),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(line, bottom);
    }

    if app.library.confirm_delete.is_some() {
        draw_confirm_delete(frame, app, area);
    } else if app.library.show_metadata {
        draw_metadata(frame, app, area);
    }
}

fn draw_confirm_delete(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect_sized(48, 5, area);
    frame.render_widget(Clear, popup);

    let track_title = app
        .library
        .confirm_delete
        .and_then(|i| app.tracks.get(i))
        .map(|t| t.title.as_str())
        .unwrap_or("this song");

    let text = format!(
        "Delete \"{}\" from your library?\n\n[y] delete    [n] keep",
        track_title
    );
    let confirm = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" confirm "))
        .wrap(Wrap { trim: true });
    frame.render_widget(confirm, popup);
}

fn draw_metadata(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect_sized(60, 9, area);
    frame.render_widget(Clear, popup);

    let meta = match app.tracks.get(app.library.selected) {
        Some(track) => format!(
            "Title: {}\nArtist: {}\nDuration: {}\nSize: {}\nAdded: {}\nId: {}",
            track.title,
            track.artist,
            format_duration(track.duration as f64),
            track
                .file_size
                .map(format_file_size)
                .unwrap_or_else(|| "-".to_string()),
            track.created_at.as_deref().unwrap_or("-"),
            track.id,
        ),
        None => "No track selected".to_string(),
    };
    let meta_paragraph = Paragraph::new(meta)
        .block(
            Block::default()
                .padding(Padding::horizontal(1))
                .borders(Borders::ALL)
                .title(" metadata (K closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(meta_paragraph, popup);
}

fn draw_player_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" player ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(track) = app.player.current_track(&app.tracks) else {
        let idle = Paragraph::new("Nothing playing — open the library and press enter on a track")
            .alignment(Alignment::Center)
            .dim();
        frame.render_widget(idle, inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let state_icon = if app.player.is_playing() { "▶" } else { "⏸" };
    let now_playing = Paragraph::new(format!(
        " {} {} — {}",
        state_icon, track.artist, track.title
    ));
    frame.render_widget(now_playing, rows[0]);

    let label = format!(
        "{} / {}",
        format_duration(app.player.position()),
        format_duration(app.player.duration())
    );
    let gauge = Gauge::default()
        .ratio(app.player.progress_fraction())
        .label(label)
        .use_unicode(true);
    frame.render_widget(gauge, rows[1]);
}

fn draw_nav_bar(frame: &mut Frame, app: &App, controls: &ControlsSettings, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(1)])
        .split(area);

    let tab = |label: &str, active: bool| -> Span<'static> {
        let span = Span::raw(format!(" {label} "));
        if active {
            span.add_modifier(Modifier::REVERSED)
        } else {
            span
        }
    };
    let tabs = Line::from(vec![
        tab("[1] add music", app.route == Route::AddMusic),
        Span::raw(" "),
        tab("[2] library", app.route == Route::Library),
    ]);
    let nav = Paragraph::new(tabs).block(Block::default().borders(Borders::ALL));
    frame.render_widget(nav, columns[0]);

    let hints = Paragraph::new(controls_text(app.route, controls.seek_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding::horizontal(1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(hints, columns[1]);
}

/// Key hints for the active view.
fn controls_text(route: Route, seek_seconds: u64) -> String {
    match route {
        Route::AddMusic => {
            "[enter] convert | [ctrl+s] save | [ctrl+d] download | [esc] clear | [tab] switch | [ctrl+q] quit".to_string()
        }
        Route::Library => format!(
            "[j/k] move | [enter] play/pause | [h/l] prev/next | [H/L] seek -/+{seek_seconds}s | [space] pause | [d] delete | [r] reload | [K] metadata | [q] quit"
        ),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn format_file_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}
