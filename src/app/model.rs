use std::time::{Duration, Instant};

use crate::api::{ApiClient, ConversionResult, SaveRequest, Track};
use crate::net::{NetCmd, NetEvent};
use crate::player::Player;

/// How long the "saved" confirmation stays visible before the app moves
/// over to the library view.
const NAVIGATE_DELAY: Duration = Duration::from_millis(1000);

/// Client-side routes. The player bar persists across both.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Route {
    AddMusic,
    Library,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusKind {
    Error,
    Success,
}

/// A per-view status line (validation errors, server errors, confirmations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }
}

/// State of the Add Music view. Discarded wholesale on navigation, like
/// the view itself.
#[derive(Debug, Default)]
pub struct AddMusicView {
    pub url: String,
    pub converting: bool,
    pub saving: bool,
    pub result: Option<ConversionResult>,
    pub status: Option<StatusMessage>,
    /// Bumped on every submission and on navigation; completions carrying
    /// an older value are dropped.
    pub epoch: u64,
}

impl AddMusicView {
    fn reset(&mut self) {
        self.url.clear();
        self.converting = false;
        self.saving = false;
        self.result = None;
        self.status = None;
        self.epoch += 1;
    }
}

/// State of the Library view.
#[derive(Debug, Default)]
pub struct LibraryView {
    pub loading: bool,
    pub selected: usize,
    /// Index awaiting delete confirmation, if the popup is open.
    pub confirm_delete: Option<usize>,
    pub deleting: bool,
    pub show_metadata: bool,
    pub status: Option<StatusMessage>,
    /// Bumped on every (re)load; stale fetches are dropped.
    pub epoch: u64,
}

/// The application model.
pub struct App {
    pub route: Route,
    pub tracks: Vec<Track>,
    pub add: AddMusicView,
    pub library: LibraryView,
    pub player: Player,
    api: ApiClient,
    navigate_after: Option<Instant>,
}

impl App {
    pub fn new(api: ApiClient, player: Player) -> Self {
        Self {
            route: Route::AddMusic,
            tracks: Vec::new(),
            add: AddMusicView::default(),
            library: LibraryView::default(),
            player,
            api,
            navigate_after: None,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Stream URL of the track the player currently points at, if any.
    pub fn current_stream_url(&self) -> Option<String> {
        self.player
            .current_track(&self.tracks)
            .map(|t| self.api.audio_url(t.id))
    }

    /// Switch routes. Entering the library refetches it; leaving the add
    /// view discards its transient state (pending completions included).
    pub fn goto(&mut self, route: Route) -> Option<NetCmd> {
        if self.route == route {
            return None;
        }

        match self.route {
            Route::AddMusic => self.add.reset(),
            Route::Library => {
                self.library.confirm_delete = None;
                self.library.show_metadata = false;
            }
        }

        self.route = route;
        match route {
            Route::Library => self.request_library_reload(),
            Route::AddMusic => None,
        }
    }

    /// Start a fresh library fetch; the list is always replaced from the
    /// server, never spliced locally.
    pub fn request_library_reload(&mut self) -> Option<NetCmd> {
        self.library.loading = true;
        self.library.status = None;
        self.library.epoch += 1;
        Some(NetCmd::LoadLibrary {
            epoch: self.library.epoch,
        })
    }

    // ---- Add Music view -------------------------------------------------

    pub fn push_url_char(&mut self, c: char) {
        self.add.url.push(c);
    }

    pub fn pop_url_char(&mut self) {
        self.add.url.pop();
    }

    pub fn clear_input(&mut self) {
        self.add.url.clear();
        self.add.status = None;
    }

    /// Submit the conversion form. Empty input is a validation error and
    /// never reaches the network; a submission clears any previous result
    /// and status immediately so stale results never linger.
    pub fn submit_convert(&mut self) -> Option<NetCmd> {
        if self.add.converting {
            return None;
        }

        let url = self.add.url.trim().to_string();
        if url.is_empty() {
            self.add.status = Some(StatusMessage::error("Please enter a YouTube URL"));
            return None;
        }

        self.add.converting = true;
        self.add.result = None;
        self.add.status = None;
        self.add.epoch += 1;
        Some(NetCmd::Convert {
            url,
            epoch: self.add.epoch,
        })
    }

    /// Post the full conversion payload to the library.
    pub fn save_result(&mut self) -> Option<NetCmd> {
        if self.add.saving {
            return None;
        }
        let result = self.add.result.as_ref()?;

        self.add.saving = true;
        self.add.epoch += 1;
        Some(NetCmd::Save {
            request: SaveRequest::from(result),
            epoch: self.add.epoch,
        })
    }

    /// The Download action: a one-shot file fetch, not a JSON call, and no
    /// view state changes.
    pub fn download_request(&self) -> Option<NetCmd> {
        let result = self.add.result.as_ref()?;
        Some(NetCmd::Download {
            url: self
                .api
                .download_url(&result.file_id, &result.safe_title),
            file_name: format!("{}.mp3", result.safe_title),
        })
    }

    // ---- Library view ---------------------------------------------------

    /// Move the cursor down, wrapping at the end of the list.
    pub fn select_next(&mut self) {
        if !self.tracks.is_empty() {
            self.library.selected = (self.library.selected + 1) % self.tracks.len();
        }
    }

    /// Move the cursor up, wrapping at the top of the list.
    pub fn select_prev(&mut self) {
        if !self.tracks.is_empty() {
            let len = self.tracks.len();
            self.library.selected = (self.library.selected + len - 1) % len;
        }
    }

    pub fn select_first(&mut self) {
        self.library.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.library.selected = self.tracks.len().saturating_sub(1);
    }

    /// Row activation: select-and-toggle the track under the cursor.
    pub fn play_selected(&mut self) {
        let index = self.library.selected;
        self.player.select_and_toggle(index, &self.tracks);
    }

    pub fn toggle_metadata(&mut self) {
        self.library.show_metadata = !self.library.show_metadata;
    }

    /// Open the delete confirmation for the track under the cursor.
    pub fn request_delete(&mut self) {
        if self.has_tracks() && !self.library.deleting {
            self.library.confirm_delete = Some(self.library.selected);
        }
    }

    pub fn cancel_delete(&mut self) {
        self.library.confirm_delete = None;
    }

    /// The user confirmed: issue the delete for the track that was under
    /// the cursor when the popup opened.
    pub fn confirm_delete(&mut self) -> Option<NetCmd> {
        let index = self.library.confirm_delete.take()?;
        if self.library.deleting {
            return None;
        }
        let track = self.tracks.get(index)?;

        self.library.deleting = true;
        Some(NetCmd::Delete {
            id: track.id,
            epoch: self.library.epoch,
        })
    }

    // ---- Worker completions ---------------------------------------------

    /// Apply a completion from the net worker. Completions whose epoch no
    /// longer matches the issuing view are dropped: the view moved on.
    pub fn apply_net_event(&mut self, event: NetEvent) -> Option<NetCmd> {
        match event {
            NetEvent::Library { epoch, result } => {
                if epoch != self.library.epoch {
                    log::debug!("dropping stale library fetch (epoch {epoch})");
                    return None;
                }
                self.library.loading = false;
                match result {
                    Ok(tracks) => self.replace_tracks(tracks),
                    Err(e) => {
                        self.library.status = Some(StatusMessage::error(e.user_message()));
                    }
                }
                None
            }

            NetEvent::Converted { epoch, result } => {
                if epoch != self.add.epoch {
                    log::debug!("dropping stale conversion (epoch {epoch})");
                    return None;
                }
                self.add.converting = false;
                match result {
                    Ok(conversion) => self.add.result = Some(conversion),
                    Err(e) => {
                        self.add.status = Some(StatusMessage::error(e.user_message()));
                    }
                }
                None
            }

            NetEvent::Saved { epoch, result } => {
                if epoch != self.add.epoch {
                    log::debug!("dropping stale save (epoch {epoch})");
                    return None;
                }
                self.add.saving = false;
                match result {
                    Ok(()) => {
                        self.add.status =
                            Some(StatusMessage::success("Saved to your library!"));
                        // Linger long enough for the confirmation to be seen.
                        self.navigate_after = Some(Instant::now() + NAVIGATE_DELAY);
                    }
                    Err(e) => {
                        self.add.status = Some(StatusMessage::error(e.user_message()));
                    }
                }
                None
            }

            NetEvent::Deleted { epoch, id, result } => {
                // Only one delete can be in flight; always re-enable.
                self.library.deleting = false;
                if epoch != self.library.epoch {
                    log::debug!("dropping stale delete of song {id} (epoch {epoch})");
                    return None;
                }
                match result {
                    Ok(()) => {
                        // Stop playback before the refresh if the deleted
                        // track is the one playing.
                        if self
                            .player
                            .current_track(&self.tracks)
                            .is_some_and(|t| t.id == id)
                        {
                            self.player.stop();
                        }
                        self.request_library_reload()
                    }
                    Err(e) => {
                        // The list stays as-is; nothing was removed locally.
                        self.library.status = Some(StatusMessage::error(e.user_message()));
                        None
                    }
                }
            }
        }
    }

    /// Time-based transitions (the post-save navigation delay).
    pub fn tick(&mut self, now: Instant) -> Option<NetCmd> {
        if self.navigate_after.is_some_and(|at| now >= at) {
            self.navigate_after = None;
            return self.goto(Route::Library);
        }
        None
    }

    fn replace_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;

        if self.library.selected >= self.tracks.len() {
            self.library.selected = self.tracks.len().saturating_sub(1);
        }
        // The playing index must stay valid for the new snapshot.
        if self
            .player
            .current()
            .is_some_and(|i| i >= self.tracks.len())
        {
            self.player.stop();
        }
    }
}
