//! Application model types: `App` and `Screen`.
//!
//! The `App` struct holds the album, the latest per-track views, selection and
//! the transient text (countdown, notification, gate input) used by the UI.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::album::{Album, TrackView};
use crate::durations::DurationCache;
use crate::playback::PlaybackState;

/// Which screen is shown.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Gate,
    Album,
}

/// A non-blocking message shown for a while, replacing modal alerts.
#[derive(Clone, Debug)]
pub struct Notice {
    pub text: String,
    pub until: Instant,
}

/// The main application model.
pub struct App {
    pub album: Album,
    pub screen: Screen,
    /// Album index of the highlighted row.
    pub selected: usize,
    /// Views as of the last render.
    pub views: Vec<TrackView<Local>>,
    pub rendered_at: DateTime<Local>,
    pub countdown: String,

    /// Snapshot of the controller state, refreshed every loop iteration.
    pub playback: PlaybackState,
    /// Position of the active track.
    pub elapsed: Duration,

    pub password_input: String,
    pub gate_hint: Option<String>,

    pub notice: Option<Notice>,
}

impl App {
    /// Create a new `App` for `album`, starting on the gate screen.
    pub fn new(album: Album) -> Self {
        let now = Local::now();
        let views = album.views(&now);
        Self {
            album,
            screen: Screen::Gate,
            selected: 0,
            views,
            rendered_at: now,
            countdown: String::new(),
            playback: PlaybackState::Idle,
            elapsed: Duration::ZERO,
            password_input: String::new(),
            gate_hint: None,
            notice: None,
        }
    }

    /// Recompute every view for `now`.
    pub fn refresh_views(&mut self, now: DateTime<Local>) {
        self.views = self.album.views(&now);
        self.rendered_at = now;
    }

    pub fn set_playback(&mut self, state: PlaybackState, elapsed: Duration) {
        self.playback = state;
        self.elapsed = elapsed;
    }

    /// File id of the active track, playing or paused.
    pub fn active_file(&self) -> Option<&str> {
        match &self.playback {
            PlaybackState::Playing(id) | PlaybackState::Paused(id) => Some(id),
            PlaybackState::Idle => None,
        }
    }

    /// Copy each unlocked row's duration text out of `durations`. Locked rows
    /// never show one.
    pub fn apply_durations(&mut self, durations: &DurationCache) {
        for view in &mut self.views {
            view.display_duration = view
                .unlocked
                .then(|| durations.display_label(&view.file_id, true).to_string());
        }
    }

    pub fn open_album(&mut self) {
        self.screen = Screen::Album;
        self.password_input.clear();
        self.gate_hint = None;
    }

    pub fn push_password_char(&mut self, c: char) {
        self.password_input.push(c);
        self.gate_hint = None;
    }

    pub fn pop_password_char(&mut self) {
        self.password_input.pop();
    }

    /// Clear the input and show `hint` under it.
    pub fn reject_password(&mut self, hint: impl Into<String>) {
        self.password_input.clear();
        self.gate_hint = Some(hint.into());
    }

    pub fn selected_view(&self) -> Option<&TrackView<Local>> {
        self.views.get(self.selected)
    }

    /// Return true if the album contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.album.is_empty()
    }

    /// Move selection to the next track, wrapping to the first.
    pub fn next(&mut self) {
        let len = self.album.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous track, wrapping to the last.
    pub fn prev(&mut self) {
        let len = self.album.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn notify(&mut self, text: impl Into<String>, for_how_long: Duration) {
        self.notice = Some(Notice {
            text: text.into(),
            until: Instant::now() + for_how_long,
        });
    }

    /// Drop the notification once its time is up.
    pub fn expire_notice(&mut self, at: Instant) {
        if self.notice.as_ref().is_some_and(|n| at >= n.until) {
            self.notice = None;
        }
    }
}
