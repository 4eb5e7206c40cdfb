use chrono::{DateTime, TimeZone};

use crate::config::Settings;

use super::countdown::{countdown_until, short_date};
use super::schedule::Schedule;

/// A configured track. Its index is its position in the album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub index: usize,
    pub file_id: String,
    pub revealed_title: String,
}

/// Derived, per-instant view of a track. Never stored between renders.
#[derive(Debug, Clone)]
pub struct TrackView<Tz: TimeZone> {
    pub index: usize,
    pub file_id: String,
    pub unlocked: bool,
    pub unlock_at: DateTime<Tz>,
    pub title: String,
    /// Duration text for the row. Left `None` here; the caller fills it from
    /// the duration cache.
    pub display_duration: Option<String>,
}

impl<Tz: TimeZone> TrackView<Tz>
where
    Tz::Offset: std::fmt::Display,
{
    /// Row label: `Unlocked`, or the release day and a countdown.
    pub fn unlock_label(&self, now: &DateTime<Tz>) -> String {
        if self.unlocked {
            return "Unlocked".to_string();
        }
        format!(
            "Unlocks: {} — {}",
            short_date(&self.unlock_at),
            countdown_until(&self.unlock_at, now)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Album {
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub message: String,
    pub tracks: Vec<Track>,
    pub schedule: Schedule,
    locked_prefix: String,
    locked_suffix: String,
}

impl Album {
    pub fn from_settings(settings: &Settings) -> Self {
        let tracks = settings
            .album
            .tracks
            .iter()
            .enumerate()
            .map(|(index, t)| Track {
                index,
                file_id: t.file.clone(),
                revealed_title: t.revealed_name.clone(),
            })
            .collect();

        Self {
            title: settings.album.title.clone(),
            artist: settings.album.artist.clone(),
            year: settings.album.year,
            message: settings.album.message.clone(),
            tracks,
            schedule: Schedule::new(
                &settings.schedule.dates,
                settings.schedule.force_unlock_all,
            ),
            locked_prefix: settings.locked.title_prefix.clone(),
            locked_suffix: settings.locked.title_suffix.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Title shown for a locked track, e.g. `Track 3 — Locked`.
    pub fn locked_title(&self, index: usize) -> String {
        let number = (index + 1).to_string();
        [
            self.locked_prefix.trim(),
            number.as_str(),
            self.locked_suffix.trim(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
    }

    pub fn view<Tz: TimeZone>(&self, track: &Track, now: &DateTime<Tz>) -> TrackView<Tz> {
        let r = self.schedule.resolve(track.index, now);
        let title = if r.unlocked {
            track.revealed_title.clone()
        } else {
            self.locked_title(track.index)
        };

        TrackView {
            index: track.index,
            file_id: track.file_id.clone(),
            unlocked: r.unlocked,
            unlock_at: r.unlock_at,
            title,
            display_duration: None,
        }
    }

    /// Views for every track in album order.
    pub fn views<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<TrackView<Tz>> {
        self.tracks.iter().map(|t| self.view(t, now)).collect()
    }

    pub fn next_locked<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<(usize, DateTime<Tz>)> {
        self.schedule.next_locked(self.tracks.len(), now)
    }

    /// `artist • year • N songs`
    pub fn byline(&self) -> String {
        let mut parts = vec![self.artist.clone()];
        if let Some(y) = self.year {
            parts.push(y.to_string());
        }
        parts.push(format!("{} songs", self.tracks.len()));
        parts.join(" • ")
    }
}
