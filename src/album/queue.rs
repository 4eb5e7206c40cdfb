//! The album queue: unlocked tracks in album order.
//!
//! The queue is always rebuilt from scratch. Track counts are tiny and lock
//! state changes at day granularity, so nothing is patched incrementally.

use chrono::{DateTime, TimeZone};

use super::model::{Album, TrackView};

#[derive(Debug, Clone)]
pub struct AlbumQueue<Tz: TimeZone> {
    entries: Vec<TrackView<Tz>>,
}

impl<Tz: TimeZone> AlbumQueue<Tz> {
    pub fn rebuild(album: &Album, now: &DateTime<Tz>) -> Self {
        let entries = album
            .tracks
            .iter()
            .map(|t| album.view(t, now))
            .filter(|v| v.unlocked)
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, pos: usize) -> Option<&TrackView<Tz>> {
        self.entries.get(pos)
    }

    /// Queue position of `file_id`, matched by identity rather than a stored index.
    pub fn position_of(&self, file_id: &str) -> Option<usize> {
        self.entries.iter().position(|v| v.file_id == file_id)
    }
}
