use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone};

use crate::album::{Album, AlbumQueue};

use super::deck::Deck;
use super::types::{Advance, AlbumPlay, MediaResource, PlaybackError, PlaybackState, SingleToggle};

/// Owns the playback cursor and the single active resource.
///
/// Every path that starts a resource pauses all others first; that is the
/// only thing keeping two tracks from playing at once.
#[derive(Debug)]
pub struct PlaybackController {
    /// Position in the album queue considered "current" for auto-advance.
    cursor: Option<usize>,
    /// File id of the resource album controls act on.
    active: Option<String>,
    retry_at: Option<Instant>,
    retry_delay: Duration,
}

impl PlaybackController {
    pub fn new(retry_delay: Duration) -> Self {
        Self {
            cursor: None,
            active: None,
            retry_at: None,
            retry_delay,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn retry_pending(&self) -> bool {
        self.retry_at.is_some()
    }

    pub fn state<R: MediaResource>(&self, deck: &Deck<R>) -> PlaybackState {
        let Some(id) = self.active.as_deref() else {
            return PlaybackState::Idle;
        };
        match deck.get(id) {
            Some(r) if r.is_playing() => PlaybackState::Playing(id.to_string()),
            Some(_) => PlaybackState::Paused(id.to_string()),
            None => PlaybackState::Idle,
        }
    }

    /// Play the album from the cursor (or the first unlocked track).
    pub fn play_album<R, Tz>(
        &mut self,
        album: &Album,
        now: &DateTime<Tz>,
        deck: &mut Deck<R>,
    ) -> AlbumPlay
    where
        R: MediaResource,
        Tz: TimeZone,
    {
        self.start_album(album, now, deck, true)
    }

    /// Fire the scheduled render retry if its deadline has passed.
    ///
    /// The retry runs once; if the player is still missing it is abandoned.
    pub fn run_due_retry<R, Tz>(
        &mut self,
        at: Instant,
        album: &Album,
        now: &DateTime<Tz>,
        deck: &mut Deck<R>,
    ) -> Option<AlbumPlay>
    where
        R: MediaResource,
        Tz: TimeZone,
    {
        match self.retry_at {
            Some(deadline) if at >= deadline => {
                self.retry_at = None;
                Some(self.start_album(album, now, deck, false))
            }
            _ => None,
        }
    }

    fn start_album<R, Tz>(
        &mut self,
        album: &Album,
        now: &DateTime<Tz>,
        deck: &mut Deck<R>,
        allow_retry: bool,
    ) -> AlbumPlay
    where
        R: MediaResource,
        Tz: TimeZone,
    {
        let queue = AlbumQueue::rebuild(album, now);
        if queue.is_empty() {
            return AlbumPlay::NothingUnlocked;
        }

        let pos = match self.cursor {
            Some(p) if p < queue.len() => p,
            _ => 0,
        };
        self.cursor = Some(pos);

        let Some(target) = queue.get(pos) else {
            return AlbumPlay::NothingUnlocked;
        };
        let file_id = target.file_id.clone();

        if !deck.contains(&file_id) {
            if allow_retry {
                tracing::debug!(file = %file_id, "player not rendered yet, retrying once");
                self.retry_at = Some(Instant::now() + self.retry_delay);
                return AlbumPlay::RenderPending { file_id };
            }
            tracing::debug!(file = %file_id, "player still missing, giving up");
            return AlbumPlay::Abandoned { file_id };
        }

        deck.stop_all_except(Some(&file_id));
        match deck.get_mut(&file_id).map(|r| r.play()) {
            Some(Ok(())) => {
                tracing::info!(file = %file_id, position = pos, "album playback started");
                self.active = Some(file_id.clone());
                AlbumPlay::Started { file_id }
            }
            Some(Err(error)) => {
                tracing::warn!(file = %file_id, error = %error, "playback failed");
                AlbumPlay::Failed { file_id, error }
            }
            None => AlbumPlay::Abandoned { file_id },
        }
    }

    pub fn pause_album<R: MediaResource>(&mut self, deck: &mut Deck<R>) {
        if let Some(r) = self.active.as_deref().and_then(|id| deck.get_mut(id)) {
            r.pause();
        }
    }

    /// Continue with the next unlocked track after `file_id` ended.
    ///
    /// The queue is rebuilt first: a release may have happened mid-song, so the
    /// ended track is located by file id rather than by the old cursor.
    pub fn on_track_ended<R, Tz>(
        &mut self,
        file_id: &str,
        album: &Album,
        now: &DateTime<Tz>,
        deck: &mut Deck<R>,
    ) -> Advance
    where
        R: MediaResource,
        Tz: TimeZone,
    {
        let queue = AlbumQueue::rebuild(album, now);
        let Some(pos) = queue.position_of(file_id) else {
            return Advance::NotQueued;
        };

        if pos + 1 >= queue.len() {
            tracing::info!(file = %file_id, "end of unlocked album");
            self.cursor = None;
            self.active = None;
            return Advance::Finished;
        }

        self.cursor = Some(pos + 1);
        Advance::Next(self.play_album(album, now, deck))
    }

    /// Toggle one track by hand. Other tracks are paused first.
    ///
    /// A successful start also moves the album cursor onto this track.
    pub fn play_single<R, Tz>(
        &mut self,
        file_id: &str,
        album: &Album,
        now: &DateTime<Tz>,
        deck: &mut Deck<R>,
    ) -> SingleToggle
    where
        R: MediaResource,
        Tz: TimeZone,
    {
        if !deck.contains(file_id) {
            return SingleToggle::Missing;
        }

        deck.stop_all_except(Some(file_id));
        self.retry_at = None;

        let Some(resource) = deck.get_mut(file_id) else {
            return SingleToggle::Missing;
        };
        if resource.is_playing() {
            resource.pause();
            self.active = Some(file_id.to_string());
            return SingleToggle::Paused;
        }
        if let Err(e) = resource.play() {
            tracing::warn!(file = %file_id, error = %e, "playback failed");
            return SingleToggle::Failed(e);
        }
        self.active = Some(file_id.to_string());

        if let Some(pos) = AlbumQueue::rebuild(album, now).position_of(file_id) {
            self.cursor = Some(pos);
        }
        SingleToggle::Started
    }

    /// Seek the active resource (scrub bar input).
    pub fn scrub<R: MediaResource>(&self, deck: &mut Deck<R>, to: Duration) -> Result<(), PlaybackError> {
        match self.active.as_deref().and_then(|id| deck.get_mut(id)) {
            Some(r) => r.seek(to),
            None => Ok(()),
        }
    }

    /// Pause everything and forget the cursor.
    pub fn stop_all<R: MediaResource>(&mut self, deck: &mut Deck<R>) {
        deck.stop_all_except(None);
        self.cursor = None;
        self.active = None;
        self.retry_at = None;
    }
}
