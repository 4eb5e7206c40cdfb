//! Playback-related small types: the media resource capability, errors and
//! the outcomes reported back to the UI.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device available")]
    NoOutput,

    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("seek failed: {0}")]
    Seek(String),
}

/// A playable handle bound to one track's file id.
pub trait MediaResource {
    fn file_id(&self) -> &str;
    /// Start or resume playback. Restarts from the top after the track ended.
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    /// Returns `true` exactly once after playback reached the end of the track.
    fn take_ended(&mut self) -> bool;
    fn position(&self) -> Duration;
    fn seek(&mut self, to: Duration) -> Result<(), PlaybackError>;
}

/// Whole-application playback state, derived from the active resource.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(String),
    Paused(String),
}

/// Result of asking for album playback.
#[derive(Debug)]
pub enum AlbumPlay {
    Started { file_id: String },
    /// The queue is empty; nothing to play yet.
    NothingUnlocked,
    /// The target's player does not exist yet; one retry is scheduled.
    RenderPending { file_id: String },
    /// The retry found the player still missing.
    Abandoned { file_id: String },
    Failed { file_id: String, error: PlaybackError },
}

/// Result of toggling a single track.
#[derive(Debug)]
pub enum SingleToggle {
    Started,
    Paused,
    /// No player exists for the track (locked or not rendered).
    Missing,
    Failed(PlaybackError),
}

/// What happened after a track ended.
#[derive(Debug)]
pub enum Advance {
    /// The ended track is not in the current queue; playback stops quietly.
    NotQueued,
    /// The ended track was the last unlocked one.
    Finished,
    Next(AlbumPlay),
}
