use std::path::PathBuf;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/reveal/config.toml` or `~/.config/reveal/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `REVEAL__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub album: AlbumSettings,
    pub schedule: ScheduleSettings,
    pub locked: LockedSettings,
    pub gate: GateSettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlbumSettings {
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    /// Free text shown under the album header.
    pub message: String,
    /// Directory that track `file` identifiers are relative to.
    ///
    /// Defaults to the directory holding the config file.
    pub media_dir: Option<PathBuf>,
    /// Tracks in album order.
    pub tracks: Vec<TrackEntry>,
}

impl Default for AlbumSettings {
    fn default() -> Self {
        Self {
            title: "Untitled Album".to_string(),
            artist: "Unknown Artist".to_string(),
            year: None,
            message: String::new(),
            media_dir: None,
            tracks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackEntry {
    /// Opaque media file identifier. Numeric names avoid spoilers.
    pub file: String,
    /// Title shown once the track unlocks.
    #[serde(alias = "revealedName", alias = "title")]
    pub revealed_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Unlock every track regardless of dates (preview/testing).
    pub force_unlock_all: bool,
    /// One release date per track index, interpreted at local midnight.
    #[serde(deserialize_with = "lenient_dates")]
    pub dates: Vec<UnlockDate>,
}

/// Read `dates` one entry at a time; an entry of the wrong shape becomes an
/// empty date (track stays locked) instead of rejecting the whole file.
fn lenient_dates<'de, D>(deserializer: D) -> Result<Vec<UnlockDate>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Date(UnlockDate),
        Malformed(IgnoredAny),
    }

    let entries = Vec::<Entry>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|e| match e {
            Entry::Date(d) => d,
            Entry::Malformed(_) => UnlockDate::default(),
        })
        .collect())
}

/// A release date as written in the config.
///
/// Every field is optional, and entries of the wrong type are read as empty
/// dates, so a malformed entry keeps its track locked instead of failing the
/// whole load.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UnlockDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl UnlockDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LockedSettings {
    /// Locked rows read `"{prefix} {n} {suffix}"`.
    pub title_prefix: String,
    pub title_suffix: String,
}

impl Default for LockedSettings {
    fn default() -> Self {
        Self {
            title_prefix: "Track".to_string(),
            title_suffix: "— Locked".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GateSettings {
    /// Password required before the album is shown. Empty disables the gate.
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Delay before the single retry when a track's player is not ready yet (milliseconds).
    pub render_retry_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            render_retry_ms: 150,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Countdown line once nothing is locked anymore.
    pub all_unlocked_text: String,
    /// How often the countdown is recomputed (milliseconds).
    pub countdown_tick_ms: u64,
    /// How long a notification stays on screen (milliseconds).
    pub notice_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ reveal ~ ".to_string(),
            all_unlocked_text: "All songs unlocked ❤️".to_string(),
            countdown_tick_ms: 1000,
            notice_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is not set.
    pub level: String,
    /// Log file. Defaults to `reveal.log` in the state directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
