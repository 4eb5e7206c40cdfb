//! Countdown text for the next release.

use chrono::{DateTime, TimeZone};

use super::model::Album;

/// Format a remaining time in milliseconds.
///
/// `1d 01h 01m 01s` when at least a day remains, `01h 01m 01s` otherwise,
/// and `Unlocked` once the target has been reached.
pub fn format_countdown(ms: i64) -> String {
    if ms <= 0 {
        return "Unlocked".to_string();
    }
    let total = ms / 1000;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s")
    } else {
        format!("{hours:02}h {minutes:02}m {seconds:02}s")
    }
}

pub fn countdown_until<Tz: TimeZone>(target: &DateTime<Tz>, now: &DateTime<Tz>) -> String {
    let remaining = target.clone().signed_duration_since(now.clone());
    format_countdown(remaining.num_milliseconds())
}

/// `Feb 10`
pub fn short_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%b %-d").to_string()
}

/// Produces the global "next unlock" line; meant to be ticked once per second.
#[derive(Debug, Clone)]
pub struct Countdown {
    all_unlocked_text: String,
}

impl Countdown {
    pub fn new(all_unlocked_text: impl Into<String>) -> Self {
        Self {
            all_unlocked_text: all_unlocked_text.into(),
        }
    }

    pub fn tick<Tz: TimeZone>(&self, album: &Album, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        match album.next_locked(now) {
            None => self.all_unlocked_text.clone(),
            Some((index, unlock_at)) => format!(
                "Next unlock: Track {} • {} • {}",
                index + 1,
                short_date(&unlock_at),
                countdown_until(&unlock_at, now)
            ),
        }
    }
}
