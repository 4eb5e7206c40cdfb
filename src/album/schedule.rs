//! Release schedule: decides whether a track is unlocked at a given instant.
//!
//! Resolution is pure. It never fails: a missing or impossible date keeps the
//! track locked until [`locked_forever_date`].

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};

use crate::config::UnlockDate;

/// Calendar day used for tracks without a usable schedule entry.
pub fn locked_forever_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2999, 1, 1).unwrap_or(NaiveDate::MAX)
}

/// Lock state of one track at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<Tz: TimeZone> {
    pub unlocked: bool,
    pub unlock_at: DateTime<Tz>,
}

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    dates: Vec<Option<NaiveDate>>,
    force_unlock_all: bool,
}

impl Schedule {
    pub fn new(entries: &[UnlockDate], force_unlock_all: bool) -> Self {
        let dates = entries
            .iter()
            .map(|e| NaiveDate::from_ymd_opt(e.year?, e.month?, e.day?))
            .collect();
        Self {
            dates,
            force_unlock_all,
        }
    }

    pub fn force_unlock_all(&self) -> bool {
        self.force_unlock_all
    }

    /// Release day configured for `index`, if it is a real calendar date.
    pub fn date_for(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).copied().flatten()
    }

    /// Midnight of the release day in `tz`.
    pub fn unlock_instant<Tz: TimeZone>(&self, index: usize, tz: &Tz) -> DateTime<Tz> {
        let day = self.date_for(index).unwrap_or_else(locked_forever_date);
        local_midnight(day, tz)
    }

    /// Resolve the lock state of `index` at `now`.
    ///
    /// The boundary is inclusive: a track unlocks exactly at its midnight.
    pub fn resolve<Tz: TimeZone>(&self, index: usize, now: &DateTime<Tz>) -> Resolution<Tz> {
        let unlock_at = self.unlock_instant(index, &now.timezone());
        let unlocked = self.force_unlock_all || *now >= unlock_at;
        Resolution {
            unlocked,
            unlock_at,
        }
    }

    /// First index in `0..track_count` that is still locked at `now`.
    pub fn next_locked<Tz: TimeZone>(
        &self,
        track_count: usize,
        now: &DateTime<Tz>,
    ) -> Option<(usize, DateTime<Tz>)> {
        (0..track_count).find_map(|i| {
            let r = self.resolve(i, now);
            (!r.unlocked).then_some((i, r.unlock_at))
        })
    }
}

fn local_midnight<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let naive = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        // Midnight skipped by a DST jump: fall back to the UTC reading.
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}
