//! Album module: configured tracks, their release schedule and everything
//! derived from it at a given instant (views, queue, countdown).

mod countdown;
mod model;
mod queue;
mod schedule;

pub use countdown::{Countdown, format_countdown};
pub use model::{Album, Track, TrackView};
pub use queue::AlbumQueue;
pub use schedule::{Resolution, Schedule, locked_forever_date};
