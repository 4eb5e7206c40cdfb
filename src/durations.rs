//! Track durations: one-shot metadata probes and the cache in front of them.

mod cache;
mod probe;

pub use cache::{
    CachedDuration, DurationCache, PENDING_DURATION, UNKNOWN_DURATION, format_duration,
    format_elapsed,
};
pub use probe::{LoftyProbe, MetadataProbe, ProbeError};
