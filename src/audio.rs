//! rodio-backed media resources.
//!
//! Each unlocked track gets a `SinkResource` on the shared output stream's
//! mixer. All control happens on the event loop thread; rodio mixes on its
//! own output thread.

mod output;
mod resource;
mod sink;

pub use output::open_output;
pub use resource::SinkResource;
