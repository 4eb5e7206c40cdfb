//! Playback module: album sequencing over a deck of media resources.
//!
//! `PlaybackController` implements the album/single-track state machine,
//! `Deck` holds the resources the render layer materialized, and `types`
//! defines the `MediaResource` capability they implement.

mod controller;
mod deck;
mod types;

pub use controller::PlaybackController;
pub use deck::Deck;
pub use types::{Advance, AlbumPlay, MediaResource, PlaybackError, PlaybackState, SingleToggle};

#[cfg(test)]
mod tests;
