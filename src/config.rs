//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema (album, release schedule,
//! gate, playback and UI settings) and helpers to load it from disk.

mod load;
mod schema;

pub use load::{resolve_config_path, state_dir};
pub use schema::*;
