//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the album, the current
//! track views, selection and the gate/notification text.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
