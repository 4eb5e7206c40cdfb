//! Password gate shown before the album.
//!
//! A correct password writes a small flag file so later launches on the same
//! machine skip the prompt.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Fixed file name of the "unlocked on this device" flag.
pub const FLAG_FILE_NAME: &str = "album_ok";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Wrong password.")]
    WrongPassword,
}

pub struct Gate {
    password: String,
    flag_path: Option<PathBuf>,
}

impl Gate {
    /// `state_dir` holds the flag file; `None` means success is not remembered.
    pub fn new(password: &str, state_dir: Option<PathBuf>) -> Self {
        Self {
            password: normalize(password),
            flag_path: state_dir.map(|d| d.join(FLAG_FILE_NAME)),
        }
    }

    /// Whether the prompt can be skipped: no password configured, or a previous
    /// success was remembered.
    pub fn is_open(&self) -> bool {
        self.password.is_empty() || self.is_remembered()
    }

    pub fn is_remembered(&self) -> bool {
        self.flag_path
            .as_ref()
            .and_then(|p| fs::read_to_string(p).ok())
            .is_some_and(|s| s.trim() == "1")
    }

    /// Check `input` (trimmed, case-insensitive) and remember a success.
    pub fn attempt(&self, input: &str) -> Result<(), GateError> {
        if normalize(input) != self.password {
            tracing::info!("gate: wrong password");
            return Err(GateError::WrongPassword);
        }
        tracing::info!("gate: unlocked");
        self.remember();
        Ok(())
    }

    fn remember(&self) {
        let Some(path) = self.flag_path.as_ref() else {
            return;
        };
        let written = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::write(path, "1"));
        if let Err(e) = written {
            tracing::warn!(path = %path.display(), error = %e, "could not persist gate flag");
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
