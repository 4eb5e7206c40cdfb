//! Metadata probes: read a track's length without decoding it.

use std::path::PathBuf;
use std::time::Duration;

use lofty::file::AudioFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to read metadata of {path:?}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("probe panicked: {0}")]
    Panicked(String),

    #[error("could not start probe worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Capability that yields a media file's duration.
///
/// Implementations may block; the cache calls them from worker threads.
pub trait MetadataProbe: Send + Sync + 'static {
    fn probe(&self, file_id: &str) -> Result<Duration, ProbeError>;
}

/// Reads audio properties with `lofty`, resolving file ids against `media_dir`.
pub struct LoftyProbe {
    media_dir: PathBuf,
}

impl LoftyProbe {
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
        }
    }
}

impl MetadataProbe for LoftyProbe {
    fn probe(&self, file_id: &str) -> Result<Duration, ProbeError> {
        let path = self.media_dir.join(file_id);
        let tagged = lofty::read_from_path(&path).map_err(|e| ProbeError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(tagged.properties().duration())
    }
}
