use std::path::PathBuf;
use std::time::Duration;

use rodio::Sink;
use rodio::mixer::Mixer;

use crate::playback::{MediaResource, PlaybackError};

use super::sink::create_sink;

/// A track player backed by a `rodio::Sink`.
///
/// The sink is created lazily on first play or seek, so rendering a row costs
/// nothing until the track is actually used.
pub struct SinkResource {
    file_id: String,
    path: PathBuf,
    mixer: Option<Mixer>,
    sink: Option<Sink>,
    /// Set while the sink is expected to be producing sound.
    running: bool,
}

impl SinkResource {
    pub fn new(file_id: impl Into<String>, path: PathBuf, mixer: Option<Mixer>) -> Self {
        Self {
            file_id: file_id.into(),
            path,
            mixer,
            sink: None,
            running: false,
        }
    }

    fn ensure_sink(&mut self) -> Result<&Sink, PlaybackError> {
        let mixer = self.mixer.as_ref().ok_or(PlaybackError::NoOutput)?;
        if self.sink.as_ref().is_none_or(|s| s.empty()) {
            self.sink = Some(create_sink(mixer, &self.path)?);
        }
        self.sink.as_ref().ok_or(PlaybackError::NoOutput)
    }
}

impl MediaResource for SinkResource {
    fn file_id(&self) -> &str {
        &self.file_id
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        self.ensure_sink()?.play();
        self.running = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        self.running = false;
    }

    fn is_playing(&self) -> bool {
        self.running && self.sink.as_ref().is_some_and(|s| !s.is_paused() && !s.empty())
    }

    fn take_ended(&mut self) -> bool {
        let ended = self.running && self.sink.as_ref().is_none_or(|s| s.empty());
        if ended {
            self.running = false;
            self.sink = None;
        }
        ended
    }

    fn position(&self) -> Duration {
        self.sink.as_ref().map_or(Duration::ZERO, |s| s.get_pos())
    }

    fn seek(&mut self, to: Duration) -> Result<(), PlaybackError> {
        self.ensure_sink()?
            .try_seek(to)
            .map_err(|e| PlaybackError::Seek(e.to_string()))
    }
}
