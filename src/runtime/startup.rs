use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rodio::mixer::Mixer;

use crate::album::{Album, Countdown};
use crate::app::App;
use crate::audio::SinkResource;
use crate::config;
use crate::durations::{DurationCache, LoftyProbe};
use crate::gate::Gate;
use crate::playback::{Deck, PlaybackController};

/// Everything the event loop owns for one run of the app.
pub struct Session {
    pub app: App,
    pub gate: Gate,
    pub durations: DurationCache,
    pub deck: Deck<SinkResource>,
    pub controller: PlaybackController,
    pub countdown: Countdown,
    media_dir: PathBuf,
    mixer: Option<Mixer>,
}

impl Session {
    /// Build the session from `settings`. `mixer` is `None` without an output
    /// device; the album still renders and playback reports the failure.
    pub fn new(settings: &config::Settings, mixer: Option<Mixer>) -> Self {
        let album = Album::from_settings(settings);
        let media_dir = settings.media_dir();
        tracing::info!(
            title = %album.title,
            tracks = album.len(),
            media_dir = %media_dir.display(),
            force_unlock_all = album.schedule.force_unlock_all(),
            "album loaded"
        );

        let gate = Gate::new(&settings.gate.password, config::state_dir());
        let mut app = App::new(album);
        if gate.is_open() {
            app.open_album();
        }

        Self {
            app,
            gate,
            durations: DurationCache::new(Arc::new(LoftyProbe::new(media_dir.clone()))),
            deck: Deck::new(),
            controller: PlaybackController::new(Duration::from_millis(
                settings.playback.render_retry_ms,
            )),
            countdown: Countdown::new(settings.ui.all_unlocked_text.clone()),
            media_dir,
            mixer,
        }
    }

    /// Create the player for a track that just became visible as unlocked.
    pub fn render_player(&mut self, file_id: &str) -> bool {
        if self.deck.contains(file_id) {
            return false;
        }
        self.deck.insert(SinkResource::new(
            file_id,
            self.media_dir.join(file_id),
            self.mixer.clone(),
        ))
    }
}
