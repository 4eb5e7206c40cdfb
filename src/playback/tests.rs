use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone, Utc};

use super::*;
use crate::album::Album;
use crate::config::{Settings, TrackEntry, UnlockDate};

#[derive(Debug)]
struct FakeResource {
    file_id: String,
    playing: bool,
    ended: bool,
    fail: bool,
    position: Duration,
}

impl FakeResource {
    fn new(file_id: &str) -> Self {
        Self {
            file_id: file_id.to_string(),
            playing: false,
            ended: false,
            fail: false,
            position: Duration::ZERO,
        }
    }

    fn broken(file_id: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(file_id)
        }
    }

    fn finish(&mut self) {
        self.playing = false;
        self.ended = true;
    }
}

impl MediaResource for FakeResource {
    fn file_id(&self) -> &str {
        &self.file_id
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.fail {
            return Err(PlaybackError::NoOutput);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn take_ended(&mut self) -> bool {
        std::mem::take(&mut self.ended)
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn seek(&mut self, to: Duration) -> Result<(), PlaybackError> {
        self.position = to;
        Ok(())
    }
}

/// Four tracks; index 2 is released weeks after the others.
fn album() -> Album {
    let mut s = Settings::default();
    s.album.tracks = (1..=4)
        .map(|n| TrackEntry {
            file: format!("{n:02}.mp3"),
            revealed_name: format!("Song {n}"),
        })
        .collect();
    s.schedule.dates = vec![
        UnlockDate::new(2026, 2, 6),
        UnlockDate::new(2026, 2, 8),
        UnlockDate::new(2026, 3, 1),
        UnlockDate::new(2026, 2, 8),
    ];
    Album::from_settings(&s)
}

fn feb(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, day, hour, 0, 0).unwrap()
}

fn deck_of(ids: &[&str]) -> Deck<FakeResource> {
    let mut deck = Deck::new();
    for id in ids {
        deck.insert(FakeResource::new(id));
    }
    deck
}

fn controller() -> PlaybackController {
    PlaybackController::new(Duration::from_millis(150))
}

#[test]
fn play_album_starts_at_first_unlocked_track() {
    let album = album();
    let mut deck = deck_of(&["01.mp3", "02.mp3", "04.mp3"]);
    let mut pc = controller();

    let out = pc.play_album(&album, &feb(9, 0), &mut deck);
    assert!(matches!(out, AlbumPlay::Started { ref file_id } if file_id == "01.mp3"));
    assert_eq!(pc.cursor(), Some(0));
    assert_eq!(pc.state(&deck), PlaybackState::Playing("01.mp3".to_string()));
}

#[test]
fn play_album_with_nothing_unlocked_stays_idle() {
    let album = album();
    let mut deck = deck_of(&["01.mp3"]);
    let mut pc = controller();

    let out = pc.play_album(&album, &feb(1, 0), &mut deck);
    assert!(matches!(out, AlbumPlay::NothingUnlocked));
    assert_eq!(pc.state(&deck), PlaybackState::Idle);
    assert_eq!(deck.playing_count(), 0);
}

#[test]
fn ended_track_advances_past_locked_track() {
    let album = album();
    let mut deck = deck_of(&["01.mp3", "02.mp3", "04.mp3"]);
    let mut pc = controller();
    let now = feb(9, 12);

    assert!(matches!(
        pc.play_single("02.mp3", &album, &now, &mut deck),
        SingleToggle::Started
    ));
    assert_eq!(pc.cursor(), Some(1));

    deck.get_mut("02.mp3").unwrap().finish();
    let ended = deck.drain_ended();
    assert_eq!(ended, vec!["02.mp3".to_string()]);

    let adv = pc.on_track_ended(&ended[0], &album, &now, &mut deck);
    assert!(matches!(adv, Advance::Next(AlbumPlay::Started { ref file_id }) if file_id == "04.mp3"));
    assert_eq!(pc.cursor(), Some(2));
    assert_eq!(pc.active(), Some("04.mp3"));
    assert_eq!(deck.playing_count(), 1);
}

#[test]
fn last_track_ending_returns_to_idle() {
    let album = album();
    let mut deck = deck_of(&["01.mp3", "02.mp3", "04.mp3"]);
    let mut pc = controller();
    let now = feb(9, 12);

    pc.play_single("04.mp3", &album, &now, &mut deck);
    deck.get_mut("04.mp3").unwrap().finish();

    let adv = pc.on_track_ended("04.mp3", &album, &now, &mut deck);
    assert!(matches!(adv, Advance::Finished));
    assert_eq!(pc.cursor(), None);
    assert_eq!(pc.active(), None);
    assert_eq!(pc.state(&deck), PlaybackState::Idle);
    assert_eq!(deck.playing_count(), 0);
}

#[test]
fn release_during_playback_is_picked_up_on_track_end() {
    let album = album();
    let mut deck = deck_of(&["01.mp3", "02.mp3", "04.mp3"]);
    let mut pc = controller();

    pc.play_single("02.mp3", &album, &feb(27, 23), &mut deck);
    deck.get_mut("02.mp3").unwrap().finish();

    // Track 3 unlocked at midnight while track 2 was playing; its player
    // has not been rendered yet.
    let after_midnight = Utc.with_ymd_and_hms(2026, 3, 1, 0, 1, 0).unwrap();
    let adv = pc.on_track_ended("02.mp3", &album, &after_midnight, &mut deck);
    assert!(matches!(adv, Advance::Next(AlbumPlay::RenderPending { ref file_id }) if file_id == "03.mp3"));
    assert_eq!(pc.cursor(), Some(2));

    deck.insert(FakeResource::new("03.mp3"));
    let out = pc
        .run_due_retry(
            Instant::now() + Duration::from_secs(1),
            &album,
            &after_midnight,
            &mut deck,
        )
        .unwrap();
    assert!(matches!(out, AlbumPlay::Started { ref file_id } if file_id == "03.mp3"));
}

#[test]
fn ended_track_outside_queue_stops_quietly() {
    let album = album();
    let mut deck = deck_of(&["01.mp3"]);
    let mut pc = controller();

    let adv = pc.on_track_ended("03.mp3", &album, &feb(9, 0), &mut deck);
    assert!(matches!(adv, Advance::NotQueued));
    assert_eq!(pc.cursor(), None);
}

#[test]
fn starting_any_track_pauses_every_other_one() {
    let album = album();
    let mut deck = deck_of(&["01.mp3", "02.mp3", "04.mp3"]);
    let mut pc = controller();
    let now = feb(9, 0);

    pc.play_album(&album, &now, &mut deck);
    assert_eq!(deck.playing_count(), 1);

    pc.play_single("04.mp3", &album, &now, &mut deck);
    assert_eq!(deck.playing_count(), 1);
    assert!(!deck.get("01.mp3").unwrap().is_playing());
    assert!(deck.get("04.mp3").unwrap().is_playing());

    // Album play resumes from the manually chosen track.
    pc.play_album(&album, &now, &mut deck);
    assert_eq!(deck.playing_count(), 1);
    assert_eq!(pc.active(), Some("04.mp3"));
}

#[test]
fn play_single_toggles_and_pause_album_pauses_active() {
    let album = album();
    let mut deck = deck_of(&["01.mp3", "02.mp3"]);
    let mut pc = controller();
    let now = feb(9, 0);

    assert!(matches!(pc.play_single("02.mp3", &album, &now, &mut deck), SingleToggle::Started));
    assert!(matches!(pc.play_single("02.mp3", &album, &now, &mut deck), SingleToggle::Paused));
    assert_eq!(pc.state(&deck), PlaybackState::Paused("02.mp3".to_string()));

    pc.play_single("02.mp3", &album, &now, &mut deck);
    pc.pause_album(&mut deck);
    assert_eq!(deck.playing_count(), 0);

    assert!(matches!(pc.play_single("03.mp3", &album, &now, &mut deck), SingleToggle::Missing));
}

#[test]
fn failed_start_is_reported_and_keeps_cursor() {
    let album = album();
    let mut deck: Deck<FakeResource> = Deck::new();
    deck.insert(FakeResource::broken("01.mp3"));
    deck.insert(FakeResource::new("02.mp3"));
    let mut pc = controller();
    let now = feb(9, 0);

    let out = pc.play_single("01.mp3", &album, &now, &mut deck);
    assert!(matches!(out, SingleToggle::Failed(PlaybackError::NoOutput)));
    assert_eq!(pc.cursor(), None);
    assert_eq!(deck.playing_count(), 0);
    // A track that never started is not reported as paused.
    assert_eq!(pc.active(), None);
    assert_eq!(pc.state(&deck), PlaybackState::Idle);

    let out = pc.play_album(&album, &now, &mut deck);
    assert!(matches!(out, AlbumPlay::Failed { .. }));
    assert_eq!(deck.playing_count(), 0);
    assert_eq!(pc.state(&deck), PlaybackState::Idle);
}

#[test]
fn failed_start_keeps_previous_track_as_active() {
    let album = album();
    let mut deck: Deck<FakeResource> = Deck::new();
    deck.insert(FakeResource::new("01.mp3"));
    deck.insert(FakeResource::broken("02.mp3"));
    let mut pc = controller();
    let now = feb(9, 0);

    assert!(matches!(pc.play_single("01.mp3", &album, &now, &mut deck), SingleToggle::Started));
    let out = pc.play_single("02.mp3", &album, &now, &mut deck);
    assert!(matches!(out, SingleToggle::Failed(_)));
    assert_eq!(pc.state(&deck), PlaybackState::Paused("01.mp3".to_string()));
}

/// Collects the message of every `WARN` event.
#[derive(Clone, Default)]
struct WarnCapture(Arc<Mutex<Vec<String>>>);

struct MessageVisitor(Option<String>);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if *event.metadata().level() != tracing::Level::WARN {
            return;
        }
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.0.lock().unwrap().push(message);
        }
    }
}

#[test]
fn failed_starts_are_logged_as_warnings() {
    use tracing_subscriber::layer::SubscriberExt;

    let capture = WarnCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let album = album();
        let mut deck: Deck<FakeResource> = Deck::new();
        deck.insert(FakeResource::broken("01.mp3"));
        let mut pc = controller();
        let now = feb(9, 0);

        pc.play_single("01.mp3", &album, &now, &mut deck);
        pc.play_album(&album, &now, &mut deck);
    });

    let warnings = capture.0.lock().unwrap();
    assert_eq!(*warnings, vec!["playback failed".to_string(); 2]);
}

#[test]
fn missing_player_is_retried_exactly_once() {
    let album = album();
    let mut deck: Deck<FakeResource> = Deck::new();
    let mut pc = controller();
    let now = feb(9, 0);

    let before = Instant::now();
    let out = pc.play_album(&album, &now, &mut deck);
    assert!(matches!(out, AlbumPlay::RenderPending { .. }));
    assert!(pc.retry_pending());

    // Not due yet.
    assert!(pc.run_due_retry(before, &album, &now, &mut deck).is_none());
    assert!(pc.retry_pending());

    let later = Instant::now() + Duration::from_secs(1);
    let out = pc.run_due_retry(later, &album, &now, &mut deck).unwrap();
    assert!(matches!(out, AlbumPlay::Abandoned { ref file_id } if file_id == "01.mp3"));
    assert!(!pc.retry_pending());
    assert!(pc.run_due_retry(later, &album, &now, &mut deck).is_none());
}

#[test]
fn scrub_seeks_only_the_active_resource() {
    let album = album();
    let mut deck = deck_of(&["01.mp3", "02.mp3"]);
    let mut pc = controller();

    pc.scrub(&mut deck, Duration::from_secs(9)).unwrap();
    assert_eq!(deck.get("01.mp3").unwrap().position(), Duration::ZERO);

    pc.play_single("02.mp3", &album, &feb(9, 0), &mut deck);
    pc.scrub(&mut deck, Duration::from_secs(30)).unwrap();
    assert_eq!(deck.get("02.mp3").unwrap().position(), Duration::from_secs(30));
    assert_eq!(deck.get("01.mp3").unwrap().position(), Duration::ZERO);
}
