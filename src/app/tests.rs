use super::*;
use crate::album::Album;
use crate::config::{Settings, TrackEntry, UnlockDate};
use crate::durations::{DurationCache, LoftyProbe, PENDING_DURATION};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn app_with(titles: &[&str]) -> App {
    let mut s = Settings::default();
    s.album.tracks = titles
        .iter()
        .enumerate()
        .map(|(i, t)| TrackEntry {
            file: format!("{i}.mp3"),
            revealed_name: t.to_string(),
        })
        .collect();
    s.schedule.force_unlock_all = true;
    App::new(Album::from_settings(&s))
}

#[test]
fn new_app_starts_on_gate_with_views_for_every_track() {
    let app = app_with(&["Alpha", "Beta", "Gamma"]);
    assert_eq!(app.screen, Screen::Gate);
    assert_eq!(app.views.len(), 3);
    assert_eq!(app.selected_view().unwrap().title, "Alpha");
}

#[test]
fn next_prev_wrap_around() {
    let mut app = app_with(&["Alpha", "Beta", "Gamma"]);
    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.next();
    assert_eq!(app.selected, 1);
}

#[test]
fn next_prev_on_empty_album_do_nothing() {
    let mut app = app_with(&[]);
    app.next();
    app.prev();
    assert_eq!(app.selected, 0);
    assert!(!app.has_tracks());
    assert!(app.selected_view().is_none());
}

#[test]
fn rejected_password_clears_input_and_shows_hint() {
    let mut app = app_with(&["Alpha"]);
    for c in "fiv".chars() {
        app.push_password_char(c);
    }
    app.pop_password_char();
    assert_eq!(app.password_input, "fi");

    app.reject_password("Wrong password.");
    assert!(app.password_input.is_empty());
    assert_eq!(app.gate_hint.as_deref(), Some("Wrong password."));

    app.push_password_char('x');
    assert!(app.gate_hint.is_none());

    app.open_album();
    assert_eq!(app.screen, Screen::Album);
    assert!(app.password_input.is_empty());
}

#[test]
fn notice_expires_after_its_time() {
    let mut app = app_with(&["Alpha"]);
    app.notify("Could not play audio.", Duration::from_millis(100));

    app.expire_notice(Instant::now());
    assert!(app.notice.is_some());

    app.expire_notice(Instant::now() + Duration::from_secs(1));
    assert!(app.notice.is_none());
}

#[test]
fn active_file_follows_playback_snapshot() {
    let mut app = app_with(&["Alpha"]);
    assert_eq!(app.active_file(), None);

    app.set_playback(
        crate::playback::PlaybackState::Paused("0.mp3".to_string()),
        Duration::from_secs(12),
    );
    assert_eq!(app.active_file(), Some("0.mp3"));
    assert_eq!(app.elapsed, Duration::from_secs(12));
}

#[test]
fn durations_fill_unlocked_rows_only() {
    let mut s = Settings::default();
    s.album.tracks = ["Alpha", "Beta"]
        .iter()
        .enumerate()
        .map(|(i, t)| TrackEntry {
            file: format!("{i}.mp3"),
            revealed_name: t.to_string(),
        })
        .collect();
    s.schedule.dates = vec![UnlockDate::new(2000, 1, 1), UnlockDate::new(2999, 1, 1)];
    let mut app = App::new(Album::from_settings(&s));
    assert!(app.views.iter().all(|v| v.display_duration.is_none()));

    // Nothing has been probed yet, so the unlocked row reads as pending.
    let durations = DurationCache::new(Arc::new(LoftyProbe::new(".")));
    app.apply_durations(&durations);
    assert_eq!(app.views[0].display_duration.as_deref(), Some(PENDING_DURATION));
    assert_eq!(app.views[1].display_duration, None);
}
