use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Screen};
use crate::config;
use crate::playback::{Advance, AlbumPlay, MediaResource, SingleToggle};
use crate::runtime::startup::Session;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// When the countdown line was last recomputed.
    last_tick: Option<Instant>,
}

/// Main terminal event loop: handles input, UI drawing, duration probes and
/// track-end detection. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    session: &mut Session,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let notice_for = Duration::from_millis(settings.ui.notice_ms);
    let tick_every = Duration::from_millis(settings.ui.countdown_tick_ms);

    loop {
        let at = Instant::now();
        let now = Local::now();

        if session.app.screen == Screen::Album {
            render_sync(session, now);
        }

        let applied = session.durations.poll();
        if applied > 0 {
            tracing::debug!(
                applied,
                pending = session.durations.pending_count(),
                probes = session.durations.probes_started(),
                "durations updated"
            );
        }

        for file_id in session.deck.drain_ended() {
            let advance =
                session
                    .controller
                    .on_track_ended(&file_id, &session.app.album, &now, &mut session.deck);
            match advance {
                Advance::Next(play) => {
                    tracing::debug!(cursor = ?session.controller.cursor(), "album advanced");
                    report_album_play(&mut session.app, play, notice_for)
                }
                Advance::Finished => tracing::info!("album finished"),
                Advance::NotQueued => {
                    tracing::debug!(file = %file_id, "ended track is not in the album queue")
                }
            }
        }

        if session.controller.retry_pending() {
            if let Some(play) =
                session
                    .controller
                    .run_due_retry(at, &session.app.album, &now, &mut session.deck)
            {
                report_album_play(&mut session.app, play, notice_for);
            }
        }
        debug_assert!(session.deck.playing_count() <= 1, "two tracks playing at once");

        if state.last_tick.is_none_or(|t| at.duration_since(t) >= tick_every) {
            session.app.countdown = session.countdown.tick(&session.app.album, &now);
            state.last_tick = Some(at);
        }

        session.app.apply_durations(&session.durations);
        session.app.expire_notice(at);
        let elapsed = active_position(session);
        let playback = session.controller.state(&session.deck);
        session.app.set_playback(playback, elapsed);

        terminal.draw(|f| {
            ui::draw(
                f,
                &session.app,
                &session.durations,
                &settings.ui,
                &settings.controls,
            )
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let quit = match session.app.screen {
                    Screen::Gate => handle_gate_key(key, session),
                    Screen::Album => handle_album_key(key, settings, session, notice_for),
                };
                if quit {
                    session.controller.stop_all(&mut session.deck);
                    return Ok(());
                }
            }
        }
    }
}

/// Mirror the current schedule into the UI: refresh row views, create players
/// for unlocked rows and start their duration probes.
fn render_sync(session: &mut Session, now: DateTime<Local>) {
    session.app.refresh_views(now);

    let unlocked: Vec<String> = session
        .app
        .views
        .iter()
        .filter(|v| v.unlocked)
        .map(|v| v.file_id.clone())
        .collect();

    for file_id in unlocked {
        if session.render_player(&file_id) {
            tracing::debug!(file = %file_id, "player rendered");
        }
        if session.durations.get(&file_id).is_none() && !session.durations.is_pending(&file_id) {
            let id = file_id.clone();
            session.durations.ensure_duration(&file_id, move |d| {
                tracing::debug!(file = %id, duration = %d.label, "duration ready");
            });
        }
    }
}

fn active_position(session: &Session) -> Duration {
    session
        .controller
        .active()
        .and_then(|id| session.deck.get(id))
        .map_or(Duration::ZERO, |r| r.position())
}

fn report_album_play(app: &mut App, play: AlbumPlay, notice_for: Duration) {
    match play {
        AlbumPlay::NothingUnlocked => app.notify("No tracks unlocked yet.", notice_for),
        AlbumPlay::Failed { error, .. } => {
            app.notify(format!("Could not play audio: {error}"), notice_for)
        }
        AlbumPlay::Started { .. } | AlbumPlay::RenderPending { .. } | AlbumPlay::Abandoned { .. } => {}
    }
}

fn report_single(app: &mut App, toggle: SingleToggle, notice_for: Duration) {
    match toggle {
        SingleToggle::Missing => app.notify("This track is still locked.", notice_for),
        SingleToggle::Failed(error) => {
            app.notify(format!("Could not play audio: {error}"), notice_for)
        }
        SingleToggle::Started | SingleToggle::Paused => {}
    }
}

/// Handle a key on the password screen. Returns true when the app should quit.
fn handle_gate_key(key: KeyEvent, session: &mut Session) -> bool {
    match key.code {
        KeyCode::Esc => return true,
        KeyCode::Enter => match session.gate.attempt(&session.app.password_input) {
            Ok(()) => session.app.open_album(),
            Err(e) => session.app.reject_password(e.to_string()),
        },
        KeyCode::Backspace => session.app.pop_password_char(),
        KeyCode::Char(c) if !c.is_control() => session.app.push_password_char(c),
        _ => {}
    }
    false
}

/// Handle a key on the album screen. Returns true when the app should quit.
fn handle_album_key(
    key: KeyEvent,
    settings: &config::Settings,
    session: &mut Session,
    notice_for: Duration,
) -> bool {
    let now = Local::now();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => session.app.next(),
        KeyCode::Char('k') | KeyCode::Up => session.app.prev(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let Some(file_id) = session.app.selected_view().map(|v| v.file_id.clone()) else {
                return false;
            };
            let toggle = session.controller.play_single(
                &file_id,
                &session.app.album,
                &now,
                &mut session.deck,
            );
            report_single(&mut session.app, toggle, notice_for);
        }
        KeyCode::Char('a') => {
            let play = session
                .controller
                .play_album(&session.app.album, &now, &mut session.deck);
            report_album_play(&mut session.app, play, notice_for);
        }
        KeyCode::Char('p') => session.controller.pause_album(&mut session.deck),
        KeyCode::Char('H') => {
            let step = Duration::from_secs(settings.controls.scrub_seconds);
            let to = active_position(session).saturating_sub(step);
            scrub_to(session, to, notice_for);
        }
        KeyCode::Char('L') => {
            let step = Duration::from_secs(settings.controls.scrub_seconds);
            let mut to = active_position(session) + step;
            if let Some(total) = active_length(session) {
                to = to.min(total);
            }
            scrub_to(session, to, notice_for);
        }
        KeyCode::Char(c @ '0'..='9') => {
            if let (Some(total), Some(tenths)) = (active_length(session), c.to_digit(10)) {
                scrub_to(session, total.mul_f64(f64::from(tenths) / 10.0), notice_for);
            }
        }
        _ => {}
    }
    false
}

fn active_length(session: &Session) -> Option<Duration> {
    session
        .controller
        .active()
        .and_then(|id| session.durations.length(id))
}

fn scrub_to(session: &mut Session, to: Duration, notice_for: Duration) {
    if let Err(e) = session.controller.scrub(&mut session.deck, to) {
        tracing::warn!(error = %e, "scrub failed");
        session.app.notify(format!("Could not seek: {e}"), notice_for);
    }
}
