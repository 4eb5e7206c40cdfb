//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the gate and album screens using
//! `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Screen};
use crate::config::{ControlsSettings, UiSettings};
use crate::durations::{DurationCache, format_elapsed};
use crate::playback::PlaybackState;

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter/space".to_string(), "play/pause song".to_string());
    map.insert("a".to_string(), "play album".to_string());
    map.insert("p".to_string(), "pause album".to_string());
    // H/L is filled dynamically from config.
    map.insert("0-9".to_string(), "seek to %".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = ["j/k", "enter/space", "a", "p", "H/L", "0-9", "q"];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_padded() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    durations: &DurationCache,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    match app.screen {
        Screen::Gate => draw_gate(frame, app, ui_settings),
        Screen::Album => draw_album(frame, app, durations, ui_settings, controls_settings),
    }
}

fn draw_gate(frame: &mut Frame, app: &App, ui_settings: &UiSettings) {
    let area = centered_rect_sized(48, 8, frame.area());
    let masked = "•".repeat(app.password_input.chars().count());

    let mut lines = vec![
        Line::from(app.album.title.as_str()).bold(),
        Line::from("Enter the password to continue."),
        Line::from(""),
        Line::from(format!("> {masked}")),
    ];
    if let Some(hint) = app.gate_hint.as_deref() {
        lines.push(Line::from(hint).italic());
    }

    let gate = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(ui_settings.header_text.as_str())
            .title_alignment(Alignment::Center)
            .title_bottom(" [enter] unlock | [esc] quit "),
    );
    frame.render_widget(gate, area);
}

fn draw_album(
    frame: &mut Frame,
    app: &App,
    durations: &DurationCache,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let mut header_lines = vec![
        Line::from(app.album.title.as_str()).bold(),
        Line::from(app.album.byline()),
    ];
    if !app.album.message.trim().is_empty() {
        header_lines.push(Line::from(app.album.message.as_str()).italic());
    }
    let header = Paragraph::new(header_lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(ui_settings.header_text.as_str())
                .title_alignment(Alignment::Center)
                .title_bottom(Line::from(app.countdown.as_str()).centered()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(header, chunks[0]);

    // Track list
    {
        let items: Vec<ListItem> = app
            .views
            .iter()
            .map(|view| {
                let marker = match &app.playback {
                    PlaybackState::Playing(id) if *id == view.file_id => " ▶".to_string(),
                    PlaybackState::Paused(id) if *id == view.file_id => " ⏸".to_string(),
                    _ => format!("{:>2}", view.index + 1),
                };
                let duration = view.display_duration.as_deref().unwrap_or("");
                let label = view.unlock_label(&app.rendered_at);

                let mut spans = vec![
                    Span::raw(format!("{marker}  ")),
                    Span::raw(view.title.clone()),
                    Span::raw("  "),
                    Span::raw(label).dim(),
                ];
                if view.unlocked {
                    spans.push(Span::raw(format!("  {duration}")));
                } else {
                    spans.push(Span::raw("  🔒"));
                }

                let line = Line::from(spans);
                if view.unlocked {
                    ListItem::new(line)
                } else {
                    ListItem::new(line).style(Style::default().add_modifier(Modifier::DIM))
                }
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if app.has_tracks() {
            state.select(Some(app.selected));
        }
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    // Position bar
    {
        let (title, ratio, label) = match app.active_file() {
            Some(id) => {
                let total = durations.length(id);
                let ratio = total
                    .filter(|t| !t.is_zero())
                    .map_or(0.0, |t| (app.elapsed.as_secs_f64() / t.as_secs_f64()).clamp(0.0, 1.0));
                let total_label = durations.display_label(id, true);
                let state = if matches!(app.playback, PlaybackState::Playing(_)) {
                    "playing"
                } else {
                    "paused"
                };
                let title = app
                    .views
                    .iter()
                    .find(|v| v.file_id == id)
                    .map_or_else(|| id.to_string(), |v| v.title.clone());
                (
                    format!(" {state}: {title} "),
                    ratio,
                    format!("{} / {}", format_elapsed(app.elapsed), total_label),
                )
            }
            None => (" stopped ".to_string(), 0.0, String::new()),
        };
        let gauge = Gauge::default()
            .block(Block::bordered().title(title))
            .gauge_style(Style::default().add_modifier(Modifier::BOLD))
            .ratio(ratio)
            .label(label);
        frame.render_widget(gauge, chunks[2]);
    }

    // Notification line
    if let Some(notice) = app.notice.as_ref() {
        let line = Paragraph::new(notice.text.as_str())
            .alignment(Alignment::Center)
            .slow_blink();
        frame.render_widget(line, chunks[3]);
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_padded()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
