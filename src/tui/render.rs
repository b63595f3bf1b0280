use std::borrow::Cow;

use super::state::ViewState;
use crate::config::AvatarSide;
use crate::controller::{FeedPhase, FeedState};
use crate::feed::types::UserRecord;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const AVATAR_WIDTH: u16 = 6;

pub fn draw(f: &mut Frame, feed: &FeedState, view: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, feed, view, chunks[0]);
    draw_users(f, feed, view, chunks[1]);
    draw_selected(f, feed, view, chunks[2]);
    draw_status(f, view, chunks[3]);
    draw_footer(f, chunks[4]);
}

fn draw_header(f: &mut Frame, feed: &FeedState, view: &ViewState, area: Rect) {
    let ch = SPINNER_FRAMES[(view.spinner_frame as usize) % SPINNER_FRAMES.len()];
    let activity = match feed.phase() {
        FeedPhase::Refreshing => Span::styled(
            format!(" {} refreshing", ch),
            Style::default().fg(Color::Cyan),
        ),
        FeedPhase::Loading => Span::styled(
            format!(" {} loading", ch),
            Style::default().fg(Color::Cyan),
        ),
        FeedPhase::Idle => Span::styled(" idle", Style::default().fg(Color::DarkGray)),
    };

    let mut spans = vec![
        Span::raw(format!(" Users: {}", feed.len())),
        Span::styled(" |", Style::default().fg(Color::DarkGray)),
        activity,
    ];
    if view.pending_adds > 0 {
        spans.push(Span::styled(
            format!(" | adding {}", view.pending_adds),
            Style::default().fg(Color::Yellow),
        ));
    }

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", view.title),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_users(f: &mut Frame, feed: &FeedState, view: &ViewState, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    if feed.is_empty() {
        let msg = match feed.phase() {
            FeedPhase::Loading => "Loading users...",
            FeedPhase::Refreshing => "Refreshing...",
            FeedPhase::Idle => "No users. Press [r] to refresh or [a] to add one.",
        };
        let para = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(msg, Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(para, area);
        return;
    }

    let name_width = area.width.saturating_sub(AVATAR_WIDTH + 4) as usize;
    let rows: Vec<Row> = feed
        .records()
        .iter()
        .map(|r| user_row(r, view.avatar_side, name_width))
        .collect();

    let widths = match view.avatar_side {
        AvatarSide::Left => [Constraint::Length(AVATAR_WIDTH), Constraint::Min(0)],
        AvatarSide::Right => [Constraint::Min(0), Constraint::Length(AVATAR_WIDTH)],
    };

    let table = Table::new(rows, widths)
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut table_state = TableState::default().with_selected(Some(view.selected));
    f.render_stateful_widget(table, area, &mut table_state);
}

/// Avatar badge and name cell, ordered by the configured avatar side. Names
/// sit against the far edge from the avatar.
fn user_row(record: &UserRecord, side: AvatarSide, name_width: usize) -> Row<'static> {
    let full_name = record.full_name();
    let name = fit_width(&full_name, name_width).into_owned();
    let badge = Cell::from(Span::styled(
        format!(" {} ", initials(record)),
        Style::default().fg(Color::Black).bg(avatar_color(&record.id)),
    ));

    match side {
        AvatarSide::Left => Row::new(vec![
            badge,
            Cell::from(Line::from(name).alignment(Alignment::Right)),
        ]),
        AvatarSide::Right => Row::new(vec![
            Cell::from(Line::from(name).alignment(Alignment::Left)),
            badge,
        ]),
    }
}

fn draw_selected(f: &mut Frame, feed: &FeedState, view: &ViewState, area: Rect) {
    let line = match feed.records().get(view.selected) {
        Some(r) => {
            let avatar = if r.avatar_url.is_empty() { "(no avatar)" } else { r.avatar_url.as_str() };
            let text = format!(" #{} {}", r.id, avatar);
            let max_width = area.width as usize;
            Line::from(Span::styled(
                fit_width(&text, max_width).into_owned(),
                Style::default().fg(Color::DarkGray),
            ))
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_status(f: &mut Frame, view: &ViewState, area: Rect) {
    let line = match &view.status {
        Some(s) => {
            let color = match s.level {
                "WARN" => Color::Yellow,
                "ERROR" => Color::Red,
                _ => Color::Green,
            };
            Line::from(vec![
                Span::styled(format!(" {} [{}] ", s.time, s.level), Style::default().fg(color)),
                Span::raw(s.message.clone()),
            ])
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled("  [q]", Style::default().fg(Color::Yellow)),
        Span::raw("uit  "),
        Span::styled("[r]", Style::default().fg(Color::Yellow)),
        Span::raw("efresh  "),
        Span::styled("[a]", Style::default().fg(Color::Yellow)),
        Span::raw("dd  "),
        Span::styled("[j/k]", Style::default().fg(Color::Yellow)),
        Span::raw(" move  "),
        Span::styled("[g/G]", Style::default().fg(Color::Yellow)),
        Span::raw(" top/bottom  "),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Two-letter badge text, the way avatar widgets fall back when the image
/// is missing.
pub fn initials(record: &UserRecord) -> String {
    let out: String = [&record.first_name, &record.last_name]
        .iter()
        .filter_map(|part| part.trim().chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if out.is_empty() {
        "?".to_string()
    } else {
        out
    }
}

/// Stable per-user badge color.
fn avatar_color(id: &str) -> Color {
    const PALETTE: [Color; 6] = [
        Color::LightBlue,
        Color::LightGreen,
        Color::LightMagenta,
        Color::LightCyan,
        Color::LightYellow,
        Color::LightRed,
    ];
    let sum: usize = id.bytes().map(usize::from).sum();
    PALETTE[sum % PALETTE.len()]
}

/// Clip to `width` chars, ending in `…` when anything was cut.
fn fit_width(s: &str, width: usize) -> Cow<'_, str> {
    match s.char_indices().nth(width) {
        None => Cow::Borrowed(s),
        Some(_) if width == 0 => Cow::Borrowed(""),
        Some(_) => {
            let mut clipped: String = s.chars().take(width - 1).collect();
            clipped.push('…');
            Cow::Owned(clipped)
        }
    }
}
