use orbit_shared::MessageRole;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{ChatState, FailureReason, Submission};

pub fn render(f: &mut Frame, state: &ChatState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // conversation
            Constraint::Length(3), // input box
            Constraint::Length(1), // error line
        ])
        .split(f.area());

    render_chat(f, state, chunks[0]);
    render_input(f, state, chunks[1]);
    render_error(f, state, chunks[2]);
}

fn render_chat(f: &mut Frame, state: &ChatState, area: Rect) {
    let mut all_lines: Vec<Line> = Vec::new();

    let (status_text, status_color) = match state.submission() {
        Submission::Idle => ("● Ready".to_string(), Color::Green),
        Submission::Pending => ("● Waiting for Orbit...".to_string(), Color::Yellow),
        Submission::Succeeded => ("● Reply received".to_string(), Color::Green),
        Submission::Failed(FailureReason::Status(code)) => {
            (format!("● Failed (HTTP {})", code), Color::Red)
        }
        Submission::Failed(FailureReason::Network) => ("● Failed (network)".to_string(), Color::Red),
        Submission::Failed(FailureReason::Malformed) => {
            ("● Failed (bad response)".to_string(), Color::Red)
        }
    };
    all_lines.push(Line::from(Span::styled(
        status_text,
        Style::default().fg(status_color),
    )));
    all_lines.push(Line::from(""));

    for msg in state.messages() {
        let (prefix, style) = match msg.role {
            MessageRole::User => ("You", Style::default().fg(Color::Cyan)),
            MessageRole::Assistant => ("Orbit", Style::default().fg(Color::Green)),
        };

        all_lines.push(Line::from(Span::styled(
            format!("{}:", prefix),
            style.add_modifier(Modifier::BOLD),
        )));
        for line in msg.content.lines() {
            all_lines.push(Line::from(Span::styled(line, style)));
        }
        all_lines.push(Line::from(""));
    }

    if state.is_loading() {
        all_lines.push(Line::from(Span::styled(
            "●●●",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // scroll_offset counts rendered rows up from the bottom, after wrapping
    let chat = Paragraph::new(all_lines).wrap(Wrap { trim: false });
    let total_rows = chat.line_count(area.width);
    let max_scroll = total_rows.saturating_sub(area.height as usize);
    let start_row = max_scroll - state.scroll_offset().min(max_scroll);
    let start_row = u16::try_from(start_row).unwrap_or(u16::MAX);

    f.render_widget(chat.scroll((start_row, 0)), area);
}

fn render_input(f: &mut Frame, state: &ChatState, area: Rect) {
    let inner_width = area.width.saturating_sub(2);
    let (text, cursor_col, style) = if state.draft().is_empty() {
        (state.placeholder(), 0, Style::default().fg(Color::DarkGray))
    } else {
        let (visible, cursor_col) = visible_draft(state.draft(), state.cursor(), inner_width);
        (visible, cursor_col, Style::default())
    };

    let border_color = if state.is_loading() {
        Color::DarkGray
    } else {
        Color::White
    };

    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Message (Enter to send, Ctrl-Q to quit, ↑↓ to scroll)")
            .border_style(Style::default().fg(border_color)),
    );

    f.render_widget(input, area);

    let cursor_x = area.x + 1 + cursor_col.min(inner_width.saturating_sub(1));
    let cursor_y = area.y + 1;
    f.set_cursor_position((cursor_x, cursor_y));
}

/// Slices the draft so the cursor stays inside a single row of `width`
/// columns. Returns the visible text and the cursor's display column in it.
fn visible_draft(draft: &str, cursor: usize, width: u16) -> (&str, u16) {
    let width = width as usize;
    let cursor_byte = draft
        .char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(draft.len());

    let mut start = 0;
    // keep one free cell for the cursor itself
    while start < cursor_byte && Span::raw(&draft[start..cursor_byte]).width() >= width.max(1) {
        start += draft[start..].chars().next().map_or(1, char::len_utf8);
    }

    let cursor_col = Span::raw(&draft[start..cursor_byte]).width();
    (&draft[start..], u16::try_from(cursor_col).unwrap_or(u16::MAX))
}

fn render_error(f: &mut Frame, state: &ChatState, area: Rect) {
    if let Some(error) = state.error() {
        let line = Paragraph::new(Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )));
        f.render_widget(line, area);
    }
}
