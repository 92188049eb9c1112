//! Help Overlay
//!
//! Shows keyboard shortcuts, including the current view's actions.

use super::centered_rect;
use crate::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn key(keys: &str, description: &str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", keys), Style::default().fg(color)),
        Span::raw(description.to_string()),
    ])
}

pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(70, 80, area);

    f.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Navigation"),
        key("j/k, ↑/↓", "Move up/down", Color::Yellow),
        key("gg", "Go to top", Color::Yellow),
        key("G", "Go to bottom", Color::Yellow),
        key("Ctrl+d/u", "Page down/up", Color::Yellow),
        Line::from(""),
        section("Views"),
        key("1-4, Tab", "Switch resource view", Color::Yellow),
        key("Enter/d", "View resource JSON", Color::Yellow),
        key("s", "Select namespace (containers)", Color::Yellow),
        key("N", "Notification history", Color::Yellow),
        key("R", "Refresh current view", Color::Yellow),
        key("/", "Filter, Esc clears", Color::Yellow),
        Line::from(""),
        section("Actions"),
    ];

    for action in &app.current_resource().actions {
        if let Some(shortcut) = &action.shortcut {
            let color = if action.destructive {
                Color::Red
            } else {
                Color::Yellow
            };
            help_text.push(key(shortcut, &action.display_name, color));
        }
    }

    help_text.extend([
        Line::from(""),
        key("?/Esc", "Close help", Color::Yellow),
        key("q", "Quit application", Color::Yellow),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    f.render_widget(paragraph, popup_area);
}
