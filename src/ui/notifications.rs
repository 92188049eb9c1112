//! Notifications history overlay
//!
//! A compact list of past fetches and actions, with the full provider
//! message of the selected entry underneath.

use crate::app::App;
use crate::notification::{Notification, NotificationStatus};
use crate::resource::{get_resource, ResourceKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use std::time::Duration;

const DETAIL_HEIGHT: u16 = 5;

fn status_color(status: &NotificationStatus) -> Color {
    match status {
        NotificationStatus::InProgress | NotificationStatus::Warning(_) => Color::Yellow,
        NotificationStatus::Success => Color::Green,
        NotificationStatus::Error(_) => Color::Red,
    }
}

/// "Containers" for a notification recorded against `containers`
fn kind_label(resource_type: &str) -> String {
    ResourceKind::from_key(resource_type)
        .map(|kind| get_resource(kind).display_name.clone())
        .unwrap_or_else(|| resource_type.to_string())
}

fn age(elapsed: Duration) -> String {
    match elapsed.as_secs() {
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m", s / 60),
        s => format!("{}h", s / 3600),
    }
}

fn row(notif: &Notification) -> Row<'static> {
    let color = status_color(&notif.status);
    Row::new(vec![
        Cell::from(format!(" {}", notif.status.icon())).style(Style::default().fg(color)),
        Cell::from(kind_label(&notif.resource_type)).style(Style::default().fg(Color::DarkGray)),
        Cell::from(notif.operation_type.display_name()),
        Cell::from(notif.resource_name.clone()),
        Cell::from(notif.duration_display()),
        Cell::from(age(notif.created_at.elapsed())),
    ])
}

/// Full message of the selected entry
fn detail_lines(notif: &Notification) -> Vec<Line<'static>> {
    let color = status_color(&notif.status);
    let outcome = match &notif.status {
        NotificationStatus::InProgress => "still running".to_string(),
        NotificationStatus::Success => format!("done in {}", notif.duration_display()),
        NotificationStatus::Warning(msg) | NotificationStatus::Error(msg) => msg.clone(),
    };

    vec![
        Line::from(vec![
            Span::styled(
                format!("{} {} ", notif.operation_type.display_name(), notif.resource_name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("({})", kind_label(&notif.resource_type)),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(outcome, Style::default().fg(color))),
    ]
}

pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup = Rect::new(
        area.x + area.width / 10,
        area.y + area.height / 8,
        area.width - area.width / 5,
        area.height - area.height / 4,
    );
    f.render_widget(Clear, popup);

    let history = &app.notification_manager.notifications;
    let running = app.notification_manager.in_progress_count();
    let title = match running {
        0 => format!(" Notifications ({}) ", history.len()),
        n => format!(" Notifications ({}, {} running) ", history.len(), n),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" j/k: move  c: clear  Esc: close ").centered());
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let Some(selected) = history.get(app.notifications_selected) else {
        let empty = Paragraph::new("Nothing has happened yet")
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        f.render_widget(empty, inner);
        return;
    };

    let panes = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(DETAIL_HEIGHT)])
        .split(inner);

    let widths = [
        Constraint::Length(3),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(5),
    ];
    let table = Table::new(history.iter().map(row), widths).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let mut state = TableState::default().with_selected(Some(app.notifications_selected));
    f.render_stateful_widget(table, panes[0], &mut state);

    let detail = Paragraph::new(detail_lines(selected))
        .block(Block::default().borders(Borders::TOP))
        .wrap(Wrap { trim: true });
    f.render_widget(detail, panes[1]);
}
