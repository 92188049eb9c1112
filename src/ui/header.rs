//! Header Component
//!
//! Displays the current view, data source and the actions available for
//! the selected row.

use crate::app::App;
use crate::resource::ResourceKind;
use crate::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" tscw v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    // Row 1: view tabs
    let mut tabs = vec![Span::styled(" View: ", Style::default().fg(Color::DarkGray))];
    for (idx, kind) in ResourceKind::ALL.iter().enumerate() {
        let style = if *kind == app.view {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tabs.push(Span::styled(
            format!("{}:{} ", idx + 1, crate::resource::get_resource(*kind).display_name),
            style,
        ));
    }
    f.render_widget(Paragraph::new(Line::from(tabs)), rows[0]);

    // Row 2: partitions and count
    let resource = app.current_resource();
    let partitions = app.fetcher.partitions(app.view);
    let partitions_text = if partitions.is_empty() {
        "none".to_string()
    } else {
        partitions.join(", ")
    };
    let resource_info = Line::from(vec![
        Span::styled(
            format!(" {}s: ", resource.partition_label),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(partitions_text, Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled("Count: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}", app.filtered_items.len()),
            Style::default().fg(Color::White),
        ),
        if app.items.len() != app.filtered_items.len() {
            Span::styled(
                format!(" (filtered from {})", app.items.len()),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw("")
        },
    ]);
    f.render_widget(Paragraph::new(resource_info), rows[1]);

    // Row 3: actions of the selected row
    let action_hints: Vec<Span> = app
        .available_actions()
        .into_iter()
        .filter_map(|a| {
            a.shortcut.as_ref().map(|s| {
                Span::styled(
                    format!(" [{}]{} ", s, a.display_name),
                    if a.destructive {
                        Style::default().fg(Color::Red)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    },
                )
            })
        })
        .collect();

    let actions_line = if action_hints.is_empty() {
        Line::from(Span::raw(""))
    } else {
        let mut spans = vec![Span::styled(
            " Actions:",
            Style::default().fg(Color::DarkGray),
        )];
        spans.extend(action_hints);
        Line::from(spans)
    };
    f.render_widget(Paragraph::new(actions_line), rows[2]);

    // Row 4: Help hint
    let mut help = vec![Span::styled(
        " ?:help  /:filter  Tab:view  s:namespace  N:notifications  q:quit",
        Style::default().fg(Color::DarkGray),
    )];
    if app.readonly {
        help.push(Span::styled(
            "  [READ-ONLY]",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(help)), rows[3]);
}
