//! Terminal User Interface rendering module
//!
//! This module handles all UI rendering for tscw using the ratatui framework.
//! Resources are listed in a table with vim-style navigation, next to a
//! detail pane showing the selected row's metadata.
//!
//! # Architecture
//!
//! - [`splash`] - Startup splash screen
//! - `header` - Header bar with view, credentials mode and actions
//! - `help` - Help overlay showing keybindings
//! - `dialog` - Confirmation and warning dialogs
//! - `namespaces` - Namespace selector for the containers view
//! - `notifications` - Notification history panel
//!
//! # Virtual Scrolling
//!
//! The table rendering uses virtual scrolling for performance with large datasets.
//! Only visible rows are rendered, with a scrollbar indicating position.
//!
//! # JSON Highlighting
//!
//! The describe view provides syntax highlighting for JSON output:
//! - Keys in cyan
//! - Strings in green
//! - Numbers in light blue
//! - Booleans in magenta
//! - Null values in dark gray

mod dialog;
mod header;
mod help;
mod namespaces;
mod notifications;
pub mod splash;

use crate::app::{App, Mode, Resource};
use crate::notification::NotificationStatus;
use crate::resource::display::{self, Metadata};
use crate::resource::status::{self, StatusPresentation, Tint};
use crate::resource::{extract_json_value, ColumnDef, ColumnFormat};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Table, TableState, Wrap,
    },
    Frame,
};

pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Header (multi-line)
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Footer/crumb
        ])
        .split(f.area());

    header::render(f, app, chunks[0]);

    match app.mode {
        Mode::Describe => render_describe_view(f, app, chunks[1]),
        Mode::Logs => render_logs_view(f, app, chunks[1]),
        _ => render_main_content(f, app, chunks[1]),
    }

    render_crumb(f, app, chunks[2]);

    // Overlays
    match app.mode {
        Mode::Help => help::render(f, app),
        Mode::Confirm | Mode::Warning => dialog::render(f, app),
        Mode::Namespaces => namespaces::render(f, app, chunks[1]),
        Mode::Notifications => notifications::render(f, app),
        _ => {},
    }
}

fn tint_color(tint: Option<Tint>) -> Color {
    match tint {
        Some(Tint::Green) => Color::Green,
        Some(Tint::Red) => Color::Red,
        Some(Tint::Blue) => Color::Blue,
        None => Color::Gray,
    }
}

fn status_span(status: &StatusPresentation) -> Span<'static> {
    Span::styled(
        format!("{} {}", status.icon.glyph(), status.tooltip),
        Style::default().fg(tint_color(status.tint)),
    )
}

fn render_main_content(f: &mut Frame, app: &mut App, area: Rect) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    // If filter is active or has text, show filter input above table
    let show_filter = app.filter_active || !app.filter_text.is_empty();

    if show_filter {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(panes[0]);

        render_filter_bar(f, app, chunks[0]);
        render_dynamic_table(f, app, chunks[1]);
    } else {
        render_dynamic_table(f, app, panes[0]);
    }

    let (title, metadata) = match app.selected_item() {
        Some(item) => (format!(" {} ", item.name()), item.metadata()),
        None => (" Details ".to_string(), Metadata::new()),
    };
    render_metadata(f, &title, &metadata, panes[1]);
}

fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let cursor_style = if app.filter_active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let filter_display = if app.filter_active {
        format!("/{}_", app.filter_text)
    } else {
        format!("/{}", app.filter_text)
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(filter_display, cursor_style)]));
    f.render_widget(paragraph, area);
}

/// Render the resource table using virtual scrolling
fn render_dynamic_table(f: &mut Frame, app: &mut App, area: Rect) {
    let resource = app.current_resource();

    let title = {
        let count = app.filtered_items.len();
        let scope = match app.selected_namespace() {
            Some(ns) if app.view == crate::resource::ResourceKind::Containers => {
                format!("({})", ns.namespace.name)
            },
            _ => String::new(),
        };
        if app.filter_text.is_empty() {
            format!(" {}{}[{}] ", resource.display_name, scope, count)
        } else {
            format!(
                " {}{}[{}/{}] ",
                resource.display_name,
                scope,
                count,
                app.items.len()
            )
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if app.filtered_items.is_empty() {
        let msg = if app.loading {
            "Loading..."
        } else if app.error_message.is_some() {
            "Could not load resources"
        } else {
            "No resources"
        };
        let paragraph = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, inner_area);
        return;
    }

    // Calculate viewport - account for header row
    let visible_height = (inner_area.height as usize).saturating_sub(1);
    app.update_viewport(visible_height);
    app.ensure_visible();

    let total_items = app.filtered_items.len();
    let needs_scrollbar = total_items > visible_height;

    let table_area = if needs_scrollbar {
        Rect {
            width: inner_area.width.saturating_sub(1),
            ..inner_area
        }
    } else {
        inner_area
    };

    let range = app.visible_range();

    let header_cells: Vec<Cell> = resource
        .columns
        .iter()
        .map(|col| {
            Cell::from(format!(" {}", col.header)).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app.filtered_items[range.clone()]
        .iter()
        .filter_map(|idx| app.items.get(*idx))
        .map(|item| {
            let json = item.to_json();
            let cells = resource
                .columns
                .iter()
                .map(|col| render_cell(item, &json, col));
            Row::new(cells.collect::<Vec<_>>())
        })
        .collect();

    let widths: Vec<Constraint> = resource
        .columns
        .iter()
        .map(|col| Constraint::Percentage(col.width))
        .collect();

    let table = Table::new(rows, widths).header(header).row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    // Adjust selected index for virtual scrolling
    let mut state = TableState::default();
    if app.selected >= range.start && app.selected < range.end {
        state.select(Some(app.selected - range.start));
    }

    f.render_stateful_widget(table, table_area, &mut state);

    if needs_scrollbar {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .symbols(symbols::scrollbar::VERTICAL)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        let mut scrollbar_state = ScrollbarState::new(total_items.saturating_sub(visible_height))
            .position(app.scroll_offset);

        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

/// One table cell, formatted according to its column
fn render_cell(item: &Resource, json: &serde_json::Value, col: &ColumnDef) -> Cell<'static> {
    let value = extract_json_value(json, &col.json_path);

    let span = match col.format {
        Some(ColumnFormat::Status) => status_span(&item.status()),
        Some(ColumnFormat::Privacy) => match item {
            Resource::Container(view) => {
                let privacy = status::privacy_accessory(view.container.privacy);
                Span::raw(format!("{} {}", privacy.icon.glyph(), privacy.tooltip))
            },
            _ => Span::raw(value),
        },
        Some(ColumnFormat::Flag) => Span::raw(format!("{} {}", display::country_flag(&value), value)),
        Some(ColumnFormat::Image) => Span::raw(display::image_of(&value).to_string()),
        Some(ColumnFormat::Bytes) => match value.parse::<u64>() {
            Ok(bytes) => Span::raw(display::bytes_to_size(bytes)),
            Err(_) => Span::raw(value),
        },
        None => Span::raw(truncate_string(&value, 38)),
    };

    Cell::from(Line::from(vec![Span::raw(" "), span]))
}

/// Truncate string for display (Unicode-safe)
fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Label/value list in a bordered pane
fn render_metadata(f: &mut Frame, title: &str, metadata: &Metadata, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let mut lines = Vec::with_capacity(metadata.len() * 2);
    for (label, value) in metadata {
        lines.push(Line::from(Span::styled(
            format!(" {}", label),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(Span::styled(
            format!("   {}", value),
            Style::default().fg(Color::White),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_logs_view(f: &mut Frame, app: &App, area: Rect) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let container_name = app
        .logs_container
        .as_ref()
        .map(|view| view.container.name.as_str())
        .unwrap_or("-");

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" Logs of {}[{}] ", container_name, app.logs.len()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let items: Vec<ListItem> = app
        .logs
        .iter()
        .map(|log| {
            let style = match log.level.as_deref() {
                Some("error") => Style::default().fg(Color::Red),
                Some("warning") => Style::default().fg(Color::Yellow),
                _ => Style::default().fg(Color::White),
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {} ", log.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(truncate_string(&log.message, 60), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    if !app.logs.is_empty() {
        state.select(Some(app.logs_selected));
    }
    f.render_stateful_widget(list, panes[0], &mut state);

    let Some(log) = app.selected_log() else {
        let msg = if app.loading {
            "Loading...".to_string()
        } else if let Some(err) = &app.logs_error {
            format!("Could not load logs: {}", err)
        } else {
            "No logs".to_string()
        };
        let paragraph = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, panes[1]);
        return;
    };

    let detail = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(10)])
        .split(panes[1]);

    let markdown: Vec<Line> = display::log_markdown(log)
        .lines()
        .map(|line| {
            if line.starts_with("```") {
                Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(Color::DarkGray),
                ))
            } else {
                highlight_json_line(&line.replace('\t', "  "))
            }
        })
        .collect();

    let message = Paragraph::new(markdown)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Message "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(message, detail[0]);

    render_metadata(f, " Metadata ", &display::log_metadata(log), detail[1]);
}

fn render_describe_view(f: &mut Frame, app: &App, area: Rect) {
    let json = app
        .selected_item_json()
        .unwrap_or_else(|| "No item selected".to_string());

    // Apply JSON syntax highlighting
    let lines: Vec<Line> = json.lines().map(highlight_json_line).collect();
    let total_lines = lines.len();

    let title = match app.selected_item() {
        Some(item) => format!(" {} ", item.name()),
        None => format!(" {} Details ", app.current_resource().display_name),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    // Calculate max scroll based on inner area (content area without borders)
    let visible_lines = inner_area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible_lines);
    let scroll = app.describe_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
    f.render_widget(paragraph, inner_area);

    if total_lines > visible_lines {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(max_scroll + visible_lines).position(scroll);
        f.render_stateful_widget(scrollbar, inner_area, &mut scrollbar_state);
    }
}

/// Apply JSON syntax highlighting to a single line
fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = line.chars().peekable();
    let mut current = String::new();
    let mut is_key = true;

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if !current.is_empty() {
                    spans.push(Span::raw(current.clone()));
                    current.clear();
                }

                let mut string_content = String::from("\"");
                while let Some(&next_c) = chars.peek() {
                    chars.next();
                    string_content.push(next_c);
                    if next_c == '"' {
                        break;
                    }
                    if next_c == '\\' {
                        if let Some(&escaped) = chars.peek() {
                            chars.next();
                            string_content.push(escaped);
                        }
                    }
                }

                let style = if is_key {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Green)
                };
                spans.push(Span::styled(string_content, style));
            },
            ':' => {
                current.push(c);
                spans.push(Span::styled(
                    current.clone(),
                    Style::default().fg(Color::White),
                ));
                current.clear();
                is_key = false;
            },
            ',' => {
                if !current.is_empty() {
                    let style = get_json_value_style(&current);
                    spans.push(Span::styled(current.clone(), style));
                    current.clear();
                }
                spans.push(Span::styled(
                    ",".to_string(),
                    Style::default().fg(Color::White),
                ));
                is_key = true;
            },
            '{' | '}' | '[' | ']' => {
                if !current.is_empty() {
                    let style = get_json_value_style(&current);
                    spans.push(Span::styled(current.clone(), style));
                    current.clear();
                }
                spans.push(Span::styled(
                    c.to_string(),
                    Style::default().fg(Color::Yellow),
                ));
                if c == '{' || c == '[' {
                    is_key = c == '{';
                }
            },
            ' ' | '\t' => {
                if !current.is_empty() {
                    let style = get_json_value_style(&current);
                    spans.push(Span::styled(current.clone(), style));
                    current.clear();
                }
                spans.push(Span::raw(c.to_string()));
            },
            _ => {
                current.push(c);
            },
        }
    }

    if !current.is_empty() {
        let style = get_json_value_style(&current);
        spans.push(Span::styled(current, style));
    }

    Line::from(spans)
}

/// Get style for JSON values (numbers, booleans, null)
fn get_json_value_style(value: &str) -> Style {
    let trimmed = value.trim();
    if trimmed == "null" {
        Style::default().fg(Color::DarkGray)
    } else if trimmed == "true" || trimmed == "false" {
        Style::default().fg(Color::Magenta)
    } else if trimmed.parse::<f64>().is_ok() {
        Style::default().fg(Color::LightBlue)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Popup area centered in `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Breadcrumb of the current location (`Containers > production > website`)
fn breadcrumb(app: &App) -> Vec<String> {
    let mut crumbs = vec![app.current_resource().display_name.clone()];
    if let Some(ns) = app
        .selected_namespace()
        .filter(|_| app.view == crate::resource::ResourceKind::Containers)
    {
        crumbs.push(ns.namespace.name.clone());
    }
    if let Some(view) = app.logs_container.as_ref().filter(|_| app.mode == Mode::Logs) {
        crumbs.push(view.container.name.clone());
        crumbs.push("logs".to_string());
    }
    crumbs
}

fn render_crumb(f: &mut Frame, app: &App, area: Rect) {
    let crumb_display = breadcrumb(app).join(" > ");

    let toast = app.notification_manager.current_toast();
    let toast_text = toast.map(|notif| notif.toast_message(app.notification_manager.detail_level));

    let notification_indicator = {
        let in_progress = app.notification_manager.in_progress_count();
        let total = app.notification_manager.notifications.len();
        if in_progress > 0 {
            format!(" [↻{}]", in_progress)
        } else if total > 0 {
            " [N]".to_string()
        } else {
            String::new()
        }
    };

    let error = if app.mode == Mode::Logs {
        app.logs_error.as_ref()
    } else {
        app.error_message.as_ref()
    };

    let status_text = if let Some(err) = error {
        format!("Error: {}", err)
    } else if let Some(ref toast) = toast_text {
        toast.clone()
    } else if app.loading {
        "Loading...".to_string()
    } else if app.mode == Mode::Describe {
        "j/k: scroll | q/d/Esc: back".to_string()
    } else if app.mode == Mode::Logs {
        "j/k: select | R: reload | q/Esc: back".to_string()
    } else if app.filter_active {
        "Type to filter | Enter: apply | Esc: clear".to_string()
    } else {
        String::new()
    };

    let style = if error.is_some() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if let Some(notif) = toast {
        match &notif.status {
            NotificationStatus::Success => Style::default().fg(Color::Green),
            NotificationStatus::Error(_) => Style::default().fg(Color::Red),
            NotificationStatus::InProgress | NotificationStatus::Warning(_) => {
                Style::default().fg(Color::Yellow)
            },
        }
    } else if app.loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let indicator_style = if app.notification_manager.in_progress_count() > 0 {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let crumb = Line::from(vec![
        Span::styled(
            format!("<{}>", crumb_display),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(status_text, style),
        Span::styled(notification_indicator, indicator_style),
    ]);

    f.render_widget(Paragraph::new(crumb), area);
}
