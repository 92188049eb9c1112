//! Confirm and warning popups
//!
//! The confirm popup lists what the action is about to touch: the
//! container's namespace and image, or the instance's zone and the power
//! actions it currently accepts.

use crate::app::{App, Mode, Resource};
use crate::resource::display::{country_flag, image_name};
use crate::resource::get_resource;
use crate::scw::types::InstanceAction;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const MIN_WIDTH: u16 = 40;
const MAX_WARNING_WIDTH: u16 = 70;

pub fn render(f: &mut Frame, app: &App) {
    match app.mode {
        Mode::Confirm => render_confirm_dialog(f, app),
        Mode::Warning => render_warning_dialog(f, app),
        _ => {},
    }
}

/// Label/value rows describing the target of an action
fn target_facts(app: &App, resource: &Resource) -> Vec<(&'static str, String)> {
    let location = format!("{} {}", country_flag(resource.location()), resource.location());
    let status = resource.status().tooltip;

    match resource {
        Resource::Container(view) => {
            let namespace = app
                .namespaces
                .iter()
                .find(|n| n.namespace.id == view.container.namespace_id)
                .map(|n| n.namespace.name.clone())
                .unwrap_or_else(|| view.container.namespace_id.clone());
            vec![
                ("Namespace", namespace),
                ("Image", image_name(&view.container).to_string()),
                ("Region", location),
                ("Status", status),
            ]
        },
        Resource::Instance(instance) => {
            let allowed: Vec<&str> = instance
                .allowed_actions
                .iter()
                .filter(|a| **a != InstanceAction::Other)
                .map(|a| a.as_str())
                .collect();
            vec![
                ("Zone", location),
                ("State", status),
                (
                    "Allowed",
                    if allowed.is_empty() {
                        "-".to_string()
                    } else {
                        allowed.join(", ")
                    },
                ),
            ]
        },
        Resource::Database(db) => vec![
            ("Region", location),
            ("Engine", db.engine.clone().unwrap_or_else(|| "-".to_string())),
            ("Status", status),
        ],
        Resource::Redis(cluster) => vec![
            ("Zone", location),
            ("Version", cluster.version.clone().unwrap_or_else(|| "-".to_string())),
            ("Status", status),
        ],
    }
}

fn button(label: &'static str, selected: bool, fill: Color) -> Span<'static> {
    if selected {
        Span::styled(
            label,
            Style::default()
                .fg(Color::Black)
                .bg(fill)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(label, Style::default().fg(Color::DarkGray))
    }
}

/// Rect of `width` x `height` centered in `area`, clamped to it
fn popup_area(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_popup(f: &mut Frame, title: String, accent: Color, lines: Vec<Line<'_>>, width: u16, height: u16) {
    let area = popup_area(width, height, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            title,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_confirm_dialog(f: &mut Frame, app: &App) {
    let Some(pending) = &app.pending_action else {
        return;
    };

    let accent = if pending.destructive {
        Color::Red
    } else {
        Color::Yellow
    };
    let title = get_resource(pending.resource.kind())
        .action(pending.action)
        .map(|a| format!(" {} ", a.display_name))
        .unwrap_or_else(|| " Confirm ".to_string());

    let mut lines = vec![
        Line::from(Span::styled(
            pending.message.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(""),
    ];
    lines.extend(target_facts(app, &pending.resource).into_iter().map(|(label, value)| {
        Line::from(vec![
            Span::styled(format!("{:>10}  ", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(Color::White)),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(
        Line::from(vec![
            button(" Yes (y) ", pending.selected_yes, accent),
            Span::raw("    "),
            button(" No (n) ", !pending.selected_yes, Color::White),
        ])
        .centered(),
    );

    let width = lines
        .iter()
        .map(|l| l.width() as u16)
        .max()
        .unwrap_or(0)
        .max(MIN_WIDTH)
        + 4;
    let height = lines.len() as u16 + 2;
    render_popup(f, title, accent, lines, width, height);
}

fn render_warning_dialog(f: &mut Frame, app: &App) {
    let Some(message) = &app.warning_message else {
        return;
    };

    let width = (message.chars().count() as u16 + 6).clamp(MIN_WIDTH, MAX_WARNING_WIDTH);
    let text_rows = (message.chars().count() as u16).div_ceil(width - 2).max(1);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message.as_str(), Style::default().fg(Color::White))).centered(),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/Esc: close",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];
    render_popup(
        f,
        " Warning ".to_string(),
        Color::Yellow,
        lines,
        width,
        text_rows + 5,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::resource::{fixtures, FixtureTransport, ResourceFetcher, ResourceKind};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn app(view: ResourceKind) -> App {
        let fetcher = ResourceFetcher::new(Arc::new(FixtureTransport::new()));
        App::new(fetcher, view, Config::default(), false)
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_deploy_dialog_shows_namespace_and_image() {
        let mut app = app(ResourceKind::Containers);
        app.refresh_now().await;
        app.trigger_shortcut('n').await.unwrap();

        let text = draw(&app);
        assert!(text.contains("Deploy a Container"));
        assert!(text.contains("production"));
        assert!(text.contains("website:latest"));
        assert!(text.contains("No (n)"));
    }

    #[test]
    fn test_instance_facts_list_allowed_actions() {
        let app = app(ResourceKind::Instances);
        let running = Resource::Instance(fixtures::instances().remove(0));
        let facts = target_facts(&app, &running);

        assert_eq!(facts[0].0, "Zone");
        assert!(facts[0].1.ends_with("fr-par-1"));
        assert_eq!(facts[2], ("Allowed", "poweroff, reboot".to_string()));
    }

    #[test]
    fn test_warning_dialog_wraps_long_messages() {
        let mut app = app(ResourceKind::Instances);
        app.show_warning(&"Read-only mode blocks this action. ".repeat(4));

        let text = draw(&app);
        assert!(text.contains("Warning"));
        assert!(text.contains("Enter/Esc: close"));
    }

    #[test]
    fn test_popup_area_is_clamped() {
        let area = Rect::new(0, 0, 30, 10);
        assert_eq!(popup_area(40, 20, area), area);
        assert_eq!(popup_area(10, 4, area), Rect::new(10, 3, 10, 4));
    }
}
