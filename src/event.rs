//! Event Handling
//!
//! Keyboard and event handling for tscw.

use crate::app::{App, Mode};
use crate::resource::ResourceKind;
use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use std::time::Duration;

/// Handle events, returns true if app should quit
pub async fn handle_events(app: &mut App) -> Result<bool> {
    if poll(Duration::from_millis(100))? {
        if let Event::Key(key) = read()? {
            return handle_key_event(app, key.code, key.modifiers).await;
        }
    }
    Ok(false)
}

async fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Global quit shortcut
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, code, modifiers).await,
        Mode::Help => handle_help_mode(app, code),
        Mode::Confirm => handle_confirm_mode(app, code).await,
        Mode::Warning => handle_warning_mode(app, code),
        Mode::Namespaces => handle_namespaces_mode(app, code),
        Mode::Describe => handle_describe_mode(app, code, modifiers),
        Mode::Notifications => handle_notifications_mode(app, code),
        Mode::Logs => handle_logs_mode(app, code).await,
    }
}

/// Shared list movement; returns false when the key is not a movement key
fn handle_navigation(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Home => app.go_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_to_bottom(),
        KeyCode::PageDown => app.page_down(10),
        KeyCode::PageUp => app.page_up(10),
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => app.page_down(10),
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => app.page_up(10),
        _ => return false,
    }
    true
}

/// Double-g jumps to the top; returns true when the key was consumed
fn handle_double_g(app: &mut App, code: KeyCode) -> bool {
    if code == KeyCode::Char('g') {
        if let Some((KeyCode::Char('g'), time)) = app.last_key_press {
            if time.elapsed() < Duration::from_millis(1000) {
                app.go_to_top();
                app.last_key_press = None;
                return true;
            }
        }
        app.last_key_press = Some((code, std::time::Instant::now()));
        return true;
    }

    // Clear last key press for non-g keys
    app.last_key_press = None;
    false
}

async fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Handle filter input first
    if app.filter_active {
        match code {
            KeyCode::Esc => {
                app.clear_filter();
            },
            KeyCode::Enter => {
                app.filter_active = false;
            },
            KeyCode::Backspace => {
                app.filter_text.pop();
                app.apply_filter();
            },
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.filter_text.push(c);
                app.apply_filter();
            },
            _ => {},
        }
        return Ok(false);
    }

    if handle_double_g(app, code) || handle_navigation(app, code, modifiers) {
        return Ok(false);
    }

    match code {
        // Quit
        KeyCode::Char('q') => return Ok(true),

        // Views
        KeyCode::Char(c @ '1'..='4') => {
            let idx = (c as usize) - ('1' as usize);
            if let Some(kind) = ResourceKind::ALL.get(idx) {
                app.switch_view(*kind);
            }
        },
        KeyCode::Tab => app.next_view(),
        KeyCode::BackTab => app.previous_view(),

        // Refresh
        KeyCode::Char('R') => app.start_refresh(),

        // Describe
        KeyCode::Enter | KeyCode::Char('d') => app.enter_describe_mode(),

        // Filter
        KeyCode::Char('/') => {
            app.filter_active = true;
        },

        // Help
        KeyCode::Char('?') => app.enter_help_mode(),

        // Namespace selector (containers view)
        KeyCode::Char('s') => app.enter_namespaces_mode(),

        // Notifications history
        KeyCode::Char('N') => app.enter_notifications_mode(),

        KeyCode::Esc => {
            app.error_message = None;
        },

        // Action shortcuts from the registry
        KeyCode::Char(c) => {
            app.trigger_shortcut(c).await?;
        },

        _ => {},
    }

    Ok(false)
}

fn handle_help_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.exit_mode();
        },
        _ => {},
    }
    Ok(false)
}

async fn handle_confirm_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            app.confirm_pending_action(false).await;
        },
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(ref mut pending) = app.pending_action {
                pending.selected_yes = true;
            }
        },
        KeyCode::Right | KeyCode::Char('l') => {
            if let Some(ref mut pending) = app.pending_action {
                pending.selected_yes = false;
            }
        },
        KeyCode::Tab => {
            if let Some(ref mut pending) = app.pending_action {
                pending.selected_yes = !pending.selected_yes;
            }
        },
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.confirm_pending_action(true).await;
        },
        KeyCode::Enter => {
            let accepted = app
                .pending_action
                .as_ref()
                .is_some_and(|pending| pending.selected_yes);
            app.confirm_pending_action(accepted).await;
        },
        _ => {},
    }
    Ok(false)
}

fn handle_warning_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Enter => {
            app.warning_message = None;
            app.exit_mode();
        },
        _ => {},
    }
    Ok(false)
}

fn handle_namespaces_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => app.exit_mode(),
        KeyCode::Enter => app.select_namespace(),
        _ => {
            handle_navigation(app, code, KeyModifiers::NONE);
        },
    }
    Ok(false)
}

fn handle_notifications_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('N') => app.exit_mode(),
        KeyCode::Char('c') => app.clear_notifications(),
        _ => {
            handle_navigation(app, code, KeyModifiers::NONE);
        },
    }
    Ok(false)
}

async fn handle_logs_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    if handle_double_g(app, code) {
        return Ok(false);
    }

    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => app.exit_logs_mode(),
        KeyCode::Char('R') => {
            // Re-open the logs of the same container
            app.exit_logs_mode();
            app.enter_logs_mode();
        },
        _ => {
            handle_navigation(app, code, KeyModifiers::NONE);
        },
    }
    Ok(false)
}

fn handle_describe_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
            app.exit_mode();
        },
        KeyCode::Char('j') | KeyCode::Down => {
            app.describe_scroll = app.describe_scroll.saturating_add(1);
        },
        KeyCode::Char('k') | KeyCode::Up => {
            app.describe_scroll = app.describe_scroll.saturating_sub(1);
        },
        KeyCode::PageDown => {
            app.describe_scroll = app.describe_scroll.saturating_add(10);
        },
        KeyCode::PageUp => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        },
        KeyCode::Char('d') => {
            if modifiers.contains(KeyModifiers::CONTROL) {
                app.describe_scroll = app.describe_scroll.saturating_add(10);
            } else {
                app.exit_mode();
            }
        },
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.describe_scroll = app.describe_scroll.saturating_sub(10);
        },
        KeyCode::Char('g') | KeyCode::Home => {
            app.describe_scroll = 0;
        },
        KeyCode::Char('G') | KeyCode::End => {
            app.describe_scroll_to_bottom(30); // Approximate visible lines
        },
        _ => {},
    }
    Ok(false)
}
