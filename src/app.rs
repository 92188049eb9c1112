//! Application State
//!
//! Central application state management for tscw.

use crate::config::Config;
use crate::notification::{DetailLevel, NotificationManager, OperationType};
use crate::resource::display::{self, Metadata};
use crate::resource::status::{self, StatusPresentation};
use crate::resource::{
    get_resource, ActionDef, ActionKind, ContainerView, FanOut, NamespaceView, ResourceDef,
    ResourceFetcher, ResourceKind,
};
use crate::scw::cancel::{CancelHandle, CancelToken};
use crate::scw::client::format_scw_error;
use crate::scw::http::ApiError;
use crate::scw::types::{Database, Instance, InstanceAction, Log, RedisCluster};
use crate::shell::{self, ShellResult};
use anyhow::Result;
use crossterm::event::KeyCode;
use serde_json::Value;
use std::ops::Range;
use std::time::Duration;
use tokio::sync::oneshot;

// =========================================================================
// Configuration Constants
// =========================================================================

/// Default viewport height (will be updated during render based on terminal size)
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Application modes
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,        // Viewing list
    Help,          // ? help popup
    Confirm,       // Confirmation dialog
    Warning,       // Warning/info dialog (OK only)
    Namespaces,    // Namespace selection
    Describe,      // Viewing JSON details of selected item
    Notifications, // Notifications history panel
    Logs,          // Logs of one container
}

/// One row of the current view
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Instance(Instance),
    Container(ContainerView),
    Database(Database),
    Redis(RedisCluster),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Instance(_) => ResourceKind::Instances,
            Self::Container(_) => ResourceKind::Containers,
            Self::Database(_) => ResourceKind::Databases,
            Self::Redis(_) => ResourceKind::Redis,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Instance(i) => &i.id,
            Self::Container(c) => &c.container.id,
            Self::Database(d) => &d.id,
            Self::Redis(r) => &r.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Instance(i) => &i.name,
            Self::Container(c) => &c.container.name,
            Self::Database(d) => &d.name,
            Self::Redis(r) => &r.name,
        }
    }

    /// Region or zone
    pub fn location(&self) -> &str {
        match self {
            Self::Instance(i) => &i.zone,
            Self::Container(c) => &c.container.region,
            Self::Database(d) => &d.region,
            Self::Redis(r) => &r.zone,
        }
    }

    pub fn status(&self) -> StatusPresentation {
        match self {
            Self::Instance(i) => status::instance_state(i.state),
            Self::Container(c) => status::container_status(c.container.status),
            Self::Database(d) => status::database_status(d.status),
            Self::Redis(r) => status::redis_status(r.status),
        }
    }

    pub fn metadata(&self) -> Metadata {
        match self {
            Self::Instance(i) => display::instance_metadata(i),
            Self::Container(c) => {
                let hostnames: Vec<&str> = c.domains.iter().map(|d| d.hostname.as_str()).collect();
                display::container_metadata(&c.container, &hostnames)
            },
            Self::Database(d) => display::database_metadata(d),
            Self::Redis(r) => display::redis_metadata(r),
        }
    }

    pub fn console_url(&self) -> String {
        let parent = match self {
            Self::Container(c) => Some(c.container.namespace_id.as_str()),
            _ => None,
        };
        display::console_url(self.kind(), self.location(), self.id(), parent)
    }

    pub fn to_json(&self) -> Value {
        let value = match self {
            Self::Instance(i) => serde_json::to_value(i),
            Self::Container(c) => serde_json::to_value(c),
            Self::Database(d) => serde_json::to_value(d),
            Self::Redis(r) => serde_json::to_value(r),
        };
        value.unwrap_or(Value::Null)
    }

    /// Whether the row should be offered `action`
    pub fn supports(&self, action: ActionKind) -> bool {
        match (self, action) {
            (_, ActionKind::OpenConsole) => true,
            (Self::Instance(i), ActionKind::PowerOn) => i.allows(InstanceAction::PowerOn),
            (Self::Instance(i), ActionKind::PowerOff) => i.allows(InstanceAction::PowerOff),
            (Self::Instance(i), ActionKind::Reboot) => i.allows(InstanceAction::Reboot),
            (Self::Container(_), ActionKind::Deploy | ActionKind::Logs) => true,
            _ => false,
        }
    }

    /// Case-insensitive match on name, id, location and status
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        [
            self.name().to_lowercase(),
            self.id().to_lowercase(),
            self.location().to_lowercase(),
            self.status().tooltip.to_lowercase(),
        ]
        .iter()
        .any(|field| field.contains(&needle))
    }
}

/// Pending action that requires confirmation
#[derive(Debug, Clone)]
pub struct PendingAction {
    pub action: ActionKind,
    pub resource: Resource,
    pub message: String,
    pub destructive: bool,
    pub selected_yes: bool,
}

/// What a background fetch loads
#[derive(Debug, Clone)]
enum FetchTarget {
    View(ResourceKind),
    Logs(ContainerView),
}

enum FetchOutcome {
    Instances(FanOut<Instance>),
    Namespaces(FanOut<NamespaceView>),
    Databases(FanOut<Database>),
    Redis(FanOut<RedisCluster>),
    Logs(Vec<Log>),
}

/// A fetch running on its own task; dropping it cancels the requests
struct PendingFetch {
    target: FetchTarget,
    rx: oneshot::Receiver<Result<FetchOutcome>>,
    _cancel: CancelHandle,
}

/// Main application state
pub struct App {
    pub fetcher: ResourceFetcher,

    // Current resource being viewed
    pub view: ResourceKind,

    // Rows of the current view, and the indices passing the filter
    pub items: Vec<Resource>,
    pub filtered_items: Vec<usize>,

    // Navigation state
    pub selected: usize,
    pub mode: Mode,
    pub filter_text: String,
    pub filter_active: bool,

    // Containers view
    pub namespaces: Vec<NamespaceView>,
    pub namespace_selected: usize,
    pub namespaces_cursor: usize,

    // Logs view
    pub logs: Vec<Log>,
    pub logs_selected: usize,
    pub logs_container: Option<ContainerView>,
    /// Failure of the last logs fetch, kept apart from the view's error
    pub logs_error: Option<String>,

    // Background fetches
    view_fetch: Option<PendingFetch>,
    logs_fetch: Option<PendingFetch>,

    // Confirmation
    pub pending_action: Option<PendingAction>,

    // UI state
    pub loading: bool,
    pub error_message: Option<String>,
    pub describe_scroll: usize,

    // Persistent configuration
    pub config: Config,

    // Key press tracking
    pub last_key_press: Option<(KeyCode, std::time::Instant)>,

    // Read-only mode
    pub readonly: bool,

    // Warning message
    pub warning_message: Option<String>,

    // Notifications
    pub notification_manager: NotificationManager,
    pub notifications_selected: usize,

    // Virtual scrolling
    pub viewport_height: usize,
    pub scroll_offset: usize,
}

impl App {
    pub fn new(fetcher: ResourceFetcher, view: ResourceKind, config: Config, readonly: bool) -> Self {
        // Initialize notification manager with config settings
        let mut notification_manager = NotificationManager::new();
        notification_manager.detail_level = DetailLevel::parse(&config.notifications.detail_level);
        notification_manager.toast_duration =
            Duration::from_secs(config.notifications.toast_duration_secs);
        notification_manager.max_history = config.notifications.max_history;

        Self {
            fetcher,
            view,
            items: Vec::new(),
            filtered_items: Vec::new(),
            selected: 0,
            mode: Mode::Normal,
            filter_text: String::new(),
            filter_active: false,
            namespaces: Vec::new(),
            namespace_selected: 0,
            namespaces_cursor: 0,
            logs: Vec::new(),
            logs_selected: 0,
            logs_container: None,
            logs_error: None,
            view_fetch: None,
            logs_fetch: None,
            pending_action: None,
            loading: false,
            error_message: None,
            describe_scroll: 0,
            config,
            last_key_press: None,
            readonly,
            warning_message: None,
            notification_manager,
            notifications_selected: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            scroll_offset: 0,
        }
    }

    // =========================================================================
    // Resource Definition Access
    // =========================================================================

    pub fn current_resource(&self) -> &'static ResourceDef {
        get_resource(self.view)
    }

    /// Actions offered for the selected row
    pub fn available_actions(&self) -> Vec<&'static ActionDef> {
        let Some(item) = self.selected_item() else {
            return Vec::new();
        };
        self.current_resource()
            .actions
            .iter()
            .filter(|a| item.supports(a.key))
            .collect()
    }

    pub fn selected_namespace(&self) -> Option<&NamespaceView> {
        self.namespaces.get(self.namespace_selected)
    }

    // =========================================================================
    // Data Fetching
    // =========================================================================

    /// Start (or restart) fetching the current view in the background
    pub fn start_refresh(&mut self) {
        let target = FetchTarget::View(self.view);
        self.view_fetch = Some(self.spawn_fetch(target));
        self.loading = true;
    }

    fn start_logs_fetch(&mut self, container: ContainerView) {
        self.logs_fetch = Some(self.spawn_fetch(FetchTarget::Logs(container)));
        self.loading = true;
    }

    fn spawn_fetch(&self, target: FetchTarget) -> PendingFetch {
        let (handle, token) = CancelToken::pair();
        let (tx, rx) = oneshot::channel();
        let fetcher = self.fetcher.clone();
        let task_target = target.clone();

        tokio::spawn(async move {
            let result = run_fetch(&fetcher, task_target, &token).await;
            let _ = tx.send(result);
        });

        PendingFetch {
            target,
            rx,
            _cancel: handle,
        }
    }

    /// Apply finished fetches; returns true when state changed
    pub fn poll_fetch(&mut self) -> bool {
        let mut changed = false;
        for slot in [FetchSlot::View, FetchSlot::Logs] {
            let pending = match slot {
                FetchSlot::View => &mut self.view_fetch,
                FetchSlot::Logs => &mut self.logs_fetch,
            };
            let Some(fetch) = pending.as_mut() else {
                continue;
            };

            let result = match fetch.rx.try_recv() {
                Ok(result) => result,
                Err(oneshot::error::TryRecvError::Empty) => continue,
                Err(oneshot::error::TryRecvError::Closed) => {
                    Err(anyhow::anyhow!("Fetch task ended unexpectedly"))
                },
            };

            if let Some(fetch) = pending.take() {
                self.apply_fetch(fetch.target, result);
                changed = true;
            }
        }
        self.update_loading();
        changed
    }

    /// Wait for in-flight fetches and apply them
    pub async fn finish_fetch(&mut self) {
        for slot in [FetchSlot::View, FetchSlot::Logs] {
            let pending = match slot {
                FetchSlot::View => self.view_fetch.take(),
                FetchSlot::Logs => self.logs_fetch.take(),
            };
            if let Some(fetch) = pending {
                let result = match fetch.rx.await {
                    Ok(result) => result,
                    Err(_) => Err(anyhow::anyhow!("Fetch task ended unexpectedly")),
                };
                self.apply_fetch(fetch.target, result);
            }
        }
        self.update_loading();
    }

    /// Fetch the current view and wait for it
    pub async fn refresh_now(&mut self) {
        self.start_refresh();
        self.finish_fetch().await;
    }

    fn update_loading(&mut self) {
        self.loading = self.view_fetch.is_some() || self.logs_fetch.is_some();
    }

    fn apply_fetch(&mut self, target: FetchTarget, result: Result<FetchOutcome>) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) if is_cancelled(&e) => {
                tracing::debug!("Discarding cancelled fetch of {:?}", target);
                return;
            },
            Err(e) => {
                self.fail_fetch(&target, &e);
                return;
            },
        };

        if matches!(target, FetchTarget::View(_)) {
            self.error_message = None;
        }
        let failures = match outcome {
            FetchOutcome::Instances(fan) => {
                let failures = describe_failures(&fan);
                self.set_items(fan.items.into_iter().map(Resource::Instance).collect());
                failures
            },
            FetchOutcome::Namespaces(fan) => {
                let failures = describe_failures(&fan);
                self.namespaces = fan.items;
                self.namespace_selected = 0;
                self.rebuild_container_items();
                failures
            },
            FetchOutcome::Databases(fan) => {
                let failures = describe_failures(&fan);
                self.set_items(fan.items.into_iter().map(Resource::Database).collect());
                failures
            },
            FetchOutcome::Redis(fan) => {
                let failures = describe_failures(&fan);
                self.set_items(fan.items.into_iter().map(Resource::Redis).collect());
                failures
            },
            FetchOutcome::Logs(logs) => {
                self.logs = logs;
                self.logs_selected = 0;
                self.logs_error = None;
                None
            },
        };

        if let Some(failures) = failures {
            let id = self.notification_manager.create_notification(
                OperationType::Fetch,
                self.view.to_string(),
                self.current_resource().display_name.clone(),
            );
            self.notification_manager
                .mark_warning(id, format!("unavailable in {}", failures));
        }
    }

    /// Collapse the view to empty and report the error once
    fn fail_fetch(&mut self, target: &FetchTarget, error: &anyhow::Error) {
        let message = format_scw_error(error);
        tracing::error!("Fetch of {:?} failed: {:#}", target, error);

        let (operation, kind, name) = match target {
            FetchTarget::View(kind) => {
                self.error_message = Some(message.clone());
                self.items.clear();
                self.filtered_items.clear();
                self.namespaces.clear();
                self.selected = 0;
                (
                    OperationType::Fetch,
                    *kind,
                    get_resource(*kind).display_name.clone(),
                )
            },
            FetchTarget::Logs(container) => {
                self.logs.clear();
                self.logs_selected = 0;
                self.logs_error = Some(message.clone());
                (
                    OperationType::Logs,
                    ResourceKind::Containers,
                    container.container.name.clone(),
                )
            },
        };

        self.notification_manager
            .notify_error(operation, kind.to_string(), name, message);
    }

    fn set_items(&mut self, items: Vec<Resource>) {
        let prev_selected = self.selected;
        self.items = items;
        self.apply_filter();
        self.selected = if prev_selected < self.filtered_items.len() {
            prev_selected
        } else {
            0
        };
    }

    fn rebuild_container_items(&mut self) {
        let items = self
            .selected_namespace()
            .map(|ns| ns.containers.iter().cloned().map(Resource::Container).collect())
            .unwrap_or_default();
        self.set_items(items);
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    pub fn apply_filter(&mut self) {
        self.filtered_items = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.matches(&self.filter_text))
            .map(|(idx, _)| idx)
            .collect();

        if self.selected >= self.filtered_items.len() {
            self.selected = self.filtered_items.len().saturating_sub(1);
        }
        self.scroll_offset = 0;
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
        self.apply_filter();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn selected_item(&self) -> Option<&Resource> {
        self.filtered_items
            .get(self.selected)
            .and_then(|idx| self.items.get(*idx))
    }

    pub fn selected_log(&self) -> Option<&Log> {
        self.logs.get(self.logs_selected)
    }

    pub fn selected_item_json(&self) -> Option<String> {
        self.selected_item()
            .map(|item| serde_json::to_string_pretty(&item.to_json()).unwrap_or_default())
    }

    pub fn describe_line_count(&self) -> usize {
        self.selected_item_json()
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    pub fn describe_scroll_to_bottom(&mut self, visible_lines: usize) {
        let total = self.describe_line_count();
        self.describe_scroll = total.saturating_sub(visible_lines);
    }

    /// Cursor and length of the list the current mode navigates
    fn cursor(&mut self) -> (&mut usize, usize) {
        match self.mode {
            Mode::Namespaces => (&mut self.namespaces_cursor, self.namespaces.len()),
            Mode::Logs => (&mut self.logs_selected, self.logs.len()),
            Mode::Notifications => (
                &mut self.notifications_selected,
                self.notification_manager.notifications.len(),
            ),
            _ => (&mut self.selected, self.filtered_items.len()),
        }
    }

    pub fn next(&mut self) {
        self.page_down(1);
    }

    pub fn previous(&mut self) {
        self.page_up(1);
    }

    pub fn go_to_top(&mut self) {
        let (cursor, _) = self.cursor();
        *cursor = 0;
    }

    pub fn go_to_bottom(&mut self) {
        let (cursor, len) = self.cursor();
        *cursor = len.saturating_sub(1);
    }

    pub fn page_down(&mut self, page_size: usize) {
        let (cursor, len) = self.cursor();
        if len > 0 {
            *cursor = (*cursor + page_size).min(len - 1);
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        let (cursor, _) = self.cursor();
        *cursor = cursor.saturating_sub(page_size);
    }

    // =========================================================================
    // Mode Transitions
    // =========================================================================

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn enter_describe_mode(&mut self) {
        if self.selected_item().is_none() {
            return;
        }
        self.mode = Mode::Describe;
        self.describe_scroll = 0;
    }

    pub fn enter_confirm_mode(&mut self, pending: PendingAction) {
        self.pending_action = Some(pending);
        self.mode = Mode::Confirm;
    }

    pub fn show_warning(&mut self, message: &str) {
        self.warning_message = Some(message.to_string());
        self.mode = Mode::Warning;
    }

    pub fn enter_namespaces_mode(&mut self) {
        if self.view != ResourceKind::Containers || self.namespaces.is_empty() {
            return;
        }
        self.namespaces_cursor = self.namespace_selected;
        self.mode = Mode::Namespaces;
    }

    pub fn select_namespace(&mut self) {
        if self.namespaces_cursor < self.namespaces.len() {
            self.namespace_selected = self.namespaces_cursor;
            self.selected = 0;
            self.rebuild_container_items();
        }
        self.exit_mode();
    }

    pub fn enter_notifications_mode(&mut self) {
        self.notifications_selected = 0;
        self.mode = Mode::Notifications;
    }

    /// Open the logs of the selected container
    pub fn enter_logs_mode(&mut self) {
        let Some(Resource::Container(view)) = self.selected_item().cloned() else {
            return;
        };
        self.logs.clear();
        self.logs_selected = 0;
        self.logs_error = None;
        self.logs_container = Some(view.clone());
        self.mode = Mode::Logs;
        self.start_logs_fetch(view);
    }

    /// Leave the logs view, cancelling its fetch
    pub fn exit_logs_mode(&mut self) {
        self.logs_fetch = None;
        self.logs.clear();
        self.logs_container = None;
        self.logs_error = None;
        self.update_loading();
        self.exit_mode();
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
        self.pending_action = None;
    }

    // =========================================================================
    // View Navigation
    // =========================================================================

    /// Switch to another resource kind, dropping the old view's data
    pub fn switch_view(&mut self, kind: ResourceKind) {
        if kind == self.view && self.mode == Mode::Normal {
            return;
        }

        self.view_fetch = None;
        self.logs_fetch = None;
        self.view = kind;
        self.items.clear();
        self.filtered_items.clear();
        self.namespaces.clear();
        self.namespace_selected = 0;
        self.logs.clear();
        self.logs_container = None;
        self.selected = 0;
        self.filter_text.clear();
        self.filter_active = false;
        self.error_message = None;
        self.mode = Mode::Normal;
        self.scroll_offset = 0;

        if let Err(e) = self.config.set_last_view(kind) {
            tracing::warn!("Failed to save last view to config: {}", e);
        }

        self.start_refresh();
    }

    pub fn next_view(&mut self) {
        let idx = ResourceKind::ALL
            .iter()
            .position(|k| *k == self.view)
            .unwrap_or(0);
        self.switch_view(ResourceKind::ALL[(idx + 1) % ResourceKind::ALL.len()]);
    }

    pub fn previous_view(&mut self) {
        let idx = ResourceKind::ALL
            .iter()
            .position(|k| *k == self.view)
            .unwrap_or(0);
        let len = ResourceKind::ALL.len();
        self.switch_view(ResourceKind::ALL[(idx + len - 1) % len]);
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Run the action bound to `shortcut` on the selected row
    pub async fn trigger_shortcut(&mut self, shortcut: char) -> Result<bool> {
        let Some(action) = self.current_resource().action_for_shortcut(shortcut) else {
            return Ok(false);
        };
        self.trigger_action(action).await?;
        Ok(true)
    }

    pub async fn trigger_action(&mut self, action: &ActionDef) -> Result<()> {
        let Some(item) = self.selected_item().cloned() else {
            return Ok(());
        };

        if !item.supports(action.key) {
            self.show_warning(&format!(
                "{} is not available for {}",
                action.display_name,
                item.name()
            ));
            return Ok(());
        }

        if self.readonly && action.key.is_mutating() {
            self.show_warning("Read-only mode: actions are disabled");
            return Ok(());
        }

        match action.key {
            ActionKind::OpenConsole => {
                let url = item.console_url();
                if let Some(msg) = browser_failure(shell::open_browser(&url)) {
                    tracing::warn!("{}", msg);
                    self.show_warning(&msg);
                }
            },
            ActionKind::Logs => self.enter_logs_mode(),
            _ if action.requires_confirm() => {
                let message = action
                    .confirm
                    .as_ref()
                    .and_then(|c| c.message.clone())
                    .unwrap_or_else(|| action.display_name.clone());
                let default_yes = action.confirm.as_ref().is_some_and(|c| c.default_yes);

                self.enter_confirm_mode(PendingAction {
                    action: action.key,
                    message: format!("{} '{}'?", message, item.name()),
                    resource: item,
                    destructive: action.destructive,
                    selected_yes: default_yes,
                });
            },
            _ => self.run_mutation(action.key, &item).await,
        }

        Ok(())
    }

    /// Execute the confirmed action, if the user said yes
    pub async fn confirm_pending_action(&mut self, accepted: bool) {
        let pending = self.pending_action.take();
        self.exit_mode();

        if let Some(pending) = pending.filter(|_| accepted) {
            self.run_mutation(pending.action, &pending.resource).await;
        }
    }

    /// POST a state change, then re-fetch the view once on success
    pub async fn run_mutation(&mut self, action: ActionKind, resource: &Resource) {
        let Some(operation) = OperationType::from_action(action) else {
            return;
        };

        let id = self.notification_manager.create_notification(
            operation,
            resource.kind().to_string(),
            resource.name().to_string(),
        );

        let cancel = CancelToken::never();
        let result = match (action, resource) {
            (ActionKind::Deploy, Resource::Container(view)) => {
                self.fetcher.deploy_container(&view.container, &cancel).await
            },
            (ActionKind::PowerOn, Resource::Instance(instance)) => {
                self.fetcher.power_on_instance(instance, &cancel).await
            },
            (ActionKind::PowerOff, Resource::Instance(instance)) => {
                self.fetcher.power_off_instance(instance, &cancel).await
            },
            (ActionKind::Reboot, Resource::Instance(instance)) => {
                self.fetcher.reboot_instance(instance, &cancel).await
            },
            _ => Err(anyhow::anyhow!(
                "{:?} is not supported on {}",
                action,
                resource.kind()
            )),
        };

        match result {
            Ok(()) => {
                self.notification_manager.mark_success(id);
                self.start_refresh();
            },
            Err(e) => {
                tracing::error!("{:?} on {} failed: {:#}", action, resource.name(), e);
                self.notification_manager
                    .mark_error(id, format_scw_error(&e));
            },
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub fn clear_notifications(&mut self) {
        self.notification_manager.clear();
        self.notifications_selected = 0;
    }

    // =========================================================================
    // Virtual Scrolling
    // =========================================================================

    /// Update the viewport height (called from UI during render)
    pub fn update_viewport(&mut self, height: usize) {
        self.viewport_height = height.max(1);
    }

    /// Ensure the selected item is visible in the viewport
    pub fn ensure_visible(&mut self) {
        if self.filtered_items.is_empty() {
            self.scroll_offset = 0;
            return;
        }

        let visible_height = self.viewport_height;
        let margin = 2; // Keep cursor at least this far from edge

        if self.selected < self.scroll_offset + margin {
            self.scroll_offset = self.selected.saturating_sub(margin);
        } else if self.selected >= self.scroll_offset + visible_height.saturating_sub(margin) {
            self.scroll_offset = self
                .selected
                .saturating_sub(visible_height.saturating_sub(margin + 1));
        }

        // Clamp scroll offset to valid range
        let max_offset = self
            .filtered_items
            .len()
            .saturating_sub(self.viewport_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Get the range of visible items based on scroll offset and viewport
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.scroll_offset.min(self.filtered_items.len());
        let end = (self.scroll_offset + self.viewport_height).min(self.filtered_items.len());
        start..end
    }
}

#[derive(Clone, Copy)]
enum FetchSlot {
    View,
    Logs,
}

async fn run_fetch(
    fetcher: &ResourceFetcher,
    target: FetchTarget,
    cancel: &CancelToken,
) -> Result<FetchOutcome> {
    Ok(match target {
        FetchTarget::View(ResourceKind::Instances) => {
            FetchOutcome::Instances(fetcher.list_instances(cancel).await?)
        },
        FetchTarget::View(ResourceKind::Containers) => {
            FetchOutcome::Namespaces(fetcher.fetch_namespace_views(cancel).await?)
        },
        FetchTarget::View(ResourceKind::Databases) => {
            FetchOutcome::Databases(fetcher.list_databases(cancel).await?)
        },
        FetchTarget::View(ResourceKind::Redis) => {
            FetchOutcome::Redis(fetcher.list_clusters(cancel).await?)
        },
        FetchTarget::Logs(view) => {
            FetchOutcome::Logs(fetcher.container_logs(&view.container, cancel).await?)
        },
    })
}

fn browser_failure(result: ShellResult) -> Option<String> {
    match result {
        ShellResult::Success => None,
        ShellResult::Failed(code) => Some(format!("Browser command exited with status {}", code)),
        ShellResult::Error(msg) => Some(format!("Failed to open browser: {}", msg)),
    }
}

fn is_cancelled(error: &anyhow::Error) -> bool {
    error
        .chain()
        .any(|e| matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Cancelled)))
}

/// "fr-par-2 (Service unavailable), ..." when some partitions failed
fn describe_failures<T>(fan: &FanOut<T>) -> Option<String> {
    if !fan.is_partial() {
        return None;
    }
    Some(
        fan.failures
            .iter()
            .map(|f| format!("{} ({})", f.partition, f.error))
            .collect::<Vec<_>>()
            .join(", "),
    )
}
