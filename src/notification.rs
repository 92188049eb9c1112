//! Notification System
//!
//! Toast messages for fetches and resource actions, with a bounded history.

use crate::resource::ActionKind;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Level of detail for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    /// Minimal: action + resource + status icon
    Minimal,
    /// Detailed: action + resource + duration
    #[default]
    Detailed,
    /// Verbose: all info including error details
    Verbose,
}

impl DetailLevel {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "minimal" => Self::Minimal,
            "verbose" => Self::Verbose,
            _ => Self::Detailed,
        }
    }
}

/// Type of operation being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Deploy,
    PowerOn,
    PowerOff,
    Reboot,
    /// Listing a view's resources
    Fetch,
    /// Loading a container's logs
    Logs,
}

impl OperationType {
    pub fn from_action(action: ActionKind) -> Option<Self> {
        match action {
            ActionKind::Deploy => Some(Self::Deploy),
            ActionKind::PowerOn => Some(Self::PowerOn),
            ActionKind::PowerOff => Some(Self::PowerOff),
            ActionKind::Reboot => Some(Self::Reboot),
            ActionKind::Logs => Some(Self::Logs),
            ActionKind::OpenConsole => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Deploy => "Deploy",
            Self::PowerOn => "Power on",
            Self::PowerOff => "Shutdown",
            Self::Reboot => "Reboot",
            Self::Fetch => "Fetch",
            Self::Logs => "Logs",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Deploy => "Deployed",
            Self::PowerOn => "Powered on",
            Self::PowerOff => "Shut down",
            Self::Reboot => "Rebooted",
            Self::Fetch => "Fetched",
            Self::Logs => "Loaded logs of",
        }
    }

    pub fn present_participle(&self) -> &'static str {
        match self {
            Self::Deploy => "Deploying",
            Self::PowerOn => "Powering on",
            Self::PowerOff => "Shutting down",
            Self::Reboot => "Rebooting",
            Self::Fetch => "Fetching",
            Self::Logs => "Loading logs of",
        }
    }
}

/// Status of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    /// Request sent, no answer yet
    InProgress,
    Success,
    /// Partial success (some regions failed)
    Warning(String),
    Error(String),
}

impl NotificationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::InProgress => "↻",
            Self::Success => "✓",
            Self::Warning(_) => "!",
            Self::Error(_) => "✗",
        }
    }
}

/// A single notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub operation_type: OperationType,
    pub resource_type: String,
    pub resource_name: String,
    pub status: NotificationStatus,
    pub created_at: Instant,
    pub completed_at: Option<Instant>,
}

impl Notification {
    pub fn new(operation_type: OperationType, resource_type: String, resource_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation_type,
            resource_type,
            resource_name,
            status: NotificationStatus::InProgress,
            created_at: Instant::now(),
            completed_at: None,
        }
    }

    fn finish(&mut self, status: NotificationStatus) {
        self.status = status;
        self.completed_at = Some(Instant::now());
    }

    /// Get duration of operation (or elapsed time if still running)
    pub fn duration(&self) -> Duration {
        self.completed_at
            .unwrap_or_else(Instant::now)
            .duration_since(self.created_at)
    }

    /// Format duration for display
    pub fn duration_display(&self) -> String {
        let d = self.duration();
        if d.as_secs() < 1 {
            format!("{}ms", d.as_millis())
        } else if d.as_secs() < 60 {
            format!("{}s", d.as_secs())
        } else {
            format!("{}m{}s", d.as_secs() / 60, d.as_secs() % 60)
        }
    }

    /// Format notification for toast display (short form)
    pub fn toast_message(&self, detail_level: DetailLevel) -> String {
        let icon = self.status.icon();
        let verb = match &self.status {
            NotificationStatus::InProgress => self.operation_type.present_participle(),
            NotificationStatus::Success | NotificationStatus::Warning(_) => {
                self.operation_type.past_tense()
            },
            NotificationStatus::Error(_) => "Failed:",
        };
        let subject = match (&self.status, self.operation_type) {
            (NotificationStatus::Error(_), op) => {
                format!("{} {}", op.display_name().to_lowercase(), self.resource_name)
            },
            _ => self.resource_name.clone(),
        };

        let detail = match &self.status {
            NotificationStatus::Error(msg) | NotificationStatus::Warning(msg) => Some(msg),
            _ => None,
        };

        match detail_level {
            DetailLevel::Minimal => format!("{} {} {}", icon, verb, subject),
            DetailLevel::Detailed => match detail {
                Some(msg) => format!("{} {} {}: {}", icon, verb, subject, msg),
                None if self.status.is_terminal() => {
                    format!("{} {} {} ({})", icon, verb, subject, self.duration_display())
                },
                None => format!("{} {} {}...", icon, verb, subject),
            },
            DetailLevel::Verbose => {
                let base = format!("{} {} {} [{}]", icon, verb, subject, self.resource_type);
                match detail {
                    Some(msg) => format!("{} - {} ({})", base, msg, self.duration_display()),
                    None if self.status.is_terminal() => {
                        format!("{} ({})", base, self.duration_display())
                    },
                    None => format!("{}...", base),
                }
            },
        }
    }
}

/// Notification manager
pub struct NotificationManager {
    /// All notifications (recent first)
    pub notifications: VecDeque<Notification>,
    /// Maximum notifications to keep in history
    pub max_history: usize,
    /// Toast display duration
    pub toast_duration: Duration,
    /// Detail level for display
    pub detail_level: DetailLevel,
    /// Last toast notification (for display)
    last_toast_time: Option<Instant>,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
            max_history: 50,
            toast_duration: Duration::from_secs(5),
            detail_level: DetailLevel::Detailed,
            last_toast_time: None,
        }
    }

    /// Create a new in-progress notification
    pub fn create_notification(
        &mut self,
        operation_type: OperationType,
        resource_type: String,
        resource_name: String,
    ) -> Uuid {
        let notification = Notification::new(operation_type, resource_type, resource_name);
        let id = notification.id;
        self.notifications.push_front(notification);
        self.last_toast_time = Some(Instant::now());
        self.trim_history();
        id
    }

    /// Record an already-failed operation as a one-shot error toast
    pub fn notify_error(
        &mut self,
        operation_type: OperationType,
        resource_type: String,
        resource_name: String,
        error: String,
    ) -> Uuid {
        let id = self.create_notification(operation_type, resource_type, resource_name);
        self.mark_error(id, error);
        id
    }

    pub fn mark_success(&mut self, id: Uuid) {
        self.finish(id, NotificationStatus::Success);
    }

    pub fn mark_warning(&mut self, id: Uuid, message: String) {
        self.finish(id, NotificationStatus::Warning(message));
    }

    pub fn mark_error(&mut self, id: Uuid, error: String) {
        self.finish(id, NotificationStatus::Error(error));
    }

    fn finish(&mut self, id: Uuid, status: NotificationStatus) {
        if let Some(notif) = self.notifications.iter_mut().find(|n| n.id == id) {
            notif.finish(status);
            self.last_toast_time = Some(Instant::now());
        }
    }

    /// Get notification by ID
    pub fn get(&self, id: Uuid) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// Get the most recent notification while its toast is visible
    pub fn current_toast(&self) -> Option<&Notification> {
        let last_time = self.last_toast_time?;
        if last_time.elapsed() > self.toast_duration {
            return None;
        }
        self.notifications.front()
    }

    /// Get count of in-progress operations
    pub fn in_progress_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.status == NotificationStatus::InProgress)
            .count()
    }

    /// Clear all notifications
    pub fn clear(&mut self) {
        self.notifications.clear();
        self.last_toast_time = None;
    }

    /// Trim history to max size
    fn trim_history(&mut self) {
        while self.notifications.len() > self.max_history {
            // Remove oldest completed notification
            if let Some(pos) = self.notifications.iter().rposition(|n| n.status.is_terminal()) {
                self.notifications.remove(pos);
            } else {
                self.notifications.pop_back();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_lifecycle() {
        let mut manager = NotificationManager::new();

        let id = manager.create_notification(
            OperationType::Deploy,
            "containers".to_string(),
            "website".to_string(),
        );

        assert_eq!(manager.notifications.len(), 1);
        assert_eq!(manager.in_progress_count(), 1);

        manager.mark_success(id);
        assert_eq!(manager.get(id).unwrap().status, NotificationStatus::Success);
        assert_eq!(manager.in_progress_count(), 0);
        assert!(manager.current_toast().is_some());
    }

    #[test]
    fn test_operation_type_from_action() {
        assert_eq!(
            OperationType::from_action(ActionKind::PowerOff),
            Some(OperationType::PowerOff)
        );
        assert_eq!(
            OperationType::from_action(ActionKind::Deploy),
            Some(OperationType::Deploy)
        );
        assert_eq!(OperationType::from_action(ActionKind::OpenConsole), None);
    }

    #[test]
    fn test_toast_message_formats() {
        let mut notif = Notification::new(
            OperationType::Reboot,
            "instances".to_string(),
            "web-1".to_string(),
        );

        let msg = notif.toast_message(DetailLevel::Minimal);
        assert!(msg.contains("Rebooting"));
        assert!(msg.contains("web-1"));

        notif.finish(NotificationStatus::Success);
        let msg = notif.toast_message(DetailLevel::Minimal);
        assert!(msg.contains("Rebooted"));
        assert!(msg.contains("✓"));
    }

    #[test]
    fn test_error_toast_carries_message() {
        let mut manager = NotificationManager::new();
        let id = manager.notify_error(
            OperationType::Fetch,
            "databases".to_string(),
            "Databases".to_string(),
            "Resource not found.".to_string(),
        );

        let msg = manager
            .get(id)
            .unwrap()
            .toast_message(DetailLevel::Detailed);
        assert_eq!(msg, "✗ Failed: fetch Databases: Resource not found.");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut manager = NotificationManager::new();
        manager.max_history = 3;
        for i in 0..5 {
            let id = manager.create_notification(
                OperationType::PowerOn,
                "instances".to_string(),
                format!("vm-{}", i),
            );
            manager.mark_success(id);
        }
        assert_eq!(manager.notifications.len(), 3);
        assert_eq!(manager.notifications[0].resource_name, "vm-4");
    }
}
