//! Status presentation
//!
//! Maps every status enumeration to an icon, an optional tint and a tooltip.
//! Each function is total over its enumeration.

use crate::scw::types::{ContainerStatus, DatabaseStatus, InstanceState, Privacy, RedisClusterStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusIcon {
    QuestionMark,
    Stop,
    /// Full progress circle
    Circle,
    /// Quarter progress circle
    CircleQuarter,
    Lock,
    Unlock,
}

impl StatusIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::QuestionMark => "?",
            Self::Stop => "■",
            Self::Circle => "●",
            Self::CircleQuarter => "◔",
            Self::Lock => "🔒",
            Self::Unlock => "🔓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tint {
    Green,
    Red,
    Blue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPresentation {
    pub icon: StatusIcon,
    pub tint: Option<Tint>,
    pub tooltip: String,
}

impl StatusPresentation {
    fn new(icon: StatusIcon, tint: Option<Tint>, status: &str) -> Self {
        Self {
            icon,
            tint,
            tooltip: capitalize(status),
        }
    }
}

/// Upper-case the first letter, leaving the rest untouched
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn container_status(status: ContainerStatus) -> StatusPresentation {
    use ContainerStatus::*;
    use StatusIcon::*;

    let (icon, tint) = match status {
        Unknown => (QuestionMark, None),
        Deleting => (Stop, Some(Tint::Red)),
        Error => (Circle, Some(Tint::Red)),
        Locked => (Lock, Some(Tint::Green)),
        Creating => (CircleQuarter, Some(Tint::Green)),
        Pending => (Circle, Some(Tint::Blue)),
        Ready => (Circle, Some(Tint::Green)),
    };
    StatusPresentation::new(icon, tint, status.as_str())
}

pub fn instance_state(state: InstanceState) -> StatusPresentation {
    use InstanceState::*;
    use StatusIcon::*;

    let (icon, tint) = match state {
        Stopped | StoppedInPlace => (Circle, Some(Tint::Red)),
        Starting => (CircleQuarter, Some(Tint::Blue)),
        Running => (Circle, Some(Tint::Green)),
        Stopping => (Stop, Some(Tint::Red)),
        Locked => (Lock, Some(Tint::Red)),
        Unknown => (QuestionMark, None),
    };
    StatusPresentation::new(icon, tint, state.as_str())
}

pub fn database_status(status: DatabaseStatus) -> StatusPresentation {
    use DatabaseStatus::*;
    use StatusIcon::*;

    let (icon, tint) = match status {
        Unknown => (QuestionMark, None),
        Autohealing | Backuping | Configuring | Initializing | Provisioning | Snapshotting => {
            (Circle, Some(Tint::Blue))
        },
        Locked => (Lock, Some(Tint::Red)),
        DiskFull | Error => (Circle, Some(Tint::Red)),
        Restarting => (CircleQuarter, Some(Tint::Blue)),
        Ready => (Circle, Some(Tint::Green)),
        Deleting => (Stop, Some(Tint::Red)),
    };
    StatusPresentation::new(icon, tint, status.as_str())
}

pub fn redis_status(status: RedisClusterStatus) -> StatusPresentation {
    use RedisClusterStatus::*;
    use StatusIcon::*;

    let (icon, tint) = match status {
        Unknown => (QuestionMark, None),
        Autohealing | Configuring | Initializing | Provisioning => (Circle, Some(Tint::Blue)),
        Locked => (Lock, Some(Tint::Red)),
        Error | Suspended => (Circle, Some(Tint::Red)),
        Ready => (Circle, Some(Tint::Green)),
        Deleting => (Stop, Some(Tint::Red)),
    };
    StatusPresentation::new(icon, tint, status.as_str())
}

pub fn privacy_accessory(privacy: Privacy) -> StatusPresentation {
    let (icon, tint, tooltip) = match privacy {
        Privacy::Public => (StatusIcon::Unlock, Some(Tint::Green), "Public"),
        Privacy::Private => (StatusIcon::Lock, None, "Private"),
        Privacy::Unknown => (StatusIcon::QuestionMark, None, "Unknown"),
    };
    StatusPresentation {
        icon,
        tint,
        tooltip: tooltip.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_maps_to_question_mark() {
        let unknown = StatusPresentation {
            icon: StatusIcon::QuestionMark,
            tint: None,
            tooltip: "Unknown".to_string(),
        };
        assert_eq!(container_status(ContainerStatus::Unknown), unknown);
        assert_eq!(instance_state(InstanceState::Unknown), unknown);
        assert_eq!(database_status(DatabaseStatus::Unknown), unknown);
        assert_eq!(redis_status(RedisClusterStatus::Unknown), unknown);
    }

    #[test]
    fn test_tooltips_capitalize_wire_name() {
        assert_eq!(instance_state(InstanceState::StoppedInPlace).tooltip, "Stopped in place");
        assert_eq!(database_status(DatabaseStatus::DiskFull).tooltip, "Disk_full");
        assert_eq!(container_status(ContainerStatus::Ready).tooltip, "Ready");
    }

    #[test]
    fn test_selected_mappings() {
        let error = container_status(ContainerStatus::Error);
        assert_eq!((error.icon, error.tint), (StatusIcon::Circle, Some(Tint::Red)));

        let restarting = database_status(DatabaseStatus::Restarting);
        assert_eq!(restarting.icon, StatusIcon::CircleQuarter);

        let suspended = redis_status(RedisClusterStatus::Suspended);
        assert_eq!(suspended.tint, Some(Tint::Red));

        assert_eq!(privacy_accessory(Privacy::Public).icon, StatusIcon::Unlock);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("ready"), "Ready");
        assert_eq!(capitalize("éclair"), "Éclair");
    }
}
