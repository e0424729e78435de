//! Descriptor validation. Collects every violation (never just the first),
//! reports each one to the event sink as it is found, and on success parses
//! the raw descriptor into a typed [`ValidView`] so that invalid shapes
//! cannot reach the config builder at all.

use thiserror::Error;

use crate::descriptor::{ViewDescriptor, ViewKind};
use crate::events::{EventSink, HostEvent};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("view id must not be empty")]
    MissingId,
    #[error("unrecognized view type `{0}`")]
    UnknownKind(String),
    #[error("tile views require a dashboardId")]
    MissingDashboardId,
    #[error("visual views require a visualName")]
    MissingVisualName,
    #[error("visual views require a pageName")]
    MissingPageName,
}

/// The typed target of a validated descriptor. Each variant carries exactly
/// the fields its view type needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewTarget {
    Report {
        id: String,
        page_name: Option<String>,
    },
    Dashboard {
        id: String,
    },
    Tile {
        id: String,
        dashboard_id: String,
    },
    Visual {
        id: String,
        page_name: String,
        visual_name: String,
    },
}

impl ViewTarget {
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Report { .. } => ViewKind::Report,
            Self::Dashboard { .. } => ViewKind::Dashboard,
            Self::Tile { .. } => ViewKind::Tile,
            Self::Visual { .. } => ViewKind::Visual,
        }
    }

    /// Identifier of the primary artifact.
    pub fn id(&self) -> &str {
        match self {
            Self::Report { id, .. }
            | Self::Dashboard { id }
            | Self::Tile { id, .. }
            | Self::Visual { id, .. } => id,
        }
    }
}

/// A descriptor that has passed type-specific required-field validation.
/// Only this type flows downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidView {
    pub target: ViewTarget,
    pub group_id: Option<String>,
    pub show_filter_pane: bool,
    pub show_nav_pane: bool,
    pub filter_fn: Option<String>,
    pub custom_fn: Option<String>,
}

impl ValidView {
    pub fn kind(&self) -> ViewKind {
        self.target.kind()
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Check a raw descriptor against the per-type required fields.
///
/// Rules are evaluated independently; every violation found is both emitted
/// to `events` at the moment of discovery and collected into the error value.
pub fn validate(
    descriptor: &ViewDescriptor,
    events: &dyn EventSink,
) -> Result<ValidView, Vec<ValidationError>> {
    let mut violations: Vec<ValidationError> = Vec::new();
    let mut report = |violation: ValidationError| {
        events.emit(HostEvent::ValidationFailed {
            violation: violation.clone(),
        });
        violations.push(violation);
    };

    let kind = ViewKind::parse(&descriptor.kind);
    if kind.is_none() {
        report(ValidationError::UnknownKind(descriptor.kind.clone()));
    }
    if descriptor.id.is_empty() {
        report(ValidationError::MissingId);
    }

    let target = match kind {
        None => None,
        Some(ViewKind::Report) => Some(ViewTarget::Report {
            id: descriptor.id.clone(),
            page_name: non_empty(&descriptor.page_name),
        }),
        Some(ViewKind::Dashboard) => Some(ViewTarget::Dashboard {
            id: descriptor.id.clone(),
        }),
        Some(ViewKind::Tile) => match non_empty(&descriptor.dashboard_id) {
            Some(dashboard_id) => Some(ViewTarget::Tile {
                id: descriptor.id.clone(),
                dashboard_id,
            }),
            None => {
                report(ValidationError::MissingDashboardId);
                None
            }
        },
        Some(ViewKind::Visual) => {
            let visual_name = non_empty(&descriptor.visual_name);
            if visual_name.is_none() {
                report(ValidationError::MissingVisualName);
            }
            let page_name = non_empty(&descriptor.page_name);
            if page_name.is_none() {
                report(ValidationError::MissingPageName);
            }
            match (visual_name, page_name) {
                (Some(visual_name), Some(page_name)) => Some(ViewTarget::Visual {
                    id: descriptor.id.clone(),
                    page_name,
                    visual_name,
                }),
                _ => None,
            }
        }
    };

    match target {
        Some(target) if violations.is_empty() => Ok(ValidView {
            target,
            group_id: non_empty(&descriptor.group_id),
            show_filter_pane: descriptor.show_filter_pane,
            show_nav_pane: descriptor.show_nav_pane,
            filter_fn: non_empty(&descriptor.filter_fn),
            custom_fn: non_empty(&descriptor.custom_fn),
        }),
        _ => Err(violations),
    }
}
