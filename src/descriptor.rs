//! Declarative view descriptors: the raw configuration input describing
//! what embedded artifact to show.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four recognized view types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Report,
    Dashboard,
    Tile,
    Visual,
}

impl ViewKind {
    /// Parse a raw descriptor `type` value. `None` for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "report" => Some(Self::Report),
            "dashboard" => Some(Self::Dashboard),
            "tile" => Some(Self::Tile),
            "visual" => Some(Self::Visual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Dashboard => "dashboard",
            Self::Tile => "tile",
            Self::Visual => "visual",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw declarative description of what to display. Resolved once at startup;
/// nothing downstream sees it until it has passed validation.
///
/// Field names follow the declarative config surface (camelCase). All fields
/// default so that missing values surface as validation violations rather
/// than deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewDescriptor {
    /// Raw view type; recognized values are `report`, `dashboard`, `tile`,
    /// `visual`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Identifier of the primary artifact (report, dashboard, tile, visual's
    /// report).
    pub id: String,
    /// Parent dashboard, required for tiles.
    pub dashboard_id: Option<String>,
    /// Target visual name, required for visuals.
    pub visual_name: Option<String>,
    /// Page hosting the visual (required for visuals) or opened by a report.
    pub page_name: Option<String>,
    /// Optional workspace scoping.
    pub group_id: Option<String>,
    pub show_filter_pane: bool,
    pub show_nav_pane: bool,
    /// Name of a registered callback producing report filters.
    pub filter_fn: Option<String>,
    /// Name of a registered callback invoked with the live surface.
    pub custom_fn: Option<String>,
}
