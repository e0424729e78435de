//! Embed configuration: one tagged variant per view type, built from a
//! validated view plus a token, with a single exhaustive lowering to the
//! wire-level shape the embedding SDK accepts.

use serde::Serialize;

use crate::descriptor::ViewKind;
use crate::embed_url::embed_url;
use crate::ports::AccessToken;
use crate::validate::{ValidView, ViewTarget};

const TOKEN_TYPE_ORGANIZATIONAL: &str = "organizational";
const PERMISSIONS_READ: &str = "read";
const VIEW_MODE_VIEW: &str = "view";
const LAYOUT_CUSTOM: &str = "custom";
const DISPLAY_FIT_TO_WIDTH: &str = "fitToWidth";

/// Fields shared by every configuration variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedCommon {
    pub kind: ViewKind,
    pub access_token: AccessToken,
    pub embed_url: String,
    /// Identifier of the primary artifact.
    pub id: String,
}

/// Report display settings: pane visibility plus the fixed fit-to-width
/// custom layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub filter_pane: bool,
    pub nav_pane: bool,
}

/// SDK-ready embed configuration, tagged by view type. Each variant carries
/// only the fields its type needs; a visual is a constrained report view and
/// a tile is displayed via its parent dashboard's embed surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedConfig {
    Dashboard {
        common: EmbedCommon,
        dashboard_id: String,
    },
    Tile {
        common: EmbedCommon,
        /// Parent dashboard; the tile id itself is the primary id and is
        /// already folded into the embed URL.
        dashboard_id: String,
    },
    Report {
        common: EmbedCommon,
        page_name: Option<String>,
        display: DisplaySettings,
    },
    Visual {
        common: EmbedCommon,
        page_name: String,
        visual_name: String,
        display: DisplaySettings,
    },
}

impl EmbedConfig {
    pub fn common(&self) -> &EmbedCommon {
        match self {
            Self::Dashboard { common, .. }
            | Self::Tile { common, .. }
            | Self::Report { common, .. }
            | Self::Visual { common, .. } => common,
        }
    }

    pub fn kind(&self) -> ViewKind {
        self.common().kind
    }

    /// The one exhaustive mapping from typed variant to wire shape.
    pub fn to_wire(&self) -> WireConfig {
        let common = self.common();
        let mut wire = WireConfig {
            view_type: common.kind,
            token_type: TOKEN_TYPE_ORGANIZATIONAL,
            access_token: common.access_token.expose().to_string(),
            embed_url: common.embed_url.clone(),
            id: common.id.clone(),
            permissions: PERMISSIONS_READ,
            view_mode: VIEW_MODE_VIEW,
            dashboard_id: None,
            page_name: None,
            visual_name: None,
            settings: None,
            filters: None,
        };
        match self {
            Self::Dashboard { dashboard_id, .. } | Self::Tile { dashboard_id, .. } => {
                wire.dashboard_id = Some(dashboard_id.clone());
            }
            Self::Report {
                page_name, display, ..
            } => {
                wire.page_name = page_name.clone();
                wire.settings = Some(WireDisplaySettings::from(*display));
            }
            Self::Visual {
                page_name,
                visual_name,
                display,
                ..
            } => {
                wire.page_name = Some(page_name.clone());
                wire.visual_name = Some(visual_name.clone());
                wire.settings = Some(WireDisplaySettings::from(*display));
            }
        }
        wire
    }
}

/// Build the configuration for a validated view. Pure: same inputs, same
/// output.
pub fn build(view: &ValidView, token: &AccessToken, embed_base_url: &str) -> EmbedConfig {
    let url = embed_url(embed_base_url, &view.target, view.group_id.as_deref());
    let common = EmbedCommon {
        kind: view.kind(),
        access_token: token.clone(),
        embed_url: url,
        id: view.target.id().to_string(),
    };
    let display = DisplaySettings {
        filter_pane: view.show_filter_pane,
        nav_pane: view.show_nav_pane,
    };

    match &view.target {
        ViewTarget::Dashboard { id } => EmbedConfig::Dashboard {
            common,
            dashboard_id: id.clone(),
        },
        ViewTarget::Tile { dashboard_id, .. } => EmbedConfig::Tile {
            common,
            dashboard_id: dashboard_id.clone(),
        },
        ViewTarget::Report { page_name, .. } => EmbedConfig::Report {
            common,
            page_name: page_name.clone(),
            display,
        },
        ViewTarget::Visual {
            page_name,
            visual_name,
            ..
        } => EmbedConfig::Visual {
            common,
            page_name: page_name.clone(),
            visual_name: visual_name.clone(),
            display,
        },
    }
}

/// The flat camelCase object handed to the embedding SDK.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireConfig {
    #[serde(rename = "type")]
    pub view_type: ViewKind,
    pub token_type: &'static str,
    pub access_token: String,
    pub embed_url: String,
    pub id: String,
    pub permissions: &'static str,
    pub view_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<WireDisplaySettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireDisplaySettings {
    pub filter_pane_enabled: bool,
    pub nav_content_pane_enabled: bool,
    pub layout_type: &'static str,
    pub custom_layout: WireCustomLayout,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WireCustomLayout {
    pub display_option: &'static str,
}

impl From<DisplaySettings> for WireDisplaySettings {
    fn from(display: DisplaySettings) -> Self {
        Self {
            filter_pane_enabled: display.filter_pane,
            nav_content_pane_enabled: display.nav_pane,
            layout_type: LAYOUT_CUSTOM,
            custom_layout: WireCustomLayout {
                display_option: DISPLAY_FIT_TO_WIDTH,
            },
        }
    }
}
