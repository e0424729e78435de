//! Embed URL construction: base URL + a path segment keyed by view type +
//! the id query parameters in a fixed order.

use url::form_urlencoded;

use crate::validate::ViewTarget;

/// Build the embed URL for a validated target. Deterministic: parameter
/// order is fixed (`reportId`/`dashboardId`, then `tileId`, then `groupId`).
pub fn embed_url(base: &str, target: &ViewTarget, group_id: Option<&str>) -> String {
    let segment = match target {
        ViewTarget::Report { .. } | ViewTarget::Visual { .. } => "reportEmbed",
        ViewTarget::Dashboard { .. } => "dashboardEmbed",
        ViewTarget::Tile { .. } => "embed",
    };

    let mut query = form_urlencoded::Serializer::new(String::new());
    match target {
        ViewTarget::Report { id, .. } | ViewTarget::Visual { id, .. } => {
            query.append_pair("reportId", id);
        }
        ViewTarget::Dashboard { id } => {
            query.append_pair("dashboardId", id);
        }
        ViewTarget::Tile { id, dashboard_id } => {
            query.append_pair("dashboardId", dashboard_id);
            query.append_pair("tileId", id);
        }
    }
    if let Some(group) = group_id {
        query.append_pair("groupId", group);
    }

    format!(
        "{}/{}?{}",
        base.trim_end_matches('/'),
        segment,
        query.finish()
    )
}
