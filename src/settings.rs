//! Host configuration surface: the read-only inputs the embed pipeline
//! consumes. Loaded from YAML the same way other declarative definitions in
//! this codebase are.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::descriptor::ViewDescriptor;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSettings {
    /// Base URL the per-type embed path segments are appended to.
    pub embed_base_url: String,
    /// Whether proactive token renewal is wired up at all.
    #[serde(default)]
    pub auto_refresh: bool,
    /// Preview flag carried on the view-start event.
    #[serde(default)]
    pub preview: bool,
    /// Auxiliary scripts fetched before embedding. All must load.
    #[serde(default)]
    pub script_urls: Vec<String>,
    /// What to display.
    pub view: ViewDescriptor,
}

impl HostSettings {
    pub fn from_yaml(source: &str) -> anyhow::Result<Self> {
        let settings: Self =
            serde_yaml::from_str(source).context("failed to parse host settings")?;
        settings.check_base_url()?;
        Ok(settings)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::from_yaml(&raw)
    }

    fn check_base_url(&self) -> anyhow::Result<()> {
        Url::parse(&self.embed_base_url)
            .with_context(|| format!("embed base URL `{}` is not a valid URL", self.embed_base_url))?;
        Ok(())
    }
}
