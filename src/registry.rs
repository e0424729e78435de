//! Explicit registry for externally supplied callbacks. Host code registers
//! named functions at startup; the orchestrator resolves them by the names
//! carried in the view descriptor. Unregistered names yield a typed error
//! instead of a namespace walk.

use std::collections::HashMap;

use thiserror::Error;

use crate::ports::LiveSurface;

/// Produces the raw filter payload for a view. The pipeline only attaches
/// the result when it is a well-formed JSON array.
pub type FilterSource = Box<dyn Fn() -> serde_json::Value + Send + Sync>;

/// Invoked with the live surface after a successful embed.
pub type SurfaceHook = Box<dyn Fn(&dyn LiveSurface) -> anyhow::Result<()> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no callback registered under `{0}`")]
pub struct UnregisteredCallback(pub String);

#[derive(Default)]
pub struct CallbackRegistry {
    filter_sources: HashMap<String, FilterSource>,
    surface_hooks: HashMap<String, SurfaceHook>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_filter_source(
        &mut self,
        name: impl Into<String>,
        source: impl Fn() -> serde_json::Value + Send + Sync + 'static,
    ) {
        self.filter_sources.insert(name.into(), Box::new(source));
    }

    pub fn register_surface_hook(
        &mut self,
        name: impl Into<String>,
        hook: impl Fn(&dyn LiveSurface) -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.surface_hooks.insert(name.into(), Box::new(hook));
    }

    pub fn filter_source(&self, name: &str) -> Result<&FilterSource, UnregisteredCallback> {
        self.filter_sources
            .get(name)
            .ok_or_else(|| UnregisteredCallback(name.to_string()))
    }

    pub fn surface_hook(&self, name: &str) -> Result<&SurfaceHook, UnregisteredCallback> {
        self.surface_hooks
            .get(name)
            .ok_or_else(|| UnregisteredCallback(name.to_string()))
    }
}
