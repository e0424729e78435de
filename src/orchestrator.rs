//! Top-level embed pipeline: validate, announce, register renewal, load
//! scripts, fetch the initial token, build the configuration, embed, and
//! apply per-view customization. Every failure path converges on the page's
//! generic error indicator; raw failures never reach the page.

use std::sync::{Arc, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{self, WireConfig};
use crate::error::{AuthStage, EmbedError};
use crate::events::{EventSink, HostEvent};
use crate::lifecycle::TokenLifecycleManager;
use crate::http::HttpSend;
use crate::ports::{ContainerHandle, EmbedSdk, HostPage, LiveSurface, TokenProvider};
use crate::registry::CallbackRegistry;
use crate::scripts;
use crate::settings::HostSettings;
use crate::validate::{validate, ValidView};

/// The live binding produced by a successful embed: the surface handle plus
/// the renewal task keeping its token fresh.
pub struct EmbedSession {
    id: Uuid,
    surface: Arc<dyn LiveSurface>,
    renewal: Option<JoinHandle<()>>,
    // Keeps the lifecycle manager's surface slot alive for the session.
    _surface_tx: watch::Sender<Option<Weak<dyn LiveSurface>>>,
}

impl std::fmt::Debug for EmbedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedSession")
            .field("id", &self.id)
            .field("renewal_active", &self.renewal.is_some())
            .finish_non_exhaustive()
    }
}

impl EmbedSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn surface(&self) -> &Arc<dyn LiveSurface> {
        &self.surface
    }

    /// Whether the renewal task is attached and still running.
    pub fn renewal_active(&self) -> bool {
        self.renewal.as_ref().is_some_and(|h| !h.is_finished())
    }
}

pub struct EmbedOrchestrator {
    settings: HostSettings,
    container: ContainerHandle,
    provider: Arc<dyn TokenProvider>,
    sdk: Arc<dyn EmbedSdk>,
    http: Arc<dyn HttpSend>,
    registry: CallbackRegistry,
    events: Arc<dyn EventSink>,
    page: Arc<dyn HostPage>,
}

impl EmbedOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: HostSettings,
        container: ContainerHandle,
        provider: Arc<dyn TokenProvider>,
        sdk: Arc<dyn EmbedSdk>,
        http: Arc<dyn HttpSend>,
        registry: CallbackRegistry,
        events: Arc<dyn EventSink>,
        page: Arc<dyn HostPage>,
    ) -> Self {
        Self {
            settings,
            container,
            provider,
            sdk,
            http,
            registry,
            events,
            page,
        }
    }

    /// Run the full startup pipeline once. On any unrecoverable failure the
    /// page error indicator is shown and a typed error returned; details have
    /// already been reported through the event sink.
    pub async fn run(&self) -> Result<EmbedSession, EmbedError> {
        let attempt = Uuid::new_v4();

        let view = match validate(&self.settings.view, self.events.as_ref()) {
            Ok(view) => view,
            Err(violations) => {
                self.page.show_error();
                return Err(EmbedError::InvalidDescriptor {
                    violations: violations.len(),
                });
            }
        };

        self.events.emit(HostEvent::ViewStart {
            kind: view.kind(),
            preview: self.settings.preview,
        });
        info!(%attempt, kind = %view.kind(), "starting embed");

        // Renewal registration happens-before any embed attempt, so no
        // expiry notification can be lost across startup.
        let (surface_tx, surface_rx) = watch::channel(None);
        let renewal = self.register_renewal(surface_rx);

        match self.embed_view(&view, &surface_tx).await {
            Ok(surface) => {
                info!(%attempt, "embed complete");
                Ok(EmbedSession {
                    id: attempt,
                    surface,
                    renewal,
                    _surface_tx: surface_tx,
                })
            }
            Err(err) => {
                if let Some(handle) = renewal {
                    handle.abort();
                }
                self.page.show_error();
                Err(err)
            }
        }
    }

    /// Pipeline steps after renewal registration: scripts, token, config,
    /// embed, customization.
    async fn embed_view(
        &self,
        view: &ValidView,
        surface_tx: &watch::Sender<Option<Weak<dyn LiveSurface>>>,
    ) -> Result<Arc<dyn LiveSurface>, EmbedError> {
        scripts::load_all(
            self.http.as_ref(),
            &self.settings.script_urls,
            self.events.as_ref(),
        )
        .await
        .map_err(EmbedError::ScriptLoad)?;

        let grant = match self.provider.fetch_token().await {
            Ok(grant) => grant,
            Err(err) => {
                self.events.emit(HostEvent::AuthFailed {
                    stage: AuthStage::Initial,
                    message: err.to_string(),
                });
                return Err(EmbedError::Auth {
                    stage: AuthStage::Initial,
                    source: err,
                });
            }
        };

        let config = config::build(view, &grant.token, &self.settings.embed_base_url);
        let mut wire = config.to_wire();

        if let Some(name) = &view.filter_fn {
            self.attach_filters(name, &mut wire);
        }

        let surface = match self.sdk.embed(&self.container, &wire) {
            Ok(surface) => surface,
            Err(err) => {
                self.events.emit(HostEvent::EmbedFailed {
                    message: err.to_string(),
                });
                return Err(EmbedError::Sdk(err));
            }
        };
        let _ = surface_tx.send(Some(Arc::downgrade(&surface)));

        if let Some(name) = &view.custom_fn {
            self.run_surface_hook(name, surface.as_ref());
        }

        Ok(surface)
    }

    /// Spawn the token lifecycle manager when auto-refresh is enabled and the
    /// provider exposes an expiry notification slot.
    fn register_renewal(
        &self,
        surface_rx: watch::Receiver<Option<Weak<dyn LiveSurface>>>,
    ) -> Option<JoinHandle<()>> {
        if !self.settings.auto_refresh {
            return None;
        }
        match self.provider.expiry_notifications() {
            Some(notices) => {
                let manager = TokenLifecycleManager::new(
                    self.provider.clone(),
                    self.page.clone(),
                    self.events.clone(),
                    surface_rx,
                );
                Some(tokio::spawn(manager.run(notices)))
            }
            None => {
                warn!("auto refresh enabled but the token provider exposes no expiry notifications");
                None
            }
        }
    }

    /// Resolve and invoke the configured filter callback. Only a well-formed
    /// JSON array is attached; anything else degrades to an unfiltered view.
    fn attach_filters(&self, name: &str, wire: &mut WireConfig) {
        match self.registry.filter_source(name) {
            Ok(source) => match source() {
                serde_json::Value::Array(filters) => {
                    debug!(callback = %name, count = filters.len(), "attaching filters");
                    wire.filters = Some(filters);
                }
                other => {
                    warn!(
                        callback = %name,
                        value_type = value_type_name(&other),
                        "filter callback returned a non-list value, continuing without filters"
                    );
                }
            },
            Err(err) => {
                warn!(%err, "filter callback unavailable, continuing without filters");
            }
        }
    }

    /// Resolve and invoke the post-embed hook. Hook failures are reported and
    /// swallowed, since the embed has already succeeded.
    fn run_surface_hook(&self, name: &str, surface: &dyn LiveSurface) {
        match self.registry.surface_hook(name) {
            Ok(hook) => {
                if let Err(err) = hook(surface) {
                    warn!(callback = %name, error = %err, "post-embed hook failed");
                }
            }
            Err(err) => {
                warn!(%err, "post-embed hook unavailable");
            }
        }
    }
}

fn value_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
