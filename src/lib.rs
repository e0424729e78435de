//! Configuration-driven host for a single embedded analytics view.
//!
//! Resolves a declarative [`ViewDescriptor`] into an SDK-ready embed
//! configuration, runs the startup pipeline against pluggable collaborators
//! (token provider, embedding SDK, HTTP client, page chrome, event sink),
//! and keeps the bearer token fresh through proactive renewal with a hard
//! page reload as the only fallback.

pub mod config;
pub mod descriptor;
pub mod embed_url;
pub mod error;
pub mod events;
pub mod http;
pub mod lifecycle;
pub mod orchestrator;
pub mod ports;
pub mod registry;
pub mod scripts;
pub mod settings;
pub mod validate;

pub use config::{build, DisplaySettings, EmbedCommon, EmbedConfig, WireConfig};
pub use descriptor::{ViewDescriptor, ViewKind};
pub use error::{AuthStage, EmbedError, ScriptFailure};
pub use events::{EventSink, HostEvent, TracingSink};
pub use http::{HttpError, HttpRequest, HttpSend, ReqwestSender};
pub use lifecycle::{RenewalState, TokenLifecycleManager};
pub use orchestrator::{EmbedOrchestrator, EmbedSession};
pub use ports::{
    AccessToken, AuthError, ContainerHandle, EmbedSdk, ExpiryNotice, HostPage, LiveSurface,
    SdkError, TokenGrant, TokenProvider,
};
pub use registry::{CallbackRegistry, UnregisteredCallback};
pub use settings::HostSettings;
pub use validate::{validate, ValidView, ValidationError, ViewTarget};
