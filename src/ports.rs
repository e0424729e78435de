//! Collaborator boundaries: the traits the embed pipeline depends on.
//! The host depends on these, never on a concrete auth service or vendor SDK.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::WireConfig;

/// Opaque bearer token. Never logged; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw secret, for placing into an embed configuration.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// A freshly issued token, with the expiry the issuer reported (if any).
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub token: AccessToken,
    pub expires_on: Option<DateTime<Utc>>,
}

impl TokenGrant {
    pub fn new(token: AccessToken) -> Self {
        Self {
            token,
            expires_on: None,
        }
    }
}

/// Signal from the auth collaborator that the current token is about to expire.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryNotice;

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct AuthError(pub String);

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SdkError(pub String);

impl SdkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Authentication collaborator.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquire a bearer token for the organizational identity.
    async fn fetch_token(&self) -> Result<TokenGrant, AuthError>;

    /// About-to-expire notification slot. Providers that support proactive
    /// renewal hand out their receiver here; it is yielded at most once per
    /// session; later calls return `None`. The default provider has no slot.
    fn expiry_notifications(&self) -> Option<mpsc::Receiver<ExpiryNotice>> {
        None
    }
}

/// The runtime handle returned after embedding. Owned by the orchestrator's
/// caller; the lifecycle manager only ever pushes new tokens into it.
#[async_trait]
pub trait LiveSurface: Send + Sync {
    async fn set_access_token(&self, token: &AccessToken) -> Result<(), SdkError>;
}

/// Opaque reference to the page element the surface renders into.
#[derive(Debug, Clone)]
pub struct ContainerHandle(pub String);

impl ContainerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Vendor embedding SDK entry point.
pub trait EmbedSdk: Send + Sync {
    fn embed(
        &self,
        container: &ContainerHandle,
        config: &WireConfig,
    ) -> Result<Arc<dyn LiveSurface>, SdkError>;
}

/// Page-level chrome: the generic error indicator and the hard-reload
/// fallback. Both externally owned; the host only triggers them.
pub trait HostPage: Send + Sync {
    fn show_error(&self);
    fn reload(&self);
}
