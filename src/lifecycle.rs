//! Token lifecycle: proactive renewal driven by the auth collaborator's
//! about-to-expire notifications, with a hard page reload as the only
//! fallback. The manager never creates or destroys the live surface; it only
//! pushes fresh tokens into it through a weak reference.

use std::sync::{Arc, Weak};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::error::AuthStage;
use crate::events::{EventSink, HostEvent};
use crate::ports::{ExpiryNotice, HostPage, LiveSurface, TokenProvider};

/// Renewal state. At most one renewal is in flight per session; a failed
/// renewal never returns to `Idle`; the page context is abandoned instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalState {
    Idle,
    Renewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenewalOutcome {
    /// New token pushed into the surface; back to idle.
    Renewed,
    /// Fetch or push failed; the session cannot be trusted any more.
    Abandoned,
    /// The surface is gone (startup failed or the page is tearing down).
    Detached,
}

/// Slot the orchestrator fills with the live surface at embed time. The
/// sender side is dropped when startup fails, which ends the manager task.
pub type SurfaceSlot = watch::Receiver<Option<Weak<dyn LiveSurface>>>;

pub struct TokenLifecycleManager {
    provider: Arc<dyn TokenProvider>,
    page: Arc<dyn HostPage>,
    events: Arc<dyn EventSink>,
    surface: SurfaceSlot,
    state: RenewalState,
}

impl TokenLifecycleManager {
    pub fn new(
        provider: Arc<dyn TokenProvider>,
        page: Arc<dyn HostPage>,
        events: Arc<dyn EventSink>,
        surface: SurfaceSlot,
    ) -> Self {
        Self {
            provider,
            page,
            events,
            surface,
            state: RenewalState::Idle,
        }
    }

    pub fn state(&self) -> RenewalState {
        self.state
    }

    /// Consume expiry notices until the channel closes or the session ends.
    /// Notices are processed strictly one at a time. On renewal failure the
    /// fallback fires exactly once and the task ends. No retry loop.
    pub async fn run(mut self, mut notices: mpsc::Receiver<ExpiryNotice>) {
        debug!("token lifecycle manager attached");
        while let Some(ExpiryNotice) = notices.recv().await {
            match self.renew_once().await {
                RenewalOutcome::Renewed => {}
                RenewalOutcome::Abandoned => {
                    warn!("token renewal failed, reloading page");
                    self.page.reload();
                    return;
                }
                RenewalOutcome::Detached => {
                    debug!("live surface gone, lifecycle manager exiting");
                    return;
                }
            }
        }
        debug!("expiry notification channel closed");
    }

    async fn renew_once(&mut self) -> RenewalOutcome {
        self.state = RenewalState::Renewing;

        let grant = match self.provider.fetch_token().await {
            Ok(grant) => grant,
            Err(err) => {
                self.events.emit(HostEvent::AuthFailed {
                    stage: AuthStage::Renewal,
                    message: err.to_string(),
                });
                return RenewalOutcome::Abandoned;
            }
        };

        let surface = match self.wait_for_surface().await {
            Some(surface) => surface,
            None => return RenewalOutcome::Detached,
        };

        match surface.set_access_token(&grant.token).await {
            Ok(()) => {
                self.state = RenewalState::Idle;
                info!(expires_on = ?grant.expires_on, "access token renewed");
                RenewalOutcome::Renewed
            }
            Err(err) => {
                self.events.emit(HostEvent::AuthFailed {
                    stage: AuthStage::TokenPush,
                    message: err.to_string(),
                });
                RenewalOutcome::Abandoned
            }
        }
    }

    /// Wait until the orchestrator has attached the live surface. Returns
    /// `None` when the slot sender was dropped (startup never reached embed)
    /// or the surface itself has been dropped.
    async fn wait_for_surface(&mut self) -> Option<Arc<dyn LiveSurface>> {
        loop {
            let current = self.surface.borrow_and_update().clone();
            if let Some(weak) = current {
                return weak.upgrade();
            }
            if self.surface.changed().await.is_err() {
                return None;
            }
        }
    }
}
