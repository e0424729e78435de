//! Diagnostic and analytics events emitted by the embed pipeline, plus the
//! sink boundary they flow through. Diagnostics are injected explicitly; the
//! host keeps no global state.

use tracing::{error, info, warn};

use crate::descriptor::ViewKind;
use crate::error::AuthStage;
use crate::validate::ValidationError;

/// Everything the pipeline reports outward: view-start, each validation
/// violation, each script-load failure, each authentication failure, each
/// caught embed failure.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ViewStart {
        kind: ViewKind,
        preview: bool,
    },
    ValidationFailed {
        violation: ValidationError,
    },
    ScriptLoadFailed {
        url: String,
        status: u16,
        status_text: String,
    },
    AuthFailed {
        stage: AuthStage,
        message: String,
    },
    EmbedFailed {
        message: String,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: HostEvent);
}

/// Default sink: routes every event through the `tracing` facade at a level
/// matching its severity.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: HostEvent) {
        match event {
            HostEvent::ViewStart { kind, preview } => {
                info!(%kind, preview, "embedding view");
            }
            HostEvent::ValidationFailed { violation } => {
                warn!(%violation, "view descriptor violation");
            }
            HostEvent::ScriptLoadFailed {
                url,
                status,
                status_text,
            } => {
                error!(%url, status, %status_text, "auxiliary script load failed");
            }
            HostEvent::AuthFailed { stage, message } => {
                error!(%stage, %message, "authentication failure");
            }
            HostEvent::EmbedFailed { message } => {
                error!(%message, "embed failed");
            }
        }
    }
}
