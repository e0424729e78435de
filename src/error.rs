//! Failure taxonomy for the embed pipeline.

use std::fmt;

use thiserror::Error;

use crate::http::HttpError;
use crate::ports::{AuthError, SdkError};

/// Which part of the token lifecycle an authentication failure hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    /// The token fetch before the first embed.
    Initial,
    /// A proactive renewal fetch for a live session.
    Renewal,
    /// Pushing a renewed token into the live surface.
    TokenPush,
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Initial => "initial token fetch",
            Self::Renewal => "token renewal",
            Self::TokenPush => "token push",
        };
        f.write_str(label)
    }
}

/// One failed auxiliary script fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFailure {
    pub url: String,
    pub error: HttpError,
}

impl fmt::Display for ScriptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.url, self.error)
    }
}

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("view descriptor invalid: {violations} violation(s)")]
    InvalidDescriptor { violations: usize },

    #[error("script load failed: {} fetch(es) failed", .0.len())]
    ScriptLoad(Vec<ScriptFailure>),

    #[error("authentication failed ({stage}): {source}")]
    Auth {
        stage: AuthStage,
        #[source]
        source: AuthError,
    },

    #[error("embed call failed: {0}")]
    Sdk(#[from] SdkError),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}
