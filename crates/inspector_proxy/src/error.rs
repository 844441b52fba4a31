use inspector_core::ProxyRoute;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FetchError;

pub const MISSING_URL_MESSAGE: &str = "URL parameter is required";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("URL parameter is required")]
    MissingParameter,
    #[error("invalid target url: {reason}")]
    InvalidTarget { reason: String },
    #[error("upstream fetch failed ({}): {}", .0.kind, .0.message)]
    Upstream(#[from] FetchError),
}

/// Uniform JSON error payload. Callers branch on the HTTP status only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ProxyError {
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::MissingParameter => 400,
            ProxyError::InvalidTarget { .. } | ProxyError::Upstream(_) => 500,
        }
    }

    /// Client-visible payload. The failure kind is not part of it.
    pub fn to_body(&self, route: ProxyRoute) -> ErrorBody {
        match self {
            ProxyError::MissingParameter => ErrorBody {
                error: MISSING_URL_MESSAGE.to_string(),
                details: None,
            },
            ProxyError::InvalidTarget { reason } => ErrorBody {
                error: failure_message(route).to_string(),
                details: Some(reason.clone()),
            },
            ProxyError::Upstream(err) => ErrorBody {
                error: failure_message(route).to_string(),
                details: Some(err.message.clone()),
            },
        }
    }
}

fn failure_message(route: ProxyRoute) -> &'static str {
    match route {
        ProxyRoute::Direct => "Failed to fetch website content",
        ProxyRoute::Relay => "Failed to fetch website content via CORS proxy",
    }
}
