//! Inspector proxy: fetches a target page, injects the instrumentation
//! script and serves the result.
mod decode;
mod error;
mod fetch;
mod rewrite;
mod script;
mod server;
mod service;
mod types;

pub use decode::{decode_body, DecodedBody};
pub use error::{ErrorBody, ProxyError, MISSING_URL_MESSAGE};
pub use fetch::{
    FetchSettings, Fetcher, RelayFetcher, ReqwestFetcher, DEFAULT_RELAY_BASE, DEFAULT_USER_AGENT,
};
pub use rewrite::inject_instrumentation;
pub use script::{InstrumentationScript, SCRIPT_MARKER_ATTR};
pub use server::{ProxyServer, ServerConfig, ServerError, ServerHandle};
pub use service::{
    health_body, rewrite_document, ProxyResponse, ProxyService, HTML_CONTENT_TYPE,
    JSON_CONTENT_TYPE,
};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
