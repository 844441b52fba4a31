use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use inspector_core::{ProxyQuery, ProxyRoute, SelectionMode};
use inspector_logging::{inspector_debug, inspector_info, inspector_warn};
use serde::Serialize;
use serde_json::json;
use url::Url;

use crate::{
    decode_body, inject_instrumentation, FetchSettings, Fetcher, InstrumentationScript,
    ProxyError, RelayFetcher, ReqwestFetcher,
};

pub const HTML_CONTENT_TYPE: &str = "text/html";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl ProxyResponse {
    pub fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: HTML_CONTENT_TYPE,
            body,
        }
    }

    pub fn json<T: Serialize>(status: u16, payload: &T) -> Self {
        Self {
            status,
            content_type: JSON_CONTENT_TYPE,
            body: serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string()),
        }
    }
}

/// Stateless request handler shared by all server workers.
pub struct ProxyService {
    direct: Arc<dyn Fetcher>,
    relay: Arc<dyn Fetcher>,
}

impl ProxyService {
    pub fn new(direct: Arc<dyn Fetcher>, relay: Arc<dyn Fetcher>) -> Self {
        Self { direct, relay }
    }

    pub fn from_settings(settings: FetchSettings, relay_base: Url) -> Self {
        let direct: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(settings));
        let relay = Arc::new(RelayFetcher::new(relay_base, direct.clone()));
        Self::new(direct, relay)
    }

    /// Handles `GET /proxy` or `GET /cors-proxy` with the raw query string.
    /// Every failure is turned into a JSON error response here.
    pub async fn handle(&self, route: ProxyRoute, query: Option<&str>) -> ProxyResponse {
        match self.rewrite(route, query).await {
            Ok(html) => ProxyResponse::html(html),
            Err(err) => {
                match &err {
                    ProxyError::Upstream(fetch) => {
                        inspector_warn!("{} failed [{}]: {}", route.path(), fetch.kind, fetch.message)
                    }
                    other => inspector_info!("{} rejected: {}", route.path(), other),
                }
                ProxyResponse::json(err.status_code(), &err.to_body(route))
            }
        }
    }

    async fn rewrite(&self, route: ProxyRoute, query: Option<&str>) -> Result<String, ProxyError> {
        let ProxyQuery { target, mode } = ProxyQuery::parse(query);
        let target = target.ok_or(ProxyError::MissingParameter)?;
        let url = parse_target(&target)?;
        inspector_info!("{} {} mode={}", route.path(), url, mode);

        let fetcher = match route {
            ProxyRoute::Direct => &self.direct,
            ProxyRoute::Relay => &self.relay,
        };
        let output = fetcher.fetch(&url).await?;
        let metadata = &output.metadata;
        inspector_debug!(
            "Fetched {} -> {} ({} bytes, {} redirects, content-type {})",
            metadata.original_url,
            metadata.final_url,
            metadata.byte_len,
            metadata.redirect_count,
            metadata.content_type.as_deref().unwrap_or("unknown")
        );

        let decoded = decode_body(&output.bytes);
        if decoded.had_errors {
            inspector_debug!(
                "{} decoded as {} with replacement characters",
                output.metadata.final_url,
                decoded.encoding_label
            );
        }
        Ok(rewrite_document(&decoded.text, mode))
    }
}

/// Appends the instrumentation script for `mode` to `html`.
pub fn rewrite_document(html: &str, mode: SelectionMode) -> String {
    let script = InstrumentationScript::new(mode).render();
    inject_instrumentation(html, &script)
}

fn parse_target(raw: &str) -> Result<Url, ProxyError> {
    let url = Url::parse(raw).map_err(|err| ProxyError::InvalidTarget {
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ProxyError::InvalidTarget {
            reason: format!("unsupported scheme: {other}"),
        }),
    }
}

/// `GET /health` payload.
pub fn health_body(now: DateTime<Utc>) -> serde_json::Value {
    json!({
        "status": "OK",
        "timestamp": now.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
