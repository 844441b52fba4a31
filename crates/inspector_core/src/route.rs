//! URL contract shared by the proxy server and the dashboard.
use url::{form_urlencoded, Url};

use crate::SelectionMode;

pub const PROXY_PATH: &str = "/proxy";
pub const RELAY_PROXY_PATH: &str = "/cors-proxy";
pub const HEALTH_PATH: &str = "/health";

/// How the proxy obtains the upstream document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyRoute {
    /// The proxy fetches the target itself.
    Direct,
    /// The proxy fetches through a third-party CORS relay.
    Relay,
}

impl ProxyRoute {
    pub fn path(self) -> &'static str {
        match self {
            ProxyRoute::Direct => PROXY_PATH,
            ProxyRoute::Relay => RELAY_PROXY_PATH,
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            PROXY_PATH => Some(ProxyRoute::Direct),
            RELAY_PROXY_PATH => Some(ProxyRoute::Relay),
            _ => None,
        }
    }
}

/// Builds `{base}/proxy?url=<target>&mode=<mode>` (or the relay variant).
/// A path on `base` is kept as a prefix.
pub fn proxy_url(base: &Url, route: ProxyRoute, target: &str, mode: SelectionMode) -> Url {
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{prefix}{}", route.path()));
    url.set_query(None);
    url.set_fragment(None);
    url.query_pairs_mut()
        .append_pair("url", target)
        .append_pair("mode", mode.as_str());
    url
}

/// Query arguments accepted by the proxy routes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProxyQuery {
    /// Raw `url` argument; `None` when absent or empty.
    pub target: Option<String>,
    pub mode: SelectionMode,
}

impl ProxyQuery {
    pub fn parse(query: Option<&str>) -> Self {
        let mut target = None;
        let mut mode = None;
        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "url" if target.is_none() => target = Some(value.into_owned()),
                "mode" if mode.is_none() => mode = Some(value.into_owned()),
                _ => {}
            }
        }
        Self {
            target: target.filter(|value| !value.is_empty()),
            mode: SelectionMode::from_query_value(mode.as_deref()),
        }
    }
}
