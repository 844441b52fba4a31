use std::sync::Once;

use inspector_core::{proxy_url, ProxyRoute, SelectionMode};
use inspector_proxy::{ErrorBody, FetchSettings, ProxyServer, ServerConfig, ServerHandle};
use pretty_assertions::assert_eq;
use scraper::{Html, Selector};
use url::Url;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MARKER: &str = "data-scrape-inspector=\"instrumentation\"";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(inspector_logging::initialize_for_tests);
}

struct Harness {
    _handle: ServerHandle,
    base: Url,
    client: reqwest::Client,
}

impl Harness {
    fn start(relay_base: Url) -> Self {
        init_logging();
        let server = ProxyServer::bind(ServerConfig {
            bind: "127.0.0.1:0".to_string(),
            fetch: FetchSettings::default(),
            relay_base,
            worker_threads: 2,
        })
        .expect("bind proxy");
        let handle = server.spawn();
        let addr = handle.addr().expect("ip listener");
        Self {
            _handle: handle,
            base: Url::parse(&format!("http://{addr}")).unwrap(),
            client: reqwest::Client::new(),
        }
    }

    fn for_upstream(upstream: &MockServer) -> Self {
        Self::start(Url::parse(&format!("{}/raw", upstream.uri())).unwrap())
    }

    async fn get(&self, route: &str) -> (u16, Option<String>, Option<String>, String) {
        let response = self
            .client
            .get(self.base.join(route).unwrap())
            .send()
            .await
            .expect("proxy reachable");
        let status = response.status().as_u16();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(ToOwned::to_owned)
        };
        let content_type = header("content-type");
        let cors = header("access-control-allow-origin");
        let body = response.text().await.expect("body");
        (status, content_type, cors, body)
    }

    async fn proxy(&self, route: ProxyRoute, target: &str, mode: SelectionMode) -> (u16, String) {
        let url = proxy_url(&self.base, route, target, mode);
        let (status, _, _, body) = self.get(&url[url::Position::BeforePath..]).await;
        (status, body)
    }
}

fn script_count(html: &str) -> usize {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script[data-scrape-inspector]").unwrap();
    document.select(&selector).count()
}

#[tokio::test]
async fn proxy_injects_exactly_one_script_before_last_body_close() {
    let upstream = MockServer::start().await;
    let page = "<html><body><pre>&lt;/body&gt;</pre><script>var s = '</body>';</script>\
                <p id=\"tail\">end</p></body></html>";
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html; charset=utf-8"))
        .expect(1)
        .mount(&upstream)
        .await;
    let harness = Harness::for_upstream(&upstream);

    let target = format!("{}/page", upstream.uri());
    let url = proxy_url(&harness.base, ProxyRoute::Direct, &target, SelectionMode::Normal);
    let (status, content_type, cors, body) = harness.get(&url[url::Position::BeforePath..]).await;

    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some("text/html"));
    assert_eq!(cors.as_deref(), Some("*"));
    assert_eq!(body.matches(MARKER).count(), 1);
    assert!(body.ends_with("</script>\n</body></html>"));
    assert!(body.contains("enabled: false,"));
    assert_eq!(script_count(&body), 1);
}

#[tokio::test]
async fn document_without_body_close_gets_script_appended() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fragment"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Title</h1><p>text"))
        .expect(1)
        .mount(&upstream)
        .await;
    let harness = Harness::for_upstream(&upstream);

    let (status, body) = harness
        .proxy(
            ProxyRoute::Direct,
            &format!("{}/fragment", upstream.uri()),
            SelectionMode::Select,
        )
        .await;

    assert_eq!(status, 200);
    assert!(body.starts_with("<h1>Title</h1><p>text<script "));
    assert!(body.ends_with("</script>\n"));
    assert!(body.contains("enabled: true,"));
    assert_eq!(script_count(&body), 1);
}

#[tokio::test]
async fn missing_url_is_rejected_without_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;
    let harness = Harness::for_upstream(&upstream);

    for route in ["/proxy", "/proxy?mode=select", "/cors-proxy?url="] {
        let (status, content_type, _, body) = harness.get(route).await;
        assert_eq!(status, 400, "{route}");
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let body: ErrorBody = serde_json::from_str(&body).unwrap();
        assert_eq!(
            body,
            ErrorBody {
                error: "URL parameter is required".to_string(),
                details: None,
            }
        );
    }
}

#[tokio::test]
async fn malformed_url_fails_before_fetching() {
    let upstream = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;
    let harness = Harness::for_upstream(&upstream);

    let (status, body) = harness
        .proxy(ProxyRoute::Direct, "not a url", SelectionMode::Normal)
        .await;

    assert_eq!(status, 500);
    let body: ErrorBody = serde_json::from_str(&body).unwrap();
    assert_eq!(body.error, "Failed to fetch website content");
    assert_eq!(body.details.as_deref(), Some("relative URL without a base"));
}

#[tokio::test]
async fn upstream_404_becomes_500_without_echoing_body() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("upstream secret page"))
        .expect(1)
        .mount(&upstream)
        .await;
    let harness = Harness::for_upstream(&upstream);

    let (status, body) = harness
        .proxy(
            ProxyRoute::Direct,
            &format!("{}/gone", upstream.uri()),
            SelectionMode::Normal,
        )
        .await;

    assert_eq!(status, 500);
    assert!(!body.contains("upstream secret page"));
    let body: ErrorBody = serde_json::from_str(&body).unwrap();
    assert_eq!(body.error, "Failed to fetch website content");
    assert_eq!(body.details.as_deref(), Some("HTTP error! status: 404"));
}

#[tokio::test]
async fn unreachable_upstream_becomes_500() {
    let upstream = MockServer::start().await;
    let harness = Harness::for_upstream(&upstream);

    let (status, body) = harness
        .proxy(ProxyRoute::Direct, "http://127.0.0.1:1/", SelectionMode::Normal)
        .await;

    assert_eq!(status, 500);
    let body: ErrorBody = serde_json::from_str(&body).unwrap();
    assert!(body.details.is_some());
}

#[tokio::test]
async fn relay_route_fetches_through_relay() {
    let relay = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/raw"))
        .and(query_param("url", "https://example.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<body>relayed</body>"))
        .expect(1)
        .mount(&relay)
        .await;
    let harness = Harness::for_upstream(&relay);

    let (status, body) = harness
        .proxy(ProxyRoute::Relay, "https://example.com/", SelectionMode::Select)
        .await;

    assert_eq!(status, 200);
    assert!(body.starts_with("<body>relayed<script "));
    assert!(body.ends_with("</body>"));
}

#[tokio::test]
async fn relay_failure_uses_relay_error_message() {
    let relay = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/raw"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&relay)
        .await;
    let harness = Harness::for_upstream(&relay);

    let (status, body) = harness
        .proxy(ProxyRoute::Relay, "https://example.com/", SelectionMode::Normal)
        .await;

    assert_eq!(status, 500);
    let body: ErrorBody = serde_json::from_str(&body).unwrap();
    assert_eq!(body.error, "Failed to fetch website content via CORS proxy");
    assert_eq!(body.details.as_deref(), Some("HTTP error! status: 502"));
}

#[tokio::test]
async fn health_reports_ok_with_timestamp() {
    let upstream = MockServer::start().await;
    let harness = Harness::for_upstream(&upstream);

    let (status, _, _, body) = harness.get("/health").await;
    assert_eq!(status, 200);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "OK");
    let timestamp = body["timestamp"].as_str().expect("timestamp string");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let upstream = MockServer::start().await;
    let harness = Harness::for_upstream(&upstream);

    let (status, _, _, body) = harness.get("/webpages").await;
    assert_eq!(status, 404);
    assert!(body.contains("Not found"));
}

#[tokio::test]
async fn head_and_trailing_slash_are_served_like_get() {
    let upstream = MockServer::start().await;
    let harness = Harness::for_upstream(&upstream);

    let response = harness
        .client
        .head(harness.base.join("/health").unwrap())
        .send()
        .await
        .expect("proxy reachable");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "");

    let (status, _, _, body) = harness.get("/health/").await;
    assert_eq!(status, 200);
    assert!(body.contains("\"OK\""));

    let (status, _, _, body) = harness.get("/proxy/").await;
    assert_eq!(status, 400);
    assert!(body.contains("URL parameter is required"));
}

#[tokio::test]
async fn other_methods_are_405() {
    let upstream = MockServer::start().await;
    let harness = Harness::for_upstream(&upstream);

    let response = harness
        .client
        .post(harness.base.join("/proxy").unwrap())
        .send()
        .await
        .expect("proxy reachable");
    assert_eq!(response.status().as_u16(), 405);
}
