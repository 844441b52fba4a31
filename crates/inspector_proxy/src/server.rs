use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use chrono::Utc;
use inspector_core::{ProxyRoute, HEALTH_PATH};
use inspector_logging::{inspector_debug, inspector_error, inspector_info};
use serde_json::json;
use tiny_http::{Header, Method, Request, Response, Server};
use url::Url;

use crate::{health_body, FetchSettings, ProxyResponse, ProxyService, DEFAULT_RELAY_BASE};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub fetch: FetchSettings,
    pub relay_base: Url,
    pub worker_threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3001".to_string(),
            fetch: FetchSettings::default(),
            relay_base: Url::parse(DEFAULT_RELAY_BASE).expect("default relay base is a valid url"),
            worker_threads: 4,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },
    #[error("failed to start worker runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// HTTP front of the proxy. The accept loop runs on one thread; each request
/// becomes its own task on a multi-threaded runtime.
pub struct ProxyServer {
    server: Arc<Server>,
    runtime: tokio::runtime::Runtime,
    service: Arc<ProxyService>,
}

impl ProxyServer {
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let service = ProxyService::from_settings(config.fetch, config.relay_base);
        Self::bind_with_service(&config.bind, config.worker_threads, service)
    }

    pub fn bind_with_service(
        bind: &str,
        worker_threads: usize,
        service: ProxyService,
    ) -> Result<Self, ServerError> {
        let server = Server::http(bind).map_err(|err| ServerError::Bind {
            addr: bind.to_string(),
            message: err.to_string(),
        })?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("inspector-proxy")
            .enable_all()
            .build()?;

        Ok(Self {
            server: Arc::new(server),
            runtime,
            service: Arc::new(service),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serves until the listener is unblocked.
    pub fn run(self) {
        if let Some(addr) = self.local_addr() {
            inspector_info!("Proxy listening on http://{}", addr);
        }
        for request in self.server.incoming_requests() {
            let service = self.service.clone();
            let method = request.method().clone();
            let url = request.url().to_string();
            self.runtime.spawn(async move {
                let response = route_request(&service, &method, &url).await;
                // tiny_http writes synchronously.
                let _ = tokio::task::spawn_blocking(move || respond(request, response)).await;
            });
        }
        inspector_info!("Proxy listener stopped");
    }

    /// Runs the server on a background thread.
    pub fn spawn(self) -> ServerHandle {
        let addr = self.local_addr();
        let server = self.server.clone();
        let thread = thread::spawn(move || self.run());
        ServerHandle {
            addr,
            server,
            thread: Some(thread),
        }
    }
}

pub struct ServerHandle {
    addr: Option<SocketAddr>,
    server: Arc<Server>,
    thread: Option<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.server.unblock();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn route_request(service: &ProxyService, method: &Method, url: &str) -> ProxyResponse {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };
    let path = match path.trim_end_matches('/') {
        "" => path,
        trimmed => trimmed,
    };

    let known = path == HEALTH_PATH || ProxyRoute::from_path(path).is_some();
    if !known {
        inspector_debug!("{} {} -> 404", method, path);
        return ProxyResponse::json(404, &json!({ "error": "Not found" }));
    }
    match method {
        // tiny_http drops the body when answering HEAD.
        Method::Get | Method::Head => {}
        Method::Options => {
            return ProxyResponse {
                status: 204,
                content_type: crate::JSON_CONTENT_TYPE,
                body: String::new(),
            };
        }
        _ => return ProxyResponse::json(405, &json!({ "error": "Method not allowed" })),
    }

    match ProxyRoute::from_path(path) {
        Some(route) => service.handle(route, query).await,
        None => ProxyResponse::json(200, &health_body(Utc::now())),
    }
}

fn respond(request: Request, response: ProxyResponse) {
    let mut reply = Response::from_string(response.body).with_status_code(response.status);
    let headers = [
        ("Content-Type", response.content_type),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS"),
    ];
    for (name, value) in headers {
        if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            reply.add_header(header);
        }
    }
    if let Err(err) = request.respond(reply) {
        inspector_error!("Failed to write response: {}", err);
    }
}
