//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderMap;
use docchat_gateway::chat::{CannedResponder, ResponseProvider};
use docchat_gateway::config::GatewayConfig;
use docchat_gateway::session::{Session, SessionError, SessionResolver, SignedCookieResolver};
use docchat_gateway::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const SECRET: &str = "integration-secret";

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, Vec<String>>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn header_count(&self, name: &str) -> usize {
        self.headers.get(&name.to_ascii_lowercase()).map_or(0, Vec::len)
    }
}

/// What the mock upstream answers.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl MockReply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: Some("application/json"),
            body: body.as_bytes().to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn bytes(status: u16, content_type: &'static str, body: &[u8]) -> Self {
        Self {
            status,
            content_type: Some(content_type),
            body: body.to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A programmable upstream that records every request it receives.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub async fn start<F>(reply: F) -> Self
    where
        F: Fn(&RecordedRequest) -> MockReply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let reply = Arc::new(reply);

        let recorded = requests.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let reply = reply.clone();
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    handle_connection(socket, reply.as_ref(), recorded).await;
                });
            }
        });

        Self { addr, requests }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle_connection<F>(mut socket: TcpStream, reply: &F, recorded: Arc<Mutex<Vec<RecordedRequest>>>)
where
    F: Fn(&RecordedRequest) -> MockReply,
{
    let Some(request) = read_request(&mut socket).await else {
        return;
    };
    let response = reply(&request);
    recorded.lock().unwrap().push(request);

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    let mut head = format!("HTTP/1.1 {} Mock\r\n", response.status);
    if let Some(ct) = response.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    head.push_str(&format!("Content-Length: {}\r\nConnection: close\r\n\r\n", response.body.len()));

    let _ = socket.write_all(head.as_bytes()).await;
    let _ = socket.write_all(&response.body).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let mut headers: HashMap<String, Vec<String>> = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers
                .entry(name.trim().to_ascii_lowercase())
                .or_default()
                .push(value.trim().to_string());
        }
    }

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.first())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        target,
        headers,
        body,
    })
}

/// A resolver whose store is always down.
pub struct BrokenResolver;

#[async_trait]
impl SessionResolver for BrokenResolver {
    async fn resolve(&self, _headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        Err(SessionError::Unavailable("session store offline".into()))
    }
}

pub fn test_config(upstream: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.upstream.api_url = upstream.to_string();
    config.upstream.timeout_secs = 2;
    config.session.secret = SECRET.to_string();
    config.chat.min_delay_ms = 0;
    config.chat.max_delay_ms = 0;
    config
}

/// `session-token=<signed>` for a session carrying `access_token`.
pub fn session_cookie(access_token: Option<&str>) -> String {
    let resolver = SignedCookieResolver::new(SECRET, "session-token");
    let value = resolver
        .sign(&Session {
            user_id: "user-1".into(),
            email: Some("pat@example.com".into()),
            access_token: access_token.map(String::from),
            expires_at: None,
        })
        .unwrap();
    format!("session-token={}", value)
}

/// A running gateway bound to an ephemeral port.
pub struct Gateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl Gateway {
    pub async fn start(config: GatewayConfig) -> Self {
        let resolver: Arc<dyn SessionResolver> = Arc::new(SignedCookieResolver::new(
            &config.session.secret,
            config.session.cookie_name.clone(),
        ));
        Self::start_with_resolver(config, resolver).await
    }

    pub async fn start_with_resolver(config: GatewayConfig, resolver: Arc<dyn SessionResolver>) -> Self {
        let provider: Arc<dyn ResponseProvider> = Arc::new(CannedResponder::new(Duration::ZERO, Duration::ZERO));
        let server = HttpServer::with_collaborators(config, resolver, provider).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, rx).await;
        });

        Self { addr, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Client that never follows redirects or reuses connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
