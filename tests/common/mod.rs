//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use hf_proxy::{HttpServer, ProxyConfig, Shutdown};
use reqwest::redirect::Policy;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Host the proxy's client resolves to loopback. Ends with the allowed suffix.
pub const MOCK_HOST: &str = "mock.huggingface.co";

/// What the mock upstream saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What the mock upstream answers.
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl MockResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

pub type Recorded = Arc<Mutex<Vec<RecordedRequest>>>;

/// Start a programmable upstream on a free loopback port.
///
/// `respond` receives each parsed request. HEAD requests get headers only.
pub async fn start_mock_upstream<F>(respond: F) -> (SocketAddr, Recorded)
where
    F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);
    let log = recorded.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let respond = respond.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request_head(&mut socket).await else {
                            return;
                        };
                        let response = (*respond)(&request);
                        let is_head = request.method == "HEAD";
                        log.lock().unwrap().push(request);

                        let reason = StatusCode::from_u16(response.status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");
                        let mut out = format!("HTTP/1.1 {} {}\r\n", response.status, reason);
                        for (name, value) in &response.headers {
                            out.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        if !response
                            .headers
                            .iter()
                            .any(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                        {
                            out.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
                        }
                        out.push_str("Connection: close\r\n\r\n");
                        if !is_head {
                            out.push_str(&response.body);
                        }

                        let _ = socket.write_all(out.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, recorded)
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let text = String::from_utf8_lossy(&buf);
    let head = text.split("\r\n\r\n").next()?;
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    Some(RecordedRequest {
        method,
        target,
        headers,
    })
}

/// Outbound client for the proxy, pinning [`MOCK_HOST`] (and any other
/// `*.huggingface.co` names given) to loopback.
pub fn upstream_client(extra_hosts: &[&str]) -> reqwest::Client {
    let loopback: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let mut builder = reqwest::Client::builder()
        .no_proxy()
        .redirect(Policy::limited(10))
        .resolve(MOCK_HOST, loopback);
    for host in extra_hosts {
        builder = builder.resolve(host, loopback);
    }
    builder.build().unwrap()
}

/// Start the proxy on a free port. Returns its address and the shutdown
/// coordinator keeping it alive.
pub async fn start_proxy(client: reqwest::Client) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ProxyConfig::default();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_client(config, client);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client used to talk to the proxy itself.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// `http://<proxy>/api/proxy?u=<target>` with the target encoded.
pub fn proxy_url(proxy: SocketAddr, target: &str) -> String {
    url::Url::parse_with_params(&format!("http://{}/api/proxy", proxy), &[("u", target)])
        .unwrap()
        .to_string()
}

/// Target URL on the mock upstream.
pub fn mock_target(upstream: SocketAddr, path: &str) -> String {
    format!("http://{}:{}{}", MOCK_HOST, upstream.port(), path)
}
