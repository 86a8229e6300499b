//! Testing utilities for the Shopfront workspace
//!
//! `TestBackend` is a minimal in-process HTTP/1.1 server. It answers from a
//! table of canned routes and records every request it receives, so tests
//! can assert on the exact method, target, headers and body a client sent.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as received on the wire
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Raw request target, percent-encoding and query included
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    /// Target without the query string
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    /// `"METHOD target"`, for compact assertions
    pub fn line(&self) -> String {
        format!("{} {}", self.method, self.target)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON, `Null` when empty or not JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: String,
    path: String,
    status: u16,
    body: String,
}

/// Canned-response backend bound to an ephemeral localhost port
pub struct TestBackend {
    base: String,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestBackend {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test backend");
        let addr = listener.local_addr().expect("test backend address");

        let routes: Arc<Mutex<Vec<Route>>> = Arc::new(Mutex::new(Vec::new()));
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let (accept_routes, accept_requests) = (Arc::clone(&routes), Arc::clone(&requests));
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(handle(
                    socket,
                    Arc::clone(&accept_routes),
                    Arc::clone(&accept_requests),
                ));
            }
        });

        Self {
            base: format!("http://{}", addr),
            routes,
            requests,
        }
    }

    /// Answer `method path` with `status` and a JSON `body`. Later
    /// registrations for the same route win. Unrouted requests get 404.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.routes.lock().push(Route {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body: body.to_string(),
        });
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// `"METHOD target"` of every request so far, in arrival order
    pub fn request_lines(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.line()).collect()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }
}

async fn handle(
    mut socket: TcpStream,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
) {
    let Some(request) = read_request(&mut socket).await else {
        return;
    };

    let (status, body) = routes
        .lock()
        .iter()
        .rev()
        .find(|r| r.method == request.method && r.path == request.path())
        .map(|r| (r.status, r.body.clone()))
        .unwrap_or_else(|| (404, r#"{"detail":"Not Found"}"#.to_string()));

    requests.lock().push(request);

    let body = if status == 204 { String::new() } else { body };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 2048];

    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = find(&buf, b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.split("\r\n");

        let mut request_line = lines.next()?.split_whitespace();
        let method = request_line.next()?.to_string();
        let target = request_line.next()?.to_string();

        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
            .collect();
        let content_length = headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = header_end + 4;
        if buf.len() < body_start + content_length {
            continue;
        }

        return Some(RecordedRequest {
            method,
            target,
            headers,
            body: String::from_utf8_lossy(&buf[body_start..body_start + content_length])
                .to_string(),
        });
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
