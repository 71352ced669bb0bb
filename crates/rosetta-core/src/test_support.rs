//! Minimal HTTP/1.1 server for exercising the real clients in tests

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

/// Canned response for one request path
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: &'static str,
}

pub struct TestServer {
    pub base: Url,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// Serve `routes`; unknown paths answer 404
    pub async fn start(routes: Vec<Route>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&head).to_lowercase();
                let path = head
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();
                seen.lock().unwrap().push(head);

                let (status, body) = routes
                    .iter()
                    .find(|r| r.path.to_lowercase() == path)
                    .map(|r| (r.status, r.body))
                    .unwrap_or((404, "{\"message\":\"Not Found\"}"));
                let response = format!(
                    "HTTP/1.1 {} Test\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self { base, requests }
    }

    pub fn url(&self, path: &str) -> Url {
        self.base.join(path.trim_start_matches('/')).unwrap()
    }

    /// Lowercased request heads, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Client that never routes loopback traffic through an environment proxy
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("sls-rosetta-test")
        .no_proxy()
        .build()
        .unwrap()
}
