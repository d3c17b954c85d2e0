//! Minimal canned HTTP/1.1 server for adapter tests.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One response the server sends back.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Canned {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: "{}".to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A running server. Request targets (path and query) are recorded in order.
pub struct CannedServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

/// Serve `handler(target)` for every request until the test ends.
pub async fn serve<F>(handler: F) -> CannedServer
where
    F: Fn(&str) -> Canned + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let recorded = Arc::clone(&requests);
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let handler = Arc::clone(&handler);
            let recorded = Arc::clone(&recorded);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let head = String::from_utf8_lossy(&buf[..n]);
                let target = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();
                recorded.lock().push(target.clone());

                let canned = handler(&target);
                if let Some(delay) = canned.delay {
                    tokio::time::sleep(delay).await;
                }
                let response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    canned.status,
                    canned.body.len(),
                    canned.body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    CannedServer {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// A base URL nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
