//! Fake HTTP push service.
//!
//! Accepts one request per connection, records the request line, headers and
//! body, then answers with a fixed status.

use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A request received by the fake service.
#[derive(Debug)]
pub struct ReceivedPush {
    pub request_line: String,
    /// Header names are lowercased.
    pub headers: HashMap<String, String>,
    pub body: serde_json::Value,
}

pub struct FakePushService {
    addr: SocketAddr,
    rx: mpsc::UnboundedReceiver<ReceivedPush>,
    task: JoinHandle<()>,
}

#[allow(dead_code)]
impl FakePushService {
    /// Start a service answering every request with `status`.
    pub async fn start(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake push service");
        let addr = listener.local_addr().expect("local addr");
        let (tx, rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut reader = BufReader::new(stream);

                    let mut request_line = String::new();
                    if reader.read_line(&mut request_line).await.is_err() {
                        return;
                    }

                    let mut headers = HashMap::new();
                    loop {
                        let mut line = String::new();
                        if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                            return;
                        }
                        let line = line.trim_end();
                        if line.is_empty() {
                            break;
                        }
                        if let Some((name, value)) = line.split_once(':') {
                            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
                        }
                    }

                    let length: usize = headers
                        .get("content-length")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0);
                    let mut body = vec![0; length];
                    if reader.read_exact(&mut body).await.is_err() {
                        return;
                    }

                    let reply = format!(
                        "HTTP/1.1 {status} Fake\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                    );
                    let _ = reader.get_mut().write_all(reply.as_bytes()).await;
                    let _ = reader.get_mut().shutdown().await;

                    let _ = tx.send(ReceivedPush {
                        request_line: request_line.trim_end().to_string(),
                        headers,
                        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
                    });
                });
            }
        });

        Self { addr, rx, task }
    }

    /// URL of the push path on this service.
    pub fn url(&self) -> String {
        format!("http://{}/push", self.addr)
    }

    pub async fn next(&mut self) -> ReceivedPush {
        tokio::time::timeout(std::time::Duration::from_secs(5), self.rx.recv())
            .await
            .expect("timed out waiting for push request")
            .expect("push service stopped")
    }
}

impl Drop for FakePushService {
    fn drop(&mut self) {
        self.task.abort();
    }
}
