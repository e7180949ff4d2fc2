//! Tiny HTTP/1.1 server answering every request with one canned response.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::source::HttpTriviaSource;

pub struct CannedServer {
    pub url: String,
    request_lines: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    /// Request lines received so far, e.g. `GET /api.php?amount=5&... HTTP/1.1`.
    pub fn request_lines(&self) -> Vec<String> {
        self.request_lines.lock().unwrap().clone()
    }

    pub fn source(&self, timeout: Duration) -> HttpTriviaSource {
        let client = Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .unwrap();
        HttpTriviaSource::with_client(client, &self.url)
    }
}

/// Serve `status` (e.g. `"429 Too Many Requests"`) with `body` to every connection.
pub async fn serve(status: &'static str, body: &'static str) -> CannedServer {
    start(Some((status, body))).await
}

/// Accept connections but never answer them.
pub async fn serve_silent() -> CannedServer {
    start(None).await
}

async fn start(response: Option<(&'static str, &'static str)>) -> CannedServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api.php", listener.local_addr().unwrap());
    let request_lines = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&request_lines);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(handle(stream, response, Arc::clone(&seen)));
        }
    });

    CannedServer { url, request_lines }
}

async fn handle(
    mut stream: TcpStream,
    response: Option<(&'static str, &'static str)>,
    seen: Arc<Mutex<Vec<String>>>,
) {
    let request_line = read_request_line(&mut stream).await;
    seen.lock().unwrap().push(request_line);

    let Some((status, body)) = response else {
        tokio::time::sleep(Duration::from_secs(30)).await;
        return;
    };

    let reply = format!(
        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(reply.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn read_request_line(stream: &mut TcpStream) -> String {
    let mut received = Vec::new();
    let mut chunk = [0u8; 1024];
    while !received.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(read) => received.extend_from_slice(&chunk[..read]),
        }
    }
    String::from_utf8_lossy(&received)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}
