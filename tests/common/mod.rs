//! Shared utilities for integration tests.

use std::net::SocketAddr;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Start a mock JSON-RPC node answering `eth_chainId` and `eth_blockNumber`.
///
/// Returns the node's HTTP URL. Each connection serves one request.
pub async fn start_mock_node(chain_id: u64, block_number: u64) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(serve_one(socket, chain_id, block_number));
                }
                Err(_) => break,
            }
        }
    });

    format!("http://{}", addr)
}

async fn serve_one(mut socket: TcpStream, chain_id: u64, block_number: u64) {
    let Some(request) = read_request_body(&mut socket).await else {
        return;
    };

    let result = match request["method"].as_str() {
        Some("eth_chainId") => json!(format!("{:#x}", chain_id)),
        Some("eth_blockNumber") => json!(format!("{:#x}", block_number)),
        _ => Value::Null,
    };
    let body = json!({
        "jsonrpc": "2.0",
        "id": request["id"].clone(),
        "result": result,
    })
    .to_string();

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request_body(socket: &mut TcpStream) -> Option<Value> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|len| len.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let body_start = header_end + 4;
        if buf.len() >= body_start + content_length {
            return serde_json::from_slice(&buf[body_start..body_start + content_length]).ok();
        }
    }
}

/// Start a node that accepts connections but never answers.
#[allow(dead_code)]
pub async fn start_silent_node() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{}", addr)
}
