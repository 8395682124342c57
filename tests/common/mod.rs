// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use rfcprobe::catalog::{Batch, TestCase};
use rfcprobe::config::ProbeConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

pub const BAD_REQUEST: &str =
    "HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// Reads until the end of the header section, EOF, or one idle second.
pub async fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut request = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match tokio::time::timeout(Duration::from_secs(1), stream.read(&mut chunk)).await {
            Ok(Ok(0)) | Ok(Err(_)) | Err(_) => break,
            Ok(Ok(n)) => {
                request.extend_from_slice(&chunk[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    request
}

/// Answers `connections` requests with `response`, closing each connection,
/// then stops listening.
pub async fn spawn_responder(response: &'static [u8], connections: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        for _ in 0..connections {
            let (mut stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            read_request(&mut stream).await;
            let _ = stream.write_all(response).await;
            let _ = stream.shutdown().await;
        }
    });
    addr
}

/// Writes `partial` (possibly empty) and then holds the connection open
/// without closing it.
pub async fn spawn_staller(partial: &'static [u8], hold: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            read_request(&mut stream).await;
            if !partial.is_empty() {
                let _ = stream.write_all(partial).await;
            }
            tokio::time::sleep(hold).await;
        }
    });
    addr
}

/// Writes `partial` (possibly empty), waits `pause`, then aborts the
/// connection with an RST instead of a FIN.
pub async fn spawn_resetter(partial: &'static [u8], pause: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            read_request(&mut stream).await;
            if !partial.is_empty() {
                let _ = stream.write_all(partial).await;
            }
            tokio::time::sleep(pause).await;
            reset(stream);
        }
    });
    addr
}

/// Accepts one connection and resets it without reading anything.
pub async fn spawn_immediate_resetter() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            reset(stream);
        }
    });
    addr
}

#[allow(deprecated)]
fn reset(stream: TcpStream) {
    let _ = stream.set_linger(Some(Duration::ZERO));
    drop(stream);
}

/// Hands back everything the client sent, then answers with `response`.
pub async fn spawn_capture(
    response: &'static [u8],
) -> (SocketAddr, oneshot::Receiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let request = read_request(&mut stream).await;
            let _ = stream.write_all(response).await;
            let _ = stream.shutdown().await;
            let _ = tx.send(request);
        }
    });
    (addr, rx)
}

/// A local port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

pub fn local_config(port: u16, timeout_ms: u64) -> ProbeConfig {
    let mut config = ProbeConfig::new("127.0.0.1");
    config.set_port(port);
    config.set_timeout_ms(timeout_ms);
    config.set_quiet(true);
    config
}

pub fn simple_get(name: &str, expected: &str) -> TestCase {
    TestCase::new(
        name,
        expected,
        "GET / HTTP/1.1\r\nHost: 127.0.0.1\r\nConnection: close\r\n\r\n",
    )
}

pub fn two_batches() -> Vec<Batch> {
    vec![
        Batch::new(
            "first",
            vec![
                simple_get("alpha", "400"),
                simple_get("beta", "not blocked per vendor policy"),
            ],
        ),
        Batch::new("second", vec![simple_get("gamma", "200 (baseline)")]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closed_port_refuses() {
        let port = closed_port().await;
        assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
    }
}
