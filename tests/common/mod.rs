//! Shared mock servers for integration testing.
//!
//! Hand-rolled TCP responders keep the tests free of extra test-only
//! HTTP dependencies; every server binds an ephemeral port and returns
//! its address.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn write_response(mut socket: TcpStream, status_line: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Read enough of the request to recover its target (e.g.
/// `/check?name=host&key=k`).
async fn read_target(socket: &mut TcpStream) -> String {
    let mut buf = [0u8; 2048];
    let n = socket.read(&mut buf).await.unwrap_or(0);
    let request = String::from_utf8_lossy(&buf[..n]).into_owned();
    request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string()
}

/// A mirror that answers every request immediately.
pub async fn start_mirror() -> SocketAddr {
    start_slow_mirror(Duration::ZERO).await
}

/// A mirror that answers after `delay`.
pub async fn start_slow_mirror(delay: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _ = read_target(&mut socket).await;
                        tokio::time::sleep(delay).await;
                        write_response(socket, "200 OK", "").await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// A mirror that accepts connections but never answers, forcing the
/// probe deadline to elapse.
pub async fn start_silent_mirror() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        drop(socket);
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// A filtering authority that flags the given hostnames.
pub async fn start_authority(blocked_hosts: Vec<String>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let blocked_hosts = blocked_hosts.clone();
                    tokio::spawn(async move {
                        let target = read_target(&mut socket).await;
                        let queried = url::Url::parse(&format!("http://authority{}", target))
                            .ok()
                            .and_then(|url| {
                                url.query_pairs()
                                    .find(|(k, _)| k == "name")
                                    .map(|(_, v)| v.into_owned())
                            })
                            .unwrap_or_default();
                        let body = if blocked_hosts.contains(&queried) {
                            r#"{"status": "blocked"}"#
                        } else {
                            r#"{"status": "ok"}"#
                        };
                        write_response(socket, "200 OK", body).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// An authority that answers headers promptly, then stalls mid-body:
/// the declared Content-Length is never satisfied.
pub async fn start_stalled_body_authority() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _ = read_target(&mut socket).await;
                        let partial = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\nConnection: close\r\n\r\n{\"sta";
                        let _ = socket.write_all(partial.as_bytes()).await;
                        let _ = socket.flush().await;
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        drop(socket);
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// An authority that only ever reports server errors.
pub async fn start_broken_authority() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let _ = read_target(&mut socket).await;
                        write_response(socket, "500 Internal Server Error", "").await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// A `domains.json` source serving a fixed body.
pub async fn start_config_source(body: String) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let body = body.clone();
                    tokio::spawn(async move {
                        let _ = read_target(&mut socket).await;
                        write_response(socket, "200 OK", &body).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}
