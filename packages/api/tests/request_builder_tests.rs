//! Call builder tests against a local server

use std::sync::Arc;

use http::StatusCode;
use http_body_util::BodyExt;
use mesh_agent::{AgentSelector, ContentType, Kind, Mesh, OptionsBuilder};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serve one request; report the raw request text.
async fn serve_once(response: &'static [u8]) -> (u16, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Bind should succeed");
    let port = listener.local_addr().expect("Listener should have an address").port();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("Accept should succeed");
        let mut seen = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await.expect("Read should succeed");
            if n == 0 {
                break;
            }
            seen.extend_from_slice(&buf[..n]);
            if let Some(end) = seen.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&seen[..end]).to_ascii_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length: "))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if seen.len() >= end + 4 + length {
                    break;
                }
            }
        }
        stream.write_all(response).await.expect("Write should succeed");
        let _ = tx.send(String::from_utf8_lossy(&seen).into_owned());
    });

    (port, rx)
}

#[tokio::test]
async fn test_json_get() {
    let (port, seen) =
        serve_once(b"HTTP/1.1 200 OK\r\ncontent-length: 11\r\nconnection: close\r\n\r\n{\"ok\":true}").await;
    let selector = Arc::new(AgentSelector::new());

    let response = Mesh::with_selector(Arc::clone(&selector))
        .accept(ContentType::ApplicationJson)
        .bearer_auth("npm_token")
        .user_agent("mesh-agent-test")
        .debug()
        .get(&format!("http://127.0.0.1:{port}/pkg"))
        .await
        .expect("GET should succeed");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Body should be readable")
        .to_bytes();
    let value: serde_json::Value = serde_json::from_slice(&body).expect("Body should be JSON");
    assert_eq!(value["ok"], serde_json::Value::Bool(true));

    let seen = seen.await.expect("Server should report the request").to_ascii_lowercase();
    assert!(seen.starts_with("get /pkg http/1.1"), "{seen}");
    assert!(seen.contains("authorization: bearer npm_token"), "{seen}");
    assert!(seen.contains("user-agent: mesh-agent-test"), "{seen}");
    assert!(seen.contains("accept: application/json"), "{seen}");
    assert_eq!(selector.direct_agents().len(), 1);
}

#[tokio::test]
async fn test_json_body_put() {
    let (port, seen) =
        serve_once(b"HTTP/1.1 201 Created\r\ncontent-length: 0\r\nconnection: close\r\n\r\n").await;

    let response = Mesh::with_selector(Arc::new(AgentSelector::new()))
        .json_body(&serde_json::json!({"name": "pkg"}))
        .expect("Body should serialize")
        .put(&format!("http://127.0.0.1:{port}/pkg"))
        .await
        .expect("PUT should succeed");
    assert_eq!(response.status(), StatusCode::CREATED);

    let seen = seen.await.expect("Server should report the request");
    let lower = seen.to_ascii_lowercase();
    assert!(lower.starts_with("put /pkg http/1.1"), "{seen}");
    assert!(lower.contains("content-type: application/json"), "{seen}");
    assert!(seen.ends_with("{\"name\":\"pkg\"}"), "{seen}");
}

#[tokio::test]
async fn test_timeout_from_builder() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Bind should succeed");
    let port = listener.local_addr().expect("Listener should have an address").port();
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.expect("Accept should succeed");
        std::future::pending::<()>().await;
    });

    let err = Mesh::with_selector(Arc::new(AgentSelector::new()))
        .timeout_ms(100)
        .get(&format!("http://127.0.0.1:{port}/"))
        .await
        .expect_err("Silent server should time out");
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_configure_edits_connection_options() {
    let builder = Mesh::json()
        .connection(OptionsBuilder::new().max_sockets(3).build())
        .configure(|options| options.https_proxy("http://proxy.local:8080"));

    let options = builder.connection_options();
    assert_eq!(options.max_sockets(), 3);
    assert_eq!(options.https_proxy.as_deref(), Some("http://proxy.local:8080"));
}

#[tokio::test]
async fn test_invalid_proxy_reported_by_call() {
    let err = Mesh::with_selector(Arc::new(AgentSelector::new()))
        .configure(|options| options.http_proxy("http://proxy:notaport"))
        .get("http://registry.test/")
        .await
        .expect_err("Malformed proxy should fail");
    assert_eq!(err.kind(), Kind::InvalidProxyUrl);
}
