//! End-to-end tests over real sockets

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use todolist::server::listener::serve;
use todolist::todo::Store;

async fn start(max_request_size: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(serve(listener, Store::new(), max_request_size));
    addr
}

/// Sends raw bytes, half-closes, and returns everything the server wrote.
async fn send(addr: SocketAddr, raw: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

fn post(path: &str, body: &str) -> Vec<u8> {
    format!(
        "POST {} HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\n\r\n{}",
        path,
        body.len(),
        body
    )
    .into_bytes()
}

fn get(path: &str) -> Vec<u8> {
    format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", path).into_bytes()
}

fn delete(path: &str) -> Vec<u8> {
    format!("DELETE {} HTTP/1.1\r\nHost: localhost\r\n\r\n", path).into_bytes()
}

fn split(response: &str) -> (&str, &str) {
    response.split_once("\r\n\r\n").unwrap()
}

#[tokio::test]
async fn test_server_list_lifecycle() {
    let addr = start(1024 * 1024).await;

    let resp = send(addr, &post("/api/list/new", r#"{"title":"groceries","list":[]}"#)).await;
    assert_eq!(resp, "HTTP/1.1 200 OK\r\n Content-Length: 8\r\n\r\n{\"id\":1}");

    let resp = send(addr, &get("/api/list/1")).await;
    let (head, body) = split(&resp);
    assert!(head.starts_with("HTTP/1.1 200 OK"));
    assert!(head.contains(&format!(" Content-Length: {}", body.len())));
    assert!(body.contains(r#""title": "groceries""#));
    assert!(body.contains(r#""list": []"#));

    let resp = send(
        addr,
        &post(
            "/api/list/1",
            r#"{"id":1,"title":"groceries","list":[{"itemid":1,"detail":"milk","completed":false}]}"#,
        ),
    )
    .await;
    assert_eq!(resp, "HTTP/1.1 200 OK\r\n Content-Length: 0\r\n\r\n");

    let resp = send(addr, &get("/api/list/1")).await;
    let (_, body) = split(&resp);
    assert!(body.contains(r#""detail": "milk""#));
    assert!(body.contains(r#""itemid": 1"#));

    let resp = send(addr, &delete("/api/list/1")).await;
    assert_eq!(resp, "HTTP/1.1 200 OK\r\n Content-Length: 0\r\n\r\n");

    let resp = send(addr, &get("/api/list/1")).await;
    assert_eq!(resp, "HTTP/1.1 200 OK\r\n Content-Length: 2\r\n\r\n{}");

    let resp = send(addr, &delete("/api/list/1")).await;
    assert_eq!(resp, "HTTP/1.1 200 OK\r\n Content-Length: 0\r\n\r\n");

    let resp = send(addr, &post("/api/list/new", r#"{"title":"next"}"#)).await;
    assert!(resp.ends_with(r#"{"id":2}"#));
}

#[tokio::test]
async fn test_server_body_split_across_writes() {
    let addr = start(1024 * 1024).await;
    let body = r#"{"title":"slow"}"#;
    let head = format!(
        "POST /api/list/new HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
        body.len()
    );

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(head.as_bytes()).await.unwrap();
    stream.flush().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    stream.write_all(body.as_bytes()).await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();

    assert!(String::from_utf8(out).unwrap().ends_with(r#"{"id":1}"#));
}

#[tokio::test]
async fn test_server_nul_padded_body() {
    let addr = start(1024 * 1024).await;
    let mut raw = b"POST /api/list/new HTTP/1.1\r\n\r\n{\"title\":\"padded\"}".to_vec();
    raw.resize(raw.len() + 512, 0);

    let resp = send(addr, &raw).await;

    assert!(resp.ends_with(r#"{"id":1}"#));
}

#[tokio::test]
async fn test_server_rejections() {
    let addr = start(1024).await;

    let resp = send(addr, b"GARBAGE\r\n\r\n").await;
    assert_eq!(resp, "HTTP/1.1 400 Bad Request\r\n Content-Length: 0\r\n\r\n");

    let resp = send(addr, &get("/api/list/abc")).await;
    assert_eq!(resp, "HTTP/1.1 400 Bad Request\r\n Content-Length: 0\r\n\r\n");

    let resp = send(addr, &post("/api/list/new", "{broken")).await;
    assert_eq!(resp, "HTTP/1.1 400 Bad Request\r\n Content-Length: 0\r\n\r\n");

    let resp = send(addr, &post("/api/list/3", r#"{"id":4}"#)).await;
    assert_eq!(resp, "HTTP/1.1 400 Bad Request\r\n Content-Length: 0\r\n\r\n");

    let resp = send(addr, &get("/index.html")).await;
    assert_eq!(resp, "HTTP/1.1 404 Not Found\r\n Content-Length: 0\r\n\r\n");
}

#[tokio::test]
async fn test_server_answers_request_line_without_waiting() {
    let addr = start(1024).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET /api/list/1 HTTP/1.1\r\n").await.unwrap();

    let mut out = Vec::new();
    tokio::time::timeout(Duration::from_secs(2), stream.read_to_end(&mut out))
        .await
        .expect("server did not answer")
        .unwrap();

    assert_eq!(out, b"HTTP/1.1 200 OK\r\n Content-Length: 2\r\n\r\n{}");
}

#[tokio::test]
async fn test_server_ignores_header_without_colon() {
    let addr = start(1024).await;

    let resp = send(addr, b"GET /api/list/1 HTTP/1.1\r\nX-Weird\r\n\r\n").await;

    assert_eq!(resp, "HTTP/1.1 200 OK\r\n Content-Length: 2\r\n\r\n{}");
}

#[tokio::test]
async fn test_server_empty_connection_gets_no_response() {
    let addr = start(1024).await;

    assert_eq!(send(addr, b"").await, "");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_server_concurrent_clients() {
    let addr = start(1024 * 1024).await;

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            tokio::spawn(async move {
                let resp = send(addr, &post("/api/list/new", &format!(r#"{{"title":"{}"}}"#, i))).await;
                let (_, body) = resp.split_once("\r\n\r\n").unwrap();
                let v: serde_json::Value = serde_json::from_str(body).unwrap();
                v["id"].as_i64().unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }
    ids.sort();

    assert_eq!(ids, (1..=20).collect::<Vec<i64>>());
}
