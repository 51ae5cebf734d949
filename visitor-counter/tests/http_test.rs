use {
    tokio::{net::{TcpListener, TcpStream}, io::{AsyncReadExt, AsyncWriteExt}},
    visitor_counter::{CounterHandler, http::serve_listener},
    crate::common::{sqlite_handler, failing_handler},
};

mod common;

async fn start(handler: CounterHandler) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_listener(listener, handler));
    addr
}

async fn get(addr: std::net::SocketAddr) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn serve_counts_requests() {
    let (_store, handler) = sqlite_handler();
    let addr = start(handler).await;

    let first = get(addr).await;
    assert!(first.starts_with("HTTP/1.1 200 OK"), "unexpected response: {first}");
    assert!(first.to_lowercase().contains("content-type: application/json"));
    assert!(first.ends_with(r#"{"count":1}"#));

    let second = get(addr).await;
    assert!(second.ends_with(r#"{"count":2}"#));
}

#[tokio::test]
async fn serve_store_failure() {
    let addr = start(failing_handler()).await;

    let response = get(addr).await;
    assert!(response.starts_with("HTTP/1.1 502 Bad Gateway"), "unexpected response: {response}");
}
