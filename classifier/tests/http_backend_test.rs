//! Integration tests for the HTTP inference backend
//!
//! Each test serves one canned HTTP response from a loopback listener and
//! checks how the backend classifies it.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use sentiment_classifier::remote::normalize_predictions;
use sentiment_classifier::{
    ClassifyError, HttpInferenceBackend, InferenceBackend, RemoteClassifierClient, RetryPolicy,
    SentimentLabel,
};

const MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment";

/// Accept one connection, answer it with `status` and `body`, and hand back
/// the raw request text.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (base_url, handle)
}

/// Read headers plus a content-length body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn backend(base_url: &str) -> HttpInferenceBackend {
    HttpInferenceBackend::new(base_url, MODEL, "hf_test_token", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_success_returns_json_body() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[[{"label":"LABEL_2","score":0.97},{"label":"LABEL_1","score":0.02},{"label":"LABEL_0","score":0.01}]]"#,
    )
    .await;

    let body = backend(&url).infer("what a great day").await.unwrap();
    let request = server.await.unwrap();

    let predictions = normalize_predictions(body).unwrap();
    assert_eq!(predictions.len(), 3);
    assert!(request.starts_with(&format!("POST /models/{MODEL} ")));
    assert!(request
        .to_ascii_lowercase()
        .contains("authorization: bearer hf_test_token"));
    assert!(request.contains(r#"{"inputs":"what a great day"}"#));
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let (url, server) = serve_once("503 Service Unavailable", r#"{"error":"overloaded"}"#).await;

    let err = backend(&url).infer("hello").await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, ClassifyError::Transient(_)), "got {err:?}");
    assert!(err.is_retriable());
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_non_json_success_is_malformed() {
    let (url, server) = serve_once("200 OK", "<html>gateway</html>").await;

    let err = backend(&url).infer("hello").await.unwrap_err();
    server.await.unwrap();

    assert!(matches!(err, ClassifyError::MalformedResponse(_)), "got {err:?}");
    assert!(!err.is_retriable());
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = backend(&url).infer("hello").await.unwrap_err();
    assert!(err.is_retriable(), "got {err:?}");
}

#[tokio::test]
async fn test_client_over_http_maps_label() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"label":"LABEL_0","score":0.81},{"label":"LABEL_1","score":0.15},{"label":"LABEL_2","score":0.04}]"#,
    )
    .await;

    let client = RemoteClassifierClient::new(Arc::new(backend(&url)), RetryPolicy::once());
    let score = client.classify("I feel awful").await;
    server.await.unwrap();

    assert_eq!(score.label, SentimentLabel::Negative);
    assert!((score.confidence - 0.81).abs() < 1e-9);
}
