//! Downloader behavior against live HTTP exchanges.
//!
//! A minimal hand-rolled responder on a local TCP socket serves canned
//! HTTP/1.1 responses, so the content-type gate and the partial-file rules
//! are exercised end to end without external infrastructure.

use std::net::SocketAddr;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use cnd_core::{DownloadConfig, DownloadError, Downloader, HttpDownloader};

/// Serve `count` canned responses, one per connection, then stop.
async fn serve_responses(
    listener: TcpListener,
    content_type: &'static str,
    body: &'static [u8],
    count: usize,
) {
    for _ in 0..count {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        // Drain the request head; the GET fits one read.
        let mut buf = [0u8; 2048];
        let _ = socket.read(&mut buf).await;

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            content_type,
            body.len()
        );
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.write_all(body).await;
        let _ = socket.flush().await;
    }
}

async fn start_server(
    content_type: &'static str,
    body: &'static [u8],
    count: usize,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(serve_responses(listener, content_type, body, count));
    addr
}

fn test_config(max_attempts: u32) -> DownloadConfig {
    DownloadConfig {
        max_attempts,
        retry_pause_ms: 0, // No pauses in tests
        timeout_secs: 5,
        expected_content_type: "application/pdf".to_string(),
    }
}

#[tokio::test]
async fn test_pdf_stream_lands_on_disk() {
    let addr = start_server("application/pdf", b"%PDF-1.4 test receipt", 1).await;
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("receipt.pdf");

    let downloader = HttpDownloader::new(test_config(3));
    downloader
        .fetch(&format!("http://{}/receipt.pdf", addr), &dest)
        .await
        .expect("download should succeed");

    let bytes = std::fs::read(&dest).unwrap();
    assert_eq!(bytes, b"%PDF-1.4 test receipt");
}

#[tokio::test]
async fn test_content_type_mismatch_is_retried_and_leaves_no_partial_file() {
    // Three attempts, three HTML answers: the budget is spent without a
    // single byte reaching the destination.
    let addr = start_server("text/html", b"<html>not a pdf</html>", 3).await;
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("receipt.pdf");

    let downloader = HttpDownloader::new(test_config(3));
    let err = downloader
        .fetch(&format!("http://{}/receipt.pdf", addr), &dest)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DownloadError::Exhausted { attempts: 3, .. }
    ));
    assert!(!dest.exists(), "no orphaned partial file may remain");
}

#[tokio::test]
async fn test_connection_refused_exhausts_the_budget() {
    // Bind to grab a free port, then drop the listener so connections are
    // refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("receipt.pdf");

    let downloader = HttpDownloader::new(test_config(2));
    let err = downloader
        .fetch(&format!("http://{}/receipt.pdf", addr), &dest)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DownloadError::Exhausted { attempts: 2, .. }
    ));
    assert!(!dest.exists());
}
