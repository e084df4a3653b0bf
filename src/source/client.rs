//! HTTP client for the spreadsheet endpoint.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::SourceConfig;
use crate::source::response::{parse_response, FetchOutcome, LoadError};

/// Fetches the advising dataset from the spreadsheet web app.
pub struct SourceClient {
    http_client: reqwest::Client,
    url: String,
    timeout_seconds: u64,
    retries: usize,
}

impl SourceClient {
    /// Build a client for `url` using the timeout and retry settings from `config`.
    pub fn new(url: &str, config: &SourceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("advising-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            url: url.to_string(),
            timeout_seconds: config.timeout_seconds,
            retries: config.retries,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the dataset, retrying transport failures.
    ///
    /// An explicit error payload from the source is returned immediately.
    pub async fn fetch(&self) -> Result<FetchOutcome, LoadError> {
        let mut attempt = 0;

        loop {
            match self.fetch_once().await {
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    warn!("Fetch attempt {} failed: {}. Retrying...", attempt, e);
                    tokio::time::sleep(retry_delay(attempt)).await;
                }
                result => return result,
            }
        }
    }

    async fn fetch_once(&self) -> Result<FetchOutcome, LoadError> {
        info!("Fetching advising data from {}", self.url);

        let response = self.http_client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                LoadError::Timeout {
                    url: self.url.clone(),
                    seconds: self.timeout_seconds,
                }
            } else if e.is_connect() {
                LoadError::Connect {
                    url: self.url.clone(),
                    source: e,
                }
            } else {
                LoadError::Transport(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LoadError::Status { status, body });
        }

        let body = response.text().await?;
        debug!("Received {} bytes", body.len());

        parse_response(&body)
    }
}

/// Linear backoff between attempts.
fn retry_delay(attempt: usize) -> Duration {
    Duration::from_millis(500 * attempt as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve every connection with the same canned response and count them.
    async fn serve(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}/exec", addr), hits)
    }

    fn client_for(url: &str, retries: usize) -> SourceClient {
        let config = SourceConfig {
            url: None,
            timeout_seconds: 5,
            retries,
        };
        SourceClient::new(url, &config).unwrap()
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let (url, hits) = serve("503 Service Unavailable", "busy").await;

        let err = client_for(&url, 2).fetch().await.unwrap_err();

        assert!(matches!(err, LoadError::Status { status, .. } if status.as_u16() == 503));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_source_error_is_not_retried() {
        let (url, hits) = serve("200 OK", r#"{"error": "Sheet not found"}"#).await;

        let err = client_for(&url, 2).fetch().await.unwrap_err();

        assert!(err.is_source());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let (url, hits) = serve("404 Not Found", "missing").await;

        let err = client_for(&url, 2).fetch().await.unwrap_err();

        assert!(matches!(err, LoadError::Status { status, ref body } if status.as_u16() == 404 && body == "missing"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let (url, hits) = serve("200 OK", r#"{"data": [{"NIM": 2101001, "Beasiswa": "KIPK"}]}"#).await;

        match client_for(&url, 2).fetch().await.unwrap() {
            FetchOutcome::Records(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].nim.as_deref(), Some("2101001"));
            }
            other => panic!("expected records, got {:?}", other),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_client_keeps_settings() {
        let config = SourceConfig {
            url: None,
            timeout_seconds: 5,
            retries: 1,
        };
        let client = SourceClient::new("https://script.example.com/exec", &config).unwrap();

        assert_eq!(client.url(), "https://script.example.com/exec");
        assert_eq!(client.timeout_seconds, 5);
        assert_eq!(client.retries, 1);
    }

    #[test]
    fn test_retry_delay_grows() {
        assert!(retry_delay(2) > retry_delay(1));
        assert_eq!(retry_delay(1), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let config = SourceConfig {
            url: None,
            timeout_seconds: 2,
            retries: 0,
        };
        // Port 9 on loopback refuses connections.
        let client = SourceClient::new("http://127.0.0.1:9/exec", &config).unwrap();

        let err = client.fetch().await.unwrap_err();
        assert!(!err.is_source());
        assert!(err.is_retryable());
    }
}
