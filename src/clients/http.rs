//! Request plumbing shared by the network providers.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, error, warn};

use crate::error::ProviderError;

/// Build the HTTP client, applying a whole-request timeout when one is set.
pub(crate) fn http_client(timeout: Option<Duration>) -> Client {
    let Some(timeout) = timeout else {
        return Client::new();
    };
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
        Client::new()
    })
}

/// Map a non-success status to the provider error it stands for.
pub(crate) fn error_for_status(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimit,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Authentication,
        _ => ProviderError::Api(body),
    }
}

/// Send the request and return the body of a successful reply.
pub(crate) async fn send(request: RequestBuilder, provider: &'static str) -> Result<String, ProviderError> {
    let response = request.send().await.map_err(|e| {
        error!(provider, error = %e, "HTTP request failed");
        ProviderError::Http(e.to_string())
    })?;

    let status = response.status();
    debug!(provider, status = %status, "Received response");
    let body = response.text().await.map_err(|e| {
        error!(provider, error = %e, "Failed to read response body");
        ProviderError::Http(e.to_string())
    })?;

    if status.is_success() {
        return Ok(body);
    }

    let err = error_for_status(status, body);
    match &err {
        ProviderError::RateLimit => warn!(provider, "Rate limit exceeded"),
        _ => error!(provider, status = %status, error = %err, "API request rejected"),
    }
    Err(err)
}

/// Decode a successful reply body.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::Api(format!("Unexpected response body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP reply on a local port.
    async fn serve_once(reply: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(reply.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}/", addr)
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(error_for_status(StatusCode::TOO_MANY_REQUESTS, String::new()), ProviderError::RateLimit));
        assert!(matches!(error_for_status(StatusCode::UNAUTHORIZED, String::new()), ProviderError::Authentication));
        assert!(matches!(error_for_status(StatusCode::FORBIDDEN, String::new()), ProviderError::Authentication));
        match error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "overloaded".to_string()) {
            ProviderError::Api(body) => assert_eq!(body, "overloaded"),
            other => panic!("expected Api, got {:?}", other),
        }
    }

    #[test]
    fn undecodable_body_is_an_api_error() {
        let err = decode::<serde_json::Value>("<html>").unwrap_err();
        assert!(matches!(err, ProviderError::Api(msg) if msg.starts_with("Unexpected response body")));
    }

    #[tokio::test]
    async fn timeout_applies_to_requests() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = http_client(Some(Duration::from_millis(100)));
        let err = client.get(format!("http://{}/", addr)).send().await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn send_returns_body_on_success() {
        let url = serve_once("HTTP/1.1 200 OK\r\ncontent-length: 7\r\nconnection: close\r\n\r\n{\"a\":1}").await;
        let body = send(http_client(None).get(url), "test").await.unwrap();
        assert_eq!(body, "{\"a\":1}");
    }

    #[tokio::test]
    async fn send_maps_rate_limit() {
        let url = serve_once("HTTP/1.1 429 Too Many Requests\r\ncontent-length: 0\r\nconnection: close\r\n\r\n").await;
        let err = send(http_client(None).get(url), "test").await.unwrap_err();
        assert!(matches!(err, ProviderError::RateLimit));
    }
}
