//! HTTP client for the QR service API.
//!
//! One client serves both the self QR endpoint and the tag list endpoint so
//! the binary wires a single instance into the controller and the tag cache.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use qrpass_core::errors::{Error, Result};
use qrpass_core::qr::{QrApiTrait, RawQrPayload};
use qrpass_core::tags::{TagApiTrait, TagEntry, TagMap};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL for the QR service.
pub const DEFAULT_API_URL: &str = "https://api.qrpass.app";

// ─────────────────────────────────────────────────────────────────────────────
// API Response Types (internal, for parsing API responses)
// ─────────────────────────────────────────────────────────────────────────────

/// The tag endpoint has served both a bare array and a wrapped object.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum ApiTagsResponse {
    Bare(Vec<TagEntry>),
    Wrapped { tags: Vec<TagEntry> },
}

impl From<ApiTagsResponse> for TagMap {
    fn from(response: ApiTagsResponse) -> Self {
        match response {
            ApiTagsResponse::Bare(tags) | ApiTagsResponse::Wrapped { tags } => TagMap::new(tags),
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// QR API Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the QR service API.
///
/// # Example
///
/// ```ignore
/// let client = QrApiClient::new("https://api.qrpass.app", "device-token")?;
/// let payload = client.fetch_self_qr().await?;
/// ```
#[derive(Debug, Clone)]
pub struct QrApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderValue,
}

impl QrApiClient {
    /// Create a new QR API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the API (e.g., "https://api.qrpass.app")
    /// * `access_token` - The device's bearer token
    ///
    /// # Errors
    ///
    /// Returns an error if the access token cannot be used as a header value or
    /// the HTTP client cannot be initialized.
    pub fn new(base_url: &str, access_token: &str) -> Result<Self> {
        let auth_header = HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|e| Error::InvalidConfigValue(format!("Invalid access token format: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    /// Create default headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers
    }

    /// Make a GET request and parse the response.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[QrApi] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request failed: {}", e)))?;

        parse_response(response).await
    }

    /// Make a POST request with an empty JSON body and parse the response.
    async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[QrApi] POST {}", url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .body("{}")
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request failed: {}", e)))?;

        parse_response(response).await
    }
}

/// Read an HTTP response body and hand it to [`parse_body`].
async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Network(format!("Failed to read response: {}", e)))?;
    parse_body(status, &body)
}

/// Map a status and body to the payload or to the matching core error.
///
/// 401 and 403 mean the device itself was rejected and become
/// `Error::NotVerified`; every other failure status becomes `Error::Api`.
fn parse_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if !status.is_success() {
        // Try to parse error response for a better message
        let message = serde_json::from_str::<ApiErrorResponse>(body)
            .ok()
            .and_then(|err| err.message.or(err.error))
            .unwrap_or_else(|| body.chars().take(200).collect::<String>());

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::NotVerified(format!("HTTP {}: {}", status.as_u16(), message)));
        }
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(body).map_err(|e| {
        Error::Parse(format!(
            "Failed to parse response: {} - {}",
            e,
            body.chars().take(200).collect::<String>()
        ))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Trait Implementations
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl QrApiTrait for QrApiClient {
    /// Ask the server to issue a fresh QR for this device.
    async fn fetch_self_qr(&self) -> Result<RawQrPayload> {
        self.post("/qr").await
    }
}

#[async_trait]
impl TagApiTrait for QrApiClient {
    async fn fetch_tag_map(&self) -> Result<TagMap> {
        let response: ApiTagsResponse = self.get("/tags").await?;
        let tags = TagMap::from(response);
        debug!("[QrApi] Received {} tag definitions", tags.len());
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrpass_core::RiskCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const QR_BODY: &str = r#"{
        "data": {"anonymousId": "anon-1", "code": "orange", "tag": null},
        "qr": {"type": "image/png", "base64": "iVBORw0KGgo="}
    }"#;

    /// Serves one canned HTTP response and returns the raw request line.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            // Read headers, then whatever body Content-Length announces
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (base_url, handle)
    }

    #[test]
    fn test_client_creation() {
        let client = QrApiClient::new(DEFAULT_API_URL, "test-token");
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_url_normalization() {
        let client = QrApiClient::new("https://api.qrpass.app/", "test-token").unwrap();
        assert_eq!(client.base_url, "https://api.qrpass.app");
    }

    #[test]
    fn test_invalid_token_rejected() {
        let client = QrApiClient::new(DEFAULT_API_URL, "bad\ntoken");
        assert!(matches!(client, Err(Error::InvalidConfigValue(_))));
    }

    #[test]
    fn test_parse_self_qr_body() {
        let payload: RawQrPayload = parse_body(StatusCode::OK, QR_BODY).unwrap();
        assert_eq!(payload.data.anonymous_id, "anon-1");
        assert_eq!(payload.data.code, RiskCode::Orange);
        assert_eq!(payload.data.tag, None);
        assert_eq!(payload.qr.data_url(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_parse_tags_bare_and_wrapped() {
        let bare: ApiTagsResponse =
            parse_body(StatusCode::OK, r#"[{"name":"n","code":"A1","label":"L1"}]"#).unwrap();
        let wrapped: ApiTagsResponse =
            parse_body(StatusCode::OK, r#"{"tags":[{"code":"A1","label":"L1"}]}"#).unwrap();

        assert_eq!(TagMap::from(bare).label_for("A1"), Some("L1"));
        assert_eq!(TagMap::from(wrapped).label_for("A1"), Some("L1"));
    }

    #[test]
    fn test_status_mapping() {
        let unauthorized = parse_body::<RawQrPayload>(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(unauthorized, Err(Error::NotVerified(_))));

        let forbidden =
            parse_body::<RawQrPayload>(StatusCode::FORBIDDEN, r#"{"message":"device revoked"}"#);
        match forbidden {
            Err(Error::NotVerified(msg)) => assert!(msg.contains("device revoked")),
            other => panic!("unexpected result: {:?}", other),
        }

        let server = parse_body::<RawQrPayload>(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error":"maintenance"}"#,
        );
        match server {
            Err(Error::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_undecodable_body_is_parse_error() {
        let result = parse_body::<RawQrPayload>(StatusCode::OK, "<html>");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[tokio::test]
    async fn test_fetch_self_qr_posts_with_bearer_token() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", QR_BODY).await;
        let client = QrApiClient::new(&base_url, "secret-token").unwrap();

        let payload = client.fetch_self_qr().await.unwrap();
        assert_eq!(payload.data.code, RiskCode::Orange);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /qr "));
        assert!(request
            .to_ascii_lowercase()
            .contains("authorization: bearer secret-token"));
    }

    #[tokio::test]
    async fn test_fetch_self_qr_unauthorized() {
        let (base_url, server) = serve_once("HTTP/1.1 401 Unauthorized", "").await;
        let client = QrApiClient::new(&base_url, "expired").unwrap();

        let result = client.fetch_self_qr().await;
        assert!(result.unwrap_err().is_not_verified());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_tag_map() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"tags":[{"name":"traveller","code":"A1","label":"L1"},{"code":"B2","label":"L2"}]}"#,
        )
        .await;
        let client = QrApiClient::new(&base_url, "token").unwrap();

        let tags = client.fetch_tag_map().await.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.label_for("B2"), Some("L2"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /tags "));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = QrApiClient::new(&base_url, "token").unwrap();
        let result = client.fetch_self_qr().await;
        assert!(matches!(result, Err(Error::Network(_))));
    }
}
