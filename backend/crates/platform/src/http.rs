//! Outbound HTTP transport
//!
//! All server-to-server calls (captcha verification, OAuth2 token exchange,
//! spreadsheet API) go through [`HttpTransport`]. The transport never panics
//! and never hangs: a timeout surfaces as [`TransportError::Timeout`].

use std::time::Duration;

pub use http::Method;

/// Default timeout applied to every outbound call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A request to an external service
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    /// Query parameters, URL-encoded by the transport
    pub query: Vec<(String, String)>,
    /// Sent as `Authorization: Bearer <token>`
    pub bearer: Option<String>,
    /// JSON request body
    pub json: Option<serde_json::Value>,
}

impl OutboundRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            bearer: None,
            json: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Value of the first query parameter named `key`
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a completed call
#[derive(Debug, Clone)]
pub struct OutboundResponse {
    pub status: u16,
    pub body: String,
}

impl OutboundResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Trait for outbound HTTP clients
#[trait_variant::make(HttpTransport: Send)]
pub trait LocalHttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<OutboundResponse, TransportError>;
}

/// `reqwest`-backed transport with a client-wide timeout
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<OutboundResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .query(&request.query);

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.json {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::debug!(error = %e, method = %request.method, "Outbound request failed");
            TransportError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(OutboundResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = OutboundRequest::post("https://example.test/verify")
            .query("secret", "s3cr3t")
            .query("response", "tok")
            .bearer("abc");

        assert_eq!(req.method, Method::POST);
        assert_eq!(req.query_value("secret"), Some("s3cr3t"));
        assert_eq!(req.query_value("response"), Some("tok"));
        assert_eq!(req.query_value("missing"), None);
        assert_eq!(req.bearer.as_deref(), Some("abc"));
        assert!(req.json.is_none());
    }

    #[test]
    fn test_response_is_ok_only_for_200() {
        assert!(OutboundResponse::new(200, "").is_ok());
        assert!(!OutboundResponse::new(201, "").is_ok());
        assert!(!OutboundResponse::new(500, "").is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error_not_a_hang() {
        let transport = ReqwestTransport::new(Duration::from_millis(500)).unwrap();
        // Reserved TEST-NET-1 address, port 9 (discard)
        let result = HttpTransport::send(&transport, OutboundRequest::get("http://192.0.2.1:9/"))
            .await;
        assert!(result.is_err());
    }
}
