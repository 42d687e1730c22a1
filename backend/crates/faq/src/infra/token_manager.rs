//! Service-Account Bearer Token Manager
//!
//! Exchanges a signed RS256 assertion for an OAuth2 access token and caches
//! it until expiry. Only spreadsheet writes need the token.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use platform::clock::Clock;
use platform::http::{HttpTransport, OutboundRequest};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::application::config::{ConfigError, SheetConfig};
use crate::domain::entities::BearerCredential;
use crate::error::{FaqError, FaqResult};

pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of the signed assertion
const ASSERTION_TTL_SECS: i64 = 1800;

/// How long a fetched access token is reused
const CREDENTIAL_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

pub struct BearerTokenManager<T> {
    transport: Arc<T>,
    clock: Arc<dyn Clock>,
    signing_key: EncodingKey,
    service_account: String,
    scope: String,
    token_url: String,
    /// Held across a refresh so only one caller fetches
    credential: Mutex<Option<BearerCredential>>,
}

impl<T: HttpTransport> BearerTokenManager<T> {
    pub fn new(
        config: &SheetConfig,
        transport: Arc<T>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let signing_key = EncodingKey::from_rsa_pem(config.private_key_pem.as_bytes())
            .map_err(|e| ConfigError::InvalidPrivateKey(e.to_string()))?;

        Ok(Self {
            transport,
            clock,
            signing_key,
            service_account: config.service_account.clone(),
            scope: config.scope.clone(),
            token_url: config.token_url.clone(),
            credential: Mutex::new(None),
        })
    }

    /// Return a valid access token, fetching one if absent or expired.
    ///
    /// `None` means the exchange failed; nothing is cached and the next
    /// caller tries again.
    pub async fn ensure_fresh_token(&self) -> Option<String> {
        let mut credential = self.credential.lock().await;
        let now = self.clock.now_ms();

        if let Some(current) = credential.as_ref().filter(|c| c.is_valid_at(now)) {
            return Some(current.value.clone());
        }

        match self.fetch_token(now).await {
            Ok(fresh) => {
                tracing::info!(expires_at_ms = fresh.expires_at_ms, "Spreadsheet access token refreshed");
                let value = fresh.value.clone();
                *credential = Some(fresh);
                Some(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Spreadsheet access token refresh failed");
                *credential = None;
                None
            }
        }
    }

    /// Signed RS256 assertion for the JWT-bearer grant
    pub fn build_assertion(&self, now_ms: i64) -> FaqResult<String> {
        let iat = now_ms.div_euclid(1000);
        let claims = AssertionClaims {
            iss: self.service_account.clone(),
            scope: self.scope.clone(),
            aud: self.token_url.clone(),
            iat,
            exp: iat + ASSERTION_TTL_SECS,
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.signing_key,
        )?)
    }

    async fn fetch_token(&self, now_ms: i64) -> FaqResult<BearerCredential> {
        let request = OutboundRequest::post(&self.token_url)
            .query("grant_type", JWT_BEARER_GRANT)
            .query("assertion", self.build_assertion(now_ms)?);

        let response = self.transport.send(request).await?;
        if !response.is_ok() || response.body.is_empty() {
            return Err(FaqError::BackendUnavailable(format!(
                "token endpoint returned status {}",
                response.status
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&response.body)?;
        if parsed.access_token.is_empty() {
            return Err(FaqError::BackendUnavailable(
                "token endpoint returned no access_token".into(),
            ));
        }

        Ok(BearerCredential {
            value: parsed.access_token,
            expires_at_ms: self.clock.now_plus_ms(CREDENTIAL_TTL),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation};
    use platform::clock::ManualClock;
    use platform::http::TransportError;
    use platform::testutil::ScriptedTransport;

    const PRIVATE_KEY: &str = include_str!("../../tests/fixtures/test_service_account.pem");
    const PUBLIC_KEY: &str = include_str!("../../tests/fixtures/test_service_account.pub.pem");

    fn manager() -> (
        BearerTokenManager<ScriptedTransport>,
        Arc<ScriptedTransport>,
        Arc<ManualClock>,
    ) {
        let config = SheetConfig::new(
            "sheet",
            "key",
            "FAQ",
            "A:F",
            "faq@project.iam.gserviceaccount.com",
            PRIVATE_KEY,
        );
        let transport = Arc::new(ScriptedTransport::new());
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let manager = BearerTokenManager::new(&config, transport.clone(), clock.clone()).unwrap();
        (manager, transport, clock)
    }

    #[test]
    fn test_invalid_pem_is_config_error() {
        let config = SheetConfig::new("s", "k", "t", "A:F", "sa", "not a key");
        let result = BearerTokenManager::new(
            &config,
            Arc::new(ScriptedTransport::new()),
            Arc::new(ManualClock::new(0)),
        );
        assert!(matches!(result, Err(ConfigError::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_assertion_claims() {
        let (manager, _, _) = manager();
        let jwt = manager.build_assertion(1_700_000_000_000).unwrap();

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.set_audience(&[crate::application::config::DEFAULT_TOKEN_URL]);
        let key = DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap();
        let decoded = jsonwebtoken::decode::<AssertionClaims>(&jwt, &key, &validation).unwrap();

        assert_eq!(decoded.header.alg, Algorithm::RS256);
        assert_eq!(decoded.claims.iss, "faq@project.iam.gserviceaccount.com");
        assert_eq!(
            decoded.claims.scope,
            "https://www.googleapis.com/auth/spreadsheets"
        );
        assert_eq!(decoded.claims.iat, 1_700_000_000);
        assert_eq!(decoded.claims.exp, 1_700_000_000 + 1800);
    }

    #[tokio::test]
    async fn test_token_request_shape() {
        let (manager, transport, _) = manager();
        transport.push_response(200, r#"{"access_token": "ya29.a", "expires_in": 3599}"#);

        assert_eq!(manager.ensure_fresh_token().await.as_deref(), Some("ya29.a"));

        let sent = transport.requests();
        assert_eq!(sent[0].url, "https://oauth2.googleapis.com/token");
        assert_eq!(sent[0].query_value("grant_type"), Some(JWT_BEARER_GRANT));
        assert!(sent[0].query_value("assertion").is_some_and(|a| a.split('.').count() == 3));
    }

    #[tokio::test]
    async fn test_refresh_after_expiry() {
        let (manager, transport, clock) = manager();
        transport
            .push_response(200, r#"{"access_token": "first"}"#)
            .push_response(200, r#"{"access_token": "second"}"#);

        assert_eq!(manager.ensure_fresh_token().await.as_deref(), Some("first"));
        clock.advance(Duration::from_secs(29 * 60));
        assert_eq!(manager.ensure_fresh_token().await.as_deref(), Some("first"));
        clock.advance(Duration::from_secs(60));
        assert_eq!(manager.ensure_fresh_token().await.as_deref(), Some("second"));
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_exchange_caches_nothing() {
        let (manager, transport, _) = manager();
        transport
            .push_response(200, "")
            .push_error(TransportError::Timeout)
            .push_response(400, r#"{"error": "invalid_grant"}"#)
            .push_response(200, r#"{"token_type": "Bearer"}"#)
            .push_response(200, r#"{"access_token": "ok"}"#);

        for _ in 0..4 {
            assert_eq!(manager.ensure_fresh_token().await, None);
        }
        assert_eq!(manager.ensure_fresh_token().await.as_deref(), Some("ok"));
        assert_eq!(transport.request_count(), 5);
    }
}
