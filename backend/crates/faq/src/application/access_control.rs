//! Access Control
//!
//! Admin sessions, per-address submission cooldowns and captcha
//! verification. All state is in-process and lost on restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use platform::clock::Clock;
use platform::crypto::constant_time_eq;
use platform::http::{HttpTransport, OutboundRequest};
use platform::rate_limit::{CooldownConfig, CooldownTable};
use serde::Deserialize;

use crate::application::config::AccessConfig;
use crate::domain::entities::SessionToken;
use crate::domain::value_objects::AddressFingerprint;
use crate::error::{FaqError, FaqResult};

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    #[serde(default)]
    success: bool,
}

pub struct AccessControl<T> {
    config: AccessConfig,
    cooldown: CooldownConfig,
    clock: Arc<dyn Clock>,
    transport: Arc<T>,
    /// Live sessions keyed by token value
    sessions: Mutex<HashMap<String, SessionToken>>,
    cooldowns: CooldownTable,
}

impl<T: HttpTransport> AccessControl<T> {
    pub fn new(config: AccessConfig, clock: Arc<dyn Clock>, transport: Arc<T>) -> Self {
        let cooldown = CooldownConfig::from_minutes(config.ip_protection, config.cooldown_minutes);
        Self {
            config,
            cooldown,
            clock,
            transport,
            sessions: Mutex::new(HashMap::new()),
            cooldowns: CooldownTable::new(),
        }
    }

    /// Check the admin credential pair and mint a session token.
    ///
    /// A wrong login and a wrong password are indistinguishable to the
    /// caller. An unconfigured pair never matches.
    pub fn authenticate(&self, login: &str, password: &str) -> FaqResult<SessionToken> {
        let configured = !self.config.admin_login.is_empty() && !self.config.admin_password.is_empty();
        // Evaluate both comparisons so timing does not reveal which one failed
        let login_ok = constant_time_eq(login.as_bytes(), self.config.admin_login.as_bytes());
        let password_ok =
            constant_time_eq(password.as_bytes(), self.config.admin_password.as_bytes());

        if !(configured & login_ok & password_ok) {
            tracing::warn!("Admin authentication failed");
            return Err(FaqError::AuthFailure);
        }

        let token = SessionToken::issue(self.clock.now_plus_ms(self.config.session_ttl));
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.value.clone(), token.clone());

        tracing::info!(expires_at_ms = token.expires_at_ms, "Admin session opened");
        Ok(token)
    }

    /// Drop every expired session, then report whether `token` is live
    pub fn check_token(&self, token: &str) -> bool {
        let now = self.clock.now_ms();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, session| !session.is_expired(now));
        sessions.contains_key(token)
    }

    /// Start the cooldown for `raw_address`. No-op when IP protection is off.
    pub fn register_submission(&self, raw_address: &str) {
        if !self.cooldown.enabled {
            return;
        }
        let fingerprint = AddressFingerprint::of(raw_address);
        let unlock_at = self.clock.now_plus_ms(self.cooldown.window);
        tracing::debug!(fingerprint = %fingerprint, unlock_at, "Submission cooldown started");
        self.cooldowns.lock_until(fingerprint.into_string(), unlock_at);
    }

    pub fn can_submit(&self, raw_address: &str) -> bool {
        if !self.cooldown.enabled {
            return true;
        }
        let fingerprint = AddressFingerprint::of(raw_address);
        !self
            .cooldowns
            .is_locked(fingerprint.as_str(), self.clock.now_ms())
    }

    pub fn can_show_submission_form(&self, raw_address: &str) -> bool {
        self.config.show_form && self.can_submit(raw_address)
    }

    /// Ask the captcha provider whether `response_token` is genuine.
    ///
    /// Fails closed: any transport error, non-200 status or unparseable body
    /// counts as "not verified".
    pub async fn verify_captcha(&self, response_token: &str) -> bool {
        if response_token.is_empty() {
            return false;
        }

        let request = OutboundRequest::post(&self.config.captcha_verify_url)
            .query("secret", self.config.captcha_secret.as_str())
            .query("response", response_token);

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Captcha provider unreachable");
                return false;
            }
        };

        if !response.is_ok() {
            tracing::warn!(status = response.status, "Captcha provider returned an error");
            return false;
        }

        match serde_json::from_str::<SiteVerifyResponse>(&response.body) {
            Ok(verdict) => verdict.success,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable captcha verdict");
                false
            }
        }
    }

    pub fn captcha_client(&self) -> &str {
        &self.config.captcha_client
    }

    /// Stored cooldown keys, sorted
    pub fn cooldown_fingerprints(&self) -> Vec<String> {
        self.cooldowns.keys()
    }

    /// Number of sessions currently held, expired or not
    pub fn active_sessions(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use platform::clock::ManualClock;
    use platform::testutil::ScriptedTransport;

    fn access(config: AccessConfig) -> (AccessControl<ScriptedTransport>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let transport = Arc::new(ScriptedTransport::new());
        (AccessControl::new(config, clock.clone(), transport), clock)
    }

    #[test]
    fn test_unconfigured_credentials_never_match() {
        let (access, _) = access(AccessConfig::default());
        assert!(matches!(access.authenticate("", ""), Err(FaqError::AuthFailure)));
    }

    #[test]
    fn test_check_token_purges_expired_sessions() {
        let config = AccessConfig {
            admin_login: "admin".into(),
            admin_password: "pw".to_string().into(),
            ..Default::default()
        };
        let (access, clock) = access(config);

        access.authenticate("admin", "pw").unwrap();
        clock.advance(Duration::from_secs(10 * 60));
        let second = access.authenticate("admin", "pw").unwrap();
        assert_eq!(access.active_sessions(), 2);

        clock.advance(Duration::from_secs(25 * 60));
        assert!(access.check_token(&second.value));
        assert_eq!(access.active_sessions(), 1);
    }

    #[test]
    fn test_session_live_through_its_expiry_instant() {
        let config = AccessConfig {
            admin_login: "admin".into(),
            admin_password: "pw".to_string().into(),
            ..Default::default()
        };
        let (access, clock) = access(config);
        let token = access.authenticate("admin", "pw").unwrap();

        clock.advance(Duration::from_millis(
            (token.expires_at_ms - clock.now_ms()) as u64,
        ));
        assert!(!token.is_expired(clock.now_ms()));
        assert!(access.check_token(&token.value));

        clock.advance(Duration::from_millis(1));
        assert!(token.is_expired(clock.now_ms()));
        assert!(!access.check_token(&token.value));
        assert_eq!(access.active_sessions(), 0);
    }

    #[test]
    fn test_oversized_delay_locks_indefinitely() {
        let config = AccessConfig {
            ip_protection: true,
            cooldown_minutes: u64::MAX,
            ..Default::default()
        };
        let (access, clock) = access(config);

        access.register_submission("198.51.100.4");
        clock.advance(Duration::from_secs(10 * 365 * 86_400));
        assert!(!access.can_submit("198.51.100.4"));
    }

    #[test]
    fn test_form_hidden_when_flag_off() {
        let (access, _) = access(AccessConfig::default());
        assert!(access.can_submit("198.51.100.4"));
        assert!(!access.can_show_submission_form("198.51.100.4"));
    }

    #[tokio::test]
    async fn test_captcha_request_carries_secret_and_token() {
        let config = AccessConfig {
            captcha_secret: "s3cret".to_string().into(),
            ..Default::default()
        };
        let (access, _) = access(config);
        access
            .transport
            .push_response(200, r#"{"success": true, "hostname": "faq.example"}"#);

        assert!(access.verify_captcha("tok").await);

        let sent = access.transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].query_value("secret"), Some("s3cret"));
        assert_eq!(sent[0].query_value("response"), Some("tok"));
    }
}
