use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::challenge;
use crate::config::ClientConfig;
use crate::error::AuthError;
use crate::http::{HttpTransport, Transport};
use crate::model::{AuthenticationRequest, AuthenticationResponse, CreateSessionResponse, Session};
use crate::session::{interpret, PollOutcome};

/// Lower bound of the provider's long-poll wait hint, in milliseconds.
const MIN_TIMEOUT_MS: u128 = 1000;
/// Upper bound of the provider's long-poll wait hint, in milliseconds.
const MAX_TIMEOUT_MS: u128 = 120_000;

/// Mobile-ID provider operations used by callers and the worker pool.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait MobileIdClient: Send + Sync {
    /// Starts an authentication session; the user gets a PIN prompt and the
    /// returned verification code must match the one on their phone.
    async fn create_session(
        &self,
        phone_number: &str,
        national_identity_number: &str,
    ) -> Result<Session, AuthError>;

    /// Fetches the current session status, long-polling on the provider side.
    async fn fetch_session(&self, session_id: &str) -> Result<PollOutcome, AuthError>;
}

/// Client facade composing challenge generation, transport and the session
/// protocol.
pub struct AuthClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl AuthClient {
    /// Builds a client with a reqwest transport derived from the config.
    pub fn new(config: ClientConfig) -> Result<Self, AuthError> {
        // The transport timeout must outlive the provider's long-poll window.
        let transport_timeout = config.timeout.saturating_add(Duration::from_secs(10));
        let transport = Arc::new(HttpTransport::new(transport_timeout)?);
        Ok(Self { config, transport })
    }

    /// Builds a client over an injected transport (tests, TLS pinning).
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn wait_hint_ms(&self) -> u128 {
        self.config
            .timeout
            .as_millis()
            .clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS)
    }
}

#[async_trait]
impl MobileIdClient for AuthClient {
    async fn create_session(
        &self,
        phone_number: &str,
        national_identity_number: &str,
    ) -> Result<Session, AuthError> {
        self.config.validate()?;

        let hash = challenge::generate_hash(self.config.hash_algorithm);
        let request = AuthenticationRequest {
            relying_party_name: self.config.relying_party_name.clone(),
            relying_party_uuid: self.config.relying_party_uuid.clone(),
            national_identity_number: national_identity_number.to_string(),
            phone_number: phone_number.to_string(),
            hash: hash.clone(),
            hash_type: self.config.hash_algorithm.as_str().to_string(),
            language: self.config.language.clone(),
            display_text: self.config.display_text.clone(),
            display_text_format: self.config.display_text_format.clone(),
        };
        let body = serde_json::to_vec(&request)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        let url = format!("{}/authentication", self.config.base_url);
        let (status, bytes) = self.transport.post(&url, &body).await?;
        debug!(status, phone_number, "authentication session requested");

        match status {
            200 | 201 | 202 => {
                let response: CreateSessionResponse = serde_json::from_slice(&bytes)
                    .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
                let verification_code = challenge::generate_verification_code(&hash)?;
                Ok(Session {
                    id: response.id,
                    verification_code,
                })
            }
            400 => Err(AuthError::ProviderPayloadError),
            401 => Err(AuthError::AccessForbidden),
            405 => Err(AuthError::MethodNotAllowed),
            other => Err(AuthError::ProviderError(other)),
        }
    }

    async fn fetch_session(&self, session_id: &str) -> Result<PollOutcome, AuthError> {
        let url = format!(
            "{}/authentication/session/{}",
            self.config.base_url, session_id
        );
        let query = [("timeoutMs".to_string(), self.wait_hint_ms().to_string())];
        let (status, bytes) = self.transport.get(&url, &query).await?;
        debug!(status, session_id, "authentication session fetched");

        match status {
            200 => {
                let response: AuthenticationResponse = serde_json::from_slice(&bytes)
                    .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
                interpret(&response)
            }
            403 => Err(AuthError::AccessForbidden),
            404 => Err(AuthError::SessionNotFound),
            other => Err(AuthError::ProviderError(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::RejectionReason;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> ClientConfig {
        ClientConfig::new("DEMO", "00000000-0000-0000-0000-000000000000")
            .with_base_url(server.uri())
    }

    fn client(server: &MockServer) -> AuthClient {
        AuthClient::new(config(server)).unwrap()
    }

    #[tokio::test]
    async fn test_create_session_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/authentication"))
            .and(body_partial_json(serde_json::json!({
                "relyingPartyName": "DEMO",
                "relyingPartyUUID": "00000000-0000-0000-0000-000000000000",
                "nationalIdentityNumber": "51307149560",
                "phoneNumber": "+37269930366",
                "hashType": "SHA512",
                "language": "ENG",
                "displayText": "Enter PIN1",
                "displayTextFormat": "GSM-7"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sessionID": "f7a2b397-9e4f-4e76-9d2a-ab3c91cb2f76",
                "code": "0000"
            })))
            .mount(&server)
            .await;

        let session = client(&server)
            .create_session("+37269930366", "51307149560")
            .await
            .unwrap();
        assert_eq!(session.id, "f7a2b397-9e4f-4e76-9d2a-ab3c91cb2f76");
        assert_eq!(session.verification_code.len(), 4);
        assert!(session
            .verification_code
            .chars()
            .all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_create_session_missing_relying_party_name_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config =
            ClientConfig::new("", "00000000-0000-0000-0000-000000000000").with_base_url(server.uri());
        let err = AuthClient::new(config)
            .unwrap()
            .create_session("+37269930366", "51307149560")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingRelyingPartyName));
    }

    #[tokio::test]
    async fn test_create_session_missing_relying_party_uuid_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = ClientConfig::new("DEMO", "").with_base_url(server.uri());
        let err = AuthClient::new(config)
            .unwrap()
            .create_session("+37269930366", "51307149560")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingRelyingPartyUuid));
    }

    #[tokio::test]
    async fn test_create_session_status_mapping() {
        let cases = [
            (400, AuthError::ProviderPayloadError),
            (401, AuthError::AccessForbidden),
            (405, AuthError::MethodNotAllowed),
            (500, AuthError::ProviderError(500)),
        ];
        for (status, expected) in cases {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/authentication"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let err = client(&server)
                .create_session("+37269930366", "51307149560")
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), expected.to_string());
        }
    }

    #[tokio::test]
    async fn test_create_session_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/authentication"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client(&server)
            .create_session("+37269930366", "51307149560")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_fetch_session_running() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/authentication/session/session-1"))
            .and(query_param("timeoutMs", "60000"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"state": "RUNNING"})),
            )
            .mount(&server)
            .await;

        let outcome = client(&server).fetch_session("session-1").await.unwrap();
        assert_eq!(outcome, PollOutcome::InProgress);
    }

    #[tokio::test]
    async fn test_fetch_session_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/authentication/session/session-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"state": "COMPLETE", "result": "USER_CANCELLED"}),
            ))
            .mount(&server)
            .await;

        let outcome = client(&server).fetch_session("session-1").await.unwrap();
        assert_eq!(
            outcome,
            PollOutcome::Rejected(RejectionReason::UserCancelled)
        );
    }

    #[tokio::test]
    async fn test_fetch_session_status_mapping() {
        let cases = [
            (403, AuthError::AccessForbidden),
            (404, AuthError::SessionNotFound),
            (502, AuthError::ProviderError(502)),
        ];
        for (status, expected) in cases {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let err = client(&server).fetch_session("session-1").await.unwrap_err();
            assert_eq!(err.to_string(), expected.to_string());
        }
    }

    #[tokio::test]
    async fn test_fetch_session_wait_hint_clamped_low() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("timeoutMs", "1000"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"state": "RUNNING"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = config(&server).with_timeout(Duration::from_millis(1));
        let client = AuthClient::new(config).unwrap();
        client.fetch_session("session-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_session_wait_hint_clamped_high() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("timeoutMs", "120000"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"state": "RUNNING"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let config = config(&server).with_timeout(Duration::from_secs(300));
        let client = AuthClient::new(config).unwrap();
        client.fetch_session("session-1").await.unwrap();
    }
}
