use std::time::Duration;

use crate::challenge::HashAlgorithm;
use crate::error::AuthError;

/// Default display text shown on the user's phone.
pub const DEFAULT_DISPLAY_TEXT: &str = "Enter PIN1";
/// Default display text encoding.
pub const DEFAULT_DISPLAY_TEXT_FORMAT: &str = "GSM-7";
/// Default display text language.
pub const DEFAULT_LANGUAGE: &str = "ENG";
/// Demo environment endpoint of the Mobile-ID provider.
pub const DEFAULT_URL: &str = "https://tsp.demo.sk.ee/mid-api";
/// Default request timeout, also the provider long-poll hint source.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Immutable client configuration.
///
/// Built once via [`ClientConfig::new`] plus consuming `with_*` setters;
/// nothing is mutated after the client is constructed.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub relying_party_name: String,
    pub relying_party_uuid: String,
    pub hash_algorithm: HashAlgorithm,
    pub display_text: String,
    pub display_text_format: String,
    pub language: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(relying_party_name: impl Into<String>, relying_party_uuid: impl Into<String>) -> Self {
        Self {
            relying_party_name: relying_party_name.into(),
            relying_party_uuid: relying_party_uuid.into(),
            hash_algorithm: HashAlgorithm::Sha512,
            display_text: DEFAULT_DISPLAY_TEXT.to_string(),
            display_text_format: DEFAULT_DISPLAY_TEXT_FORMAT.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            base_url: DEFAULT_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    pub fn with_display_text(mut self, text: impl Into<String>) -> Self {
        self.display_text = text.into();
        self
    }

    pub fn with_display_text_format(mut self, format: impl Into<String>) -> Self {
        self.display_text_format = format.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks the relying-party identification required by the provider.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.relying_party_name.is_empty() {
            return Err(AuthError::MissingRelyingPartyName);
        }
        if self.relying_party_uuid.is_empty() {
            return Err(AuthError::MissingRelyingPartyUuid);
        }
        Ok(())
    }
}
