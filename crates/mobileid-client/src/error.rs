use crate::session::RejectionReason;

/// AuthError is the closed error set of the Mobile-ID client.
///
/// Configuration errors fail before any I/O, protocol errors indicate a
/// provider contract change, and `AuthenticationFailed` is the expected
/// rejection outcome carrying the provider's code.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing required configuration: relying party name")]
    MissingRelyingPartyName,
    #[error("missing required configuration: relying party UUID")]
    MissingRelyingPartyUuid,
    #[error("invalid worker configuration: {0}")]
    InvalidWorkerConfig(String),

    #[error("unsupported hash type {0}, allowed hash types are SHA256, SHA384 or SHA512")]
    UnsupportedHashType(String),
    #[error("hash value is not valid base64")]
    InvalidHashEncoding,

    #[error("failed to decode certificate")]
    FailedToDecodeCertificate,
    #[error("failed to parse certificate")]
    FailedToParseCertificate,
    #[error("invalid identity number: {0}")]
    InvalidIdentityNumber(String),

    #[error("provider rejected the request payload")]
    ProviderPayloadError,
    #[error("access forbidden, relying party authorization failed")]
    AccessForbidden,
    #[error("method not allowed, only POST and OPTIONS are accepted")]
    MethodNotAllowed,
    #[error("session not found or expired")]
    SessionNotFound,
    #[error("provider error: unexpected status {0}")]
    ProviderError(u16),
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unsupported session state: {0}")]
    UnsupportedState(String),
    #[error("unsupported session result: {0}")]
    UnsupportedResult(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(RejectionReason),

    #[error("operation cancelled")]
    Cancelled,
}
