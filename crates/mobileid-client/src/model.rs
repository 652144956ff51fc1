use serde::{Deserialize, Serialize};

/// One authentication attempt as returned by session creation.
///
/// The verification code is derived locally from the challenge hash and must
/// match the code the provider shows on the user's phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub verification_code: String,
}

/// Verified identity extracted from the authentication certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub identity_number: String,
    pub personal_code: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationRequest {
    pub relying_party_name: String,
    #[serde(rename = "relyingPartyUUID")]
    pub relying_party_uuid: String,
    pub national_identity_number: String,
    pub phone_number: String,
    pub hash: String,
    pub hash_type: String,
    pub language: String,
    pub display_text: String,
    pub display_text_format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub signature: Signature,
    #[serde(default)]
    pub cert: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub algorithm: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateSessionResponse {
    #[serde(rename = "sessionID")]
    pub id: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub code: String,
}
