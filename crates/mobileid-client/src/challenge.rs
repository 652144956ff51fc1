use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::AuthError;

/// Digest algorithms accepted by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Wire name sent in the `hashType` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
        }
    }

    /// Input block size of the digest, which sizes the random challenge.
    fn block_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha384 | HashAlgorithm::Sha512 => 128,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SHA256" => Ok(HashAlgorithm::Sha256),
            "SHA384" => Ok(HashAlgorithm::Sha384),
            "SHA512" => Ok(HashAlgorithm::Sha512),
            other => Err(AuthError::UnsupportedHashType(other.to_string())),
        }
    }
}

/// Generates the random authentication challenge: a block-size random input
/// digested with the chosen algorithm, returned base64-encoded.
pub fn generate_hash(algorithm: HashAlgorithm) -> String {
    let mut input = vec![0u8; algorithm.block_size()];
    rand::rngs::OsRng.fill_bytes(&mut input);

    let digest = match algorithm {
        HashAlgorithm::Sha256 => Sha256::digest(&input).to_vec(),
        HashAlgorithm::Sha384 => Sha384::digest(&input).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(&input).to_vec(),
    };
    BASE64.encode(digest)
}

/// Derives the 4-digit verification code shown to the user.
///
/// The code is the 6 high bits of the first digest byte followed by the
/// 7 low bits of the last digest byte, a 13-bit integer zero-padded to four
/// decimal digits. The provider computes the same value independently, so
/// the derivation is deterministic for a given hash.
pub fn generate_verification_code(hash: &str) -> Result<String, AuthError> {
    let digest = BASE64
        .decode(hash)
        .map_err(|_| AuthError::InvalidHashEncoding)?;

    let (first, last) = match (digest.first(), digest.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(AuthError::InvalidHashEncoding),
    };

    let code = (u16::from(first >> 2) << 7) | u16::from(last & 0x7f);
    Ok(format!("{code:04}"))
}
