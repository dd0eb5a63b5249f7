//! API token generation, parsing, and hashing.
//!
//! Tokens look like `pm_<64 lowercase hex>`. Only the SHA-256 digest of the
//! full token string is stored.

use std::fmt;

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// API token prefix.
pub const API_TOKEN_PREFIX: &str = "pm";

/// Number of secret bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

const API_TOKEN_SECRET_HEX_CHARS: usize = API_TOKEN_SECRET_BYTES * 2;

/// A freshly issued plaintext token. Shown once, never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digest stored in `users.token_hash`.
    #[must_use]
    pub fn hash(&self) -> String {
        hash_api_token(&self.0)
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(**redacted**)")
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_api_token() -> ApiToken {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    ApiToken(format!("{API_TOKEN_PREFIX}_{}", encode_hex(&secret)))
}

/// Check that a bearer value has the token shape before touching the database.
///
/// # Errors
///
/// - [`ApiTokenError::InvalidFormat`]: missing or wrong prefix.
/// - [`ApiTokenError::InvalidSecretEncoding`]: secret is not 64 hex characters.
pub fn validate_api_token(token: &str) -> Result<(), ApiTokenError> {
    let (prefix, secret_hex) = token.split_once('_').ok_or(ApiTokenError::InvalidFormat)?;

    if prefix != API_TOKEN_PREFIX {
        return Err(ApiTokenError::InvalidFormat);
    }

    if secret_hex.len() != API_TOKEN_SECRET_HEX_CHARS
        || !secret_hex
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return Err(ApiTokenError::InvalidSecretEncoding);
    }

    Ok(())
}

/// Lowercase hex SHA-256 digest of a token string.
#[must_use]
pub fn hash_api_token(token: &str) -> String {
    encode_hex(&Sha256::digest(token.as_bytes()))
}

fn encode_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(bytes.len() * 2);

    for byte in bytes {
        encoded.push(char::from(HEX[usize::from(byte >> 4)]));
        encoded.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }

    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_validate() {
        let token = generate_api_token();

        assert!(token.as_str().starts_with("pm_"));
        assert_eq!(validate_api_token(token.as_str()), Ok(()));
    }

    #[test]
    fn generated_tokens_differ() {
        assert_ne!(generate_api_token(), generate_api_token());
    }

    #[test]
    fn validate_rejects_invalid_prefix() {
        let secret = "a".repeat(64);

        assert_eq!(
            validate_api_token(&format!("lt_{secret}")),
            Err(ApiTokenError::InvalidFormat)
        );
        assert_eq!(validate_api_token(&secret), Err(ApiTokenError::InvalidFormat));
    }

    #[test]
    fn validate_rejects_bad_secret() {
        assert_eq!(
            validate_api_token("pm_abc"),
            Err(ApiTokenError::InvalidSecretEncoding)
        );
        assert_eq!(
            validate_api_token(&format!("pm_{}", "Z".repeat(64))),
            Err(ApiTokenError::InvalidSecretEncoding)
        );
    }

    #[test]
    fn hash_is_sha256_hex() {
        // sha256("abc")
        assert_eq!(
            hash_api_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn debug_output_is_redacted() {
        let token = generate_api_token();

        assert!(!format!("{token:?}").contains(token.as_str()));
    }
}
