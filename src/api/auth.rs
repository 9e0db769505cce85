//! API key verification for protected endpoints

use actix_web::http::header::HeaderMap;
use sha2::{Digest, Sha256};

use super::error::ApiError;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Checks the `X-API-Key` header against the configured secret
///
/// Keys are compared through their SHA-256 digests so the comparison does
/// not depend on the secret's length or content.
#[derive(Clone)]
pub struct ApiKeyVerifier {
    expected: Option<[u8; 32]>,
}

impl ApiKeyVerifier {
    /// Without a secret every presented key is rejected
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            expected: secret.map(digest),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }

    pub fn verify(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let presented = headers
            .get(API_KEY_HEADER)
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::MissingApiKey)?;

        let presented = presented.to_str().map_err(|_| ApiError::InvalidApiKey)?;

        match &self.expected {
            Some(expected) if digest(presented) == *expected => Ok(()),
            _ => Err(ApiError::InvalidApiKey),
        }
    }
}

fn digest(key: &str) -> [u8; 32] {
    Sha256::digest(key.as_bytes()).into()
}
