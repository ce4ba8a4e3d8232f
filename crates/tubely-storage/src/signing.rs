//! Signed query strings for objects served by the local backend.
//!
//! Query: `expires={unix_secs}&nonce={b64url 16 bytes}&signature={b64url tag}`
//! where tag = HMAC-SHA256(secret, "{bucket}\n{key}\n{expires}\n{nonce}").
//! The random nonce makes every minted URL distinct even within one second.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::Deserialize;
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::{ObjectLocation, StorageError, StorageResult};

const NONCE_LEN: usize = 16;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Invalid signature")]
    Invalid,
    #[error("Signed URL has expired")]
    Expired,
}

/// Parameters appended to a signed asset URL
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SignedQuery {
    pub expires: u64,
    pub nonce: String,
    pub signature: String,
}

impl SignedQuery {
    pub fn to_query_string(&self) -> String {
        format!(
            "expires={}&nonce={}&signature={}",
            self.expires, self.nonce, self.signature
        )
    }
}

#[derive(Clone)]
pub struct UrlSigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner").finish_non_exhaustive()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl UrlSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> StorageResult<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(StorageError::ConfigError(
                "asset signing secret must not be empty".to_string(),
            ));
        }
        Ok(Self { secret })
    }

    pub fn sign(&self, location: &ObjectLocation, expires_in: Duration) -> StorageResult<SignedQuery> {
        let expires = unix_now().saturating_add(expires_in.as_secs());

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = URL_SAFE_NO_PAD.encode(nonce_bytes);

        let mac = self.mac(location, expires, &nonce)?;
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(SignedQuery {
            expires,
            nonce,
            signature,
        })
    }

    /// Check the tag first, then expiry.
    pub fn verify(&self, location: &ObjectLocation, query: &SignedQuery) -> Result<(), SignatureError> {
        let tag = URL_SAFE_NO_PAD
            .decode(&query.signature)
            .map_err(|_| SignatureError::Invalid)?;
        let mac = self
            .mac(location, query.expires, &query.nonce)
            .map_err(|_| SignatureError::Invalid)?;
        mac.verify_slice(&tag).map_err(|_| SignatureError::Invalid)?;

        if unix_now() > query.expires {
            return Err(SignatureError::Expired);
        }
        Ok(())
    }

    fn mac(&self, location: &ObjectLocation, expires: u64, nonce: &str) -> StorageResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?;
        mac.update(
            format!(
                "{}\n{}\n{}\n{}",
                location.bucket, location.key, expires, nonce
            )
            .as_bytes(),
        );
        Ok(mac)
    }
}
