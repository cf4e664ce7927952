//! Signed bearer tokens
//!
//! Tokens use the compact JWS layout with a fixed HS256 header:
//! `base64url(header).base64url(claims).base64url(hmac_sha256)`, no padding.
//! The signature covers the exact bytes of the first two segments.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{Error, Result};
use crate::models::Claims;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

/// Source of the current Unix time in seconds
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock pinned to a settable instant
#[derive(Debug, Default)]
pub struct FixedClock {
    now: AtomicI64,
}

impl FixedClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Issues and verifies HS256 tokens with one symmetric key
#[derive(Clone)]
pub struct TokenCodec {
    secret: Arc<[u8]>,
    clock: Arc<dyn Clock>,
    encoded_header: String,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"<redacted>")
            .field("clock", &self.clock)
            .finish()
    }
}

impl TokenCodec {
    /// Create a codec around `secret`. The key is never rotated for the
    /// lifetime of the codec.
    pub fn new(secret: impl AsRef<[u8]>, clock: Arc<dyn Clock>) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(Error::config("token secret must not be empty"));
        }

        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        };
        let header_json = serde_json::to_vec(&header)
            .map_err(|e| Error::internal(format!("header encoding failed: {}", e)))?;

        Ok(Self {
            secret: Arc::from(secret),
            clock,
            encoded_header: URL_SAFE_NO_PAD.encode(header_json),
        })
    }

    /// Codec backed by the wall clock
    pub fn with_system_clock(secret: impl AsRef<[u8]>) -> Result<Self> {
        Self::new(secret, Arc::new(SystemClock))
    }

    /// Mint a token for `user_id` that expires `ttl` from now.
    ///
    /// # Panics
    ///
    /// Panics if the claims cannot be encoded as JSON, which cannot happen
    /// for string and integer fields.
    pub fn issue(&self, user_id: &str, email: &str, ttl: Duration) -> String {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            exp: self.clock.now().saturating_add(ttl_secs),
        };
        let claims_json = serde_json::to_vec(&claims).expect("claims encode as JSON");

        let signing_input = format!(
            "{}.{}",
            self.encoded_header,
            URL_SAFE_NO_PAD.encode(claims_json)
        );
        let signature = self.mac(signing_input.as_bytes()).finalize().into_bytes();

        format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature))
    }

    /// Verify a token and return its claims.
    ///
    /// The signature is checked before any segment is decoded.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let parts: Vec<&str> = token.split('.').collect();
        let &[header_b64, claims_b64, signature_b64] = parts.as_slice() else {
            return Err(Error::malformed(format!(
                "expected 3 segments, found {}",
                parts.len()
            )));
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| Error::InvalidSignature)?;
        let signing_input_len = header_b64.len() + 1 + claims_b64.len();
        self.mac(token[..signing_input_len].as_bytes())
            .verify_slice(&signature)
            .map_err(|_| Error::InvalidSignature)?;

        let header: Header = decode_segment(header_b64, "header")?;
        if header.alg != ALGORITHM || header.typ != TOKEN_TYPE {
            return Err(Error::malformed(format!(
                "unsupported header {}/{}",
                header.alg, header.typ
            )));
        }

        let claims: Claims = decode_segment(claims_b64, "claims")?;
        if self.clock.now() >= claims.exp {
            return Err(Error::TokenExpired);
        }

        Ok(claims)
    }

    fn mac(&self, message: &[u8]) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(message);
        mac
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str, what: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| Error::malformed(format!("{} is not base64url: {}", what, e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| Error::malformed(format!("{} is not valid JSON: {}", what, e)))
}
