//! Bitkub request signing
//!
//! Signature is HMAC-SHA256, hex encoded, over the UTF-8 bytes of
//! `{timestamp}{METHOD}{path_and_query}`. The timestamp is the server time
//! string, used verbatim.

use crate::errors::{ExchangeError, Result};

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_API_KEY: &str = "X-BTK-APIKEY";
pub const HEADER_TIMESTAMP: &str = "X-BTK-TIMESTAMP";
pub const HEADER_SIGN: &str = "X-BTK-SIGN";

pub const ENV_API_KEY: &str = "BITKUB_API_KEY";
pub const ENV_API_SECRET: &str = "BITKUB_API_SECRET";

/// Bitkub API credentials
#[derive(Clone, PartialEq, Eq)]
pub struct BitkubCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl BitkubCredentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Credentials from `BITKUB_API_KEY` / `BITKUB_API_SECRET`
    ///
    /// `None` unless both are set and non-empty, an empty variable means
    /// "no credentials" rather than an error.
    pub fn from_env() -> Option<Self> {
        let api_key = crate::env::var_nonempty(ENV_API_KEY)?;
        let api_secret = crate::env::var_nonempty(ENV_API_SECRET)?;
        Some(Self::new(api_key, api_secret))
    }

    /// Both parts present
    pub fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl std::fmt::Debug for BitkubCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitkubCredentials")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &"***")
            .finish()
    }
}

/// Keep the first and last four characters of a key
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Bitkub request signer
#[derive(Debug, Clone)]
pub struct BitkubSigner {
    credentials: BitkubCredentials,
}

impl BitkubSigner {
    pub fn new(credentials: BitkubCredentials) -> Result<Self> {
        if !credentials.is_valid() {
            return Err(ExchangeError::ConfigurationError(
                "Bitkub API key and secret must both be non-empty".to_string(),
            ));
        }
        Ok(Self { credentials })
    }

    /// `{timestamp}{METHOD}{path_and_query}`
    pub fn signing_payload(timestamp: &str, method: &str, path_and_query: &str) -> String {
        format!("{timestamp}{method}{path_and_query}")
    }

    /// Hex HMAC-SHA256 of the signing payload
    pub fn sign(&self, timestamp: &str, method: &str, path_and_query: &str) -> Result<String> {
        self.create_signature(&Self::signing_payload(timestamp, method, path_and_query))
    }

    fn create_signature(&self, payload: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret.as_bytes())
            .map_err(|e| ExchangeError::SigningError(format!("HMAC setup failed: {e}")))?;

        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Sign a request and collect the headers to send with it
    pub fn signed_headers(&self, timestamp: &str, method: &str, path_and_query: &str) -> Result<SignedHeaders> {
        let signature = self.sign(timestamp, method, path_and_query)?;
        Ok(SignedHeaders {
            api_key: self.credentials.api_key.clone(),
            timestamp: timestamp.to_string(),
            signature,
        })
    }

    /// Constant-time signature check
    pub fn validate_signature(&self, payload: &str, signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(self.credentials.api_secret.as_bytes()) else {
            return false;
        };
        mac.update(payload.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

/// Header values for one signed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub api_key: String,
    pub timestamp: String,
    pub signature: String,
}

impl SignedHeaders {
    /// The five request headers, in the order they are sent
    pub fn as_pairs(&self) -> [(&str, &str); 5] {
        [
            ("Accept", "application/json"),
            ("Content-type", "application/json"),
            (HEADER_API_KEY, self.api_key.as_str()),
            (HEADER_TIMESTAMP, self.timestamp.as_str()),
            (HEADER_SIGN, self.signature.as_str()),
        ]
    }
}
