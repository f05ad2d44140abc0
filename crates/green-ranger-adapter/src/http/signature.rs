/*
[INPUT]:  Session secret and API endpoint path
[OUTPUT]: Hex-encoded HMAC-SHA256 tag for the `sign` header
[POS]:    HTTP layer - request signing for authenticated endpoints
[UPDATE]: When changing signing algorithm or header format
*/

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::http::{RangerError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Sign an endpoint path with the session secret.
///
/// Only the path is authenticated. Query parameters and bodies are not part
/// of the signed material and the tag carries no timestamp, so a captured
/// `sign` header stays valid for that path for as long as the secret does.
pub fn sign_path(secret: &str, path: &str) -> Result<String> {
    if secret.is_empty() {
        return Err(RangerError::Signing("secret is empty"));
    }
    if path.is_empty() {
        return Err(RangerError::Signing("path is empty"));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| RangerError::Signing("secret rejected as HMAC key"))?;
    mac.update(path.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Signs endpoint paths with a fixed session secret
#[derive(Clone)]
pub struct RequestSigner {
    secret: String,
}

impl RequestSigner {
    /// Create a signer bound to the given secret
    pub fn new(secret: impl Into<String>) -> Result<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(RangerError::Signing("secret is empty"));
        }
        Ok(Self { secret })
    }

    /// Produce the `sign` header value for `path`
    pub fn sign_path(&self, path: &str) -> Result<String> {
        sign_path(&self.secret, path)
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret", &"<redacted>")
            .finish()
    }
}
