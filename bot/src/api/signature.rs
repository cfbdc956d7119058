//! HMAC-SHA256 interaction signatures.
//!
//! The dispatcher signs every interaction body with the shared secret and
//! sends the hex digest in `X-Signature-256`.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::warn;

use super::{error::ApiError, AppState};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded signature.
pub const SIGNATURE_HEADER: &str = "x-signature-256";

/// Largest interaction body accepted for verification.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature is not valid hex")]
    Malformed,

    #[error("signature does not match payload")]
    Mismatch,

    #[error("invalid signing key")]
    InvalidKey,
}

fn mac_for(secret: &str, payload: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(payload);
    Ok(mac)
}

/// Sign a payload with HMAC-SHA256 and return the hex-encoded signature.
pub fn sign_payload(secret: &str, payload: &[u8]) -> Result<String, SignatureError> {
    Ok(hex::encode(mac_for(secret, payload)?.finalize().into_bytes()))
}

/// Verify a hex-encoded HMAC-SHA256 signature in constant time.
pub fn verify_signature(secret: &str, payload: &[u8], signature: &str) -> Result<(), SignatureError> {
    let expected = hex::decode(signature.trim()).map_err(|_| SignatureError::Malformed)?;
    mac_for(secret, payload)?
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Reject interactions whose body is not signed with the configured secret.
///
/// Passes everything through when no secret is configured.
pub async fn require_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(secret) = state.config.interaction_secret.as_deref() else {
        return Ok(next.run(request).await);
    };

    let (parts, body) = request.into_parts();
    let signature = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingSignature)?
        .to_string();

    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| ApiError::Body)?;

    if let Err(e) = verify_signature(secret, &bytes, &signature) {
        warn!(error = %e, "Rejected interaction with bad signature");
        return Err(e.into());
    }

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let secret = "test_secret_12345";
        let payload = b"hello world";
        let sig = sign_payload(secret, payload).unwrap();
        assert_eq!(sig.len(), 64);
        assert!(verify_signature(secret, payload, &sig).is_ok());
        assert!(matches!(
            verify_signature("wrong_secret", payload, &sig),
            Err(SignatureError::Mismatch)
        ));
        assert!(matches!(
            verify_signature(secret, b"wrong payload", &sig),
            Err(SignatureError::Mismatch)
        ));
    }

    #[test]
    fn rejects_non_hex_signature() {
        assert!(matches!(
            verify_signature("secret", b"body", "not-hex"),
            Err(SignatureError::Malformed)
        ));
    }

    #[test]
    fn rejects_truncated_signature() {
        let sig = sign_payload("secret", b"body").unwrap();
        assert!(verify_signature("secret", b"body", &sig[..32]).is_err());
    }
}
