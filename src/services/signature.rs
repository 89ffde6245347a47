use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Outcome of checking a Telnyx `telnyx-signature-mac` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    Verified,
    Missing,
    Invalid,
}

impl SignatureCheck {
    pub fn is_verified(&self) -> bool {
        matches!(self, SignatureCheck::Verified)
    }
}

/// base64(HMAC-SHA256(base64_decode(public_key), body))
pub fn sign(public_key_b64: &str, body: &[u8]) -> Option<String> {
    let key = STANDARD.decode(public_key_b64.trim()).ok()?;
    let mut mac = Hmac::<Sha256>::new_from_slice(&key).ok()?;
    mac.update(body);
    Some(STANDARD.encode(mac.finalize().into_bytes()))
}

pub fn verify(public_key_b64: &str, body: &[u8], signature: Option<&str>) -> SignatureCheck {
    let Some(signature) = signature.map(str::trim).filter(|s| !s.is_empty()) else {
        return SignatureCheck::Missing;
    };
    if public_key_b64.trim().is_empty() {
        return SignatureCheck::Invalid;
    }

    let Ok(key) = STANDARD.decode(public_key_b64.trim()) else {
        return SignatureCheck::Invalid;
    };
    let Ok(provided) = STANDARD.decode(signature) else {
        return SignatureCheck::Invalid;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&key) else {
        return SignatureCheck::Invalid;
    };
    mac.update(body);

    // constant-time comparison
    match mac.verify_slice(&provided) {
        Ok(()) => SignatureCheck::Verified,
        Err(_) => SignatureCheck::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "c2VjcmV0LXdlYmhvb2sta2V5";

    #[test]
    fn test_round_trip_verifies() {
        let body = br#"{"data":{"type":"message.received"}}"#;
        let sig = sign(KEY, body).unwrap();
        assert_eq!(verify(KEY, body, Some(&sig)), SignatureCheck::Verified);
    }

    #[test]
    fn test_tampered_body_fails() {
        let sig = sign(KEY, b"original").unwrap();
        assert_eq!(verify(KEY, b"tampered", Some(&sig)), SignatureCheck::Invalid);
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(verify(KEY, b"x", None), SignatureCheck::Missing);
        assert_eq!(verify(KEY, b"x", Some("  ")), SignatureCheck::Missing);
    }

    #[test]
    fn test_no_key_configured_is_invalid() {
        assert_eq!(verify("", b"x", Some("abc=")), SignatureCheck::Invalid);
    }

    #[test]
    fn test_garbage_signature_is_invalid() {
        assert_eq!(verify(KEY, b"x", Some("not base64!!")), SignatureCheck::Invalid);
    }
}
