//! JWT payload decoding.
//!
//! Only the middle segment of `header.payload.signature` is read. Nothing here
//! checks the signature: the decoded claims describe the session for display
//! and expiry purposes only, the backend remains the authority.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::de::DeserializeOwned;

use super::models::SessionPayload;

/// URL-safe alphabet, padding optional. Standard-alphabet input is mapped onto
/// it before decoding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Token decoding errors
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has no payload segment")]
    MissingPayloadSegment,

    #[error("token payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Return the raw payload segment (index 1) of `token`
pub fn payload_segment(token: &str) -> Result<&str, TokenError> {
    token
        .split('.')
        .nth(1)
        .ok_or(TokenError::MissingPayloadSegment)
}

/// Decode the payload segment into raw bytes
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    let normalized: String = segment
        .trim()
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    Ok(PAYLOAD_ENGINE.decode(normalized)?)
}

/// Decode the payload segment of `token` into any claims type
pub fn decode_claims<T: DeserializeOwned>(token: &str) -> Result<T, TokenError> {
    let bytes = decode_segment(payload_segment(token)?)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decode the payload segment of `token` into a [`SessionPayload`]
pub fn decode_payload(token: &str) -> Result<SessionPayload, TokenError> {
    decode_claims(token)
}

/// Base64url-encode JSON claims as a payload segment
pub fn encode_segment(bytes: &[u8]) -> String {
    PAYLOAD_ENGINE.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    fn token_with_payload(payload: &serde_json::Value) -> String {
        let body = encode_segment(payload.to_string().as_bytes());
        format!("eyJhbGciOiJIUzI1NiJ9.{body}.c2lnbmF0dXJl")
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct SignedClaims {
        email: String,
        user_type: String,
        exp: i64,
        iat: i64,
    }

    #[test]
    fn test_decode_payload() {
        let token = token_with_payload(&json!({
            "first_name": "Ada",
            "middle_name": "King",
            "last_name": "Lovelace",
            "user_type": "admin",
            "email": "ada@example.com",
            "exp": 2_000_000_000,
            "iat": 1_999_996_400
        }));

        let payload = decode_payload(&token).unwrap();

        assert_eq!(payload.first_name(), Some("Ada"));
        assert_eq!(payload.middle_name(), Some("King"));
        assert_eq!(payload.email(), Some("ada@example.com"));
        assert_eq!(payload.expires_at(), 2_000_000_000.0);
        assert_eq!(payload.issued_at(), 1_999_996_400.0);
    }

    #[test]
    fn test_payload_roundtrip_preserves_object() {
        let original = json!({
            "first_name": "Ada",
            "middle_name": "",
            "last_name": "Lovelace",
            "user_type": "member",
            "email": "ada@example.com",
            "exp": 1_700_003_600,
            "iat": 1_700_000_000,
            "password": "",
            "roles": ["reader", "writer"]
        });

        let payload = decode_payload(&token_with_payload(&original)).unwrap();

        assert_eq!(serde_json::to_value(&payload).unwrap(), original);
    }

    #[test]
    fn test_decode_token_issued_by_jsonwebtoken() {
        let claims = SignedClaims {
            email: "grace@example.com".to_string(),
            user_type: "staff".to_string(),
            exp: 1_900_000_000,
            iat: 1_899_990_000,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"not-checked-here"),
        )
        .unwrap();

        let payload = decode_payload(&token).unwrap();

        assert_eq!(payload.email(), Some("grace@example.com"));
        assert_eq!(payload.user_type(), Some("staff"));
        assert_eq!(payload.expires_at(), 1_900_000_000.0);
        assert_eq!(payload.issued_at(), 1_899_990_000.0);
    }

    #[test]
    fn test_decode_standard_alphabet_with_padding() {
        let raw = json!({ "exp": 1, "iat": 0, "note": "??>>~~" }).to_string();
        let segment = STANDARD.encode(raw.as_bytes());

        let claims: serde_json::Value = decode_claims(&format!("h.{segment}.s")).unwrap();
        assert_eq!(claims["note"], "??>>~~");
    }

    #[test]
    fn test_two_segments_are_enough() {
        let segment = encode_segment(br#"{"exp":5,"iat":1}"#);
        let payload = decode_payload(&format!("header.{segment}")).unwrap();
        assert_eq!(payload.expires_at(), 5.0);
    }

    #[test]
    fn test_missing_payload_segment() {
        let err = decode_payload("just-one-segment").unwrap_err();
        assert!(matches!(err, TokenError::MissingPayloadSegment));
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_payload("h.!!not*base64!!.s").unwrap_err();
        assert!(matches!(err, TokenError::Base64(_)));
    }

    #[test]
    fn test_invalid_json() {
        let segment = encode_segment(b"{not json");
        let err = decode_payload(&format!("h.{segment}.s")).unwrap_err();
        assert!(matches!(err, TokenError::Json(_)));
    }

    #[test]
    fn test_non_numeric_expiry_is_rejected() {
        let token = token_with_payload(&json!({ "exp": "tomorrow", "iat": 0 }));
        let err = decode_payload(&token).unwrap_err();
        assert!(matches!(err, TokenError::Json(_)));
    }

    #[test]
    fn test_token_error_display() {
        assert_eq!(
            TokenError::MissingPayloadSegment.to_string(),
            "token has no payload segment"
        );
    }
}
