//! # Payload Parsing
//!
//! Wire format for encrypted payloads and its structural validation.
//!
//! ## Wire Format
//!
//! A payload is a JSON object with base64-encoded binary fields. Two shapes
//! exist, distinguished by which key field is present:
//!
//! ```text
//! Sealed (direct box from a known sender):
//! {
//!   "nonce":           "<base64, 24 bytes>",
//!   "encryptedData":   "<base64, ciphertext + 16-byte tag>",
//!   "senderPublicKey": "<base64, 32 bytes>"
//! }
//!
//! Wrapped (symmetric key travels with the payload):
//! {
//!   "nonce":           "<base64, 24 bytes>",
//!   "encryptedData":   "<base64, ciphertext + 16-byte tag>",
//!   "encryptedKey":    "<base64, wrapped 32-byte key + 16-byte tag>"
//! }
//! ```
//!
//! Parsing fixes the mode once: a payload that names both key fields, or
//! neither, is rejected outright rather than guessed at. All structural
//! problems surface as [`DecryptError::MalformedPayload`] before any
//! cryptographic work happens.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;

use crate::error::{DecryptError, Result};
use crate::keys::PUBLIC_KEY_SIZE;

/// Size of the XSalsa20 nonce in bytes
pub const NONCE_SIZE: usize = 24;

/// Size of the Poly1305 authentication tag in bytes
///
/// Ciphertext fields carry the tag inline, so no valid ciphertext can be
/// shorter than this.
pub const TAG_SIZE: usize = 16;

/// Untyped wire shape, straight off the JSON
///
/// Every field is optional here; presence rules are enforced in
/// [`EncryptedPayload::from_raw`], not by the deserializer, so that missing
/// fields produce our own error text. Unknown fields are ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    nonce: Option<String>,
    encrypted_data: Option<String>,
    sender_public_key: Option<String>,
    encrypted_key: Option<String>,
}

/// How the payload's content key is established
///
/// Fixed at parse time from the payload's own fields and never revisited
/// during decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadMode {
    /// Ciphertext is a direct box from `sender_public_key` to the recipient
    Sealed {
        /// The sender's Curve25519 public key
        sender_public_key: [u8; PUBLIC_KEY_SIZE],
    },
    /// Ciphertext is under a symmetric key, itself boxed to the recipient
    Wrapped {
        /// The wrapped symmetric key (ciphertext + tag)
        encrypted_key: Vec<u8>,
    },
}

impl PayloadMode {
    /// Short mode label for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            PayloadMode::Sealed { .. } => "sealed",
            PayloadMode::Wrapped { .. } => "wrapped",
        }
    }
}

/// A structurally valid encrypted payload, ready for decryption
///
/// Construction via [`EncryptedPayload::from_json`] guarantees the nonce is
/// exactly 24 bytes, the ciphertext is long enough to carry its tag, and
/// exactly one of the two mode-determining fields was present.
#[derive(Debug, Clone)]
pub struct EncryptedPayload {
    nonce: [u8; NONCE_SIZE],
    encrypted_data: Vec<u8>,
    mode: PayloadMode,
}

impl EncryptedPayload {
    /// Parse and validate a JSON-encoded payload
    ///
    /// ## Errors
    ///
    /// Returns [`DecryptError::MalformedPayload`] for anything structurally
    /// wrong: invalid JSON, a missing or non-base64 field, a nonce or sender
    /// key of the wrong length, a ciphertext too short to carry its tag, or
    /// an ambiguous mode (both or neither of `senderPublicKey` and
    /// `encryptedKey`).
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let raw: RawPayload = serde_json::from_slice(bytes)
            .map_err(|e| DecryptError::MalformedPayload(format!("invalid JSON: {e}")))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawPayload) -> Result<Self> {
        let nonce_text = raw
            .nonce
            .ok_or_else(|| DecryptError::MalformedPayload("missing required field `nonce`".into()))?;
        let data_text = raw
            .encrypted_data
            .ok_or_else(|| DecryptError::MalformedPayload("missing required field `encryptedData`".into()))?;

        let mode = match (raw.sender_public_key, raw.encrypted_key) {
            (Some(_), Some(_)) => {
                return Err(DecryptError::MalformedPayload(
                    "payload declares both `senderPublicKey` and `encryptedKey`; the mode is ambiguous".into(),
                ))
            }
            (None, None) => {
                return Err(DecryptError::MalformedPayload(
                    "payload declares neither `senderPublicKey` nor `encryptedKey`".into(),
                ))
            }
            (Some(sender), None) => PayloadMode::Sealed {
                sender_public_key: decode_fixed::<PUBLIC_KEY_SIZE>("senderPublicKey", &sender)?,
            },
            (None, Some(wrapped)) => {
                let encrypted_key = decode_field("encryptedKey", &wrapped)?;
                if encrypted_key.len() < TAG_SIZE {
                    return Err(DecryptError::MalformedPayload(format!(
                        "field `encryptedKey` is too short to carry an authentication tag ({} < {TAG_SIZE} bytes)",
                        encrypted_key.len()
                    )));
                }
                PayloadMode::Wrapped { encrypted_key }
            }
        };

        let nonce = decode_fixed::<NONCE_SIZE>("nonce", &nonce_text)?;
        let encrypted_data = decode_field("encryptedData", &data_text)?;
        if encrypted_data.len() < TAG_SIZE {
            return Err(DecryptError::MalformedPayload(format!(
                "field `encryptedData` is too short to carry an authentication tag ({} < {TAG_SIZE} bytes)",
                encrypted_data.len()
            )));
        }

        Ok(Self { nonce, encrypted_data, mode })
    }

    /// The 24-byte nonce shared by every cipher step of this payload
    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// The ciphertext, tag included
    pub fn encrypted_data(&self) -> &[u8] {
        &self.encrypted_data
    }

    /// Which decryption path this payload takes
    pub fn mode(&self) -> &PayloadMode {
        &self.mode
    }
}

/// Decode one base64 field, naming it in the error
fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| DecryptError::MalformedPayload(format!("field `{name}` is not valid base64: {e}")))
}

/// Decode one base64 field that must be exactly `N` bytes
fn decode_fixed<const N: usize>(name: &str, value: &str) -> Result<[u8; N]> {
    let bytes = decode_field(name, value)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        DecryptError::MalformedPayload(format!("field `{name}` must decode to {} bytes, got {len}", N))
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn b64(bytes: &[u8]) -> String {
        BASE64.encode(bytes)
    }

    fn parse(value: serde_json::Value) -> Result<EncryptedPayload> {
        EncryptedPayload::from_json(value.to_string().as_bytes())
    }

    fn expect_malformed(value: serde_json::Value, needle: &str) {
        match parse(value) {
            Err(DecryptError::MalformedPayload(msg)) => {
                assert!(msg.contains(needle), "message {msg:?} should mention {needle:?}")
            }
            other => panic!("expected MalformedPayload mentioning {needle:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_sealed_payload() {
        let payload = parse(json!({
            "nonce": b64(&[1u8; 24]),
            "encryptedData": b64(&[2u8; 48]),
            "senderPublicKey": b64(&[3u8; 32]),
        }))
        .unwrap();

        assert_eq!(payload.nonce(), &[1u8; 24]);
        assert_eq!(payload.encrypted_data(), &[2u8; 48][..]);
        assert_eq!(payload.mode().name(), "sealed");
        assert!(matches!(
            payload.mode(),
            PayloadMode::Sealed { sender_public_key } if *sender_public_key == [3u8; 32]
        ));
    }

    #[test]
    fn test_parse_wrapped_payload() {
        let payload = parse(json!({
            "nonce": b64(&[1u8; 24]),
            "encryptedData": b64(&[2u8; 48]),
            "encryptedKey": b64(&[4u8; 48]),
        }))
        .unwrap();

        assert_eq!(payload.mode().name(), "wrapped");
        assert!(matches!(
            payload.mode(),
            PayloadMode::Wrapped { encrypted_key } if encrypted_key == &vec![4u8; 48]
        ));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let payload = parse(json!({
            "nonce": b64(&[1u8; 24]),
            "encryptedData": b64(&[2u8; 48]),
            "senderPublicKey": b64(&[3u8; 32]),
            "caseId": "A-1042",
            "uploadedAt": "2024-06-01T12:00:00Z",
        }));

        assert!(payload.is_ok());
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = EncryptedPayload::from_json(b"{not json").unwrap_err();
        assert!(matches!(err, DecryptError::MalformedPayload(_)));
    }

    #[test]
    fn test_rejects_missing_nonce() {
        expect_malformed(
            json!({
                "encryptedData": b64(&[2u8; 48]),
                "senderPublicKey": b64(&[3u8; 32]),
            }),
            "nonce",
        );
    }

    #[test]
    fn test_rejects_missing_encrypted_data() {
        expect_malformed(
            json!({
                "nonce": b64(&[1u8; 24]),
                "senderPublicKey": b64(&[3u8; 32]),
            }),
            "encryptedData",
        );
    }

    #[test]
    fn test_rejects_both_key_fields() {
        expect_malformed(
            json!({
                "nonce": b64(&[1u8; 24]),
                "encryptedData": b64(&[2u8; 48]),
                "senderPublicKey": b64(&[3u8; 32]),
                "encryptedKey": b64(&[4u8; 48]),
            }),
            "both",
        );
    }

    #[test]
    fn test_rejects_neither_key_field() {
        expect_malformed(
            json!({
                "nonce": b64(&[1u8; 24]),
                "encryptedData": b64(&[2u8; 48]),
            }),
            "neither",
        );
    }

    #[test]
    fn test_rejects_non_base64_field() {
        expect_malformed(
            json!({
                "nonce": "***not base64***",
                "encryptedData": b64(&[2u8; 48]),
                "senderPublicKey": b64(&[3u8; 32]),
            }),
            "nonce",
        );
    }

    #[test]
    fn test_rejects_wrong_nonce_length() {
        expect_malformed(
            json!({
                "nonce": b64(&[1u8; 12]),
                "encryptedData": b64(&[2u8; 48]),
                "senderPublicKey": b64(&[3u8; 32]),
            }),
            "24 bytes",
        );
    }

    #[test]
    fn test_rejects_wrong_sender_key_length() {
        expect_malformed(
            json!({
                "nonce": b64(&[1u8; 24]),
                "encryptedData": b64(&[2u8; 48]),
                "senderPublicKey": b64(&[3u8; 16]),
            }),
            "32 bytes",
        );
    }

    #[test]
    fn test_rejects_ciphertext_shorter_than_tag() {
        expect_malformed(
            json!({
                "nonce": b64(&[1u8; 24]),
                "encryptedData": b64(&[2u8; 15]),
                "senderPublicKey": b64(&[3u8; 32]),
            }),
            "encryptedData",
        );
    }

    #[test]
    fn test_rejects_wrapped_key_shorter_than_tag() {
        expect_malformed(
            json!({
                "nonce": b64(&[1u8; 24]),
                "encryptedData": b64(&[2u8; 48]),
                "encryptedKey": b64(&[4u8; 15]),
            }),
            "encryptedKey",
        );
    }

    #[test]
    fn test_tag_sized_ciphertext_is_accepted() {
        // An empty plaintext encrypts to exactly the 16-byte tag.
        let payload = parse(json!({
            "nonce": b64(&[1u8; 24]),
            "encryptedData": b64(&[2u8; 16]),
            "senderPublicKey": b64(&[3u8; 32]),
        }));

        assert!(payload.is_ok());
    }
}
