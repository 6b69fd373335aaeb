//! # Error Handling
//!
//! Error types for payload decryption.
//!
//! ## Error Taxonomy
//!
//! ```text
//! DecryptError
//! │
//! ├── Structural (fix the input format)
//! │   ├── InvalidKeyLength      - key material is not 32 bytes
//! │   └── MalformedPayload      - missing/conflicting fields, bad base64,
//! │                               wrong fixed-length field
//! │
//! └── Cryptographic (verify the key/payload pairing)
//!     ├── KeyUnwrapFailed       - wrapped symmetric key failed authentication
//!     └── AuthenticationFailed  - ciphertext failed authentication
//! ```
//!
//! The two halves imply different remediation: structural errors mean the
//! payload or key text itself is broken, cryptographic errors mean the
//! inputs are well-formed but do not belong together (wrong key, tampered
//! ciphertext). Callers that branch on this distinction can use
//! [`DecryptError::is_structural`].

use thiserror::Error;

/// Result type alias for payload decryption operations
pub type Result<T> = std::result::Result<T, DecryptError>;

/// Main error type for payload decryption
///
/// Every failure is terminal for the call: nothing is retried internally,
/// and no partial plaintext is ever released alongside an error.
#[derive(Error, Debug)]
pub enum DecryptError {
    /// Private key material has the wrong length
    ///
    /// Raised before any cryptographic operation is attempted.
    #[error("Invalid private key length: expected 32 bytes, got {got}")]
    InvalidKeyLength {
        /// Number of bytes actually supplied
        got: usize,
    },

    /// The payload (or key text) is structurally invalid
    ///
    /// Covers missing required fields, payloads declaring both or neither
    /// decryption mode, undecodable base64, wrong fixed-length fields, and
    /// ciphertext too short to carry an authentication tag.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Wrapped-mode symmetric key recovery failed
    ///
    /// The authentication tag on `encryptedKey` did not verify, or the
    /// unwrapped value was not a 32-byte key.
    #[error("Failed to unwrap the symmetric key: wrong key or corrupted payload")]
    KeyUnwrapFailed,

    /// Ciphertext failed authentication
    ///
    /// The integrity boundary: on tag mismatch no plaintext, partial or
    /// otherwise, is returned.
    #[error("Decryption failed: authentication tag mismatch")]
    AuthenticationFailed,
}

impl DecryptError {
    /// Short stable label for the error kind (for diagnostics and logs)
    pub fn kind(&self) -> &'static str {
        match self {
            DecryptError::InvalidKeyLength { .. } => "invalid-key-length",
            DecryptError::MalformedPayload(_) => "malformed-payload",
            DecryptError::KeyUnwrapFailed => "key-unwrap-failed",
            DecryptError::AuthenticationFailed => "authentication-failed",
        }
    }

    /// Check if this error is structural
    ///
    /// Structural errors are fixed by correcting the payload or key
    /// format; the remaining errors are fixed by supplying the right key
    /// for the right payload.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DecryptError::InvalidKeyLength { .. } | DecryptError::MalformedPayload(_)
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(DecryptError::InvalidKeyLength { got: 31 }.kind(), "invalid-key-length");
        assert_eq!(DecryptError::MalformedPayload("x".into()).kind(), "malformed-payload");
        assert_eq!(DecryptError::KeyUnwrapFailed.kind(), "key-unwrap-failed");
        assert_eq!(DecryptError::AuthenticationFailed.kind(), "authentication-failed");
    }

    #[test]
    fn test_structural_split() {
        assert!(DecryptError::InvalidKeyLength { got: 0 }.is_structural());
        assert!(DecryptError::MalformedPayload("missing nonce".into()).is_structural());
        assert!(!DecryptError::KeyUnwrapFailed.is_structural());
        assert!(!DecryptError::AuthenticationFailed.is_structural());
    }

    #[test]
    fn test_display_names_the_length() {
        let msg = DecryptError::InvalidKeyLength { got: 16 }.to_string();
        assert!(msg.contains("expected 32"));
        assert!(msg.contains("16"));
    }
}
