//! # Key Handling
//!
//! Recipient key material for payload decryption.
//!
//! ## Key Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  RecipientKey                                                   │
//! │  ────────────                                                   │
//! │                                                                 │
//! │  Private key: 32-byte Curve25519 secret scalar                  │
//! │    • supplied by the caller, base64 or raw bytes                │
//! │    • scrubbed from memory on drop                               │
//! │                                                                 │
//! │  Public key: 32 bytes, derived from the private key             │
//! │    • pairs with an explicit sender key in sealed mode           │
//! │    • pairs with itself in wrapped (key-unwrap) mode             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The key exists only for the duration of one decryption call chain and
//! is owned exclusively by the caller; nothing in this crate persists it.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use crypto_box::{PublicKey, SecretKey};

use crate::error::{DecryptError, Result};

/// Size of a Curve25519 private key in bytes (256 bits)
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of a Curve25519 public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Optional marker prefix for base64-encoded key material
///
/// Key text may carry this literal prefix to disambiguate its encoding;
/// [`RecipientKey::from_base64`] strips it when present.
pub const KEY_PREFIX: &str = "b64:";

/// The recipient's Curve25519 keypair for payload decryption
///
/// Holds the private scalar together with its derived public key. The
/// underlying secret zeroizes itself on drop.
pub struct RecipientKey {
    /// Private decryption key (secret)
    secret: SecretKey,
    /// Public key (derived from the secret)
    public: PublicKey,
}

impl RecipientKey {
    /// Create from raw private key bytes
    ///
    /// ## Errors
    ///
    /// Returns [`DecryptError::InvalidKeyLength`] unless `bytes` is exactly
    /// 32 bytes. No cryptographic operation happens on the failure path.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; PRIVATE_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| DecryptError::InvalidKeyLength { got: bytes.len() })?;

        let secret = SecretKey::from(bytes);
        let public = secret.public_key();
        Ok(Self { secret, public })
    }

    /// Parse base64-encoded private key text
    ///
    /// Accepts standard-alphabet, padded base64. A literal `b64:` prefix is
    /// tolerated and stripped, so both historical spellings of key material
    /// are valid:
    ///
    /// ```text
    /// from_base64("b64:SGVsbG8…")   ← prefixed
    /// from_base64("SGVsbG8…")       ← bare
    /// ```
    ///
    /// ## Errors
    ///
    /// - [`DecryptError::MalformedPayload`] if the text is not valid base64
    /// - [`DecryptError::InvalidKeyLength`] if it decodes to anything other
    ///   than 32 bytes
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let trimmed = encoded.trim();
        let bare = trimmed.strip_prefix(KEY_PREFIX).unwrap_or(trimmed);

        let bytes = BASE64
            .decode(bare)
            .map_err(|e| DecryptError::MalformedPayload(format!("private key is not valid base64: {e}")))?;

        Self::from_bytes(&bytes)
    }

    /// Get the derived public key bytes
    pub fn public_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        *self.public.as_bytes()
    }

    /// Short hex fingerprint of the public key, safe to log
    ///
    /// Never log the private key; this is the identifier to use in
    /// diagnostics instead.
    pub fn fingerprint(&self) -> String {
        hex::encode(&self.public.as_bytes()[..8])
    }

    /// Get the secret half for box construction
    pub(crate) fn secret(&self) -> &SecretKey {
        &self.secret
    }

    /// Get the derived public half for box construction
    pub(crate) fn public(&self) -> &PublicKey {
        &self.public
    }
}

// ============================================================================
// TESTS
// ============================================================================
