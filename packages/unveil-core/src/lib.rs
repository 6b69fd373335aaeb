//! # Unveil Core
//!
//! A library for decrypting NaCl-style encrypted evidence payloads with an
//! explicitly supplied recipient key.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         DECRYPTION PIPELINE                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   JSON payload bytes            base64 private key                      │
//! │         │                               │                               │
//! │         ▼                               ▼                               │
//! │  ┌──────────────┐               ┌──────────────┐                        │
//! │  │   payload    │               │     keys     │                        │
//! │  │              │               │              │                        │
//! │  │ - parse JSON │               │ - decode b64 │                        │
//! │  │ - validate   │               │ - check size │                        │
//! │  │ - fix mode   │               │ - derive pub │                        │
//! │  └──────┬───────┘               └──────┬───────┘                        │
//! │         │                              │                                │
//! │         └───────────┬──────────────────┘                                │
//! │                     ▼                                                   │
//! │              ┌──────────────┐                                           │
//! │              │   decrypt    │                                           │
//! │              │              │                                           │
//! │              │ sealed: box  │   sender key × recipient secret           │
//! │              │ wrapped: box │   unwrap key, then secretbox open         │
//! │              └──────┬───────┘                                           │
//! │                     ▼                                                   │
//! │              ┌──────────────┐                                           │
//! │              │    media     │   sniff magic bytes (jpeg / png)          │
//! │              └──────┬───────┘                                           │
//! │                     ▼                                                   │
//! │            DecryptedArtifact                                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error taxonomy for the entire library
//! - [`keys`] - Recipient key parsing and public key derivation
//! - [`payload`] - Wire format parsing and structural validation
//! - [`decrypt`] - The decryption engine (sealed and wrapped modes)
//! - [`media`] - Magic-byte media type sniffing
//!
//! ## Security Model
//!
//! - Key material is supplied explicitly by the caller; the library never
//!   reads the environment or any keystore.
//! - Private keys and unwrapped symmetric keys are zeroized when dropped.
//! - Structural validation happens entirely before any cryptographic
//!   operation, and structural failures are distinguishable from
//!   authentication failures in the error type.
//!
//! ## Example
//!
//! ```ignore
//! use unveil_core::{decrypt_payload, RecipientKey};
//!
//! let key = RecipientKey::from_base64("b64:...")?;
//! let artifact = decrypt_payload(&key, &payload_bytes)?;
//! println!("{} bytes of {}", artifact.plaintext.len(), artifact.media_type);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod decrypt;
pub mod error;
pub mod keys;
pub mod media;
pub mod payload;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use decrypt::{decrypt, decrypt_payload, DecryptedArtifact, SYMMETRIC_KEY_SIZE};
pub use error::{DecryptError, Result};
pub use keys::{RecipientKey, KEY_PREFIX, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
pub use media::MediaType;
pub use payload::{EncryptedPayload, PayloadMode, NONCE_SIZE, TAG_SIZE};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of Unveil Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
