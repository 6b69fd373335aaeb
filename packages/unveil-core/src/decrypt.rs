//! # Decryption Engine
//!
//! The single entry point that turns a validated payload plus a recipient
//! key into plaintext, routing on the payload's mode.
//!
//! ## Decryption Flows
//!
//! ```text
//! Sealed mode
//! ───────────
//!   encryptedData ──▶ box open (senderPublicKey × recipient secret) ──▶ plaintext
//!
//! Wrapped mode
//! ────────────
//!   encryptedKey  ──▶ box open (recipient public × recipient secret) ──▶ K (32 bytes)
//!   encryptedData ──▶ secretbox open under K ──────────────────────────▶ plaintext
//!
//!   Both steps reuse the payload's single 24-byte nonce.
//! ```
//!
//! ## Error Mapping
//!
//! Failures report the stage that broke, never just "decryption failed":
//!
//! - sealed box open fails → [`DecryptError::AuthenticationFailed`]
//! - key unwrap fails, or the unwrapped key is not 32 bytes →
//!   [`DecryptError::KeyUnwrapFailed`]
//! - secretbox open fails → [`DecryptError::AuthenticationFailed`]
//!
//! The unwrapped symmetric key lives in a scrubbed buffer and is wiped as
//! soon as the content cipher has been constructed.

use crypto_box::{aead::Aead, PublicKey, SalsaBox};
use crypto_secretbox::aead::KeyInit;
use crypto_secretbox::{Key, XSalsa20Poly1305};
use zeroize::Zeroizing;

use crate::error::{DecryptError, Result};
use crate::keys::{RecipientKey, PUBLIC_KEY_SIZE};
use crate::media::MediaType;
use crate::payload::{EncryptedPayload, PayloadMode};

/// Size of the symmetric content key carried by wrapped payloads, in bytes
pub const SYMMETRIC_KEY_SIZE: usize = 32;

/// Result of a successful decryption
#[derive(Debug)]
pub struct DecryptedArtifact {
    /// The recovered plaintext bytes
    pub plaintext: Vec<u8>,
    /// Media type sniffed from the plaintext's leading bytes
    pub media_type: MediaType,
}

/// Decrypt a validated payload with the recipient's key
///
/// Routes on [`EncryptedPayload::mode`], opens the ciphertext, and sniffs
/// the plaintext's media type. The mode was fixed at parse time; nothing
/// here re-inspects the wire fields.
///
/// ## Errors
///
/// - [`DecryptError::KeyUnwrapFailed`] if a wrapped payload's symmetric key
///   cannot be recovered
/// - [`DecryptError::AuthenticationFailed`] if the content ciphertext does
///   not authenticate under the established key
pub fn decrypt(key: &RecipientKey, payload: &EncryptedPayload) -> Result<DecryptedArtifact> {
    let plaintext = match payload.mode() {
        PayloadMode::Sealed { sender_public_key } => open_sealed(key, sender_public_key, payload)?,
        PayloadMode::Wrapped { encrypted_key } => open_wrapped(key, encrypted_key, payload)?,
    };

    let media_type = MediaType::detect(&plaintext);
    tracing::debug!(
        mode = payload.mode().name(),
        media = %media_type,
        bytes = plaintext.len(),
        "payload decrypted"
    );

    Ok(DecryptedArtifact { plaintext, media_type })
}

/// Parse a JSON payload and decrypt it in one call
///
/// Convenience wrapper over [`EncryptedPayload::from_json`] followed by
/// [`decrypt`], for callers that hold the raw payload bytes and do not need
/// the intermediate structure.
///
/// ## Errors
///
/// Everything [`EncryptedPayload::from_json`] and [`decrypt`] can return.
pub fn decrypt_payload(key: &RecipientKey, json: &[u8]) -> Result<DecryptedArtifact> {
    let payload = EncryptedPayload::from_json(json)?;
    decrypt(key, &payload)
}

/// Open a sealed payload: one box between the sender and the recipient
fn open_sealed(
    key: &RecipientKey,
    sender_public_key: &[u8; PUBLIC_KEY_SIZE],
    payload: &EncryptedPayload,
) -> Result<Vec<u8>> {
    let sender = PublicKey::from(*sender_public_key);
    let sealed_box = SalsaBox::new(&sender, key.secret());
    let nonce = crypto_box::Nonce::from(*payload.nonce());

    sealed_box
        .decrypt(&nonce, payload.encrypted_data())
        .map_err(|_| DecryptError::AuthenticationFailed)
}

/// Open a wrapped payload: unwrap the symmetric key, then open the content
fn open_wrapped(
    key: &RecipientKey,
    encrypted_key: &[u8],
    payload: &EncryptedPayload,
) -> Result<Vec<u8>> {
    // Step 1: recover the symmetric key from the recipient's self-box.
    let unwrap_box = SalsaBox::new(key.public(), key.secret());
    let nonce = crypto_box::Nonce::from(*payload.nonce());
    let symmetric_key = Zeroizing::new(
        unwrap_box
            .decrypt(&nonce, encrypted_key)
            .map_err(|_| DecryptError::KeyUnwrapFailed)?,
    );

    // An unwrapped key of the wrong size means the wrap step itself was
    // wrong, so it reports as an unwrap failure.
    if symmetric_key.len() != SYMMETRIC_KEY_SIZE {
        return Err(DecryptError::KeyUnwrapFailed);
    }

    // Step 2: open the content under the recovered key, same nonce.
    let cipher = XSalsa20Poly1305::new(Key::from_slice(&symmetric_key));
    let secretbox_nonce = crypto_secretbox::Nonce::from(*payload.nonce());

    cipher
        .decrypt(&secretbox_nonce, payload.encrypted_data())
        .map_err(|_| DecryptError::AuthenticationFailed)
}

// ============================================================================
// TESTS
// ============================================================================
