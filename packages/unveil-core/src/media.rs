//! # Media Detection
//!
//! Best-effort media type sniffing over decrypted bytes.
//!
//! Only the leading magic bytes are consulted; nothing here validates that
//! the rest of the file is a well-formed image. Unrecognized content is
//! reported as [`MediaType::Unknown`], never an error.

use std::fmt;

/// JPEG SOI marker plus the first marker byte
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Full 8-byte PNG signature
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Media type detected from a decrypted payload's leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// JPEG image (`FF D8 FF` prefix)
    Jpeg,
    /// PNG image (8-byte PNG signature)
    Png,
    /// Anything else, including content too short to classify
    Unknown,
}

impl MediaType {
    /// Sniff the media type from leading magic bytes
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&JPEG_MAGIC) {
            MediaType::Jpeg
        } else if bytes.starts_with(&PNG_MAGIC) {
            MediaType::Png
        } else {
            MediaType::Unknown
        }
    }

    /// File extension conventionally used for this media type
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "jpg",
            MediaType::Png => "png",
            MediaType::Unknown => "bin",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaType::Jpeg => "jpeg",
            MediaType::Png => "png",
            MediaType::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// TESTS
// ============================================================================
