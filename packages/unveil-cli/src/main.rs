//! Unveil CLI
//!
//! A thin command-line wrapper around `unveil-core` that:
//!
//! 1. **Reads** a JSON payload file and a base64-encoded recipient key,
//!    taken from a flag or the `ENCRYPTION_PRIVATE_KEY` environment variable.
//!
//! 2. **Decrypts** the payload in whichever mode it declares, sealed or
//!    wrapped, through the library's single entry point.
//!
//! 3. **Writes** the plaintext to the chosen output base path, appending an
//!    extension that matches the sniffed media type.
//!
//! On success the written path goes to stdout and the process exits 0. Any
//! failure prints a categorized error to stderr and exits 1.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use unveil_core::{decrypt, DecryptError, EncryptedPayload, MediaType, RecipientKey};

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "unveil", version, about = "Decrypt an encrypted evidence payload")]
struct Args {
    /// Path to the JSON payload file
    payload: PathBuf,

    /// Base64-encoded recipient private key (a "b64:" prefix is accepted)
    #[arg(short, long, env = "ENCRYPTION_PRIVATE_KEY", hide_env_values = true)]
    key: String,

    /// Output base path; the sniffed media extension is appended
    #[arg(short, long, default_value = "decrypted-evidence")]
    output: PathBuf,
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Failures the wrapper adds around the core pipeline
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// The payload file could not be read
    #[error("failed to read payload from {}: {source}", .path.display())]
    ReadPayload {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The decrypted output could not be written
    #[error("failed to write output to {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Anything the core library reports
    #[error(transparent)]
    Decrypt(#[from] DecryptError),
}

impl CliError {
    /// Stable category label for stderr output
    fn kind(&self) -> &'static str {
        match self {
            CliError::ReadPayload { .. } | CliError::WriteOutput { .. } => "io",
            CliError::Decrypt(e) => e.kind(),
        }
    }
}

// ── Entry Point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unveil=info,unveil_core=info".into()),
        )
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(written) => {
            println!("{}", written.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error [{}]: {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run the full decrypt pipeline, returning the written output path
fn run(args: &Args) -> Result<PathBuf, CliError> {
    let key = RecipientKey::from_base64(&args.key)?;

    let payload_bytes = fs::read(&args.payload).map_err(|source| CliError::ReadPayload {
        path: args.payload.clone(),
        source,
    })?;

    let payload = EncryptedPayload::from_json(&payload_bytes)?;
    tracing::info!(
        mode = payload.mode().name(),
        recipient = %key.fingerprint(),
        "decrypting payload"
    );

    let artifact = decrypt(&key, &payload)?;
    tracing::info!(
        media = %artifact.media_type,
        bytes = artifact.plaintext.len(),
        "payload decrypted"
    );

    write_artifact(&args.output, &artifact.plaintext, artifact.media_type)
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Compose the final output path: the base with the media extension appended
///
/// The extension is always appended, never substituted, so an explicit
/// `--output report.v2` becomes `report.v2.png` rather than `report.png`.
fn output_path(base: &Path, media_type: MediaType) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{}", media_type.extension()));
    PathBuf::from(name)
}

/// Write the plaintext to its final path
fn write_artifact(
    base: &Path,
    plaintext: &[u8],
    media_type: MediaType,
) -> Result<PathBuf, CliError> {
    let file_path = output_path(base, media_type);

    // Write file (atomic: write to .tmp, then rename)
    let tmp_path = file_path.with_extension(format!("{}.tmp", media_type.extension()));
    fs::write(&tmp_path, plaintext).map_err(|source| CliError::WriteOutput {
        path: tmp_path.clone(),
        source,
    })?;

    if let Err(source) = fs::rename(&tmp_path, &file_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(CliError::WriteOutput {
            path: file_path,
            source,
        });
    }

    tracing::debug!(path = %file_path.display(), bytes = plaintext.len(), "wrote artifact");
    Ok(file_path)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_output_path_appends_extension() {
        assert_eq!(
            output_path(Path::new("decrypted-evidence"), MediaType::Png),
            PathBuf::from("decrypted-evidence.png")
        );
        assert_eq!(
            output_path(Path::new("out/evidence.v2"), MediaType::Jpeg),
            PathBuf::from("out/evidence.v2.jpg")
        );
        assert_eq!(
            output_path(Path::new("artifact"), MediaType::Unknown),
            PathBuf::from("artifact.bin")
        );
    }

    #[test]
    fn test_write_artifact_places_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("artifact");

        let written = write_artifact(&base, b"payload bytes", MediaType::Unknown).unwrap();

        assert_eq!(written, dir.path().join("artifact.bin"));
        assert_eq!(fs::read(&written).unwrap(), b"payload bytes");

        // Only the final file remains, no stray temp sibling.
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("artifact.bin")]);
    }

    #[test]
    fn test_write_artifact_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("missing").join("artifact");

        let err = write_artifact(&base, b"data", MediaType::Png).unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_run_rejects_bad_key_before_touching_the_payload() {
        let dir = tempfile::tempdir().unwrap();
        let payload_path = dir.path().join("payload.json");
        fs::write(&payload_path, b"{}").unwrap();

        let args = Args {
            payload: payload_path,
            key: "***".into(),
            output: dir.path().join("out"),
        };

        let err = run(&args).unwrap_err();
        assert_eq!(err.kind(), "malformed-payload");
    }

    #[test]
    fn test_run_reports_missing_payload_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            payload: dir.path().join("does-not-exist.json"),
            key: format!("{}=", "A".repeat(43)), // all-zero 32-byte key
            output: dir.path().join("out"),
        };

        let err = run(&args).unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_error_kind_passthrough() {
        let err = CliError::from(DecryptError::AuthenticationFailed);
        assert_eq!(err.kind(), "authentication-failed");
    }
}
