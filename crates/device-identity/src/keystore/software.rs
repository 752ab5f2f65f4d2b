//! Software-backed key facility — RSA key pairs in owner-only files.
//!
//! Each alias is stored as a versioned JSON file:
//!
//! ```json
//! {
//!     "version": 1,
//!     "format": "rsa-keypair-v1",
//!     "spec": { ... KeySpec ... },
//!     "created_at": 1722950000000000,
//!     "public_key": "<base64 SPKI DER>",
//!     "private_key": "<base64 PKCS#8 DER>"
//! }
//! ```
//!
//! Files are written atomically (sibling temp file, then rename) and given
//! owner-only permissions on Unix. The private key is extractable by anything
//! that can read the key directory; platforms with a hardware keystore should
//! substitute their own [`KeyFacility`] implementation instead.

use std::path::{Path, PathBuf};

use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::crypto::keys;
use crate::error::{Error, Result};
use crate::keystore::{KeyFacility, KeySpec, PaddingScheme};

// ── File format constants ─────────────────────────────────────────────────────

const KEY_FILE_VERSION: u32 = 1;
const KEY_FILE_FORMAT: &str = "rsa-keypair-v1";

/// Modulus sizes this facility will generate.
const MIN_MODULUS_BITS: usize = 2048;
const MAX_MODULUS_BITS: usize = 4096;

// ── On-disk structure ─────────────────────────────────────────────────────────

/// Top-level structure written to disk for each alias.
#[derive(Debug, Serialize, Deserialize)]
struct KeyFile {
    /// Format version number.
    version: u32,
    /// Format identifier string.
    format: String,
    /// The generation request the key pair was created with.
    spec: KeySpec,
    /// Creation timestamp (microseconds since Unix epoch).
    created_at: u64,
    /// Base64-encoded SPKI DER public key.
    public_key: String,
    /// Base64-encoded PKCS#8 DER private key.
    private_key: String,
}

// ── SoftwareKeyFacility ───────────────────────────────────────────────────────

/// Filesystem-backed [`KeyFacility`] with one key file per alias.
///
/// Safe for single-process use; concurrent generation of the same alias from
/// multiple processes is not coordinated.
pub struct SoftwareKeyFacility {
    base_dir: PathBuf,
}

impl SoftwareKeyFacility {
    /// Create a new `SoftwareKeyFacility` rooted at `base_dir`.
    ///
    /// The directory and any missing parents are created if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the directory cannot be created.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn key_path(&self, alias: &str) -> PathBuf {
        self.base_dir.join(format!("{alias}.json"))
    }

    fn read_key_file(&self, alias: &str) -> Result<KeyFile> {
        validate_alias(alias)?;
        let path = self.key_path(alias);
        if !path.exists() {
            return Err(Error::KeyNotFound(alias.to_string()));
        }
        let bytes = std::fs::read(&path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::InvalidFileFormat(format!("key file for {alias}: {e}")))
    }
}

impl KeyFacility for SoftwareKeyFacility {
    fn exists(&self, alias: &str) -> Result<bool> {
        validate_alias(alias)?;
        Ok(self.key_path(alias).exists())
    }

    fn generate(&self, alias: &str, spec: &KeySpec) -> Result<()> {
        validate_alias(alias)?;
        if self.key_path(alias).exists() {
            return Err(Error::KeyFacility(format!(
                "alias already occupied: {alias}"
            )));
        }
        if spec.padding != PaddingScheme::Pkcs1V15 {
            return Err(Error::KeyFacility("unsupported padding scheme".to_string()));
        }
        if !(MIN_MODULUS_BITS..=MAX_MODULUS_BITS).contains(&spec.modulus_bits) {
            return Err(Error::KeyFacility(format!(
                "unsupported modulus size: {} bits",
                spec.modulus_bits,
            )));
        }

        let (private, public) = keys::generate_key_pair(spec.modulus_bits)?;

        let mut private_der = keys::private_key_to_der(&private)?;
        let private_b64 =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &private_der);
        private_der.zeroize();

        let key_file = KeyFile {
            version: KEY_FILE_VERSION,
            format: KEY_FILE_FORMAT.to_string(),
            spec: spec.clone(),
            created_at: crate::time::now_micros(),
            public_key: base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                keys::public_key_to_der(&public)?,
            ),
            private_key: private_b64,
        };

        let json = serde_json::to_string_pretty(&key_file)
            .map_err(|e| Error::SerializationError(e.to_string()))?;

        write_atomic(&self.key_path(alias), json.as_bytes())?;

        Ok(())
    }

    fn public_key(&self, alias: &str) -> Result<RsaPublicKey> {
        let key_file = self.read_key_file(alias)?;
        let der = base64::Engine::decode(
            &base64::engine::general_purpose::STANDARD,
            &key_file.public_key,
        )
        .map_err(|e| Error::InvalidFileFormat(format!("public key base64: {e}")))?;
        keys::public_key_from_der(&der)
    }

    fn private_key(&self, alias: &str) -> Result<RsaPrivateKey> {
        let key_file = self.read_key_file(alias)?;
        let mut der = base64::Engine::decode(
            &base64::engine::general_purpose::STANDARD,
            &key_file.private_key,
        )
        .map_err(|e| Error::InvalidFileFormat(format!("private key base64: {e}")))?;
        let private = keys::private_key_from_der(&der);
        der.zeroize();
        private
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Aliases name files on disk; restrict them to a filename-safe charset.
fn validate_alias(alias: &str) -> Result<()> {
    let ok = !alias.is_empty()
        && alias
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !ok {
        return Err(Error::KeyFacility(format!("invalid alias: {alias:?}")));
    }
    Ok(())
}

/// Write `data` to `path` atomically using a sibling temporary file.
///
/// The key file must never be visible half-written: a crash mid-write would
/// otherwise leave an alias that exists but cannot be loaded.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
