//! Key facility abstraction and key pair lifecycle.
//!
//! The [`KeyFacility`] trait is the seam where a platform-secure key store
//! plugs in. Implementations should use hardware-backed storage where the
//! platform offers it:
//!
//! - Android: Android Keystore with hardware-backed keys
//! - iOS/macOS: Keychain Services
//! - Linux servers: an HSM or secrets service binding
//!
//! The implementation shipped in this crate, [`SoftwareKeyFacility`], keeps
//! key pairs in owner-only files and therefore offers weaker guarantees: the
//! private key is extractable by anything that can read the key directory.
//!
//! # Modules
//!
//! - [`manager`] — [`KeyManager`], lifecycle of one aliased key pair.
//! - [`software`] — [`SoftwareKeyFacility`], file-backed facility.

pub mod manager;
pub mod software;

pub use manager::{KeyManager, KeyPairHandle};
pub use software::SoftwareKeyFacility;

use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Intended usage of a generated key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPurpose {
    Encrypt,
    Decrypt,
}

/// Digest algorithms declared at key generation time.
///
/// Declared for facility compatibility only. The PKCS#1 v1.5 encryption path
/// does not hash the payload, so these are recorded with the key but never
/// used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    #[serde(rename = "sha-256")]
    Sha256,
    #[serde(rename = "sha-512")]
    Sha512,
}

/// Padding scheme a generated key pair is used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddingScheme {
    #[serde(rename = "pkcs1-v1.5")]
    Pkcs1V15,
}

/// Parameters for an asymmetric key pair generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    /// Operations the key pair will be used for.
    pub purposes: Vec<KeyPurpose>,
    /// Declared digest algorithms (facility metadata, non-semantic).
    pub digests: Vec<DigestAlgorithm>,
    /// Padding scheme for encryption operations.
    pub padding: PaddingScheme,
    /// RSA modulus size in bits.
    pub modulus_bits: usize,
}

impl Default for KeySpec {
    /// The configuration used for identifier encryption keys: RSA-2048,
    /// encrypt + decrypt, PKCS#1 v1.5 padding, SHA-256/SHA-512 declared.
    fn default() -> Self {
        Self {
            purposes: vec![KeyPurpose::Encrypt, KeyPurpose::Decrypt],
            digests: vec![DigestAlgorithm::Sha256, DigestAlgorithm::Sha512],
            padding: PaddingScheme::Pkcs1V15,
            modulus_bits: crate::crypto::keys::DEFAULT_KEY_BITS,
        }
    }
}

/// Capability interface over a secure key store, addressed by alias.
///
/// A facility owns named asymmetric key pairs. Key material is created and
/// resolved by alias; implementations must never log private key bytes.
pub trait KeyFacility: Send + Sync {
    /// Report whether a key pair exists under `alias`.
    fn exists(&self, alias: &str) -> Result<bool>;

    /// Generate a new key pair under `alias`.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyFacility` if the alias is already occupied or the
    /// requested spec is unsupported by this facility.
    fn generate(&self, alias: &str, spec: &KeySpec) -> Result<()>;

    /// Return the public key for `alias`.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` if no key pair exists under `alias`.
    fn public_key(&self, alias: &str) -> Result<RsaPublicKey>;

    /// Return the private key for `alias`.
    ///
    /// The returned handle is used only for facility-mediated decryption and
    /// must not be serialized or logged by callers.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` if no key pair exists under `alias`.
    fn private_key(&self, alias: &str) -> Result<RsaPrivateKey>;
}
