//! Key pair lifecycle over a key facility.
//!
//! A `KeyManager` owns exactly one alias. It guarantees a key pair exists
//! under that alias before encryption and resolves the current material for
//! decryption. Generation parameters are [`KeySpec::default`].

use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::crypto::{encryption, keys};
use crate::error::Result;
use crate::keystore::{KeyFacility, KeySpec};

/// Resolved key material for a managed alias.
///
/// The private half stays inside the handle and is only used through
/// [`KeyPairHandle::decrypt`]; it is never logged or serialized by this crate.
pub struct KeyPairHandle {
    public: RsaPublicKey,
    private: RsaPrivateKey,
}

impl KeyPairHandle {
    /// Return the public key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Short fingerprint of the public half. Safe to log.
    pub fn fingerprint(&self) -> Result<String> {
        keys::fingerprint(&self.public)
    }

    /// Encrypt a small payload under the public key (PKCS#1 v1.5).
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        encryption::encrypt(&self.public, plaintext)
    }

    /// Decrypt a payload with the private key (PKCS#1 v1.5).
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        encryption::decrypt(&self.private, ciphertext)
    }
}

/// Owns the lifecycle of one aliased asymmetric key pair inside a facility.
pub struct KeyManager<F> {
    facility: F,
    alias: String,
}

impl<F: KeyFacility> KeyManager<F> {
    /// Create a manager for `alias` over `facility`.
    pub fn new(facility: F, alias: impl Into<String>) -> Self {
        Self {
            facility,
            alias: alias.into(),
        }
    }

    /// Return the managed alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Ensure a key pair exists under the managed alias.
    ///
    /// Idempotent: when the alias is already occupied this is a no-op and the
    /// existing key pair is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyFacility` if the facility rejects the existence
    /// check or the generation request.
    pub fn ensure_key_exists(&self) -> Result<()> {
        if self.facility.exists(&self.alias)? {
            return Ok(());
        }
        log::debug!("provisioning key pair under alias {}", self.alias);
        self.facility.generate(&self.alias, &KeySpec::default())
    }

    /// Resolve the current key material for the managed alias.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyNotFound` if no key pair exists under the alias
    /// (callers must `ensure_key_exists` first, or the facility's storage
    /// has been corrupted).
    pub fn key_pair(&self) -> Result<KeyPairHandle> {
        let public = self.facility.public_key(&self.alias)?;
        let private = self.facility.private_key(&self.alias)?;
        Ok(KeyPairHandle { public, private })
    }
}
