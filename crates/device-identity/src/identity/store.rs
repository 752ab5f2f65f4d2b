//! Identifier lifecycle — first-run generation, encrypted persistence,
//! retrieval, and fallback.
//!
//! The stored form is standard-Base64 RSA/PKCS#1v1.5 ciphertext of the UTF-8
//! bytes of a canonical UUID string. Retrieval is total: when the key
//! facility or the stored blob is unusable, the caller gets a fresh
//! identifier that is not persisted. A broken facility therefore costs
//! identifier stability, never availability; callers that see the
//! identifier change across calls should treat that as the failure signal.

use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::identity::IdentityConfig;
use crate::keystore::{KeyFacility, KeyManager};
use crate::storage::DurableStore;

/// Resolves the stable per-installation identifier.
///
/// One durable slot, one key alias, one instance per storage namespace.
pub struct IdentityStore<F, S> {
    keys: KeyManager<F>,
    store: S,
    config: IdentityConfig,
    /// Serializes the whole read-decrypt-or-generate-encrypt-write sequence,
    /// so two concurrent first runs cannot persist different identifiers.
    lock: Mutex<()>,
}

impl<F: KeyFacility, S: DurableStore> IdentityStore<F, S> {
    /// Create an identity store over `facility` and `store`.
    pub fn new(facility: F, store: S, config: IdentityConfig) -> Self {
        let keys = KeyManager::new(facility, config.key_alias.clone());
        Self {
            keys,
            store,
            config,
            lock: Mutex::new(()),
        }
    }

    /// Return the installation identifier.
    ///
    /// The first successful call generates a fresh identifier, encrypts it
    /// under the facility-held key pair, and persists the ciphertext; later
    /// calls decrypt the stored blob and return the same identifier.
    ///
    /// This function never fails: any error on the persisted path falls
    /// back to a freshly generated identifier that is not persisted. The
    /// slot is left exactly as it was, with no retry and no repair.
    pub fn persistent_identifier(&self) -> String {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        match self.load_or_create() {
            Ok(id) => id,
            Err(err) => {
                log::warn!(
                    "persistent identifier unavailable ({err}); \
                     returning session-scoped identifier"
                );
                new_identifier()
            }
        }
    }

    fn load_or_create(&self) -> Result<String> {
        match self.store.get(&self.config.namespace, &self.config.slot_key)? {
            Some(stored) => self.decrypt_stored(&stored),
            None => self.create_and_persist(),
        }
    }

    /// First run: generate, encrypt, persist, return the plaintext.
    fn create_and_persist(&self) -> Result<String> {
        let id = new_identifier();

        self.keys.ensure_key_exists()?;
        let key_pair = self.keys.key_pair()?;

        let ciphertext = key_pair.encrypt(id.as_bytes())?;
        let encoded =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, ciphertext);

        self.store
            .put(&self.config.namespace, &self.config.slot_key, &encoded)?;

        log::debug!(
            "installation identifier provisioned under alias {}",
            self.keys.alias()
        );
        Ok(id)
    }

    /// Later runs: decode, decrypt, return the plaintext.
    fn decrypt_stored(&self, stored: &str) -> Result<String> {
        let ciphertext =
            base64::Engine::decode(&base64::engine::general_purpose::STANDARD, stored)
                .map_err(|e| Error::Decode(format!("stored identifier base64: {e}")))?;

        let key_pair = self.keys.key_pair()?;
        let plaintext = key_pair.decrypt(&ciphertext)?;

        String::from_utf8(plaintext).map_err(|e| Error::Decode(format!("identifier utf-8: {e}")))
    }
}

/// Generate a fresh canonical identifier (random 128-bit UUID, hyphenated
/// lowercase form).
fn new_identifier() -> String {
    let bytes: [u8; 16] = crate::crypto::random::random_bytes();
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}
