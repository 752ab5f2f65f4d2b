//! Asymmetric encryption using RSA with PKCS#1 v1.5 padding.
//!
//! The only payload this crate encrypts is a single identifier string
//! (36 bytes), well under the 245-byte PKCS#1 v1.5 limit for a 2048-bit
//! modulus, so no hybrid scheme is needed.

use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};

use crate::error::{Error, Result};

/// Encrypt plaintext with the public key using PKCS#1 v1.5 padding.
pub fn encrypt(public: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    public
        .encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, plaintext)
        .map_err(|e| Error::EncryptionFailed(format!("rsa encrypt: {e}")))
}

/// Decrypt ciphertext with the private key using PKCS#1 v1.5 padding.
pub fn decrypt(private: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    private
        .decrypt(Pkcs1v15Encrypt, ciphertext)
        .map_err(|e| Error::DecryptionFailed(format!("rsa decrypt: {e}")))
}
