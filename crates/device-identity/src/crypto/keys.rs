//! RSA key pair generation, DER serialization, and fingerprinting.
//!
//! Key pairs are generated for encrypt/decrypt use with PKCS#1 v1.5 padding;
//! see [`crate::crypto::encryption`] for the cipher operations.

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Default RSA modulus size in bits for generated key pairs.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Generate a new RSA key pair with the given modulus size.
pub fn generate_key_pair(bits: usize) -> Result<(RsaPrivateKey, RsaPublicKey)> {
    let private = RsaPrivateKey::new(&mut rand::thread_rng(), bits)
        .map_err(|e| Error::KeyFacility(format!("key generation: {e}")))?;
    let public = RsaPublicKey::from(&private);
    Ok((private, public))
}

/// Serialize a private key to PKCS#8 DER bytes.
///
/// The returned buffer holds key material; callers must zeroize it after use.
pub fn private_key_to_der(private: &RsaPrivateKey) -> Result<Vec<u8>> {
    let doc = private
        .to_pkcs8_der()
        .map_err(|e| Error::SerializationError(format!("private key der: {e}")))?;
    Ok(doc.as_bytes().to_vec())
}

/// Reconstruct a private key from PKCS#8 DER bytes.
pub fn private_key_from_der(der: &[u8]) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_der(der)
        .map_err(|e| Error::InvalidFileFormat(format!("private key der: {e}")))
}

/// Serialize a public key to SPKI DER bytes.
pub fn public_key_to_der(public: &RsaPublicKey) -> Result<Vec<u8>> {
    let doc = public
        .to_public_key_der()
        .map_err(|e| Error::SerializationError(format!("public key der: {e}")))?;
    Ok(doc.as_bytes().to_vec())
}

/// Reconstruct a public key from SPKI DER bytes.
pub fn public_key_from_der(der: &[u8]) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_der(der)
        .map_err(|e| Error::InvalidFileFormat(format!("public key der: {e}")))
}

/// Compute a short fingerprint of a public key.
///
/// Format: `rk_` + base58 of first 16 bytes of SHA-256(SPKI DER). Stable for
/// a given key, safe to log.
pub fn fingerprint(public: &RsaPublicKey) -> Result<String> {
    let der = public_key_to_der(public)?;
    let hash = Sha256::digest(&der);
    let truncated = &hash[..16];
    let encoded = bs58::encode(truncated).into_string();
    Ok(format!("rk_{encoded}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroize::Zeroize;

    #[test]
    fn test_generated_keys_distinct() {
        let (_, a) = generate_key_pair(DEFAULT_KEY_BITS).unwrap();
        let (_, b) = generate_key_pair(DEFAULT_KEY_BITS).unwrap();
        assert_ne!(
            public_key_to_der(&a).unwrap(),
            public_key_to_der(&b).unwrap()
        );
    }

    #[test]
    fn test_private_key_der_roundtrip() {
        let (private, public) = generate_key_pair(DEFAULT_KEY_BITS).unwrap();
        let mut der = private_key_to_der(&private).unwrap();
        let restored = private_key_from_der(&der).unwrap();
        der.zeroize();
        assert_eq!(RsaPublicKey::from(&restored), public);
    }

    #[test]
    fn test_public_key_der_roundtrip() {
        let (_, public) = generate_key_pair(DEFAULT_KEY_BITS).unwrap();
        let der = public_key_to_der(&public).unwrap();
        let restored = public_key_from_der(&der).unwrap();
        assert_eq!(public, restored);
    }

    #[test]
    fn test_fingerprint_stable_and_distinct() {
        let (_, a) = generate_key_pair(DEFAULT_KEY_BITS).unwrap();
        let (_, b) = generate_key_pair(DEFAULT_KEY_BITS).unwrap();
        let fp_a = fingerprint(&a).unwrap();
        assert!(fp_a.starts_with("rk_"));
        assert_eq!(fp_a, fingerprint(&a).unwrap());
        assert_ne!(fp_a, fingerprint(&b).unwrap());
    }

    #[test]
    fn test_invalid_der_rejected() {
        assert!(private_key_from_der(b"not a key").is_err());
        assert!(public_key_from_der(b"not a key").is_err());
    }
}
