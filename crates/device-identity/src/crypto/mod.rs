//! Cryptographic primitives for DeviceIdentity.
//!
//! This module provides:
//! - RSA key pair generation and DER serialization
//! - RSA PKCS#1 v1.5 encryption and decryption of small payloads
//! - Public key fingerprinting
//! - Cryptographically secure random number generation

pub mod encryption;
pub mod keys;
pub mod random;
