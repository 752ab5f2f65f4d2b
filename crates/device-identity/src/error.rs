//! Error types for DeviceIdentity.
//!
//! All errors are strongly typed and propagated without panicking.
//! Private key material is never included in error messages.

/// Device identity error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Key facility error: {0}")]
    KeyFacility(String),

    #[error("No key pair under alias: {0}")]
    KeyNotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
