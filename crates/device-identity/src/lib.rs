//! DeviceIdentity — stable per-installation identifier, encrypted at rest.
//!
//! On first run a random 128-bit identifier is generated, encrypted under an
//! RSA key pair held by a key facility, and persisted as ciphertext only.
//! Later runs decrypt the stored blob and return the same identifier. If the
//! facility or the stored value is unusable, the caller still receives an
//! identifier — a fresh one per call, never persisted — trading stability
//! for availability.

pub mod crypto;
pub mod error;
pub mod identity;
pub mod keystore;
pub mod storage;
pub mod time;

// Re-export primary types
pub use error::{Error, Result};
pub use identity::{IdentityConfig, IdentityStore};
pub use keystore::{
    KeyFacility, KeyManager, KeyPairHandle, KeyPurpose, KeySpec, SoftwareKeyFacility,
};
pub use storage::{DurableStore, FileStore, MemoryStore};
