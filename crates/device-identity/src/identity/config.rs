//! Configuration for the identity store.
//!
//! The key alias and the durable slot address are explicit configuration
//! rather than crate-level constants, so independent instances can coexist
//! (tests, multiple profiles on one machine).

/// Names addressing the identifier's key pair and durable slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Alias of the RSA key pair inside the key facility.
    pub key_alias: String,
    /// Namespace of the durable slot.
    pub namespace: String,
    /// Key of the durable slot holding the encrypted identifier.
    pub slot_key: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            key_alias: "device-id-key".to_string(),
            namespace: "device_info".to_string(),
            slot_key: "encrypted_uuid".to_string(),
        }
    }
}
