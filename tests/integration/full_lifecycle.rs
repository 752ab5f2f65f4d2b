//! Integration test: full identifier lifecycle.
//!
//! Tests the complete lifecycle:
//! 1. Cold start provisions an identifier
//! 2. A restart (fresh components over the same directories) returns it again
//! 3. The stored blob decrypts to exactly the returned identifier
//! 4. Corruption and facility failure fall back without repairing the slot

use device_identity::{
    DurableStore, Error, FileStore, IdentityConfig, IdentityStore, KeyFacility, KeyManager,
    KeySpec, MemoryStore, SoftwareKeyFacility,
};
use uuid::Uuid;

fn open_identity(
    root: &std::path::Path,
) -> IdentityStore<SoftwareKeyFacility, FileStore> {
    IdentityStore::new(
        SoftwareKeyFacility::new(root.join("keys")).expect("open key facility"),
        FileStore::new(root.join("store")).expect("open durable store"),
        IdentityConfig::default(),
    )
}

#[test]
fn identifier_survives_restart() {
    let root = tempfile::tempdir().unwrap();
    let config = IdentityConfig::default();

    // ── Step 1: cold start ──────────────────────────────────────────────
    let identity = open_identity(root.path());
    let first = identity.persistent_identifier();
    assert_eq!(first.len(), 36, "8-4-4-4-12 hyphenated form");
    assert!(Uuid::parse_str(&first).is_ok());

    // A second call in the same "process" is stable.
    assert_eq!(identity.persistent_identifier(), first);
    drop(identity);

    // ── Step 2: restart ─────────────────────────────────────────────────
    let restarted = open_identity(root.path());
    assert_eq!(restarted.persistent_identifier(), first);
    drop(restarted);

    // ── Step 3: the stored blob decrypts to the identifier ──────────────
    let store = FileStore::new(root.path().join("store")).unwrap();
    let blob = store
        .get(&config.namespace, &config.slot_key)
        .unwrap()
        .expect("slot populated after first call");
    assert!(!blob.is_empty());

    let ciphertext =
        base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &blob).unwrap();
    let manager = KeyManager::new(
        SoftwareKeyFacility::new(root.path().join("keys")).unwrap(),
        config.key_alias.clone(),
    );
    let plaintext = manager.key_pair().unwrap().decrypt(&ciphertext).unwrap();
    assert_eq!(String::from_utf8(plaintext).unwrap(), first);
}

#[test]
fn corrupted_slot_falls_back_without_repair() {
    let root = tempfile::tempdir().unwrap();
    let config = IdentityConfig::default();

    // Seed the slot with garbage before any provisioning happens.
    let store = FileStore::new(root.path().join("store")).unwrap();
    store.put(&config.namespace, &config.slot_key, "####").unwrap();

    let identity = open_identity(root.path());
    let id = identity.persistent_identifier();
    assert!(Uuid::parse_str(&id).is_ok());

    // Fallback identifiers are not stable across calls.
    assert_ne!(identity.persistent_identifier(), id);

    // The slot still holds the garbage; fallback never repairs.
    let store = FileStore::new(root.path().join("store")).unwrap();
    assert_eq!(
        store.get(&config.namespace, &config.slot_key).unwrap().as_deref(),
        Some("####")
    );
}

/// Facility whose every operation fails, as if the secure hardware were
/// absent.
struct OfflineFacility;

impl KeyFacility for OfflineFacility {
    fn exists(&self, _alias: &str) -> Result<bool, Error> {
        Err(Error::KeyFacility("facility offline".to_string()))
    }

    fn generate(&self, _alias: &str, _spec: &KeySpec) -> Result<(), Error> {
        Err(Error::KeyFacility("facility offline".to_string()))
    }

    fn public_key(&self, _alias: &str) -> Result<rsa::RsaPublicKey, Error> {
        Err(Error::KeyFacility("facility offline".to_string()))
    }

    fn private_key(&self, _alias: &str) -> Result<rsa::RsaPrivateKey, Error> {
        Err(Error::KeyFacility("facility offline".to_string()))
    }
}

#[test]
fn offline_facility_never_blocks_the_caller() {
    let identity = IdentityStore::new(
        OfflineFacility,
        MemoryStore::new(),
        IdentityConfig::default(),
    );

    // Every call succeeds with a syntactically valid identifier; none of
    // them is persisted, so each call yields a new one.
    let mut seen = std::collections::HashSet::new();
    for _ in 0..5 {
        let id = identity.persistent_identifier();
        assert!(!id.is_empty());
        assert!(Uuid::parse_str(&id).is_ok());
        assert!(seen.insert(id), "fallback identifiers must be fresh");
    }
}
