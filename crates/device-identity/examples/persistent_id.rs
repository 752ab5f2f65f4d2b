//! Persistent identifier — provision on first run, retrieve afterwards.
//!
//! Run with:
//!   cargo run --example persistent_id -p device-identity

use device_identity::{FileStore, IdentityConfig, IdentityStore, SoftwareKeyFacility};

fn main() {
    let data_dir = std::env::temp_dir().join("device-identity-example");

    // ── 1. Build the identity store ─────────────────────────────────────────
    //
    // The key facility holds the RSA key pair; the durable store holds the
    // encrypted identifier. Both live under `data_dir`, so re-running this
    // example prints the same identifier.
    let facility =
        SoftwareKeyFacility::new(data_dir.join("keys")).expect("open key facility");
    let store = FileStore::new(data_dir.join("store")).expect("open durable store");
    let identity = IdentityStore::new(facility, store, IdentityConfig::default());

    // ── 2. Resolve the identifier ───────────────────────────────────────────
    //
    // The first call generates, encrypts, and persists; every later call
    // (in this process or the next) decrypts the stored blob.
    let id = identity.persistent_identifier();
    println!("Installation identifier: {id}");

    // ── 3. Calls are stable within one installation ─────────────────────────
    let again = identity.persistent_identifier();
    assert_eq!(id, again);
    println!("Second call returns the same identifier: confirmed");

    println!();
    println!("Data directory: {}", data_dir.display());
    println!("Delete it to simulate a fresh installation.");
}
