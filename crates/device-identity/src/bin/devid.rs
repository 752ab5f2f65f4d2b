//! DeviceIdentity CLI — `devid` command.
//!
//! Prints the stable installation identifier, provisioning the key pair and
//! the encrypted slot on first run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use device_identity::{FileStore, IdentityConfig, IdentityStore, KeyManager, SoftwareKeyFacility};

#[derive(Parser, Debug)]
#[command(
    name = "devid",
    about = "Persistent device identifier",
    version,
    long_about = "devid — persistent device identifier\n\nResolves the stable per-installation identifier, generating and\nencrypting it under a locally held RSA key pair on first run."
)]
struct Cli {
    /// Data directory (default: ~/.device-identity)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Also print the fingerprint of the encryption key pair
    #[arg(long)]
    fingerprint: bool,
}

fn default_data_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("home directory not found")?;
    Ok(home.join(".device-identity"))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    let config = IdentityConfig::default();
    let facility =
        SoftwareKeyFacility::new(data_dir.join("keys")).context("open key facility")?;
    let store = FileStore::new(data_dir.join("store")).context("open durable store")?;
    let identity = IdentityStore::new(facility, store, config.clone());

    println!("{}", identity.persistent_identifier());

    if cli.fingerprint {
        let facility =
            SoftwareKeyFacility::new(data_dir.join("keys")).context("open key facility")?;
        let manager = KeyManager::new(facility, config.key_alias);
        match manager.key_pair() {
            Ok(pair) => println!("key fingerprint: {}", pair.fingerprint()?),
            Err(_) => println!("key fingerprint: (no persisted key pair)"),
        }
    }

    Ok(())
}
