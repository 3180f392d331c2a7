use std::path::Path;

use fastcrypto::{
    ed25519::{Ed25519KeyPair, Ed25519PrivateKey},
    traits::{KeyPair, ToFromBytes},
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Load a keypair from a raw 32-byte private-key file, or generate a fresh
/// one if no path was configured. Real PKI/PEM file handling belongs to a
/// production deployment's key-management tooling, not this reference
/// binary.
pub fn load_or_generate(path: Option<&Path>) -> eyre::Result<Ed25519KeyPair> {
    match path {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            let private = Ed25519PrivateKey::from_bytes(&bytes)?;
            Ok(Ed25519KeyPair::from(private))
        }
        None => Ok(Ed25519KeyPair::generate(&mut StdRng::from_entropy())),
    }
}
