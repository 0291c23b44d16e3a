// FedMCP Crypto - P-256 key handling

use p256::ecdsa::{SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePublicKey, EncodePublicKey};
use rand_core::OsRng;

use crate::error::KeyError;
use crate::hash::sha256_hex;

/// Number of hex characters in a key identifier.
pub const KEY_ID_LEN: usize = 16;

/// Generates a new P-256 keypair using secure random bytes from the OS.
pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
    let signing_key = SigningKey::random(&mut OsRng);
    let verifying_key = VerifyingKey::from(&signing_key);
    (signing_key, verifying_key)
}

/// DER-encoded SubjectPublicKeyInfo of the public key.
pub fn public_key_der(public_key: &VerifyingKey) -> Result<Vec<u8>, KeyError> {
    public_key
        .to_public_key_der()
        .map(|doc| doc.as_bytes().to_vec())
        .map_err(|e| KeyError::Encode(e.to_string()))
}

/// Parses a DER-encoded SubjectPublicKeyInfo holding a P-256 key.
pub fn public_key_from_der(der: &[u8]) -> Result<VerifyingKey, KeyError> {
    VerifyingKey::from_public_key_der(der).map_err(|e| KeyError::InvalidPublicKey(e.to_string()))
}

/// Derives the key identifier: the first 16 hex chars of SHA-256 over the SPKI DER.
///
/// This is a lookup tag only. Anyone can mint a key whose identifier collides
/// with a registered one by brute force over 64 bits, so never treat it as a
/// trust anchor.
pub fn key_id(public_key: &VerifyingKey) -> Result<String, KeyError> {
    let der = public_key_der(public_key)?;
    let mut id = sha256_hex(&der);
    id.truncate(KEY_ID_LEN);
    Ok(id)
}
