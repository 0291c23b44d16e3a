// Envelope signing logic for FedMCP
//
// This module turns a validated artifact into a compact ES256 envelope.

use std::fmt;

use chrono::Utc;
use p256::ecdsa::signature::hazmat::RandomizedPrehashSigner;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::DecodePrivateKey;
use rand_core::OsRng;

use crate::artifact::Artifact;
use crate::envelope::{encode_segment, pack_signature, SCALAR_LEN};
use crate::error::{KeyError, SignError};
use crate::hash::sha256_digest;
use crate::keys::{generate_keypair, key_id};
use crate::types::{JwsClaims, JwsHeader};

/// Something that can sign artifacts on behalf of one key.
///
/// `LocalSigner` keeps the key in process; hardware or remote backends can
/// implement the same contract.
pub trait ArtifactSigner: Send + Sync {
    /// Produces a compact envelope for the artifact.
    fn sign(&self, artifact: &Artifact) -> Result<String, SignError>;

    /// Identifier placed in the `kid` header.
    fn key_id(&self) -> &str;

    fn public_key(&self) -> VerifyingKey;
}

/// In-process signer holding a single P-256 private key.
pub struct LocalSigner {
    signing_key: SigningKey,
    key_id: String,
}

impl LocalSigner {
    /// Creates a signer with a freshly generated key.
    pub fn generate() -> Result<Self, KeyError> {
        let (signing_key, _) = generate_keypair();
        Self::from_signing_key(signing_key)
    }

    pub fn from_signing_key(signing_key: SigningKey) -> Result<Self, KeyError> {
        let key_id = key_id(signing_key.verifying_key())?;
        Ok(Self {
            signing_key,
            key_id,
        })
    }

    /// Loads a PKCS#8 DER-encoded P-256 private key.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self, KeyError> {
        let signing_key = SigningKey::from_pkcs8_der(der)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;
        Self::from_signing_key(signing_key)
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl ArtifactSigner for LocalSigner {
    fn sign(&self, artifact: &Artifact) -> Result<String, SignError> {
        sign_artifact(&self.signing_key, &self.key_id, artifact, Utc::now().timestamp())
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn public_key(&self) -> VerifyingKey {
        VerifyingKey::from(&self.signing_key)
    }
}

/// Signs an artifact and returns the compact envelope.
///
/// This function:
/// 1. Validates the artifact
/// 2. Canonicalizes it and builds the claims with `issued_at` as `iat`
/// 3. Base64url-encodes header and payload
/// 4. Hashes `header.payload` with SHA-256
/// 5. Signs the digest with a hedged nonce and packs `r || s` at fixed width
/// 6. Joins the three segments
///
/// # Arguments
/// * `signing_key` - The P-256 private key
/// * `key_id` - The `kid` placed in the header
/// * `artifact` - The artifact to sign
/// * `issued_at` - Unix seconds for the `iat` claim
///
/// # Returns
/// The `header.payload.signature` envelope, or the first validation,
/// canonicalization or signing failure
pub fn sign_artifact(
    signing_key: &SigningKey,
    key_id: &str,
    artifact: &Artifact,
    issued_at: i64,
) -> Result<String, SignError> {
    // Step 1: Validate before any crypto work
    artifact.validate()?;

    // Step 2: Canonical form and claims
    let canonical = artifact.canonical_string()?;
    let header = JwsHeader::es256(key_id);
    let claims = JwsClaims {
        iss: artifact.workspace_id.to_string(),
        sub: artifact.id.to_string(),
        iat: issued_at,
        artifact: canonical,
    };

    // Step 3: Encode header and payload
    let header_b64 = encode_segment(&serde_json::to_vec(&header)?);
    let payload_b64 = encode_segment(&serde_json::to_vec(&claims)?);
    let signing_input = format!("{header_b64}.{payload_b64}");

    // Step 4: Digest of the signing input
    let digest = sha256_digest(signing_input.as_bytes());

    // Step 5: ECDSA over the digest
    let signature: Signature = signing_key
        .sign_prehash_with_rng(&mut OsRng, &digest)
        .map_err(|e| SignError::Crypto(e.to_string()))?;
    let (r_bytes, s_bytes) = signature.split_bytes();
    let mut r = [0u8; SCALAR_LEN];
    let mut s = [0u8; SCALAR_LEN];
    r.copy_from_slice(&r_bytes);
    s.copy_from_slice(&s_bytes);
    let signature_b64 = encode_segment(&pack_signature(&r, &s));

    tracing::debug!(
        artifact_id = %artifact.id,
        kid = %key_id,
        version = artifact.version,
        "signed artifact"
    );

    // Step 6: Complete envelope
    Ok(format!("{signing_input}.{signature_b64}"))
}
