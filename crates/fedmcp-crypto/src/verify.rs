// Envelope verification logic for FedMCP
//
// The verifier owns a registry of trusted public keys indexed by key id and
// checks envelopes against a caller-supplied copy of the artifact.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use p256::ecdsa::signature::hazmat::PrehashVerifier;
use p256::ecdsa::{Signature, VerifyingKey};

use crate::artifact::Artifact;
use crate::envelope::{unpack_signature, CompactJws};
use crate::error::{KeyError, VerifyError};
use crate::hash::{sha256_digest, sha256_hex};
use crate::keys::{key_id, public_key_from_der};
use crate::types::{JwsClaims, ES256};

/// Registry of trusted keys plus the verification procedure.
///
/// Safe to share across threads; registration takes a write lock, lookups a
/// read lock.
#[derive(Debug, Default)]
pub struct Verifier {
    public_keys: RwLock<HashMap<String, VerifyingKey>>,
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a trusted key. A reused key id replaces the earlier entry.
    pub fn add_public_key(&self, key_id: impl Into<String>, public_key: VerifyingKey) {
        let key_id = key_id.into();
        let mut keys = self
            .public_keys
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if keys.insert(key_id.clone(), public_key).is_some() {
            tracing::warn!(kid = %key_id, "replaced existing public key");
        }
    }

    /// Registers a DER SubjectPublicKeyInfo under its derived key id and returns the id.
    pub fn add_public_key_der(&self, der: &[u8]) -> Result<String, KeyError> {
        let public_key = public_key_from_der(der)?;
        let id = key_id(&public_key)?;
        self.add_public_key(id.clone(), public_key);
        Ok(id)
    }

    pub fn contains_key(&self, key_id: &str) -> bool {
        self.public_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key_id)
    }

    pub fn len(&self) -> usize {
        self.public_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key_id: &str) -> Option<VerifyingKey> {
        self.public_keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key_id)
            .cloned()
    }

    /// Verifies an envelope against the candidate artifact and returns its claims.
    ///
    /// Every check must pass:
    /// 1. Exactly three segments
    /// 2. Header decodes and `alg` is ES256
    /// 3. `kid` is registered
    /// 4. Claims decode and `iss`/`sub` match the candidate's workspace and id
    /// 5. The 64-byte `r || s` signature verifies over SHA-256 of `header.payload`
    /// 6. The embedded `artifact` claim hashes to the candidate's hash
    ///
    /// # Arguments
    /// * `jws` - The compact envelope as received
    /// * `artifact` - The candidate artifact the envelope must cover
    ///
    /// # Returns
    /// * `Ok(JwsClaims)` - The decoded claims of a trusted envelope
    /// * `Err(VerifyError)` - The first check that failed
    pub fn verify(&self, jws: &str, artifact: &Artifact) -> Result<JwsClaims, VerifyError> {
        match self.verify_inner(jws, artifact) {
            Ok(claims) => {
                tracing::debug!(artifact_id = %artifact.id, iat = claims.iat, "verified artifact");
                Ok(claims)
            }
            Err(err) => {
                tracing::warn!(artifact_id = %artifact.id, error = %err, "artifact verification failed");
                Err(err)
            }
        }
    }

    fn verify_inner(&self, jws: &str, artifact: &Artifact) -> Result<JwsClaims, VerifyError> {
        // Step 1: Split
        let envelope = CompactJws::parse(jws)?;

        // Step 2: Header and algorithm pin
        let header = envelope.header()?;
        if header.alg != ES256 {
            return Err(VerifyError::UnsupportedAlgorithm(header.alg));
        }

        // Step 3: Key lookup
        let public_key = self
            .lookup(&header.kid)
            .ok_or_else(|| VerifyError::UnknownKeyId(header.kid.clone()))?;

        // Step 4: Claims against the candidate
        let claims = envelope.claims()?;
        let workspace_id = artifact.workspace_id.to_string();
        if claims.iss != workspace_id {
            return Err(VerifyError::IssuerMismatch {
                expected: workspace_id,
                found: claims.iss,
            });
        }
        let artifact_id = artifact.id.to_string();
        if claims.sub != artifact_id {
            return Err(VerifyError::SubjectMismatch {
                expected: artifact_id,
                found: claims.sub,
            });
        }

        // Step 5: Signature
        let (r, s) = unpack_signature(&envelope.signature_bytes()?)?;
        let signature =
            Signature::from_scalars(r, s).map_err(|_| VerifyError::SignatureMismatch)?;
        let digest = sha256_digest(envelope.signing_input().as_bytes());
        public_key
            .verify_prehash(&digest, &signature)
            .map_err(|_| VerifyError::SignatureMismatch)?;

        // Step 6: Embedded artifact must be the candidate
        if sha256_hex(claims.artifact.as_bytes()) != artifact.hash()? {
            return Err(VerifyError::ArtifactMismatch);
        }

        Ok(claims)
    }
}
