//! The FedMCP artifact: the unit of exchange that gets canonicalized, hashed and signed.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{CanonicalizationError, ValidationError};
use crate::hash::sha256_hex;
use crate::jcs::{jcs_canonical_bytes, jcs_canonical_string};
use crate::types::ArtifactType;

/// Upper bound on the serialized size of `jsonBody`, inclusive.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A versioned, typed record owned by a workspace.
///
/// `created_at` is kept as an RFC 3339 string rather than a parsed time so
/// that it reproduces byte-for-byte in the canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,
    pub version: u32,
    pub workspace_id: Uuid,
    pub created_at: String,
    pub json_body: Map<String, Value>,
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl Artifact {
    /// Creates version 1 of a new artifact with a fresh id and the current UTC time.
    pub fn create(artifact_type: ArtifactType, workspace_id: Uuid, json_body: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            artifact_type,
            version: 1,
            workspace_id,
            created_at: now_rfc3339(),
            json_body,
        }
    }

    /// Builds the next version of this artifact with a new body.
    ///
    /// Identity, type and workspace carry over; the original is left untouched.
    /// Fails with [`ValidationError::VersionExhausted`] at `u32::MAX`.
    pub fn next_version(&self, json_body: Map<String, Value>) -> Result<Self, ValidationError> {
        let version = self
            .version
            .checked_add(1)
            .ok_or(ValidationError::VersionExhausted(self.version))?;

        Ok(Self {
            id: self.id,
            artifact_type: self.artifact_type,
            version,
            workspace_id: self.workspace_id,
            created_at: now_rfc3339(),
            json_body,
        })
    }

    /// Checks the artifact invariants. Re-serializes the body to measure it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::EmptyIdentifier);
        }
        if self.workspace_id.is_nil() {
            return Err(ValidationError::EmptyWorkspace);
        }
        if self.version < 1 {
            return Err(ValidationError::InvalidVersion(self.version));
        }
        if self.json_body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }

        let size = self
            .body_size()
            .map_err(|e| ValidationError::BodyNotSerializable(e.0))?;
        if size > MAX_BODY_BYTES {
            return Err(ValidationError::BodyTooLarge {
                size,
                limit: MAX_BODY_BYTES,
            });
        }

        Ok(())
    }

    /// Size in bytes of the canonical serialization of `jsonBody`.
    pub fn body_size(&self) -> Result<usize, CanonicalizationError> {
        jcs_canonical_bytes(&self.json_body).map(|bytes| bytes.len())
    }

    /// RFC 8785 bytes of the whole artifact.
    pub fn canonicalize(&self) -> Result<Vec<u8>, CanonicalizationError> {
        jcs_canonical_bytes(self)
    }

    /// RFC 8785 form of the whole artifact, as embedded in the `artifact` claim.
    pub fn canonical_string(&self) -> Result<String, CanonicalizationError> {
        jcs_canonical_string(self)
    }

    /// Lowercase hex SHA-256 of the canonical form.
    pub fn hash(&self) -> Result<String, CanonicalizationError> {
        Ok(sha256_hex(&self.canonicalize()?))
    }
}
