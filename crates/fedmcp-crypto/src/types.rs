//! Wire types for FedMCP artifacts and their signature envelopes.
//!
//! The header and claims are serialized with plain `serde_json` in field
//! declaration order. Only the artifact itself goes through RFC 8785
//! canonicalization, since its bytes are embedded in the claims.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The only signature algorithm accepted in an envelope header.
pub const ES256: &str = "ES256";

/// Value of the `typ` header parameter.
pub const JWT_TYPE: &str = "JWT";

/// Closed set of artifact kinds exchanged over FedMCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    SspFragment,
    PoamTemplate,
    AgentRecipe,
    BaselineModule,
    AuditScript,
}

impl ArtifactType {
    pub const ALL: [ArtifactType; 5] = [
        ArtifactType::SspFragment,
        ArtifactType::PoamTemplate,
        ArtifactType::AgentRecipe,
        ArtifactType::BaselineModule,
        ArtifactType::AuditScript,
    ];

    /// Wire name of the type, e.g. `agent_recipe`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactType::SspFragment => "ssp_fragment",
            ArtifactType::PoamTemplate => "poam_template",
            ArtifactType::AgentRecipe => "agent_recipe",
            ArtifactType::BaselineModule => "baseline_module",
            ArtifactType::AuditScript => "audit_script",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::EmptyType);
        }
        ArtifactType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownType(s.to_string()))
    }
}

/// JOSE header of a signature envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwsHeader {
    /// Signature algorithm, always "ES256" when produced by this crate
    pub alg: String,
    /// Token type, "JWT"
    pub typ: String,
    /// Key identifier of the signing key
    pub kid: String,
}

impl JwsHeader {
    /// Header for an ES256 signature made with the key identified by `kid`.
    pub fn es256(kid: impl Into<String>) -> Self {
        Self {
            alg: ES256.to_string(),
            typ: JWT_TYPE.to_string(),
            kid: kid.into(),
        }
    }
}

/// Claims carried in the envelope payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwsClaims {
    /// Issuer: the owning workspace id
    pub iss: String,
    /// Subject: the artifact id
    pub sub: String,
    /// Issued-at, Unix seconds
    pub iat: i64,
    /// Canonical JSON of the signed artifact
    pub artifact: String,
}
