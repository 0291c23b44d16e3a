//! Audit event records handed to an external audit log.
//!
//! This crate only builds events; storing and shipping them is the caller's job.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::artifact::Artifact;
use crate::error::SignError;
use crate::sign::ArtifactSigner;

/// What happened to an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Deploy,
    Delete,
}

/// A single immutable record that an action occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub event_id: Uuid,
    pub artifact_id: Uuid,
    pub action: AuditAction,
    pub actor: String,
    /// RFC 3339 UTC
    pub timestamp: String,
    /// Envelope over the artifact, for non-repudiation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jws: Option<String>,
}

impl AuditEvent {
    pub fn new(artifact_id: Uuid, action: AuditAction, actor: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            artifact_id,
            action,
            actor: actor.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            jws: None,
        }
    }

    /// Builds an event carrying a fresh envelope over `artifact`.
    ///
    /// Fails without producing an event if signing fails.
    pub fn signed(
        artifact: &Artifact,
        action: AuditAction,
        actor: impl Into<String>,
        signer: &dyn ArtifactSigner,
    ) -> Result<Self, SignError> {
        let jws = signer.sign(artifact)?;
        Ok(Self {
            jws: Some(jws),
            ..Self::new(artifact.id, action, actor)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::sign::LocalSigner;
    use crate::types::ArtifactType;
    use crate::verify::Verifier;
    use serde_json::json;

    fn test_artifact() -> Artifact {
        let body = json!({"script": "check-fips.sh"});
        Artifact::create(
            ArtifactType::AuditScript,
            Uuid::new_v4(),
            body.as_object().unwrap().clone(),
        )
    }

    #[test]
    fn test_new_event_has_no_jws() {
        let artifact_id = Uuid::new_v4();
        let event = AuditEvent::new(artifact_id, AuditAction::Create, "alice@example.gov");

        assert_eq!(event.artifact_id, artifact_id);
        assert_eq!(event.action, AuditAction::Create);
        assert_eq!(event.actor, "alice@example.gov");
        assert!(event.jws.is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(&event.timestamp).is_ok());

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"eventId\":"));
        assert!(json.contains("\"artifactId\":"));
        assert!(json.contains("\"action\":\"create\""));
        assert!(!json.contains("jws"));
    }

    #[test]
    fn test_action_wire_names() {
        let names: Vec<String> = [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Deploy,
            AuditAction::Delete,
        ]
        .iter()
        .map(|a| serde_json::to_string(a).unwrap())
        .collect();
        assert_eq!(names, ["\"create\"", "\"update\"", "\"deploy\"", "\"delete\""]);

        assert!(serde_json::from_str::<AuditAction>("\"publish\"").is_err());
    }

    #[test]
    fn test_signed_event_carries_verifiable_jws() {
        let signer = LocalSigner::generate().unwrap();
        let verifier = Verifier::new();
        verifier.add_public_key(signer.key_id(), signer.public_key());

        let artifact = test_artifact();
        let event = AuditEvent::signed(&artifact, AuditAction::Deploy, "ci-bot", &signer).unwrap();

        assert_eq!(event.artifact_id, artifact.id);
        let jws = event.jws.as_deref().expect("jws should be set");
        assert!(verifier.verify(jws, &artifact).is_ok());

        let json = serde_json::to_string(&event).unwrap();
        let parsed: AuditEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_signed_event_propagates_sign_errors() {
        let signer = LocalSigner::generate().unwrap();
        let mut artifact = test_artifact();
        artifact.json_body.clear();

        let result = AuditEvent::signed(&artifact, AuditAction::Update, "alice", &signer);
        assert!(matches!(
            result,
            Err(SignError::InvalidArtifact(ValidationError::EmptyBody))
        ));
    }
}
