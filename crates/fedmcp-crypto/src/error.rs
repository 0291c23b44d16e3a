//! Error types for artifact validation, signing and verification.

use std::fmt;

/// Reasons an artifact is rejected before any cryptographic work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("artifact ID cannot be nil")]
    EmptyIdentifier,

    #[error("workspace ID cannot be nil")]
    EmptyWorkspace,

    #[error("version must be >= 1, got {0}")]
    InvalidVersion(u32),

    #[error("version {0} has no successor")]
    VersionExhausted(u32),

    #[error("type cannot be empty")]
    EmptyType,

    #[error("unknown artifact type: '{0}'")]
    UnknownType(String),

    #[error("jsonBody cannot be empty")]
    EmptyBody,

    #[error("jsonBody exceeds {limit} byte limit ({size} bytes)")]
    BodyTooLarge { size: usize, limit: usize },

    #[error("jsonBody cannot be serialized: {0}")]
    BodyNotSerializable(String),
}

/// RFC 8785 serialization failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("canonicalization failed: {0}")]
pub struct CanonicalizationError(pub String);

/// Public key encoding or decoding failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("failed to encode public key: {0}")]
    Encode(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
}

/// Errors returned while producing an envelope. No envelope is returned on any of them.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("invalid artifact: {0}")]
    InvalidArtifact(#[from] ValidationError),

    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    #[error("failed to encode envelope segment: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("signature generation failed: {0}")]
    Crypto(String),
}

/// Envelope segment named in decoding errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Header,
    Payload,
    Signature,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Header => f.write_str("header"),
            Segment::Payload => f.write_str("payload"),
            Segment::Signature => f.write_str("signature"),
        }
    }
}

/// Reasons an envelope fails verification.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("invalid JWS format: expected 3 segments, got {segments}")]
    MalformedEnvelope { segments: usize },

    #[error("invalid base64url in {segment} segment: {source}")]
    InvalidBase64 {
        segment: Segment,
        #[source]
        source: base64::DecodeError,
    },

    #[error("invalid JSON in {segment} segment: {source}")]
    InvalidJson {
        segment: Segment,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid signature length: expected 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    #[error("unsupported algorithm: '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("unknown key ID: '{0}'")]
    UnknownKeyId(String),

    #[error("issuer mismatch: expected '{expected}', found '{found}'")]
    IssuerMismatch { expected: String, found: String },

    #[error("subject mismatch: expected '{expected}', found '{found}'")]
    SubjectMismatch { expected: String, found: String },

    #[error("invalid signature")]
    SignatureMismatch,

    #[error("artifact claim does not match candidate artifact")]
    ArtifactMismatch,

    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

impl VerifyError {
    /// The envelope could not be decoded at all.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            VerifyError::MalformedEnvelope { .. }
                | VerifyError::InvalidBase64 { .. }
                | VerifyError::InvalidJson { .. }
                | VerifyError::InvalidSignatureLength(_)
        )
    }

    /// The envelope decoded but must not be trusted.
    pub fn is_trust_error(&self) -> bool {
        matches!(
            self,
            VerifyError::UnsupportedAlgorithm(_)
                | VerifyError::UnknownKeyId(_)
                | VerifyError::IssuerMismatch { .. }
                | VerifyError::SubjectMismatch { .. }
                | VerifyError::SignatureMismatch
                | VerifyError::ArtifactMismatch
        )
    }
}
