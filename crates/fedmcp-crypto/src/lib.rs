// FedMCP Crypto - canonical form, hashing and ES256 envelopes for FedMCP artifacts

pub mod artifact;
pub mod audit;
pub mod envelope;
pub mod error;
pub mod hash;
pub mod jcs;
pub mod keys;
pub mod sign;
pub mod types;
pub mod verify;

pub use artifact::{Artifact, MAX_BODY_BYTES};
pub use audit::{AuditAction, AuditEvent};
pub use envelope::{encode_segment, pack_signature, unpack_signature, CompactJws, SCALAR_LEN, SIGNATURE_LEN};
pub use error::{CanonicalizationError, KeyError, Segment, SignError, ValidationError, VerifyError};
pub use hash::{sha256_digest, sha256_hex};
pub use jcs::{jcs_canonical_bytes, jcs_canonical_string};
pub use keys::{generate_keypair, key_id, public_key_der, public_key_from_der, KEY_ID_LEN};
pub use sign::{sign_artifact, ArtifactSigner, LocalSigner};
pub use types::{ArtifactType, JwsClaims, JwsHeader, ES256, JWT_TYPE};
pub use verify::Verifier;

pub use p256::ecdsa::{SigningKey, VerifyingKey};
