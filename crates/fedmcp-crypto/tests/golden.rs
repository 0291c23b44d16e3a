// Canonical-form vectors for FedMCP artifacts
//
// These vectors pin the exact bytes that get hashed and embedded in the
// `artifact` claim. Another implementation must reproduce them byte for byte
// to interoperate, so any difference here MUST fail.

use fedmcp_crypto::{
    key_id, public_key_der, public_key_from_der, sha256_hex, Artifact, ArtifactSigner, CompactJws,
    LocalSigner, SigningKey, Verifier, VerifyingKey,
};
use serde::Deserialize;
use std::fs;

#[derive(Deserialize)]
struct VectorFile {
    vectors: Vec<CanonicalVector>,
}

#[derive(Deserialize)]
struct CanonicalVector {
    name: String,
    artifact: serde_json::Value,
    canonical: String,
}

fn load_vectors() -> Vec<CanonicalVector> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/canonical_vectors.json");
    let content = fs::read_to_string(path).expect("Failed to read canonical_vectors.json");
    let file: VectorFile =
        serde_json::from_str(&content).expect("Failed to parse canonical_vectors.json");
    assert!(!file.vectors.is_empty());
    file.vectors
}

/// A fixed P-256 scalar and what another implementation derived from it.
#[derive(Deserialize)]
struct KeyVector {
    private_scalar_hex: String,
    public_key_spki_der_hex: String,
    kid: String,
    vector: String,
    iat: i64,
    header_json: String,
    jws: String,
}

fn load_key_vector() -> KeyVector {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/key_vectors.json");
    let content = fs::read_to_string(path).expect("Failed to read key_vectors.json");
    serde_json::from_str(&content).expect("Failed to parse key_vectors.json")
}

fn fixed_signing_key(vector: &KeyVector) -> SigningKey {
    let scalar = hex::decode(&vector.private_scalar_hex).expect("scalar hex");
    SigningKey::from_slice(&scalar).expect("valid P-256 scalar")
}

fn parse_artifact(vector: &CanonicalVector) -> Artifact {
    serde_json::from_value(vector.artifact.clone())
        .unwrap_or_else(|e| panic!("{}: artifact does not parse: {e}", vector.name))
}

#[test]
fn test_canonical_forms() {
    for vector in load_vectors() {
        let artifact = parse_artifact(&vector);
        assert_eq!(
            artifact.canonical_string().expect("canonicalize"),
            vector.canonical,
            "canonical form mismatch for {}",
            vector.name
        );
    }
}

#[test]
fn test_hash_is_digest_of_canonical_form() {
    for vector in load_vectors() {
        let artifact = parse_artifact(&vector);
        assert_eq!(
            artifact.hash().expect("hash"),
            sha256_hex(vector.canonical.as_bytes()),
            "hash mismatch for {}",
            vector.name
        );
    }
}

#[test]
fn test_vectors_are_valid_artifacts() {
    for vector in load_vectors() {
        let artifact = parse_artifact(&vector);
        assert!(
            artifact.validate().is_ok(),
            "{} should validate",
            vector.name
        );
    }
}

#[test]
fn test_canonical_form_reparses_to_same_artifact() {
    for vector in load_vectors() {
        let artifact = parse_artifact(&vector);
        let reparsed: Artifact =
            serde_json::from_str(&vector.canonical).expect("canonical form parses");
        assert_eq!(reparsed.hash().unwrap(), artifact.hash().unwrap());
    }
}

#[test]
fn test_envelope_embeds_canonical_form() {
    let signer = LocalSigner::generate().expect("key generation");
    let verifier = Verifier::new();
    verifier.add_public_key(signer.key_id(), signer.public_key());

    for vector in load_vectors() {
        let artifact = parse_artifact(&vector);
        let jws = signer.sign(&artifact).expect("signing");

        let claims = CompactJws::parse(&jws).unwrap().claims().unwrap();
        assert_eq!(claims.artifact, vector.canonical, "claim mismatch for {}", vector.name);
        assert!(verifier.verify(&jws, &artifact).is_ok());
    }
}

#[test]
fn test_fixed_key_public_der_and_kid() {
    let vector = load_key_vector();
    let public_key = VerifyingKey::from(&fixed_signing_key(&vector));

    let der = public_key_der(&public_key).expect("encode DER");
    assert_eq!(hex::encode(&der), vector.public_key_spki_der_hex);
    assert_eq!(key_id(&public_key).unwrap(), vector.kid);

    // The DER alone reproduces the same identity
    let expected_der = hex::decode(&vector.public_key_spki_der_hex).unwrap();
    let imported = public_key_from_der(&expected_der).expect("decode DER");
    assert_eq!(imported, public_key);
    assert_eq!(key_id(&imported).unwrap(), vector.kid);

    let signer = LocalSigner::from_signing_key(fixed_signing_key(&vector)).unwrap();
    assert_eq!(signer.key_id(), vector.kid);
}

#[test]
fn test_precomputed_envelope_verifies() {
    let vector = load_key_vector();
    let canonical = load_vectors()
        .into_iter()
        .find(|v| v.name == vector.vector)
        .expect("referenced canonical vector");
    let artifact = parse_artifact(&canonical);

    let envelope = CompactJws::parse(&vector.jws).expect("three segments");
    let header = envelope.header().expect("header decodes");
    assert_eq!(header.kid, vector.kid);
    assert_eq!(serde_json::to_string(&header).unwrap(), vector.header_json);

    let verifier = Verifier::new();
    let der = hex::decode(&vector.public_key_spki_der_hex).unwrap();
    assert_eq!(verifier.add_public_key_der(&der).unwrap(), vector.kid);

    let claims = verifier
        .verify(&vector.jws, &artifact)
        .expect("envelope from another implementation verifies");
    assert_eq!(claims.iat, vector.iat);
    assert_eq!(claims.iss, artifact.workspace_id.to_string());
    assert_eq!(claims.sub, artifact.id.to_string());
    assert_eq!(claims.artifact, canonical.canonical);
}
