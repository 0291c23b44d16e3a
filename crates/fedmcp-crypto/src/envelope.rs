// Compact envelope codec for FedMCP
//
// An envelope is three base64url (unpadded) segments joined by '.':
// header, payload and a fixed-width r || s ECDSA signature.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::de::DeserializeOwned;

use crate::error::{Segment, VerifyError};
use crate::types::{JwsClaims, JwsHeader};

/// Width of one P-256 signature scalar.
pub const SCALAR_LEN: usize = 32;

/// Width of a packed `r || s` signature.
pub const SIGNATURE_LEN: usize = 2 * SCALAR_LEN;

// Signature segments tolerate stray trailing bits at decode time; the
// re-encoding check in `signature_bytes` still admits a single encoding.
const SIGNATURE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_allow_trailing_bits(true),
);

/// Encodes bytes as an unpadded base64url segment.
pub fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

fn decode_segment(segment: Segment, encoded: &str) -> Result<Vec<u8>, VerifyError> {
    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|source| VerifyError::InvalidBase64 { segment, source })
}

fn decode_json<T: DeserializeOwned>(segment: Segment, encoded: &str) -> Result<T, VerifyError> {
    let bytes = decode_segment(segment, encoded)?;
    serde_json::from_slice(&bytes).map_err(|source| VerifyError::InvalidJson { segment, source })
}

/// Packs two big-endian scalars into the 64-byte wire signature.
pub fn pack_signature(r: &[u8; SCALAR_LEN], s: &[u8; SCALAR_LEN]) -> [u8; SIGNATURE_LEN] {
    let mut packed = [0u8; SIGNATURE_LEN];
    packed[..SCALAR_LEN].copy_from_slice(r);
    packed[SCALAR_LEN..].copy_from_slice(s);
    packed
}

/// Splits a wire signature into its `r` and `s` scalars.
///
/// Anything other than exactly 64 bytes is rejected; short scalars are never
/// re-padded here since the signer always emits fixed-width halves.
pub fn unpack_signature(bytes: &[u8]) -> Result<([u8; SCALAR_LEN], [u8; SCALAR_LEN]), VerifyError> {
    if bytes.len() != SIGNATURE_LEN {
        return Err(VerifyError::InvalidSignatureLength(bytes.len()));
    }
    let mut r = [0u8; SCALAR_LEN];
    let mut s = [0u8; SCALAR_LEN];
    r.copy_from_slice(&bytes[..SCALAR_LEN]);
    s.copy_from_slice(&bytes[SCALAR_LEN..]);
    Ok((r, s))
}

/// A compact envelope split into its still-encoded segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactJws<'a> {
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
}

impl<'a> CompactJws<'a> {
    /// Splits an envelope into exactly three segments.
    pub fn parse(envelope: &'a str) -> Result<Self, VerifyError> {
        let parts: Vec<&str> = envelope.split('.').collect();
        match *parts.as_slice() {
            [header, payload, signature] => Ok(Self {
                header,
                payload,
                signature,
            }),
            _ => Err(VerifyError::MalformedEnvelope {
                segments: parts.len(),
            }),
        }
    }

    /// The exact ASCII bytes that were hashed and signed.
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }

    pub fn header(&self) -> Result<JwsHeader, VerifyError> {
        decode_json(Segment::Header, self.header)
    }

    /// Decodes the claims without checking the signature.
    pub fn claims(&self) -> Result<JwsClaims, VerifyError> {
        decode_json(Segment::Payload, self.payload)
    }

    /// Decodes the signature segment.
    ///
    /// A segment that decodes but is not the canonical encoding of its bytes
    /// (non-zero trailing bits in the last character) has been altered after
    /// signing and is reported as `SignatureMismatch`, not as a decoding error.
    pub fn signature_bytes(&self) -> Result<Vec<u8>, VerifyError> {
        let bytes = SIGNATURE_ENGINE
            .decode(self.signature)
            .map_err(|source| VerifyError::InvalidBase64 {
                segment: Segment::Signature,
                source,
            })?;
        if encode_segment(&bytes) != self.signature {
            return Err(VerifyError::SignatureMismatch);
        }
        Ok(bytes)
    }
}
