// JCS (JSON Canonicalization Scheme) - RFC 8785 implementation

use serde::Serialize;

use crate::error::CanonicalizationError;

/// Canonicalizes a serializable value according to RFC 8785 (JCS).
///
/// - Object keys are sorted by UTF-16 code units, at every depth
/// - No insignificant whitespace
/// - Numbers use the ECMAScript shortest round-trip form
///
/// # Arguments
/// * `value` - Any value whose serde form is a JSON document
///
/// # Returns
/// The canonical JSON text, or an error if the value cannot be expressed as
/// JSON (for example a map with non-string keys)
pub fn jcs_canonical_string<T: Serialize>(value: &T) -> Result<String, CanonicalizationError> {
    serde_jcs::to_string(value).map_err(|e| CanonicalizationError(e.to_string()))
}

/// Same as [`jcs_canonical_string`], returning the UTF-8 bytes.
pub fn jcs_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CanonicalizationError> {
    jcs_canonical_string(value).map(String::into_bytes)
}
