//! Wire encodings: unpadded base64url for binary fields and base58 for key ids.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::error::{CoreError, Result};

/// Encode bytes as unpadded URL-safe base64.
pub fn b64_encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode unpadded URL-safe base64.
pub fn b64_decode(data: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(data)
        .map_err(|e| CoreError::DecodingError(e.to_string()))
}

/// The `kid` of a public key: its raw bytes in base58 (Bitcoin alphabet).
pub fn key_id(public_key: &[u8]) -> String {
    bs58::encode(public_key).into_string()
}

/// Reverse of [`key_id`].
pub fn key_id_to_bytes(kid: &str) -> Result<Vec<u8>> {
    bs58::decode(kid)
        .into_vec()
        .map_err(|e| CoreError::DecodingError(e.to_string()))
}
