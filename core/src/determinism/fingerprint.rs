use super::json_canonical::to_canonical_bytes;
use crate::error::CoreResult;
use serde::Serialize;
use sha2::{Digest, Sha256};
use ulid::Ulid;

pub fn session_id_ulid() -> String {
    format!("s_{}", Ulid::new())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// SHA-256 of the canonical JSON bytes of `value`.
pub fn canonical_sha256<T: Serialize>(value: &T) -> CoreResult<String> {
    Ok(sha256_hex(&to_canonical_bytes(value)?))
}
