//! Canonical serialization for fingerprints.
//!
//! Policies and impact snapshots are fingerprinted so that two runs can be
//! compared without diffing their full contents.
//!
//! ## Determinism Guarantees
//!
//! - Struct fields serialize in declaration order
//! - Maps in hashed data are `BTreeMap` (ordered by key)
//! - Identifier lists are emitted in ascending order by their containers

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Seed for every kernel fingerprint.
const FINGERPRINT_SEED: u64 = 0;

/// Serialize a value to canonical JSON bytes.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute the xxh64 fingerprint of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), FINGERPRINT_SEED)
}

/// Compute the fingerprint as a 16-digit hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}
