//! Canonical CBOR encoding for grant digests.
//!
//! A GrantId must be a pure function of the four grant fields, identical
//! across platforms and releases. This module implements RFC 8949 Core
//! Deterministic Encoding for the one map shape the registry hashes:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only

use ciborium::value::Value;

use crate::grant::Grant;
use crate::types::GrantId;

/// Domain prefix mixed into every grant digest.
const GRANT_ID_DOMAIN: &[u8] = b"grant-registry/grant-id/v0:";

/// Field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const OWNER: u64 = 0;
    pub const GRANTEE: u64 = 1;
    pub const DATA_ID: u64 = 2;
    pub const LOCKED_UNTIL: u64 = 3;
}

/// Encode a grant to canonical CBOR bytes.
pub fn canonical_grant_bytes(grant: &Grant) -> Vec<u8> {
    let value = grant_to_cbor_value(grant);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value);
    buf
}

/// Derive the content-addressed id of a grant.
///
/// GrantId = Blake3(GRANT_ID_DOMAIN || canonical_grant_bytes(grant)).
pub fn derive_grant_id(grant: &Grant) -> GrantId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(GRANT_ID_DOMAIN);
    hasher.update(&canonical_grant_bytes(grant));
    GrantId(*hasher.finalize().as_bytes())
}

/// Convert a grant to a CBOR Value (map with integer keys).
fn grant_to_cbor_value(grant: &Grant) -> Value {
    Value::Map(vec![
        (
            Value::Integer(keys::OWNER.into()),
            Value::Bytes(grant.owner.0.to_vec()),
        ),
        (
            Value::Integer(keys::GRANTEE.into()),
            Value::Bytes(grant.grantee.0.to_vec()),
        ),
        (
            Value::Integer(keys::DATA_ID.into()),
            Value::Text(grant.data_id.clone()),
        ),
        (
            Value::Integer(keys::LOCKED_UNTIL.into()),
            Value::Integer(grant.locked_until.into()),
        ),
    ])
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => {
            let n: i128 = (*i).into();
            debug_assert!(n >= 0, "grant encoding uses unsigned integers only");
            encode_uint(buf, 0, n as u64);
        }
        Value::Bytes(b) => {
            encode_bytes(buf, b);
        }
        Value::Text(s) => {
            encode_text(buf, s);
        }
        Value::Map(entries) => {
            encode_map_canonical(buf, entries);
        }
        _ => {
            panic!("unsupported CBOR value type in grant encoding");
        }
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, key_value_pairs.len() as u64);

    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}
