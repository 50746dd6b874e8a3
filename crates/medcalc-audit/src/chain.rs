//! Hash-chain primitives.
//!
//! Hash input layout (bytes, in order):
//!   1. sequence as 8-byte little-endian
//!   2. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   3. compact JSON of the record

use sha2::{Digest, Sha256};

use medcalc_contracts::audit::AuditRecord;

use crate::event::AuditEntry;

/// SHA-256 of one entry's content, as lowercase hex.
///
/// # Panics
///
/// Panics if `record` cannot be serialized to JSON, which cannot happen for
/// `AuditRecord`: every field is a string, number, bool or map of those.
pub fn hash_entry(sequence: u64, record: &AuditRecord, prev_hash: &str) -> String {
    let record_json =
        serde_json::to_vec(record).expect("AuditRecord must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    hex::encode(hasher.finalize())
}

/// Verify a window of consecutive entries.
///
/// `anchor` is the hash the first entry must link to: `GENESIS_HASH` for a
/// log that has never evicted, otherwise the hash of the last entry dropped.
/// Checks, for every entry:
///
/// 1. `prev_hash` equals the previous entry's `this_hash` (or `anchor`)
/// 2. `sequence` is exactly one more than the previous entry's
/// 3. `this_hash` matches the hash recomputed from the entry's fields
///
/// An empty window is valid.
pub fn verify_chain<'a>(entries: impl IntoIterator<Item = &'a AuditEntry>, anchor: &str) -> bool {
    let mut expected_prev = anchor.to_string();
    let mut expected_seq: Option<u64> = None;

    for entry in entries {
        if entry.prev_hash != expected_prev {
            return false;
        }
        if expected_seq.is_some_and(|seq| entry.sequence != seq) {
            return false;
        }
        if entry.this_hash != hash_entry(entry.sequence, &entry.record, &entry.prev_hash) {
            return false;
        }
        expected_prev = entry.this_hash.clone();
        expected_seq = Some(entry.sequence + 1);
    }

    true
}
