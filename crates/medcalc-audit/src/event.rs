//! Audit entry type.

use serde::{Deserialize, Serialize};

use medcalc_contracts::audit::AuditRecord;

/// One stored invocation, linked to its predecessor by hash.
///
/// Changing any field, including those of the embedded `record`, invalidates
/// `this_hash` and breaks the link from the following entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Position in the log since creation, starting at 0. Not reset by
    /// eviction or `clear()`.
    pub sequence: u64,

    pub record: AuditRecord,

    /// `this_hash` of the previous entry, or `GENESIS_HASH` for the first
    /// entry ever written.
    pub prev_hash: String,

    /// SHA-256 (hex) over sequence, prev_hash and the record's JSON.
    pub this_hash: String,
}

impl AuditEntry {
    /// The `prev_hash` of the first entry: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}
