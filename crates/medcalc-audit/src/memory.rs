//! Bounded in-memory audit log.
//!
//! Entries live in a ring buffer of fixed capacity. Once full, each new entry
//! evicts the oldest. The hash of the most recently evicted entry is kept as
//! the anchor the retained window must link to, so tampering is still
//! detected after eviction.
//!
//! All state sits behind one `Mutex`, which serializes concurrent appends
//! from callers sharing the log through an `Arc`.

use std::collections::VecDeque;
use std::sync::Mutex;

use tracing::debug;

use medcalc_contracts::{
    audit::AuditRecord,
    error::{CalcError, CalcResult},
};
use medcalc_core::traits::AuditSink;

use crate::{
    chain::{hash_entry, verify_chain},
    event::AuditEntry,
};

#[derive(Debug)]
pub(crate) struct LogState {
    pub(crate) entries: VecDeque<AuditEntry>,
    next_sequence: u64,
    last_hash: String,
    /// Hash the oldest retained entry links to.
    anchor: String,
}

/// A ring buffer of hash-chained `AuditEntry` values.
///
/// ```rust,ignore
/// let log = InMemoryAuditLog::new(1000);
/// log.record(&record)?;
/// assert!(log.verify_integrity());
/// ```
#[derive(Debug)]
pub struct InMemoryAuditLog {
    capacity: usize,
    pub(crate) state: Mutex<LogState>,
}

impl InMemoryAuditLog {
    /// Create an empty log holding at most `capacity` entries.
    ///
    /// A capacity of 0 is raised to 1; `CalculatorConfig` already rejects it.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(LogState {
                entries: VecDeque::with_capacity(capacity.clamp(1, 1024)),
                next_sequence: 0,
                last_hash: AuditEntry::GENESIS_HASH.to_string(),
                anchor: AuditEntry::GENESIS_HASH.to_string(),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.lock().expect("audit state lock poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `n` most recent entries, oldest first.
    ///
    /// Returns fewer than `n` when the log holds fewer.
    pub fn recent(&self, n: usize) -> Vec<AuditEntry> {
        let state = self.state.lock().expect("audit state lock poisoned");
        let skip = state.entries.len().saturating_sub(n);
        state.entries.iter().skip(skip).cloned().collect()
    }

    /// Drop every retained entry.
    ///
    /// The chain continues: the next entry links to the last one cleared and
    /// sequence numbers are not reused.
    pub fn clear(&self) {
        let mut state = self.state.lock().expect("audit state lock poisoned");
        let dropped = state.entries.len();
        state.entries.clear();
        state.anchor = state.last_hash.clone();
        debug!(dropped, "audit log cleared");
    }

    /// Check the retained window's linkage and every entry's hash.
    pub fn verify_integrity(&self) -> bool {
        let state = self.state.lock().expect("audit state lock poisoned");
        verify_chain(&state.entries, &state.anchor)
    }

    /// Hash of the newest entry ever written, or `GENESIS_HASH` for a fresh log.
    pub fn head_hash(&self) -> String {
        self.state.lock().expect("audit state lock poisoned").last_hash.clone()
    }
}

impl AuditSink for InMemoryAuditLog {
    fn record(&self, record: &AuditRecord) -> CalcResult<()> {
        let mut state = self.state.lock().map_err(|e| CalcError::AuditWriteFailed {
            reason: format!("audit lock poisoned: {}", e),
        })?;

        let sequence = state.next_sequence;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_entry(sequence, record, &prev_hash);

        state.entries.push_back(AuditEntry {
            sequence,
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.next_sequence += 1;
        state.last_hash = this_hash;

        while state.entries.len() > self.capacity {
            if let Some(evicted) = state.entries.pop_front() {
                debug!(
                    sequence = evicted.sequence,
                    capacity = self.capacity,
                    "audit entry evicted"
                );
                state.anchor = evicted.this_hash;
            }
        }

        Ok(())
    }
}
