//! # medcalc-audit
//!
//! Bounded, hash-chained audit log for calculator invocations.
//!
//! Every invocation the orchestrator runs ends in one `AuditRecord`. This
//! crate stores those records in a fixed-capacity ring buffer, linking each
//! entry to its predecessor by SHA-256 so that any edit to a retained entry
//! is detectable.
//!
//! ## Tamper evidence
//!
//! Each entry's hash covers its sequence number, the previous entry's hash
//! and the record's JSON. `verify_integrity()` recomputes every retained
//! hash and checks the links, starting from the hash of the last evicted
//! entry (or the genesis hash if nothing has been evicted yet).

pub mod chain;
pub mod event;
pub mod memory;

pub use event::AuditEntry;
pub use memory::InMemoryAuditLog;
