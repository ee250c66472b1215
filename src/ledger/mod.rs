//! Transaction ledger types
//!
//! Each multisig account carries an append-only, monotonically indexed
//! log of proposed vault transactions. Records are immutable once
//! appended; index assignment itself lives in the store, which owns the
//! per-account counter.

pub mod transaction;

pub use transaction::{Instruction, VaultTransaction};
