//! The authoritative multisig store
//!
//! All mutable state — account configs, transaction counters, ledgered
//! transactions, proposals — lives behind one explicit store handle
//! that every component receives, rather than a global singleton.
//! Index claims and vote recomputation are serialized per multisig
//! account, which is what makes concurrent appends gapless and
//! double-execution impossible.

pub mod multisig_store;

pub use multisig_store::{MultisigStore, StoreSnapshot};
