//! Persistence for the multisig store
//!
//! JSON snapshot save/load with rotating backups; used by the demo CLI
//! to keep wallet state between invocations.

pub mod persistence;

pub use persistence::{Storage, StorageConfig, StorageError};
