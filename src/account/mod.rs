//! Multisig account configuration and address derivation
//!
//! A multisig account is created from an immutable creation key and a
//! member set with per-member permission bits. Its on-ledger address,
//! and the addresses of its spending vaults, are pure functions of that
//! creation key — the same inputs always land on the same addresses.
//!
//! # Example
//!
//! ```ignore
//! use quorum_multisig::account::{Member, MultisigConfig, Permissions};
//!
//! let members = vec![
//!     Member::new(creator_pubkey, Permissions::all()),
//!     Member::new(second_pubkey, Permissions::VOTE),
//! ];
//! let config = MultisigConfig::new(create_key, members, 2, None)?;
//! let vault = config.vault(0);
//! ```

pub mod config;
pub mod member;
pub mod vault;

pub use config::MultisigConfig;
pub use member::{Member, Permissions};
pub use vault::vault_address;
