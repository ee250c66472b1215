//! Quorum-Multisig: a threshold multisig wallet engine in Rust
//!
//! This crate provides the full approval workflow of an M-of-N
//! multisig wallet:
//! - Deterministic account and spending-vault address derivation from
//!   an immutable creation key
//! - Member sets with per-member permission bits (initiate, vote,
//!   execute)
//! - An append-only, monotonically indexed transaction ledger per
//!   account
//! - A proposal state machine collecting signed ballots, with an
//!   order-independent threshold outcome
//! - Idempotent, retry-safe execution through a pluggable submitter
//! - JSON persistence with rotating backups
//!
//! # Example
//!
//! ```rust
//! use quorum_multisig::account::{Member, Permissions};
//! use quorum_multisig::crypto::KeyPair;
//! use quorum_multisig::executor::LoggingSubmitter;
//! use quorum_multisig::ledger::Instruction;
//! use quorum_multisig::proposal::{Ballot, Vote};
//! use quorum_multisig::store::MultisigStore;
//!
//! let creator = KeyPair::generate();
//! let second = KeyPair::generate();
//!
//! // Create a 2-of-2 multisig wallet
//! let store = MultisigStore::new();
//! let config = store
//!     .create_multisig(
//!         "creation-key",
//!         vec![
//!             Member::with_all_permissions(creator.public_key_hex()),
//!             Member::new(second.public_key_hex(), Permissions::VOTE),
//!         ],
//!         2,
//!         None,
//!     )
//!     .unwrap();
//!
//! // Propose a transfer out of vault 0
//! let transfer = Instruction::transfer(config.vault(0), creator.address(), 100_000_000);
//! let tx = store
//!     .append_transaction(&config.address, 0, vec![transfer],
//!         &creator.public_key_hex(), Some("Transfer to creator".into()))
//!     .unwrap();
//!
//! // Collect approvals and execute
//! let digest = tx.digest();
//! for key in [&creator, &second] {
//!     let ballot = Ballot::sign(key, &digest, Vote::Approve).unwrap();
//!     store.cast_vote(&config.address, tx.index, ballot).unwrap();
//! }
//! let receipt = store
//!     .execute_proposal(&config.address, tx.index,
//!         &creator.public_key_hex(), &LoggingSubmitter)
//!     .unwrap();
//! println!("Executed: {}", receipt.signature);
//! ```

pub mod account;
pub mod cli;
pub mod crypto;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod proposal;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use account::{vault_address, Member, MultisigConfig, Permissions};
pub use crypto::KeyPair;
pub use error::MultisigError;
pub use executor::{LoggingSubmitter, Receipt, SignedInstructionSet, Submitter};
pub use ledger::{Instruction, VaultTransaction};
pub use proposal::{Ballot, Proposal, ProposalStatus, Vote};
pub use storage::{Storage, StorageConfig};
pub use store::MultisigStore;
