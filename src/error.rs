//! Errors shared across the multisig engine

use thiserror::Error;

/// Errors surfaced by multisig operations
#[derive(Error, Debug)]
pub enum MultisigError {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("Duplicate member public key")]
    DuplicateMember,
    #[error("Multisig not found: {0}")]
    MultisigNotFound(String),
    #[error("Transaction not found: index {0}")]
    TransactionNotFound(u64),
    #[error("Stale transaction index: expected {expected}, next is {next}")]
    StaleIndex { expected: u64, next: u64 },
    #[error("Transaction has no instructions")]
    EmptyTransaction,
    #[error("Creator not authorized to propose: {0}")]
    UnauthorizedCreator(String),
    #[error("Member not authorized to vote: {0}")]
    UnauthorizedVoter(String),
    #[error("Member not authorized to execute: {0}")]
    UnauthorizedExecutor(String),
    #[error("Invalid ballot signature")]
    InvalidSignature,
    #[error("Proposal is not active yet")]
    NotActive,
    #[error("Proposal already terminal: {0}")]
    AlreadyTerminal(String),
    #[error("Proposal not approved: status is {0}")]
    NotApproved(String),
    #[error("Execution failed: {0}")]
    ExecutionFailure(String),
    #[error("Key error: {0}")]
    KeyError(#[from] crate::crypto::KeyError),
}
