//! Submitter trait and execution artifacts

use crate::crypto::sha256_hex;
use crate::ledger::Instruction;
use crate::proposal::Ballot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a submitter can report
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Submission timed out")]
    Timeout,
    #[error("Submission rejected: {0}")]
    Rejected(String),
    #[error("Transport error: {0}")]
    Transport(String),
}

/// The fully authorized artifact handed to a submitter
///
/// Carries the vault acting as the authorizing account, the ordered
/// instruction payload, and the approve ballots that justify it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedInstructionSet {
    /// Address of the authorizing vault
    pub vault: String,
    /// Ordered instructions to submit as one atomic unit
    pub instructions: Vec<Instruction>,
    /// Approve ballots that met the threshold
    pub approvals: Vec<Ballot>,
}

impl SignedInstructionSet {
    /// Stable identifier over the submitted payload
    pub fn id(&self) -> String {
        let mut data = self.vault.as_bytes().to_vec();
        for ix in &self.instructions {
            data.extend_from_slice(ix.program.as_bytes());
            for account in &ix.accounts {
                data.extend_from_slice(account.as_bytes());
            }
            data.extend_from_slice(&ix.data);
        }
        sha256_hex(&data)
    }
}

/// Proof that a submission was accepted
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Receipt {
    /// Submission identifier reported by the external system
    pub signature: String,
    /// When the submission was accepted
    pub submitted_at: DateTime<Utc>,
}

impl Receipt {
    /// Create a receipt for the given submission identifier
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            submitted_at: Utc::now(),
        }
    }
}

/// External transaction submission interface
///
/// Implementations must submit the instruction set as a single atomic
/// unit and bound their own timeout; the engine retries safely because
/// execution is gated by an idempotent status check.
pub trait Submitter {
    /// Submit the instruction set, returning a receipt on acceptance
    fn submit(&self, set: &SignedInstructionSet) -> Result<Receipt, SubmitError>;
}

/// Submitter that only logs the payload
///
/// Stands in for a real ledger connection in the demo binary and in
/// tests; always accepts and derives the receipt id from the payload.
#[derive(Debug, Default)]
pub struct LoggingSubmitter;

impl Submitter for LoggingSubmitter {
    fn submit(&self, set: &SignedInstructionSet) -> Result<Receipt, SubmitError> {
        log::info!(
            "Submitting {} instruction(s) authorized by vault {} with {} approval(s)",
            set.instructions.len(),
            set.vault,
            set.approvals.len()
        );
        Ok(Receipt::new(set.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_set_id_deterministic() {
        let set = SignedInstructionSet {
            vault: "vault_addr".to_string(),
            instructions: vec![Instruction::transfer("vault_addr", "to", 10)],
            approvals: vec![],
        };
        assert_eq!(set.id(), set.id());

        let other = SignedInstructionSet {
            vault: "vault_addr".to_string(),
            instructions: vec![Instruction::transfer("vault_addr", "to", 11)],
            approvals: vec![],
        };
        assert_ne!(set.id(), other.id());
    }

    #[test]
    fn test_logging_submitter_accepts() {
        let set = SignedInstructionSet {
            vault: "vault_addr".to_string(),
            instructions: vec![Instruction::transfer("vault_addr", "to", 10)],
            approvals: vec![],
        };
        let receipt = LoggingSubmitter.submit(&set).unwrap();
        assert_eq!(receipt.signature, set.id());
    }
}
