//! Vault transactions and their instruction payloads

use crate::crypto::sha256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One instruction inside a vault transaction payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Logical program or subsystem the instruction targets
    pub program: String,
    /// Accounts touched by the instruction, authorizer first
    pub accounts: Vec<String>,
    /// Opaque instruction data
    pub data: Vec<u8>,
}

impl Instruction {
    /// Build a system transfer instruction moving `amount` base units
    /// from `from` to `to`
    pub fn transfer(from: impl Into<String>, to: impl Into<String>, amount: u64) -> Self {
        Self {
            program: "system".to_string(),
            accounts: vec![from.into(), to.into()],
            data: amount.to_le_bytes().to_vec(),
        }
    }
}

/// An immutable, ledgered vault transaction
///
/// Created with the next free index of its multisig account; never
/// modified afterwards. Votes and execution state live on the
/// associated proposal, not here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultTransaction {
    /// Address of the owning multisig account
    pub multisig: String,
    /// Sequential index, unique within the multisig
    pub index: u64,
    /// Which spending vault authorizes the payload
    pub vault_index: u32,
    /// Ordered instruction payload
    pub instructions: Vec<Instruction>,
    /// Public key of the proposing member
    pub creator: String,
    /// Optional free-form note
    pub memo: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl VaultTransaction {
    /// Create a new transaction record
    pub fn new(
        multisig: String,
        index: u64,
        vault_index: u32,
        instructions: Vec<Instruction>,
        creator: String,
        memo: Option<String>,
    ) -> Self {
        Self {
            multisig,
            index,
            vault_index,
            instructions,
            creator,
            memo,
            created_at: Utc::now(),
        }
    }

    /// Digest over the transaction identity and payload
    ///
    /// This is what members sign when casting a ballot, so it must not
    /// include mutable fields.
    pub fn digest(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(self.multisig.as_bytes());
        data.extend_from_slice(&self.index.to_le_bytes());
        data.extend_from_slice(&self.vault_index.to_le_bytes());
        for ix in &self.instructions {
            data.extend_from_slice(ix.program.as_bytes());
            for account in &ix.accounts {
                data.extend_from_slice(account.as_bytes());
            }
            data.extend_from_slice(&ix.data);
        }
        sha256(&data)
    }
}
