//! Proposal status tracking and recomputation

use crate::account::MultisigConfig;
use crate::error::MultisigError;
use crate::proposal::ballot::{Ballot, Vote};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Lifecycle status of a proposal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Created but not yet open for voting
    Draft,
    /// Open for voting
    Active,
    /// Approve ballots reached the threshold
    Approved,
    /// Reject ballots made the threshold unreachable
    Rejected,
    /// The underlying transaction was submitted; terminal
    Executed,
    /// Cancel ballots reached the threshold; terminal
    Cancelled,
}

impl ProposalStatus {
    /// Terminal states accept no further ballots
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ProposalStatus::Executed | ProposalStatus::Cancelled | ProposalStatus::Rejected
        )
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProposalStatus::Draft => "Draft",
            ProposalStatus::Active => "Active",
            ProposalStatus::Approved => "Approved",
            ProposalStatus::Rejected => "Rejected",
            ProposalStatus::Executed => "Executed",
            ProposalStatus::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

/// Recompute a proposal status from the latest ballot per member
///
/// Pure function of the ballot map, the threshold, and the number of
/// voting members; vote arrival order cannot influence the result.
/// Never yields `Draft` or `Executed`.
pub fn evaluate(
    ballots: &HashMap<String, Ballot>,
    threshold: u8,
    voting_members: usize,
) -> ProposalStatus {
    let threshold = threshold as usize;
    let approvals = ballots.values().filter(|b| b.vote == Vote::Approve).count();
    let rejections = ballots.values().filter(|b| b.vote == Vote::Reject).count();
    let cancels = ballots.values().filter(|b| b.vote == Vote::Cancel).count();

    if cancels >= threshold {
        ProposalStatus::Cancelled
    } else if approvals >= threshold {
        ProposalStatus::Approved
    } else if voting_members.saturating_sub(rejections) < threshold {
        // Even if every remaining voter approves, the threshold can no
        // longer be met.
        ProposalStatus::Rejected
    } else {
        ProposalStatus::Active
    }
}

/// A votable wrapper around one ledgered transaction
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    /// Address of the owning multisig account
    pub multisig: String,
    /// Index of the wrapped transaction
    pub transaction_index: u64,
    /// Current lifecycle status
    pub status: ProposalStatus,
    /// Latest ballot per member public key
    pub ballots: HashMap<String, Ballot>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// When status or ballots last changed
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// Create a proposal that is immediately open for voting
    pub fn new(multisig: String, transaction_index: u64) -> Self {
        Self::with_status(multisig, transaction_index, ProposalStatus::Active)
    }

    /// Create a staged proposal that must be activated before voting
    pub fn draft(multisig: String, transaction_index: u64) -> Self {
        Self::with_status(multisig, transaction_index, ProposalStatus::Draft)
    }

    fn with_status(multisig: String, transaction_index: u64, status: ProposalStatus) -> Self {
        let now = Utc::now();
        Self {
            multisig,
            transaction_index,
            status,
            ballots: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Open a draft proposal for voting
    pub fn activate(&mut self) -> Result<(), MultisigError> {
        match self.status {
            ProposalStatus::Draft => {
                self.status = ProposalStatus::Active;
                self.updated_at = Utc::now();
                Ok(())
            }
            ProposalStatus::Active => Ok(()),
            status => Err(MultisigError::AlreadyTerminal(status.to_string())),
        }
    }

    /// Record a signed ballot and recompute the status
    ///
    /// A member re-voting overwrites their previous ballot, so nothing
    /// is ever double counted.
    ///
    /// # Errors
    /// `NotActive` while the proposal is a draft, `AlreadyTerminal`
    /// once it is executed, cancelled or rejected, `UnauthorizedVoter`
    /// if the member lacks vote permission, `InvalidSignature` if the
    /// ballot does not verify against the transaction digest.
    pub fn cast(
        &mut self,
        ballot: Ballot,
        config: &MultisigConfig,
        tx_digest: &[u8],
    ) -> Result<ProposalStatus, MultisigError> {
        match self.status {
            ProposalStatus::Draft => return Err(MultisigError::NotActive),
            status if status.is_terminal() => {
                return Err(MultisigError::AlreadyTerminal(status.to_string()))
            }
            _ => {}
        }

        if !config.is_voter(&ballot.member) {
            return Err(MultisigError::UnauthorizedVoter(ballot.member.clone()));
        }

        if !ballot.verify(tx_digest)? {
            return Err(MultisigError::InvalidSignature);
        }

        self.ballots.insert(ballot.member.clone(), ballot);
        self.status = evaluate(&self.ballots, config.threshold, config.voting_member_count());
        self.updated_at = Utc::now();

        Ok(self.status)
    }

    /// Number of approve ballots currently recorded
    pub fn approval_count(&self) -> usize {
        self.ballots
            .values()
            .filter(|b| b.vote == Vote::Approve)
            .count()
    }

    /// The approve ballots, for assembly into the execution artifact
    pub fn approvals(&self) -> Vec<&Ballot> {
        self.ballots
            .values()
            .filter(|b| b.vote == Vote::Approve)
            .collect()
    }

    /// Mark the proposal executed; only the store's executor path calls
    /// this, after a successful submission.
    pub(crate) fn mark_executed(&mut self) {
        self.status = ProposalStatus::Executed;
        self.updated_at = Utc::now();
    }
}
