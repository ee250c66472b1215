//! Signed ballots cast by multisig members

use crate::crypto::{public_key_from_hex, sha256, verify_signature, KeyPair};
use crate::error::MultisigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A member's choice on a proposal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    /// Count toward the approval threshold
    Approve,
    /// Count against reachability of the threshold
    Reject,
    /// Count toward cancelling the proposal
    Cancel,
}

impl Vote {
    /// Domain-separation tag mixed into the signed digest
    fn tag(self) -> u8 {
        match self {
            Vote::Approve => 0,
            Vote::Reject => 1,
            Vote::Cancel => 2,
        }
    }
}

/// A single signed ballot
///
/// The signature covers the transaction digest and the vote tag, so a
/// captured approve ballot cannot be replayed as a reject.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ballot {
    /// Public key of the voting member (hex)
    pub member: String,
    /// The member's choice
    pub vote: Vote,
    /// Signature over the ballot digest (hex)
    pub signature: String,
    /// When the ballot was signed
    pub signed_at: DateTime<Utc>,
}

impl Ballot {
    /// Sign a ballot for the given transaction digest
    pub fn sign(key_pair: &KeyPair, tx_digest: &[u8], vote: Vote) -> Result<Self, MultisigError> {
        let digest = Self::ballot_digest(tx_digest, vote);
        let signature = key_pair.sign(&digest)?;

        Ok(Self {
            member: key_pair.public_key_hex(),
            vote,
            signature: hex::encode(signature),
            signed_at: Utc::now(),
        })
    }

    /// Verify this ballot against a transaction digest
    pub fn verify(&self, tx_digest: &[u8]) -> Result<bool, MultisigError> {
        let pubkey = public_key_from_hex(&self.member)?;
        let sig_bytes =
            hex::decode(&self.signature).map_err(|_| MultisigError::InvalidSignature)?;
        let digest = Self::ballot_digest(tx_digest, self.vote);
        Ok(verify_signature(&pubkey, &digest, &sig_bytes)?)
    }

    fn ballot_digest(tx_digest: &[u8], vote: Vote) -> Vec<u8> {
        let mut data = tx_digest.to_vec();
        data.push(vote.tag());
        sha256(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify_ballot() {
        let kp = KeyPair::generate();
        let tx_digest = sha256(b"tx");

        let ballot = Ballot::sign(&kp, &tx_digest, Vote::Approve).unwrap();
        assert!(ballot.verify(&tx_digest).unwrap());
    }

    #[test]
    fn test_vote_tag_bound_to_signature() {
        let kp = KeyPair::generate();
        let tx_digest = sha256(b"tx");

        // An approve signature must not verify as a reject ballot
        let mut ballot = Ballot::sign(&kp, &tx_digest, Vote::Approve).unwrap();
        ballot.vote = Vote::Reject;
        assert!(!ballot.verify(&tx_digest).unwrap());
    }

    #[test]
    fn test_wrong_transaction_rejected() {
        let kp = KeyPair::generate();
        let ballot = Ballot::sign(&kp, &sha256(b"tx1"), Vote::Approve).unwrap();
        assert!(!ballot.verify(&sha256(b"tx2")).unwrap());
    }
}
