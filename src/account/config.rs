//! Multisig account configuration

use crate::account::member::Member;
use crate::account::vault::vault_address;
use crate::crypto::base58check;
use crate::error::MultisigError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seed prefix for multisig account addresses
const MULTISIG_SEED: &[u8] = b"multisig";

/// Configuration of one multisig account
///
/// The creation key is the account's immutable identity seed: the
/// account address is derived from it, so re-creating with the same
/// key always resolves to the same account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultisigConfig {
    /// Derived account address
    pub address: String,
    /// Immutable identity seed (hex public key or opaque string)
    pub creation_key: String,
    /// Ordered member set
    pub members: Vec<Member>,
    /// Minimum approve-votes required to authorize execution
    pub threshold: u8,
    /// Monotonically increasing transaction counter, starts at 0
    pub transaction_index: u64,
    /// Optional authority allowed to change the config
    pub config_authority: Option<String>,
    /// Optional collector for reclaimed account rent
    pub rent_collector: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl MultisigConfig {
    /// Create a new multisig configuration
    ///
    /// # Errors
    /// Returns `InvalidThreshold` if the threshold is 0 or exceeds the
    /// number of members holding vote permission, `DuplicateMember` if
    /// a member key appears twice.
    pub fn new(
        creation_key: impl Into<String>,
        members: Vec<Member>,
        threshold: u8,
        config_authority: Option<String>,
    ) -> Result<Self, MultisigError> {
        let voting_members = members.iter().filter(|m| m.can_vote()).count();

        if threshold == 0 {
            return Err(MultisigError::InvalidThreshold(
                "threshold must be at least 1".to_string(),
            ));
        }

        if threshold as usize > voting_members {
            return Err(MultisigError::InvalidThreshold(format!(
                "threshold {} exceeds voting member count {}",
                threshold, voting_members
            )));
        }

        let mut keys: Vec<&str> = members.iter().map(|m| m.key.as_str()).collect();
        keys.sort_unstable();
        for i in 1..keys.len() {
            if keys[i] == keys[i - 1] {
                return Err(MultisigError::DuplicateMember);
            }
        }

        let creation_key = creation_key.into();
        let address = Self::derive_address(&creation_key);

        Ok(Self {
            address,
            creation_key,
            members,
            threshold,
            transaction_index: 0,
            config_authority,
            rent_collector: None,
            created_at: Utc::now(),
        })
    }

    /// Derive the account address for a creation key
    ///
    /// Pure function: the same creation key always yields the same
    /// address.
    pub fn derive_address(creation_key: &str) -> String {
        let mut seed = MULTISIG_SEED.to_vec();
        seed.extend_from_slice(creation_key.as_bytes());
        base58check(0x05, &seed)
    }

    /// Derive the address of spending vault `index` under this account
    pub fn vault(&self, index: u32) -> String {
        vault_address(&self.address, index)
    }

    /// Look up a member by public key
    pub fn member(&self, key: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.key == key)
    }

    /// Whether the given key belongs to a member with vote permission
    pub fn is_voter(&self, key: &str) -> bool {
        self.member(key).is_some_and(Member::can_vote)
    }

    /// Whether the given key belongs to a member allowed to propose
    pub fn is_initiator(&self, key: &str) -> bool {
        self.member(key).is_some_and(Member::can_initiate)
    }

    /// Number of members holding vote permission
    pub fn voting_member_count(&self) -> usize {
        self.members.iter().filter(|m| m.can_vote()).count()
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.threshold, self.voting_member_count())
    }
}
