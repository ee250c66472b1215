//! Multisig members and their permission bits

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Capabilities a member holds on a multisig account
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Permissions: u8 {
        /// May propose new transactions
        const INITIATE = 0b001;
        /// May vote on proposals; counts toward the threshold
        const VOTE = 0b010;
        /// May trigger execution of approved proposals
        const EXECUTE = 0b100;
    }
}

/// A single member of a multisig account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Public key of the member (hex, compressed secp256k1)
    pub key: String,
    /// Permission bits held by this member
    pub permissions: Permissions,
}

impl Member {
    /// Create a member with the given permissions
    pub fn new(key: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            key: key.into(),
            permissions,
        }
    }

    /// Create a member holding all permissions
    pub fn with_all_permissions(key: impl Into<String>) -> Self {
        Self::new(key, Permissions::all())
    }

    /// Whether this member may vote on proposals
    pub fn can_vote(&self) -> bool {
        self.permissions.contains(Permissions::VOTE)
    }

    /// Whether this member may propose transactions
    pub fn can_initiate(&self) -> bool {
        self.permissions.contains(Permissions::INITIATE)
    }

    /// Whether this member may execute approved proposals
    pub fn can_execute(&self) -> bool {
        self.permissions.contains(Permissions::EXECUTE)
    }
}
