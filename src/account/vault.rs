//! Spending vault address derivation
//!
//! Vaults are never stored: a vault address is a pure function of the
//! owning multisig account address and a vault index.

use crate::crypto::base58check;

/// Seed prefix for vault addresses
const VAULT_SEED: &[u8] = b"vault";

/// Derive the address of spending vault `index` under a multisig account
pub fn vault_address(multisig_address: &str, index: u32) -> String {
    let mut seed = VAULT_SEED.to_vec();
    seed.extend_from_slice(multisig_address.as_bytes());
    seed.extend_from_slice(&index.to_le_bytes());
    base58check(0x05, &seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_determinism() {
        let a = vault_address("3MultisigAddr", 0);
        let b = vault_address("3MultisigAddr", 0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_vault_index_separation() {
        let v0 = vault_address("3MultisigAddr", 0);
        let v1 = vault_address("3MultisigAddr", 1);
        assert_ne!(v0, v1);
    }

    #[test]
    fn test_vault_owner_separation() {
        let a = vault_address("3MultisigA", 0);
        let b = vault_address("3MultisigB", 0);
        assert_ne!(a, b);
    }
}
