//! Store for multisig accounts, transactions and proposals

use crate::account::{Member, MultisigConfig};
use crate::error::MultisigError;
use crate::executor::{Receipt, SignedInstructionSet, Submitter};
use crate::ledger::{Instruction, VaultTransaction};
use crate::proposal::{Ballot, Proposal, ProposalStatus};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Everything the store holds for one multisig account
///
/// Guarded by a single mutex, so counter bumps, ballot writes and
/// execution on the same account never interleave.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountEntry {
    config: MultisigConfig,
    transactions: BTreeMap<u64, VaultTransaction>,
    proposals: BTreeMap<u64, Proposal>,
    receipts: BTreeMap<u64, Receipt>,
}

impl AccountEntry {
    fn new(config: MultisigConfig) -> Self {
        Self {
            config,
            transactions: BTreeMap::new(),
            proposals: BTreeMap::new(),
            receipts: BTreeMap::new(),
        }
    }
}

/// Serializable snapshot of the whole store
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreSnapshot {
    accounts: Vec<AccountEntry>,
}

/// The authoritative store handle
///
/// The outer map is only locked to resolve an address to its account
/// entry; all state changes happen under the entry's own mutex.
#[derive(Debug, Default)]
pub struct MultisigStore {
    accounts: RwLock<HashMap<String, Arc<Mutex<AccountEntry>>>>,
}

impl MultisigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let accounts = snapshot
            .accounts
            .into_iter()
            .map(|entry| (entry.config.address.clone(), Arc::new(Mutex::new(entry))))
            .collect();
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    /// Capture a snapshot for persistence
    pub fn snapshot(&self) -> StoreSnapshot {
        let accounts = self.read_accounts();
        let mut entries: Vec<AccountEntry> = accounts
            .values()
            .map(|entry| lock(entry).clone())
            .collect();
        entries.sort_by(|a, b| a.config.address.cmp(&b.config.address));
        StoreSnapshot { accounts: entries }
    }

    /// Create a new multisig account
    ///
    /// The account address is derived from the creation key, so
    /// re-creating with the same key returns the existing account.
    pub fn create_multisig(
        &self,
        creation_key: impl Into<String>,
        members: Vec<Member>,
        threshold: u8,
        config_authority: Option<String>,
    ) -> Result<MultisigConfig, MultisigError> {
        let config = MultisigConfig::new(creation_key, members, threshold, config_authority)?;

        let mut accounts = self
            .accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = accounts.get(&config.address) {
            return Ok(lock(existing).config.clone());
        }

        log::info!(
            "Created multisig {} ({})",
            config.address,
            config.description()
        );
        accounts.insert(
            config.address.clone(),
            Arc::new(Mutex::new(AccountEntry::new(config.clone()))),
        );
        Ok(config)
    }

    /// Read a multisig configuration
    pub fn get_config(&self, address: &str) -> Result<MultisigConfig, MultisigError> {
        let entry = self.entry(address)?;
        let guard = lock(&entry);
        Ok(guard.config.clone())
    }

    /// List all multisig configurations
    pub fn list_multisigs(&self) -> Vec<MultisigConfig> {
        let accounts = self.read_accounts();
        let mut configs: Vec<MultisigConfig> = accounts
            .values()
            .map(|entry| lock(entry).config.clone())
            .collect();
        configs.sort_by(|a, b| a.address.cmp(&b.address));
        configs
    }

    /// The index the next appended transaction will receive
    pub fn next_transaction_index(&self, address: &str) -> Result<u64, MultisigError> {
        Ok(self.get_config(address)?.transaction_index + 1)
    }

    /// Append a transaction and open its proposal for voting
    ///
    /// Claims `transaction_index + 1` and bumps the counter atomically
    /// under the account lock; concurrent appends therefore receive
    /// distinct, strictly increasing, gapless indices.
    pub fn append_transaction(
        &self,
        address: &str,
        vault_index: u32,
        instructions: Vec<Instruction>,
        creator: &str,
        memo: Option<String>,
    ) -> Result<VaultTransaction, MultisigError> {
        self.append_inner(address, None, vault_index, instructions, creator, memo, false)
    }

    /// Append a transaction whose proposal starts as a draft
    pub fn append_draft_transaction(
        &self,
        address: &str,
        vault_index: u32,
        instructions: Vec<Instruction>,
        creator: &str,
        memo: Option<String>,
    ) -> Result<VaultTransaction, MultisigError> {
        self.append_inner(address, None, vault_index, instructions, creator, memo, true)
    }

    /// Append at a precomputed index
    ///
    /// For callers that read the counter first and compute
    /// `transaction_index + 1` themselves; fails with `StaleIndex` if a
    /// concurrent append claimed that index in between. Recover by
    /// re-reading the counter and reattempting, or use
    /// [`append_transaction`](Self::append_transaction), which claims
    /// the next index atomically.
    pub fn append_transaction_at(
        &self,
        address: &str,
        expected_index: u64,
        vault_index: u32,
        instructions: Vec<Instruction>,
        creator: &str,
        memo: Option<String>,
    ) -> Result<VaultTransaction, MultisigError> {
        self.append_inner(
            address,
            Some(expected_index),
            vault_index,
            instructions,
            creator,
            memo,
            false,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn append_inner(
        &self,
        address: &str,
        expected_index: Option<u64>,
        vault_index: u32,
        instructions: Vec<Instruction>,
        creator: &str,
        memo: Option<String>,
        draft: bool,
    ) -> Result<VaultTransaction, MultisigError> {
        if instructions.is_empty() {
            return Err(MultisigError::EmptyTransaction);
        }

        let entry = self.entry(address)?;
        let mut guard = lock(&entry);

        if !guard.config.is_initiator(creator) {
            return Err(MultisigError::UnauthorizedCreator(creator.to_string()));
        }

        let next = guard.config.transaction_index + 1;
        if let Some(expected) = expected_index {
            if expected != next {
                return Err(MultisigError::StaleIndex { expected, next });
            }
        }

        let transaction = VaultTransaction::new(
            guard.config.address.clone(),
            next,
            vault_index,
            instructions,
            creator.to_string(),
            memo,
        );

        let proposal = if draft {
            Proposal::draft(guard.config.address.clone(), next)
        } else {
            Proposal::new(guard.config.address.clone(), next)
        };

        guard.config.transaction_index = next;
        guard.transactions.insert(next, transaction.clone());
        guard.proposals.insert(next, proposal);

        log::debug!("Appended transaction {} on multisig {}", next, address);
        Ok(transaction)
    }

    /// Read a ledgered transaction
    pub fn get_transaction(
        &self,
        address: &str,
        index: u64,
    ) -> Result<VaultTransaction, MultisigError> {
        let entry = self.entry(address)?;
        let guard = lock(&entry);
        guard
            .transactions
            .get(&index)
            .cloned()
            .ok_or(MultisigError::TransactionNotFound(index))
    }

    /// Read a proposal
    pub fn get_proposal(&self, address: &str, index: u64) -> Result<Proposal, MultisigError> {
        let entry = self.entry(address)?;
        let guard = lock(&entry);
        guard
            .proposals
            .get(&index)
            .cloned()
            .ok_or(MultisigError::TransactionNotFound(index))
    }

    /// Open a draft proposal for voting
    pub fn activate_proposal(&self, address: &str, index: u64) -> Result<(), MultisigError> {
        let entry = self.entry(address)?;
        let mut guard = lock(&entry);
        guard
            .proposals
            .get_mut(&index)
            .ok_or(MultisigError::TransactionNotFound(index))?
            .activate()
    }

    /// Record a signed ballot on a proposal and recompute its status
    ///
    /// The whole vote-then-recompute step runs under the account lock,
    /// so concurrent voters cannot lose updates.
    pub fn cast_vote(
        &self,
        address: &str,
        index: u64,
        ballot: Ballot,
    ) -> Result<ProposalStatus, MultisigError> {
        let entry = self.entry(address)?;
        let mut guard = lock(&entry);
        let entry = &mut *guard;

        let digest = entry
            .transactions
            .get(&index)
            .ok_or(MultisigError::TransactionNotFound(index))?
            .digest();
        let proposal = entry
            .proposals
            .get_mut(&index)
            .ok_or(MultisigError::TransactionNotFound(index))?;

        let member = ballot.member.clone();
        let status = proposal.cast(ballot, &entry.config, &digest)?;
        log::debug!(
            "Vote by {} on {}/{} -> {}",
            member,
            address,
            index,
            status
        );
        Ok(status)
    }

    /// Execute an approved proposal through the given submitter
    ///
    /// Idempotent: an already executed proposal returns its recorded
    /// receipt without resubmitting. Submission failure leaves the
    /// proposal approved and retryable. The account lock is held across
    /// the submission, so a proposal can never be submitted twice even
    /// under concurrent execute calls.
    pub fn execute_proposal(
        &self,
        address: &str,
        index: u64,
        executor: &str,
        submitter: &dyn Submitter,
    ) -> Result<Receipt, MultisigError> {
        let entry = self.entry(address)?;
        let mut guard = lock(&entry);
        let entry = &mut *guard;

        if !entry
            .config
            .member(executor)
            .is_some_and(Member::can_execute)
        {
            return Err(MultisigError::UnauthorizedExecutor(executor.to_string()));
        }

        let proposal = entry
            .proposals
            .get_mut(&index)
            .ok_or(MultisigError::TransactionNotFound(index))?;

        match proposal.status {
            ProposalStatus::Executed => {
                // Receipt is recorded in the same critical section that
                // marks the proposal executed, so it must be present.
                return entry
                    .receipts
                    .get(&index)
                    .cloned()
                    .ok_or(MultisigError::TransactionNotFound(index));
            }
            ProposalStatus::Approved => {}
            status => return Err(MultisigError::NotApproved(status.to_string())),
        }

        let transaction = entry
            .transactions
            .get(&index)
            .ok_or(MultisigError::TransactionNotFound(index))?;

        let set = SignedInstructionSet {
            vault: entry.config.vault(transaction.vault_index),
            instructions: transaction.instructions.clone(),
            approvals: proposal.approvals().into_iter().cloned().collect(),
        };

        let receipt = submitter
            .submit(&set)
            .map_err(|e| MultisigError::ExecutionFailure(e.to_string()))?;

        proposal.mark_executed();
        entry.receipts.insert(index, receipt.clone());
        log::info!(
            "Executed proposal {}/{}: {}",
            address,
            index,
            receipt.signature
        );
        Ok(receipt)
    }

    fn entry(&self, address: &str) -> Result<Arc<Mutex<AccountEntry>>, MultisigError> {
        let accounts = self.read_accounts();
        accounts
            .get(address)
            .cloned()
            .ok_or_else(|| MultisigError::MultisigNotFound(address.to_string()))
    }

    fn read_accounts(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Mutex<AccountEntry>>>> {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock(entry: &Arc<Mutex<AccountEntry>>) -> std::sync::MutexGuard<'_, AccountEntry> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Permissions;
    use crate::crypto::KeyPair;
    use crate::executor::{LoggingSubmitter, SubmitError};
    use crate::proposal::Vote;
    use std::thread;

    struct FailingSubmitter;

    impl Submitter for FailingSubmitter {
        fn submit(&self, _set: &SignedInstructionSet) -> Result<Receipt, SubmitError> {
            Err(SubmitError::Timeout)
        }
    }

    fn setup(n: usize, threshold: u8) -> (MultisigStore, MultisigConfig, Vec<KeyPair>) {
        let keys: Vec<KeyPair> = (0..n).map(|_| KeyPair::generate()).collect();
        let members: Vec<Member> = keys
            .iter()
            .map(|k| Member::with_all_permissions(k.public_key_hex()))
            .collect();

        let store = MultisigStore::new();
        let config = store
            .create_multisig("create_key", members, threshold, None)
            .unwrap();
        (store, config, keys)
    }

    fn propose_transfer(
        store: &MultisigStore,
        config: &MultisigConfig,
        creator: &KeyPair,
    ) -> VaultTransaction {
        let vault = config.vault(0);
        let ix = Instruction::transfer(vault, "recipient", 100_000_000);
        store
            .append_transaction(
                &config.address,
                0,
                vec![ix],
                &creator.public_key_hex(),
                Some("Transfer 0.1 to recipient".to_string()),
            )
            .unwrap()
    }

    fn approve(
        store: &MultisigStore,
        config: &MultisigConfig,
        index: u64,
        key: &KeyPair,
    ) -> ProposalStatus {
        let digest = store.get_transaction(&config.address, index).unwrap().digest();
        let ballot = Ballot::sign(key, &digest, Vote::Approve).unwrap();
        store.cast_vote(&config.address, index, ballot).unwrap()
    }

    #[test]
    fn test_create_is_idempotent_per_creation_key() {
        let (store, config, _) = setup(3, 2);

        let members: Vec<Member> = config.members.clone();
        let again = store
            .create_multisig("create_key", members, 2, None)
            .unwrap();
        assert_eq!(config.address, again.address);
        assert_eq!(store.list_multisigs().len(), 1);
    }

    #[test]
    fn test_append_assigns_sequential_indices() {
        let (store, config, keys) = setup(2, 2);

        let tx1 = propose_transfer(&store, &config, &keys[0]);
        let tx2 = propose_transfer(&store, &config, &keys[0]);
        assert_eq!(tx1.index, 1);
        assert_eq!(tx2.index, 2);
        assert_eq!(store.next_transaction_index(&config.address).unwrap(), 3);

        // Both proposals open for voting
        assert_eq!(
            store.get_proposal(&config.address, 1).unwrap().status,
            ProposalStatus::Active
        );
        assert_eq!(
            store.get_proposal(&config.address, 2).unwrap().status,
            ProposalStatus::Active
        );
    }

    #[test]
    fn test_append_at_stale_index() {
        let (store, config, keys) = setup(2, 2);
        let creator = keys[0].public_key_hex();
        let ix = || vec![Instruction::transfer(config.vault(0), "to", 10)];

        // Both callers read the counter, both compute index 1
        let expected = store.next_transaction_index(&config.address).unwrap();
        store
            .append_transaction_at(&config.address, expected, 0, ix(), &creator, None)
            .unwrap();

        let err = store
            .append_transaction_at(&config.address, expected, 0, ix(), &creator, None)
            .unwrap_err();
        assert!(matches!(
            err,
            MultisigError::StaleIndex {
                expected: 1,
                next: 2
            }
        ));

        // Recovery: re-read the counter and reattempt
        let expected = store.next_transaction_index(&config.address).unwrap();
        let tx = store
            .append_transaction_at(&config.address, expected, 0, ix(), &creator, None)
            .unwrap();
        assert_eq!(tx.index, 2);
    }

    #[test]
    fn test_concurrent_appends_gapless() {
        let (store, config, keys) = setup(2, 2);
        let store = Arc::new(store);
        let creator = keys[0].public_key_hex();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let address = config.address.clone();
                let vault = config.vault(0);
                let creator = creator.clone();
                thread::spawn(move || {
                    let ix = Instruction::transfer(vault, "to", 10);
                    store
                        .append_transaction(&address, 0, vec![ix], &creator, None)
                        .unwrap()
                        .index
                })
            })
            .collect();

        let mut indices: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        indices.sort_unstable();
        assert_eq!(indices, (1..=8).collect::<Vec<u64>>());
    }

    #[test]
    fn test_unknown_multisig() {
        let store = MultisigStore::new();
        assert!(matches!(
            store.get_config("nowhere"),
            Err(MultisigError::MultisigNotFound(_))
        ));
    }

    #[test]
    fn test_transaction_not_found() {
        let (store, config, _) = setup(2, 2);
        assert!(matches!(
            store.get_transaction(&config.address, 1),
            Err(MultisigError::TransactionNotFound(1))
        ));
    }

    #[test]
    fn test_unauthorized_creator() {
        let (store, config, _) = setup(2, 2);
        let outsider = KeyPair::generate();
        let ix = Instruction::transfer(config.vault(0), "to", 10);
        assert!(matches!(
            store.append_transaction(&config.address, 0, vec![ix], &outsider.public_key_hex(), None),
            Err(MultisigError::UnauthorizedCreator(_))
        ));
    }

    #[test]
    fn test_empty_transaction_rejected() {
        let (store, config, keys) = setup(2, 2);
        assert!(matches!(
            store.append_transaction(&config.address, 0, vec![], &keys[0].public_key_hex(), None),
            Err(MultisigError::EmptyTransaction)
        ));
    }

    #[test]
    fn test_vote_only_member_cannot_propose() {
        let keys: Vec<KeyPair> = (0..2).map(|_| KeyPair::generate()).collect();
        let members = vec![
            Member::with_all_permissions(keys[0].public_key_hex()),
            Member::new(keys[1].public_key_hex(), Permissions::VOTE),
        ];
        let store = MultisigStore::new();
        let config = store.create_multisig("k", members, 2, None).unwrap();

        let ix = Instruction::transfer(config.vault(0), "to", 10);
        assert!(matches!(
            store.append_transaction(&config.address, 0, vec![ix], &keys[1].public_key_hex(), None),
            Err(MultisigError::UnauthorizedCreator(_))
        ));
    }

    #[test]
    fn test_full_two_of_two_workflow() {
        let (store, config, keys) = setup(2, 2);
        let tx = propose_transfer(&store, &config, &keys[0]);

        assert_eq!(approve(&store, &config, tx.index, &keys[0]), ProposalStatus::Active);
        assert_eq!(
            approve(&store, &config, tx.index, &keys[1]),
            ProposalStatus::Approved
        );

        let executor = keys[0].public_key_hex();
        let receipt = store
            .execute_proposal(&config.address, tx.index, &executor, &LoggingSubmitter)
            .unwrap();
        assert_eq!(
            store.get_proposal(&config.address, tx.index).unwrap().status,
            ProposalStatus::Executed
        );

        // Second execute is a no-op success returning the same receipt
        let again = store
            .execute_proposal(&config.address, tx.index, &executor, &LoggingSubmitter)
            .unwrap();
        assert_eq!(receipt.signature, again.signature);
    }

    #[test]
    fn test_execute_requires_approval() {
        let (store, config, keys) = setup(2, 2);
        let tx = propose_transfer(&store, &config, &keys[0]);
        let executor = keys[0].public_key_hex();

        let err = store
            .execute_proposal(&config.address, tx.index, &executor, &LoggingSubmitter)
            .unwrap_err();
        assert!(matches!(err, MultisigError::NotApproved(_)));

        approve(&store, &config, tx.index, &keys[0]);
        let err = store
            .execute_proposal(&config.address, tx.index, &executor, &LoggingSubmitter)
            .unwrap_err();
        assert!(matches!(err, MultisigError::NotApproved(_)));
    }

    #[test]
    fn test_failed_execution_is_retryable() {
        let (store, config, keys) = setup(2, 2);
        let tx = propose_transfer(&store, &config, &keys[0]);
        approve(&store, &config, tx.index, &keys[0]);
        approve(&store, &config, tx.index, &keys[1]);
        let executor = keys[0].public_key_hex();

        let err = store
            .execute_proposal(&config.address, tx.index, &executor, &FailingSubmitter)
            .unwrap_err();
        assert!(matches!(err, MultisigError::ExecutionFailure(_)));

        // Proposal stays approved; a later retry succeeds
        assert_eq!(
            store.get_proposal(&config.address, tx.index).unwrap().status,
            ProposalStatus::Approved
        );
        store
            .execute_proposal(&config.address, tx.index, &executor, &LoggingSubmitter)
            .unwrap();
    }

    #[test]
    fn test_execute_requires_execute_permission() {
        let keys: Vec<KeyPair> = (0..2).map(|_| KeyPair::generate()).collect();
        let members = vec![
            Member::with_all_permissions(keys[0].public_key_hex()),
            Member::new(keys[1].public_key_hex(), Permissions::VOTE),
        ];
        let store = MultisigStore::new();
        let config = store.create_multisig("k", members, 2, None).unwrap();
        let tx = propose_transfer(&store, &config, &keys[0]);
        approve(&store, &config, tx.index, &keys[0]);
        approve(&store, &config, tx.index, &keys[1]);

        let err = store
            .execute_proposal(
                &config.address,
                tx.index,
                &keys[1].public_key_hex(),
                &LoggingSubmitter,
            )
            .unwrap_err();
        assert!(matches!(err, MultisigError::UnauthorizedExecutor(_)));
    }

    #[test]
    fn test_draft_proposal_flow() {
        let (store, config, keys) = setup(2, 2);
        let ix = Instruction::transfer(config.vault(0), "to", 10);
        let tx = store
            .append_draft_transaction(&config.address, 0, vec![ix], &keys[0].public_key_hex(), None)
            .unwrap();

        let digest = store.get_transaction(&config.address, tx.index).unwrap().digest();
        let ballot = Ballot::sign(&keys[0], &digest, Vote::Approve).unwrap();
        assert!(matches!(
            store.cast_vote(&config.address, tx.index, ballot.clone()),
            Err(MultisigError::NotActive)
        ));

        store.activate_proposal(&config.address, tx.index).unwrap();
        store.cast_vote(&config.address, tx.index, ballot).unwrap();
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let (store, config, keys) = setup(2, 2);
        let tx = propose_transfer(&store, &config, &keys[0]);
        approve(&store, &config, tx.index, &keys[0]);

        let snapshot = store.snapshot();
        let restored = MultisigStore::from_snapshot(snapshot);

        let proposal = restored.get_proposal(&config.address, tx.index).unwrap();
        assert_eq!(proposal.approval_count(), 1);
        assert_eq!(
            restored.get_config(&config.address).unwrap().transaction_index,
            1
        );

        // The restored store keeps voting where the old one left off
        let status = approve(&restored, &config, tx.index, &keys[1]);
        assert_eq!(status, ProposalStatus::Approved);
    }
}
