//! CLI command handlers for the multisig demo
//!
//! Walks the classic workflow: generate member keys, create a wallet,
//! propose a vault transfer, collect votes, execute.

use crate::account::{Member, Permissions};
use crate::crypto::KeyPair;
use crate::executor::LoggingSubmitter;
use crate::ledger::Instruction;
use crate::proposal::{Ballot, Vote};
use crate::storage::{Storage, StorageConfig};
use crate::store::MultisigStore;
use std::path::PathBuf;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub store: MultisigStore,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize application state, loading any persisted store
    pub fn new(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };
        let storage = Storage::new(storage_config)?;

        let store = if storage.exists() {
            storage.load()?
        } else {
            MultisigStore::new()
        };

        Ok(Self {
            store,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.store)?;
        Ok(())
    }
}

/// Generate a member key pair
pub fn cmd_keygen() -> CliResult<()> {
    let key = KeyPair::generate();
    println!("🔑 Generated member key pair");
    println!("   Public key:  {}", key.public_key_hex());
    println!("   Private key: {}", key.private_key_hex());
    println!("   Address:     {}", key.address());
    Ok(())
}

/// Parse a member spec of the form `pubkey` or `pubkey:ive`
///
/// The permission letters are `i` (initiate), `v` (vote), `e`
/// (execute); a bare pubkey gets all permissions.
fn parse_member(spec: &str) -> CliResult<Member> {
    match spec.split_once(':') {
        None => Ok(Member::with_all_permissions(spec)),
        Some((key, perms)) => {
            let mut permissions = Permissions::empty();
            for c in perms.chars() {
                permissions |= match c {
                    'i' => Permissions::INITIATE,
                    'v' => Permissions::VOTE,
                    'e' => Permissions::EXECUTE,
                    other => return Err(format!("unknown permission letter '{other}'").into()),
                };
            }
            Ok(Member::new(key, permissions))
        }
    }
}

/// Create a multisig wallet
pub fn cmd_create(
    state: &mut AppState,
    creation_key: &str,
    member_specs: &[String],
    threshold: u8,
) -> CliResult<()> {
    let members = member_specs
        .iter()
        .map(|s| parse_member(s))
        .collect::<CliResult<Vec<Member>>>()?;

    let config = state
        .store
        .create_multisig(creation_key, members, threshold, None)?;
    state.save()?;

    println!("✅ Multisig created: {}", config.address);
    println!("   Policy: {}", config.description());
    println!("   Vault 0: {}", config.vault(0));
    Ok(())
}

/// Show a multisig wallet
pub fn cmd_show(state: &AppState, address: &str) -> CliResult<()> {
    let config = state.store.get_config(address)?;

    println!("🏦 Multisig {}", config.address);
    println!("   Policy: {}", config.description());
    println!("   Transactions: {}", config.transaction_index);
    for member in &config.members {
        println!("   👤 {} ({:?})", member.key, member.permissions);
    }
    Ok(())
}

/// Derive a vault address
pub fn cmd_vault(state: &AppState, address: &str, index: u32) -> CliResult<()> {
    let config = state.store.get_config(address)?;
    println!("🔐 Vault {}: {}", index, config.vault(index));
    Ok(())
}

/// Propose a transfer out of a vault
pub fn cmd_propose(
    state: &mut AppState,
    address: &str,
    vault_index: u32,
    to: &str,
    amount: u64,
    creator_key: &str,
    memo: Option<String>,
) -> CliResult<()> {
    let creator = KeyPair::from_private_key_hex(creator_key)?;
    let config = state.store.get_config(address)?;

    let instruction = Instruction::transfer(config.vault(vault_index), to, amount);
    let tx = state.store.append_transaction(
        address,
        vault_index,
        vec![instruction],
        &creator.public_key_hex(),
        memo,
    )?;
    state.save()?;

    println!("📝 Transaction proposal created");
    println!("   Index: {}", tx.index);
    println!("   Vault: {}", config.vault(vault_index));
    println!("   Amount: {} -> {}", amount, to);
    Ok(())
}

/// Cast a vote on a proposal
pub fn cmd_vote(
    state: &mut AppState,
    address: &str,
    index: u64,
    member_key: &str,
    choice: Vote,
) -> CliResult<()> {
    let member = KeyPair::from_private_key_hex(member_key)?;
    let digest = state.store.get_transaction(address, index)?.digest();
    let ballot = Ballot::sign(&member, &digest, choice)?;

    let status = state.store.cast_vote(address, index, ballot)?;
    state.save()?;

    println!("🗳️  Vote recorded: {:?}", choice);
    println!("   Proposal status: {}", status);
    Ok(())
}

/// Execute an approved proposal
pub fn cmd_execute(
    state: &mut AppState,
    address: &str,
    index: u64,
    member_key: &str,
) -> CliResult<()> {
    let member = KeyPair::from_private_key_hex(member_key)?;
    let receipt = state.store.execute_proposal(
        address,
        index,
        &member.public_key_hex(),
        &LoggingSubmitter,
    )?;
    state.save()?;

    println!("🚀 Proposal executed");
    println!("   Receipt: {}", receipt.signature);
    Ok(())
}

/// List all multisig wallets
pub fn cmd_list(state: &AppState) -> CliResult<()> {
    let configs = state.store.list_multisigs();
    if configs.is_empty() {
        println!("No multisig wallets yet (data dir: {:?})", state.data_dir);
        return Ok(());
    }

    println!("🏦 {} multisig wallet(s)", configs.len());
    for config in configs {
        println!(
            "   {} ({}, {} transaction(s))",
            config.address,
            config.description(),
            config.transaction_index
        );
    }
    Ok(())
}
