//! Multisig CLI application
//!
//! Demo driver for the multisig engine: create a wallet, propose a
//! vault transfer, collect votes, execute.

use clap::{Parser, Subcommand, ValueEnum};
use quorum_multisig::cli::commands::{
    cmd_create, cmd_execute, cmd_keygen, cmd_list, cmd_propose, cmd_show, cmd_vault, cmd_vote,
};
use quorum_multisig::cli::{AppState, CliResult};
use quorum_multisig::proposal::Vote;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "multisig")]
#[command(version = "0.1.0")]
#[command(about = "A threshold multisig wallet engine", long_about = None)]
struct Cli {
    /// Data directory for wallet storage
    #[arg(short, long, default_value = ".multisig_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VoteChoice {
    Approve,
    Reject,
    Cancel,
}

impl From<VoteChoice> for Vote {
    fn from(choice: VoteChoice) -> Self {
        match choice {
            VoteChoice::Approve => Vote::Approve,
            VoteChoice::Reject => Vote::Reject,
            VoteChoice::Cancel => Vote::Cancel,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a member key pair
    Keygen,

    /// Create a new multisig wallet
    Create {
        /// Immutable creation key (any stable string or public key)
        #[arg(short, long)]
        creation_key: String,

        /// Member public key, optionally with permission letters
        /// (e.g. "pubkey:v" for vote-only)
        #[arg(short, long = "member")]
        members: Vec<String>,

        /// Approvals required to execute
        #[arg(short, long)]
        threshold: u8,
    },

    /// Show a multisig wallet
    Show {
        /// Multisig address
        address: String,
    },

    /// Derive a spending vault address
    Vault {
        /// Multisig address
        address: String,

        /// Vault index
        #[arg(short, long, default_value = "0")]
        index: u32,
    },

    /// Propose a transfer from a vault
    Propose {
        /// Multisig address
        address: String,

        /// Vault index to spend from
        #[arg(short, long, default_value = "0")]
        vault_index: u32,

        /// Recipient address
        #[arg(short, long)]
        to: String,

        /// Amount in base units
        #[arg(short, long)]
        amount: u64,

        /// Proposing member's private key (hex)
        #[arg(short, long)]
        key: String,

        /// Optional memo
        #[arg(short, long)]
        memo: Option<String>,
    },

    /// Vote on a transaction proposal
    Vote {
        /// Multisig address
        address: String,

        /// Transaction index
        #[arg(short, long)]
        index: u64,

        /// Voting member's private key (hex)
        #[arg(short, long)]
        key: String,

        /// The vote to cast
        #[arg(short, long, value_enum, default_value_t = VoteChoice::Approve)]
        choice: VoteChoice,
    },

    /// Execute an approved proposal
    Execute {
        /// Multisig address
        address: String,

        /// Transaction index
        #[arg(short, long)]
        index: u64,

        /// Executing member's private key (hex)
        #[arg(short, long)]
        key: String,
    },

    /// List all multisig wallets
    List,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Keygen => cmd_keygen(),
        Commands::Create {
            creation_key,
            members,
            threshold,
        } => {
            let mut state = AppState::new(cli.data_dir)?;
            cmd_create(&mut state, &creation_key, &members, threshold)
        }
        Commands::Show { address } => {
            let state = AppState::new(cli.data_dir)?;
            cmd_show(&state, &address)
        }
        Commands::Vault { address, index } => {
            let state = AppState::new(cli.data_dir)?;
            cmd_vault(&state, &address, index)
        }
        Commands::Propose {
            address,
            vault_index,
            to,
            amount,
            key,
            memo,
        } => {
            let mut state = AppState::new(cli.data_dir)?;
            cmd_propose(&mut state, &address, vault_index, &to, amount, &key, memo)
        }
        Commands::Vote {
            address,
            index,
            key,
            choice,
        } => {
            let mut state = AppState::new(cli.data_dir)?;
            cmd_vote(&mut state, &address, index, &key, choice.into())
        }
        Commands::Execute {
            address,
            index,
            key,
        } => {
            let mut state = AppState::new(cli.data_dir)?;
            cmd_execute(&mut state, &address, index, &key)
        }
        Commands::List => {
            let state = AppState::new(cli.data_dir)?;
            cmd_list(&state)
        }
    }
}
