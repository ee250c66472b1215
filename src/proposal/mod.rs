//! Proposal voting state machine
//!
//! Every ledgered transaction is wrapped by a proposal that collects
//! signed ballots from voting members. The proposal status is a pure
//! function of the latest ballot per member, which makes the outcome
//! independent of vote arrival order:
//!
//! - cancel ballots reaching the threshold cancel the proposal
//! - approve ballots reaching the threshold approve it
//! - reject ballots that make the threshold mathematically unreachable
//!   reject it
//! - otherwise it stays active
//!
//! `Executed` is never produced by recomputation; only the executor
//! sets it, exactly once, from `Approved`.

pub mod ballot;
pub mod state;

pub use ballot::{Ballot, Vote};
pub use state::{evaluate, Proposal, ProposalStatus};
