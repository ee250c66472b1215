//! Transaction submission seam
//!
//! Execution of an approved proposal hands the assembled instruction
//! set to a [`Submitter`], the external interface that actually moves
//! funds. The engine guarantees a proposal is submitted at most once;
//! the submitter guarantees the instruction set lands atomically (all
//! instructions or none) within a bounded timeout.

pub mod submit;

pub use submit::{LoggingSubmitter, Receipt, SignedInstructionSet, SubmitError, Submitter};
