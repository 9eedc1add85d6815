//! Double-entry posting engine.
//!
//! This module implements the ledger side of approval:
//! - Ledger line types (debits and credits)
//! - Normal-side balance rules
//! - Ordered posting through a per-account accumulator
//! - Running-balance replay after a posted transaction is edited

pub mod balance;
pub mod entry;
pub mod error;
pub mod posting;

pub use balance::{AccountBalance, NormalSide};
pub use entry::EntryType;
pub use error::LedgerError;
pub use posting::{
    HistoryLine, PostedLine, PostedSnapshot, PostingLedger, PostingLine, Recomputed,
    recompute_chain,
};
