//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts rules and account numbering
//! - `journal` - Journal entry validation and review state machine
//! - `ledger` - Double-entry posting and running balances
//! - `reports` - Trial balance, statements and ratios
//! - `policy` - Role capabilities for review actions
//! - `audit` - Before/after audit events

pub mod accounts;
pub mod audit;
pub mod journal;
pub mod ledger;
pub mod policy;
pub mod reports;
