//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports:
//! - Trial Balance
//! - Income Statement
//! - Balance Sheet
//! - Retained Earnings
//! - Financial Ratios

pub mod error;
pub mod ratios;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use ratios::{color_for, compute_ratios, ratio};
pub use service::{OPERATING_EXPENSE, OPERATING_REVENUE, ReportService};
pub use types::*;
