//! Account registry rules.
//!
//! Pure rules for the chart of accounts: category-to-class lookup, account
//! number generation, opening-balance seeding and the zero-balance
//! deactivation invariant. Persistence lives in the db crate.

pub mod classification;
pub mod error;
pub mod numbering;
pub mod rules;

pub use classification::{AccountClass, StatementKind, normalize_class_name, same_class_name};
pub use error::AccountRuleError;
pub use numbering::{
    ACCOUNT_NUMBER_STEP, format_account_number, highest_in_class, next_account_number,
};
pub use rules::{SeedLine, ensure_can_deactivate, seed_line, validate_new_account};
