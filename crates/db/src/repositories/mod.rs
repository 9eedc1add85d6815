//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every mutation runs in one database transaction together with its audit
//! records.

pub mod account;
pub mod event_log;
pub mod journal_entry;
pub mod lookup;
pub mod notification;
pub mod report;
pub mod transaction;

pub use account::{
    AccountError, AccountFilter, AccountRepository, CreateAccountInput, CreatedAccount,
    UpdateAccountInput,
};
pub use event_log::{EventLogRepository, record_event};
pub use journal_entry::{
    JournalEntryError, JournalEntryFilter, JournalEntryRepository, JournalEntryWithLines,
};
pub use lookup::{LookupRepository, find_active_user};
pub use notification::NotificationRepository;
pub use report::{LedgerSnapshot, ReportRepoError, ReportRepository};
pub use transaction::{TransactionError, TransactionFilter, TransactionRepository};
