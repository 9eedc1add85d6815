//! Entity re-exports.

pub use super::account_number_sequences::Entity as AccountNumberSequences;
pub use super::account_orders::Entity as AccountOrders;
pub use super::accounts::Entity as Accounts;
pub use super::categories::Entity as Categories;
pub use super::event_logs::Entity as EventLogs;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::notifications::Entity as Notifications;
pub use super::statements::Entity as Statements;
pub use super::subcategories::Entity as Subcategories;
pub use super::transactions::Entity as Transactions;
pub use super::users::Entity as Users;
