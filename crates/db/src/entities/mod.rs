//! `SeaORM` entity definitions.

pub mod prelude;

pub mod account_number_sequences;
pub mod account_orders;
pub mod accounts;
pub mod categories;
pub mod event_logs;
pub mod journal_entries;
pub mod notifications;
pub mod sea_orm_active_enums;
pub mod statements;
pub mod subcategories;
pub mod transactions;
pub mod users;
