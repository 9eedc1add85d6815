//! `SeaORM` active enums mirroring the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tally_core::audit::EventType as CoreEventType;
use tally_core::journal::JournalEntryStatus as CoreStatus;
use tally_core::ledger::{EntryType, NormalSide as CoreNormalSide};
use tally_core::policy::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "normal_side")]
#[serde(rename_all = "PascalCase")]
pub enum NormalSide {
    #[sea_orm(string_value = "DEBIT")]
    Debit,
    #[sea_orm(string_value = "CREDIT")]
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    #[sea_orm(string_value = "DEBIT")]
    Debit,
    #[sea_orm(string_value = "CREDIT")]
    Credit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_entry_status")]
#[serde(rename_all = "UPPERCASE")]
pub enum JournalEntryStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_type")]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    #[sea_orm(string_value = "CREATE")]
    Create,
    #[sea_orm(string_value = "UPDATE")]
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[sea_orm(string_value = "ADMINISTRATOR")]
    Administrator,
    #[sea_orm(string_value = "MANAGER")]
    Manager,
    #[sea_orm(string_value = "ACCOUNTANT")]
    Accountant,
}

impl From<NormalSide> for CoreNormalSide {
    fn from(side: NormalSide) -> Self {
        match side {
            NormalSide::Debit => Self::Debit,
            NormalSide::Credit => Self::Credit,
        }
    }
}

impl From<CoreNormalSide> for NormalSide {
    fn from(side: CoreNormalSide) -> Self {
        match side {
            CoreNormalSide::Debit => Self::Debit,
            CoreNormalSide::Credit => Self::Credit,
        }
    }
}

impl From<TransactionType> for EntryType {
    fn from(t: TransactionType) -> Self {
        match t {
            TransactionType::Debit => Self::Debit,
            TransactionType::Credit => Self::Credit,
        }
    }
}

impl From<EntryType> for TransactionType {
    fn from(t: EntryType) -> Self {
        match t {
            EntryType::Debit => Self::Debit,
            EntryType::Credit => Self::Credit,
        }
    }
}

impl From<JournalEntryStatus> for CoreStatus {
    fn from(status: JournalEntryStatus) -> Self {
        match status {
            JournalEntryStatus::Pending => Self::Pending,
            JournalEntryStatus::Approved => Self::Approved,
            JournalEntryStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<CoreStatus> for JournalEntryStatus {
    fn from(status: CoreStatus) -> Self {
        match status {
            CoreStatus::Pending => Self::Pending,
            CoreStatus::Approved => Self::Approved,
            CoreStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<CoreEventType> for EventType {
    fn from(t: CoreEventType) -> Self {
        match t {
            CoreEventType::Create => Self::Create,
            CoreEventType::Update => Self::Update,
        }
    }
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Administrator => Self::Administrator,
            UserRole::Manager => Self::Manager,
            UserRole::Accountant => Self::Accountant,
        }
    }
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Administrator => Self::Administrator,
            Role::Manager => Self::Manager,
            Role::Accountant => Self::Accountant,
        }
    }
}
