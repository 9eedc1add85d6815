//! `SeaORM` Entity for event_logs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EventType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "event_logs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_type: EventType,
    pub table_name: String,
    pub record_id: i32,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub before_state: Option<Json>,
    #[sea_orm(column_type = "JsonBinary")]
    pub after_state: Json,
    pub user_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
