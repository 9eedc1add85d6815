//! `SeaORM` Entity for accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::NormalSide;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub number: String,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub normal_side: NormalSide,
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
    pub statement_id: i32,
    pub order_id: i32,
    pub comment: Option<String>,
    pub is_active: bool,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub initial_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub total_debits: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub total_credits: Decimal,
    pub user_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::subcategories::Entity",
        from = "Column::SubcategoryId",
        to = "super::subcategories::Column::Id"
    )]
    Subcategories,
    #[sea_orm(
        belongs_to = "super::statements::Entity",
        from = "Column::StatementId",
        to = "super::statements::Column::Id"
    )]
    Statements,
    #[sea_orm(
        belongs_to = "super::account_orders::Entity",
        from = "Column::OrderId",
        to = "super::account_orders::Column::Id"
    )]
    AccountOrders,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::subcategories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subcategories.def()
    }
}

impl Related<super::statements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Statements.def()
    }
}

impl Related<super::account_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountOrders.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
