//! Reference-table lookups: statements, categories, subcategories, orders and users.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use tally_shared::types::{CategoryId, UserId};

use crate::entities::{account_orders, categories, statements, subcategories, users};

/// Lookup repository.
#[derive(Debug, Clone)]
pub struct LookupRepository {
    db: DatabaseConnection,
}

impl LookupRepository {
    /// Creates a new lookup repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists statements.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_statements(&self) -> Result<Vec<statements::Model>, DbErr> {
        statements::Entity::find()
            .order_by_asc(statements::Column::Id)
            .all(&self.db)
            .await
    }

    /// Lists categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<categories::Model>, DbErr> {
        categories::Entity::find()
            .order_by_asc(categories::Column::Id)
            .all(&self.db)
            .await
    }

    /// Lists subcategories, optionally for one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_subcategories(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<subcategories::Model>, DbErr> {
        let mut query = subcategories::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(subcategories::Column::CategoryId.eq(category_id.into_inner()));
        }
        query
            .order_by_asc(subcategories::Column::Id)
            .all(&self.db)
            .await
    }

    /// Lists display-order slots by position.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_orders(&self) -> Result<Vec<account_orders::Model>, DbErr> {
        account_orders::Entity::find()
            .order_by_asc(account_orders::Column::Position)
            .all(&self.db)
            .await
    }
}

/// Returns the active user with this id, if any.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn find_active_user<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(user_id.into_inner())
        .filter(users::Column::IsActive.eq(true))
        .one(conn)
        .await
}
