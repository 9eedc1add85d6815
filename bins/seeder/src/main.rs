//! Database seeder for local development.
//!
//! Seeds statements, categories, subcategories, display orders, one user per
//! role, and a handful of demo accounts with opening balances.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tally_core::ledger::NormalSide;
use tally_db::entities::{
    account_orders, accounts, categories, sea_orm_active_enums::UserRole, statements,
    subcategories, users,
};
use tally_db::repositories::{AccountRepository, CreateAccountInput};
use tally_shared::types::{CategoryId, OrderId, StatementId, SubcategoryId, UserId};

const STATEMENTS: [&str; 5] = ["Asset", "Liability", "Equity", "Revenue", "Expense"];

const CATEGORIES: [(&str, &[&str]); 7] = [
    (
        "Current Assets",
        &["Cash", "Accounts Receivable", "Inventory", "Prepaid Expenses"],
    ),
    ("Long-term Assets", &["Property", "Equipment"]),
    ("Current Liabilities", &["Accounts Payable", "Accrued Liabilities"]),
    ("Long-term Liabilities", &["Notes Payable"]),
    ("Owner's Equity", &["Capital", "Retained Earnings"]),
    ("Operating Revenue", &["Service Revenue", "Sales Revenue"]),
    ("Operating Expense", &["Salaries", "Rent", "Utilities"]),
];

const ORDERS: [&str; 4] = ["Primary", "Secondary", "Supplementary", "Other"];

const USERS: [(&str, UserRole); 3] = [
    ("admin", UserRole::Administrator),
    ("manager", UserRole::Manager),
    ("accountant", UserRole::Accountant),
];

struct DemoAccount {
    name: &'static str,
    side: NormalSide,
    category: &'static str,
    subcategory: &'static str,
    statement: &'static str,
    opening: i64,
}

const DEMO_ACCOUNTS: [DemoAccount; 6] = [
    DemoAccount {
        name: "Cash",
        side: NormalSide::Debit,
        category: "Current Assets",
        subcategory: "Cash",
        statement: "Asset",
        opening: 25_000,
    },
    DemoAccount {
        name: "Accounts Receivable",
        side: NormalSide::Debit,
        category: "Current Assets",
        subcategory: "Accounts Receivable",
        statement: "Asset",
        opening: 4_000,
    },
    DemoAccount {
        name: "Accounts Payable",
        side: NormalSide::Credit,
        category: "Current Liabilities",
        subcategory: "Accounts Payable",
        statement: "Liability",
        opening: 6_500,
    },
    DemoAccount {
        name: "Owner's Capital",
        side: NormalSide::Credit,
        category: "Owner's Equity",
        subcategory: "Capital",
        statement: "Equity",
        opening: 22_500,
    },
    DemoAccount {
        name: "Service Revenue",
        side: NormalSide::Credit,
        category: "Operating Revenue",
        subcategory: "Service Revenue",
        statement: "Revenue",
        opening: 0,
    },
    DemoAccount {
        name: "Rent Expense",
        side: NormalSide::Debit,
        category: "Operating Expense",
        subcategory: "Rent",
        statement: "Expense",
        opening: 0,
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment"))?;

    println!("Connecting to database...");
    let db = tally_db::connect(&database_url).await?;

    println!("Seeding statements...");
    for name in STATEMENTS {
        statement_id(&db, name).await?;
    }

    println!("Seeding categories and subcategories...");
    for (name, subs) in CATEGORIES {
        let category = category_id(&db, name).await?;
        for sub in subs {
            subcategory_id(&db, category, sub).await?;
        }
    }

    println!("Seeding display orders...");
    for (position, name) in (1..).zip(ORDERS) {
        order_id(&db, name, position).await?;
    }

    println!("Seeding users...");
    let mut admin = None;
    for (username, role) in USERS {
        let id = user_id(&db, username, role).await?;
        if role == UserRole::Administrator {
            admin = Some(id);
        }
    }

    println!("Seeding demo accounts...");
    seed_demo_accounts(&db, admin).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn statement_id(db: &DatabaseConnection, name: &str) -> anyhow::Result<StatementId> {
    if let Some(found) = statements::Entity::find()
        .filter(statements::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(StatementId::new(found.id));
    }
    let row = statements::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    println!("  Created statement: {name}");
    Ok(StatementId::new(row.id))
}

async fn category_id(db: &DatabaseConnection, name: &str) -> anyhow::Result<CategoryId> {
    if let Some(found) = categories::Entity::find()
        .filter(categories::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(CategoryId::new(found.id));
    }
    let row = categories::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    println!("  Created category: {name}");
    Ok(CategoryId::new(row.id))
}

async fn subcategory_id(
    db: &DatabaseConnection,
    category: CategoryId,
    name: &str,
) -> anyhow::Result<SubcategoryId> {
    if let Some(found) = subcategories::Entity::find()
        .filter(subcategories::Column::CategoryId.eq(category.into_inner()))
        .filter(subcategories::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(SubcategoryId::new(found.id));
    }
    let row = subcategories::ActiveModel {
        category_id: Set(category.into_inner()),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(SubcategoryId::new(row.id))
}

async fn order_id(db: &DatabaseConnection, name: &str, position: i32) -> anyhow::Result<OrderId> {
    if let Some(found) = account_orders::Entity::find()
        .filter(account_orders::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(OrderId::new(found.id));
    }
    let row = account_orders::ActiveModel {
        name: Set(name.to_string()),
        position: Set(position),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(OrderId::new(row.id))
}

async fn user_id(db: &DatabaseConnection, username: &str, role: UserRole) -> anyhow::Result<UserId> {
    if let Some(found) = users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await?
    {
        return Ok(UserId::new(found.id));
    }
    let row = users::ActiveModel {
        username: Set(username.to_string()),
        role: Set(role),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    println!("  Created user: {username} ({role:?})");
    Ok(UserId::new(row.id))
}

async fn seed_demo_accounts(db: &DatabaseConnection, admin: Option<UserId>) -> anyhow::Result<()> {
    let repo = AccountRepository::new(db.clone());
    let order = order_id(db, ORDERS[0], 1).await?;

    for demo in DEMO_ACCOUNTS {
        let exists = accounts::Entity::find()
            .filter(accounts::Column::Name.eq(demo.name))
            .one(db)
            .await?
            .is_some();
        if exists {
            println!("  Account {} already exists, skipping...", demo.name);
            continue;
        }

        let category = category_id(db, demo.category).await?;
        let created = repo
            .create_account(CreateAccountInput {
                name: demo.name.to_string(),
                description: format!("Demo {} account", demo.name.to_lowercase()),
                normal_side: demo.side,
                category_id: category,
                subcategory_id: Some(subcategory_id(db, category, demo.subcategory).await?),
                statement_id: statement_id(db, demo.statement).await?,
                order_id: order,
                comment: None,
                initial_balance: Decimal::new(demo.opening, 0),
                user_id: admin,
            })
            .await?;
        println!(
            "  Created account {} ({})",
            created.account.name, created.account.number
        );
    }
    Ok(())
}
