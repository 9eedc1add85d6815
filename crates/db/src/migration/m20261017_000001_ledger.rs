//! Initial ledger migration.
//!
//! Creates enums, reference tables, the chart of accounts, journal entries,
//! transactions, the audit log and manager notifications.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: REFERENCE TABLES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(LOOKUPS_SQL).await?;

        // ============================================================
        // PART 3: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 4: JOURNAL ENTRIES & TRANSACTIONS
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 5: AUDIT & NOTIFICATIONS
        // ============================================================
        db.execute_unprepared(EVENT_LOGS_SQL).await?;
        db.execute_unprepared(NOTIFICATIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE normal_side AS ENUM ('DEBIT', 'CREDIT');
CREATE TYPE transaction_type AS ENUM ('DEBIT', 'CREDIT');
CREATE TYPE journal_entry_status AS ENUM ('PENDING', 'APPROVED', 'REJECTED');
CREATE TYPE event_type AS ENUM ('CREATE', 'UPDATE');
CREATE TYPE user_role AS ENUM ('ADMINISTRATOR', 'MANAGER', 'ACCOUNTANT');
";

const USERS_SQL: &str = r"
-- Owned by the auth layer, read here for creator ids and manager fan-out
CREATE TABLE users (
    id SERIAL PRIMARY KEY,
    username VARCHAR(100) NOT NULL UNIQUE,
    role user_role NOT NULL DEFAULT 'ACCOUNTANT',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_role_active ON users(role) WHERE is_active;
";

const LOOKUPS_SQL: &str = r"
CREATE TABLE statements (
    id SERIAL PRIMARY KEY,
    name VARCHAR(50) NOT NULL UNIQUE
);

CREATE TABLE categories (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL UNIQUE
);

CREATE TABLE subcategories (
    id SERIAL PRIMARY KEY,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    name VARCHAR(100) NOT NULL,
    CONSTRAINT uq_subcategory_name UNIQUE (category_id, name)
);

CREATE TABLE account_orders (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL UNIQUE,
    position INTEGER NOT NULL
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id SERIAL PRIMARY KEY,
    number VARCHAR(10) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    normal_side normal_side NOT NULL,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    subcategory_id INTEGER REFERENCES subcategories(id),
    statement_id INTEGER NOT NULL REFERENCES statements(id),
    order_id INTEGER NOT NULL REFERENCES account_orders(id),
    comment TEXT,
    is_active BOOLEAN NOT NULL DEFAULT true,
    initial_balance NUMERIC(20, 2) NOT NULL DEFAULT 0,
    balance NUMERIC(20, 2) NOT NULL DEFAULT 0,
    total_debits NUMERIC(20, 2) NOT NULL DEFAULT 0,
    total_credits NUMERIC(20, 2) NOT NULL DEFAULT 0,
    user_id INTEGER REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_accounts_name UNIQUE (name),
    CONSTRAINT chk_initial_balance CHECK (initial_balance >= 0),
    CONSTRAINT chk_inactive_zero CHECK (is_active OR balance = 0)
);

CREATE INDEX idx_accounts_category ON accounts(category_id);
CREATE INDEX idx_accounts_statement ON accounts(statement_id);

-- Per-category counter; the row lock serializes number allocation
CREATE TABLE account_number_sequences (
    category_prefix BIGINT PRIMARY KEY,
    last_number BIGINT,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE SEQUENCE journal_entry_pr_seq START 1;

CREATE TABLE journal_entries (
    id SERIAL PRIMARY KEY,
    pr VARCHAR(20) NOT NULL UNIQUE,
    description TEXT NOT NULL,
    date DATE NOT NULL,
    status journal_entry_status NOT NULL DEFAULT 'PENDING',
    comment TEXT,
    is_adjusting BOOLEAN NOT NULL DEFAULT false,
    user_id INTEGER NOT NULL REFERENCES users(id),
    reviewed_by INTEGER REFERENCES users(id),
    reviewed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_rejected_comment CHECK (status <> 'REJECTED' OR comment IS NOT NULL)
);

CREATE INDEX idx_journal_entries_status ON journal_entries(status, created_at DESC);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id SERIAL PRIMARY KEY,
    account_id INTEGER NOT NULL REFERENCES accounts(id),
    journal_entry_id INTEGER REFERENCES journal_entries(id),
    type transaction_type NOT NULL,
    amount NUMERIC(20, 2) NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    date DATE NOT NULL,
    user_id INTEGER REFERENCES users(id),
    is_approved BOOLEAN NOT NULL DEFAULT false,
    balance NUMERIC(20, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_amount_positive CHECK (amount > 0)
);

-- Running-balance replay walks one account in (date, id) order
CREATE INDEX idx_transactions_account_date ON transactions(account_id, date, id);
CREATE INDEX idx_transactions_entry ON transactions(journal_entry_id);
CREATE INDEX idx_transactions_approved_date ON transactions(date) WHERE is_approved;
";

const EVENT_LOGS_SQL: &str = r"
CREATE TABLE event_logs (
    id SERIAL PRIMARY KEY,
    event_type event_type NOT NULL,
    table_name VARCHAR(50) NOT NULL,
    record_id INTEGER NOT NULL,
    before_state JSONB,
    after_state JSONB NOT NULL,
    user_id INTEGER REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_event_logs_record ON event_logs(table_name, record_id, created_at);
";

const NOTIFICATIONS_SQL: &str = r"
CREATE TABLE notifications (
    id SERIAL PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id),
    journal_entry_id INTEGER REFERENCES journal_entries(id),
    message TEXT NOT NULL,
    is_read BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_notifications_user_unread ON notifications(user_id, created_at DESC) WHERE NOT is_read;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS notifications CASCADE;
DROP TABLE IF EXISTS event_logs CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP SEQUENCE IF EXISTS journal_entry_pr_seq;
DROP TABLE IF EXISTS account_number_sequences CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS account_orders CASCADE;
DROP TABLE IF EXISTS subcategories CASCADE;
DROP TABLE IF EXISTS categories CASCADE;
DROP TABLE IF EXISTS statements CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TYPE IF EXISTS user_role;
DROP TYPE IF EXISTS event_type;
DROP TYPE IF EXISTS journal_entry_status;
DROP TYPE IF EXISTS transaction_type;
DROP TYPE IF EXISTS normal_side;
";
