//! SQLite adapter for AccountRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::adapters::sqlite::parse_datetime;
use crate::domain::errors::DomainResult;
use crate::domain::models::Account;
use crate::domain::ports::AccountRepository;

#[derive(Clone)]
pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    password: String,
    created_at: String,
}

fn row_to_account(row: AccountRow) -> DomainResult<Account> {
    Ok(Account {
        id: row.id,
        email: row.email,
        password: row.password,
        created_at: parse_datetime(&row.created_at)?,
    })
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn insert(&self, account: &Account) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO accounts (id, email, password, created_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password)
        .bind(account.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: i64) -> DomainResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_account).transpose()
    }

    async fn get_by_email(&self, email: &str) -> DomainResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as("SELECT * FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_account).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Account>> {
        let rows: Vec<AccountRow> =
            sqlx::query_as("SELECT * FROM accounts ORDER BY created_at ASC, id ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(row_to_account).collect()
    }

    async fn remove(&self, id: i64) -> DomainResult<()> {
        sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
