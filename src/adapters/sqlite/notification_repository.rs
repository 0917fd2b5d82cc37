//! SQLite adapter for NotificationRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::adapters::sqlite::{
    parse_datetime, parse_optional_datetime, parse_optional_naive_datetime, DATETIME_FORMAT,
};
use crate::domain::errors::DomainResult;
use crate::domain::models::{NotificationRecord, Slot};
use crate::domain::ports::NotificationRepository;

#[derive(Clone)]
pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    account_id: i64,
    class_id: i64,
    class_name: Option<String>,
    start_time: Option<String>,
    notified_at: Option<String>,
    skipped: i64,
    created_at: String,
}

fn row_to_record(row: NotificationRow) -> DomainResult<NotificationRecord> {
    Ok(NotificationRecord {
        account_id: row.account_id,
        class_id: row.class_id,
        class_name: row.class_name,
        start_time: parse_optional_naive_datetime(row.start_time)?,
        notified_at: parse_optional_datetime(row.notified_at)?,
        skipped: row.skipped != 0,
        created_at: parse_datetime(&row.created_at)?,
    })
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn get(
        &self,
        account_id: i64,
        class_id: i64,
    ) -> DomainResult<Option<NotificationRecord>> {
        let row: Option<NotificationRow> =
            sqlx::query_as("SELECT * FROM notifications WHERE account_id = ?1 AND class_id = ?2")
                .bind(account_id)
                .bind(class_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(row_to_record).transpose()
    }

    async fn is_notified(&self, account_id: i64, class_id: i64) -> DomainResult<bool> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM notifications
                 WHERE account_id = ?1 AND class_id = ?2 AND notified_at IS NOT NULL)",
        )
        .bind(account_id)
        .bind(class_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists != 0)
    }

    async fn is_skipped(&self, account_id: i64, class_id: i64) -> DomainResult<bool> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM notifications
                 WHERE account_id = ?1 AND class_id = ?2 AND skipped = 1)",
        )
        .bind(account_id)
        .bind(class_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists != 0)
    }

    async fn mark_notified(&self, account_id: i64, slot: &Slot) -> DomainResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO notifications
             (account_id, class_id, class_name, start_time, notified_at, skipped, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)
             ON CONFLICT(account_id, class_id) DO UPDATE SET
                 notified_at = excluded.notified_at,
                 class_name = excluded.class_name,
                 start_time = excluded.start_time",
        )
        .bind(account_id)
        .bind(slot.id)
        .bind(&slot.name)
        .bind(slot.start.format(DATETIME_FORMAT).to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_skipped(&self, account_id: i64, class_id: i64) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO notifications
             (account_id, class_id, class_name, start_time, notified_at, skipped, created_at)
             VALUES (?1, ?2, NULL, NULL, NULL, 1, ?3)
             ON CONFLICT(account_id, class_id) DO UPDATE SET skipped = 1",
        )
        .bind(account_id)
        .bind(class_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
