//! SQLite adapter for FilterRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::adapters::sqlite::{parse_datetime, parse_optional_time, TIME_FORMAT};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Filter, NewFilter, WeekdaySet, MAX_FILTERS_PER_ACCOUNT};
use crate::domain::ports::FilterRepository;

#[derive(Clone)]
pub struct SqliteFilterRepository {
    pool: SqlitePool,
}

impl SqliteFilterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FilterRow {
    id: i64,
    account_id: i64,
    club_id: i64,
    club_name: String,
    activity_id: String,
    activity_name: String,
    trainer: Option<String>,
    zone_id: Option<i64>,
    zone_name: Option<String>,
    time_from: Option<String>,
    time_to: Option<String>,
    weekdays: Option<String>,
    auto_booking: i64,
    created_at: String,
}

fn row_to_filter(row: FilterRow) -> DomainResult<Filter> {
    let weekdays = row
        .weekdays
        .as_deref()
        .map(WeekdaySet::from_csv)
        .transpose()?;

    Ok(Filter {
        id: row.id,
        account_id: row.account_id,
        club_id: row.club_id,
        club_name: row.club_name,
        activity_id: row.activity_id,
        activity_name: row.activity_name,
        trainer: row.trainer,
        zone_id: row.zone_id,
        zone_name: row.zone_name,
        time_from: parse_optional_time(row.time_from)?,
        time_to: parse_optional_time(row.time_to)?,
        weekdays,
        auto_booking: row.auto_booking != 0,
        created_at: parse_datetime(&row.created_at)?,
    })
}

#[async_trait]
impl FilterRepository for SqliteFilterRepository {
    async fn insert(&self, filter: &NewFilter) -> DomainResult<i64> {
        // Count and insert inside one transaction so a competing insert
        // cannot slip the account past the cap.
        let mut tx = self.pool.begin().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM filters WHERE account_id = ?")
            .bind(filter.account_id)
            .fetch_one(&mut *tx)
            .await?;

        if count as usize >= MAX_FILTERS_PER_ACCOUNT {
            return Err(DomainError::FilterLimitReached {
                account_id: filter.account_id,
                limit: MAX_FILTERS_PER_ACCOUNT,
            });
        }

        let time_from = filter.time_from.map(|t| t.format(TIME_FORMAT).to_string());
        let time_to = filter.time_to.map(|t| t.format(TIME_FORMAT).to_string());
        let weekdays = filter.weekdays.map(WeekdaySet::to_csv);

        let result = sqlx::query(
            "INSERT INTO filters
             (account_id, club_id, club_name, activity_id, activity_name,
              trainer, zone_id, zone_name, time_from, time_to, weekdays,
              auto_booking, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(filter.account_id)
        .bind(filter.club_id)
        .bind(&filter.club_name)
        .bind(&filter.activity_id)
        .bind(&filter.activity_name)
        .bind(&filter.trainer)
        .bind(filter.zone_id)
        .bind(&filter.zone_name)
        .bind(&time_from)
        .bind(&time_to)
        .bind(&weekdays)
        .bind(i64::from(filter.auto_booking))
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_rowid();
        tx.commit().await?;

        Ok(id)
    }

    async fn get(&self, id: i64) -> DomainResult<Option<Filter>> {
        let row: Option<FilterRow> = sqlx::query_as("SELECT * FROM filters WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_filter).transpose()
    }

    async fn list_for_account(&self, account_id: i64) -> DomainResult<Vec<Filter>> {
        let rows: Vec<FilterRow> = sqlx::query_as(
            "SELECT * FROM filters WHERE account_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_filter).collect()
    }

    async fn set_auto_booking(&self, id: i64, enabled: bool) -> DomainResult<()> {
        let result = sqlx::query("UPDATE filters SET auto_booking = ?2 WHERE id = ?1")
            .bind(id)
            .bind(i64::from(enabled))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::FilterNotFound(id));
        }
        Ok(())
    }

    async fn remove(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM filters WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::FilterNotFound(id));
        }
        Ok(())
    }

    async fn remove_for_account(&self, account_id: i64) -> DomainResult<()> {
        sqlx::query("DELETE FROM filters WHERE account_id = ?")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
