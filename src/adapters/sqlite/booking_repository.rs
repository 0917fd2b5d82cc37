//! SQLite adapter for BookingRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::adapters::sqlite::{
    parse_datetime, parse_naive_datetime, parse_optional_datetime, DATETIME_FORMAT,
};
use crate::domain::errors::DomainResult;
use crate::domain::models::{Booking, NewBooking};
use crate::domain::ports::BookingRepository;

#[derive(Clone)]
pub struct SqliteBookingRepository {
    pool: SqlitePool,
}

impl SqliteBookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    account_id: i64,
    class_id: i64,
    title: String,
    start_time: String,
    filter_id: Option<i64>,
    is_auto_booked: i64,
    booked_at: String,
    cancelled_at: Option<String>,
}

fn row_to_booking(row: BookingRow) -> DomainResult<Booking> {
    Ok(Booking {
        id: row.id,
        account_id: row.account_id,
        class_id: row.class_id,
        title: row.title,
        start_time: parse_naive_datetime(&row.start_time)?,
        filter_id: row.filter_id,
        is_auto_booked: row.is_auto_booked != 0,
        booked_at: parse_datetime(&row.booked_at)?,
        cancelled_at: parse_optional_datetime(row.cancelled_at)?,
    })
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn insert(&self, booking: &NewBooking) -> DomainResult<i64> {
        let result = sqlx::query(
            "INSERT INTO bookings
             (account_id, class_id, title, start_time, filter_id,
              is_auto_booked, booked_at, cancelled_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)",
        )
        .bind(booking.account_id)
        .bind(booking.class_id)
        .bind(&booking.title)
        .bind(booking.start_time.format(DATETIME_FORMAT).to_string())
        .bind(booking.filter_id)
        .bind(i64::from(booking.is_auto_booked))
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn count_active_for_filter(
        &self,
        account_id: i64,
        filter_id: i64,
    ) -> DomainResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings
             WHERE account_id = ?1 AND filter_id = ?2 AND cancelled_at IS NULL",
        )
        .bind(account_id)
        .bind(filter_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn is_actively_booked(&self, account_id: i64, class_id: i64) -> DomainResult<bool> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM bookings
                 WHERE account_id = ?1 AND class_id = ?2 AND cancelled_at IS NULL)",
        )
        .bind(account_id)
        .bind(class_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists != 0)
    }

    async fn cancel(&self, account_id: i64, class_id: i64) -> DomainResult<()> {
        sqlx::query(
            "UPDATE bookings SET cancelled_at = ?3
             WHERE account_id = ?1 AND class_id = ?2 AND cancelled_at IS NULL",
        )
        .bind(account_id)
        .bind(class_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_account(&self, account_id: i64) -> DomainResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            "SELECT * FROM bookings WHERE account_id = ? ORDER BY booked_at DESC, id DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_booking).collect()
    }
}
