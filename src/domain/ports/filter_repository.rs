//! Filter repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Filter, NewFilter};

/// Store operations for saved filters.
#[async_trait]
pub trait FilterRepository: Send + Sync {
    /// Create a filter and return its assigned id.
    ///
    /// Enforces the per-account filter cap: when the account already
    /// holds the maximum, this fails with `FilterLimitReached` and
    /// leaves the existing filters untouched.
    async fn insert(&self, filter: &NewFilter) -> DomainResult<i64>;

    /// Fetch one filter by id.
    async fn get(&self, id: i64) -> DomainResult<Option<Filter>>;

    /// An account's filters in creation order. The order is load-bearing:
    /// it decides which filter an auto-booking is credited to.
    async fn list_for_account(&self, account_id: i64) -> DomainResult<Vec<Filter>>;

    /// Flip a filter's auto-booking toggle.
    async fn set_auto_booking(&self, id: i64, enabled: bool) -> DomainResult<()>;

    /// Delete one filter.
    async fn remove(&self, id: i64) -> DomainResult<()>;

    /// Delete all of an account's filters.
    async fn remove_for_account(&self, account_id: i64) -> DomainResult<()>;
}
