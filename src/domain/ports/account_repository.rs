//! Account repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Account;

/// Store operations for registered accounts.
///
/// The engine only ever reads accounts; insert/remove exist for the
/// operator surface. Credentials come back ready to use.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Register an account. Fails if the id or email is already taken.
    async fn insert(&self, account: &Account) -> DomainResult<()>;

    /// Fetch one account by id.
    async fn get(&self, id: i64) -> DomainResult<Option<Account>>;

    /// Fetch one account by portal email.
    async fn get_by_email(&self, email: &str) -> DomainResult<Option<Account>>;

    /// All registered accounts, in registration order.
    async fn list(&self) -> DomainResult<Vec<Account>>;

    /// Remove an account and everything owned by it.
    async fn remove(&self, id: i64) -> DomainResult<()>;
}
