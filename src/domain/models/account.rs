//! Account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account on the booking portal.
///
/// The id is operator-assigned and doubles as the notification chat id,
/// so one registration carries both the portal identity and the delivery
/// address. Credentials are held in the clear; the store hands them to
/// the engine ready to use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Operator-assigned id, also the Telegram chat the account is
    /// notified on.
    pub id: i64,
    /// Portal login email.
    pub email: String,
    /// Portal password.
    pub password: String,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account record.
    pub fn new(id: i64, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            password: password.into(),
            created_at: Utc::now(),
        }
    }

    /// Borrow the portal credentials.
    pub fn credentials(&self) -> Credentials<'_> {
        Credentials {
            login: &self.email,
            password: &self.password,
        }
    }
}

/// Borrowed portal credentials for a login attempt.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    /// Portal login email.
    pub login: &'a str,
    /// Portal password.
    pub password: &'a str,
}
