//! Telegram Bot API notifier.
//!
//! Sends through `sendMessage` with HTML parse mode. The account id is
//! the Telegram chat id; accounts are registered under the chat they
//! should be notified in. Any failure, network or an `ok: false`
//! envelope, surfaces as `DeliveryFailed` so the caller leaves the slot
//! unmarked and the next sweep retries.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Filter, Slot, TelegramConfig};
use crate::domain::ports::Notifier;

use super::message;

/// Notifier backed by the Telegram Bot API.
pub struct TelegramNotifier {
    config: TelegramConfig,
    client: reqwest::Client,
}

/// The Bot API's response envelope; only the verdict is consumed.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    description: Option<String>,
}

impl TelegramNotifier {
    /// Create a notifier from Telegram configuration.
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<serde_json::Value>,
    ) -> DomainResult<()> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
        });
        if let Some(markup) = reply_markup {
            body["reply_markup"] = markup;
        }

        let response = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|err| DomainError::DeliveryFailed(format!("sendMessage failed: {err}")))?;

        // The Bot API answers errors with a JSON envelope too, so parse
        // the body regardless of HTTP status.
        let envelope: ApiEnvelope = response.json().await.map_err(|err| {
            DomainError::DeliveryFailed(format!("invalid sendMessage response: {err}"))
        })?;

        if !envelope.ok {
            return Err(DomainError::DeliveryFailed(format!(
                "sendMessage rejected: {}",
                envelope.description.unwrap_or_default()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify_slot(&self, account_id: i64, slot: &Slot) -> DomainResult<()> {
        self.send_message(
            account_id,
            &message::slot_message(slot),
            Some(message::slot_keyboard(slot.id)),
        )
        .await?;
        info!(account_id, class_id = slot.id, "Slot notification sent");
        Ok(())
    }

    async fn confirm_auto_booking(
        &self,
        account_id: i64,
        slot: &Slot,
        filter: &Filter,
    ) -> DomainResult<()> {
        self.send_message(account_id, &message::auto_booking_message(slot, filter), None)
            .await?;
        info!(account_id, class_id = slot.id, filter_id = filter.id, "Auto-booking confirmation sent");
        Ok(())
    }

    async fn notify_error(&self, account_id: i64, text: &str) -> DomainResult<()> {
        self.send_message(account_id, &message::error_message(text), None)
            .await?;
        warn!(account_id, text, "Error notification sent");
        Ok(())
    }
}
