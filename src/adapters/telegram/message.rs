//! Message composition for the Telegram notifier.
//!
//! Messages use Telegram's HTML parse mode; interpolated values are
//! escaped so a class name containing `&` or `<` cannot break markup.

use serde_json::{json, Value};

use crate::domain::models::{Filter, Slot};

/// The "free spot found" notification body.
///
/// Day is rendered as the English weekday plus `DD.MM.YYYY`; the time
/// range's end is start plus duration.
pub fn slot_message(slot: &Slot) -> String {
    let trainer = slot.trainer.as_deref().unwrap_or("Unknown");
    format!(
        "<b>Free spot found for a class!</b>\n\n\
         <b>{title}</b>\n\
         Gym: {gym}\n\
         Trainer: {trainer}\n\
         Type: {title}\n\
         Day: {day}\n\
         Time: {start} - {end}\n\
         Available spots: {spots}",
        title = escape_html(&slot.name),
        gym = escape_html(&slot.club_name),
        trainer = escape_html(trainer),
        day = slot.start.format("%A, %d.%m.%Y"),
        start = slot.start.format("%H:%M"),
        end = slot.end().format("%H:%M"),
        spots = slot.available_spots,
    )
}

/// Inline book/dismiss actions attached to a slot notification. The
/// callbacks are consumed by the chat UI layer, not by the engine.
pub fn slot_keyboard(class_id: i64) -> Value {
    json!({
        "inline_keyboard": [[
            { "text": "Book", "callback_data": format!("book_{class_id}") },
            { "text": "Not Interested", "callback_data": format!("skip_{class_id}") },
        ]]
    })
}

/// The auto-booking confirmation body, naming the credited filter.
pub fn auto_booking_message(slot: &Slot, filter: &Filter) -> String {
    let trainer = slot.trainer.as_deref().unwrap_or("Unknown");
    format!(
        "\u{1F916} <b>Auto-booking successful!</b>\n\n\
         <b>{title}</b>\n\
         Gym: {gym}\n\
         Trainer: {trainer}\n\
         Date & Time: {when}\n\n\
         <i>Filter: {label}</i>",
        title = escape_html(&slot.name),
        gym = escape_html(&slot.club_name),
        trainer = escape_html(trainer),
        when = slot.start.format("%d.%m.%Y %H:%M"),
        label = escape_html(&filter.label()),
    )
}

/// A per-account error surface, e.g. rejected credentials.
pub fn error_message(text: &str) -> String {
    format!("<b>Error:</b> {}", escape_html(text))
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
