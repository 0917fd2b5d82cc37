//! Adapters implementing the domain ports against real infrastructure:
//! SQLite persistence, the PerfectGym portal, and Telegram delivery.

pub mod perfectgym;
pub mod sqlite;
pub mod telegram;
