//! Port trait definitions (hexagonal architecture).
//!
//! Async trait interfaces the adapters implement:
//! - Store ports: accounts, filters, bookings, notification markers
//! - `BookingGateway` / `BookingSession`: the external booking portal
//! - `Notifier`: outbound messages to account owners
//!
//! These contracts keep the engine independent of SQLite, the portal's
//! HTTP shape, and the delivery transport.

pub mod account_repository;
pub mod booking_gateway;
pub mod booking_repository;
pub mod filter_repository;
pub mod notification_repository;
pub mod notifier;

pub use account_repository::AccountRepository;
pub use booking_gateway::{BookingGateway, BookingSession};
pub use booking_repository::BookingRepository;
pub use filter_repository::FilterRepository;
pub use notification_repository::NotificationRepository;
pub use notifier::Notifier;
