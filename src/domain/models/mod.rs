//! Domain models for the classwatch engine.

pub mod account;
pub mod booking;
pub mod clubs;
pub mod config;
pub mod filter;
pub mod notification;
pub mod slot;

pub use account::{Account, Credentials};
pub use booking::{Booking, NewBooking, AUTO_BOOKING_CAP};
pub use clubs::{club_name, Club, CLUBS};
pub use config::{
    BookingServiceConfig, Config, DatabaseConfig, LoggingConfig, MonitorConfig, TelegramConfig,
};
pub use filter::{Filter, NewFilter, WeekdaySet, MAX_FILTERS_PER_ACCOUNT};
pub use notification::NotificationRecord;
pub use slot::{Activity, BookedSlot, SearchWindow, Slot, Trainer};
