//! PerfectGym client-portal adapter: gateway, session, wire shapes,
//! error classification, and the login retry policy.

pub mod client;
pub mod error;
pub mod retry;
pub mod wire;

pub use client::{PerfectGymGateway, PerfectGymSession};
pub use error::PortalError;
pub use retry::RetryPolicy;
