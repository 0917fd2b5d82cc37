//! Infrastructure layer: configuration loading and validation.
//!
//! Everything else that talks to the outside world lives under
//! `adapters` behind the domain ports.

pub mod config;
