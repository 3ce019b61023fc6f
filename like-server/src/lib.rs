//! like-server library crate.
//!
//! Exposes the HTTP surface and runtime wiring for integration testing.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod worker;

pub use config::ServiceConfig;
pub use error::{Error, Result};
