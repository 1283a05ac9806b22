//! Core domain + application logic for the promo-watch relay.
//!
//! This crate is intentionally framework-agnostic. The Telegram listener and
//! the Bot API notifier live behind ports (traits) implemented in the
//! adapter crate.

pub mod classifier;
pub mod config;
pub mod domain;
pub mod errors;
pub mod filters;
pub mod logging;
pub mod ports;
pub mod reload;

pub use errors::{Error, Result};
