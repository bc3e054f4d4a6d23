//! Configuration module for the aircon bot.
//!
//! Handles loading and validation of the bot configuration: the bot
//! credential, the form endpoint, the form field identifiers, and the
//! registration map. Loaded once at startup, immutable afterwards.

mod settings;

pub use settings::{AppConfig, ConfigError, FormFieldIds, UserRegistry};
