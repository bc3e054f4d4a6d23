//! Typed application configuration loaded from the environment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Opaque form-field identifiers keyed by their semantic meaning.
///
/// The upstream form service assigns non-memorable machine identifiers to
/// each field (e.g. `entry.1234567890`), so the mapping is configuration
/// rather than code. `usage_duration` is optional: some form layouts have
/// no duration field and derive it from the timestamps instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormFieldIds {
    pub name: String,

    #[serde(default)]
    pub usage_duration: Option<String>,

    pub start_time_hour: String,
    pub start_time_minute: String,
    pub start_date_year: String,
    pub start_date_month: String,
    pub start_date_day: String,

    pub end_time_hour: String,
    pub end_time_minute: String,
    pub end_date_year: String,
    pub end_date_month: String,
    pub end_date_day: String,
}

/// Registration map: Telegram username -> display name used in submissions.
///
/// Presence in this map is what makes a user "registered"; everyone else is
/// rejected by the session-mutating commands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRegistry(HashMap<String, String>);

impl UserRegistry {
    /// Returns the display name for a registered username.
    #[must_use]
    pub fn display_name(&self, username: &str) -> Option<&str> {
        self.0.get(username).map(String::as_str)
    }

    /// Checks whether a username is registered.
    #[must_use]
    pub fn is_registered(&self, username: &str) -> bool {
        self.0.contains_key(username)
    }

    /// Returns the number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if no users are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(username, display_name)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(u, n)| (u.as_str(), n.as_str()))
    }
}

/// Process-wide bot configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram bot token.
    pub token: String,

    /// Form submission endpoint URL.
    pub form_url: String,

    /// Semantic-name-to-field-id mapping for the form.
    pub form_fields: FormFieldIds,

    /// Registered users and their display names.
    pub registry: UserRegistry,
}

impl AppConfig {
    /// Creates configuration from environment variables.
    ///
    /// Expects `TOKEN`, `FORM_URL`, `FORM_FIELD_IDS` and `USER_NAME_MAPPING`
    /// to be set; the latter two hold JSON objects.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is missing or a JSON value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = require_env("TOKEN")?;
        let form_url = require_env("FORM_URL")?;

        let form_fields = serde_json::from_str(&require_env("FORM_FIELD_IDS")?)
            .map_err(ConfigError::InvalidFieldIds)?;

        let registry = serde_json::from_str(&require_env("USER_NAME_MAPPING")?)
            .map_err(ConfigError::InvalidUserMapping)?;

        Ok(Self {
            token,
            form_url,
            form_fields,
            registry,
        })
    }
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name))
}

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("FORM_FIELD_IDS is not a valid field-id mapping: {0}")]
    InvalidFieldIds(serde_json::Error),

    #[error("USER_NAME_MAPPING is not a valid user mapping: {0}")]
    InvalidUserMapping(serde_json::Error),
}
