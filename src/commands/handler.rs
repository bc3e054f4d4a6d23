//! Command handler implementation.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use tracing::{debug, info};

use super::types::{BotCommand, parse_hours};
use crate::config::UserRegistry;
use crate::form::FormClient;
use crate::session::SessionStore;

const WELCOME: &str = "Welcome to RedhillAirconBot!\n\nIf you're new, please contact @samtjong to register before you can use this bot.\n\nOtherwise, type /help to see available commands.";

const HELP: &str = "List of commands:\n\n/help - Show available commands\n/on - Start timer\n/off - End timer\n/abort - Cancel ongoing timer\n/hour <h> - Record usage in hours (e.g. '/hour 6.5')";

const NOT_REGISTERED: &str =
    "You are not registered yet. Contact @samtjong to register before you can use this bot.";

const ALREADY_ACTIVE: &str = "You already have an active session.";

const TIMER_STARTED: &str =
    "Timer started. Use /off to stop the timer or /abort to cancel the timer.";

const NO_ACTIVE_SESSION: &str =
    "You don't have an active session. Use /on to start a new timer.";

const CANCELLED: &str = "Your session has been cancelled. Use /on to start a new timer.";

const SUBMIT_FAILED: &str = "Failed to submit the form. Please try again.";

const BAD_HOURS: &str = "I'm sorry, I can't tell how long you've used the AC.\n\nPlease input only one number after /hour (e.g. '/hour 8' or '/hour 6.5').";

const UNKNOWN_COMMAND: &str =
    "I'm sorry, I don't understand that command. Type /help to see available commands.";

/// The bot's fixed reporting timezone: UTC+8 (Asia/Singapore, no DST).
#[allow(clippy::unwrap_used)] // +08:00 is always in range
fn sgt() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

fn now_sgt() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&sgt())
}

/// Routes inbound messages to command handlers.
///
/// Registration is required for every session-mutating command (`/on`,
/// `/off`, `/abort`, `/hour`); session state is checked afterwards, per
/// command.
pub struct CommandHandler {
    /// Registered users and their display names.
    registry: UserRegistry,

    /// Open sessions, keyed by username.
    sessions: Arc<dyn SessionStore>,

    /// Client for the form endpoint.
    form: FormClient,
}

impl CommandHandler {
    /// Creates a new command handler.
    #[must_use]
    pub fn new(registry: UserRegistry, sessions: Arc<dyn SessionStore>, form: FormClient) -> Self {
        Self {
            registry,
            sessions,
            form,
        }
    }

    /// Handles one inbound message and returns the reply text.
    ///
    /// `username` is the sender's Telegram handle; accounts without one are
    /// treated as unregistered. Unknown commands and free text get the
    /// fallback reply.
    ///
    /// # Errors
    ///
    /// Returns an error only when the session store itself fails; user
    /// mistakes (unknown command, bad argument, wrong state) are replies,
    /// not errors.
    pub async fn handle(&self, username: Option<&str>, text: &str) -> Result<String> {
        match BotCommand::parse(text) {
            Some(command) => {
                debug!("Handling command: {command}");
                self.execute(username, command).await
            }
            None => Ok(UNKNOWN_COMMAND.to_owned()),
        }
    }

    async fn execute(&self, username: Option<&str>, command: BotCommand) -> Result<String> {
        match command {
            BotCommand::Start => Ok(WELCOME.to_owned()),
            BotCommand::Help => Ok(HELP.to_owned()),
            BotCommand::On => self.handle_on(username),
            BotCommand::Off => self.handle_off(username).await,
            BotCommand::Abort => self.handle_abort(username),
            BotCommand::Hour(args) => self.handle_hour(username, &args).await,
        }
    }

    /// Resolves a username to its registry entry.
    fn identify<'a>(&'a self, username: Option<&'a str>) -> Option<(&'a str, &'a str)> {
        let user = username?;
        let display_name = self.registry.display_name(user)?;
        Some((user, display_name))
    }

    fn handle_on(&self, username: Option<&str>) -> Result<String> {
        let Some((user, _)) = self.identify(username) else {
            return Ok(NOT_REGISTERED.to_owned());
        };

        if self.sessions.put(user, now_sgt())? {
            info!("Timer started for '{user}'");
            Ok(TIMER_STARTED.to_owned())
        } else {
            Ok(ALREADY_ACTIVE.to_owned())
        }
    }

    async fn handle_off(&self, username: Option<&str>) -> Result<String> {
        let Some((user, display_name)) = self.identify(username) else {
            return Ok(NOT_REGISTERED.to_owned());
        };

        // The session is gone before the submission result is known; a
        // failed submission does not restore it.
        let Some(start) = self.sessions.delete(user)? else {
            return Ok(NO_ACTIVE_SESSION.to_owned());
        };
        let end = now_sgt();

        if self.form.submit(display_name, &start, &end).await {
            info!("Submitted interval for '{user}'");
            Ok(format!(
                "Form submitted successfully! You used the AC from {} to {}.",
                start.format("%d/%m/%Y, %H:%M"),
                end.format("%d/%m/%Y, %H:%M")
            ))
        } else {
            Ok(SUBMIT_FAILED.to_owned())
        }
    }

    fn handle_abort(&self, username: Option<&str>) -> Result<String> {
        let Some((user, _)) = self.identify(username) else {
            return Ok(NOT_REGISTERED.to_owned());
        };

        if self.sessions.delete(user)?.is_some() {
            info!("Session cancelled for '{user}'");
            Ok(CANCELLED.to_owned())
        } else {
            Ok(NO_ACTIVE_SESSION.to_owned())
        }
    }

    async fn handle_hour(&self, username: Option<&str>, args: &str) -> Result<String> {
        let Some((user, display_name)) = self.identify(username) else {
            return Ok(NOT_REGISTERED.to_owned());
        };

        let Some(hours) = parse_hours(args) else {
            return Ok(BAD_HOURS.to_owned());
        };

        let end = now_sgt();
        #[allow(clippy::cast_possible_truncation)]
        let delta = Duration::milliseconds((hours * 3_600_000.0) as i64);
        let Some(start) = end.checked_sub_signed(delta) else {
            return Ok(BAD_HOURS.to_owned());
        };

        if self.form.submit(display_name, &start, &end).await {
            info!("Submitted {hours} manual hour(s) for '{user}'");
            Ok(format!(
                "Form submitted successfully! You used the AC for {} hours.",
                args.trim()
            ))
        } else {
            Ok(SUBMIT_FAILED.to_owned())
        }
    }
}
