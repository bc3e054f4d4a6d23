//! Command types and definitions.

use std::fmt;

/// Available bot commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Show the welcome message.
    Start,

    /// Show the list of supported commands.
    Help,

    /// Start a usage timer.
    On,

    /// Stop the timer and submit the interval.
    Off,

    /// Cancel the timer without submitting.
    Abort,

    /// Submit a manually specified number of hours. Carries the raw
    /// argument text; validation happens in the handler so that malformed
    /// input gets its own reply.
    Hour(String),
}

impl BotCommand {
    /// Parses a command from a message text.
    ///
    /// Returns `None` if the message is not one of the known commands;
    /// such messages get the fallback reply.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if !text.starts_with('/') {
            return None;
        }

        let after_slash = &text[1..];

        let (cmd, args) = match after_slash.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd, args.trim()),
            None => (after_slash, ""),
        };

        // In group chats commands arrive as "/on@SomeBot".
        let cmd = cmd.split('@').next().unwrap_or(cmd).to_lowercase();

        match cmd.as_str() {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            "abort" => Some(Self::Abort),
            "hour" => Some(Self::Hour(args.to_owned())),
            _ => None,
        }
    }

    /// Returns the command name as it appears in help.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Help => "help",
            Self::On => "on",
            Self::Off => "off",
            Self::Abort => "abort",
            Self::Hour(_) => "hour",
        }
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hour(args) => write!(f, "hour {args}"),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Parses the `/hour` argument: exactly one token holding a non-negative
/// decimal number.
///
/// A token passes when it contains at most one `.`, at least one digit, and
/// nothing but ASCII digits otherwise. This rejects signs, exponents and
/// multi-dot strings like `6.5.5`.
#[must_use]
pub fn parse_hours(args: &str) -> Option<f64> {
    let mut tokens = args.split_whitespace();
    let token = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    let mut seen_dot = false;
    let mut seen_digit = false;
    for ch in token.chars() {
        match ch {
            '.' if !seen_dot => seen_dot = true,
            '0'..='9' => seen_digit = true,
            _ => return None,
        }
    }
    if !seen_digit {
        return None;
    }

    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(BotCommand::parse("/start"), Some(BotCommand::Start));
        assert_eq!(BotCommand::parse("/help"), Some(BotCommand::Help));
        assert_eq!(BotCommand::parse("/on"), Some(BotCommand::On));
        assert_eq!(BotCommand::parse("/off"), Some(BotCommand::Off));
        assert_eq!(BotCommand::parse("/abort"), Some(BotCommand::Abort));
    }

    #[test]
    fn test_parse_hour_keeps_raw_args() {
        assert_eq!(
            BotCommand::parse("/hour 6.5"),
            Some(BotCommand::Hour("6.5".to_owned()))
        );
        assert_eq!(
            BotCommand::parse("/hour"),
            Some(BotCommand::Hour(String::new()))
        );
        assert_eq!(
            BotCommand::parse("/hour 6 5"),
            Some(BotCommand::Hour("6 5".to_owned()))
        );
    }

    #[test]
    fn test_parse_bot_suffix() {
        assert_eq!(
            BotCommand::parse("/on@RedhillAirconBot"),
            Some(BotCommand::On)
        );
        assert_eq!(
            BotCommand::parse("/hour@RedhillAirconBot 8"),
            Some(BotCommand::Hour("8".to_owned()))
        );
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(BotCommand::parse("/ON"), Some(BotCommand::On));
        assert_eq!(BotCommand::parse("/Help"), Some(BotCommand::Help));
    }

    #[test]
    fn test_parse_with_extra_whitespace() {
        assert_eq!(BotCommand::parse("  /off  "), Some(BotCommand::Off));
    }

    #[test]
    fn test_parse_non_commands() {
        assert_eq!(BotCommand::parse("hello there"), None);
        assert_eq!(BotCommand::parse("/unknown"), None);
        assert_eq!(BotCommand::parse(""), None);
        assert_eq!(BotCommand::parse("on"), None);
    }

    #[test]
    fn test_parse_hours_accepts_plain_numbers() {
        assert_eq!(parse_hours("6"), Some(6.0));
        assert_eq!(parse_hours("6.5"), Some(6.5));
        assert_eq!(parse_hours("0"), Some(0.0));
        assert_eq!(parse_hours(" 8 "), Some(8.0));
    }

    #[test]
    fn test_parse_hours_rejects_malformed() {
        assert_eq!(parse_hours("6.5.5"), None);
        assert_eq!(parse_hours("-1"), None);
        assert_eq!(parse_hours("abc"), None);
        assert_eq!(parse_hours("6 5"), None);
        assert_eq!(parse_hours(""), None);
        assert_eq!(parse_hours("."), None);
        assert_eq!(parse_hours("1e3"), None);
    }
}
