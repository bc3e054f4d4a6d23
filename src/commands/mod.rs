//! Command handling module.
//!
//! Processes user commands sent to the bot via Telegram messages.
//! Commands are plain slash commands (`/on`, `/off`, ...); any other text
//! falls through to a static "not understood" reply.

mod handler;
mod types;

pub use handler::CommandHandler;
pub use types::BotCommand;
