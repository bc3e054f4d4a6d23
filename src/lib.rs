//! Redhill Aircon Bot Library
//!
//! A Telegram bot that tracks shared air-conditioner usage.
//!
//! This crate provides the core functionality for:
//! - Loading and validating the bot configuration from the environment
//! - Tracking per-user usage sessions (volatile or file-backed)
//! - Dispatching chat commands to their handlers
//! - Reporting completed intervals to an external form endpoint

pub mod commands;
pub mod config;
pub mod form;
pub mod session;
