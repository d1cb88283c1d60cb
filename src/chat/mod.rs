//! Chat application module for the travel-planning REPL.
//!
//! This module provides a streaming REPL chat interface built on top of
//! the wayfarer client library. It supports:
//!
//! - Streaming replies with markdown-safe incremental display
//! - Slash commands for auth and chat control
//! - Configurable API endpoint and session persistence
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Transcript controller and streaming send logic
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{ChatSession, SessionStats};
