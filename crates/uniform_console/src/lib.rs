//! Console host for Uniform commands.
//!
//! This crate provides:
//! - [`ConsoleHost`] - A command map that routes console lines to command trees
//! - [`ConsoleCommand`] - One command tree wrapped the way a host command map expects
//! - [`ConsoleUser`] - The console operator or a simulated player
//! - [`Console`] - Interactive loop with tab completion
//! - [`commands`] - Example cross-platform commands

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod adapter;
pub mod audience;
pub mod commands;
pub mod editor;
pub mod host;
pub mod repl;
pub mod user;

pub use adapter::{ConsoleCommand, describe};
pub use audience::{Audience, BufferedAudience, CommandUser, StdoutAudience};
pub use commands::{
    AdminCommand, ExampleCrossPlatCommand, GamemodeCommand, GreetCommand, register_examples,
};
pub use editor::{LineEditor, ReadResult, RustylineEditor, ScriptedEditor};
pub use host::{ConsoleHost, UNKNOWN_COMMAND};
pub use repl::{Console, LineOutcome};
pub use user::ConsoleUser;
