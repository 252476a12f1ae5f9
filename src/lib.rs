//! Uniform - cross-platform command dispatch
//!
//! This crate re-exports all layers of the Uniform system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: uniform_console    - Console host, line editor, REPL, example commands
//! Layer 1: uniform_dispatch   - Command trees, parsing, permissions, suggestions
//! Layer 0: uniform_foundation - Core types (Value, Permission, CommandSource, Error)
//! ```

pub use uniform_console as console;
pub use uniform_dispatch as dispatch;
pub use uniform_foundation as foundation;
