//! Command trees and dispatch for Uniform.
//!
//! One command definition is compiled into a tree of argument nodes, then
//! parsed, executed and completed the same way on every host.
//!
//! # Architecture
//!
//! ```text
//! "greet Alice 3"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ NAME LOOKUP     │  → registry snapshot: "greet" (or alias "hello")
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ ACCESS          │  → condition, scope, then permission of the root
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ TRAVERSAL       │  → greet <name:"Alice"> <times:3>
//! │                 │    literals first, variables backtrack in order
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ EXECUTION       │  → executor(ExecutionContext)
//! └─────────────────┘
//! ```
//!
//! Suggestions and usage strings reuse the traversal.
//!
//! # Modules
//!
//! - [`reader`] - Cursor over raw input with quoting
//! - [`argument`] - Variable parsers and the parser registry
//! - [`node`] - Argument nodes and syntax elements
//! - [`syntax`] - Syntaxes and the compact syntax notation
//! - [`tree`] - Command trees, the builder and command providers
//! - [`context`] - Executors, conditions and the execution context
//! - [`permission`] - Permission evaluators
//! - [`parse`] - Input matching and parse state
//! - [`dispatcher`] - Registration and the host entry points
//! - [`suggestion`] - Completion suggestions
//! - [`usage`] - Usage strings
//! - [`config`] - Dispatcher configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod argument;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod node;
pub mod parse;
pub mod permission;
pub mod reader;
pub mod suggestion;
pub mod syntax;
pub mod tree;
pub mod usage;


// Re-export main types for convenience
pub use argument::{
    ArgumentError, ArgumentParser, BoolParser, ChoiceParser, FloatParser, GreedyStringParser,
    IntegerParser, ParserRegistry, StringParser, WordParser,
};
pub use config::DispatcherConfig;
pub use context::{
    Arguments, Condition, ExecutionContext, Executor, ExecutorResult, ParsedArgument,
};
pub use dispatcher::{Dispatcher, Executed, Registry};
pub use node::{Argument, ArgumentNode, NodeKind, Requirement};
pub use parse::{MatchedNode, ParseState};
pub use permission::{AllowAll, PermissionEvaluator, SourcePermissions};
pub use reader::StringReader;
pub use suggestion::Suggestion;
pub use syntax::Syntax;
pub use tree::{CommandBuilder, CommandProvider, CommandTree};
