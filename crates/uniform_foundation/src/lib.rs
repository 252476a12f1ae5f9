//! Core types, values, permissions, and errors for Uniform.
//!
//! This crate provides:
//! - [`Value`] - Parsed argument values handed to executors
//! - [`Permission`] - Permission nodes with a default grant policy
//! - [`CommandSource`] - The capability every host's sender type implements
//! - [`Error`] - Rich error types with input/cursor context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod permission;
pub mod source;
pub mod value;

pub use error::{BoxError, Error, ErrorContext, ErrorKind, Result};
pub use permission::{Permission, PermissionDefault};
pub use source::{CommandSource, ExecutionScope, SourceKind};
pub use value::Value;
