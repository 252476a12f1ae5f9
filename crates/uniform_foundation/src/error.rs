//! Error types for the Uniform system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Grammar-level failures are ordinary values so a host can render them;
//! only [`ErrorKind::ExecutionFailure`] wraps a foreign error.

use std::fmt;

use thiserror::Error;

/// Result type alias for Uniform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by executors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Number of input characters shown before the cursor in error context.
const CONTEXT_AMOUNT: usize = 10;

/// The main error type for Uniform operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where in the input the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attaches the input and cursor position where the error occurred.
    #[must_use]
    pub fn at(self, input: impl Into<String>, cursor: usize) -> Self {
        self.with_context(ErrorContext::new(input, cursor))
    }

    /// Creates an unknown command error.
    #[must_use]
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownCommand { name: name.into() })
    }

    /// Creates a condition-not-met error.
    #[must_use]
    pub fn condition_not_met(node: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConditionNotMet { node: node.into() })
    }

    /// Creates a permission denied error.
    #[must_use]
    pub fn permission_denied(node: impl Into<String>, permission: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied {
            node: node.into(),
            permission: permission.into(),
        })
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::SyntaxError {
            node: node.into(),
            reason: reason.into(),
        })
    }

    /// Creates an incomplete command error.
    #[must_use]
    pub fn incomplete(node: impl Into<String>) -> Self {
        Self::new(ErrorKind::IncompleteCommand { node: node.into() })
    }

    /// Wraps an executor failure.
    #[must_use]
    pub fn execution_failure(command: impl Into<String>, cause: BoxError) -> Self {
        Self::new(ErrorKind::ExecutionFailure {
            command: command.into(),
            cause,
        })
    }

    /// Creates an invalid grammar error (a builder-time defect).
    #[must_use]
    pub fn invalid_grammar(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidGrammar(message.into()))
    }

    /// Returns the cursor position, if known.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.context.as_ref().map(|c| c.cursor)
    }

    /// Returns true for failures raised while parsing input.
    ///
    /// These are the errors a host renders back to the invoker as a
    /// usage problem rather than a fault.
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UnknownCommand { .. }
                | ErrorKind::ConditionNotMet { .. }
                | ErrorKind::PermissionDenied { .. }
                | ErrorKind::SyntaxError { .. }
                | ErrorKind::IncompleteCommand { .. }
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The first token matched no registered command or alias.
    #[error("unknown command: {name}")]
    UnknownCommand {
        /// The token that was looked up.
        name: String,
    },

    /// The command's invocation condition or execution scope rejected the source.
    #[error("command cannot be used here: {node}")]
    ConditionNotMet {
        /// Path of the node whose condition failed.
        node: String,
    },

    /// The source lacks permission for a node.
    #[error("no permission for {node} ({permission})")]
    PermissionDenied {
        /// Path of the denied node.
        node: String,
        /// The permission identifier that was checked.
        permission: String,
    },

    /// No candidate node could match the input at the cursor.
    #[error("{reason}")]
    SyntaxError {
        /// Path of the node being parsed when the failure occurred.
        node: String,
        /// Human-oriented description.
        reason: String,
    },

    /// Input ended before an executable node was reached.
    #[error("incomplete command: {node} expects more arguments")]
    IncompleteCommand {
        /// Path of the last node matched.
        node: String,
    },

    /// The resolved executor returned an error.
    #[error("command {command} failed: {cause}")]
    ExecutionFailure {
        /// Name of the command whose executor failed.
        command: String,
        /// The executor's error.
        #[source]
        cause: BoxError,
    },

    /// A command definition is malformed.
    #[error("invalid command grammar: {0}")]
    InvalidGrammar(String),

    /// A syntax pattern named an argument type with no registered parser.
    #[error("unknown argument type: {0}")]
    UnknownParser(String),

    /// A command name or alias is already taken by another command.
    #[error("command name already registered: {0}")]
    DuplicateCommand(String),

    /// Internal or host-side error (terminal, I/O).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where in the input an error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// The input that was being parsed.
    pub input: String,
    /// Byte offset into `input`.
    pub cursor: usize,
}

impl ErrorContext {
    /// Creates a new context.
    #[must_use]
    pub fn new(input: impl Into<String>, cursor: usize) -> Self {
        Self {
            input: input.into(),
            cursor,
        }
    }

    /// Returns the input up to the cursor, truncated to the last few characters.
    #[must_use]
    pub fn excerpt(&self) -> String {
        let mut cursor = self.cursor.min(self.input.len());
        while !self.input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        let before = &self.input[..cursor];
        let count = before.chars().count();
        if count > CONTEXT_AMOUNT {
            let tail: String = before.chars().skip(count - CONTEXT_AMOUNT).collect();
            format!("...{tail}")
        } else {
            before.to_string()
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<--[HERE]", self.excerpt())
    }
}
