//! Variable argument parsers.
//!
//! A parser turns the text at the reader's cursor into a [`Value`]. Parsers
//! must be deterministic: the same remaining input always consumes the same
//! span or fails the same way.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use uniform_foundation::{Error, ErrorKind, Value};

use crate::reader::{StringReader, is_quote};

/// Why a parser rejected its input.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ArgumentError {
    /// Nothing to parse.
    #[error("expected argument")]
    ExpectedArgument,
    /// A quoted string was required.
    #[error("expected quote to start a string")]
    ExpectedQuote,
    /// A quoted string never closed.
    #[error("unclosed quoted string")]
    UnclosedQuote,
    /// Unsupported escape inside a quoted string.
    #[error("invalid escape sequence '\\{0}' in quoted string")]
    InvalidEscape(char),
    /// No digits where an integer was expected.
    #[error("expected integer")]
    ExpectedInt,
    /// Digits that do not form an integer.
    #[error("invalid integer '{0}'")]
    InvalidInt(String),
    /// Nothing where a number was expected.
    #[error("expected float")]
    ExpectedFloat,
    /// Text that does not form a number.
    #[error("invalid float '{0}'")]
    InvalidFloat(String),
    /// Integer below the parser's minimum.
    #[error("integer must not be less than {min}, found {found}")]
    IntTooLow {
        /// Minimum accepted.
        min: i64,
        /// Value read.
        found: i64,
    },
    /// Integer above the parser's maximum.
    #[error("integer must not be more than {max}, found {found}")]
    IntTooHigh {
        /// Maximum accepted.
        max: i64,
        /// Value read.
        found: i64,
    },
    /// Float below the parser's minimum.
    #[error("float must not be less than {min}, found {found}")]
    FloatTooLow {
        /// Minimum accepted.
        min: f64,
        /// Value read.
        found: f64,
    },
    /// Float above the parser's maximum.
    #[error("float must not be more than {max}, found {found}")]
    FloatTooHigh {
        /// Maximum accepted.
        max: f64,
        /// Value read.
        found: f64,
    },
    /// Nothing where a bool was expected.
    #[error("expected bool")]
    ExpectedBool,
    /// Text other than `true` / `false`.
    #[error("invalid bool, expected true or false but found '{0}'")]
    InvalidBool(String),
    /// Text outside a choice menu.
    #[error("unknown choice '{found}', expected one of: {}", .choices.join(", "))]
    UnknownChoice {
        /// Text read.
        found: String,
        /// Accepted choices.
        choices: Vec<String>,
    },
    /// A literal token was expected.
    #[error("expected '{0}'")]
    ExpectedLiteral(String),
    /// A parser stopped in the middle of a token.
    #[error("expected whitespace to end one argument, but found trailing data")]
    TrailingData,
    /// Parser-specific failure.
    #[error("{0}")]
    Custom(String),
}

/// A pluggable parser for variable arguments.
///
/// On success the reader must be left just after the consumed span. On
/// failure the dispatcher discards the reader, so its position does not matter.
pub trait ArgumentParser: Send + Sync + fmt::Debug {
    /// Short type name used in syntax notation and diagnostics (`int`, `word`).
    fn type_name(&self) -> &str;

    /// Type name plus configuration. Parsers with equal descriptors accept
    /// exactly the same input, so sibling variables using them can merge.
    fn descriptor(&self) -> String {
        self.type_name().to_string()
    }

    /// Parses a value at the reader's cursor.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] describing why the input was rejected.
    fn parse(&self, reader: &mut StringReader<'_>) -> Result<Value, ArgumentError>;

    /// Proposes completions for a partially typed argument.
    ///
    /// Candidates are whole tokens; the suggestion engine filters them by prefix.
    fn suggest(&self, _prefix: &str) -> Vec<String> {
        Vec::new()
    }

    /// Greedy parsers consume the rest of the line and must be last in a branch.
    fn is_greedy(&self) -> bool {
        false
    }
}

/// A single word: everything up to the next space.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordParser;

impl ArgumentParser for WordParser {
    fn type_name(&self) -> &str {
        "word"
    }

    fn parse(&self, reader: &mut StringReader<'_>) -> Result<Value, ArgumentError> {
        let word = reader.read_unquoted();
        if word.is_empty() {
            return Err(ArgumentError::ExpectedArgument);
        }
        Ok(Value::from(word))
    }
}

/// A quoted string, or a single word when unquoted.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringParser;

impl ArgumentParser for StringParser {
    fn type_name(&self) -> &str {
        "string"
    }

    fn parse(&self, reader: &mut StringReader<'_>) -> Result<Value, ArgumentError> {
        let quoted = reader.peek().is_some_and(is_quote);
        let text = reader.read_string()?;
        if text.is_empty() && !quoted {
            return Err(ArgumentError::ExpectedArgument);
        }
        Ok(Value::from(text))
    }
}

/// The rest of the line, spaces included.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyStringParser;

impl ArgumentParser for GreedyStringParser {
    fn type_name(&self) -> &str {
        "greedy"
    }

    fn parse(&self, reader: &mut StringReader<'_>) -> Result<Value, ArgumentError> {
        let text = reader.read_remaining();
        if text.is_empty() {
            return Err(ArgumentError::ExpectedArgument);
        }
        Ok(Value::from(text))
    }

    fn is_greedy(&self) -> bool {
        true
    }
}

/// A signed 64-bit integer within optional bounds.
#[derive(Clone, Copy, Debug)]
pub struct IntegerParser {
    min: i64,
    max: i64,
}

impl IntegerParser {
    /// An unbounded integer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min: i64::MIN,
            max: i64::MAX,
        }
    }

    /// An integer in `min..=max`.
    #[must_use]
    pub const fn between(min: i64, max: i64) -> Self {
        Self { min, max }
    }
}

impl Default for IntegerParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgumentParser for IntegerParser {
    fn type_name(&self) -> &str {
        "int"
    }

    fn descriptor(&self) -> String {
        if self.min == i64::MIN && self.max == i64::MAX {
            "int".to_string()
        } else {
            format!("int({}..={})", self.min, self.max)
        }
    }

    fn parse(&self, reader: &mut StringReader<'_>) -> Result<Value, ArgumentError> {
        let text = reader.read_number();
        if text.is_empty() {
            return Err(ArgumentError::ExpectedInt);
        }
        let found: i64 = text
            .parse()
            .map_err(|_| ArgumentError::InvalidInt(text.to_string()))?;
        if found < self.min {
            return Err(ArgumentError::IntTooLow {
                min: self.min,
                found,
            });
        }
        if found > self.max {
            return Err(ArgumentError::IntTooHigh {
                max: self.max,
                found,
            });
        }
        Ok(Value::Int(found))
    }
}

/// A 64-bit float within optional bounds.
#[derive(Clone, Copy, Debug)]
pub struct FloatParser {
    min: f64,
    max: f64,
}

impl FloatParser {
    /// An unbounded float.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min: f64::MIN,
            max: f64::MAX,
        }
    }

    /// A float in `min..=max`.
    #[must_use]
    pub const fn between(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Default for FloatParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgumentParser for FloatParser {
    fn type_name(&self) -> &str {
        "float"
    }

    fn descriptor(&self) -> String {
        // Bounds compare by bit pattern so the descriptor stays an exact key.
        if self.min.to_bits() == f64::MIN.to_bits() && self.max.to_bits() == f64::MAX.to_bits() {
            "float".to_string()
        } else {
            format!("float({}..={})", self.min, self.max)
        }
    }

    fn parse(&self, reader: &mut StringReader<'_>) -> Result<Value, ArgumentError> {
        let text = reader.read_number();
        if text.is_empty() {
            return Err(ArgumentError::ExpectedFloat);
        }
        let found: f64 = text
            .parse()
            .map_err(|_| ArgumentError::InvalidFloat(text.to_string()))?;
        if found < self.min {
            return Err(ArgumentError::FloatTooLow {
                min: self.min,
                found,
            });
        }
        if found > self.max {
            return Err(ArgumentError::FloatTooHigh {
                max: self.max,
                found,
            });
        }
        Ok(Value::Float(found))
    }
}

/// `true` or `false`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolParser;

impl ArgumentParser for BoolParser {
    fn type_name(&self) -> &str {
        "bool"
    }

    fn parse(&self, reader: &mut StringReader<'_>) -> Result<Value, ArgumentError> {
        match reader.read_unquoted() {
            "" => Err(ArgumentError::ExpectedBool),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            other => Err(ArgumentError::InvalidBool(other.to_string())),
        }
    }

    fn suggest(&self, _prefix: &str) -> Vec<String> {
        vec!["true".to_string(), "false".to_string()]
    }
}

/// One word out of a fixed menu, matched case-insensitively.
///
/// The parsed value is the choice as declared, not as typed.
#[derive(Clone, Debug)]
pub struct ChoiceParser {
    name: String,
    choices: Vec<String>,
}

impl ChoiceParser {
    /// Creates a choice parser named `name` over `choices`.
    #[must_use]
    pub fn new<I, T>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// The accepted choices in declaration order.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl ArgumentParser for ChoiceParser {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn descriptor(&self) -> String {
        format!("{}({})", self.name, self.choices.join("|"))
    }

    fn parse(&self, reader: &mut StringReader<'_>) -> Result<Value, ArgumentError> {
        let word = reader.read_unquoted();
        if word.is_empty() {
            return Err(ArgumentError::ExpectedArgument);
        }
        self.choices
            .iter()
            .find(|c| c.eq_ignore_ascii_case(word))
            .map(|c| Value::from(c.as_str()))
            .ok_or_else(|| ArgumentError::UnknownChoice {
                found: word.to_string(),
                choices: self.choices.clone(),
            })
    }

    fn suggest(&self, _prefix: &str) -> Vec<String> {
        self.choices.clone()
    }
}

/// Named parsers available to syntax notation.
///
/// Hosts and library users register their own types next to the built-ins.
#[derive(Clone, Debug, Default)]
pub struct ParserRegistry {
    parsers: BTreeMap<String, Arc<dyn ArgumentParser>>,
}

impl ParserRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in parsers.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let int: Arc<dyn ArgumentParser> = Arc::new(IntegerParser::new());
        let float: Arc<dyn ArgumentParser> = Arc::new(FloatParser::new());
        let boolean: Arc<dyn ArgumentParser> = Arc::new(BoolParser);
        registry.register_shared("word", Arc::new(WordParser));
        registry.register_shared("string", Arc::new(StringParser));
        registry.register_shared("greedy", Arc::new(GreedyStringParser));
        registry.register_shared("int", Arc::clone(&int));
        registry.register_shared("integer", int);
        registry.register_shared("float", Arc::clone(&float));
        registry.register_shared("double", float);
        registry.register_shared("bool", Arc::clone(&boolean));
        registry.register_shared("boolean", boolean);
        registry
    }

    /// Registers a parser under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, parser: impl ArgumentParser + 'static) {
        self.register_shared(name, Arc::new(parser));
    }

    /// Registers an already shared parser under `name`.
    pub fn register_shared(&mut self, name: impl Into<String>, parser: Arc<dyn ArgumentParser>) {
        self.parsers.insert(name.into(), parser);
    }

    /// Looks up a parser by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ArgumentParser>> {
        self.parsers.get(name).cloned()
    }

    /// Looks up a parser by name, failing with [`ErrorKind::UnknownParser`].
    ///
    /// # Errors
    ///
    /// Returns an error if no parser is registered under `name`.
    pub fn require(&self, name: &str) -> uniform_foundation::Result<Arc<dyn ArgumentParser>> {
        self.get(name)
            .ok_or_else(|| Error::new(ErrorKind::UnknownParser(name.to_string())))
    }

    /// Registered names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }
}
