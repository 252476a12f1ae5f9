//! Syntaxes: ordered argument sequences merged into a command tree.
//!
//! A syntax can be assembled from [`Argument`] values or compiled from the
//! compact notation used in command definitions:
//!
//! ```text
//! reload                      literal
//! <name:string>               required variable
//! [times:int]                 optional variable
//! <player>                    required variable, defaults to `word`
//! ```

use uniform_foundation::{Error, Result};

use crate::argument::ParserRegistry;
use crate::node::Argument;

/// Parser used when a pattern names no type.
pub const DEFAULT_ARGUMENT_TYPE: &str = "word";

/// An ordered sequence of arguments.
#[derive(Clone, Debug, Default)]
pub struct Syntax {
    arguments: Vec<Argument>,
}

impl Syntax {
    /// Creates an empty syntax.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an argument.
    #[must_use]
    pub fn then(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Compiles a syntax pattern, resolving argument types in `parsers`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownParser` for an unregistered type and `InvalidGrammar`
    /// for a malformed token.
    pub fn compile(pattern: &str, parsers: &ParserRegistry) -> Result<Self> {
        pattern
            .split_whitespace()
            .map(|token| compile_token(token, parsers))
            .collect::<Result<Vec<_>>>()
            .map(|arguments| Self { arguments })
    }

    /// The arguments in order.
    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// Returns true for the empty syntax.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

impl FromIterator<Argument> for Syntax {
    fn from_iter<I: IntoIterator<Item = Argument>>(iter: I) -> Self {
        Self {
            arguments: iter.into_iter().collect(),
        }
    }
}

fn compile_token(token: &str, parsers: &ParserRegistry) -> Result<Argument> {
    let (body, optional) = if let Some(inner) = strip_delimiters(token, '<', '>') {
        (inner, false)
    } else if let Some(inner) = strip_delimiters(token, '[', ']') {
        (inner, true)
    } else {
        if token.contains(['<', '>', '[', ']', ':']) {
            return Err(Error::invalid_grammar(format!(
                "malformed syntax token '{token}'"
            )));
        }
        return Ok(Argument::literal(token));
    };

    let (name, type_name) = body
        .split_once(':')
        .unwrap_or((body, DEFAULT_ARGUMENT_TYPE));
    if name.is_empty() || type_name.is_empty() {
        return Err(Error::invalid_grammar(format!(
            "malformed syntax token '{token}'"
        )));
    }

    let argument = Argument::shared(name, parsers.require(type_name)?);
    Ok(if optional { argument.optional() } else { argument })
}

fn strip_delimiters(token: &str, open: char, close: char) -> Option<&str> {
    token.strip_prefix(open)?.strip_suffix(close)
}
