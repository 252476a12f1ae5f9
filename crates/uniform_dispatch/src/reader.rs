//! Cursor over raw command input.
//!
//! Arguments are separated by a single space. Quoted strings keep their
//! spaces and support `\"` and `\\` escapes.

use crate::argument::ArgumentError;

/// Separator between arguments.
pub const ARGUMENT_SEPARATOR: char = ' ';

const ESCAPE: char = '\\';

/// Returns true if `c` opens or closes a quoted string.
#[must_use]
pub const fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Returns true if `c` may appear in a number literal.
#[must_use]
pub const fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '-' || c == '+'
}

/// A read cursor over one line of input.
///
/// The cursor is a byte offset and always sits on a char boundary.
#[derive(Clone, Debug)]
pub struct StringReader<'a> {
    input: &'a str,
    cursor: usize,
}

impl<'a> StringReader<'a> {
    /// Creates a reader at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, cursor: 0 }
    }

    /// Creates a reader positioned at `cursor`.
    #[must_use]
    pub fn at(input: &'a str, cursor: usize) -> Self {
        let mut reader = Self::new(input);
        reader.set_cursor(cursor);
        reader
    }

    /// The full input.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Current byte offset.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor, clamped to the input and snapped back to a char boundary.
    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.input.len());
        while !self.input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    /// Input not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    /// Input already consumed.
    #[must_use]
    pub fn consumed(&self) -> &'a str {
        &self.input[..self.cursor]
    }

    /// Returns true while input remains.
    #[must_use]
    pub fn can_read(&self) -> bool {
        self.cursor < self.input.len()
    }

    /// Next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Consumes and returns the next character.
    pub fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    /// Consumes `c` if it is next.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.cursor += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Returns true if the reader sits at an argument boundary (separator or end).
    #[must_use]
    pub fn at_boundary(&self) -> bool {
        matches!(self.peek(), None | Some(ARGUMENT_SEPARATOR))
    }

    /// The next separator-delimited token, without consuming it.
    #[must_use]
    pub fn peek_token(&self) -> &'a str {
        let rest = self.remaining();
        rest.find(ARGUMENT_SEPARATOR).map_or(rest, |end| &rest[..end])
    }

    /// Reads everything up to the next separator.
    pub fn read_unquoted(&mut self) -> &'a str {
        let token = self.peek_token();
        self.cursor += token.len();
        token
    }

    /// Reads a quoted string; the reader must sit on the opening quote.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing opening quote, an unknown escape, or
    /// an unterminated string.
    pub fn read_quoted(&mut self) -> Result<String, ArgumentError> {
        let Some(quote) = self.peek().filter(|c| is_quote(*c)) else {
            return Err(ArgumentError::ExpectedQuote);
        };
        self.read();
        self.read_until(quote)
    }

    fn read_until(&mut self, terminator: char) -> Result<String, ArgumentError> {
        let mut result = String::new();
        let mut escaped = false;
        while let Some(c) = self.read() {
            if escaped {
                if c == terminator || c == ESCAPE {
                    result.push(c);
                    escaped = false;
                } else {
                    self.cursor -= c.len_utf8();
                    return Err(ArgumentError::InvalidEscape(c));
                }
            } else if c == ESCAPE {
                escaped = true;
            } else if c == terminator {
                return Ok(result);
            } else {
                result.push(c);
            }
        }
        Err(ArgumentError::UnclosedQuote)
    }

    /// Reads a quoted string if one starts here, otherwise an unquoted token.
    ///
    /// # Errors
    ///
    /// Propagates quoted-string errors.
    pub fn read_string(&mut self) -> Result<String, ArgumentError> {
        match self.peek() {
            Some(c) if is_quote(c) => self.read_quoted(),
            _ => Ok(self.read_unquoted().to_string()),
        }
    }

    /// Reads the rest of the input.
    pub fn read_remaining(&mut self) -> &'a str {
        let rest = self.remaining();
        self.cursor = self.input.len();
        rest
    }

    /// Reads a run of number characters.
    pub fn read_number(&mut self) -> &'a str {
        let rest = self.remaining();
        let len = rest
            .char_indices()
            .find(|(_, c)| !is_number_char(*c))
            .map_or(rest.len(), |(i, _)| i);
        self.cursor += len;
        &rest[..len]
    }
}
