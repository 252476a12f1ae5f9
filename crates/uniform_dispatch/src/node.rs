//! Argument nodes: the grammar units of a command tree.

use std::fmt;
use std::sync::Arc;

use uniform_foundation::{CommandSource, ExecutionScope, Permission, Value};

use crate::argument::{
    ArgumentError, ArgumentParser, BoolParser, ChoiceParser, FloatParser, GreedyStringParser,
    IntegerParser, StringParser, WordParser,
};
use crate::context::{Condition, Executor};
use crate::reader::StringReader;

/// What a node matches.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// An exact token.
    Literal {
        /// The token.
        token: Arc<str>,
        /// Whether case is ignored when matching.
        ignore_case: bool,
    },
    /// A named value read by a parser.
    Variable {
        /// Variable name, the key in the execution context.
        name: Arc<str>,
        /// The parser.
        parser: Arc<dyn ArgumentParser>,
    },
}

impl NodeKind {
    /// The literal token or variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Literal { token, .. } => token,
            Self::Variable { name, .. } => name,
        }
    }

    /// How the node is shown in usage strings: `reload` or `<player>`.
    #[must_use]
    pub fn usage_text(&self) -> String {
        match self {
            Self::Literal { token, .. } => token.to_string(),
            Self::Variable { name, .. } => format!("<{name}>"),
        }
    }
}

/// Who may pass a node, independent of permissions.
///
/// Set on a tree's root and on grafted sub-commands.
pub struct Requirement<S> {
    pub(crate) scope: ExecutionScope,
    pub(crate) condition: Option<Arc<dyn Condition<S>>>,
}

impl<S> Requirement<S> {
    /// The execution scope.
    #[must_use]
    pub const fn scope(&self) -> ExecutionScope {
        self.scope
    }

    /// Returns true if `source` satisfies both the scope and the condition.
    pub fn admits(&self, source: &S) -> bool
    where
        S: CommandSource,
    {
        self.scope.contains(source.kind())
            && self.condition.as_ref().is_none_or(|c| c.test(source))
    }
}

impl<S> Clone for Requirement<S> {
    fn clone(&self) -> Self {
        Self {
            scope: self.scope,
            condition: self.condition.clone(),
        }
    }
}

/// A successful match of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeMatch {
    /// Byte offset just past the consumed span.
    pub end: usize,
    /// Parsed value; `None` for literals.
    pub value: Option<Value>,
}

/// One grammar unit of a command tree.
///
/// Nodes are immutable once built and shared between aliases, trees, and
/// in-flight parses.
pub struct ArgumentNode<S> {
    pub(crate) kind: NodeKind,
    pub(crate) optional: bool,
    pub(crate) permission: Option<Permission>,
    pub(crate) requirement: Option<Requirement<S>>,
    pub(crate) executor: Option<Arc<dyn Executor<S>>>,
    pub(crate) children: Vec<Arc<ArgumentNode<S>>>,
}

impl<S> ArgumentNode<S> {
    /// What the node matches.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The literal token or variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Usage form of the node.
    #[must_use]
    pub fn usage_text(&self) -> String {
        self.kind.usage_text()
    }

    /// Returns true for literal nodes.
    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal { .. })
    }

    /// The parser of a variable node.
    #[must_use]
    pub fn parser(&self) -> Option<&Arc<dyn ArgumentParser>> {
        match &self.kind {
            NodeKind::Variable { parser, .. } => Some(parser),
            NodeKind::Literal { .. } => None,
        }
    }

    /// Whether the argument was declared optional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// The node's own permission, if any.
    #[must_use]
    pub const fn permission(&self) -> Option<&Permission> {
        self.permission.as_ref()
    }

    /// The node's scope and condition, if any.
    #[must_use]
    pub const fn requirement(&self) -> Option<&Requirement<S>> {
        self.requirement.as_ref()
    }

    /// The executor run when input ends at this node.
    #[must_use]
    pub fn executor(&self) -> Option<&Arc<dyn Executor<S>>> {
        self.executor.as_ref()
    }

    /// Returns true if input may end at this node.
    #[must_use]
    pub const fn is_executable(&self) -> bool {
        self.executor.is_some()
    }

    /// Children in registration order.
    #[must_use]
    pub fn children(&self) -> &[Arc<ArgumentNode<S>>] {
        &self.children
    }

    /// Literal children in registration order.
    pub fn literals(&self) -> impl Iterator<Item = &Arc<ArgumentNode<S>>> {
        self.children.iter().filter(|c| c.is_literal())
    }

    /// Variable children in registration order.
    pub fn variables(&self) -> impl Iterator<Item = &Arc<ArgumentNode<S>>> {
        self.children.iter().filter(|c| !c.is_literal())
    }

    /// Returns true if this literal node matches `token`.
    #[must_use]
    pub fn literal_matches(&self, token: &str) -> bool {
        match &self.kind {
            NodeKind::Literal { token: own, ignore_case: true } => own.eq_ignore_ascii_case(token),
            NodeKind::Literal { token: own, .. } => **own == *token,
            NodeKind::Variable { .. } => false,
        }
    }

    /// Returns true if this literal node could complete `prefix`.
    #[must_use]
    pub fn literal_completes(&self, prefix: &str) -> bool {
        match &self.kind {
            NodeKind::Literal { token, ignore_case } => starts_with(token, prefix, *ignore_case),
            NodeKind::Variable { .. } => false,
        }
    }

    /// Matches this node at the reader's cursor.
    ///
    /// The match must end on an argument boundary. The reader is left after
    /// the consumed span on success.
    ///
    /// # Errors
    ///
    /// Returns why the input at the cursor does not fit this node.
    pub fn try_match(&self, reader: &mut StringReader<'_>) -> Result<NodeMatch, ArgumentError> {
        let value = match &self.kind {
            NodeKind::Literal { token, .. } => {
                if !self.literal_matches(reader.peek_token()) {
                    return Err(ArgumentError::ExpectedLiteral(token.to_string()));
                }
                reader.read_unquoted();
                None
            }
            NodeKind::Variable { parser, .. } => Some(parser.parse(reader)?),
        };
        if !reader.at_boundary() {
            return Err(ArgumentError::TrailingData);
        }
        Ok(NodeMatch {
            end: reader.cursor(),
            value,
        })
    }
}

impl<S> fmt::Debug for ArgumentNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentNode")
            .field("kind", &self.kind)
            .field("optional", &self.optional)
            .field("permission", &self.permission)
            .field("executable", &self.is_executable())
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

pub(crate) fn starts_with(text: &str, prefix: &str, ignore_case: bool) -> bool {
    if ignore_case {
        text.len() >= prefix.len()
            && text.is_char_boundary(prefix.len())
            && text[..prefix.len()].eq_ignore_ascii_case(prefix)
    } else {
        text.starts_with(prefix)
    }
}

/// One element of a syntax: a literal or variable plus its flags.
///
/// Syntaxes are merged into a command tree by the command builder.
#[derive(Clone, Debug)]
pub struct Argument {
    pub(crate) kind: NodeKind,
    pub(crate) optional: bool,
    pub(crate) permission: Option<Permission>,
}

impl Argument {
    fn of(kind: NodeKind) -> Self {
        Self {
            kind,
            optional: false,
            permission: None,
        }
    }

    /// A case-sensitive literal.
    #[must_use]
    pub fn literal(token: impl AsRef<str>) -> Self {
        Self::of(NodeKind::Literal {
            token: Arc::from(token.as_ref()),
            ignore_case: false,
        })
    }

    /// A literal matched without regard to ASCII case.
    #[must_use]
    pub fn literal_ignore_case(token: impl AsRef<str>) -> Self {
        Self::of(NodeKind::Literal {
            token: Arc::from(token.as_ref()),
            ignore_case: true,
        })
    }

    /// A variable read by `parser`.
    #[must_use]
    pub fn variable(name: impl AsRef<str>, parser: impl ArgumentParser + 'static) -> Self {
        Self::shared(name, Arc::new(parser))
    }

    /// A variable read by an already shared parser.
    #[must_use]
    pub fn shared(name: impl AsRef<str>, parser: Arc<dyn ArgumentParser>) -> Self {
        Self::of(NodeKind::Variable {
            name: Arc::from(name.as_ref()),
            parser,
        })
    }

    /// A single word.
    #[must_use]
    pub fn word(name: impl AsRef<str>) -> Self {
        Self::variable(name, WordParser)
    }

    /// A quoted string or single word.
    #[must_use]
    pub fn string(name: impl AsRef<str>) -> Self {
        Self::variable(name, StringParser)
    }

    /// The rest of the line.
    #[must_use]
    pub fn greedy(name: impl AsRef<str>) -> Self {
        Self::variable(name, GreedyStringParser)
    }

    /// An integer.
    #[must_use]
    pub fn int(name: impl AsRef<str>) -> Self {
        Self::variable(name, IntegerParser::new())
    }

    /// An integer in `min..=max`.
    #[must_use]
    pub fn int_between(name: impl AsRef<str>, min: i64, max: i64) -> Self {
        Self::variable(name, IntegerParser::between(min, max))
    }

    /// A float.
    #[must_use]
    pub fn float(name: impl AsRef<str>) -> Self {
        Self::variable(name, FloatParser::new())
    }

    /// A float in `min..=max`.
    #[must_use]
    pub fn float_between(name: impl AsRef<str>, min: f64, max: f64) -> Self {
        Self::variable(name, FloatParser::between(min, max))
    }

    /// `true` or `false`.
    #[must_use]
    pub fn bool(name: impl AsRef<str>) -> Self {
        Self::variable(name, BoolParser)
    }

    /// One of a fixed set of words.
    #[must_use]
    pub fn choice<I, T>(name: impl AsRef<str>, choices: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let name = name.as_ref();
        Self::variable(name, ChoiceParser::new(name, choices))
    }

    /// Marks the argument optional. Optional arguments must trail the syntax.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Gates the argument behind its own permission.
    #[must_use]
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// What the argument matches.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Whether the argument is optional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }
}
