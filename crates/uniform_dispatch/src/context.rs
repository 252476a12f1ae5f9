//! Execution context and the capabilities attached to command nodes.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use uniform_foundation::{BoxError, Value};

use crate::node::ArgumentNode;
use crate::parse::MatchedNode;
use crate::tree::CommandTree;

/// What an executor returns.
pub type ExecutorResult = Result<(), BoxError>;

/// Runs a command once its input has been fully matched.
pub trait Executor<S>: Send + Sync {
    /// Executes the command.
    ///
    /// # Errors
    ///
    /// Any error is reported to the caller as an execution failure.
    fn execute(&self, ctx: &ExecutionContext<'_, S>) -> ExecutorResult;
}

impl<S, F> Executor<S> for F
where
    F: Fn(&ExecutionContext<'_, S>) -> ExecutorResult + Send + Sync,
{
    fn execute(&self, ctx: &ExecutionContext<'_, S>) -> ExecutorResult {
        self(ctx)
    }
}

/// A predicate over the source, evaluated before any permission check.
pub trait Condition<S>: Send + Sync {
    /// Returns true if `source` may invoke the command.
    fn test(&self, source: &S) -> bool;
}

impl<S, F> Condition<S> for F
where
    F: Fn(&S) -> bool + Send + Sync,
{
    fn test(&self, source: &S) -> bool {
        self(source)
    }
}

/// A variable's parsed value and the input span it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedArgument {
    /// Byte range in the input.
    pub range: Range<usize>,
    /// Parsed value.
    pub value: Value,
}

/// Parsed arguments keyed by variable name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    values: BTreeMap<String, ParsedArgument>,
}

impl Arguments {
    /// Creates an empty set of arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, argument: ParsedArgument) {
        self.values.insert(name.to_string(), argument);
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.values.remove(name);
    }

    /// Looks up an argument.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParsedArgument> {
        self.values.get(name)
    }

    /// Looks up an argument's value.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name).map(|a| &a.value)
    }

    /// Returns true if the argument was supplied.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of parsed arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, argument)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParsedArgument)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Everything an executor needs: the source, the matched node, and the
/// parsed argument values.
pub struct ExecutionContext<'a, S> {
    pub(crate) source: &'a S,
    pub(crate) input: &'a str,
    pub(crate) command: &'a CommandTree<S>,
    pub(crate) path: &'a [MatchedNode<S>],
    pub(crate) node: &'a ArgumentNode<S>,
    pub(crate) arguments: &'a Arguments,
}

impl<'a, S> ExecutionContext<'a, S> {
    /// The invoking source.
    #[must_use]
    pub const fn source(&self) -> &'a S {
        self.source
    }

    /// The raw input that was dispatched.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// The command that matched.
    #[must_use]
    pub const fn command(&self) -> &'a CommandTree<S> {
        self.command
    }

    /// The name or alias the command was invoked by.
    #[must_use]
    pub fn label(&self) -> &'a str {
        self.path
            .first()
            .map_or_else(|| self.command.name(), |m| &self.input[m.range.clone()])
    }

    /// The matched node path, root first.
    #[must_use]
    pub const fn path(&self) -> &'a [MatchedNode<S>] {
        self.path
    }

    /// The node whose executor is running.
    #[must_use]
    pub const fn node(&self) -> &'a ArgumentNode<S> {
        self.node
    }

    /// All parsed arguments.
    #[must_use]
    pub const fn arguments(&self) -> &'a Arguments {
        self.arguments
    }

    /// An argument's value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.arguments.value(name)
    }

    /// Returns true if an optional argument was supplied.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.arguments.contains(name)
    }

    /// A string argument.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    /// An integer argument.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    /// A float argument (integers widen).
    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// A boolean argument.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// The text an argument was parsed from, exactly as typed.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&'a str> {
        self.arguments
            .get(name)
            .map(|a| &self.input[a.range.clone()])
    }
}

impl<S> fmt::Debug for ExecutionContext<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("input", &self.input)
            .field("command", &self.command.name())
            .field("node", &self.node.name())
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}
