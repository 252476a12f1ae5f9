//! Matching input against a command tree.
//!
//! The traversal walks the tree depth first from the root. At every node a
//! literal child matching the next token wins outright. Otherwise variable
//! children are tried in registration order and the first whose subtree
//! consumes the whole input wins. When nothing matches, the failure that got
//! furthest into the input is kept; at equal cursors an access failure
//! outranks a syntax failure.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use tracing::trace;
use uniform_foundation::{CommandSource, Error, Permission, Value};

use crate::context::{Arguments, ParsedArgument};
use crate::node::ArgumentNode;
use crate::permission::{PermissionEvaluator, grants};
use crate::reader::{ARGUMENT_SEPARATOR, StringReader};
use crate::tree::CommandTree;

/// Reason used when no child of a node accepts the next token.
pub const UNKNOWN_ARGUMENT: &str = "unknown or incomplete command";

/// Reason used when input continues past a node with no children.
pub const TRAILING_ARGUMENT: &str = "incorrect argument for command";

/// A node on the matched path and the input span it consumed.
pub struct MatchedNode<S> {
    /// The node.
    pub node: Arc<ArgumentNode<S>>,
    /// Byte range of its token in the input.
    pub range: Range<usize>,
}

impl<S> Clone for MatchedNode<S> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
            range: self.range.clone(),
        }
    }
}

impl<S> fmt::Debug for MatchedNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchedNode")
            .field("node", &self.node.name())
            .field("range", &self.range)
            .finish()
    }
}

/// The outcome of parsing one line.
///
/// On success the path ends at an executable node and the whole input was
/// consumed. On failure the path and arguments are those of the partial parse
/// that produced the reported error.
pub struct ParseState<S> {
    pub(crate) input: String,
    pub(crate) command: Option<CommandTree<S>>,
    pub(crate) path: Vec<MatchedNode<S>>,
    pub(crate) arguments: Arguments,
    pub(crate) cursor: usize,
    pub(crate) failure: Option<Error>,
}

impl<S> ParseState<S> {
    pub(crate) fn unknown(input: &str, name: &str) -> Self {
        Self {
            input: input.to_string(),
            command: None,
            path: Vec::new(),
            arguments: Arguments::new(),
            cursor: 0,
            failure: Some(Error::unknown_command(name).at(input, 0)),
        }
    }

    /// The parsed input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The command the first token resolved to.
    #[must_use]
    pub const fn command(&self) -> Option<&CommandTree<S>> {
        self.command.as_ref()
    }

    /// Matched nodes, root first.
    #[must_use]
    pub fn path(&self) -> &[MatchedNode<S>] {
        &self.path
    }

    /// The deepest matched node.
    #[must_use]
    pub fn last(&self) -> Option<&MatchedNode<S>> {
        self.path.last()
    }

    /// Parsed variable values.
    #[must_use]
    pub const fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// How far parsing got: the input length on success, the failure
    /// position otherwise.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Why parsing failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    /// Returns true if the input fully matched an executable path.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Consumes the state, yielding the failure if there was one.
    ///
    /// # Errors
    ///
    /// Returns the recorded failure.
    pub fn into_result(self) -> uniform_foundation::Result<Self> {
        match self.failure {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}

impl<S> fmt::Debug for ParseState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseState")
            .field("input", &self.input)
            .field("command", &self.command.as_ref().map(CommandTree::name))
            .field("path", &self.path)
            .field("arguments", &self.arguments)
            .field("cursor", &self.cursor)
            .field("failure", &self.failure)
            .finish()
    }
}

/// Failure ranks: higher wins at equal cursors.
const SYNTAX: u8 = 0;
const ACCESS: u8 = 1;

struct Failure<S> {
    error: Error,
    cursor: usize,
    rank: u8,
    path: Vec<MatchedNode<S>>,
    arguments: Arguments,
}

/// Parses `input` against `command`, whose name or alias occupies
/// `input[..label_end]`.
pub(crate) fn parse_command<S: CommandSource>(
    command: &CommandTree<S>,
    input: &str,
    label_end: usize,
    source: &S,
    evaluator: &dyn PermissionEvaluator<S>,
) -> ParseState<S> {
    let root = MatchedNode {
        node: Arc::clone(command.root()),
        range: 0..label_end,
    };
    let mut state = ParseState {
        input: input.to_string(),
        command: Some(command.clone()),
        path: vec![root],
        arguments: Arguments::new(),
        cursor: 0,
        failure: None,
    };

    if !command.admits(source) {
        state.failure = Some(Error::condition_not_met(command.name()).at(input, 0));
        return state;
    }
    if !grants(evaluator, source, command.permission()) {
        state.failure = Some(denied(command.name(), command.permission()).at(input, 0));
        return state;
    }

    let mut traversal = Traversal {
        input,
        source,
        evaluator,
        path: std::mem::take(&mut state.path),
        arguments: Arguments::new(),
        best: None,
        recorded: 0,
    };
    let root = Arc::clone(command.root());
    if traversal.descend(&root, label_end) {
        state.path = traversal.path;
        state.arguments = traversal.arguments;
        state.cursor = input.len();
    } else if let Some(failure) = traversal.best {
        state.path = failure.path;
        state.arguments = failure.arguments;
        state.cursor = failure.cursor;
        state.failure = Some(failure.error.at(input, failure.cursor));
    }
    state
}

fn denied(node: &str, permission: Option<&Permission>) -> Error {
    Error::permission_denied(node, permission.map_or("", Permission::node))
}

struct Traversal<'a, S> {
    input: &'a str,
    source: &'a S,
    evaluator: &'a dyn PermissionEvaluator<S>,
    path: Vec<MatchedNode<S>>,
    arguments: Arguments,
    best: Option<Failure<S>>,
    recorded: usize,
}

impl<S: CommandSource> Traversal<'_, S> {
    /// Continues from `node`, which consumed input up to `cursor`.
    ///
    /// Returns true once the whole input is matched at an executable node,
    /// leaving the winning path in place.
    fn descend(&mut self, node: &Arc<ArgumentNode<S>>, cursor: usize) -> bool {
        if cursor >= self.input.len() {
            if node.is_executable() {
                return true;
            }
            self.fail(Error::incomplete(self.path_text(None)), cursor, SYNTAX);
            return false;
        }

        let start = cursor + ARGUMENT_SEPARATOR.len_utf8();
        if start >= self.input.len() {
            self.fail(Error::incomplete(self.path_text(None)), start, SYNTAX);
            return false;
        }
        if node.children().is_empty() {
            self.fail(
                Error::syntax(self.path_text(None), TRAILING_ARGUMENT),
                start,
                SYNTAX,
            );
            return false;
        }

        let before = self.recorded;
        let token = StringReader::at(self.input, start).peek_token();
        if let Some(literal) = node.literals().find(|l| l.literal_matches(token)) {
            trace!(node = literal.name(), start, "literal matched");
            if self.admit(literal, start) {
                self.push(literal, start..start + token.len(), None);
                if self.descend(literal, start + token.len()) {
                    return true;
                }
                self.pop();
                return false;
            }
        }

        for variable in node.variables() {
            let mut reader = StringReader::at(self.input, start);
            match (variable.try_match(&mut reader), self.accessible(variable)) {
                (Err(reason), None) => {
                    trace!(node = variable.name(), start, %reason, "variable rejected input");
                    let path = self.path_text(Some(variable));
                    self.fail(Error::syntax(path, reason.to_string()), start, SYNTAX);
                }
                (Err(_), Some(_)) => {}
                (Ok(_), Some(error)) => {
                    trace!(node = variable.name(), "access denied");
                    self.fail(error, start, ACCESS);
                }
                (Ok(m), None) => {
                    trace!(node = variable.name(), start, end = m.end, "variable matched");
                    self.push(variable, start..m.end, m.value);
                    if self.descend(variable, m.end) {
                        return true;
                    }
                    self.pop();
                }
            }
        }

        if self.recorded == before {
            let expected = node
                .literals()
                .filter(|l| self.accessible(l).is_none())
                .map(|l| l.name().to_string())
                .collect::<Vec<_>>();
            let reason = if expected.is_empty() {
                UNKNOWN_ARGUMENT.to_string()
            } else {
                format!("{UNKNOWN_ARGUMENT}, expected one of: {}", expected.join(", "))
            };
            self.fail(Error::syntax(self.path_text(None), reason), start, SYNTAX);
        }
        false
    }

    /// The access error for `node`, or `None` when the source may use it.
    ///
    /// Scope and condition are checked before the permission.
    fn accessible(&self, node: &ArgumentNode<S>) -> Option<Error> {
        if node.requirement().is_some_and(|r| !r.admits(self.source)) {
            return Some(Error::condition_not_met(self.path_text(Some(node))));
        }
        if grants(self.evaluator, self.source, node.permission()) {
            None
        } else {
            Some(denied(&self.path_text(Some(node)), node.permission()))
        }
    }

    /// Checks access to a matched literal, recording a failure if denied.
    fn admit(&mut self, node: &ArgumentNode<S>, start: usize) -> bool {
        match self.accessible(node) {
            None => true,
            Some(error) => {
                trace!(node = node.name(), "access denied");
                self.fail(error, start, ACCESS);
                false
            }
        }
    }

    fn push(&mut self, node: &Arc<ArgumentNode<S>>, range: Range<usize>, value: Option<Value>) {
        if let Some(value) = value {
            self.arguments.insert(
                node.name(),
                ParsedArgument {
                    range: range.clone(),
                    value,
                },
            );
        }
        self.path.push(MatchedNode {
            node: Arc::clone(node),
            range,
        });
    }

    fn pop(&mut self) {
        if let Some(matched) = self.path.pop() {
            if !matched.node.is_literal() {
                self.arguments.remove(matched.node.name());
            }
        }
    }

    /// Records a failure, keeping the furthest and then highest ranked one.
    fn fail(&mut self, error: Error, cursor: usize, rank: u8) {
        self.recorded += 1;
        let better = self
            .best
            .as_ref()
            .is_none_or(|best| (cursor, rank) > (best.cursor, best.rank));
        if better {
            self.best = Some(Failure {
                error,
                cursor,
                rank,
                path: self.path.clone(),
                arguments: self.arguments.clone(),
            });
        }
    }

    fn path_text(&self, extra: Option<&ArgumentNode<S>>) -> String {
        let mut text = self
            .path
            .iter()
            .map(|m| m.node.usage_text())
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(node) = extra {
            text.push(' ');
            text.push_str(&node.usage_text());
        }
        text
    }
}
