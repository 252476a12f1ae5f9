//! Command trees and their builder.
//!
//! A [`CommandBuilder`] accumulates syntaxes, sub-commands and metadata, then
//! [`build`](CommandBuilder::build) merges everything into one frozen tree.
//! Grammar defects surface here as `InvalidGrammar`, never at dispatch time.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::trace;
use uniform_foundation::{CommandSource, Error, ExecutionScope, Permission, Result};

use crate::context::{Condition, ExecutionContext, Executor, ExecutorResult};
use crate::node::{Argument, ArgumentNode, NodeKind, Requirement};
use crate::syntax::Syntax;

/// A cross-platform command definition.
///
/// Hosts turn a provider into a tree with [`CommandTree::from_provider`] and
/// register it with their own command system.
pub trait CommandProvider<S> {
    /// Primary name.
    fn name(&self) -> &str;

    /// One-line description.
    fn description(&self) -> &str {
        ""
    }

    /// Alternative names.
    fn aliases(&self) -> Vec<String> {
        Vec::new()
    }

    /// Permission required to run the command at all.
    fn permission(&self) -> Option<Permission> {
        None
    }

    /// Adds the command's grammar to `builder`.
    ///
    /// # Errors
    ///
    /// Returns an error if a syntax fails to compile.
    fn provide(&self, builder: CommandBuilder<S>) -> Result<CommandBuilder<S>>;
}

/// One command: a root node plus names and metadata.
pub struct CommandTree<S> {
    name: Arc<str>,
    aliases: Vec<Arc<str>>,
    description: Option<Arc<str>>,
    root: Arc<ArgumentNode<S>>,
}

impl<S> Clone for CommandTree<S> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            aliases: self.aliases.clone(),
            description: self.description.clone(),
            root: Arc::clone(&self.root),
        }
    }
}

impl<S> CommandTree<S> {
    /// Starts building a command named `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> CommandBuilder<S> {
        CommandBuilder::new(name)
    }

    /// Builds the tree described by `provider`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's grammar is invalid.
    pub fn from_provider<P>(provider: &P) -> Result<Self>
    where
        P: CommandProvider<S> + ?Sized,
    {
        let mut builder = Self::builder(provider.name()).aliases(provider.aliases());
        if !provider.description().is_empty() {
            builder = builder.description(provider.description());
        }
        if let Some(permission) = provider.permission() {
            builder = builder.permission(permission);
        }
        provider.provide(builder)?.build()
    }

    /// Primary name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names, in declaration order.
    #[must_use]
    pub fn aliases(&self) -> &[Arc<str>] {
        &self.aliases
    }

    /// The primary name followed by the aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(&*self.name).chain(self.aliases.iter().map(|a| &**a))
    }

    /// One-line description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Permission gating the whole command.
    #[must_use]
    pub fn permission(&self) -> Option<&Permission> {
        self.root.permission()
    }

    /// Which kinds of sources may run the command.
    #[must_use]
    pub fn scope(&self) -> ExecutionScope {
        self.root
            .requirement()
            .map_or(ExecutionScope::All, Requirement::scope)
    }

    /// The invocation condition, if any.
    #[must_use]
    pub fn condition(&self) -> Option<&Arc<dyn Condition<S>>> {
        self.root.requirement().and_then(|r| r.condition.as_ref())
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> &Arc<ArgumentNode<S>> {
        &self.root
    }

    /// The executor run when the command is invoked without arguments.
    #[must_use]
    pub fn default_executor(&self) -> Option<&Arc<dyn Executor<S>>> {
        self.root.executor()
    }

    /// Returns true if `source` passes the command's scope and condition.
    pub fn admits(&self, source: &S) -> bool
    where
        S: CommandSource,
    {
        self.root.requirement().is_none_or(|r| r.admits(source))
    }
}

impl<S> fmt::Debug for CommandTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("description", &self.description)
            .field("root", &self.root)
            .finish()
    }
}

/// Accumulates a command definition; consumed by [`build`](Self::build).
#[must_use]
pub struct CommandBuilder<S> {
    name: String,
    aliases: Vec<String>,
    description: Option<String>,
    permission: Option<Permission>,
    scope: ExecutionScope,
    condition: Option<Arc<dyn Condition<S>>>,
    default_executor: Option<Arc<dyn Executor<S>>>,
    syntaxes: Vec<(Syntax, Arc<dyn Executor<S>>)>,
    sub_commands: Vec<CommandTree<S>>,
    propagate_permissions: bool,
}

impl<S> CommandBuilder<S> {
    /// Starts a command named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            permission: None,
            scope: ExecutionScope::All,
            condition: None,
            default_executor: None,
            syntaxes: Vec::new(),
            sub_commands: Vec::new(),
            propagate_permissions: false,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several aliases.
    pub fn aliases<I, T>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Gates the whole command behind `permission`.
    pub fn permission(mut self, permission: Permission) -> Self {
        self.permission = Some(permission);
        self
    }

    /// Restricts the kinds of sources that may run the command.
    pub const fn scope(mut self, scope: ExecutionScope) -> Self {
        self.scope = scope;
        self
    }

    /// Adds an invocation condition, checked before any permission.
    pub fn condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// Sets the default executor, run when no argument follows the name.
    pub fn executes<F>(self, executor: F) -> Self
    where
        F: Fn(&ExecutionContext<'_, S>) -> ExecutorResult + Send + Sync + 'static,
    {
        self.executes_with(Arc::new(executor))
    }

    /// Sets the default executor from a shared executor.
    pub fn executes_with(mut self, executor: Arc<dyn Executor<S>>) -> Self {
        self.default_executor = Some(executor);
        self
    }

    /// Adds a syntax and the executor run when input matches it.
    pub fn syntax<F>(self, syntax: Syntax, executor: F) -> Self
    where
        F: Fn(&ExecutionContext<'_, S>) -> ExecutorResult + Send + Sync + 'static,
    {
        self.syntax_with(syntax, Arc::new(executor))
    }

    /// Adds a syntax with a shared executor.
    pub fn syntax_with(mut self, syntax: Syntax, executor: Arc<dyn Executor<S>>) -> Self {
        self.syntaxes.push((syntax, executor));
        self
    }

    /// Grafts `command` as a sub-command, one literal per name and alias.
    pub fn sub_command(mut self, command: CommandTree<S>) -> Self {
        self.sub_commands.push(command);
        self
    }

    /// Derives sub-command permissions from this command's permission.
    ///
    /// A sub-command without its own permission gets `<parent>.<name>`.
    pub const fn propagate_permissions(mut self, propagate: bool) -> Self {
        self.propagate_permissions = propagate;
        self
    }

    /// Merges everything into a frozen tree.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGrammar` for malformed names, colliding siblings,
    /// misplaced optional or greedy arguments and competing executors.
    pub fn build(self) -> Result<CommandTree<S>> {
        validate_name(&self.name)?;
        for alias in &self.aliases {
            validate_name(alias)?;
        }

        let requirement = (self.scope != ExecutionScope::All || self.condition.is_some())
            .then(|| Requirement {
                scope: self.scope,
                condition: self.condition.clone(),
            });
        let mut root = NodeBuilder {
            kind: NodeKind::Literal {
                token: Arc::from(self.name.as_str()),
                ignore_case: false,
            },
            optional: false,
            permission: self.permission.clone(),
            requirement,
            executor: None,
            explicit: false,
            children: Vec::new(),
        };
        if let Some(executor) = self.default_executor {
            root.assign(executor, true)?;
        }

        for sub in &self.sub_commands {
            let permission = sub.permission().cloned().or_else(|| {
                self.permission
                    .as_ref()
                    .filter(|_| self.propagate_permissions)
                    .map(|p| p.child(sub.name()))
            });
            for name in sub.names() {
                let mut graft = NodeBuilder::thaw(sub.root());
                graft.kind = NodeKind::Literal {
                    token: Arc::from(name),
                    ignore_case: false,
                };
                graft.permission.clone_from(&permission);
                if root.children.iter().any(|c| c.collides_with(&graft.kind)) {
                    return Err(Error::invalid_grammar(format!(
                        "sub-command '{name}' of '{}' is defined twice",
                        self.name
                    )));
                }
                root.children.push(graft);
            }
        }

        for (syntax, executor) in self.syntaxes {
            root.merge_syntax(&syntax, executor, &self.name)?;
        }

        if !root.explicit && root.children.is_empty() {
            return Err(Error::invalid_grammar(format!(
                "command '{}' has neither an executor nor any syntax",
                self.name
            )));
        }
        root.validate(&self.name, &mut HashSet::new())?;
        trace!(command = %self.name, syntaxes = root.children.len(), "built command tree");

        Ok(CommandTree {
            name: Arc::from(self.name),
            aliases: self.aliases.iter().map(|a| Arc::from(a.as_str())).collect(),
            description: self.description.map(Arc::from),
            root: root.freeze(),
        })
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(Error::invalid_grammar(format!(
            "command name '{name}' must be one non-empty word"
        )));
    }
    Ok(())
}

/// Mutable form of a node while a tree is being built.
struct NodeBuilder<S> {
    kind: NodeKind,
    optional: bool,
    permission: Option<Permission>,
    requirement: Option<Requirement<S>>,
    executor: Option<Arc<dyn Executor<S>>>,
    /// The executor ends a syntax here, rather than filling in an optional tail.
    explicit: bool,
    children: Vec<NodeBuilder<S>>,
}

impl<S> NodeBuilder<S> {
    fn from_argument(argument: &Argument) -> Self {
        Self {
            kind: argument.kind.clone(),
            optional: argument.optional,
            permission: argument.permission.clone(),
            requirement: None,
            executor: None,
            explicit: false,
            children: Vec::new(),
        }
    }

    fn thaw(node: &ArgumentNode<S>) -> Self {
        Self {
            kind: node.kind.clone(),
            optional: node.optional,
            permission: node.permission.clone(),
            requirement: node.requirement.clone(),
            executor: node.executor.clone(),
            explicit: node.executor.is_some(),
            children: node.children.iter().map(|c| Self::thaw(c)).collect(),
        }
    }

    fn freeze(self) -> Arc<ArgumentNode<S>> {
        Arc::new(ArgumentNode {
            kind: self.kind,
            optional: self.optional,
            permission: self.permission,
            requirement: self.requirement,
            executor: self.executor,
            children: self.children.into_iter().map(Self::freeze).collect(),
        })
    }

    /// Returns true if a sibling of this node with `kind` would be ambiguous
    /// with it rather than merged into it.
    fn collides_with(&self, kind: &NodeKind) -> bool {
        match (&self.kind, kind) {
            (
                NodeKind::Literal { token: a, ignore_case: ia },
                NodeKind::Literal { token: b, ignore_case: ib },
            ) => a == b || ((*ia || *ib) && a.eq_ignore_ascii_case(b)),
            _ => false,
        }
    }

    /// Returns true if `argument` merges into this node.
    fn same_as(&self, argument: &Argument) -> Result<bool> {
        match (&self.kind, &argument.kind) {
            (
                NodeKind::Literal { token: a, ignore_case: ia },
                NodeKind::Literal { token: b, ignore_case: ib },
            ) => {
                if a == b && ia == ib {
                    Ok(true)
                } else if self.collides_with(&argument.kind) {
                    Err(Error::invalid_grammar(format!(
                        "sibling literals '{a}' and '{b}' collide"
                    )))
                } else {
                    Ok(false)
                }
            }
            (
                NodeKind::Variable { name: a, parser: pa },
                NodeKind::Variable { name: b, parser: pb },
            ) if a == b => {
                if Arc::ptr_eq(pa, pb) || pa.descriptor() == pb.descriptor() {
                    Ok(true)
                } else {
                    Err(Error::invalid_grammar(format!(
                        "variable '{a}' is declared as both {} and {}",
                        pa.descriptor(),
                        pb.descriptor()
                    )))
                }
            }
            _ => Ok(false),
        }
    }

    fn assign(&mut self, executor: Arc<dyn Executor<S>>, explicit: bool) -> Result<()> {
        if explicit {
            if self.explicit {
                return Err(Error::invalid_grammar(format!(
                    "two executors compete for '{}'",
                    self.kind.usage_text()
                )));
            }
            self.executor = Some(executor);
            self.explicit = true;
        } else if self.executor.is_none() {
            self.executor = Some(executor);
        }
        Ok(())
    }

    fn merge_syntax(
        &mut self,
        syntax: &Syntax,
        executor: Arc<dyn Executor<S>>,
        command: &str,
    ) -> Result<()> {
        let arguments = syntax.arguments();
        if let Some(i) = arguments
            .windows(2)
            .position(|w| w[0].optional && !w[1].optional)
        {
            return Err(Error::invalid_grammar(format!(
                "required argument '{}' follows optional '{}' in '{command}'",
                arguments[i + 1].kind.usage_text(),
                arguments[i].kind.usage_text()
            )));
        }
        // Input may stop anywhere from the last required argument onwards.
        let first_end = arguments.iter().position(|a| a.optional).unwrap_or(arguments.len());
        if first_end == 0 {
            self.assign(Arc::clone(&executor), arguments.is_empty())?;
        }

        let mut node = self;
        for (depth, argument) in arguments.iter().enumerate() {
            node = node.child_for(argument)?;
            let end = depth + 1;
            if end == arguments.len() {
                node.assign(Arc::clone(&executor), true)?;
            } else if end >= first_end {
                node.assign(Arc::clone(&executor), false)?;
            }
        }
        Ok(())
    }

    fn child_for(&mut self, argument: &Argument) -> Result<&mut Self> {
        let mut found = None;
        for (i, child) in self.children.iter().enumerate() {
            if child.same_as(argument)? {
                found = Some(i);
                break;
            }
        }
        let index = if let Some(i) = found {
            let child = &mut self.children[i];
            match (&child.permission, &argument.permission) {
                (Some(a), Some(b)) if a != b => {
                    return Err(Error::invalid_grammar(format!(
                        "'{}' is gated by both {a} and {b}",
                        child.kind.usage_text()
                    )));
                }
                (None, Some(b)) => child.permission = Some(b.clone()),
                _ => {}
            }
            child.optional &= argument.optional;
            i
        } else {
            self.children.push(Self::from_argument(argument));
            self.children.len() - 1
        };
        Ok(&mut self.children[index])
    }

    fn validate(&self, path: &str, variables: &mut HashSet<Arc<str>>) -> Result<()> {
        if self.is_greedy() && !self.children.is_empty() {
            return Err(Error::invalid_grammar(format!(
                "greedy argument '{}' in '{path}' must be last",
                self.kind.usage_text()
            )));
        }
        for child in &self.children {
            let child_path = format!("{path} {}", child.kind.usage_text());
            if let NodeKind::Variable { name, .. } = &child.kind {
                if !variables.insert(Arc::clone(name)) {
                    return Err(Error::invalid_grammar(format!(
                        "variable '{name}' appears twice along '{child_path}'"
                    )));
                }
                child.validate(&child_path, variables)?;
                variables.remove(name);
            } else {
                child.validate(&child_path, variables)?;
            }
        }
        Ok(())
    }

    fn is_greedy(&self) -> bool {
        matches!(&self.kind, NodeKind::Variable { parser, .. } if parser.is_greedy())
    }
}
