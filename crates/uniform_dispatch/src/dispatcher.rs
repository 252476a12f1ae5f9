//! The dispatcher: registered commands and the entry points hosts call.
//!
//! Registered trees live in an immutable [`Registry`] snapshot. Registration
//! builds a new snapshot with structural sharing and swaps it in under a
//! write lock; every read clones the current `Arc` and works lock-free from
//! there, so executors never run while the lock is held.

use std::fmt;
use std::sync::Arc;

use im::{HashMap, OrdMap};
use parking_lot::RwLock;
use tracing::{debug, warn};
use uniform_foundation::{CommandSource, Error, ErrorKind, Result};

use crate::config::DispatcherConfig;
use crate::context::ExecutionContext;
use crate::parse::{ParseState, parse_command};
use crate::permission::{PermissionEvaluator, SourcePermissions, grants};
use crate::reader::ARGUMENT_SEPARATOR;
use crate::tree::CommandTree;

/// An immutable set of registered commands.
///
/// Keys are normalized according to the dispatcher's case policy.
pub struct Registry<S> {
    commands: OrdMap<Arc<str>, CommandTree<S>>,
    names: HashMap<Arc<str>, Arc<str>>,
}

impl<S> Clone for Registry<S> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            names: self.names.clone(),
        }
    }
}

impl<S> Default for Registry<S> {
    fn default() -> Self {
        Self {
            commands: OrdMap::new(),
            names: HashMap::new(),
        }
    }
}

impl<S> Registry<S> {
    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandTree<S>> {
        self.commands.values()
    }

    fn lookup(&self, key: &str) -> Option<&CommandTree<S>> {
        self.names.get(key).and_then(|primary| self.commands.get(primary))
    }

    fn remove(&mut self, primary: &str) -> Option<CommandTree<S>> {
        let tree = self.commands.remove(primary)?;
        self.names.retain(|_, owner| &**owner != primary);
        Some(tree)
    }
}

impl<S> fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.commands.keys()).finish()
    }
}

/// What a successful [`Dispatcher::execute`] ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Executed {
    /// Primary name of the command.
    pub command: Arc<str>,
    /// The name or alias it was invoked by.
    pub label: String,
    /// Usage form of the matched path, e.g. `greet <name> <times>`.
    pub path: String,
}

/// Parses, executes and completes command input.
pub struct Dispatcher<S> {
    registry: RwLock<Arc<Registry<S>>>,
    evaluator: Arc<dyn PermissionEvaluator<S>>,
    config: DispatcherConfig,
}

impl<S: CommandSource> Default for Dispatcher<S> {
    fn default() -> Self {
        Self::new(SourcePermissions)
    }
}

impl<S> fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &*self.registry.read())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S> Dispatcher<S> {
    /// Creates a dispatcher with the default configuration.
    pub fn new(evaluator: impl PermissionEvaluator<S> + 'static) -> Self {
        Self::with_config(evaluator, DispatcherConfig::default())
    }

    /// Creates a dispatcher with `config`.
    pub fn with_config(
        evaluator: impl PermissionEvaluator<S> + 'static,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            registry: RwLock::new(Arc::new(Registry::default())),
            evaluator: Arc::new(evaluator),
            config,
        }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The injected permission evaluator.
    #[must_use]
    pub fn evaluator(&self) -> &dyn PermissionEvaluator<S> {
        &*self.evaluator
    }

    /// The current registry snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Registry<S>> {
        Arc::clone(&self.registry.read())
    }

    fn key(&self, name: &str) -> Arc<str> {
        if self.config.ignore_command_case {
            Arc::from(name.to_ascii_lowercase())
        } else {
            Arc::from(name)
        }
    }

    /// Registers `tree` under its name and aliases.
    ///
    /// A tree with the same primary name replaces the old one.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCommand` if a name or alias belongs to another command.
    pub fn register(&self, tree: CommandTree<S>) -> Result<()> {
        let primary = self.key(tree.name());
        let keys: Vec<Arc<str>> = tree.names().map(|n| self.key(n)).collect();

        let mut guard = self.registry.write();
        let mut next = Registry::clone(&guard);
        if let Some(taken) = keys
            .iter()
            .find(|key| next.names.get(*key).is_some_and(|owner| *owner != primary))
        {
            return Err(Error::new(ErrorKind::DuplicateCommand(taken.to_string())));
        }
        if next.remove(&primary).is_some() {
            warn!(command = %primary, "replacing registered command");
        }
        for key in keys {
            next.names.insert(key, Arc::clone(&primary));
        }
        debug!(command = %primary, aliases = tree.aliases().len(), "registered command");
        next.commands.insert(primary, tree);
        *guard = Arc::new(next);
        Ok(())
    }

    /// Removes the command known by `name` (its primary name or an alias).
    pub fn unregister(&self, name: &str) -> Option<CommandTree<S>> {
        let key = self.key(name);
        let mut guard = self.registry.write();
        let primary = Arc::clone(guard.names.get(&key)?);
        let mut next = Registry::clone(&guard);
        let removed = next.remove(&primary);
        *guard = Arc::new(next);
        debug!(command = %primary, "unregistered command");
        removed
    }

    /// Looks up a command by name or alias.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<CommandTree<S>> {
        self.snapshot().lookup(&self.key(name)).cloned()
    }

    /// All registered commands in name order.
    #[must_use]
    pub fn commands(&self) -> Vec<CommandTree<S>> {
        self.snapshot().iter().cloned().collect()
    }
}

impl<S: CommandSource> Dispatcher<S> {
    /// Returns true if `source` passes the command's condition, scope and
    /// permission.
    pub fn can_use(&self, tree: &CommandTree<S>, source: &S) -> bool {
        tree.admits(source) && grants(&*self.evaluator, source, tree.permission())
    }

    /// Parses `input` without executing anything.
    ///
    /// Input is taken as-is; no whitespace is trimmed.
    pub fn parse(&self, input: &str, source: &S) -> ParseState<S> {
        let label_end = input.find(ARGUMENT_SEPARATOR).unwrap_or(input.len());
        let label = &input[..label_end];
        let snapshot = self.snapshot();
        match snapshot.lookup(&self.key(label)) {
            Some(tree) => parse_command(tree, input, label_end, source, &*self.evaluator),
            None => ParseState::unknown(input, label),
        }
    }

    /// Parses and executes `input`.
    ///
    /// # Errors
    ///
    /// Returns the parse failure, or `ExecutionFailure` if the executor failed.
    pub fn execute(&self, input: &str, source: &S) -> Result<Executed> {
        let input = if self.config.trim_trailing_whitespace {
            input.trim_end()
        } else {
            input
        };
        self.execute_parsed(self.parse(input, source), source)
    }

    /// Executes an already parsed input.
    ///
    /// # Errors
    ///
    /// Returns the parse failure, or `ExecutionFailure` if the executor failed.
    pub fn execute_parsed(&self, state: ParseState<S>, source: &S) -> Result<Executed> {
        let state = state.into_result().inspect_err(|e| {
            debug!(error = %e, "command rejected");
        })?;
        let (Some(command), Some(last)) = (state.command(), state.last()) else {
            return Err(Error::new(ErrorKind::Internal(
                "parse succeeded without a command".to_string(),
            )));
        };
        let Some(executor) = last.node.executor() else {
            return Err(Error::incomplete(command.name()).at(state.input(), state.cursor()));
        };

        let ctx = ExecutionContext {
            source,
            input: state.input(),
            command,
            path: state.path(),
            node: &last.node,
            arguments: state.arguments(),
        };
        let executed = Executed {
            command: Arc::from(command.name()),
            label: ctx.label().to_string(),
            path: state
                .path()
                .iter()
                .map(|m| m.node.usage_text())
                .collect::<Vec<_>>()
                .join(" "),
        };
        match executor.execute(&ctx) {
            Ok(()) => {
                debug!(command = %executed.command, path = %executed.path, "executed command");
                Ok(executed)
            }
            Err(cause) => {
                warn!(command = %executed.command, error = %cause, "command failed");
                Err(Error::execution_failure(command.name(), cause)
                    .at(state.input(), last.range.start))
            }
        }
    }
}
