//! The console's command map.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use uniform_dispatch::{CommandProvider, CommandTree, Suggestion};
use uniform_foundation::{Error, ErrorKind, Result};

use crate::adapter::ConsoleCommand;
use crate::audience::CommandUser;
use crate::user::ConsoleUser;

/// Message shown for an unknown command label.
pub const UNKNOWN_COMMAND: &str = "Unknown command. Type \"help\" for help.";

#[derive(Debug, Default)]
struct CommandMap {
    commands: BTreeMap<String, Arc<ConsoleCommand>>,
    labels: HashMap<String, String>,
}

/// Routes console lines to registered commands.
///
/// Labels are matched without regard to ASCII case. A leading `/` is accepted
/// and ignored.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    map: RwLock<CommandMap>,
}

impl ConsoleHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a wrapped command under its name and aliases.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCommand` if a label is already taken.
    pub fn register(&self, command: ConsoleCommand) -> Result<()> {
        let mut map = self.map.write();
        let labels: Vec<String> = std::iter::once(command.name())
            .chain(command.aliases().iter().map(String::as_str))
            .map(str::to_ascii_lowercase)
            .collect();
        if let Some(taken) = labels.iter().find(|l| map.labels.contains_key(*l)) {
            return Err(Error::new(ErrorKind::DuplicateCommand(taken.clone())));
        }
        let primary = command.name().to_ascii_lowercase();
        for label in labels {
            map.labels.insert(label, primary.clone());
        }
        debug!(command = %primary, "registered console command");
        map.commands.insert(primary, Arc::new(command));
        Ok(())
    }

    /// Wraps and registers `tree`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be wrapped or a label is taken.
    pub fn register_tree(&self, tree: CommandTree<ConsoleUser>) -> Result<()> {
        self.register(ConsoleCommand::new(tree)?)
    }

    /// Builds, wraps and registers the command described by `provider`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar is invalid or a label is taken.
    pub fn register_provider<P>(&self, provider: &P) -> Result<()>
    where
        P: CommandProvider<ConsoleUser> + ?Sized,
    {
        self.register(ConsoleCommand::from_provider(provider)?)
    }

    /// Looks up a command by label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<Arc<ConsoleCommand>> {
        let map = self.map.read();
        map.labels
            .get(&label.to_ascii_lowercase())
            .and_then(|primary| map.commands.get(primary))
            .cloned()
    }

    /// Registered commands in name order.
    #[must_use]
    pub fn commands(&self) -> Vec<Arc<ConsoleCommand>> {
        self.map.read().commands.values().cloned().collect()
    }

    /// Runs one console line on behalf of `user`.
    ///
    /// Returns true if a command ran successfully.
    pub fn dispatch_line(&self, user: &ConsoleUser, line: &str) -> bool {
        let line = line.strip_prefix('/').unwrap_or(line).trim_end();
        let mut parts = line.split(' ');
        let label = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let Some(command) = self.get(label) else {
            debug!(label, "unknown console command");
            user.audience().send_error(UNKNOWN_COMMAND);
            return false;
        };
        command.execute(user, label, &args)
    }

    /// Completions for the token being typed at the end of `line`.
    ///
    /// Ranges refer to `line` as given, leading `/` included.
    #[must_use]
    pub fn complete(&self, user: &ConsoleUser, line: &str) -> Vec<Suggestion> {
        let (offset, body) = match line.strip_prefix('/') {
            Some(rest) => (1, rest),
            None => (0, line),
        };

        let suggestions = match body.split_once(' ') {
            None => self.complete_label(user, body),
            Some((label, _)) => self
                .get(label)
                .filter(|command| command.test_permission_silent(user))
                .map(|command| command.suggest(user, body))
                .unwrap_or_default(),
        };
        suggestions
            .into_iter()
            .map(|s| Suggestion {
                text: s.text,
                range: s.range.start + offset..s.range.end + offset,
            })
            .collect()
    }

    fn complete_label(&self, user: &ConsoleUser, prefix: &str) -> Vec<Suggestion> {
        let lowered = prefix.to_ascii_lowercase();
        let mut labels: Vec<String> = self
            .commands()
            .iter()
            .filter(|command| command.test_permission_silent(user))
            .flat_map(|command| {
                std::iter::once(command.name().to_string()).chain(command.aliases().iter().cloned())
            })
            .filter(|label| label.to_ascii_lowercase().starts_with(&lowered))
            .collect();
        labels.sort();
        labels.dedup();
        labels
            .into_iter()
            .map(|text| Suggestion {
                text,
                range: 0..prefix.len(),
            })
            .collect()
    }

    /// Help lines for the commands `user` may run.
    #[must_use]
    pub fn help(&self, user: &ConsoleUser) -> Vec<String> {
        let mut lines = Vec::new();
        for command in self.commands() {
            if !command.test_permission_silent(user) {
                continue;
            }
            if command.description().is_empty() {
                lines.push(format!("/{}", command.name()));
            } else {
                lines.push(format!("/{} - {}", command.name(), command.description()));
            }
            if !command.aliases().is_empty() {
                lines.push(format!("  aliases: {}", command.aliases().join(", ")));
            }
            let usage = command.dispatcher().usage_all(user);
            for line in usage.values() {
                lines.push(format!("  usage: /{line}"));
            }
        }
        lines
    }
}
