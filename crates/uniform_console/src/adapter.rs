//! One command as the console's command map sees it.

use uniform_dispatch::{CommandProvider, CommandTree, Dispatcher, Suggestion};
use uniform_foundation::{Error, Permission, Result};

use crate::audience::CommandUser;
use crate::user::ConsoleUser;

/// A command tree wrapped for registration with the console.
///
/// Each command owns a dispatcher holding just its own tree, the way a host
/// command map holds one handler per command.
#[derive(Debug)]
pub struct ConsoleCommand {
    name: String,
    aliases: Vec<String>,
    description: String,
    permission: Option<Permission>,
    usage: String,
    dispatcher: Dispatcher<ConsoleUser>,
}

impl ConsoleCommand {
    /// Wraps `tree`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be registered.
    pub fn new(tree: CommandTree<ConsoleUser>) -> Result<Self> {
        let name = tree.name().to_string();
        let aliases = tree.aliases().iter().map(ToString::to_string).collect();
        let description = tree.description().unwrap_or_default().to_string();
        let permission = tree.permission().cloned();
        let dispatcher = Dispatcher::default();
        dispatcher.register(tree)?;

        let prefix = dispatcher.config().usage_prefix.clone();
        let usage = dispatcher
            .usage_all(&ConsoleUser::console())
            .into_values()
            .map(|usage| format!("{prefix}{usage}"))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Self {
            name,
            aliases,
            description,
            permission,
            usage,
            dispatcher,
        })
    }

    /// Builds and wraps the command described by `provider`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's grammar is invalid.
    pub fn from_provider<P>(provider: &P) -> Result<Self>
    where
        P: CommandProvider<ConsoleUser> + ?Sized,
    {
        Self::new(CommandTree::from_provider(provider)?)
    }

    /// Primary name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// One-line description, empty if none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Permission gating the command, if any.
    #[must_use]
    pub const fn permission(&self) -> Option<&Permission> {
        self.permission.as_ref()
    }

    /// Usage lines as rendered for the console operator, prefixed with `/`.
    #[must_use]
    pub fn usage_text(&self) -> &str {
        &self.usage
    }

    /// The wrapped dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher<ConsoleUser> {
        &self.dispatcher
    }

    /// Rebuilds the input line from host-split arguments.
    ///
    /// The primary name is used whatever alias was typed.
    #[must_use]
    pub fn input(&self, args: &[&str]) -> String {
        if args.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, args.join(" "))
        }
    }

    /// Runs the command, reporting any failure to the user.
    ///
    /// Returns true on success.
    pub fn execute(&self, user: &ConsoleUser, _alias: &str, args: &[&str]) -> bool {
        match self.dispatcher.execute(&self.input(args), user) {
            Ok(_) => true,
            Err(error) => {
                user.audience().send_error(&describe(&error));
                false
            }
        }
    }

    /// Completion texts for the whole input, host style.
    #[must_use]
    pub fn tab_complete(&self, user: &ConsoleUser, _alias: &str, args: &[&str]) -> Vec<String> {
        self.dispatcher.suggest_texts(&self.input(args), user)
    }

    /// Completions for a typed line starting with this command's name or an alias.
    #[must_use]
    pub fn suggest(&self, user: &ConsoleUser, line: &str) -> Vec<Suggestion> {
        self.dispatcher.suggest(line, user)
    }

    /// Returns true if the user holds the command's permission.
    ///
    /// Commands without a permission, or with a blank one, are open to all.
    #[must_use]
    pub fn test_permission_silent(&self, user: &ConsoleUser) -> bool {
        self.permission
            .as_ref()
            .is_none_or(|p| p.is_blank() || self.dispatcher.evaluator().check(user, p))
    }
}

/// Renders an error the way it is shown to users.
///
/// Parse failures read `<reason> at position <cursor>: <context>`.
#[must_use]
pub fn describe(error: &Error) -> String {
    match (&error.context, error.is_parse_failure()) {
        (Some(context), true) => {
            format!("{} at position {}: {context}", error.kind, context.cursor)
        }
        _ => error.to_string(),
    }
}
