//! The interactive console loop.

use std::sync::Arc;

use uniform_foundation::Result;

use crate::audience::CommandUser;
use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::host::ConsoleHost;
use crate::user::ConsoleUser;

/// What the loop should do after a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOutcome {
    /// A command ran successfully.
    Success,
    /// The line was blank or a command failed; keep reading.
    Continue,
    /// Leave the loop.
    Exit,
}

/// Reads lines and runs them as commands.
pub struct Console<E: LineEditor = RustylineEditor> {
    editor: E,
    host: Arc<ConsoleHost>,
    user: ConsoleUser,
    show_banner: bool,
    prompt: String,
}

impl Console<RustylineEditor> {
    /// Creates a console with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(host: Arc<ConsoleHost>, user: ConsoleUser) -> Result<Self> {
        let editor = RustylineEditor::new(Arc::clone(&host), user.clone())?;
        Ok(Self::with_editor(editor, host, user))
    }
}

impl<E: LineEditor> Console<E> {
    /// Creates a console reading from `editor`.
    pub fn with_editor(editor: E, host: Arc<ConsoleHost>, user: ConsoleUser) -> Self {
        Self {
            editor,
            host,
            user,
            show_banner: true,
            prompt: "> ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// The editor.
    #[must_use]
    pub const fn editor(&self) -> &E {
        &self.editor
    }

    /// The user lines run as.
    #[must_use]
    pub const fn user(&self) -> &ConsoleUser {
        &self.user
    }

    /// Runs until EOF or `exit`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            let line = match self.editor.read_line(&self.prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => break,
            };
            if !line.trim().is_empty() {
                self.editor.add_history(&line);
            }
            if self.run_line(&line) == LineOutcome::Exit {
                break;
            }
        }

        self.user.audience().send_message("Goodbye!");
        Ok(())
    }

    /// Runs one line: a built-in (`help`, `exit`) or a registered command.
    pub fn run_line(&self, line: &str) -> LineOutcome {
        let trimmed = line.trim();
        match trimmed {
            "" => LineOutcome::Continue,
            "exit" | "quit" => LineOutcome::Exit,
            "help" | "?" => {
                for line in self.host.help(&self.user) {
                    self.user.audience().send_message(&line);
                }
                LineOutcome::Continue
            }
            _ if self.host.dispatch_line(&self.user, trimmed) => LineOutcome::Success,
            _ => LineOutcome::Continue,
        }
    }

    fn print_banner(&self) {
        let audience = self.user.audience();
        audience.send_message(&format!("Uniform {}", env!("CARGO_PKG_VERSION")));
        audience.send_message(&format!(
            "{} commands registered. Type \"help\" for a list, \"exit\" to leave.",
            self.host.commands().len()
        ));
    }
}
