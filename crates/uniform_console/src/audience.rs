//! Message output for command users.

use parking_lot::Mutex;
use uniform_foundation::CommandSource;

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Somewhere messages for a user end up.
pub trait Audience: Send + Sync {
    /// Sends an informational message.
    fn send_message(&self, message: &str);

    /// Sends an error message. Defaults to a plain message.
    fn send_error(&self, message: &str) {
        self.send_message(message);
    }
}

/// A command source that can be talked back to.
///
/// Executors shared across hosts reply through this rather than through a
/// host-specific sender type.
pub trait CommandUser: CommandSource {
    /// Display name.
    fn name(&self) -> &str;

    /// Where replies go.
    fn audience(&self) -> &dyn Audience;
}

/// Prints to standard output, errors in red.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutAudience;

impl Audience for StdoutAudience {
    fn send_message(&self, message: &str) {
        println!("{message}");
    }

    fn send_error(&self, message: &str) {
        println!("{RED}{message}{RESET}");
    }
}

/// Collects messages in memory.
#[derive(Debug, Default)]
pub struct BufferedAudience {
    messages: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl BufferedAudience {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message received, errors included, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Error messages only.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    /// Empties the buffer, returning what it held.
    pub fn take(&self) -> Vec<String> {
        self.errors.lock().clear();
        std::mem::take(&mut *self.messages.lock())
    }
}

impl Audience for BufferedAudience {
    fn send_message(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }

    fn send_error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
        self.messages.lock().push(message.to_string());
    }
}
