//! The console's command source.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use uniform_foundation::{CommandSource, SourceKind};

use crate::audience::{Audience, CommandUser, StdoutAudience};

/// Someone typing at the console: the operator, or a simulated player.
#[derive(Clone)]
pub struct ConsoleUser {
    name: String,
    kind: SourceKind,
    operator: bool,
    permissions: BTreeMap<String, bool>,
    audience: Arc<dyn Audience>,
}

impl ConsoleUser {
    /// The console itself: an operator printing to stdout.
    #[must_use]
    pub fn console() -> Self {
        Self::console_with(Arc::new(StdoutAudience))
    }

    /// The console replying to `audience`.
    #[must_use]
    pub fn console_with(audience: Arc<dyn Audience>) -> Self {
        Self {
            name: "CONSOLE".to_string(),
            kind: SourceKind::Console,
            operator: true,
            permissions: BTreeMap::new(),
            audience,
        }
    }

    /// A non-operator player replying to `audience`.
    #[must_use]
    pub fn player(name: impl Into<String>, audience: Arc<dyn Audience>) -> Self {
        Self {
            name: name.into(),
            kind: SourceKind::Player,
            operator: false,
            permissions: BTreeMap::new(),
            audience,
        }
    }

    /// Sets the operator flag.
    #[must_use]
    pub fn with_operator(mut self, operator: bool) -> Self {
        self.operator = operator;
        self
    }

    /// Explicitly grants a permission node.
    #[must_use]
    pub fn grant(mut self, node: impl Into<String>) -> Self {
        self.permissions.insert(node.into(), true);
        self
    }

    /// Explicitly revokes a permission node, overriding its default.
    #[must_use]
    pub fn revoke(mut self, node: impl Into<String>) -> Self {
        self.permissions.insert(node.into(), false);
        self
    }

    /// The shared audience.
    #[must_use]
    pub fn shared_audience(&self) -> Arc<dyn Audience> {
        Arc::clone(&self.audience)
    }
}

impl CommandSource for ConsoleUser {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn is_operator(&self) -> bool {
        self.operator
    }

    fn permission_value(&self, node: &str) -> Option<bool> {
        self.permissions.get(node).copied()
    }
}

impl CommandUser for ConsoleUser {
    fn name(&self) -> &str {
        &self.name
    }

    fn audience(&self) -> &dyn Audience {
        &*self.audience
    }
}

impl fmt::Debug for ConsoleUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleUser")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("operator", &self.operator)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}
