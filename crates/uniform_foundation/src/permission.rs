//! Permission nodes.
//!
//! A permission is a dot-delimited identifier (`example.greet.others`) plus
//! the grant applied when the host has no explicit value for the source.

use std::fmt;
use std::sync::Arc;

/// Grant policy used when a source has no explicit value for a permission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PermissionDefault {
    /// Granted to everyone.
    Allow,
    /// Granted to operators only.
    #[default]
    Operator,
    /// Granted to nobody.
    Deny,
}

/// A permission node attached to a command or argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Permission {
    node: Arc<str>,
    default: PermissionDefault,
}

impl Permission {
    /// Creates a permission with an explicit default.
    #[must_use]
    pub fn new(node: impl AsRef<str>, default: PermissionDefault) -> Self {
        Self {
            node: Arc::from(node.as_ref()),
            default,
        }
    }

    /// Creates a permission granted to everyone unless revoked.
    #[must_use]
    pub fn allow(node: impl AsRef<str>) -> Self {
        Self::new(node, PermissionDefault::Allow)
    }

    /// Creates a permission granted to operators unless set explicitly.
    #[must_use]
    pub fn operator(node: impl AsRef<str>) -> Self {
        Self::new(node, PermissionDefault::Operator)
    }

    /// Creates a permission granted to nobody unless set explicitly.
    #[must_use]
    pub fn deny(node: impl AsRef<str>) -> Self {
        Self::new(node, PermissionDefault::Deny)
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Returns the default grant.
    #[must_use]
    pub const fn default_grant(&self) -> PermissionDefault {
        self.default
    }

    /// A blank identifier always allows.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.node.trim().is_empty()
    }

    /// Derives `<node>.<segment>` with the same default.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        if self.is_blank() {
            return Self::new(segment, self.default);
        }
        Self::new(format!("{}.{segment}", self.node), self.default)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.node)
    }
}
