//! The command source capability.
//!
//! Every host maps its own sender type (console, player, remote client) onto
//! [`CommandSource`]. The dispatcher treats the source as opaque apart from
//! these few capability methods.

/// What kind of invoker a source represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// The server console or a terminal.
    Console,
    /// An in-game or otherwise connected user.
    Player,
    /// Anything else (command blocks, remote RPC, tests).
    Other,
}

/// Which kinds of sources may invoke a command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionScope {
    /// Any source.
    #[default]
    All,
    /// Players only.
    InGame,
    /// The console only.
    Console,
}

impl ExecutionScope {
    /// Returns true if a source of `kind` falls inside this scope.
    #[must_use]
    pub const fn contains(self, kind: SourceKind) -> bool {
        match self {
            Self::All => true,
            Self::InGame => matches!(kind, SourceKind::Player),
            Self::Console => matches!(kind, SourceKind::Console),
        }
    }
}

/// Capability implemented by every host's sender type.
pub trait CommandSource {
    /// The kind of invoker, used for execution scope checks.
    fn kind(&self) -> SourceKind;

    /// Whether the source is an operator.
    fn is_operator(&self) -> bool {
        false
    }

    /// Explicit permission value held by the source, if any.
    ///
    /// `None` means the host has no opinion and the permission's default applies.
    fn permission_value(&self, _node: &str) -> Option<bool> {
        None
    }
}
