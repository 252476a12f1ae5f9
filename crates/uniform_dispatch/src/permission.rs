//! Permission evaluation.
//!
//! The dispatcher never stores permissions. It asks an injected
//! [`PermissionEvaluator`] whether a source holds a node's permission.

use uniform_foundation::{CommandSource, Permission, PermissionDefault};

/// Decides whether a source holds a permission.
pub trait PermissionEvaluator<S>: Send + Sync {
    /// Returns true if `source` is granted `permission`.
    fn check(&self, source: &S, permission: &Permission) -> bool;
}

impl<S, F> PermissionEvaluator<S> for F
where
    F: Fn(&S, &Permission) -> bool + Send + Sync,
{
    fn check(&self, source: &S, permission: &Permission) -> bool {
        self(source, permission)
    }
}

/// Asks the source first, then falls back to the permission's default.
#[derive(Clone, Copy, Debug, Default)]
pub struct SourcePermissions;

impl<S: CommandSource> PermissionEvaluator<S> for SourcePermissions {
    fn check(&self, source: &S, permission: &Permission) -> bool {
        source
            .permission_value(permission.node())
            .unwrap_or_else(|| match permission.default_grant() {
                PermissionDefault::Allow => true,
                PermissionDefault::Operator => source.is_operator(),
                PermissionDefault::Deny => false,
            })
    }
}

/// Grants everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl<S> PermissionEvaluator<S> for AllowAll {
    fn check(&self, _source: &S, _permission: &Permission) -> bool {
        true
    }
}

/// Evaluates an optional permission. Absent and blank permissions allow.
pub(crate) fn grants<S>(
    evaluator: &dyn PermissionEvaluator<S>,
    source: &S,
    permission: Option<&Permission>,
) -> bool {
    permission.is_none_or(|p| p.is_blank() || evaluator.check(source, p))
}
