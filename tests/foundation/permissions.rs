//! Integration tests for Permission and CommandSource
//!
//! Tests permission nodes, defaults, and execution scopes.

use uniform_foundation::{
    CommandSource, ExecutionScope, Permission, PermissionDefault, SourceKind,
};

struct Anonymous;

impl CommandSource for Anonymous {
    fn kind(&self) -> SourceKind {
        SourceKind::Other
    }
}

#[test]
fn permission_constructors_set_default() {
    assert_eq!(Permission::allow("a").default_grant(), PermissionDefault::Allow);
    assert_eq!(Permission::operator("a").default_grant(), PermissionDefault::Operator);
    assert_eq!(Permission::deny("a").default_grant(), PermissionDefault::Deny);
    assert_eq!(PermissionDefault::default(), PermissionDefault::Operator);
}

#[test]
fn permission_display_is_node() {
    assert_eq!(Permission::operator("uniform.greet").to_string(), "uniform.greet");
}

#[test]
fn permission_children_chain() {
    let p = Permission::operator("uniform").child("admin").child("reload");
    assert_eq!(p.node(), "uniform.admin.reload");
}

#[test]
fn permission_blank() {
    assert!(Permission::allow(" \t").is_blank());
    assert!(!Permission::allow("x").is_blank());
}

#[test]
fn source_defaults() {
    let source = Anonymous;
    assert!(!source.is_operator());
    assert_eq!(source.permission_value("anything"), None);
}

#[test]
fn scope_checks_kind() {
    assert!(ExecutionScope::All.contains(SourceKind::Console));
    assert!(ExecutionScope::InGame.contains(SourceKind::Player));
    assert!(!ExecutionScope::InGame.contains(SourceKind::Other));
    assert!(!ExecutionScope::Console.contains(SourceKind::Other));
    assert_eq!(ExecutionScope::default(), ExecutionScope::All);
}
