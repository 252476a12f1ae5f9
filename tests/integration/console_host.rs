//! Console host integration tests
//!
//! One command tree, wrapped and driven the way a host command map drives it.

use std::sync::Arc;

use uniform::console::{
    BufferedAudience, CommandUser, ConsoleCommand, ConsoleHost, ConsoleUser, UNKNOWN_COMMAND,
};
use uniform::dispatch::{Argument, CommandTree, ExecutionContext, Syntax};
use uniform::foundation::Permission;

fn greet() -> CommandTree<ConsoleUser> {
    CommandTree::builder("greet")
        .alias("hello")
        .description("Greets someone")
        .syntax(
            Syntax::new()
                .then(Argument::string("name"))
                .then(Argument::int("times").optional()),
            |ctx: &ExecutionContext<'_, ConsoleUser>| {
                let name = ctx.string("name").unwrap_or_default();
                for _ in 0..ctx.int("times").unwrap_or(1) {
                    ctx.source().audience().send_message(&format!("Hello, {name}!"));
                }
                Ok(())
            },
        )
        .build()
        .unwrap()
}

fn setup() -> (ConsoleHost, Arc<BufferedAudience>, ConsoleUser) {
    let host = ConsoleHost::new();
    host.register_tree(greet()).unwrap();
    let audience = Arc::new(BufferedAudience::new());
    let user = ConsoleUser::player("Steve", audience.clone());
    (host, audience, user)
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn greet_walkthrough() {
    let (host, audience, user) = setup();

    assert!(host.dispatch_line(&user, "greet Alice"));
    assert!(host.dispatch_line(&user, "/hello Bob 2"));
    assert!(!host.dispatch_line(&user, "greet"));
    assert!(!host.dispatch_line(&user, "greet Alice x"));

    assert_eq!(
        audience.messages(),
        [
            "Hello, Alice!",
            "Hello, Bob!",
            "Hello, Bob!",
            "incomplete command: greet expects more arguments at position 5: greet<--[HERE]",
            "expected integer at position 12: ...eet Alice <--[HERE]",
        ]
    );
    assert_eq!(audience.errors().len(), 2);
}

#[test]
fn unknown_label() {
    let (host, audience, user) = setup();
    assert!(!host.dispatch_line(&user, "wave"));
    assert_eq!(audience.errors(), [UNKNOWN_COMMAND]);
}

#[test]
fn wrapped_command_metadata() {
    let (host, _, _) = setup();
    let command = host.get("HELLO").unwrap();
    assert_eq!(command.name(), "greet");
    assert_eq!(command.aliases(), ["hello"]);
    assert_eq!(command.usage_text(), "/greet <name> [<times>]");
    assert_eq!(command.description(), "Greets someone");
}

#[test]
fn tab_complete_whole_line() {
    let admin = CommandTree::builder("admin")
        .syntax(
            Syntax::new().then(Argument::literal("reload")),
            |_: &ExecutionContext<'_, ConsoleUser>| Ok(()),
        )
        .syntax(
            Syntax::new().then(Argument::literal("restart")),
            |_: &ExecutionContext<'_, ConsoleUser>| Ok(()),
        )
        .build()
        .unwrap();
    let command = ConsoleCommand::new(admin).unwrap();
    let user = ConsoleUser::console();
    assert_eq!(command.tab_complete(&user, "admin", &["re"]), ["reload", "restart"]);
    assert_eq!(command.tab_complete(&user, "admin", &["rel"]), ["reload"]);
}

// =============================================================================
// Permissions through the host
// =============================================================================

#[test]
fn host_hides_and_denies_restricted_commands() {
    let (host, audience, user) = setup();
    host.register_tree(
        CommandTree::builder("stop")
            .permission(Permission::operator("uniform.stop"))
            .executes(|ctx: &ExecutionContext<'_, ConsoleUser>| {
                ctx.source().audience().send_message("stopping");
                Ok(())
            })
            .build()
            .unwrap(),
    )
    .unwrap();

    let labels: Vec<_> = host.complete(&user, "").into_iter().map(|s| s.text).collect();
    assert_eq!(labels, ["greet", "hello"]);
    assert!(!host.dispatch_line(&user, "stop"));
    assert!(audience.errors()[0].starts_with("no permission for stop (uniform.stop)"));

    let op = user.with_operator(true);
    assert!(host.dispatch_line(&op, "stop"));
    assert_eq!(audience.messages().last().map(String::as_str), Some("stopping"));
}

#[test]
fn help_respects_permissions() {
    let (host, _, user) = setup();
    let help = host.help(&user);
    assert_eq!(
        help,
        [
            "/greet - Greets someone",
            "  aliases: hello",
            "  usage: /greet <name> [<times>]",
        ]
    );
}
