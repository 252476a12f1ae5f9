//! Dispatcher tests.
//!
//! Registration, name resolution and the greet walkthrough.

use uniform_dispatch::{
    AllowAll, Argument, CommandTree, Dispatcher, DispatcherConfig, ExecutionContext, Syntax,
};
use uniform_foundation::{ErrorKind, Value};

use crate::common::{Calls, Sender, arg, dispatcher, greet};

// =============================================================================
// The greet walkthrough
// =============================================================================

#[test]
fn greet_with_name_only() {
    let (dispatcher, calls) = dispatcher();
    let executed = dispatcher.execute("greet Alice", &Sender::player()).unwrap();

    assert_eq!(&*executed.command, "greet");
    assert_eq!(executed.path, "greet <name>");
    let calls = calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(arg(&calls[0], "name"), Some(&Value::from("Alice")));
    assert_eq!(arg(&calls[0], "times"), None);
}

#[test]
fn greet_with_times() {
    let (dispatcher, calls) = dispatcher();
    let executed = dispatcher.execute("greet Alice 3", &Sender::player()).unwrap();

    assert_eq!(executed.path, "greet <name> <times>");
    let calls = calls.lock();
    assert_eq!(arg(&calls[0], "name"), Some(&Value::from("Alice")));
    assert_eq!(arg(&calls[0], "times"), Some(&Value::Int(3)));
}

#[test]
fn greet_alone_is_incomplete() {
    let (dispatcher, calls) = dispatcher();
    let err = dispatcher.execute("greet", &Sender::player()).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::IncompleteCommand { .. }));
    assert_eq!(err.cursor(), Some(5));
    assert!(calls.lock().is_empty());
}

#[test]
fn greet_with_bad_times_is_syntax_error_at_token() {
    let (dispatcher, calls) = dispatcher();
    let err = dispatcher.execute("greet Alice x", &Sender::player()).unwrap_err();

    let ErrorKind::SyntaxError { node, reason } = &err.kind else {
        panic!("expected syntax error, got {err:?}");
    };
    assert_eq!(node, "greet <name> <times>");
    assert_eq!(reason, "expected integer");
    assert_eq!(err.cursor(), Some(12));
    assert!(calls.lock().is_empty());
}

#[test]
fn greet_quoted_name() {
    let (dispatcher, calls) = dispatcher();
    dispatcher
        .execute("greet \"Alice Smith\" 2", &Sender::player())
        .unwrap();
    assert_eq!(arg(&calls.lock()[0], "name"), Some(&Value::from("Alice Smith")));
}

#[test]
fn greet_trailing_argument() {
    let (dispatcher, _) = dispatcher();
    let err = dispatcher.execute("greet Alice 3 extra", &Sender::player()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SyntaxError { ref reason, .. }
        if reason == "incorrect argument for command"));
    assert_eq!(err.cursor(), Some(14));
}

// =============================================================================
// Aliases and names
// =============================================================================

#[test]
fn aliases_are_equivalent() {
    let (dispatcher, calls) = dispatcher();
    let a = dispatcher.execute("greet Bob 2", &Sender::player()).unwrap();
    let b = dispatcher.execute("hello Bob 2", &Sender::player()).unwrap();

    assert_eq!(a.command, b.command);
    assert_eq!(a.path, b.path);
    assert_eq!(a.label, "greet");
    assert_eq!(b.label, "hello");
    let calls = calls.lock();
    assert_eq!(calls[0].1, calls[1].1);
}

#[test]
fn alias_errors_match() {
    let (dispatcher, _) = dispatcher();
    let a = dispatcher.execute("greet Bob x", &Sender::player()).unwrap_err();
    let b = dispatcher.execute("hello Bob x", &Sender::player()).unwrap_err();
    assert_eq!(a.to_string(), b.to_string());
    assert_eq!(a.cursor(), b.cursor());
}

#[test]
fn unknown_command() {
    let (dispatcher, _) = dispatcher();
    let err = dispatcher.execute("fly away", &Sender::player()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownCommand { ref name } if name == "fly"));
    assert_eq!(err.cursor(), Some(0));
}

#[test]
fn empty_input_is_unknown() {
    let (dispatcher, _) = dispatcher();
    let err = dispatcher.execute("", &Sender::player()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownCommand { .. }));
}

#[test]
fn names_ignore_case_by_default() {
    let (dispatcher, calls) = dispatcher();
    dispatcher.execute("HELLO Alice", &Sender::player()).unwrap();
    assert_eq!(calls.lock().len(), 1);
}

#[test]
fn strict_config_keeps_case_and_whitespace() {
    let calls = Calls::default();
    let dispatcher = Dispatcher::with_config(AllowAll, DispatcherConfig::strict());
    dispatcher.register(greet(&calls)).unwrap();
    assert!(dispatcher.execute("HELLO Alice", &Sender::player()).is_err());
    assert!(dispatcher.execute("hello Alice ", &Sender::player()).is_err());
    assert!(dispatcher.execute("hello Alice", &Sender::player()).is_ok());
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn registry_lists_commands_in_name_order() {
    let (dispatcher, _) = dispatcher();
    let names: Vec<_> = dispatcher
        .commands()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(names, ["admin", "greet"]);
}

#[test]
fn alias_owned_by_another_command_is_rejected() {
    let (dispatcher, _) = dispatcher();
    let wave = CommandTree::builder("wave")
        .alias("greet")
        .executes(|_: &ExecutionContext<'_, Sender>| Ok(()))
        .build()
        .unwrap();
    let err = dispatcher.register(wave).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateCommand(ref name) if name == "greet"));
    assert!(dispatcher.get("wave").is_none());
}

#[test]
fn reregistering_replaces_tree() {
    let (dispatcher, calls) = dispatcher();
    let replacement = CommandTree::builder("greet")
        .executes(|_: &ExecutionContext<'_, Sender>| Ok(()))
        .build()
        .unwrap();
    dispatcher.register(replacement).unwrap();

    assert!(dispatcher.execute("greet", &Sender::player()).is_ok());
    assert!(dispatcher.get("hello").is_none());
    assert!(calls.lock().is_empty());
}

#[test]
fn parse_does_not_execute() {
    let (dispatcher, calls) = dispatcher();
    let state = dispatcher.parse("greet Alice 3", &Sender::player());
    assert!(state.is_success());
    assert_eq!(state.path().len(), 3);
    assert_eq!(state.arguments().value("times"), Some(&Value::Int(3)));
    assert!(calls.lock().is_empty());

    dispatcher.execute_parsed(state, &Sender::player()).unwrap();
    assert_eq!(calls.lock().len(), 1);
}

// =============================================================================
// Execution failures
// =============================================================================

#[test]
fn executor_error_is_reported_once_and_isolated() {
    let (dispatcher, calls) = dispatcher();
    let attempts = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = std::sync::Arc::clone(&attempts);
    let broken = CommandTree::builder("broken")
        .syntax(
            Syntax::new().then(Argument::word("what")),
            move |_: &ExecutionContext<'_, Sender>| {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Err("out of cheese".into())
            },
        )
        .build()
        .unwrap();
    dispatcher.register(broken).unwrap();

    let err = dispatcher.execute("broken now", &Sender::player()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ExecutionFailure { ref command, .. } if command == "broken"));
    assert!(err.to_string().contains("out of cheese"));
    assert_eq!(err.cursor(), Some(7));
    assert_eq!(attempts.load(std::sync::atomic::Ordering::SeqCst), 1);

    // Later calls are unaffected.
    dispatcher.execute("greet Alice", &Sender::player()).unwrap();
    assert_eq!(calls.lock().len(), 1);
}
