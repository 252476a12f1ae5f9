//! Grammar tests.
//!
//! Precedence, backtracking, merging, sub-commands and builder validation.

use uniform_dispatch::{
    Argument, ArgumentError, ArgumentParser, CommandTree, Dispatcher, ExecutionContext,
    ParserRegistry, StringReader, Syntax,
};
use uniform_foundation::{ErrorKind, Value};

use crate::common::{Calls, Sender, arg, recorder};

fn register(tree: CommandTree<Sender>) -> Dispatcher<Sender> {
    let dispatcher = Dispatcher::default();
    dispatcher.register(tree).unwrap();
    dispatcher
}

fn labels(calls: &Calls) -> Vec<String> {
    calls.lock().iter().map(|(label, _)| label.clone()).collect()
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn literal_beats_variable() {
    let calls = Calls::default();
    let dispatcher = register(
        CommandTree::builder("t")
            .syntax(Syntax::new().then(Argument::int("n")), recorder(&calls, "variable"))
            .syntax(Syntax::new().then(Argument::literal("5")), recorder(&calls, "literal"))
            .build()
            .unwrap(),
    );

    dispatcher.execute("t 5", &Sender::player()).unwrap();
    dispatcher.execute("t 6", &Sender::player()).unwrap();
    assert_eq!(labels(&calls), ["literal", "variable"]);
    assert_eq!(arg(&calls.lock()[1], "n"), Some(&Value::Int(6)));
}

#[test]
fn matched_literal_is_not_backtracked() {
    let calls = Calls::default();
    let dispatcher = register(
        CommandTree::builder("t")
            .syntax(Syntax::new().then(Argument::literal("5")), recorder(&calls, "literal"))
            .syntax(
                Syntax::new().then(Argument::int("n")).then(Argument::word("rest")),
                recorder(&calls, "variable"),
            )
            .build()
            .unwrap(),
    );

    let err = dispatcher.execute("t 5 x", &Sender::player()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SyntaxError { .. }));
    assert_eq!(err.cursor(), Some(4));
    assert!(calls.lock().is_empty());
}

#[test]
fn first_registered_variable_wins() {
    let calls = Calls::default();
    let dispatcher = register(
        CommandTree::builder("pick")
            .syntax(Syntax::new().then(Argument::int("number")), recorder(&calls, "int"))
            .syntax(Syntax::new().then(Argument::word("text")), recorder(&calls, "word"))
            .build()
            .unwrap(),
    );

    dispatcher.execute("pick 5", &Sender::player()).unwrap();
    dispatcher.execute("pick five", &Sender::player()).unwrap();
    assert_eq!(labels(&calls), ["int", "word"]);
}

#[test]
fn failed_variable_branch_backtracks_to_sibling() {
    let calls = Calls::default();
    let dispatcher = register(
        CommandTree::builder("pick")
            .syntax(
                Syntax::new().then(Argument::int("n")).then(Argument::literal("go")),
                recorder(&calls, "int"),
            )
            .syntax(
                Syntax::new().then(Argument::word("w")).then(Argument::literal("stop")),
                recorder(&calls, "word"),
            )
            .build()
            .unwrap(),
    );

    dispatcher.execute("pick 5 stop", &Sender::player()).unwrap();
    assert_eq!(labels(&calls), ["word"]);
    assert_eq!(arg(&calls.lock()[0], "w"), Some(&Value::from("5")));
    assert_eq!(arg(&calls.lock()[0], "n"), None);
}

#[test]
fn furthest_failure_is_reported() {
    let calls = Calls::default();
    let dispatcher = register(
        CommandTree::builder("pick")
            .syntax(
                Syntax::new().then(Argument::int("n")).then(Argument::literal("go")),
                recorder(&calls, "int"),
            )
            .syntax(Syntax::new().then(Argument::word("w")), recorder(&calls, "word"))
            .build()
            .unwrap(),
    );

    let err = dispatcher.execute("pick 5 stop", &Sender::player()).unwrap_err();
    let ErrorKind::SyntaxError { reason, .. } = &err.kind else {
        panic!("expected syntax error, got {err:?}");
    };
    assert_eq!(reason, "unknown or incomplete command, expected one of: go");
    assert_eq!(err.cursor(), Some(7));
}

// =============================================================================
// Executors and boundaries
// =============================================================================

#[test]
fn default_executor_runs_on_bare_name() {
    let calls = Calls::default();
    let dispatcher = register(
        CommandTree::builder("spawn")
            .executes(recorder(&calls, "default"))
            .syntax(Syntax::new().then(Argument::word("world")), recorder(&calls, "world"))
            .build()
            .unwrap(),
    );

    dispatcher.execute("spawn", &Sender::player()).unwrap();
    dispatcher.execute("spawn nether", &Sender::player()).unwrap();
    assert_eq!(labels(&calls), ["default", "world"]);
}

#[test]
fn trailing_separator_is_incomplete() {
    let calls = Calls::default();
    let dispatcher = register(
        CommandTree::builder("spawn")
            .syntax(Syntax::new().then(Argument::word("world")), recorder(&calls, "world"))
            .build()
            .unwrap(),
    );

    let state = dispatcher.parse("spawn ", &Sender::player());
    assert!(matches!(
        state.failure().map(|e| &e.kind),
        Some(ErrorKind::IncompleteCommand { .. })
    ));
    assert_eq!(state.cursor(), 6);
}

#[test]
fn shared_prefixes_merge() {
    let calls = Calls::default();
    let parsers = ParserRegistry::with_builtins();
    let tree = CommandTree::builder("x")
        .syntax(Syntax::compile("give <item>", &parsers).unwrap(), recorder(&calls, "one"))
        .syntax(
            Syntax::compile("give <item> <count:int>", &parsers).unwrap(),
            recorder(&calls, "many"),
        )
        .build()
        .unwrap();
    assert_eq!(tree.root().children().len(), 1);
    assert_eq!(tree.root().children()[0].children().len(), 1);

    let dispatcher = register(tree);
    dispatcher.execute("x give apple", &Sender::player()).unwrap();
    dispatcher.execute("x give apple 3", &Sender::player()).unwrap();
    assert_eq!(labels(&calls), ["one", "many"]);
}

#[test]
fn ignore_case_literal() {
    let calls = Calls::default();
    let dispatcher = register(
        CommandTree::builder("music")
            .syntax(
                Syntax::new().then(Argument::literal_ignore_case("stop")),
                recorder(&calls, "stop"),
            )
            .syntax(Syntax::new().then(Argument::literal("play")), recorder(&calls, "play"))
            .build()
            .unwrap(),
    );

    dispatcher.execute("music STOP", &Sender::player()).unwrap();
    assert!(dispatcher.execute("music PLAY", &Sender::player()).is_err());
    assert_eq!(labels(&calls), ["stop"]);
}

// =============================================================================
// Sub-commands
// =============================================================================

fn team(calls: &Calls) -> CommandTree<Sender> {
    let add = CommandTree::builder("add")
        .alias("create")
        .syntax(Syntax::new().then(Argument::word("name")), recorder(calls, "add"))
        .build()
        .unwrap();
    let list = CommandTree::builder("list")
        .executes(recorder(calls, "list"))
        .build()
        .unwrap();
    CommandTree::builder("team")
        .sub_command(add)
        .sub_command(list)
        .build()
        .unwrap()
}

#[test]
fn sub_commands_are_grafted_with_aliases() {
    let calls = Calls::default();
    let dispatcher = register(team(&calls));

    dispatcher.execute("team add red", &Sender::player()).unwrap();
    dispatcher.execute("team create blue", &Sender::player()).unwrap();
    dispatcher.execute("team list", &Sender::player()).unwrap();
    assert_eq!(labels(&calls), ["add", "add", "list"]);
    assert_eq!(arg(&calls.lock()[1], "name"), Some(&Value::from("blue")));
}

#[test]
fn unknown_sub_command_lists_choices() {
    let calls = Calls::default();
    let dispatcher = register(team(&calls));

    let err = dispatcher.execute("team remove red", &Sender::player()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown or incomplete command, expected one of: add, create, list"
    );
    assert_eq!(err.cursor(), Some(5));
}

// =============================================================================
// Custom parsers
// =============================================================================

/// Reads `#rrggbb` colours as integers.
#[derive(Debug)]
struct ColorParser;

impl ArgumentParser for ColorParser {
    fn type_name(&self) -> &str {
        "color"
    }

    fn parse(&self, reader: &mut StringReader<'_>) -> Result<Value, ArgumentError> {
        let token = reader.read_unquoted();
        let digits = token
            .strip_prefix('#')
            .filter(|d| d.len() == 6)
            .ok_or_else(|| ArgumentError::Custom(format!("expected #rrggbb, found '{token}'")))?;
        i64::from_str_radix(digits, 16)
            .map(Value::Int)
            .map_err(|_| ArgumentError::Custom(format!("invalid colour '{token}'")))
    }

    fn suggest(&self, _prefix: &str) -> Vec<String> {
        vec!["#ff0000".to_string(), "#00ff00".to_string()]
    }
}

#[test]
fn custom_parser_through_registry() {
    let calls = Calls::default();
    let mut parsers = ParserRegistry::with_builtins();
    parsers.register("color", ColorParser);
    let dispatcher = register(
        CommandTree::builder("paint")
            .syntax(
                Syntax::compile("<shade:color>", &parsers).unwrap(),
                recorder(&calls, "paint"),
            )
            .build()
            .unwrap(),
    );

    dispatcher.execute("paint #00ff00", &Sender::player()).unwrap();
    assert_eq!(arg(&calls.lock()[0], "shade"), Some(&Value::Int(0xff00)));

    let err = dispatcher.execute("paint red", &Sender::player()).unwrap_err();
    assert_eq!(err.to_string(), "expected #rrggbb, found 'red'");
    assert_eq!(dispatcher.suggest_texts("paint #f", &Sender::player()), ["#ff0000"]);
}

#[test]
fn unknown_parser_type() {
    let err = Syntax::compile("<shade:color>", &ParserRegistry::with_builtins()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownParser(ref name) if name == "color"));
}

// =============================================================================
// Builder validation
// =============================================================================

fn invalid(builder: uniform_dispatch::CommandBuilder<Sender>) -> String {
    match builder.build() {
        Ok(_) => panic!("grammar should be rejected"),
        Err(err) => {
            assert!(matches!(err.kind, ErrorKind::InvalidGrammar(_)), "{err:?}");
            err.to_string()
        }
    }
}

fn noop(_: &ExecutionContext<'_, Sender>) -> uniform_dispatch::ExecutorResult {
    Ok(())
}

#[test]
fn rejects_competing_executors() {
    let msg = invalid(
        CommandTree::builder("x")
            .syntax(Syntax::new().then(Argument::word("a")), noop)
            .syntax(Syntax::new().then(Argument::word("a")), noop),
    );
    assert!(msg.contains("two executors"));
}

#[test]
fn rejects_required_after_optional() {
    let msg = invalid(CommandTree::builder("x").syntax(
        Syntax::new()
            .then(Argument::word("a").optional())
            .then(Argument::word("b")),
        noop,
    ));
    assert!(msg.contains("follows optional"));
}

#[test]
fn rejects_greedy_with_children() {
    let msg = invalid(CommandTree::builder("x").syntax(
        Syntax::new().then(Argument::greedy("msg")).then(Argument::word("b")),
        noop,
    ));
    assert!(msg.contains("must be last"));
}

#[test]
fn rejects_colliding_literals() {
    invalid(
        CommandTree::builder("x")
            .syntax(Syntax::new().then(Argument::literal_ignore_case("Stop")), noop)
            .syntax(Syntax::new().then(Argument::literal("stop")), noop),
    );
}

#[test]
fn rejects_variable_type_conflict() {
    let msg = invalid(
        CommandTree::builder("x")
            .syntax(Syntax::new().then(Argument::int("n")), noop)
            .syntax(Syntax::new().then(Argument::word("n")), noop),
    );
    assert!(msg.contains("both int and word"));
}

#[test]
fn rejects_differently_bounded_variables() {
    let msg = invalid(
        CommandTree::builder("b")
            .syntax(Syntax::new().then(Argument::int_between("n", 1, 5)), noop)
            .syntax(
                Syntax::new().then(Argument::int("n")).then(Argument::literal("x")),
                noop,
            ),
    );
    assert!(msg.contains("both int(1..=5) and int"), "{msg}");
}

#[test]
fn rejects_different_choice_menus() {
    let msg = invalid(
        CommandTree::builder("mode")
            .syntax(
                Syntax::new().then(Argument::choice("m", ["survival", "creative"])),
                noop,
            )
            .syntax(
                Syntax::new()
                    .then(Argument::choice("m", ["adventure", "spectator"]))
                    .then(Argument::int("n")),
                noop,
            ),
    );
    assert!(
        msg.contains("both m(survival|creative) and m(adventure|spectator)"),
        "{msg}"
    );
}

#[test]
fn identical_choice_menus_merge() {
    let calls = Calls::default();
    let dispatcher = register(
        CommandTree::builder("mode")
            .syntax(
                Syntax::new().then(Argument::choice("m", ["survival", "creative"])),
                recorder(&calls, "short"),
            )
            .syntax(
                Syntax::new()
                    .then(Argument::choice("m", ["survival", "creative"]))
                    .then(Argument::int("n")),
                recorder(&calls, "long"),
            )
            .build()
            .unwrap(),
    );

    dispatcher.execute("mode creative", &Sender::player()).unwrap();
    dispatcher.execute("mode survival 2", &Sender::player()).unwrap();
    assert_eq!(labels(&calls), ["short", "long"]);
}

#[test]
fn rejects_bad_names_and_empty_commands() {
    invalid(CommandTree::builder("").executes(noop));
    invalid(CommandTree::builder("two words").executes(noop));
    invalid(CommandTree::builder("x").alias(" ").executes(noop));
    let msg = invalid(CommandTree::builder("x"));
    assert!(msg.contains("neither an executor nor any syntax"));
}
