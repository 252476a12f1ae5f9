//! REPL session integration tests
//!
//! Scripted console sessions over the example commands.

use std::sync::Arc;

use uniform::console::{
    BufferedAudience, Console, ConsoleHost, ConsoleUser, LineOutcome, ScriptedEditor,
    register_examples,
};

fn session(lines: &[&str]) -> (Console<ScriptedEditor>, Arc<BufferedAudience>) {
    let host = Arc::new(ConsoleHost::new());
    register_examples(&host).unwrap();
    let audience = Arc::new(BufferedAudience::new());
    let user = ConsoleUser::console_with(audience.clone());
    let console = Console::with_editor(ScriptedEditor::new(lines.iter().copied()), host, user)
        .without_banner();
    (console, audience)
}

#[test]
fn scripted_session() {
    let (mut console, audience) = session(&["greet Alice 2", "", "gm creative", "exit"]);
    console.run().unwrap();

    assert_eq!(
        audience.messages(),
        [
            "Hello, Alice!",
            "Hello, Alice!",
            "Set CONSOLE's game mode to creative",
            "Goodbye!",
        ]
    );
    assert_eq!(console.editor().history(), ["greet Alice 2", "gm creative", "exit"]);
}

#[test]
fn failures_do_not_end_the_session() {
    let (mut console, audience) = session(&["greet", "fly", "example-crossplat"]);
    console.run().unwrap();

    assert_eq!(audience.errors().len(), 2);
    assert_eq!(
        audience.messages().last().map(String::as_str),
        Some("Goodbye!")
    );
    assert!(audience.messages().contains(&"Hello, world!".to_string()));
}

#[test]
fn help_and_builtins() {
    let (console, audience) = session(&[]);
    assert_eq!(console.run_line("?"), LineOutcome::Continue);
    assert!(audience.messages().contains(&"/admin - Server administration".to_string()));
    assert_eq!(console.run_line("greet Bob"), LineOutcome::Success);
    assert_eq!(console.run_line("greet"), LineOutcome::Continue);
    assert_eq!(console.run_line("quit"), LineOutcome::Exit);
}
