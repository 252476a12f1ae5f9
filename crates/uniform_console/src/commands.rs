//! Example cross-platform commands.
//!
//! Each command is a [`CommandProvider`] generic over any [`CommandUser`], so
//! the same definition registers on every host.

use uniform_dispatch::{
    Argument, CommandBuilder, CommandProvider, CommandTree, ExecutionContext, ParserRegistry,
    Syntax,
};
use uniform_foundation::{Permission, Result};

use crate::audience::CommandUser;
use crate::host::ConsoleHost;
use crate::user::ConsoleUser;

/// Game modes accepted by [`GamemodeCommand`].
pub const GAME_MODES: [&str; 4] = ["survival", "creative", "adventure", "spectator"];

/// Most greetings one invocation may send.
pub const MAX_GREETINGS: i64 = 10;

/// Says hello to the world.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExampleCrossPlatCommand;

impl<S: CommandUser + 'static> CommandProvider<S> for ExampleCrossPlatCommand {
    fn name(&self) -> &str {
        "example-crossplat"
    }

    fn description(&self) -> &str {
        "An example cross-platform command"
    }

    fn provide(&self, builder: CommandBuilder<S>) -> Result<CommandBuilder<S>> {
        Ok(builder
            .condition(|_: &S| true)
            .executes(|ctx: &ExecutionContext<'_, S>| {
                ctx.source().audience().send_message("Hello, world!");
                Ok(())
            }))
    }
}

/// `greet <name:string> [times:int]`, alias `hello`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreetCommand;

impl<S: CommandUser + 'static> CommandProvider<S> for GreetCommand {
    fn name(&self) -> &str {
        "greet"
    }

    fn description(&self) -> &str {
        "Greets someone by name"
    }

    fn aliases(&self) -> Vec<String> {
        vec!["hello".to_string()]
    }

    fn provide(&self, builder: CommandBuilder<S>) -> Result<CommandBuilder<S>> {
        let parsers = ParserRegistry::with_builtins();
        let syntax = Syntax::compile("<name:string> [times:int]", &parsers)?;
        Ok(builder.syntax(syntax, |ctx: &ExecutionContext<'_, S>| {
            let name = ctx.string("name").unwrap_or_default();
            let times = ctx.int("times").unwrap_or(1);
            if !(1..=MAX_GREETINGS).contains(&times) {
                return Err(format!("times must be between 1 and {MAX_GREETINGS}").into());
            }
            for _ in 0..times {
                ctx.source().audience().send_message(&format!("Hello, {name}!"));
            }
            Ok(())
        }))
    }
}

/// `gamemode <mode> [player]`, alias `gm`; operators only.
#[derive(Clone, Copy, Debug, Default)]
pub struct GamemodeCommand;

impl<S: CommandUser + 'static> CommandProvider<S> for GamemodeCommand {
    fn name(&self) -> &str {
        "gamemode"
    }

    fn description(&self) -> &str {
        "Changes a player's game mode"
    }

    fn aliases(&self) -> Vec<String> {
        vec!["gm".to_string()]
    }

    fn permission(&self) -> Option<Permission> {
        Some(Permission::operator("uniform.gamemode"))
    }

    fn provide(&self, builder: CommandBuilder<S>) -> Result<CommandBuilder<S>> {
        let syntax = Syntax::new()
            .then(Argument::choice("mode", GAME_MODES))
            .then(Argument::word("player").optional());
        Ok(builder.syntax(syntax, |ctx: &ExecutionContext<'_, S>| {
            let mode = ctx.string("mode").unwrap_or_default();
            let player = ctx.string("player").unwrap_or_else(|| ctx.source().name());
            ctx.source()
                .audience()
                .send_message(&format!("Set {player}'s game mode to {mode}"));
            Ok(())
        }))
    }
}

/// `admin reload` and `admin broadcast <message>`; each sub-command carries
/// a permission derived from `uniform.admin`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdminCommand;

impl<S: CommandUser + 'static> CommandProvider<S> for AdminCommand {
    fn name(&self) -> &str {
        "admin"
    }

    fn description(&self) -> &str {
        "Server administration"
    }

    fn permission(&self) -> Option<Permission> {
        Some(Permission::operator("uniform.admin"))
    }

    fn provide(&self, builder: CommandBuilder<S>) -> Result<CommandBuilder<S>> {
        let reload = CommandTree::builder("reload")
            .description("Reloads configuration")
            .executes(|ctx: &ExecutionContext<'_, S>| {
                ctx.source().audience().send_message("Configuration reloaded.");
                Ok(())
            })
            .build()?;
        let broadcast = CommandTree::builder("broadcast")
            .alias("say")
            .description("Sends a message to everyone")
            .syntax(
                Syntax::new().then(Argument::greedy("message")),
                |ctx: &ExecutionContext<'_, S>| {
                    let message = ctx.string("message").unwrap_or_default();
                    ctx.source()
                        .audience()
                        .send_message(&format!("[Broadcast] {message}"));
                    Ok(())
                },
            )
            .build()?;
        Ok(builder
            .propagate_permissions(true)
            .sub_command(reload)
            .sub_command(broadcast))
    }
}

/// Registers every example command with `host`.
///
/// # Errors
///
/// Returns an error if a command fails to build or a label is taken.
pub fn register_examples(host: &ConsoleHost) -> Result<()> {
    let providers: [&dyn CommandProvider<ConsoleUser>; 4] = [
        &ExampleCrossPlatCommand,
        &GreetCommand,
        &GamemodeCommand,
        &AdminCommand,
    ];
    for provider in providers {
        host.register_provider(provider)?;
    }
    Ok(())
}
