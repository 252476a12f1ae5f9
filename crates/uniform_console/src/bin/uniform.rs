//! Uniform console entry point.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use uniform_console::{Console, ConsoleHost, ConsoleUser, StdoutAudience, register_examples};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    player: Option<String>,
    operator: bool,
    grants: Vec<String>,
    commands: Vec<String>,
    no_banner: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::from(2)
        }
    }
}

fn value(args: &[String], i: usize, flag: &str) -> Result<String, Box<dyn std::error::Error>> {
    args.get(i)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value").into())
}

fn parse_args(args: &[String]) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--op" => config.operator = true,
            "--no-banner" => config.no_banner = true,
            "--player" => {
                i += 1;
                config.player = Some(value(args, i, "--player")?);
            }
            "--grant" => {
                i += 1;
                config.grants.push(value(args, i, "--grant")?);
            }
            "-c" | "--command" => {
                i += 1;
                config.commands.push(value(args, i, "-c")?);
            }
            arg => return Err(format!("unknown option: {arg}").into()),
        }
        i += 1;
    }

    Ok(config)
}

/// Returns false if a one-shot command failed.
fn run(args: Vec<String>) -> Result<bool, Box<dyn std::error::Error>> {
    let config = parse_args(&args)?;

    if config.show_help {
        print_help();
        return Ok(true);
    }

    if config.show_version {
        println!("uniform {}", env!("CARGO_PKG_VERSION"));
        return Ok(true);
    }

    let host = Arc::new(ConsoleHost::new());
    register_examples(&host)?;

    let audience = Arc::new(StdoutAudience);
    let mut user = match config.player {
        Some(name) => ConsoleUser::player(name, audience).with_operator(config.operator),
        None => ConsoleUser::console_with(audience),
    };
    for node in config.grants {
        user = user.grant(node);
    }

    // One-shot mode: run each command and exit
    if !config.commands.is_empty() {
        let mut ok = true;
        for command in &config.commands {
            ok &= host.dispatch_line(&user, command);
        }
        return Ok(ok);
    }

    let mut console = Console::new(host, user)?;
    if config.no_banner {
        console = console.without_banner();
    }
    console.run()?;
    Ok(true)
}

fn print_help() {
    println!(
        "\x1b[1mUniform\x1b[0m - Cross-platform command console

\x1b[1mUSAGE:\x1b[0m
    uniform [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    -h, --help         Print help information
    -V, --version      Print version information
    -c, --command CMD  Run CMD and exit (repeatable)
    --player NAME      Run as a player instead of the console
    --op               Make the player an operator
    --grant NODE       Grant a permission node (repeatable)
    --no-banner        Skip the welcome banner

\x1b[1mEXAMPLES:\x1b[0m
    uniform                              Start the console
    uniform -c \"greet Alice 2\"           Run one command
    uniform --player Steve -c \"gm creative\"
                                         Try a command without permission

\x1b[1mCONSOLE COMMANDS:\x1b[0m
    help, ?              List available commands
    exit, quit           Leave the console
    Tab                  Complete the current argument
    Ctrl+D               Exit

Set RUST_LOG=debug for dispatch tracing."
    );
}
