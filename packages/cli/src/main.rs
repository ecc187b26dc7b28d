mod commands;
mod config;
mod playground;

use clap::{Parser, Subcommand};
use colored::Colorize;
#[cfg(feature = "chrome")]
use commands::{render, RenderArgs};
use commands::{build, check, init, serve, BuildArgs, CheckArgs, InitArgs, ServeArgs};

/// Livepad - live JSX playground
#[derive(Parser, Debug)]
#[command(name = "livepad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Livepad project
    Init(InitArgs),

    /// Check a component for disallowed imports and syntax errors
    Check(CheckArgs),

    /// Build the standalone preview document for a component
    Build(BuildArgs),

    /// Start the playground server
    Serve(ServeArgs),

    #[cfg(feature = "chrome")]
    /// Render a component in headless Chrome and print the result
    Render(RenderArgs),
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Check(args) => check(args, &cwd),
            Command::Build(args) => build(args, &cwd),
            Command::Serve(args) => serve(args, &cwd),
            #[cfg(feature = "chrome")]
            Command::Render(args) => render(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
