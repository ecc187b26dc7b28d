use crate::config::{Config, DEFAULT_CONFIG_NAME};
use crate::playground::INITIAL_SOURCE;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Entry component created for the playground
    #[arg(short, long, default_value = "src/App.jsx")]
    pub entry: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Livepad project...".bright_blue().bold());

    let config = Config {
        entry: args.entry.clone(),
        ..Config::default()
    };

    let entry_path = config.entry_path(cwd);
    if let Some(parent) = entry_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            println!("  {} Created {}/", "✓".green(), parent.strip_prefix(cwd).unwrap_or(parent).display());
        }
    }

    if !entry_path.exists() {
        fs::write(&entry_path, INITIAL_SOURCE)?;
        println!("  {} Created {}", "✓".green(), args.entry);
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: livepad serve --watch {}", args.entry);
    println!("  2. Open http://{}:{}", config.host, config.port);

    Ok(())
}
