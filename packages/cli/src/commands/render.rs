use super::{compile_source, display_name, read_source, resolve};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use livepad_sandbox::{ChromeHost, SandboxHost};
use livepad_synthesizer::synthesize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Component file to render
    pub file: PathBuf,

    /// How long to wait for the component to mount, in milliseconds
    #[arg(long, default_value = "5000")]
    pub timeout_ms: u64,
}

/// Execute a component in headless Chrome and print what it mounted
pub fn render(args: RenderArgs, cwd: &Path) -> Result<()> {
    let path = resolve(cwd, &args.file);
    let source = read_source(&path)?;

    let transpiled = compile_source(&path, &source)?;
    let doc = synthesize(&transpiled);

    println!("🎥 {} {}", "Rendering".green().bold(), display_name(&path));

    let host = ChromeHost::new()?.with_settle_timeout(Duration::from_millis(args.timeout_ms));
    host.present(&doc)?;
    let contents = host.mount_contents()?;

    if contents.contains("Runtime Error:") {
        eprintln!("{}", contents);
        return Err(anyhow!("{} failed at runtime", display_name(&path)));
    }
    if contents.is_empty() {
        println!("{}", "(nothing was mounted)".dimmed());
    } else {
        println!("{}", contents);
    }

    Ok(())
}
