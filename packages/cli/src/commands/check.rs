use super::{compile_source, display_name, read_source, resolve};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Component file to check
    pub file: PathBuf,
}

/// Run the dependency guard and the transpiler without producing output
pub fn check(args: CheckArgs, cwd: &Path) -> Result<()> {
    let path = resolve(cwd, &args.file);
    let source = read_source(&path)?;

    compile_source(&path, &source)?;

    println!("{} {} is ready to preview", "✓".green(), display_name(&path));
    Ok(())
}
