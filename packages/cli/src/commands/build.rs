use super::{compile_source, display_name, read_source, resolve};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use livepad_synthesizer::{synthesize, DefaultExport};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Component file to build
    pub file: PathBuf,

    /// Write the preview document here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Produce the standalone preview document for a component
pub fn build(args: BuildArgs, cwd: &Path) -> Result<()> {
    let path = resolve(cwd, &args.file);
    let source = read_source(&path)?;

    let transpiled = compile_source(&path, &source)?;
    let doc = synthesize(&transpiled);

    if let DefaultExport::Missing = doc.default_export() {
        eprintln!(
            "{} {} has no default export, the preview will show a placeholder",
            "⚠️".yellow(),
            display_name(&path)
        );
    }

    match args.output {
        Some(output) => {
            let output = resolve(cwd, &output);
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output, doc.html())?;
            println!(
                "{} {} → {}",
                "✓".green(),
                display_name(&path),
                output.display()
            );
        }
        None => print!("{}", doc),
    }

    Ok(())
}
