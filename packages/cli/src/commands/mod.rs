pub mod build;
pub mod check;
pub mod init;
#[cfg(feature = "chrome")]
pub mod render;
pub mod serve;

pub use build::{build, BuildArgs};
pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
#[cfg(feature = "chrome")]
pub use render::{render, RenderArgs};
pub use serve::{serve, ServeArgs};

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

pub(crate) fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

pub(crate) fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Guard and transpile `source`, printing diagnostics with source context
pub(crate) fn compile_source(path: &Path, source: &str) -> Result<String> {
    let filename = display_name(path);

    if let Err(err) = livepad_guard::check(source) {
        let (start, end) = err.span();
        let line = source.get(..start).unwrap_or_default().matches('\n').count() + 1;
        let statement = source.get(start..end).unwrap_or_default().trim();

        eprintln!("{} {}:{}", "✗".red(), filename, line);
        eprintln!("  {}", err.to_string().red());
        eprintln!("  {}", statement.dimmed());
        bail!("{} imports \"{}\"", filename, err.module());
    }

    livepad_transpiler::transform(source).map_err(|e| anyhow!("\n{}", e.render(source, &filename)))
}
