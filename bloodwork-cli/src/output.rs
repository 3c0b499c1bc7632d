use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Write rendered text to `path`, or to stdout when no path is given.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write output {}", path.display()))?;
            eprintln!("💾 Saved to: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{content}").context("failed to write to stdout")?;
        }
    }
    Ok(())
}
