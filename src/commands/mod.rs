pub mod format_json;
pub mod render;

pub use format_json::FormatJsonCommand;
pub use render::{RenderCommand, log_diagnostics};

use crate::context::Context;
use anyhow::Result;
use std::path::Path;

/// Read command input from a file, or from standard input when `path` is absent or `-`
pub(crate) fn read_input(ctx: &Context, path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => ctx.fs.read_stdin(),
        Some(path) => {
            let path = Path::new(path);
            if !ctx.fs.exists(path) {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            ctx.fs.read_to_string(path)
        }
    }
}

/// Print `text` as the command result, or write it to `output_path`
pub(crate) fn emit_report(ctx: &Context, text: &str, output_path: Option<&str>) -> Result<()> {
    match output_path {
        Some(path) => {
            ctx.fs.write(Path::new(path), text)?;
            ctx.output.success(&format!("Report written to {}", path));
        }
        None => ctx.output.report(text),
    }
    Ok(())
}
