use crate::commands::{emit_report, read_input};
use crate::context::Context;
use crate::diff::{ChangeKind, Diagnostic, DiffRenderer, PreviewParser, WhatIfRenderer};
use crate::output::color::ColorMode;
use crate::traits::Output;
use anyhow::{Context as _, Result};
use tracing::debug;

/// Handles the 'render' command - prints a what-if preview as a text report
pub struct RenderCommand;

impl RenderCommand {
    /// Execute the render command
    pub fn execute(
        ctx: &Context,
        input: Option<&str>,
        color_mode: ColorMode,
        exclude_change_kinds: &[ChangeKind],
        output_path: Option<&str>,
    ) -> Result<()> {
        let content = read_input(ctx, input)?;

        let result = PreviewParser::new()
            .parse(&content)
            .context("Failed to parse what-if result")?;

        let total = result.changes.len();
        let result = result.exclude_change_kinds(exclude_change_kinds);
        let excluded = total - result.changes.len();
        if excluded > 0 {
            debug!(excluded, "Excluded resource changes by change type");
            ctx.output.dimmed(&format!(
                "Excluded {} resource change(s) by change type",
                excluded
            ));
        }

        let report = WhatIfRenderer::new(color_mode)
            .render(&result.changes)
            .context("Failed to render what-if result")?;

        emit_report(ctx, &report, output_path)?;
        log_diagnostics(&result.diagnostics, ctx.output.as_ref());

        Ok(())
    }
}

/// Log diagnostics returned alongside a preview, routed by level
pub fn log_diagnostics(diagnostics: &[Diagnostic], output: &dyn Output) {
    if diagnostics.is_empty() {
        return;
    }

    output.info("Diagnostics returned by the API");

    for diagnostic in diagnostics {
        let message = format!(
            "[{}] {}: {}",
            diagnostic.level, diagnostic.code, diagnostic.message
        );

        match diagnostic.level.to_lowercase().as_str() {
            "error" => output.error(&message),
            "warning" => output.warning(&message),
            _ => output.info(&message),
        }
    }
}
