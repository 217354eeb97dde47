use crate::commands::{emit_report, read_input};
use crate::context::Context;
use crate::diff::format_json;
use crate::output::color::ColorMode;
use anyhow::{Context as _, Result};
use serde_json::Value;

/// Handles the 'format-json' command - pretty prints a JSON document with aligned paths
pub struct FormatJsonCommand;

impl FormatJsonCommand {
    /// Execute the format-json command
    pub fn execute(
        ctx: &Context,
        input: Option<&str>,
        color_mode: ColorMode,
        output_path: Option<&str>,
    ) -> Result<()> {
        let content = read_input(ctx, input)?;

        let value: Value = serde_json::from_str(&content).context("Failed to parse JSON input")?;

        emit_report(ctx, &format_json(&value, color_mode), output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockFileSystem, MockOutput};
    use std::sync::Arc;

    #[test]
    fn test_format_json_object() {
        let fs = Arc::new(
            MockFileSystem::new().with_file("value.json", r#"{"sku": {"name": "S1"}, "kind": "app"}"#),
        );
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(fs, output.clone());

        FormatJsonCommand::execute(&ctx, Some("value.json"), ColorMode::Off, None).unwrap();

        assert_eq!(
            output.get_reports(),
            vec!["\n\n  sku.name: \"S1\"\n  kind:     \"app\"\n".to_string()]
        );
    }

    #[test]
    fn test_format_json_invalid_input() {
        let fs = Arc::new(MockFileSystem::new().with_stdin("{"));
        let output = Arc::new(MockOutput::new());
        let ctx = Context::test_with(fs, output);

        let err = FormatJsonCommand::execute(&ctx, None, ColorMode::Off, None).unwrap_err();

        assert!(err.to_string().contains("Failed to parse JSON input"));
    }
}
