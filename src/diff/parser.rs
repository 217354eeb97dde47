//! Preview result parser
//!
//! This module reads the JSON produced by a what-if preview into a
//! [`PreviewResult`]. Three document shapes are accepted:
//!
//! - a bare array of resource changes
//! - a result object: `{"status", "changes", "diagnostics"}`
//! - a REST response envelope: `{"status", "properties": {"changes", "diagnostics"}}`

use serde_json::{Map, Value};
use tracing::debug;

use super::types::{Diagnostic, PreviewResult, ResourceChange};
use crate::error::{RenderError, RenderResult};

/// Parser for what-if preview documents
#[derive(Debug, Default, Clone, Copy)]
pub struct PreviewParser;

impl PreviewParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a preview document into a `PreviewResult`
    pub fn parse(&self, input: &str) -> RenderResult<PreviewResult> {
        let document: Value = serde_json::from_str(input)?;
        self.parse_value(document)
    }

    /// Parse an already decoded preview document
    pub fn parse_value(&self, document: Value) -> RenderResult<PreviewResult> {
        let result = match document {
            Value::Array(_) => {
                let changes: Vec<ResourceChange> = serde_json::from_value(document)?;
                PreviewResult::new(changes)
            }
            Value::Object(mut envelope) => match envelope.remove("properties") {
                Some(Value::Object(properties)) => self.parse_envelope(envelope, properties)?,
                Some(other) => {
                    return Err(RenderError::Parse(format!(
                        "expected 'properties' to be an object, found {}",
                        value_kind(&other)
                    )));
                }
                None => serde_json::from_value(Value::Object(envelope))?,
            },
            other => {
                return Err(RenderError::Parse(format!(
                    "expected an array of changes or a preview result object, found {}",
                    value_kind(&other)
                )));
            }
        };

        debug!(
            changes = result.changes.len(),
            diagnostics = result.diagnostics.len(),
            status = result.status.as_deref().unwrap_or(""),
            "Parsed preview result"
        );

        Ok(result)
    }

    fn parse_envelope(
        &self,
        mut envelope: Map<String, Value>,
        mut properties: Map<String, Value>,
    ) -> RenderResult<PreviewResult> {
        let status = envelope
            .remove("status")
            .or_else(|| properties.remove("status"))
            .and_then(|status| status.as_str().map(str::to_string));

        let changes: Vec<ResourceChange> = match properties.remove("changes") {
            Some(Value::Null) | None => Vec::new(),
            Some(changes) => serde_json::from_value(changes)?,
        };

        let diagnostics: Vec<Diagnostic> = match properties.remove("diagnostics") {
            Some(Value::Null) | None => Vec::new(),
            Some(diagnostics) => serde_json::from_value(diagnostics)?,
        };

        Ok(PreviewResult {
            status,
            changes,
            diagnostics,
        })
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::renderer::{DiffRenderer, WhatIfRenderer};
    use crate::diff::types::{ChangeKind, PropertyChangeKind};
    use crate::output::color::ColorMode;
    use serde_json::json;

    const RESOURCE_ID: &str =
        "/subscriptions/00000000-0000-0000-0000-000000000001/resourceGroups/rg1/providers/Microsoft.Storage/storageAccounts/sa1";

    #[test]
    fn test_parse_bare_array() {
        let input = json!([
            { "resourceId": RESOURCE_ID, "changeType": "Create", "after": { "name": "sa1" } },
            { "resourceId": RESOURCE_ID, "changeType": "NoChange" }
        ])
        .to_string();

        let result = PreviewParser::new().parse(&input).unwrap();

        assert_eq!(result.changes.len(), 2);
        assert_eq!(result.changes[0].change_kind, ChangeKind::Create);
        assert_eq!(result.changes[0].after, Some(json!({ "name": "sa1" })));
        assert_eq!(result.changes[1].change_kind, ChangeKind::NoChange);
        assert!(result.status.is_none());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_result_object() {
        let input = json!({
            "status": "Succeeded",
            "changes": [{
                "resourceId": RESOURCE_ID,
                "changeType": "Modify",
                "delta": [{
                    "path": "properties.tier",
                    "propertyChangeType": "Modify",
                    "before": "Hot",
                    "after": "Cool"
                }]
            }],
            "diagnostics": [{ "level": "Warning", "code": "W1", "message": "careful" }]
        })
        .to_string();

        let result = PreviewParser::new().parse(&input).unwrap();

        assert_eq!(result.status.as_deref(), Some("Succeeded"));
        let delta = result.changes[0].delta.as_ref().unwrap();
        assert_eq!(delta[0].kind, PropertyChangeKind::Modify);
        assert_eq!(delta[0].before, Some(json!("Hot")));
        assert_eq!(result.diagnostics[0].code, "W1");
    }

    #[test]
    fn test_parse_rest_envelope() {
        let input = json!({
            "status": "Succeeded",
            "properties": {
                "changes": [{
                    "resourceId": RESOURCE_ID,
                    "changeType": "Modify",
                    "delta": [{
                        "path": "properties.list",
                        "propertyChangeType": "Array",
                        "children": [{ "path": "0", "propertyChangeType": "Delete", "before": 1 }]
                    }]
                }],
                "diagnostics": null
            }
        })
        .to_string();

        let result = PreviewParser::new().parse(&input).unwrap();

        assert_eq!(result.status.as_deref(), Some("Succeeded"));
        assert!(result.diagnostics.is_empty());
        let array_change = &result.changes[0].delta.as_ref().unwrap()[0];
        assert_eq!(array_change.kind, PropertyChangeKind::ArrayChange);
        assert_eq!(array_change.children_slice().len(), 1);
    }

    #[test]
    fn test_parse_envelope_without_changes() {
        let result = PreviewParser::new()
            .parse(r#"{"properties": {}}"#)
            .unwrap();

        assert!(result.changes.is_empty());
        assert!(result.status.is_none());
    }

    #[test]
    fn test_parse_keeps_explicit_null_payload() {
        let input = json!([{
            "resourceId": RESOURCE_ID,
            "changeType": "Modify",
            "delta": [{ "path": "tag", "propertyChangeType": "Delete", "before": null }]
        }])
        .to_string();

        let result = PreviewParser::new().parse(&input).unwrap();
        let change = &result.changes[0].delta.as_ref().unwrap()[0];

        assert_eq!(change.before, Some(Value::Null));
        assert_eq!(change.after, None);
    }

    #[test]
    fn test_null_resource_snapshots_render_as_absent() {
        let input = json!([
            {
                "resourceId": "/subscriptions/s1/resourceGroups/rg1/providers/p/a",
                "changeType": "Create",
                "before": null,
                "after": { "apiVersion": "2022-01-01" }
            },
            {
                "resourceId": "/subscriptions/s1/resourceGroups/rg1/providers/p/b",
                "changeType": "Delete",
                "before": null,
                "after": null
            },
            {
                "resourceId": "/subscriptions/s2/resourceGroups/rg2/providers/p/c",
                "changeType": "Create",
                "before": null,
                "after": null
            }
        ])
        .to_string();

        let result = PreviewParser::new().parse(&input).unwrap();
        let output = WhatIfRenderer::new(ColorMode::Off)
            .render(&result.changes)
            .unwrap();

        assert!(output.contains(
            "\nScope: /subscriptions/s1/resourceGroups/rg1\n\n  - p/b\n  + p/a [2022-01-01]\n\n      apiVersion: \"2022-01-01\"\n"
        ));
        assert!(output.contains("\nScope: /subscriptions/s2/resourceGroups/rg2\n\n  + p/c\n\nResource changes:"));
        assert!(!output.contains("null"));
    }

    #[test]
    fn test_parse_rejects_unknown_change_kind() {
        let input = json!([{ "resourceId": RESOURCE_ID, "changeType": "Teleport" }]).to_string();

        let err = PreviewParser::new().parse(&input).unwrap_err();

        assert!(matches!(err, RenderError::Parse(_)));
        assert!(err.to_string().contains("Invalid change type: Teleport"));
    }

    #[test]
    fn test_parse_rejects_unknown_property_change_kind() {
        let input = json!([{
            "resourceId": RESOURCE_ID,
            "changeType": "Modify",
            "delta": [{ "path": "x", "propertyChangeType": "Rename" }]
        }])
        .to_string();

        let err = PreviewParser::new().parse(&input).unwrap_err();

        assert!(err.to_string().contains("Unknown property change type: Rename."));
    }

    #[test]
    fn test_parse_rejects_invalid_documents() {
        let parser = PreviewParser::new();

        assert!(matches!(parser.parse("not json"), Err(RenderError::Parse(_))));

        let err = parser.parse("42").unwrap_err();
        assert!(err.to_string().contains("found a number"));

        let err = parser.parse(r#"{"properties": []}"#).unwrap_err();
        assert!(err.to_string().contains("'properties'"));
    }

    #[test]
    fn test_parse_then_exclude_change_kinds() {
        let input = json!([
            { "resourceId": RESOURCE_ID, "changeType": "Create" },
            { "resourceId": RESOURCE_ID, "changeType": "NoChange" },
            { "resourceId": RESOURCE_ID, "changeType": "Ignore" }
        ])
        .to_string();

        let result = PreviewParser::new()
            .parse(&input)
            .unwrap()
            .exclude_change_kinds(&[ChangeKind::NoChange, ChangeKind::Ignore]);

        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].change_kind, ChangeKind::Create);
    }
}
