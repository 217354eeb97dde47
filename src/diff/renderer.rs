//! Renderer for what-if previews
//!
//! The report is laid out as: a notice about false positives, a legend of
//! the change symbols in use, the resource changes grouped by scope, and a
//! one-line tally. Resource changes carrying a property delta print the delta
//! as a tree of aligned `path: before => after` lines.

use std::cmp::Ordering;

use tracing::debug;

use serde_json::Value;

use super::json::{
    format_colon, format_indent, format_json_value, format_path, is_leaf, is_non_empty_array,
    is_non_empty_container, path_length,
};
use super::repair::repair;
use super::types::{ChangeKind, PreviewResult, PropertyChange, PropertyChangeKind, ResourceChange};
use crate::error::{RenderError, RenderResult};
use crate::output::color::{Color, ColorMode, ColorStringBuilder};

const NOISE_NOTICE: &str = "Note: The result may contain false positive predictions (noise).
You can help us improve the accuracy of the result by opening an issue here: https://aka.ms/WhatIfIssues";

/// Trait for diff renderers
pub trait DiffRenderer {
    /// Render the resource changes of a preview to a string
    fn render(&self, changes: &[ResourceChange]) -> RenderResult<String>;
}

/// Text renderer for what-if previews
pub struct WhatIfRenderer {
    color_mode: ColorMode,
}

impl Default for WhatIfRenderer {
    fn default() -> Self {
        Self::new(ColorMode::default())
    }
}

impl WhatIfRenderer {
    pub fn new(color_mode: ColorMode) -> Self {
        Self { color_mode }
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }
}

impl DiffRenderer for WhatIfRenderer {
    fn render(&self, changes: &[ResourceChange]) -> RenderResult<String> {
        debug!(
            changes = changes.len(),
            color_mode = %self.color_mode,
            "Rendering what-if result"
        );

        let mut builder = ColorStringBuilder::new(self.color_mode);

        format_noise_notice(&mut builder);
        format_change_type_legend(&mut builder, changes);
        format_resource_changes(&mut builder, changes)?;
        format_resource_changes_stats(&mut builder, changes);

        Ok(builder.build())
    }
}

/// Render a preview result with the given color mode
pub fn format_what_if_result(result: &PreviewResult, color_mode: ColorMode) -> RenderResult<String> {
    WhatIfRenderer::new(color_mode).render(&result.changes)
}

fn format_noise_notice(builder: &mut ColorStringBuilder) {
    builder.append_line(NOISE_NOTICE).append_line("");
}

fn format_change_type_legend(builder: &mut ColorStringBuilder, changes: &[ResourceChange]) {
    if changes.is_empty() {
        return;
    }

    let mut change_kinds = Vec::new();
    for change in changes {
        change_kinds.push(change.change_kind);
        collect_property_change_kinds(change.delta.as_deref().unwrap_or(&[]), &mut change_kinds);
    }

    change_kinds.sort_by_key(ChangeKind::weight);
    change_kinds.dedup();

    builder.append("Resource and property changes are indicated with ");
    builder.append_line(if change_kinds.len() == 1 {
        "this symbol:"
    } else {
        "these symbols:"
    });

    for change_kind in change_kinds {
        format_indent(builder, 1);
        builder
            .append_colored(change_kind.symbol(), change_kind.color())
            .append(" ")
            .append_line(change_kind.name());
    }
}

fn collect_property_change_kinds(changes: &[PropertyChange], change_kinds: &mut Vec<ChangeKind>) {
    for change in changes {
        change_kinds.push(change.kind.change_kind());
        collect_property_change_kinds(change.children_slice(), change_kinds);
    }
}

fn format_resource_changes_stats(builder: &mut ColorStringBuilder, changes: &[ResourceChange]) {
    builder.append_line("").append("Resource changes: ");

    if changes.is_empty() {
        builder.append("no change.");
        return;
    }

    // ChangeKind::ALL is ordered by weight
    let stats: Vec<String> = ChangeKind::ALL
        .iter()
        .filter_map(|change_kind| {
            let count = changes
                .iter()
                .filter(|change| change.change_kind == *change_kind)
                .count();
            (count > 0).then(|| change_kind.summary_phrase(count))
        })
        .collect();

    builder.append(&stats.join(", ")).append(".");
}

fn format_resource_changes(
    builder: &mut ColorStringBuilder,
    changes: &[ResourceChange],
) -> RenderResult<()> {
    if changes.is_empty() {
        return Ok(());
    }

    let mut keyed = changes
        .iter()
        .map(|change| Ok((change.scope()?.to_uppercase(), change)))
        .collect::<RenderResult<Vec<_>>>()?;
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut groups: Vec<(String, Vec<&ResourceChange>)> = Vec::new();
    for (key, change) in keyed {
        match groups.last_mut() {
            Some((group_key, members)) if *group_key == key => members.push(change),
            _ => groups.push((key, vec![change])),
        }
    }

    debug!(scopes = groups.len(), "Grouped resource changes by scope");

    builder.append_line("");
    builder.append_line(if groups.len() == 1 {
        "The deployment will update the following scope:"
    } else {
        "The deployment will update the following scopes:"
    });

    for (_, members) in groups {
        let Some(&first) = members.first() else {
            continue;
        };
        format_resource_changes_in_scope(builder, first.scope()?, members)?;
    }

    Ok(())
}

fn format_resource_changes_in_scope(
    builder: &mut ColorStringBuilder,
    scope: &str,
    mut members: Vec<&ResourceChange>,
) -> RenderResult<()> {
    builder.append_line("").append_line(&format!("Scope: {}", scope));

    members.sort_by(|a, b| {
        a.change_kind
            .weight()
            .cmp(&b.change_kind.weight())
            .then_with(|| a.resource_id.cmp(&b.resource_id))
    });

    let last_index = members.len().saturating_sub(1);
    let mut index = 0;

    for run in members.chunk_by(|a, b| a.change_kind == b.change_kind) {
        let color = run[0].change_kind.color();
        builder.with_color_scope(color, |builder| -> RenderResult<()> {
            for change in run {
                format_resource_change(builder, change, index == last_index)?;
                index += 1;
            }
            Ok(())
        })?;
    }

    Ok(())
}

fn format_resource_change(
    builder: &mut ColorStringBuilder,
    change: &ResourceChange,
    is_last: bool,
) -> RenderResult<()> {
    let relative_id = change.relative_id()?;
    let api_version = change.api_version();

    builder.append_line("");
    format_path(
        builder,
        relative_id,
        0,
        1,
        |builder| {
            builder.append(change.change_kind.symbol()).append(" ");
        },
        |builder| format_api_version(builder, api_version),
    );

    match change {
        ResourceChange {
            change_kind: ChangeKind::Create,
            after: Some(after),
            ..
        } => format_json_value(builder, after, "", 0, 2),
        ResourceChange {
            change_kind: ChangeKind::Delete,
            before: Some(before),
            ..
        } => format_json_value(builder, before, "", 0, 2),
        ResourceChange {
            delta: Some(delta), ..
        } => {
            builder.with_color_scope(Color::Reset, |builder| {
                builder.append_line("");
                format_property_changes(builder, &sort_property_changes(delta), 2)
            })?;
        }
        _ if is_last => {
            builder.append_line("");
        }
        _ => {}
    }

    Ok(())
}

fn format_api_version(builder: &mut ColorStringBuilder, api_version: Option<&str>) {
    let Some(api_version) = api_version.filter(|v| !v.is_empty()) else {
        return;
    };

    builder.with_color_scope(Color::Reset, |builder| {
        builder.append(" [").append(api_version).append("]");
    });
}

/// Order siblings by severity, then by path
fn sort_property_changes(changes: &[PropertyChange]) -> Vec<&PropertyChange> {
    let mut sorted: Vec<&PropertyChange> = changes.iter().collect();
    sorted.sort_by(|a, b| {
        a.kind
            .weight()
            .cmp(&b.kind.weight())
            .then_with(|| compare_paths(a.path_str(), b.path_str()))
    });
    sorted
}

/// Case-insensitive path order; paths equal but for case put lowercase first
fn compare_paths(a: &str, b: &str) -> Ordering {
    let folded = |path: &str| path.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    folded(a).cmp(&folded(b)).then_with(|| b.cmp(a))
}

fn format_property_changes(
    builder: &mut ColorStringBuilder,
    changes: &[&PropertyChange],
    indent_level: usize,
) -> RenderResult<()> {
    let max_path_length = max_path_length_from_property_changes(changes);

    for change in changes {
        format_property_change(builder, change, max_path_length, indent_level)?;
        builder.append_line("");
    }

    Ok(())
}

fn format_property_change(
    builder: &mut ColorStringBuilder,
    change: &PropertyChange,
    max_path_length: usize,
    indent_level: usize,
) -> RenderResult<()> {
    let before = change.before.as_ref().map(repair);
    let after = change.after.as_ref().map(repair);
    let before = before.as_deref();
    let after = after.as_deref();

    match change.kind {
        PropertyChangeKind::Create => {
            let after = required_value(change, after, "after")?;
            let padding = padding_width(change, Some(after), max_path_length);
            format_property_change_path(builder, change, padding, indent_level);
            format_property_create(builder, after, indent_level + 1);
        }
        PropertyChangeKind::Delete => {
            let before = required_value(change, before, "before")?;
            let padding = padding_width(change, Some(before), max_path_length);
            format_property_change_path(builder, change, padding, indent_level);
            format_property_delete(builder, before, indent_level + 1);
        }
        PropertyChangeKind::Modify => {
            let padding = padding_width(change, before, max_path_length);
            format_property_change_path(builder, change, padding, indent_level);
            format_property_modify(builder, change, before, after, indent_level + 1)?;
        }
        PropertyChangeKind::ArrayChange => {
            let padding = if change.children_slice().is_empty() {
                aligned_padding(change.path_str(), max_path_length)
            } else {
                1
            };
            format_property_change_path(builder, change, padding, indent_level);
            format_property_array_change(builder, change, indent_level + 1)?;
        }
        PropertyChangeKind::NoEffect => {
            let after = required_value(change, after, "after")?;
            let padding = padding_width(change, Some(after), max_path_length);
            format_property_change_path(builder, change, padding, indent_level);
            format_property_no_effect(builder, after, indent_level + 1);
        }
    }

    Ok(())
}

fn required_value<'a>(
    change: &PropertyChange,
    value: Option<&'a Value>,
    field: &str,
) -> RenderResult<&'a Value> {
    value.ok_or_else(|| {
        RenderError::InvalidValue(format!(
            "{} change at '{}' has no {} value",
            change.kind,
            change.path_str(),
            field
        ))
    })
}

fn aligned_padding(path: &str, max_path_length: usize) -> usize {
    (max_path_length + 1).saturating_sub(path_length(path))
}

/// Spaces between a property path and its value
///
/// Multi-line values start right after the path (arrays after one space);
/// only single-line values are pushed into the alignment column.
fn padding_width(change: &PropertyChange, value: Option<&Value>, max_path_length: usize) -> usize {
    match value {
        Some(value) if is_non_empty_array(value) => 1,
        Some(value) if is_non_empty_container(value) => 0,
        _ if change.kind == PropertyChangeKind::Modify && change.children.is_some() => 0,
        _ => aligned_padding(change.path_str(), max_path_length),
    }
}

fn format_property_change_path(
    builder: &mut ColorStringBuilder,
    change: &PropertyChange,
    padding_width: usize,
    indent_level: usize,
) {
    format_path(
        builder,
        change.path_str(),
        padding_width,
        indent_level,
        |builder| format_property_change_type(builder, change.kind),
        format_colon,
    );
}

fn format_property_change_type(builder: &mut ColorStringBuilder, kind: PropertyChangeKind) {
    builder.append_colored(kind.symbol(), kind.color()).append(" ");
}

fn format_property_create(builder: &mut ColorStringBuilder, value: &Value, indent_level: usize) {
    builder.with_color_scope(PropertyChangeKind::Create.color(), |builder| {
        format_json_value(builder, value, "", 0, indent_level);
    });
}

fn format_property_delete(builder: &mut ColorStringBuilder, value: &Value, indent_level: usize) {
    builder.with_color_scope(PropertyChangeKind::Delete.color(), |builder| {
        format_json_value(builder, value, "", 0, indent_level);
    });
}

fn format_property_no_effect(builder: &mut ColorStringBuilder, value: &Value, indent_level: usize) {
    builder.with_color_scope(PropertyChangeKind::NoEffect.color(), |builder| {
        format_json_value(builder, value, "", 0, indent_level);
    });
}

fn format_property_modify(
    builder: &mut ColorStringBuilder,
    change: &PropertyChange,
    before: Option<&Value>,
    after: Option<&Value>,
    indent_level: usize,
) -> RenderResult<()> {
    let children = change.children_slice();

    if !children.is_empty() {
        builder.append_line("").append_line("");
        return format_property_changes(builder, &sort_property_changes(children), indent_level);
    }

    let before = required_value(change, before, "before")?;
    let after = required_value(change, after, "after")?;

    format_property_delete(builder, before, indent_level);

    if is_non_empty_container(before) {
        builder.append_line("");
        format_indent(builder, indent_level);
    } else {
        builder.append(" ");
    }

    builder.append("=>");

    if !is_non_empty_container(after) {
        builder.append(" ");
    }

    format_property_create(builder, after, indent_level);

    if !is_leaf(before) && is_leaf(after) {
        builder.append_line("");
    }

    Ok(())
}

fn format_property_array_change(
    builder: &mut ColorStringBuilder,
    change: &PropertyChange,
    indent_level: usize,
) -> RenderResult<()> {
    let mut indent_level = indent_level;

    if change.path_str().is_empty() {
        // An array nested directly in an array element has no path of its
        // own and opens on the parent's line level.
        indent_level = indent_level.saturating_sub(1);
        format_indent(builder, indent_level);
    }

    let children = change.children_slice();
    if children.is_empty() {
        builder.append_line("[]");
        return Ok(());
    }

    builder.append("[").append_line("");

    format_property_changes(builder, &sort_property_changes(children), indent_level)?;

    format_indent(builder, indent_level);
    builder.append("]");

    Ok(())
}

fn max_path_length_from_property_changes(changes: &[&PropertyChange]) -> usize {
    changes
        .iter()
        .filter(|change| counts_toward_alignment(change))
        .map(|change| path_length(change.path_str()))
        .max()
        .unwrap_or(0)
}

/// Whether a sibling's path takes part in the shared alignment column
///
/// Values printed as blocks would only stretch the column, so creations and
/// deletions count only when their payload is a leaf (an absent payload, as on
/// a modification with children, counts as one). Other kinds count only when
/// they carry no nested changes.
fn counts_toward_alignment(change: &PropertyChange) -> bool {
    let is_leaf_or_absent =
        |value: &Option<Value>| value.as_ref().is_none_or(|value| is_leaf(&repair(value)));

    match change.kind {
        PropertyChangeKind::Create => is_leaf_or_absent(&change.after),
        PropertyChangeKind::Delete | PropertyChangeKind::Modify => {
            is_leaf_or_absent(&change.before)
        }
        PropertyChangeKind::ArrayChange | PropertyChangeKind::NoEffect => change.children.is_none(),
    }
}
