//! Pretty printer for JSON values
//!
//! Objects are flattened into dotted paths whose values line up in a single
//! column, arrays are printed as indexed blocks, and leaves are printed as
//! JSON-like literals. Every value passes through [`repair`] before it is
//! inspected or printed.

use std::borrow::Cow;

use serde_json::Value;

use super::repair::repair;
use crate::output::color::{Color, ColorMode, ColorStringBuilder};

/// Whether `value` prints on a single line: a scalar, `[]` or `{}`
pub fn is_leaf(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => true,
    }
}

pub fn is_non_empty_array(value: &Value) -> bool {
    matches!(value, Value::Array(items) if !items.is_empty())
}

/// Whether `value` is a non-empty array or object
pub fn is_non_empty_container(value: &Value) -> bool {
    !is_leaf(value)
}

/// Render a standalone JSON value
pub fn format_json(value: &Value, mode: ColorMode) -> String {
    let mut builder = ColorStringBuilder::new(mode);
    format_json_value(&mut builder, value, "", 0, 0);
    builder.build()
}

/// Length of a path as it occupies the alignment column
pub(crate) fn path_length(path: &str) -> usize {
    path.chars().count()
}

pub(crate) fn format_json_value(
    builder: &mut ColorStringBuilder,
    value: &Value,
    path: &str,
    max_path_length: usize,
    indent_level: usize,
) {
    let value = repair(value);

    match value.as_ref() {
        Value::Array(items) if !items.is_empty() => {
            format_json_path(builder, path, 1, indent_level);
            format_non_empty_array(builder, items, indent_level);
        }
        Value::Object(map) if !map.is_empty() => {
            format_non_empty_object(builder, &value, path, max_path_length, indent_level);
        }
        leaf => {
            let padding_width = (max_path_length + 1).saturating_sub(path_length(path));
            format_json_path(builder, path, padding_width, indent_level);
            format_leaf(builder, leaf);
        }
    }
}

fn format_leaf(builder: &mut ColorStringBuilder, value: &Value) {
    match value {
        Value::Null => builder.append("null"),
        Value::Bool(flag) => builder.append(if *flag { "true" } else { "false" }),
        Value::Number(number) => builder.append(&number.to_string()),
        Value::String(text) => builder.append("\"").append(text).append("\""),
        Value::Array(_) => builder.append("[]"),
        Value::Object(_) => builder.append("{}"),
    };
}

fn format_non_empty_array(builder: &mut ColorStringBuilder, items: &[Value], indent_level: usize) {
    builder.append_colored("[", Color::Reset).append_line("");

    let max_path_length = max_path_length_from_array(items);

    for (index, child) in items.iter().enumerate() {
        let child = repair(child);
        let child_path = index.to_string();

        if is_non_empty_container(&child) {
            format_json_path(builder, &child_path, 0, indent_level + 1);
            format_non_empty_object(builder, &child, "", 0, indent_level + 1);
        } else {
            format_json_value(
                builder,
                &child,
                &child_path,
                max_path_length,
                indent_level + 1,
            );
        }

        builder.append_line("");
    }

    format_indent(builder, indent_level);
    builder.append_colored("]", Color::Reset);
}

/// Render the members of a container as dotted paths
///
/// An empty `path` starts a new block: two line breaks, a fresh alignment
/// column and one more level of indentation. Arrays reaching this point (an
/// array directly inside an array) are keyed by element index.
fn format_non_empty_object(
    builder: &mut ColorStringBuilder,
    value: &Value,
    path: &str,
    max_path_length: usize,
    indent_level: usize,
) {
    let is_root = path.is_empty();

    let (max_path_length, indent_level) = if is_root {
        builder.append_line("").append_line("");
        (max_path_length_from_object(value), indent_level + 1)
    } else {
        (max_path_length, indent_level)
    };

    for (key, child) in entries(value) {
        let child = repair(child);
        let child_path = if is_root {
            key.into_owned()
        } else {
            format!("{}.{}", path, key)
        };

        format_json_value(builder, &child, &child_path, max_path_length, indent_level);

        if !is_non_empty_container(&child) {
            builder.append_line("");
        }
    }
}

fn entries(value: &Value) -> Vec<(Cow<'_, str>, &Value)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| (Cow::Borrowed(key.as_str()), child))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, child)| (Cow::Owned(index.to_string()), child))
            .collect(),
        _ => Vec::new(),
    }
}

/// Widest index among leaf elements; block elements do not share the column
fn max_path_length_from_array(items: &[Value]) -> usize {
    let last_leaf_index = items
        .iter()
        .rposition(|item| is_leaf(&repair(item)))
        .unwrap_or(0);

    last_leaf_index.to_string().len()
}

/// Longest flattened path below `value`, ignoring paths that end in arrays
fn max_path_length_from_object(value: &Value) -> usize {
    entries(value)
        .into_iter()
        .filter_map(|(key, child)| {
            let child = repair(child);

            if is_non_empty_array(&child) {
                return None;
            }

            let key_length = path_length(&key);
            if is_non_empty_container(&child) {
                Some(key_length + 1 + max_path_length_from_object(&child))
            } else {
                Some(key_length)
            }
        })
        .max()
        .unwrap_or(0)
}

fn format_json_path(
    builder: &mut ColorStringBuilder,
    path: &str,
    padding_width: usize,
    indent_level: usize,
) {
    format_path(builder, path, padding_width, indent_level, |_| {}, format_colon);
}

/// Write an indented path line head: `<indent><head><path><tail><padding>`
///
/// Nothing at all is written for an empty path.
pub(crate) fn format_path(
    builder: &mut ColorStringBuilder,
    path: &str,
    padding_width: usize,
    indent_level: usize,
    format_head: impl FnOnce(&mut ColorStringBuilder),
    format_tail: impl FnOnce(&mut ColorStringBuilder),
) {
    if path.is_empty() {
        return;
    }

    format_indent(builder, indent_level);
    format_head(builder);
    builder.append(path);
    format_tail(builder);
    builder.append(&" ".repeat(padding_width));
}

pub(crate) fn format_colon(builder: &mut ColorStringBuilder) {
    builder.append_colored(":", Color::Reset);
}

pub(crate) fn format_indent(builder: &mut ColorStringBuilder, indent_level: usize) {
    builder.append(&"  ".repeat(indent_level));
}
