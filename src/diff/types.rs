//! Data types for what-if preview rendering
//!
//! This module defines the change set handed to the renderer (resource
//! changes with nested property deltas) together with the classification
//! tables mapping every change kind to its symbol, color and sort weight.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{RenderError, RenderResult};
use crate::output::color::Color;

/// Resource-level change kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ChangeKind {
    /// Resource will be created
    Create,
    /// Resource will be deleted
    Delete,
    /// Resource will be modified in place
    Modify,
    /// Resource will be redeployed without property changes
    Deploy,
    /// Resource exists and will not change
    NoChange,
    /// Resource is outside the deployment and left alone
    Ignore,
    /// Resource type does not support what-if
    Unsupported,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 7] = [
        ChangeKind::Delete,
        ChangeKind::Create,
        ChangeKind::Deploy,
        ChangeKind::Modify,
        ChangeKind::NoChange,
        ChangeKind::Unsupported,
        ChangeKind::Ignore,
    ];

    /// Get the symbol used to represent this change kind
    pub fn symbol(&self) -> &'static str {
        match self {
            ChangeKind::Create => "+",
            ChangeKind::Delete => "-",
            ChangeKind::Modify => "~",
            ChangeKind::Deploy => "!",
            ChangeKind::NoChange => "=",
            ChangeKind::Ignore => "*",
            ChangeKind::Unsupported => "x",
        }
    }

    /// Get the color for this change kind
    pub fn color(&self) -> Color {
        match self {
            ChangeKind::Create => Color::Green,
            ChangeKind::Delete => Color::Red,
            ChangeKind::Modify => Color::Magenta,
            ChangeKind::Deploy => Color::Blue,
            ChangeKind::NoChange => Color::Reset,
            ChangeKind::Ignore => Color::White,
            ChangeKind::Unsupported => Color::White,
        }
    }

    /// Sort weight, most severe first
    pub fn weight(&self) -> u8 {
        match self {
            ChangeKind::Delete => 0,
            ChangeKind::Create => 1,
            ChangeKind::Deploy => 2,
            ChangeKind::Modify => 3,
            ChangeKind::NoChange => 4,
            ChangeKind::Unsupported => 5,
            ChangeKind::Ignore => 6,
        }
    }

    /// Name as it appears on the wire and in the legend
    pub fn name(&self) -> &'static str {
        match self {
            ChangeKind::Create => "Create",
            ChangeKind::Delete => "Delete",
            ChangeKind::Modify => "Modify",
            ChangeKind::Deploy => "Deploy",
            ChangeKind::NoChange => "NoChange",
            ChangeKind::Ignore => "Ignore",
            ChangeKind::Unsupported => "Unsupported",
        }
    }

    /// Summary phrase for `count` resources of this kind
    pub fn summary_phrase(&self, count: usize) -> String {
        match self {
            ChangeKind::Create => format!("{} to create", count),
            ChangeKind::Delete => format!("{} to delete", count),
            ChangeKind::Deploy => format!("{} to deploy", count),
            ChangeKind::Modify => format!("{} to modify", count),
            ChangeKind::Ignore => format!("{} to ignore", count),
            ChangeKind::NoChange => format!("{} no change", count),
            ChangeKind::Unsupported => format!("{} unsupported", count),
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChangeKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChangeKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RenderError::UnknownChangeKind(s.to_string()))
    }
}

impl TryFrom<String> for ChangeKind {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Property-level change kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum PropertyChangeKind {
    /// Property will be added
    Create,
    /// Property will be removed
    Delete,
    /// Property value will be modified
    Modify,
    /// Array property with element-level changes
    #[serde(rename = "Array")]
    ArrayChange,
    /// Property differs but the change has no effect
    NoEffect,
}

impl PropertyChangeKind {
    pub const ALL: [PropertyChangeKind; 5] = [
        PropertyChangeKind::Delete,
        PropertyChangeKind::Create,
        PropertyChangeKind::Modify,
        PropertyChangeKind::ArrayChange,
        PropertyChangeKind::NoEffect,
    ];

    /// Get the symbol for this property change kind
    pub fn symbol(&self) -> &'static str {
        match self {
            PropertyChangeKind::Create => "+",
            PropertyChangeKind::Delete => "-",
            PropertyChangeKind::Modify => "~",
            PropertyChangeKind::ArrayChange => "~",
            PropertyChangeKind::NoEffect => "x",
        }
    }

    /// Get the color for this property change kind
    pub fn color(&self) -> Color {
        match self {
            PropertyChangeKind::Create => Color::Green,
            PropertyChangeKind::Delete => Color::Red,
            PropertyChangeKind::Modify => Color::Magenta,
            PropertyChangeKind::ArrayChange => Color::Magenta,
            PropertyChangeKind::NoEffect => Color::White,
        }
    }

    pub fn weight(&self) -> u8 {
        match self {
            PropertyChangeKind::Delete => 0,
            PropertyChangeKind::Create => 1,
            PropertyChangeKind::Modify => 2,
            PropertyChangeKind::ArrayChange => 2,
            PropertyChangeKind::NoEffect => 3,
        }
    }

    /// Resource-level kind this property kind is reported as in the legend
    pub fn change_kind(&self) -> ChangeKind {
        match self {
            PropertyChangeKind::Create => ChangeKind::Create,
            PropertyChangeKind::Delete => ChangeKind::Delete,
            PropertyChangeKind::Modify => ChangeKind::Modify,
            PropertyChangeKind::ArrayChange => ChangeKind::Modify,
            PropertyChangeKind::NoEffect => ChangeKind::NoChange,
        }
    }

    /// Name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            PropertyChangeKind::Create => "Create",
            PropertyChangeKind::Delete => "Delete",
            PropertyChangeKind::Modify => "Modify",
            PropertyChangeKind::ArrayChange => "Array",
            PropertyChangeKind::NoEffect => "NoEffect",
        }
    }
}

impl fmt::Display for PropertyChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropertyChangeKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyChangeKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RenderError::UnknownPropertyChangeKind(s.to_string()))
    }
}

impl TryFrom<String> for PropertyChangeKind {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Keeps an explicit JSON `null` as `Some(Value::Null)`; only a missing field is `None`
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A nested property change within a resource change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyChange {
    /// Property path (e.g., "properties.sku.name"); absent on array-in-array wrappers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Type of change for this property
    #[serde(rename = "propertyChangeType")]
    pub kind: PropertyChangeKind,

    /// Value before the change
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub before: Option<Value>,

    /// Value after the change
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub after: Option<Value>,

    /// Nested changes (object members or array elements)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PropertyChange>>,
}

impl PropertyChange {
    /// Create a new property change at `path`
    pub fn new(path: &str, kind: PropertyChangeKind) -> Self {
        Self {
            path: Some(path.to_string()),
            kind,
            before: None,
            after: None,
            children: None,
        }
    }

    /// Create a property change without a path (array nested in an array element)
    pub fn pathless(kind: PropertyChangeKind) -> Self {
        Self {
            path: None,
            kind,
            before: None,
            after: None,
            children: None,
        }
    }

    /// Set the before value
    pub fn with_before(mut self, value: Value) -> Self {
        self.before = Some(value);
        self
    }

    /// Set the after value
    pub fn with_after(mut self, value: Value) -> Self {
        self.after = Some(value);
        self
    }

    /// Set nested changes
    pub fn with_children(mut self, children: Vec<PropertyChange>) -> Self {
        self.children = Some(children);
        self
    }

    /// Path, or an empty string when absent
    pub fn path_str(&self) -> &str {
        self.path.as_deref().unwrap_or("")
    }

    /// Nested changes, or an empty slice when absent
    pub fn children_slice(&self) -> &[PropertyChange] {
        self.children.as_deref().unwrap_or(&[])
    }
}

const PROVIDERS_SEGMENT: &str = "/providers/";

lazy_static! {
    static ref RESOURCE_GROUP_ID: Regex =
        Regex::new(r"(?i)^(/subscriptions/[^/]+)/(resourceGroups/[^/]+)$")
            .expect("Invalid resource group id regex");
}

/// Split a resource id into its scope and the id relative to that scope
///
/// `/subscriptions/s/resourceGroups/rg/providers/Microsoft.Web/sites/app`
/// splits at the last provider segment into
/// (`/subscriptions/s/resourceGroups/rg`, `Microsoft.Web/sites/app`). A bare
/// resource group id splits into its subscription and `resourceGroups/<name>`.
/// Anything else lives in the `/` scope.
pub fn split_resource_id(resource_id: &str) -> (&str, &str) {
    if let Some(index) = resource_id.rfind(PROVIDERS_SEGMENT) {
        return (
            &resource_id[..index],
            &resource_id[index + PROVIDERS_SEGMENT.len()..],
        );
    }

    if let Some(captures) = RESOURCE_GROUP_ID.captures(resource_id) {
        if let (Some(scope), Some(relative)) = (captures.get(1), captures.get(2)) {
            return (scope.as_str(), relative.as_str());
        }
    }

    let mut chars = resource_id.chars();
    chars.next();
    ("/", chars.as_str())
}

/// A resource change in the preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceChange {
    /// Fully qualified resource id; absent for extensible resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    /// Type of change for this resource
    #[serde(rename = "changeType")]
    pub change_kind: ChangeKind,

    /// Full resource snapshot before the change; a JSON `null` counts as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    /// Full resource snapshot after the change; a JSON `null` counts as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// Property-level changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Vec<PropertyChange>>,
}

impl ResourceChange {
    /// Create a new resource change
    pub fn new(resource_id: &str, change_kind: ChangeKind) -> Self {
        Self {
            resource_id: Some(resource_id.to_string()),
            change_kind,
            before: None,
            after: None,
            delta: None,
        }
    }

    /// Set the before snapshot
    pub fn with_before(mut self, value: Value) -> Self {
        self.before = Some(value).filter(|value| !value.is_null());
        self
    }

    /// Set the after snapshot
    pub fn with_after(mut self, value: Value) -> Self {
        self.after = Some(value).filter(|value| !value.is_null());
        self
    }

    /// Set the property delta
    pub fn with_delta(mut self, delta: Vec<PropertyChange>) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Scope and relative id of this resource
    pub fn split_id(&self) -> RenderResult<(&str, &str)> {
        self.resource_id
            .as_deref()
            .map(split_resource_id)
            .ok_or(RenderError::UnsupportedResource)
    }

    /// Scope the resource is grouped under, in its original casing
    pub fn scope(&self) -> RenderResult<&str> {
        self.split_id().map(|(scope, _)| scope)
    }

    /// Resource id relative to its scope
    pub fn relative_id(&self) -> RenderResult<&str> {
        self.split_id().map(|(_, relative)| relative)
    }

    /// API version taken from the before snapshot, or the after snapshot when there is none
    pub fn api_version(&self) -> Option<&str> {
        let snapshot = self.before.as_ref().or(self.after.as_ref())?;
        snapshot.get("apiVersion").and_then(Value::as_str)
    }
}

/// A diagnostic returned alongside the preview
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Preview result ready for rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewResult {
    /// Operation status reported by the preview service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Resource changes in the preview
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub changes: Vec<ResourceChange>,

    /// Diagnostics accompanying the preview
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub diagnostics: Vec<Diagnostic>,
}

impl PreviewResult {
    /// Create a preview result from resource changes
    pub fn new(changes: Vec<ResourceChange>) -> Self {
        Self {
            status: None,
            changes,
            diagnostics: Vec::new(),
        }
    }

    /// Drop resource changes whose kind is in `kinds`
    pub fn exclude_change_kinds(mut self, kinds: &[ChangeKind]) -> Self {
        self.changes
            .retain(|change| !kinds.contains(&change.change_kind));
        self
    }
}
