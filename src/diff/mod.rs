//! What-if diff visualization module
//!
//! This module provides parsing and rendering capabilities for what-if
//! previews of a deployment, displaying resource and property changes in an
//! aligned, color-coded text report.
//!
//! # Features
//!
//! - **Parsing**: Read preview documents (bare change lists, result objects or REST envelopes)
//! - **Rendering**: Legend, per-scope resource changes, nested property deltas and a tally
//! - **Repair**: Character-map encoded strings are joined back before they are printed
//! - **JSON**: Standalone pretty printing of arbitrary values with aligned paths
//!
//! # Example
//!
//! ```ignore
//! use whatif_report::diff::{DiffRenderer, PreviewParser, WhatIfRenderer};
//! use whatif_report::output::color::ColorMode;
//!
//! let result = PreviewParser::new().parse(&preview_json)?;
//!
//! let renderer = WhatIfRenderer::new(ColorMode::Ansii);
//! let report = renderer.render(&result.changes)?;
//!
//! println!("{}", report);
//! ```

mod json;
mod parser;
mod renderer;
mod repair;
mod types;

pub use json::{format_json, is_leaf, is_non_empty_array, is_non_empty_container};
pub use parser::PreviewParser;
pub use renderer::{DiffRenderer, WhatIfRenderer, format_what_if_result};
pub use repair::repair;
pub use types::{
    ChangeKind, Diagnostic, PreviewResult, PropertyChange, PropertyChangeKind, ResourceChange,
    split_resource_id,
};
