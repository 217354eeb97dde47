//! Render deployment what-if previews as aligned, colorized text reports

pub mod commands;
pub mod context;
pub mod diff;
pub mod error;
pub mod output;
pub mod traits;
