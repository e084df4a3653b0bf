//! Markdown and JSON rendering of dashboard views.

mod generator;

pub use generator::{generate_json_report, generate_markdown_report};
