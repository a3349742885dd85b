//! docweave CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docweave:
//! - Resolve: run the style cascade and print the document tree as JSON
//! - Render: resolve, number lists and write HTML or plain text
//! - Styles: list styles with their basedOn chains folded in
//!
//! # Library Usage
//!
//! ```no_run
//! use std::path::Path;
//! use docweave_cli::{load_package, render_package, Settings};
//!
//! let input = Path::new("report.docx");
//! let package = load_package(input)?;
//! let rendered = render_package(&package, &Settings::default(), input)?;
//! println!("{}", rendered.output);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Resolved document tree as JSON
//! docweave resolve report.docx --output report.json
//!
//! # Plain-text rendering with list markers
//! docweave render report.docx --format text
//!
//! # Styles with inherited properties
//! docweave styles report.docx --format json
//! ```

pub mod app;
pub mod config;

// Re-export main entry point and types
pub use app::{
    load_package, render_command, render_package, resolve_command, resolve_package,
    styles_command, styles_report,
};
pub use app::{run_cli, ListFormat, ResolveReport};
pub use config::{DefaultsSettings, RenderSettings, Settings, CONFIG_FILE_NAME};
