//! # docweave-render
//!
//! Renderers for resolved docweave documents.
//!
//! A renderer walks a document whose properties have already been resolved
//! by the cascade and numbers list paragraphs as it goes. Every render call
//! owns a fresh [`NumberingContext`](docweave_core::NumberingContext), so
//! rendering the same document twice yields identical output.
//!
//! ## Example
//!
//! ```
//! use docweave_ast::{Document, NumFormat, NumberingLevel, NumberingTable, Paragraph, Run};
//! use docweave_render::{Renderer, TextRenderer};
//!
//! let numbering = NumberingTable::new()
//!     .with_list("1", vec![NumberingLevel::new(0, NumFormat::Decimal, "%1.")]);
//! let doc = Document::new()
//!     .with_paragraph(Paragraph::new().numbered("1", 0).with_run(Run::from_text("first")))
//!     .with_paragraph(Paragraph::new().numbered("1", 0).with_run(Run::from_text("second")));
//!
//! let text = TextRenderer.render(&doc, &numbering)?;
//! assert_eq!(text, "1. first\n2. second\n");
//! # Ok::<(), docweave_render::RenderError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use docweave_ast::{Document, NumberingTable};
use docweave_core::Diagnostic;
use serde::{Deserialize, Serialize};

pub mod css;
pub mod error;
pub mod html;
pub mod text;

pub use error::{RenderError, Result};
pub use html::{HtmlConfig, HtmlRenderer};
pub use text::TextRenderer;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output of a render pass
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Rendered text
    pub output: String,
    /// Numbering problems met while rendering
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns a resolved document into output text
pub trait Renderer {
    /// Render and keep the numbering diagnostics
    fn render_with_diagnostics(
        &self,
        document: &Document,
        numbering: &NumberingTable,
    ) -> Result<Rendered>;

    /// Render, dropping diagnostics
    fn render(&self, document: &Document, numbering: &NumberingTable) -> Result<String> {
        Ok(self.render_with_diagnostics(document, numbering)?.output)
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// HTML fragment or page
    #[default]
    Html,
    /// Plain text
    Text,
}

impl OutputFormat {
    /// Usual file extension
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Text => "txt",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(OutputFormat::Html),
            "text" | "txt" | "plain" => Ok(OutputFormat::Text),
            _ => Err(RenderError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// Render with the given format and HTML settings
pub fn render(
    document: &Document,
    numbering: &NumberingTable,
    format: OutputFormat,
    html: &HtmlConfig,
) -> Result<Rendered> {
    match format {
        OutputFormat::Html => HtmlRenderer::with_config(html.clone())
            .render_with_diagnostics(document, numbering),
        OutputFormat::Text => TextRenderer.render_with_diagnostics(document, numbering),
    }
}
