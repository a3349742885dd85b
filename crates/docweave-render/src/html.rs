//! HTML renderer
//!
//! Resolved properties become inline CSS. Style ids become class names
//! under a configurable prefix so a stylesheet can still target them.
//! List markers use the rich-text hints from the numbering engine: the
//! marker span gets the estimated width and the padding that lines the
//! paragraph text up with the level's tab stop.

use std::fmt::Write;

use docweave_ast::{Block, Document, NumberingTable, Paragraph, Run, RunToken, Table};
use docweave_core::{NumberingContext, NumberingMarker, RenderMode};
use serde::{Deserialize, Serialize};

use crate::css::{escape_html, paragraph_css, pt, run_css};
use crate::error::Result;
use crate::{Rendered, Renderer};

/// Default class name prefix
pub const DEFAULT_CLASS_PREFIX: &str = "dw-";

/// Base rules emitted in standalone pages
const BASE_CSS: &str = "p{margin:0}\
.dw-marker{display:inline-block;white-space:pre}\
.dw-tab{display:inline-block;min-width:36pt;white-space:pre}\
table{border-collapse:collapse}\
td,th{border:1px solid #999;padding:2pt 4pt;vertical-align:top}";

/// HTML renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Prefix for generated class names
    pub class_prefix: String,
    /// Wrap the fragment in a complete HTML page
    pub standalone: bool,
    /// Page title for standalone output
    pub title: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            class_prefix: DEFAULT_CLASS_PREFIX.to_string(),
            standalone: false,
            title: "Document".to_string(),
        }
    }
}

/// HTML renderer
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    config: HtmlConfig,
}

impl HtmlRenderer {
    /// Create a renderer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with custom configuration
    pub fn with_config(config: HtmlConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &HtmlConfig {
        &self.config
    }
}

impl Renderer for HtmlRenderer {
    fn render_with_diagnostics(
        &self,
        document: &Document,
        numbering: &NumberingTable,
    ) -> Result<Rendered> {
        let mut writer = HtmlWriter {
            config: &self.config,
            numbering,
            ctx: NumberingContext::new(),
            output: String::new(),
        };

        if self.config.standalone {
            writer.page_start()?;
        }
        writer.blocks(&document.blocks)?;
        if self.config.standalone {
            writer.output.push_str("</body>\n</html>\n");
        }

        let diagnostics = writer.ctx.take_diagnostics();
        log::debug!(
            "Rendered {} blocks as HTML ({} numbering diagnostics)",
            document.blocks.len(),
            diagnostics.len()
        );
        Ok(Rendered {
            output: writer.output,
            diagnostics,
        })
    }
}

struct HtmlWriter<'a> {
    config: &'a HtmlConfig,
    numbering: &'a NumberingTable,
    ctx: NumberingContext,
    output: String,
}

impl HtmlWriter<'_> {
    fn page_start(&mut self) -> Result<()> {
        writeln!(self.output, "<!DOCTYPE html>")?;
        writeln!(self.output, "<html>")?;
        writeln!(self.output, "<head>")?;
        writeln!(self.output, "<meta charset=\"utf-8\">")?;
        writeln!(self.output, "<title>{}</title>", escape_html(&self.config.title))?;
        let base = BASE_CSS.replace(".dw-", &format!(".{}", self.config.class_prefix));
        writeln!(self.output, "<style>{}</style>", base)?;
        writeln!(self.output, "</head>")?;
        writeln!(self.output, "<body>")?;
        Ok(())
    }

    fn class(&self, name: &str) -> String {
        let name: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", self.config.class_prefix, name)
    }

    fn blocks(&mut self, blocks: &[Block]) -> Result<()> {
        for block in blocks {
            match block {
                Block::Paragraph(p) => self.paragraph(p)?,
                Block::Table(t) => self.table(t)?,
            }
        }
        Ok(())
    }

    fn paragraph(&mut self, paragraph: &Paragraph) -> Result<()> {
        self.output.push_str("<p");
        if let Some(style_id) = &paragraph.style_id {
            let class = self.class(style_id);
            write!(self.output, " class=\"{}\"", escape_html(&class))?;
        }
        let css = paragraph_css(&paragraph.properties);
        if !css.is_empty() {
            write!(self.output, " style=\"{}\"", escape_html(&css.to_style()))?;
        }
        self.output.push('>');

        if let Some(numbering) = &paragraph.numbering {
            let marker = self
                .ctx
                .format(numbering, self.numbering, RenderMode::RichText);
            self.marker(&marker)?;
        }
        for run in &paragraph.runs {
            self.run(run)?;
        }
        writeln!(self.output, "</p>")?;
        Ok(())
    }

    fn marker(&mut self, marker: &NumberingMarker) -> Result<()> {
        let class = self.class("marker");
        let Some(hints) = &marker.style_hints else {
            write!(
                self.output,
                "<span class=\"{}\">{}</span> ",
                class,
                escape_html(&marker.marker)
            )?;
            return Ok(());
        };

        let mut style = format!(
            "min-width:{};padding-right:{};text-align:{}",
            pt(hints.marker_width_pt),
            pt(hints.padding_pt),
            hints.justification.as_str()
        );
        if let Some(font) = &hints.font_family {
            write!(style, ";font-family:'{}'", font.replace('\'', ""))?;
        }
        write!(
            self.output,
            "<span class=\"{}\" style=\"{}\">{}</span>",
            class,
            escape_html(&style),
            escape_html(&marker.marker)
        )?;
        Ok(())
    }

    fn run(&mut self, run: &Run) -> Result<()> {
        let style = run
            .properties
            .as_ref()
            .map(run_css)
            .filter(|css| !css.is_empty())
            .map(|css| css.to_style());
        let class = run.style_id.as_deref().map(|id| self.class(id));
        let wrapped = style.is_some() || class.is_some();

        if wrapped {
            self.output.push_str("<span");
            if let Some(class) = &class {
                write!(self.output, " class=\"{}\"", escape_html(class))?;
            }
            if let Some(style) = &style {
                write!(self.output, " style=\"{}\"", escape_html(style))?;
            }
            self.output.push('>');
        }
        for token in &run.tokens {
            match token {
                RunToken::Text(text) => self.output.push_str(&escape_html(text)),
                RunToken::Tab => {
                    let class = self.class("tab");
                    write!(self.output, "<span class=\"{}\">\t</span>", class)?;
                }
            }
        }
        if wrapped {
            self.output.push_str("</span>");
        }
        Ok(())
    }

    fn table(&mut self, table: &Table) -> Result<()> {
        let mut classes = self.class("table");
        if let Some(style_id) = &table.style_id {
            classes.push(' ');
            classes.push_str(&self.class(style_id));
        }
        writeln!(self.output, "<table class=\"{}\">", escape_html(&classes))?;
        for row in &table.rows {
            self.output.push_str("<tr>");
            let tag = if row.is_header { "th" } else { "td" };
            for cell in &row.cells {
                writeln!(self.output, "<{}>", tag)?;
                self.blocks(&cell.blocks)?;
                write!(self.output, "</{}>", tag)?;
            }
            writeln!(self.output, "</tr>")?;
        }
        writeln!(self.output, "</table>")?;
        Ok(())
    }
}
