//! Plain-text renderer
//!
//! One line per paragraph, list markers followed by a space, tabs kept as
//! `\t`. Table rows become a single line with cells separated by ` | `.

use std::fmt::Write;

use docweave_ast::{Block, Document, NumberingTable, Paragraph, Table};
use docweave_core::{NumberingContext, RenderMode};

use crate::error::Result;
use crate::{Rendered, Renderer};

/// Cell separator inside a table row
pub const CELL_SEPARATOR: &str = " | ";

/// Plain-text renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render_with_diagnostics(
        &self,
        document: &Document,
        numbering: &NumberingTable,
    ) -> Result<Rendered> {
        let mut writer = TextWriter {
            numbering,
            ctx: NumberingContext::new(),
        };
        let mut output = String::new();
        writer.blocks(&document.blocks, &mut output)?;

        Ok(Rendered {
            output,
            diagnostics: writer.ctx.take_diagnostics(),
        })
    }
}

struct TextWriter<'a> {
    numbering: &'a NumberingTable,
    ctx: NumberingContext,
}

impl TextWriter<'_> {
    fn blocks(&mut self, blocks: &[Block], out: &mut String) -> Result<()> {
        for block in blocks {
            match block {
                Block::Paragraph(p) => {
                    self.paragraph(p, out)?;
                    out.push('\n');
                }
                Block::Table(t) => self.table(t, out)?,
            }
        }
        Ok(())
    }

    fn paragraph(&mut self, paragraph: &Paragraph, out: &mut String) -> Result<()> {
        if let Some(numbering) = &paragraph.numbering {
            let marker = self
                .ctx
                .format(numbering, self.numbering, RenderMode::PlainText);
            out.push_str(&marker.marker);
        }
        write!(out, "{}", paragraph.text())?;
        Ok(())
    }

    fn table(&mut self, table: &Table, out: &mut String) -> Result<()> {
        for row in &table.rows {
            let mut cells = Vec::with_capacity(row.cells.len());
            for cell in &row.cells {
                let mut text = String::new();
                self.blocks(&cell.blocks, &mut text)?;
                cells.push(text.trim_end().replace('\n', " "));
            }
            writeln!(out, "{}", cells.join(CELL_SEPARATOR))?;
        }
        Ok(())
    }
}
