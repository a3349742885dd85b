//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use docweave_ast::{Document, StyleDefinition};
use docweave_core::{resolve_styles_with_diagnostics, CascadeEngine, Diagnostic};
use docweave_ooxml::DocxPackage;
use docweave_render::{render, OutputFormat, Rendered};

use crate::config::Settings;

/// Output format for the styles listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "docweave")]
#[command(author, version, about = "Resolve DOCX styles and list numbering", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to docweave.toml next to the input)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a DOCX file and print the document tree as JSON
    Resolve {
        /// Input DOCX file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Render a DOCX file as HTML or plain text
    Render {
        /// Input DOCX file
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (html or text); overrides the config file
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Emit a complete HTML page
        #[arg(long)]
        standalone: bool,
    },

    /// List the styles of a DOCX file with their resolved properties
    Styles {
        /// Input DOCX file
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: ListFormat,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Resolve {
            input,
            output,
            compact,
        } => {
            let settings = Settings::load(cli.config.as_deref(), &input)?;
            resolve_command(&input, output.as_deref(), &settings, compact)?;
        }
        Commands::Render {
            input,
            output,
            format,
            standalone,
        } => {
            let mut settings = Settings::load(cli.config.as_deref(), &input)?;
            if let Some(format) = format {
                settings.render.format = format;
            }
            settings.render.standalone |= standalone;
            render_command(&input, output.as_deref(), &settings)?;
        }
        Commands::Styles { input, format } => {
            styles_command(&input, format)?;
        }
    }

    Ok(())
}

/// Install the stderr subscriber; `log` records from the libraries are
/// forwarded to it
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Logging already initialised");
    }
}

/// Resolved document with the diagnostics met along the way
#[derive(Debug, Serialize)]
pub struct ResolveReport {
    /// Fully-resolved document tree
    pub document: Document,
    /// Unresolved styles and cycles
    pub diagnostics: Vec<Diagnostic>,
}

/// Open a DOCX file
pub fn load_package(input: &Path) -> Result<DocxPackage> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    DocxPackage::open(input).with_context(|| format!("Failed to open DOCX file: {}", input.display()))
}

/// Run the cascade with the configured default overrides
pub fn resolve_package(package: &DocxPackage, settings: &Settings) -> ResolveReport {
    let mut engine = CascadeEngine::new(&package.styles)
        .with_default_overrides(&settings.defaults.paragraph, &settings.defaults.run);
    let document = engine.resolve_document(package.document.clone(), &package.numbering);
    ResolveReport {
        document,
        diagnostics: engine.take_diagnostics(),
    }
}

/// Execute the resolve command
pub fn resolve_command(
    input: &Path,
    output: Option<&Path>,
    settings: &Settings,
    compact: bool,
) -> Result<()> {
    let package = load_package(input)?;
    let report = resolve_package(&package, settings);
    tracing::info!(
        "Resolved {} paragraphs with {} diagnostics",
        report.document.paragraphs().len(),
        report.diagnostics.len()
    );

    let mut json = if compact {
        serde_json::to_string(&report)
    } else {
        serde_json::to_string_pretty(&report)
    }
    .context("Failed to serialize resolved document")?;
    json.push('\n');

    write_output(output, &json)
}

/// Resolve and render a package
pub fn render_package(
    package: &DocxPackage,
    settings: &Settings,
    input: &Path,
) -> Result<Rendered> {
    let report = resolve_package(package, settings);
    let html = settings.render.html_config(input);
    let mut rendered = render(
        &report.document,
        &package.numbering,
        settings.render.format,
        &html,
    )
    .with_context(|| format!("Failed to render {}", settings.render.format))?;

    let mut diagnostics = report.diagnostics;
    diagnostics.append(&mut rendered.diagnostics);
    rendered.diagnostics = diagnostics;
    Ok(rendered)
}

/// Execute the render command
pub fn render_command(input: &Path, output: Option<&Path>, settings: &Settings) -> Result<()> {
    let package = load_package(input)?;
    let rendered = render_package(&package, settings, input)?;
    tracing::info!(
        "Rendered {} as {} ({} diagnostics)",
        input.display(),
        settings.render.format,
        rendered.diagnostics.len()
    );
    write_output(output, &rendered.output)
}

/// A style with its basedOn chain folded in
#[derive(Debug, Serialize)]
struct StylesReport<'a> {
    styles: &'a [StyleDefinition],
    diagnostics: &'a [Diagnostic],
}

/// Format the resolved style list
pub fn styles_report(package: &DocxPackage, format: ListFormat) -> Result<String> {
    let resolution = resolve_styles_with_diagnostics(package.styles.styles.clone());

    match format {
        ListFormat::Json => {
            let report = StylesReport {
                styles: &resolution.styles,
                diagnostics: &resolution.diagnostics,
            };
            let mut json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize styles")?;
            json.push('\n');
            Ok(json)
        }
        ListFormat::Text => {
            let mut out = String::new();
            for style in &resolution.styles {
                out.push_str(&format!("{} ({})", style.id, style.kind.as_str()));
                if style.name != style.id {
                    out.push_str(&format!(" \"{}\"", style.name));
                }
                if let Some(parent) = &style.based_on {
                    out.push_str(&format!(" based on {}", parent));
                }
                out.push('\n');
                if !style.paragraph_props.is_empty() {
                    out.push_str(&format!(
                        "  paragraph: {}\n",
                        serde_json::to_string(&style.paragraph_props)?
                    ));
                }
                if !style.run_props.is_empty() {
                    out.push_str(&format!(
                        "  run: {}\n",
                        serde_json::to_string(&style.run_props)?
                    ));
                }
            }
            for diagnostic in &resolution.diagnostics {
                out.push_str(&format!("{}\n", diagnostic));
            }
            Ok(out)
        }
    }
}

/// Execute the styles command
pub fn styles_command(input: &Path, format: ListFormat) -> Result<()> {
    let package = load_package(input)?;
    let report = styles_report(&package, format)?;
    write_output(None, &report)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_args() {
        let cli = Cli::try_parse_from([
            "docweave", "-v", "render", "in.docx", "--format", "text", "-o", "out.txt",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Render { format, output, .. } => {
                assert_eq!(format, Some(OutputFormat::Text));
                assert_eq!(output, Some(PathBuf::from("out.txt")));
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_bad_format_rejected() {
        assert!(Cli::try_parse_from(["docweave", "render", "in.docx", "-f", "pdf"]).is_err());
    }

    #[test]
    fn test_missing_input() {
        let err = load_package(Path::new("/nonexistent/in.docx")).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }
}
