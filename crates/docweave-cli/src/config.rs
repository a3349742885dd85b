//! `docweave.toml` settings
//!
//! ```toml
//! [render]
//! format = "html"
//! class_prefix = "doc-"
//! standalone = true
//!
//! [defaults.paragraph]
//! alignment = "justify"
//!
//! [defaults.run]
//! fontFamily = "Georgia"
//! fontSizePt = 12
//! ```
//!
//! `[defaults]` entries override the document's own defaults before the
//! cascade runs.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docweave_ast::PropertySet;
use docweave_render::{HtmlConfig, OutputFormat};
use serde::{Deserialize, Serialize};

/// File looked up next to the input document
pub const CONFIG_FILE_NAME: &str = "docweave.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Output settings
    pub render: RenderSettings,
    /// Document default overrides
    pub defaults: DefaultsSettings,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output format when `--format` is not given
    pub format: OutputFormat,
    /// Class name prefix for HTML output
    pub class_prefix: String,
    /// Emit a complete HTML page
    pub standalone: bool,
    /// Page title; the input file stem when absent
    pub title: Option<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Html,
            class_prefix: HtmlConfig::default().class_prefix,
            standalone: false,
            title: None,
        }
    }
}

impl RenderSettings {
    /// HTML renderer configuration for `input`
    pub fn html_config(&self, input: &Path) -> HtmlConfig {
        let title = self.title.clone().unwrap_or_else(|| {
            input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| HtmlConfig::default().title)
        });
        HtmlConfig {
            class_prefix: self.class_prefix.clone(),
            standalone: self.standalone,
            title,
        }
    }
}

/// Document default overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DefaultsSettings {
    /// Paragraph property overrides
    pub paragraph: PropertySet,
    /// Run property overrides
    pub run: PropertySet,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Read settings from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Load the explicit config, or `docweave.toml` beside the input
    ///
    /// Missing implicit config means defaults; a missing explicit config
    /// is an error.
    pub fn load(explicit: Option<&Path>, input: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!("Loading config {}", path.display());
            return Self::from_file(path);
        }

        let candidate = sibling_config(input);
        if candidate.is_file() {
            tracing::debug!("Loading config {}", candidate.display());
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

fn sibling_config(input: &Path) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docweave_ast::keys;

    #[test]
    fn test_parse_full_config() {
        let settings = Settings::from_toml_str(
            r#"
[render]
format = "text"
class_prefix = "doc-"
standalone = true

[defaults.paragraph]
alignment = "justify"

[defaults.run]
fontFamily = "Georgia"
fontSizePt = 12
"#,
        )
        .unwrap();

        assert_eq!(settings.render.format, OutputFormat::Text);
        assert_eq!(settings.render.class_prefix, "doc-");
        assert!(settings.render.standalone);
        assert_eq!(settings.defaults.paragraph.str(keys::ALIGNMENT), Some("justify"));
        assert_eq!(settings.defaults.run.font_size_pt(), Some(12.0));
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.render.format, OutputFormat::Html);
        assert_eq!(settings.render.class_prefix, "dw-");
        assert!(settings.defaults.run.is_empty());
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(Settings::from_toml_str("[render]\nformat = \"pdf\"").is_err());
    }

    #[test]
    fn test_html_config_title_from_input() {
        let render = RenderSettings::default();
        assert_eq!(render.html_config(Path::new("/tmp/report.docx")).title, "report");

        let render = RenderSettings {
            title: Some("Quarterly".to_string()),
            ..Default::default()
        };
        assert_eq!(render.html_config(Path::new("x.docx")).title, "Quarterly");
    }

    #[test]
    fn test_load_sibling_and_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.docx");
        assert_eq!(Settings::load(None, &input).unwrap(), Settings::default());

        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[render]\nstandalone = true\n",
        )
        .unwrap();
        assert!(Settings::load(None, &input).unwrap().render.standalone);

        let missing = dir.path().join("other.toml");
        assert!(Settings::load(Some(&missing), &input).is_err());
    }
}
