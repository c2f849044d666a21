//! CLI settings and document formats

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use mcfg_upgrade::{ConfigDocument, DocumentError};

/// Serialization format of a config document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

impl DocumentFormat {
    /// Every format name accepted on the command line
    pub const NAMES: [&'static str; 2] = ["json", "yaml"];

    /// Guess format from a file extension, JSON unless `.yaml`/`.yml`
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Parse document text
    ///
    /// # Errors
    /// Returns error if the text is not valid in this format
    pub fn parse(self, text: &str) -> Result<ConfigDocument, DocumentError> {
        match self {
            Self::Json => ConfigDocument::from_json(text),
            Self::Yaml => ConfigDocument::from_yaml(text),
        }
    }

    /// Render document text
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn render(self, document: &ConfigDocument) -> Result<String, DocumentError> {
        match self {
            Self::Json => document.to_json(),
            Self::Yaml => document.to_yaml(),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

/// Unknown format name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format: '{0}' (expected json or yaml)")]
pub struct UnknownFormat(pub String);

impl FromStr for DocumentFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Settings shared by every subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliSettings {
    /// Output format; `None` follows the input file
    pub format: Option<DocumentFormat>,
    /// Suppress the notice summary
    pub quiet: bool,
    /// `tracing` filter directive used when `MCFG_LOG` is unset
    pub log_filter: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            format: None,
            quiet: false,
            log_filter: "info".to_string(),
        }
    }
}

impl CliSettings {
    /// Environment variable holding the log filter
    pub const LOG_ENV: &'static str = "MCFG_LOG";

    /// Create default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set output format
    #[must_use]
    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set quiet mode
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Set default log filter
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Output format for a given input path
    #[must_use]
    pub fn output_format(&self, input: &Path) -> DocumentFormat {
        self.format.unwrap_or_else(|| DocumentFormat::from_path(input))
    }
}
