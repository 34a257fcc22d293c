//! File processing API
//!
//! Picks a processing stage (merged or raw tokens) and an output format from a single
//! string like `"token-json"` or `"raw-simple"`, then runs the lexer over a source
//! string or file and renders the result.

use crate::agda::error::ProcessingError;
use crate::agda::formats::{FormatRegistry, HtmlFormat};
use crate::agda::lexer::{tokenize, tokenize_raw};
use std::fs;
use std::path::Path;

/// Which token stream to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Adjacent tokens of the same kind merged
    Token,
    /// One token per rule application
    Raw,
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Html,
}

impl OutputFormat {
    fn registry_name(&self) -> &'static str {
        match self {
            OutputFormat::Simple => "token-simple",
            OutputFormat::Json => "token-json",
            OutputFormat::Html => "html",
        }
    }
}

/// Represents a complete processing specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    pub fn new(stage: ProcessingStage, format: OutputFormat) -> Self {
        Self { stage, format }
    }

    /// Parse a format string like "token-simple", "raw-json" or "html"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        if format_str == "html" {
            return Ok(Self::new(ProcessingStage::Token, OutputFormat::Html));
        }

        let (stage, format) = format_str
            .split_once('-')
            .ok_or_else(|| ProcessingError::InvalidFormat(format_str.to_string()))?;

        let stage = match stage {
            "token" => ProcessingStage::Token,
            "raw" => ProcessingStage::Raw,
            _ => return Err(ProcessingError::InvalidStage(stage.to_string())),
        };

        let format = match format {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "html" => OutputFormat::Html,
            _ => return Err(ProcessingError::InvalidFormat(format.to_string())),
        };

        Ok(Self::new(stage, format))
    }

    /// Get all available processing specifications, by name
    pub fn available() -> Vec<&'static str> {
        vec![
            "token-simple",
            "token-json",
            "raw-simple",
            "raw-json",
            "html",
        ]
    }
}

/// Options that affect rendering but not lexing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingOptions {
    pub wrap_pre: bool,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self { wrap_pre: true }
    }
}

/// Lex `source` and render it according to `spec`
pub fn process_source(
    source: &str,
    spec: &ProcessingSpec,
    options: &ProcessingOptions,
) -> Result<String, ProcessingError> {
    let tokens = match spec.stage {
        ProcessingStage::Token => tokenize(source),
        ProcessingStage::Raw => tokenize_raw(source),
    };

    let mut registry = FormatRegistry::with_defaults();
    registry.register(HtmlFormat {
        wrap_pre: options.wrap_pre,
    });

    Ok(registry.render(&tokens, spec.format.registry_name())?)
}

/// Process an Agda file according to the given specification
pub fn process_file<P: AsRef<Path>>(
    file_path: P,
    spec: &ProcessingSpec,
    options: &ProcessingOptions,
) -> Result<String, ProcessingError> {
    let file_path = file_path.as_ref();
    let content = fs::read_to_string(file_path).map_err(|source| ProcessingError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %file_path.display(), bytes = content.len(), "lexing file");
    process_source(&content, spec, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_specs() {
        assert_eq!(
            ProcessingSpec::from_string("token-simple").unwrap(),
            ProcessingSpec::new(ProcessingStage::Token, OutputFormat::Simple)
        );
        assert_eq!(
            ProcessingSpec::from_string("raw-json").unwrap(),
            ProcessingSpec::new(ProcessingStage::Raw, OutputFormat::Json)
        );
        assert_eq!(
            ProcessingSpec::from_string("html").unwrap(),
            ProcessingSpec::new(ProcessingStage::Token, OutputFormat::Html)
        );
    }

    #[test]
    fn test_every_available_spec_parses() {
        for name in ProcessingSpec::available() {
            assert!(ProcessingSpec::from_string(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_invalid_specs() {
        assert!(matches!(
            ProcessingSpec::from_string("token"),
            Err(ProcessingError::InvalidFormat(_))
        ));
        assert!(matches!(
            ProcessingSpec::from_string("ast-tag"),
            Err(ProcessingError::InvalidStage(s)) if s == "ast"
        ));
        assert!(matches!(
            ProcessingSpec::from_string("token-xml"),
            Err(ProcessingError::InvalidFormat(s)) if s == "xml"
        ));
    }

    #[test]
    fn test_raw_and_merged_stages_differ() {
        let options = ProcessingOptions::default();
        let merged = process_source(
            "{- a -}",
            &ProcessingSpec::from_string("token-simple").unwrap(),
            &options,
        )
        .unwrap();
        let raw = process_source(
            "{- a -}",
            &ProcessingSpec::from_string("raw-simple").unwrap(),
            &options,
        )
        .unwrap();
        assert_eq!(merged.lines().count(), 1);
        assert_eq!(raw.lines().count(), 3);
    }

    #[test]
    fn test_unwrapped_html() {
        let out = process_source(
            "where",
            &ProcessingSpec::from_string("html").unwrap(),
            &ProcessingOptions { wrap_pre: false },
        )
        .unwrap();
        assert_eq!(out, "<span class=\"k\">where</span>");
    }

    #[test]
    fn test_process_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Set₁").unwrap();
        let out = process_file(
            file.path(),
            &ProcessingSpec::from_string("token-simple").unwrap(),
            &ProcessingOptions::default(),
        )
        .unwrap();
        assert_eq!(out, "KeywordType(\"Set₁\")\n");
    }

    #[test]
    fn test_process_missing_file() {
        let err = process_file(
            "/definitely/not/here.agda",
            &ProcessingSpec::from_string("token-simple").unwrap(),
            &ProcessingOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ProcessingError::Io { .. }));
    }
}
