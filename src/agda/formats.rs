//! Output formats for token streams
//!
//! A [`Format`] turns a token stream into text. Formats are looked up by name through a
//! [`FormatRegistry`], which is how the processor and the CLI pick one.

pub mod html;
pub mod simple;

use crate::agda::error::FormatError;
use crate::agda::lexer::Token;
use std::collections::HashMap;

pub use html::HtmlFormat;
pub use simple::{JsonFormat, SimpleFormat};

/// A way of writing out a token stream
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "token-json", "html")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    fn render(&self, tokens: &[Token<'_>]) -> Result<String, FormatError>;
}

/// Registry of output formats, keyed by name
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Registry holding every built-in format
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SimpleFormat);
        registry.register(JsonFormat);
        registry.register(HtmlFormat::default());
        registry
    }

    /// Register a format, replacing any format of the same name
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn render(&self, tokens: &[Token<'_>], format: &str) -> Result<String, FormatError> {
        self.get(format)?.render(tokens)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}
