//! Plain-text and JSON token dumps, mostly for inspecting the lexer
use crate::agda::error::FormatError;
use crate::agda::formats::Format;
use crate::agda::lexer::Token;

/// One `Kind("text")` line per token
pub struct SimpleFormat;

impl Format for SimpleFormat {
    fn name(&self) -> &str {
        "token-simple"
    }

    fn description(&self) -> &str {
        "One token per line as Kind(\"text\")"
    }

    fn render(&self, tokens: &[Token<'_>]) -> Result<String, FormatError> {
        let mut out = String::new();
        for token in tokens {
            out.push_str(&token.to_string());
            out.push('\n');
        }
        Ok(out)
    }
}

/// Pretty-printed JSON array of tokens with kinds, texts and byte spans
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "token-json"
    }

    fn description(&self) -> &str {
        "JSON array of {kind, text, span} records"
    }

    fn render(&self, tokens: &[Token<'_>]) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(tokens)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agda::lexer::tokenize;

    #[test]
    fn test_simple_format() {
        let out = SimpleFormat.render(&tokenize("x = 1")).unwrap();
        assert_eq!(
            out,
            "Name(\"x\")\nWhitespace(\" \")\nKeywordDeclaration(\"=\")\nWhitespace(\" \")\nNumberInteger(\"1\")\n"
        );
    }

    #[test]
    fn test_json_format() {
        let out = JsonFormat.render(&tokenize("where")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["kind"], "Keyword");
        assert_eq!(value[0]["text"], "where");
        assert_eq!(value[0]["span"]["start"], 0);
        assert_eq!(value[0]["span"]["end"], 5);
    }
}
