//! Reserved words and escape names of the Agda surface syntax
//!
//! This is reference data, kept apart from the scanning rules so that following a new
//! Agda release only means editing the lists below. The version they track is recorded
//! in [`AGDA_VERSION`].

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Agda release the word lists were taken from.
pub const AGDA_VERSION: &str = "2.6.2";

/// Reserved words. An otherwise generic word equal to one of these is a keyword.
pub const KEYWORDS: &[&str] = &[
    "abstract",
    "codata",
    "coinductive",
    "constructor",
    "data",
    "do",
    "eta-equality",
    "field",
    "forall",
    "hiding",
    "import",
    "in",
    "inductive",
    "infix",
    "infixl",
    "infixr",
    "instance",
    "interleaved",
    "let",
    "macro",
    "module",
    "mutual",
    "no-eta-equality",
    "open",
    "overlap",
    "pattern",
    "postulate",
    "primitive",
    "private",
    "public",
    "quote",
    "quoteContext",
    "quoteGoal",
    "quoteTerm",
    "record",
    "renaming",
    "rewrite",
    "syntax",
    "tactic",
    "unquote",
    "unquoteDecl",
    "unquoteDef",
    "using",
    "variable",
    "where",
    "with",
];

/// Keywords that introduce a list of names after `open`.
pub const IMPORT_DIRECTIVES: &[&str] = &["using", "hiding", "renaming"];

/// ASCII control-code names usable as `\NAME` escapes in string and character literals.
pub const ESCAPE_NAMES: &[&str] = &[
    "NUL", "SOH", "STX", "ETX", "EOT", "ENQ", "ACK", "BEL", "BS", "HT", "LF", "VT", "FF", "CR",
    "SO", "SI", "DLE", "DC1", "DC2", "DC3", "DC4", "NAK", "SYN", "ETB", "CAN", "EM", "SUB", "ESC",
    "FS", "GS", "RS", "US", "SP", "DEL",
];

/// Single-character escapes (`\n`, `\\`, ...).
pub const ESCAPE_CHARS: &[char] = &['a', 'b', 't', 'n', 'v', 'f', 'r', '\\', '\'', '"'];

static KEYWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| KEYWORDS.iter().copied().collect());

/// Exact match against the reserved word list.
pub fn is_keyword(word: &str) -> bool {
    KEYWORD_SET.contains(word)
}

/// Alternation matching the body of one escape sequence (everything after the backslash).
///
/// Named escapes are ordered longest first so that `SOH` wins over `SO`.
pub fn escape_alternation() -> String {
    let mut names: Vec<&str> = ESCAPE_NAMES.to_vec();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let chars: String = ESCAPE_CHARS
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect();

    format!(
        r"x[0-9A-Fa-f]+|o[0-7]+|[0-9]+|{}|[{}]",
        names.join("|"),
        chars
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_keywords_are_exact_matches() {
        assert!(is_keyword("where"));
        assert!(is_keyword("no-eta-equality"));
        assert!(!is_keyword("Where"));
        assert!(!is_keyword("where'"));
        assert!(!is_keyword(""));
    }

    #[test]
    fn test_keyword_list_has_no_duplicates() {
        assert_eq!(KEYWORD_SET.len(), KEYWORDS.len());
    }

    #[test]
    fn test_import_directives_are_keywords() {
        for word in IMPORT_DIRECTIVES {
            assert!(is_keyword(word), "{} should be reserved", word);
        }
    }

    #[test]
    fn test_escape_alternation_prefers_longest_name() {
        let re = Regex::new(&format!("^(?:{})", escape_alternation())).unwrap();
        assert_eq!(re.find("SOH").unwrap().as_str(), "SOH");
        assert_eq!(re.find("SO").unwrap().as_str(), "SO");
        assert_eq!(re.find("DC3x").unwrap().as_str(), "DC3");
        assert_eq!(re.find("x1Fz").unwrap().as_str(), "x1F");
        assert_eq!(re.find("123").unwrap().as_str(), "123");
        assert_eq!(re.find("\\").unwrap().as_str(), "\\");
        assert_eq!(re.find("\"").unwrap().as_str(), "\"");
        assert!(re.find("q").is_none());
    }
}
