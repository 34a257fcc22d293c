//! Highlighted HTML output
//!
//! Each non-whitespace token becomes a `<span>` carrying the short class name of its
//! kind (see [`TokenKind::css_class`]), so any Pygments-compatible stylesheet applies.
//! Whitespace is written as-is to keep the layout of the block.
use crate::agda::error::FormatError;
use crate::agda::formats::Format;
use crate::agda::lexer::{Token, TokenKind};

#[derive(Debug, Clone)]
pub struct HtmlFormat {
    /// Wrap the spans in `<pre class="highlight"><code>`.
    pub wrap_pre: bool,
}

impl Default for HtmlFormat {
    fn default() -> Self {
        Self { wrap_pre: true }
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Highlighted HTML with Pygments class names"
    }

    fn render(&self, tokens: &[Token<'_>]) -> Result<String, FormatError> {
        Ok(render_html(tokens, self.wrap_pre))
    }
}

/// Render tokens as highlighted HTML
pub fn render_html(tokens: &[Token<'_>], wrap_pre: bool) -> String {
    let mut out = String::new();
    if wrap_pre {
        out.push_str("<pre class=\"highlight\"><code>");
    }
    for token in tokens {
        push_token(&mut out, token.kind, token.text);
    }
    if wrap_pre {
        out.push_str("</code></pre>");
    }
    out
}

fn push_token(out: &mut String, kind: TokenKind, text: &str) {
    match kind.css_class() {
        Some(class) => {
            out.push_str("<span class=\"");
            out.push_str(class);
            out.push_str("\">");
            escape_into(out, text);
            out.push_str("</span>");
        }
        None => escape_into(out, text),
    }
}

/// Append `text` with HTML special characters escaped
pub fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agda::lexer::tokenize;

    #[test]
    fn test_spans_per_token() {
        let html = render_html(&tokenize("x = y"), false);
        assert_eq!(
            html,
            "<span class=\"n\">x</span> <span class=\"kd\">=</span> <span class=\"n\">y</span>"
        );
    }

    #[test]
    fn test_wrapped_block() {
        let html = HtmlFormat::default().render(&tokenize("where")).unwrap();
        assert_eq!(
            html,
            "<pre class=\"highlight\"><code><span class=\"k\">where</span></code></pre>"
        );
    }

    #[test]
    fn test_escaping() {
        let html = render_html(&tokenize("\"<a & b>\""), false);
        assert_eq!(
            html,
            "<span class=\"s2\">&quot;&lt;a &amp; b&gt;&quot;</span>"
        );
    }

    #[test]
    fn test_format_without_pre() {
        let format = HtmlFormat { wrap_pre: false };
        assert_eq!(
            format.render(&tokenize("Set")).unwrap(),
            "<span class=\"kt\">Set</span>"
        );
    }
}
