//! Token definitions for the Agda lexer
//!
//! This module defines the categories a span of Agda source can be classified into,
//! and the token record the lexer hands to renderers. Categories follow the usual
//! highlighter taxonomy (keyword / name / literal / comment ...) so that a renderer
//! can map them onto stylesheet classes without knowing anything about Agda.
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// All categories the Agda lexer can assign to a span of source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Whitespace,

    // Comments
    /// `-- ...` up to the end of the line
    CommentSingle,
    /// `{- ... -}`, nesting
    CommentMultiline,
    /// `{-# ... #-}` pragmas
    CommentPreproc,

    // Numeric literals
    NumberFloat,
    NumberHex,
    NumberBinary,
    NumberInteger,

    // String and character literals
    StringLiteral,
    StringEscape,
    CharLiteral,
    CharEscape,

    /// `?` or a balanced `{! ... !}` goal
    Hole,

    // Keywords
    Keyword,
    /// `import`, `open`, `using`, `hiding`, `renaming` in module clauses
    KeywordNamespace,
    /// `=` and `:`
    KeywordDeclaration,
    /// `λ`, `\`, `->`, `→`, `|`, `..`, `...`, `∀`, `forall`, and `as` in imports
    KeywordPseudo,
    /// `Set`, `Set1`, `Set₁`, ...
    KeywordType,

    Operator,
    Name,
    NameNamespace,
    Punctuation,

    /// A code point no rule could place. Only emitted to guarantee progress.
    Error,
}

impl TokenKind {
    /// Check if this kind is whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }

    /// Check if this kind is any flavour of comment (pragmas included)
    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            TokenKind::CommentSingle | TokenKind::CommentMultiline | TokenKind::CommentPreproc
        )
    }

    /// Check if this kind is a keyword of any flavour
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Keyword
                | TokenKind::KeywordNamespace
                | TokenKind::KeywordDeclaration
                | TokenKind::KeywordPseudo
                | TokenKind::KeywordType
        )
    }

    /// Check if this kind is a numeric literal
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            TokenKind::NumberFloat
                | TokenKind::NumberHex
                | TokenKind::NumberBinary
                | TokenKind::NumberInteger
        )
    }

    /// Check if this kind belongs to a string or character literal
    pub fn is_text_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral
                | TokenKind::StringEscape
                | TokenKind::CharLiteral
                | TokenKind::CharEscape
        )
    }

    /// Short stylesheet class, as used by Pygments-compatible themes.
    ///
    /// Whitespace has no class and is rendered bare.
    pub fn css_class(&self) -> Option<&'static str> {
        let class = match self {
            TokenKind::Whitespace => return None,
            TokenKind::CommentSingle => "c1",
            TokenKind::CommentMultiline => "cm",
            TokenKind::CommentPreproc => "cp",
            TokenKind::NumberFloat => "mf",
            TokenKind::NumberHex => "mh",
            TokenKind::NumberBinary => "mb",
            TokenKind::NumberInteger => "mi",
            TokenKind::StringLiteral => "s2",
            TokenKind::StringEscape | TokenKind::CharEscape => "se",
            TokenKind::CharLiteral => "sc",
            TokenKind::Hole => "gp",
            TokenKind::Keyword => "k",
            TokenKind::KeywordNamespace => "kn",
            TokenKind::KeywordDeclaration => "kd",
            TokenKind::KeywordPseudo => "kp",
            TokenKind::KeywordType => "kt",
            TokenKind::Operator => "o",
            TokenKind::Name => "n",
            TokenKind::NameNamespace => "nn",
            TokenKind::Punctuation => "p",
            TokenKind::Error => "err",
        };
        Some(class)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A classified slice of the source.
///
/// `span` is a byte range into the source the token was produced from, and `text`
/// is exactly `&source[span]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Range<usize>,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, start: usize) -> Self {
        Self {
            kind,
            text,
            span: start..start + text.len(),
        }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind, self.text)
    }
}
