//! # lagda
//!
//! Lexing and highlighting of Agda source, plus the glue that turns literate Agda
//! pages (`*.lagda.md`) into linked HTML fragments for a static site.
//!
//! - [`agda::lexer`]: the tokenizer, a small state machine over ordered regex rules.
//! - [`agda::formats`]: token stream renderers (plain, JSON, highlighted HTML).
//! - [`agda::literate`]: staging pages, running `agda --html`, rewriting its links.

pub mod agda;

pub use agda::lexer::{tokenize, Token, TokenKind};
