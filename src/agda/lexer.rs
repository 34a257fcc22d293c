//! Lexer module for Agda source
//!
//! This module contains the tokenization logic used to highlight Agda code blocks,
//! including token definitions, the reserved-word data and the lexer implementation.
//!
//! Scanning Model
//!
//! The lexer is a small state machine. Each [`State`] owns an ordered table of anchored
//! regex rules; at every position the first rule of the current state that matches
//! consumes its match, emits tokens and may push, pop or replace the state. Comments,
//! pragmas, holes and literals push their own states so that their delimiters nest
//! (`{- {- -} -}`) or terminate them.
//!
//! The lexer never fails:
//! - the root state ends with a catch-all rule for any run of printable characters,
//! - a non-root state with no matching rule is left without consuming input,
//! - an unterminated construct simply runs to the end of input.
//!
//! Concatenating the texts of the produced tokens always gives back the input.

pub mod detokenizer;
pub mod lexer_impl;
pub mod rules;
pub mod tokens;
pub mod vocabulary;

pub use detokenizer::detokenize;
pub use lexer_impl::{tokenize, tokenize_from, tokenize_raw, Lexer, Scanner};
pub use rules::State;
pub use tokens::{Token, TokenKind};
