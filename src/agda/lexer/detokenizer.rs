//! Detokenizer for the Agda lexer
//!
//! Lexing never drops or rewrites input, so joining token texts gives the source back.
//! Tests lean on this to check that a token stream covers its input.
use crate::agda::lexer::tokens::Token;

/// Detokenize a stream of tokens into a string
pub fn detokenize(tokens: &[Token<'_>]) -> String {
    let capacity = tokens.iter().map(|t| t.text.len()).sum();
    tokens
        .iter()
        .fold(String::with_capacity(capacity), |mut out, token| {
            out.push_str(token.text);
            out
        })
}
