//! Implementation of the Agda lexer
//!
//! [`Scanner`] drives the rule tables of [`rules`](crate::agda::lexer::rules) over the
//! source and yields one token per rule application (or per capture group). [`Lexer`]
//! wraps it and merges neighbouring tokens of the same kind, which is what a
//! highlighter wants: a nested comment comes out as one comment token rather than a
//! delimiter/content/delimiter sequence.
//!
//! Both are plain iterators over a borrowed source and can be cloned to restart or
//! fork a scan.

use crate::agda::lexer::rules::{self, Action, RuleMatch, State, Transition};
use crate::agda::lexer::tokens::{Token, TokenKind};
use std::collections::VecDeque;

/// Raw, uncoalesced token stream
#[derive(Debug, Clone)]
pub struct Scanner<'src> {
    source: &'src str,
    pos: usize,
    stack: Vec<State>,
    pending: VecDeque<Token<'src>>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_state(source, State::Root)
    }

    /// Start scanning in `state`, with the root state underneath it.
    pub fn with_state(source: &'src str, state: State) -> Self {
        let mut stack = vec![State::Root];
        if state != State::Root {
            stack.push(state);
        }
        Self {
            source,
            pos: 0,
            stack,
            pending: VecDeque::new(),
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Byte offset of the next unscanned character.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The state stack, root first. Constructs left open at end of input stay on it.
    pub fn stack(&self) -> &[State] {
        &self.stack
    }

    pub fn state(&self) -> State {
        self.stack.last().copied().unwrap_or(State::Root)
    }

    fn emit(&mut self, kind: TokenKind, start: usize, end: usize) {
        if start < end {
            self.pending
                .push_back(Token::new(kind, &self.source[start..end], start));
        }
    }

    fn transition(&mut self, transition: Transition) {
        match transition {
            Transition::Stay => {}
            Transition::Push(state) => self.stack.push(state),
            Transition::Pop => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
            }
            Transition::Goto(state) => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
                self.stack.push(state);
            }
        }
    }

    /// Apply the first matching rule of the current state.
    fn step(&mut self) {
        let source = self.source;
        let start = self.pos;
        let rest = &source[start..];

        for rule in rules::rules_for(self.state()) {
            let Some(found) = rule.apply(rest) else {
                continue;
            };
            let end = start + found.len();

            match (rule.action, found) {
                (Action::Emit(kind), _) => self.emit(kind, start, end),
                (Action::Word, _) => {
                    let kind = rules::classify_word(&source[start..end]);
                    self.emit(kind, start, end);
                }
                (Action::Groups(kinds), RuleMatch::Groups(caps)) => {
                    for (i, kind) in kinds.iter().enumerate() {
                        if let Some(group) = caps.get(i + 1) {
                            self.emit(*kind, start + group.start(), start + group.end());
                        }
                    }
                }
                (Action::Groups(_), RuleMatch::Whole(_)) => self.emit(TokenKind::Error, start, end),
            }

            self.pos = end;
            self.transition(rule.transition);
            return;
        }

        if self.stack.len() > 1 {
            self.stack.pop();
            return;
        }

        // Root always has a catch-all rule; this only guards against a table edit
        // that breaks it.
        let width = rest.chars().next().map_or(1, char::len_utf8);
        tracing::trace!(offset = start, "no lexer rule matched, emitting error token");
        self.emit(TokenKind::Error, start, start + width);
        self.pos = start + width;
    }
}

impl<'src> Iterator for Scanner<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.pos >= self.source.len() {
                return None;
            }
            self.step();
        }
    }
}

/// Token stream with adjacent tokens of the same kind merged
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    scanner: Scanner<'src>,
    held: Option<Token<'src>>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::with_state(source, State::Root)
    }

    pub fn with_state(source: &'src str, state: State) -> Self {
        Self {
            scanner: Scanner::with_state(source, state),
            held: None,
        }
    }

    /// The state stack of the underlying scanner.
    pub fn stack(&self) -> &[State] {
        self.scanner.stack()
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let source = self.scanner.source();
        let mut current = self.held.take().or_else(|| self.scanner.next())?;

        for token in self.scanner.by_ref() {
            if joins(&current, &token) {
                current.span.end = token.end();
                current.text = &source[current.span.clone()];
            } else {
                self.held = Some(token);
                break;
            }
        }

        Some(current)
    }
}

/// Punctuation is never merged, so `()` stays two tokens.
fn joins(current: &Token<'_>, next: &Token<'_>) -> bool {
    current.kind == next.kind
        && current.kind != TokenKind::Punctuation
        && next.start() == current.end()
}

/// Tokenize a source string, merging adjacent tokens of the same kind
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).collect()
}

/// Tokenize a source string starting from `state` instead of the root state
pub fn tokenize_from(source: &str, state: State) -> Vec<Token<'_>> {
    Lexer::with_state(source, state).collect()
}

/// Tokenize a source string into one token per rule application
pub fn tokenize_raw(source: &str) -> Vec<Token<'_>> {
    Scanner::new(source).collect()
}
