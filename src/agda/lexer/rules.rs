//! Scanner states and their ordered rule tables
//!
//! Every [`State`] owns a list of rules tried top to bottom at the current position;
//! the first rule whose pattern matches there consumes its match. Precedence lives in
//! the order of the tables below and nowhere else, e.g. floats are listed before
//! integers and `0x`/`0b` before plain decimals.
//!
//! All patterns are anchored at the current position. A rule may additionally carry a
//! [`Guard::Boundary`], meaning its match has to end where the current run of graphic
//! characters ends; that keeps `open` from firing on `opening` and `Set` on `Setoid`.

use crate::agda::lexer::tokens::TokenKind;
use crate::agda::lexer::vocabulary;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// One printable, non-space code point.
const GRAPH: &str = r"[^\s\p{Cc}\p{Cn}]";
/// A printable code point that is neither `;` nor `)`, for names inside `using (...)`.
const LIST_NAME: &str = r"[^\s\p{Cc}\p{Cn};)]+";
/// Digit groups may be separated by single underscores.
const DECIMAL: &str = r"[0-9]+(?:_[0-9]+)*";

/// Named scanner states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Root,
    /// Inside `{- ... -}`; nests.
    Comment,
    /// Inside `{-# ... #-}`.
    Pragma,
    /// Inside `"..."`.
    String,
    /// After an opening `'`, expecting one character or escape.
    Character,
    /// After the body of a character literal, expecting the closing `'`.
    CharacterEnd,
    /// Inside `{! ... !}`; nests.
    Hole,
    /// After `open`, expecting a module name or an `import` clause.
    Open,
    /// After a module name, accepting `using`/`hiding`/`renaming` lists on the same line.
    OpenTail,
    /// Inside the parentheses of a `using`/`hiding`/`renaming` list.
    OpenList,
}

/// What happens to the state stack after a rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Push(State),
    Pop,
    /// Replace the top of the stack.
    Goto(State),
}

/// How a match is turned into tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The whole match is one token.
    Emit(TokenKind),
    /// One token per capture group, in order. The groups tile the match.
    Groups(&'static [TokenKind]),
    /// A generic word: keyword, operator or name depending on its content.
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    None,
    /// The match must be followed by a non-graphic character or the end of input.
    Boundary,
}

/// A single pattern/action pair
#[derive(Debug)]
pub struct Rule {
    pattern: Regex,
    pub action: Action,
    pub guard: Guard,
    pub transition: Transition,
}

/// A successful rule application, relative to the slice it was tried on
#[derive(Debug)]
pub enum RuleMatch<'a> {
    Whole(&'a str),
    Groups(Captures<'a>),
}

impl RuleMatch<'_> {
    pub fn len(&self) -> usize {
        match self {
            RuleMatch::Whole(text) => text.len(),
            RuleMatch::Groups(caps) => caps.get(0).map_or(0, |m| m.end()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Rule {
    fn new(pattern: &str, action: Action) -> Self {
        let anchored = format!("^(?:{})", pattern);
        let pattern = match Regex::new(&anchored) {
            Ok(regex) => regex,
            Err(err) => panic!("invalid lexer rule {:?}: {}", pattern, err),
        };
        Self {
            pattern,
            action,
            guard: Guard::None,
            transition: Transition::Stay,
        }
    }

    fn emit(pattern: &str, kind: TokenKind) -> Self {
        Self::new(pattern, Action::Emit(kind))
    }

    fn groups(pattern: &str, kinds: &'static [TokenKind]) -> Self {
        Self::new(pattern, Action::Groups(kinds))
    }

    fn bounded(mut self) -> Self {
        self.guard = Guard::Boundary;
        self
    }

    fn then(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Try this rule at the start of `rest`.
    ///
    /// Empty matches are only accepted for rules that pop, so that a rule can never
    /// stall the scanner.
    pub fn apply<'a>(&self, rest: &'a str) -> Option<RuleMatch<'a>> {
        let found = match self.action {
            Action::Groups(_) => RuleMatch::Groups(self.pattern.captures(rest)?),
            Action::Emit(_) | Action::Word => RuleMatch::Whole(self.pattern.find(rest)?.as_str()),
        };

        if found.is_empty() && self.transition != Transition::Pop {
            return None;
        }
        if self.guard == Guard::Boundary && !at_boundary(&rest[found.len()..]) {
            return None;
        }
        Some(found)
    }
}

static GRAPH_CHAR: Lazy<Regex> = Lazy::new(|| regex(&format!("^{}", GRAPH)));
static SYMBOLS_ONLY: Lazy<Regex> = Lazy::new(|| regex(r"^\p{S}+$"));

fn regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("invalid pattern {:?}: {}", pattern, err),
    }
}

/// Whether `c` is printable and not whitespace.
pub fn is_graphic(c: char) -> bool {
    let mut buf = [0u8; 4];
    GRAPH_CHAR.is_match(c.encode_utf8(&mut buf))
}

/// Characters that end a reserved word even though they are graphic.
const DELIMITERS: &[char] = &['(', ')', '{', '}', ';', '"'];

fn at_boundary(after: &str) -> bool {
    after
        .chars()
        .next()
        .map_or(true, |c| DELIMITERS.contains(&c) || !is_graphic(c))
}

/// Classify a maximal run of graphic characters.
///
/// Reserved words win over everything else; a run made only of Unicode symbols
/// (general category S*) is an operator; anything else is a name.
pub fn classify_word(word: &str) -> TokenKind {
    if vocabulary::is_keyword(word) {
        TokenKind::Keyword
    } else if SYMBOLS_ONLY.is_match(word) {
        TokenKind::Operator
    } else {
        TokenKind::Name
    }
}

const IMPORT_AS: &[TokenKind] = &[
    TokenKind::KeywordNamespace,
    TokenKind::Whitespace,
    TokenKind::NameNamespace,
    TokenKind::Whitespace,
    TokenKind::KeywordPseudo,
    TokenKind::Whitespace,
    TokenKind::NameNamespace,
];

const IMPORT: &[TokenKind] = &[
    TokenKind::KeywordNamespace,
    TokenKind::Whitespace,
    TokenKind::NameNamespace,
];

const DIRECTIVE_LIST: &[TokenKind] = &[
    TokenKind::KeywordNamespace,
    TokenKind::Whitespace,
    TokenKind::Punctuation,
];

fn import_as_pattern() -> String {
    format!(r"(import)(\s+)({g}+)(\s+)(as)(\s+)({g}+)", g = GRAPH)
}

fn import_pattern() -> String {
    format!(r"(import)(\s+)({g}+)", g = GRAPH)
}

fn directive_list_pattern() -> String {
    format!(r"({})(\s+)(\()", vocabulary::IMPORT_DIRECTIVES.join("|"))
}

fn number_rules() -> Vec<Rule> {
    let hex = r"[0-9a-fA-F]+(?:_[0-9a-fA-F]+)*";
    let bin = r"[01]+(?:_[01]+)*";
    vec![
        Rule::emit(
            &format!(r"-?{d}\.{d}(?:[eE][+\-]?{d})?", d = DECIMAL),
            TokenKind::NumberFloat,
        ),
        Rule::emit(
            &format!(r"-?{d}[eE][+\-]?{d}", d = DECIMAL),
            TokenKind::NumberFloat,
        ),
        Rule::emit(&format!(r"-?0x{}", hex), TokenKind::NumberHex),
        Rule::emit(&format!(r"-?0b{}", bin), TokenKind::NumberBinary),
        Rule::emit(&format!(r"-?{}", DECIMAL), TokenKind::NumberInteger),
    ]
}

static ROOT: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = vec![
        Rule::emit(r"\s+", TokenKind::Whitespace),
        Rule::emit(r"\{-#", TokenKind::CommentPreproc).then(Transition::Push(State::Pragma)),
        Rule::emit(r"--.*", TokenKind::CommentSingle),
        Rule::emit(r"\{-", TokenKind::CommentMultiline).then(Transition::Push(State::Comment)),
    ];
    rules.extend(number_rules());
    rules.extend([
        Rule::emit("'", TokenKind::CharLiteral).then(Transition::Push(State::Character)),
        Rule::emit("\"", TokenKind::StringLiteral).then(Transition::Push(State::String)),
        Rule::emit("open", TokenKind::KeywordNamespace)
            .bounded()
            .then(Transition::Push(State::Open)),
        Rule::groups(&import_as_pattern(), IMPORT_AS)
            .bounded()
            .then(Transition::Push(State::OpenTail)),
        Rule::groups(&import_pattern(), IMPORT)
            .bounded()
            .then(Transition::Push(State::OpenTail)),
        Rule::emit("=|:", TokenKind::KeywordDeclaration).bounded(),
        Rule::emit(r"\\|->|→|λ", TokenKind::KeywordPseudo).bounded(),
        Rule::emit(r"\.\.\.|\.\.|\|", TokenKind::KeywordPseudo).bounded(),
        Rule::emit("∀|forall", TokenKind::KeywordPseudo).bounded(),
        Rule::emit(r"\?", TokenKind::Hole).bounded(),
        Rule::emit(r"\{!", TokenKind::Hole).then(Transition::Push(State::Hole)),
        Rule::emit("Set(?:[0-9]+|[₀-₉]+)?", TokenKind::KeywordType).bounded(),
        Rule::new(&format!("{}+", GRAPH), Action::Word),
    ]);
    rules
});

static COMMENT: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::emit(r"-\}", TokenKind::CommentMultiline).then(Transition::Pop),
        Rule::emit(r"\{-", TokenKind::CommentMultiline).then(Transition::Push(State::Comment)),
        Rule::emit(r"[^{}\-]+", TokenKind::CommentMultiline),
        Rule::emit(r"(?s:.)", TokenKind::CommentMultiline),
    ]
});

static PRAGMA: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::emit(r"#-\}", TokenKind::CommentPreproc).then(Transition::Pop),
        Rule::emit(r"[^#]+", TokenKind::CommentPreproc),
        Rule::emit(r"(?s:.)", TokenKind::CommentPreproc),
    ]
});

static STRING: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::emit(r#"[^\\"]+"#, TokenKind::StringLiteral),
        Rule::emit(r"\\(?s:.)?", TokenKind::StringEscape),
        Rule::emit("\"", TokenKind::StringLiteral).then(Transition::Pop),
    ]
});

static CHARACTER: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::emit(
            &format!(r"\\(?:{})", vocabulary::escape_alternation()),
            TokenKind::CharEscape,
        )
        .then(Transition::Goto(State::CharacterEnd)),
        Rule::emit("'", TokenKind::CharLiteral).then(Transition::Pop),
        Rule::emit(r"[^\s\p{Cc}\p{Cn}']", TokenKind::CharLiteral)
            .then(Transition::Goto(State::CharacterEnd)),
    ]
});

static CHARACTER_END: Lazy<Vec<Rule>> =
    Lazy::new(|| vec![Rule::emit("'", TokenKind::CharLiteral).then(Transition::Pop)]);

static HOLE: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::emit(r"!\}", TokenKind::Hole).then(Transition::Pop),
        Rule::emit(r"\{!", TokenKind::Hole).then(Transition::Push(State::Hole)),
        Rule::emit(r"[^!{]+", TokenKind::Hole),
        Rule::emit(r"(?s:.)", TokenKind::Hole),
    ]
});

static OPEN: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::emit(r"\s+", TokenKind::Whitespace),
        Rule::groups(&import_as_pattern(), IMPORT_AS)
            .bounded()
            .then(Transition::Goto(State::OpenTail)),
        Rule::groups(&import_pattern(), IMPORT)
            .bounded()
            .then(Transition::Goto(State::OpenTail)),
        Rule::groups(&directive_list_pattern(), DIRECTIVE_LIST)
            .then(Transition::Goto(State::OpenList)),
        Rule::emit(&format!("{}+", GRAPH), TokenKind::NameNamespace)
            .then(Transition::Goto(State::OpenTail)),
    ]
});

static OPEN_TAIL: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::emit(r"[^\S\n]+", TokenKind::Whitespace),
        Rule::groups(&directive_list_pattern(), DIRECTIVE_LIST)
            .then(Transition::Goto(State::OpenList)),
    ]
});

static OPEN_LIST: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::emit(r"\s+", TokenKind::Whitespace),
        Rule::emit(";", TokenKind::Punctuation),
        Rule::emit(r"\)", TokenKind::Punctuation).then(Transition::Goto(State::OpenTail)),
        Rule::emit(LIST_NAME, TokenKind::Name),
    ]
});

/// The ordered rule table of a state.
///
/// When none of a non-root state's rules match, the scanner leaves that state without
/// consuming anything.
pub fn rules_for(state: State) -> &'static [Rule] {
    match state {
        State::Root => &ROOT,
        State::Comment => &COMMENT,
        State::Pragma => &PRAGMA,
        State::String => &STRING,
        State::Character => &CHARACTER,
        State::CharacterEnd => &CHARACTER_END,
        State::Hole => &HOLE,
        State::Open => &OPEN,
        State::OpenTail => &OPEN_TAIL,
        State::OpenList => &OPEN_LIST,
    }
}
