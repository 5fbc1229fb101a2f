use crate::keywords::{is_built_in, is_keyword, is_language_variable, is_literal};
use crate::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    Comment,
    String,
    Template,
    Number,
    Keyword,
    Literal,
    BuiltIn,
    LanguageVariable,
    FunctionTitle,
    ClassTitle,
    Property,
    Meta,
    Identifier,
    Punctuation,
}

impl TokenKind {
    /// Presentational class for the token, `None` for text emitted bare.
    pub fn class(self) -> Option<&'static str> {
        match self {
            TokenKind::Comment => Some("hljs-comment"),
            TokenKind::String | TokenKind::Template => Some("hljs-string"),
            TokenKind::Number => Some("hljs-number"),
            TokenKind::Keyword => Some("hljs-keyword"),
            TokenKind::Literal => Some("hljs-literal"),
            TokenKind::BuiltIn => Some("hljs-built_in"),
            TokenKind::LanguageVariable => Some("hljs-variable language_"),
            TokenKind::FunctionTitle => Some("hljs-title function_"),
            TokenKind::ClassTitle => Some("hljs-title class_"),
            TokenKind::Property => Some("hljs-property"),
            TokenKind::Meta => Some("hljs-meta"),
            TokenKind::Whitespace | TokenKind::Identifier | TokenKind::Punctuation => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TemplatePart<'a> {
    Text(&'a str),
    Subst { inner: &'a str, closed: bool },
}

/// Open construct while scanning a template literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    Template,
    Interpolation { braces: usize },
}

/// What the last significant token implies for the next identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Other,
    AfterDot,
    AfterFunction,
    AfterClass,
}

/// Split `source` into tokens whose texts concatenate back to `source`.
pub fn tokenize(source: &str, language: Language) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut scanner = Scanner::new(source);
    let mut context = Context::Other;

    while let Some(ch) = scanner.peek() {
        let start = scanner.pos;
        let kind = if ch.is_whitespace() {
            scanner.eat_while(char::is_whitespace);
            TokenKind::Whitespace
        } else if scanner.rest().starts_with("//") {
            scanner.eat_while(|c| c != '\n');
            TokenKind::Comment
        } else if scanner.rest().starts_with("/*") {
            scanner.skip_block_comment();
            TokenKind::Comment
        } else if ch == '\'' || ch == '"' {
            scanner.skip_string(ch);
            TokenKind::String
        } else if ch == '`' {
            scanner.skip_template();
            TokenKind::Template
        } else if ch.is_ascii_digit()
            || (ch == '.' && scanner.peek_nth(1).is_some_and(|c| c.is_ascii_digit()))
        {
            scanner.skip_number();
            TokenKind::Number
        } else if ch == '@' && scanner.peek_nth(1).is_some_and(is_ident_start) {
            scanner.bump();
            scanner.eat_while(is_ident_continue);
            TokenKind::Meta
        } else if is_ident_start(ch) {
            scanner.eat_while(is_ident_continue);
            let word = &source[start..scanner.pos];
            classify(word, context, scanner.next_on_line(), language)
        } else if scanner.rest().starts_with("...") {
            scanner.advance(3);
            TokenKind::Punctuation
        } else {
            scanner.bump();
            TokenKind::Punctuation
        };

        let text = &source[start..scanner.pos];
        context = match kind {
            TokenKind::Whitespace | TokenKind::Comment => context,
            TokenKind::Punctuation if text == "." => Context::AfterDot,
            TokenKind::Keyword if text == "function" => Context::AfterFunction,
            TokenKind::Keyword
                if matches!(text, "class" | "extends" | "implements" | "new" | "interface") =>
            {
                Context::AfterClass
            }
            _ => Context::Other,
        };

        // `?.` arrives as two punctuation tokens; keep the dot context for the member.
        if kind == TokenKind::Punctuation && text == "?" && scanner.peek() == Some('.') {
            let dot_start = scanner.pos;
            scanner.bump();
            tokens.push(Token { kind, text });
            tokens.push(Token {
                kind: TokenKind::Punctuation,
                text: &source[dot_start..scanner.pos],
            });
            context = Context::AfterDot;
            continue;
        }

        tokens.push(Token { kind, text });
    }

    tokens
}

fn classify(word: &str, context: Context, next: Option<char>, language: Language) -> TokenKind {
    let called = next == Some('(');
    if context == Context::AfterDot {
        return if called {
            TokenKind::FunctionTitle
        } else {
            TokenKind::Property
        };
    }
    if is_language_variable(word) {
        return TokenKind::LanguageVariable;
    }
    if is_keyword(word, language) {
        return TokenKind::Keyword;
    }
    if is_literal(word) {
        return TokenKind::Literal;
    }
    if is_built_in(word, language) {
        return TokenKind::BuiltIn;
    }
    match context {
        Context::AfterFunction => TokenKind::FunctionTitle,
        Context::AfterClass => TokenKind::ClassTitle,
        _ if called => TokenKind::FunctionTitle,
        _ => TokenKind::Identifier,
    }
}

/// Split a template literal token into literal text and `${...}` interpolations.
pub(crate) fn template_parts(text: &str) -> Vec<TemplatePart<'_>> {
    let mut parts = Vec::new();
    let mut scanner = Scanner::new(text);
    let mut segment_start = 0usize;

    while let Some(ch) = scanner.peek() {
        if ch == '\\' {
            scanner.bump();
            scanner.bump();
            continue;
        }
        if scanner.rest().starts_with("${") {
            if scanner.pos > segment_start {
                parts.push(TemplatePart::Text(&text[segment_start..scanner.pos]));
            }
            scanner.advance(2);
            let inner_start = scanner.pos;
            let closed = scanner.skip_interpolation();
            let inner_end = if closed { scanner.pos - 1 } else { scanner.pos };
            parts.push(TemplatePart::Subst {
                inner: &text[inner_start..inner_end],
                closed,
            });
            segment_start = scanner.pos;
            continue;
        }
        scanner.bump();
    }

    if segment_start < text.len() {
        parts.push(TemplatePart::Text(&text[segment_start..]));
    }
    parts
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphanumeric()
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Scanner { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn advance(&mut self, count: usize) {
        for _ in 0..count {
            self.bump();
        }
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !predicate(ch) {
                break;
            }
            self.bump();
        }
    }

    /// First character after spaces and tabs on the current line.
    fn next_on_line(&self) -> Option<char> {
        self.rest().trim_start_matches([' ', '\t']).chars().next()
    }

    fn skip_block_comment(&mut self) {
        self.advance(2);
        while self.peek().is_some() {
            if self.rest().starts_with("*/") {
                self.advance(2);
                return;
            }
            self.bump();
        }
    }

    /// Quoted strings end at the closing quote or the end of the line.
    fn skip_string(&mut self, quote: char) {
        self.bump();
        while let Some(ch) = self.peek() {
            match ch {
                '\\' => {
                    self.bump();
                    self.bump();
                }
                '\n' => return,
                _ => {
                    self.bump();
                    if ch == quote {
                        return;
                    }
                }
            }
        }
    }

    fn skip_template(&mut self) {
        self.bump();
        self.skip_nested(vec![Nesting::Template]);
    }

    /// Consume up to and including the `}` closing an interpolation opened just before.
    /// Returns false when the input ends first.
    fn skip_interpolation(&mut self) -> bool {
        self.skip_nested(vec![Nesting::Interpolation { braces: 1 }])
    }

    /// Scan until every open template and interpolation on `stack` is closed.
    fn skip_nested(&mut self, mut stack: Vec<Nesting>) -> bool {
        while let Some(frame) = stack.last_mut() {
            let Some(ch) = self.peek() else {
                return false;
            };
            match frame {
                Nesting::Template => {
                    if ch == '\\' {
                        self.bump();
                        self.bump();
                    } else if ch == '`' {
                        self.bump();
                        stack.pop();
                    } else if self.rest().starts_with("${") {
                        self.advance(2);
                        stack.push(Nesting::Interpolation { braces: 1 });
                    } else {
                        self.bump();
                    }
                }
                Nesting::Interpolation { braces } => match ch {
                    '{' => {
                        *braces += 1;
                        self.bump();
                    }
                    '}' => {
                        self.bump();
                        *braces -= 1;
                        if *braces == 0 {
                            stack.pop();
                        }
                    }
                    '\'' | '"' => self.skip_string(ch),
                    '`' => {
                        self.bump();
                        stack.push(Nesting::Template);
                    }
                    _ => {
                        self.bump();
                    }
                },
            }
        }
        true
    }

    fn skip_number(&mut self) {
        if self.peek() == Some('0')
            && matches!(self.peek_nth(1), Some('x' | 'X' | 'b' | 'B' | 'o' | 'O'))
        {
            self.advance(2);
            self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return;
        }

        self.eat_while(|c| c.is_ascii_digit() || c == '_');
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek_nth(1), Some('+' | '-')) {
                2
            } else {
                1
            };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.advance(digit_at);
                self.eat_while(|c| c.is_ascii_digit());
            }
        }
        if self.peek() == Some('n') {
            self.bump();
        }
    }
}
