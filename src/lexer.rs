// File: src/lexer.rs
//
// Lexical analyzer (tokenizer) for the minipy interpreter.
// Converts source code text into a stream of tokens for parsing.
//
// Supports:
// - Keywords: if, else, while, def, return, print, True, False, None, and, or, not
// - Identifiers, integer and float literals
// - String literals with escape sequences
// - Operators: +, -, *, /, //, %, **, ==, !=, <, <=, >, >=, =
// - Punctuation: ( ) : ,
// - Comments starting with #
// - Python-style significant indentation (NEWLINE/INDENT/DEDENT tokens)

use crate::errors::MiniPyError;
use once_cell::sync::Lazy;
use std::collections::HashSet;

static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "if", "else", "while", "def", "return", "print", "True", "False", "None", "and", "or",
        "not",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Int(i64),
    Float(f64),
    Str(String),
    Keyword(String),
    Operator(String),
    Punctuation(char),
    Newline,
    Indent,
    Dedent,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

/// Tokenizes minipy source code into a vector of tokens.
///
/// Processes the input character by character, recognizing keywords,
/// identifiers, numbers, strings, operators, and punctuation. Comments
/// starting with # are skipped until end of line. Leading whitespace on each
/// logical line is folded into INDENT/DEDENT tokens by tracking a stack of
/// indentation widths; blank and comment-only lines never affect that stack.
///
/// The token stream always ends with a NEWLINE (supplied if the source lacks
/// a trailing one), one DEDENT per still-open indentation level, and a single
/// EOF token.
///
/// # Errors
/// Returns a `LexError` on an unrecognized character, an unterminated string
/// literal, a tab in leading indentation, a decimal point with no following
/// digit, or a dedent that matches no enclosing indentation level.
pub fn tokenize(source: &str) -> Result<Vec<Token>, MiniPyError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    paren_depth: usize,
    indent_stack: Vec<usize>,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            paren_depth: 0,
            indent_stack: vec![0],
            tokens: Vec::new(),
        }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token { kind, line: self.line });
    }

    fn at_line_start(&self) -> bool {
        matches!(self.tokens.last(), None | Some(Token { kind: TokenKind::Newline, .. }))
    }

    fn run(mut self) -> Result<Vec<Token>, MiniPyError> {
        while !self.is_done() {
            // Indentation only matters at the start of a logical line, and
            // newlines inside parentheses do not start one.
            if self.at_line_start() && self.paren_depth == 0 {
                self.handle_indentation()?;
                if self.is_done() {
                    break;
                }
            }
            self.scan_token()?;
        }

        if !matches!(self.tokens.last(), None | Some(Token { kind: TokenKind::Newline, .. })) {
            self.push(TokenKind::Newline);
        }
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.push(TokenKind::Dedent);
        }
        self.push(TokenKind::Eof);

        Ok(self.tokens)
    }

    /// Measures the leading whitespace of the next non-blank line and emits
    /// INDENT/DEDENT tokens against the indentation stack. Blank lines and
    /// comment-only lines are consumed here without touching the stack.
    fn handle_indentation(&mut self) -> Result<(), MiniPyError> {
        loop {
            let mut width = 0;
            loop {
                match self.peek() {
                    Some(' ') => {
                        self.advance();
                        width += 1;
                    }
                    Some('\t') => {
                        return Err(MiniPyError::lex(
                            "tabs are not allowed in indentation",
                            self.line,
                        ));
                    }
                    _ => break,
                }
            }

            match self.peek() {
                // Blank line: skip without affecting the stack
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                }
                // Comment-only line: same treatment
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                None => return Ok(()),
                Some(_) => {
                    let current = *self.indent_stack.last().unwrap_or(&0);
                    if width > current {
                        self.indent_stack.push(width);
                        self.push(TokenKind::Indent);
                    } else if width < current {
                        while width < *self.indent_stack.last().unwrap_or(&0) {
                            self.indent_stack.pop();
                            self.push(TokenKind::Dedent);
                        }
                        if width != *self.indent_stack.last().unwrap_or(&0) {
                            return Err(MiniPyError::lex(
                                "unindent does not match any outer indentation level",
                                self.line,
                            ));
                        }
                    }
                    return Ok(());
                }
            }
        }
    }

    fn scan_token(&mut self) -> Result<(), MiniPyError> {
        let c = match self.advance() {
            Some(c) => c,
            None => return Ok(()),
        };

        match c {
            ' ' => {}
            '#' => {
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
            }
            '\n' => {
                // Implicit line joining: newlines inside parentheses are
                // whitespace, not statement terminators.
                if self.paren_depth == 0 {
                    self.push(TokenKind::Newline);
                }
                self.line += 1;
            }
            '"' | '\'' => self.scan_string(c)?,
            '0'..='9' => self.scan_number(c)?,
            'a'..='z' | 'A'..='Z' | '_' => self.scan_identifier(c),
            '(' => {
                self.paren_depth += 1;
                self.push(TokenKind::Punctuation('('));
            }
            ')' => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                self.push(TokenKind::Punctuation(')'));
            }
            ':' | ',' => self.push(TokenKind::Punctuation(c)),
            '+' | '-' | '%' => self.push(TokenKind::Operator(c.to_string())),
            '*' => {
                if self.peek() == Some('*') {
                    self.advance();
                    self.push(TokenKind::Operator("**".into()));
                } else {
                    self.push(TokenKind::Operator("*".into()));
                }
            }
            '/' => {
                if self.peek() == Some('/') {
                    self.advance();
                    self.push(TokenKind::Operator("//".into()));
                } else {
                    self.push(TokenKind::Operator("/".into()));
                }
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.push(TokenKind::Operator("==".into()));
                } else {
                    self.push(TokenKind::Operator("=".into()));
                }
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.push(TokenKind::Operator("<=".into()));
                } else {
                    self.push(TokenKind::Operator("<".into()));
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.push(TokenKind::Operator(">=".into()));
                } else {
                    self.push(TokenKind::Operator(">".into()));
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.push(TokenKind::Operator("!=".into()));
                } else {
                    return Err(MiniPyError::lex("unexpected character '!'", self.line));
                }
            }
            _ => {
                return Err(MiniPyError::lex(
                    format!("unexpected character '{}'", c),
                    self.line,
                ));
            }
        }

        Ok(())
    }

    fn scan_string(&mut self, quote: char) -> Result<(), MiniPyError> {
        let mut s = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(MiniPyError::lex("unterminated string literal", self.line));
                }
                Some(ch) if ch == quote => break,
                Some('\\') => match self.advance() {
                    None => {
                        return Err(MiniPyError::lex("unterminated string literal", self.line));
                    }
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('\\') => s.push('\\'),
                    Some('"') => s.push('"'),
                    Some('\'') => s.push('\''),
                    Some(esc) => s.push(esc),
                },
                Some(ch) => s.push(ch),
            }
        }
        self.push(TokenKind::Str(s));
        Ok(())
    }

    fn scan_number(&mut self, first: char) -> Result<(), MiniPyError> {
        let mut num = String::new();
        num.push(first);
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if self.peek() == Some('.') {
            self.advance();
            num.push('.');
            if !self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                return Err(MiniPyError::lex("invalid decimal literal", self.line));
            }
            while let Some(ch) = self.peek() {
                if ch.is_ascii_digit() {
                    num.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            let value: f64 = num
                .parse()
                .map_err(|_| MiniPyError::lex("invalid float literal", self.line))?;
            self.push(TokenKind::Float(value));
        } else {
            let value: i64 = num
                .parse()
                .map_err(|_| MiniPyError::lex("integer literal too large", self.line))?;
            self.push(TokenKind::Int(value));
        }
        Ok(())
    }

    fn scan_identifier(&mut self, first: char) {
        let mut ident = String::new();
        ident.push(first);
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = if KEYWORDS.contains(ident.as_str()) {
            TokenKind::Keyword(ident)
        } else {
            TokenKind::Identifier(ident)
        };
        self.push(kind);
    }
}
