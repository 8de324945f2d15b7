// File: src/parser.rs
//
// Recursive descent parser for the minipy interpreter.
// Transforms a sequence of tokens into an Abstract Syntax Tree (AST).
//
// The parser implements a traditional recursive descent parsing strategy with
// operator precedence for expressions. It supports:
// - Simple statements: expression, assignment, print, return
// - Compound statements: if/else, while, def (colon-headed, INDENT/DEDENT blocks)
// - Expression parsing with Python operator precedence
//   (or < and < not < comparison < additive < multiplicative < unary < ** < call)
//
// The parser uses a single-token lookahead and stops at the first malformed
// construct; no error recovery is attempted.

use crate::ast::{Expr, Stmt};
use crate::errors::MiniPyError;
use crate::lexer::{Token, TokenKind};

/// Parser maintains position in the token stream and provides methods to
/// parse statements and expressions
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    fn_depth: usize,
}

impl Parser {
    /// Creates a new parser from a vector of tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0, fn_depth: 0 }
    }

    /// Peek at the current token without consuming it
    fn peek(&self) -> &TokenKind {
        self.tokens.get(self.pos).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    /// Peek one token past the current one
    fn peek_next(&self) -> &TokenKind {
        self.tokens.get(self.pos + 1).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    /// Source line of the current token
    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    /// Consume and return the current token kind, then advance to the next
    fn advance(&mut self) -> TokenKind {
        let kind = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn check_punct(&self, c: char) -> bool {
        matches!(self.peek(), TokenKind::Punctuation(p) if *p == c)
    }

    fn check_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), TokenKind::Keyword(k) if k == kw)
    }

    fn match_keyword(&mut self, kw: &str) -> bool {
        if self.check_keyword(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume an operator token if it is one of `ops`, returning its text
    fn match_op(&mut self, ops: &[&str]) -> Option<String> {
        if let TokenKind::Operator(op) = self.peek() {
            if ops.contains(&op.as_str()) {
                let op = op.clone();
                self.advance();
                return Some(op);
            }
        }
        None
    }

    fn expect_punct(&mut self, c: char, context: &str) -> Result<(), MiniPyError> {
        if self.check_punct(c) {
            self.advance();
            Ok(())
        } else {
            Err(MiniPyError::parse(
                format!("expected '{}' {}, found {}", c, context, describe(self.peek())),
                self.line(),
            ))
        }
    }

    fn expect_newline(&mut self) -> Result<(), MiniPyError> {
        if matches!(self.peek(), TokenKind::Newline) {
            self.advance();
            Ok(())
        } else {
            Err(MiniPyError::parse(
                format!("expected newline after statement, found {}", describe(self.peek())),
                self.line(),
            ))
        }
    }

    /// Parse the entire token stream into a vector of statements.
    ///
    /// Consumes exactly one EOF at the end; anything left over after it is a
    /// ParseError.
    pub fn parse(&mut self) -> Result<Vec<Stmt>, MiniPyError> {
        let mut stmts = Vec::new();
        while !matches!(self.peek(), TokenKind::Eof) {
            // Stray newlines between statements carry no content
            if matches!(self.peek(), TokenKind::Newline) {
                self.advance();
                continue;
            }
            stmts.push(self.statement()?);
        }
        self.advance(); // consume EOF
        if self.pos < self.tokens.len() {
            return Err(MiniPyError::parse("unexpected input after end of file", self.line()));
        }
        Ok(stmts)
    }

    fn statement(&mut self) -> Result<Stmt, MiniPyError> {
        match self.peek() {
            TokenKind::Keyword(k) if k == "if" => self.if_statement(),
            TokenKind::Keyword(k) if k == "while" => self.while_statement(),
            TokenKind::Keyword(k) if k == "def" => self.func_def(),
            TokenKind::Keyword(k) if k == "return" => self.return_statement(),
            TokenKind::Keyword(k) if k == "print" => self.print_statement(),
            TokenKind::Identifier(_)
                if matches!(self.peek_next(), TokenKind::Operator(op) if op == "=") =>
            {
                self.assignment()
            }
            _ => {
                let expr = self.expression()?;
                self.expect_newline()?;
                Ok(Stmt::ExprStmt(expr))
            }
        }
    }

    fn assignment(&mut self) -> Result<Stmt, MiniPyError> {
        let line = self.line();
        let name = match self.advance() {
            TokenKind::Identifier(n) => n,
            kind => {
                return Err(MiniPyError::parse(
                    format!("expected identifier, found {}", describe(&kind)),
                    line,
                ));
            }
        };
        self.advance(); // =
        let value = self.expression()?;
        self.expect_newline()?;
        Ok(Stmt::Assign { name, value, line })
    }

    fn print_statement(&mut self) -> Result<Stmt, MiniPyError> {
        let line = self.line();
        self.advance(); // print
        self.expect_punct('(', "after 'print'")?;
        let expr = self.expression()?;
        self.expect_punct(')', "after print argument")?;
        self.expect_newline()?;
        Ok(Stmt::Print { expr, line })
    }

    fn return_statement(&mut self) -> Result<Stmt, MiniPyError> {
        let line = self.line();
        self.advance(); // return
        if self.fn_depth == 0 {
            return Err(MiniPyError::parse("'return' outside function", line));
        }
        let value = if matches!(self.peek(), TokenKind::Newline) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_newline()?;
        Ok(Stmt::Return { value, line })
    }

    fn if_statement(&mut self) -> Result<Stmt, MiniPyError> {
        self.advance(); // if
        let condition = self.expression()?;
        let then_branch = self.block()?;
        let else_branch = if self.match_keyword("else") {
            Some(self.block()?)
        } else {
            None
        };
        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    fn while_statement(&mut self) -> Result<Stmt, MiniPyError> {
        self.advance(); // while
        let condition = self.expression()?;
        let body = self.block()?;
        Ok(Stmt::While { condition, body })
    }

    fn func_def(&mut self) -> Result<Stmt, MiniPyError> {
        let line = self.line();
        self.advance(); // def
        let name = match self.advance() {
            TokenKind::Identifier(n) => n,
            kind => {
                return Err(MiniPyError::parse(
                    format!("expected function name after 'def', found {}", describe(&kind)),
                    line,
                ));
            }
        };
        self.expect_punct('(', "after function name")?;
        let mut params = Vec::new();
        if !self.check_punct(')') {
            loop {
                match self.advance() {
                    TokenKind::Identifier(p) => params.push(p),
                    kind => {
                        return Err(MiniPyError::parse(
                            format!("expected parameter name, found {}", describe(&kind)),
                            self.line(),
                        ));
                    }
                }
                if self.check_punct(',') {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect_punct(')', "after parameters")?;
        self.fn_depth += 1;
        let body = self.block();
        self.fn_depth -= 1;
        Ok(Stmt::FuncDef { name, params, body: body?, line })
    }

    /// Parse a colon-headed indented block: `:` NEWLINE INDENT stmt+ DEDENT.
    /// An empty block (no INDENT after the colon-newline) is a ParseError.
    fn block(&mut self) -> Result<Vec<Stmt>, MiniPyError> {
        self.expect_punct(':', "before block")?;
        if !matches!(self.peek(), TokenKind::Newline) {
            return Err(MiniPyError::parse(
                format!("expected newline after ':', found {}", describe(self.peek())),
                self.line(),
            ));
        }
        self.advance();
        if !matches!(self.peek(), TokenKind::Indent) {
            return Err(MiniPyError::parse("expected an indented block", self.line()));
        }
        self.advance();

        let mut stmts = Vec::new();
        while !matches!(self.peek(), TokenKind::Dedent | TokenKind::Eof) {
            if matches!(self.peek(), TokenKind::Newline) {
                self.advance();
                continue;
            }
            stmts.push(self.statement()?);
        }
        if stmts.is_empty() {
            return Err(MiniPyError::parse("expected an indented block", self.line()));
        }
        if !matches!(self.peek(), TokenKind::Dedent) {
            return Err(MiniPyError::parse(
                format!("expected dedent at end of block, found {}", describe(self.peek())),
                self.line(),
            ));
        }
        self.advance();
        Ok(stmts)
    }

    // Expression grammar, lowest precedence first.

    fn expression(&mut self) -> Result<Expr, MiniPyError> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Expr, MiniPyError> {
        let mut expr = self.and_expr()?;
        while self.check_keyword("or") {
            let line = self.line();
            self.advance();
            let right = self.and_expr()?;
            expr = Expr::BinaryOp {
                left: Box::new(expr),
                op: "or".into(),
                right: Box::new(right),
                line,
            };
        }
        Ok(expr)
    }

    fn and_expr(&mut self) -> Result<Expr, MiniPyError> {
        let mut expr = self.not_expr()?;
        while self.check_keyword("and") {
            let line = self.line();
            self.advance();
            let right = self.not_expr()?;
            expr = Expr::BinaryOp {
                left: Box::new(expr),
                op: "and".into(),
                right: Box::new(right),
                line,
            };
        }
        Ok(expr)
    }

    fn not_expr(&mut self) -> Result<Expr, MiniPyError> {
        if self.check_keyword("not") {
            let line = self.line();
            self.advance();
            let operand = self.not_expr()?;
            return Ok(Expr::UnaryOp { op: "not".into(), operand: Box::new(operand), line });
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, MiniPyError> {
        let mut expr = self.additive()?;
        loop {
            let line = self.line();
            match self.match_op(&["==", "!=", "<", "<=", ">", ">="]) {
                Some(op) => {
                    let right = self.additive()?;
                    expr = Expr::BinaryOp { left: Box::new(expr), op, right: Box::new(right), line };
                }
                None => break,
            }
        }
        Ok(expr)
    }

    fn additive(&mut self) -> Result<Expr, MiniPyError> {
        let mut expr = self.multiplicative()?;
        loop {
            let line = self.line();
            match self.match_op(&["+", "-"]) {
                Some(op) => {
                    let right = self.multiplicative()?;
                    expr = Expr::BinaryOp { left: Box::new(expr), op, right: Box::new(right), line };
                }
                None => break,
            }
        }
        Ok(expr)
    }

    fn multiplicative(&mut self) -> Result<Expr, MiniPyError> {
        let mut expr = self.unary()?;
        loop {
            let line = self.line();
            match self.match_op(&["*", "/", "//", "%"]) {
                Some(op) => {
                    let right = self.unary()?;
                    expr = Expr::BinaryOp { left: Box::new(expr), op, right: Box::new(right), line };
                }
                None => break,
            }
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, MiniPyError> {
        let line = self.line();
        if let Some(op) = self.match_op(&["-", "+"]) {
            let operand = self.unary()?;
            return Ok(Expr::UnaryOp { op, operand: Box::new(operand), line });
        }
        self.power()
    }

    /// `**` is right-associative and binds tighter than unary minus on its
    /// left, while its right operand re-enters unary (so `2 ** -1` parses).
    fn power(&mut self) -> Result<Expr, MiniPyError> {
        let base = self.call()?;
        let line = self.line();
        if self.match_op(&["**"]).is_some() {
            let right = self.unary()?;
            return Ok(Expr::BinaryOp {
                left: Box::new(base),
                op: "**".into(),
                right: Box::new(right),
                line,
            });
        }
        Ok(base)
    }

    fn call(&mut self) -> Result<Expr, MiniPyError> {
        let mut expr = self.primary()?;
        while self.check_punct('(') {
            let line = self.line();
            self.advance();
            let mut args = Vec::new();
            if !self.check_punct(')') {
                loop {
                    args.push(self.expression()?);
                    if self.check_punct(',') {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
            self.expect_punct(')', "after arguments")?;
            expr = Expr::Call { callee: Box::new(expr), args, line };
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, MiniPyError> {
        let line = self.line();
        match self.advance() {
            TokenKind::Int(n) => Ok(Expr::Int(n)),
            TokenKind::Float(f) => Ok(Expr::Float(f)),
            TokenKind::Str(s) => Ok(Expr::Str(s)),
            TokenKind::Keyword(k) if k == "True" => Ok(Expr::Bool(true)),
            TokenKind::Keyword(k) if k == "False" => Ok(Expr::Bool(false)),
            TokenKind::Keyword(k) if k == "None" => Ok(Expr::NoneLiteral),
            TokenKind::Identifier(name) => Ok(Expr::Identifier { name, line }),
            TokenKind::Punctuation('(') => {
                let inner = self.expression()?;
                self.expect_punct(')', "after expression")?;
                Ok(Expr::Grouping(Box::new(inner)))
            }
            kind => Err(MiniPyError::parse(
                format!("unexpected {}", describe(&kind)),
                line,
            )),
        }
    }
}

/// Human-readable token description for error messages
fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Identifier(name) => format!("identifier '{}'", name),
        TokenKind::Int(n) => format!("number '{}'", n),
        TokenKind::Float(f) => format!("number '{}'", f),
        TokenKind::Str(_) => "string literal".to_string(),
        TokenKind::Keyword(k) => format!("keyword '{}'", k),
        TokenKind::Operator(op) => format!("'{}'", op),
        TokenKind::Punctuation(c) => format!("'{}'", c),
        TokenKind::Newline => "newline".to_string(),
        TokenKind::Indent => "indent".to_string(),
        TokenKind::Dedent => "dedent".to_string(),
        TokenKind::Eof => "end of file".to_string(),
    }
}
