// File: src/errors.rs
//
// Error handling and reporting for the minipy interpreter.
// Provides structured error types with source line information
// and uniformly formatted diagnostic messages.

use colored::Colorize;
use std::fmt;

/// Kinds of errors that can occur while lexing, parsing, or evaluating.
///
/// Every error kind maps to exactly one diagnostic format:
/// `<ErrorKind>: <message> (line <n>)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexError,
    ParseError,
    NameError,
    TypeError,
    ArityError,
    ZeroDivisionError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::LexError => write!(f, "LexError"),
            ErrorKind::ParseError => write!(f, "ParseError"),
            ErrorKind::NameError => write!(f, "NameError"),
            ErrorKind::TypeError => write!(f, "TypeError"),
            ErrorKind::ArityError => write!(f, "ArityError"),
            ErrorKind::ZeroDivisionError => write!(f, "ZeroDivisionError"),
        }
    }
}

/// A structured error with the source line that triggered it
#[derive(Debug, Clone, PartialEq)]
pub struct MiniPyError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
}

impl MiniPyError {
    pub fn new(kind: ErrorKind, message: String, line: usize) -> Self {
        Self { kind, message, line }
    }

    /// Create a lex error (bad character, bad indentation, unterminated string)
    pub fn lex(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::LexError, message.into(), line)
    }

    /// Create a parse error (unexpected token, missing colon, empty block)
    pub fn parse(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::ParseError, message.into(), line)
    }

    /// Create a name error for an undefined or undeclared variable
    pub fn name(name: &str, line: usize) -> Self {
        Self::new(
            ErrorKind::NameError,
            format!("name '{}' is not defined", name),
            line,
        )
    }

    /// Create a type error (calling a non-function, invalid operand types)
    pub fn type_error(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::TypeError, message.into(), line)
    }

    /// Create an arity error for a call with the wrong argument count
    pub fn arity(name: &str, expected: usize, got: usize, line: usize) -> Self {
        Self::new(
            ErrorKind::ArityError,
            format!("{}() takes {} arguments but {} were given", name, expected, got),
            line,
        )
    }

    /// Create a zero-division error
    pub fn zero_division(line: usize) -> Self {
        Self::new(ErrorKind::ZeroDivisionError, "division by zero".to_string(), line)
    }

    /// Plain, uncolored diagnostic text. Used by tests and anywhere the
    /// exact `<ErrorKind>: <message> (line <n>)` format matters.
    pub fn diagnostic(&self) -> String {
        format!("{}: {} (line {})", self.kind, self.message, self.line)
    }
}

impl fmt::Display for MiniPyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind_str = format!("{}", self.kind);
        write!(
            f,
            "{}: {} {}",
            kind_str.red().bold(),
            self.message,
            format!("(line {})", self.line).bright_blue()
        )
    }
}

impl std::error::Error for MiniPyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_format_is_stable() {
        let err = MiniPyError::zero_division(3);
        assert_eq!(err.diagnostic(), "ZeroDivisionError: division by zero (line 3)");
    }

    #[test]
    fn name_error_message_matches_python() {
        let err = MiniPyError::name("spam", 7);
        assert_eq!(err.diagnostic(), "NameError: name 'spam' is not defined (line 7)");
    }

    #[test]
    fn arity_error_reports_counts() {
        let err = MiniPyError::arity("fib", 1, 3, 12);
        assert_eq!(
            err.diagnostic(),
            "ArityError: fib() takes 1 arguments but 3 were given (line 12)"
        );
    }
}
