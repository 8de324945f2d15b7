// File: src/repl.rs
//
// Interactive REPL (Read-Eval-Print Loop) for the minipy interpreter.
// Provides an interactive shell for executing minipy code with:
// - Multi-line input for indented blocks (if/while/def)
// - Command history with up/down arrow navigation
// - Special commands (:help, :quit, :reset)
// - A persistent top-level environment across the whole session
// - Bare expression results echoed like the interactive Python interpreter

use crate::ast::Stmt;
use crate::interpreter::{Interpreter, Value};
use crate::lexer;
use crate::parser::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// REPL session that maintains interpreter state and handles user interaction
pub struct Repl {
    interpreter: Interpreter,
    editor: DefaultEditor,
}

impl Repl {
    /// Creates a new REPL session with a fresh interpreter
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let editor = DefaultEditor::new()?;
        Ok(Repl { interpreter: Interpreter::new(), editor })
    }

    fn show_banner(&self) {
        println!(
            "{} {}",
            "minipy".bright_cyan().bold(),
            format!("v{}", env!("CARGO_PKG_VERSION")).bright_cyan()
        );
        println!(
            "Type {} for commands, {} or Ctrl+D to leave.",
            ":help".bright_yellow(),
            ":quit".bright_yellow()
        );
        println!("Finish an indented block with a blank line.");
        println!();
    }

    /// Starts the REPL loop
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.show_banner();

        let mut buffer = String::new();

        loop {
            let prompt = if buffer.is_empty() {
                ">>> ".bright_green().to_string()
            } else {
                "... ".bright_blue().to_string()
            };

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }

                    if buffer.is_empty() && line.trim_start().starts_with(':') {
                        if self.handle_command(line.trim()) {
                            continue;
                        } else {
                            break; // :quit was called
                        }
                    }

                    buffer.push_str(&line);
                    buffer.push('\n');

                    if self.is_input_complete(&buffer) {
                        self.eval_input(&buffer);
                        buffer.clear();
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "KeyboardInterrupt".bright_yellow());
                    buffer.clear();
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    eprintln!("{} {}", "Error:".bright_red(), err);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handles special REPL commands starting with ':'.
    /// Returns true to continue the REPL, false to quit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":help" | ":h" => {
                self.show_help();
                true
            }
            ":quit" | ":q" | ":exit" => false,
            ":reset" | ":r" => {
                self.interpreter = Interpreter::new();
                println!("{}", "environment reset".bright_green());
                true
            }
            _ => {
                println!(
                    "{} unknown command {}; type {} for a list",
                    "Error:".bright_red(),
                    cmd.bright_yellow(),
                    ":help".bright_yellow()
                );
                true
            }
        }
    }

    fn show_help(&self) {
        println!();
        println!("{}", "Commands:".bright_cyan().bold());
        println!("  {}  show this help", ":help / :h ".bright_yellow());
        println!("  {}  leave the REPL", ":quit / :q ".bright_yellow());
        println!("  {}  reset the environment", ":reset / :r".bright_yellow());
        println!();
        println!("{}", "Input:".bright_cyan().bold());
        println!("  A line ending in ':' opens a block; keep typing the");
        println!("  indented body and finish with a blank line.");
        println!();
        println!("  {}", ">>> def double(n):".dimmed());
        println!("  {}", "...     return n * 2".dimmed());
        println!("  {}", "...".dimmed());
        println!("  {}", ">>> double(21)".dimmed());
        println!("  {}", "42".dimmed());
        println!();
    }

    /// Checks whether the accumulated input forms a complete logical
    /// statement: parentheses balanced, and any open indented block closed
    /// by a blank line (the interactive Python convention).
    fn is_input_complete(&self, buffer: &str) -> bool {
        if buffer.trim().is_empty() {
            return true;
        }

        if open_paren_count(buffer) > 0 {
            return false;
        }

        let opens_block = buffer.lines().any(line_opens_block);
        if opens_block {
            // The final entered line must be blank to close the block
            return buffer.ends_with("\n\n");
        }
        true
    }

    /// Evaluates the input and displays results and errors
    fn eval_input(&mut self, input: &str) {
        if input.trim().is_empty() {
            return;
        }

        let stmts = match lexer::tokenize(input).and_then(|tokens| Parser::new(tokens).parse()) {
            Ok(stmts) => stmts,
            Err(err) => {
                eprintln!("{}", err);
                return;
            }
        };

        for stmt in &stmts {
            let result = match stmt {
                // Bare expressions echo their value, like interactive Python
                Stmt::ExprStmt(expr) => match self.interpreter.eval_expr_repl(expr) {
                    Ok(Value::None) => Ok(()),
                    Ok(value) => {
                        println!("{}", value.repr());
                        Ok(())
                    }
                    Err(err) => Err(err),
                },
                _ => self.interpreter.eval_stmt_repl(stmt),
            };
            if let Err(err) = result {
                // Abort this input only; state committed by prior
                // statements stays intact
                eprintln!("{}", err);
                return;
            }
        }
    }
}

/// Number of parentheses left open in `source`, ignoring strings and comments
fn open_paren_count(source: &str) -> i32 {
    let mut depth = 0;
    let mut in_string = false;
    let mut quote = '"';
    let mut escape_next = false;
    let mut in_comment = false;

    for ch in source.chars() {
        if in_comment {
            if ch == '\n' {
                in_comment = false;
            }
            continue;
        }
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' | '\'' if in_string && ch == quote => in_string = false,
            '"' | '\'' if !in_string => {
                in_string = true;
                quote = ch;
            }
            '\n' if in_string => in_string = false, // unterminated; the lexer will complain
            '#' if !in_string => in_comment = true,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth
}

/// True if the line's last effective character (outside strings and
/// comments) is a colon, i.e. it opens an indented block
fn line_opens_block(line: &str) -> bool {
    let mut last = None;
    let mut in_string = false;
    let mut quote = '"';
    let mut escape_next = false;

    for ch in line.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' | '\'' if in_string && ch == quote => {
                in_string = false;
                last = Some(ch);
            }
            '"' | '\'' if !in_string => {
                in_string = true;
                quote = ch;
                last = Some(ch);
            }
            '#' if !in_string => break,
            c if c.is_whitespace() => {}
            c => last = Some(c),
        }
    }
    last == Some(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_statement_is_complete() {
        let repl = Repl::new();
        // Rustyline may fail without a tty; fall back to testing the free fns
        if let Ok(repl) = repl {
            assert!(repl.is_input_complete("x = 1\n"));
            assert!(!repl.is_input_complete("if x:\n"));
            assert!(!repl.is_input_complete("if x:\n    print(x)\n"));
            assert!(repl.is_input_complete("if x:\n    print(x)\n\n"));
        }
    }

    #[test]
    fn colon_detection_ignores_comments_and_strings() {
        assert!(line_opens_block("while True:"));
        assert!(line_opens_block("if x > 1:  # start block"));
        assert!(!line_opens_block("print(\"a:\")"));
        assert!(!line_opens_block("x = 1"));
    }

    #[test]
    fn paren_counting_ignores_strings() {
        assert_eq!(open_paren_count("print(1 + 2"), 1);
        assert_eq!(open_paren_count("print(\"(\")"), 0);
        assert_eq!(open_paren_count("f(g(1), 2)"), 0);
    }
}
