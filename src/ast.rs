// File: src/ast.rs
//
// Abstract Syntax Tree (AST) definitions for the minipy interpreter.
// Defines the structure of parsed programs.
//
// Expressions (Expr) represent values and computations, while Statements
// (Stmt) represent actions and control flow. Each node owns its children
// exclusively; the tree has no sharing and no cycles. Nodes that can trigger
// runtime errors carry the source line they came from.

/// Represents an expression - something that evaluates to a value
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    NoneLiteral,
    Identifier {
        name: String,
        line: usize,
    },
    UnaryOp {
        op: String,
        operand: Box<Expr>,
        line: usize,
    },
    BinaryOp {
        left: Box<Expr>,
        op: String,
        right: Box<Expr>,
        line: usize,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        line: usize,
    },
    Grouping(Box<Expr>),
}

/// Represents a statement - an action or declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    ExprStmt(Expr),
    Print {
        expr: Expr,
        line: usize,
    },
    Assign {
        name: String,
        value: Expr,
        line: usize,
    },
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    FuncDef {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
        line: usize,
    },
    Return {
        value: Option<Expr>,
        line: usize,
    },
}
