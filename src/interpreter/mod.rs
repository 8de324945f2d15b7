// File: src/interpreter/mod.rs
//
// Tree-walk evaluator for the minipy interpreter.
//
// Walks the AST produced by the parser, executing statements and evaluating
// expressions against a chain of environments. Statement execution returns
// `Result<ControlFlow, MiniPyError>`: errors abort the current program (or
// REPL input) while `ControlFlow::Return` unwinds explicitly to the nearest
// function-call frame. Expression evaluation produces `Value`s with Python
// numeric semantics: int/int arithmetic stays exact, `/` always produces a
// float, and `//` / `%` follow floor semantics (the result sign follows the
// divisor).

mod control_flow;
pub mod environment;
pub mod value;

pub use environment::Environment;
pub use value::Value;

use crate::ast::{Expr, Stmt};
use crate::errors::MiniPyError;
use control_flow::ControlFlow;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

/// The evaluator. Holds the global environment for the lifetime of a program
/// run or REPL session, plus an optional captured output sink used by tests.
pub struct Interpreter {
    env: Rc<RefCell<Environment>>,
    output: Option<Arc<Mutex<Vec<u8>>>>,
}

impl Interpreter {
    /// Create an interpreter with a fresh global environment
    pub fn new() -> Self {
        Interpreter { env: Environment::new_shared(), output: None }
    }

    /// Redirect `print` output into a shared buffer instead of stdout.
    /// Used by integration tests to assert on program output.
    pub fn set_output(&mut self, output: Arc<Mutex<Vec<u8>>>) {
        self.output = Some(output);
    }

    /// The global environment for this session
    pub fn env(&self) -> &Rc<RefCell<Environment>> {
        &self.env
    }

    fn write_output(&self, msg: &str) {
        match &self.output {
            Some(buffer) => {
                if let Ok(mut buffer) = buffer.lock() {
                    let _ = writeln!(buffer, "{}", msg);
                }
            }
            None => println!("{}", msg),
        }
    }

    /// Run a whole program against the global environment.
    ///
    /// The parser rejects `return` outside a function, so `ControlFlow::Return`
    /// can never surface here.
    pub fn run(&mut self, stmts: &[Stmt]) -> Result<(), MiniPyError> {
        let env = Rc::clone(&self.env);
        for stmt in stmts {
            self.exec_stmt(stmt, &env)?;
        }
        Ok(())
    }

    /// Execute a single statement in the persistent REPL environment
    pub fn eval_stmt_repl(&mut self, stmt: &Stmt) -> Result<(), MiniPyError> {
        let env = Rc::clone(&self.env);
        self.exec_stmt(stmt, &env)?;
        Ok(())
    }

    /// Evaluate a bare expression in the persistent REPL environment
    pub fn eval_expr_repl(&mut self, expr: &Expr) -> Result<Value, MiniPyError> {
        let env = Rc::clone(&self.env);
        self.eval_expr(expr, &env)
    }

    fn exec_block(
        &mut self,
        stmts: &[Stmt],
        env: &Rc<RefCell<Environment>>,
    ) -> Result<ControlFlow, MiniPyError> {
        for stmt in stmts {
            match self.exec_stmt(stmt, env)? {
                ControlFlow::Return(value) => return Ok(ControlFlow::Return(value)),
                ControlFlow::None => {}
            }
        }
        Ok(ControlFlow::None)
    }

    fn exec_stmt(
        &mut self,
        stmt: &Stmt,
        env: &Rc<RefCell<Environment>>,
    ) -> Result<ControlFlow, MiniPyError> {
        match stmt {
            Stmt::ExprStmt(expr) => {
                self.eval_expr(expr, env)?;
                Ok(ControlFlow::None)
            }
            Stmt::Print { expr, .. } => {
                let value = self.eval_expr(expr, env)?;
                self.write_output(&value.to_string());
                Ok(ControlFlow::None)
            }
            Stmt::Assign { name, value, line } => {
                let value = self.eval_expr(value, env)?;
                // First occurrence declares in the current scope; later
                // occurrences mutate the innermost scope that declares it.
                let declared = env.borrow().is_declared(name);
                if declared {
                    env.borrow_mut().assign(name, value, *line)?;
                } else {
                    env.borrow_mut().define(name.clone(), value);
                }
                Ok(ControlFlow::None)
            }
            Stmt::If { condition, then_branch, else_branch } => {
                let condition = self.eval_expr(condition, env)?;
                if condition.is_truthy() {
                    let scope = Environment::child(Rc::clone(env));
                    self.exec_block(then_branch, &scope)
                } else if let Some(else_branch) = else_branch {
                    let scope = Environment::child(Rc::clone(env));
                    self.exec_block(else_branch, &scope)
                } else {
                    Ok(ControlFlow::None)
                }
            }
            Stmt::While { condition, body } => {
                while self.eval_expr(condition, env)?.is_truthy() {
                    let scope = Environment::child(Rc::clone(env));
                    match self.exec_block(body, &scope)? {
                        ControlFlow::Return(value) => return Ok(ControlFlow::Return(value)),
                        ControlFlow::None => {}
                    }
                }
                Ok(ControlFlow::None)
            }
            Stmt::FuncDef { name, params, body, .. } => {
                let function = Value::Function {
                    name: name.clone(),
                    params: params.clone(),
                    body: Rc::new(body.clone()),
                    env: Rc::clone(env),
                };
                env.borrow_mut().define(name.clone(), function);
                Ok(ControlFlow::None)
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::None,
                };
                Ok(ControlFlow::Return(value))
            }
        }
    }

    fn eval_expr(
        &mut self,
        expr: &Expr,
        env: &Rc<RefCell<Environment>>,
    ) -> Result<Value, MiniPyError> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(x) => Ok(Value::Float(*x)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::NoneLiteral => Ok(Value::None),
            Expr::Identifier { name, line } => env.borrow().get(name, *line),
            Expr::Grouping(inner) => self.eval_expr(inner, env),
            Expr::UnaryOp { op, operand, line } => {
                let value = self.eval_expr(operand, env)?;
                unary_op(op, value, *line)
            }
            Expr::BinaryOp { left, op, right, .. } if op == "and" => {
                let left = self.eval_expr(left, env)?;
                if left.is_truthy() {
                    self.eval_expr(right, env)
                } else {
                    Ok(left)
                }
            }
            Expr::BinaryOp { left, op, right, .. } if op == "or" => {
                let left = self.eval_expr(left, env)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.eval_expr(right, env)
                }
            }
            Expr::BinaryOp { left, op, right, line } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                binary_op(op, left, right, *line)
            }
            Expr::Call { callee, args, line } => {
                let callee = self.eval_expr(callee, env)?;
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.eval_expr(arg, env)?);
                }
                self.call_function(callee, arg_values, *line)
            }
        }
    }

    /// Call a function value: a new scope is created as a child of the
    /// *captured defining* environment (not the caller's), parameters are
    /// bound to the evaluated arguments, and the body runs until it returns.
    fn call_function(
        &mut self,
        callee: Value,
        args: Vec<Value>,
        line: usize,
    ) -> Result<Value, MiniPyError> {
        let (name, params, body, captured) = match callee {
            Value::Function { name, params, body, env } => (name, params, body, env),
            other => {
                return Err(MiniPyError::type_error(
                    format!("'{}' object is not callable", other.type_name()),
                    line,
                ));
            }
        };

        if args.len() != params.len() {
            return Err(MiniPyError::arity(&name, params.len(), args.len(), line));
        }

        let frame = Environment::child(captured);
        for (param, arg) in params.iter().zip(args) {
            frame.borrow_mut().define(param.clone(), arg);
        }

        match self.exec_block(&body, &frame)? {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::None => Ok(Value::None),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn unary_op(op: &str, value: Value, line: usize) -> Result<Value, MiniPyError> {
    match op {
        "not" => Ok(Value::Bool(!value.is_truthy())),
        "-" => match value {
            Value::Int(n) => Ok(Value::Int(n.wrapping_neg())),
            Value::Float(x) => Ok(Value::Float(-x)),
            other => Err(MiniPyError::type_error(
                format!("bad operand type for unary -: '{}'", other.type_name()),
                line,
            )),
        },
        "+" => match value {
            Value::Int(_) | Value::Float(_) => Ok(value),
            other => Err(MiniPyError::type_error(
                format!("bad operand type for unary +: '{}'", other.type_name()),
                line,
            )),
        },
        _ => Err(MiniPyError::type_error(format!("unknown unary operator '{}'", op), line)),
    }
}

fn binary_op(op: &str, left: Value, right: Value, line: usize) -> Result<Value, MiniPyError> {
    match op {
        "==" => Ok(Value::Bool(left.py_eq(&right))),
        "!=" => Ok(Value::Bool(!left.py_eq(&right))),
        "+" => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(b))),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
            (l, r) => numeric_or_type_error(&l, &r, op, line, |a, b| Value::Float(a + b)),
        },
        "-" => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(b))),
            (l, r) => numeric_or_type_error(&l, &r, op, line, |a, b| Value::Float(a - b)),
        },
        "*" => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(b))),
            (l, r) => numeric_or_type_error(&l, &r, op, line, |a, b| Value::Float(a * b)),
        },
        // True division always produces a float
        "/" => {
            let (a, b) = both_numeric(&left, &right, op, line)?;
            if b == 0.0 {
                return Err(MiniPyError::zero_division(line));
            }
            Ok(Value::Float(a / b))
        }
        "//" => match (left, right) {
            (Value::Int(a), Value::Int(b)) => {
                if b == 0 {
                    return Err(MiniPyError::zero_division(line));
                }
                Ok(Value::Int(floor_div_int(a, b)))
            }
            (l, r) => {
                let (a, b) = both_numeric(&l, &r, op, line)?;
                if b == 0.0 {
                    return Err(MiniPyError::zero_division(line));
                }
                Ok(Value::Float((a / b).floor()))
            }
        },
        "%" => match (left, right) {
            (Value::Int(a), Value::Int(b)) => {
                if b == 0 {
                    return Err(MiniPyError::zero_division(line));
                }
                Ok(Value::Int(floor_mod_int(a, b)))
            }
            (l, r) => {
                let (a, b) = both_numeric(&l, &r, op, line)?;
                if b == 0.0 {
                    return Err(MiniPyError::zero_division(line));
                }
                // Floor semantics, matching Python's % for floats
                Ok(Value::Float(a - (a / b).floor() * b))
            }
        },
        "**" => match (left, right) {
            (Value::Int(a), Value::Int(b)) if b >= 0 => {
                match u32::try_from(b).ok().and_then(|exp| a.checked_pow(exp)) {
                    Some(result) => Ok(Value::Int(result)),
                    // Too large for i64: promote to float like the other
                    // overflow-prone paths
                    None => Ok(Value::Float((a as f64).powf(b as f64))),
                }
            }
            (l, r) => numeric_or_type_error(&l, &r, op, line, |a, b| Value::Float(a.powf(b))),
        },
        "<" | "<=" | ">" | ">=" => compare(op, &left, &right, line),
        _ => Err(MiniPyError::type_error(format!("unknown operator '{}'", op), line)),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

fn both_numeric(
    left: &Value,
    right: &Value,
    op: &str,
    line: usize,
) -> Result<(f64, f64), MiniPyError> {
    match (as_f64(left), as_f64(right)) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(MiniPyError::type_error(
            format!(
                "unsupported operand type(s) for {}: '{}' and '{}'",
                op,
                left.type_name(),
                right.type_name()
            ),
            line,
        )),
    }
}

fn numeric_or_type_error(
    left: &Value,
    right: &Value,
    op: &str,
    line: usize,
    apply: impl FnOnce(f64, f64) -> Value,
) -> Result<Value, MiniPyError> {
    let (a, b) = both_numeric(left, right, op, line)?;
    Ok(apply(a, b))
}

fn compare(op: &str, left: &Value, right: &Value, line: usize) -> Result<Value, MiniPyError> {
    let ordered = match (left, right) {
        (Value::Str(a), Value::Str(b)) => match op {
            "<" => a < b,
            "<=" => a <= b,
            ">" => a > b,
            _ => a >= b,
        },
        _ => {
            let (a, b) = match (as_f64(left), as_f64(right)) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    return Err(MiniPyError::type_error(
                        format!(
                            "'{}' not supported between instances of '{}' and '{}'",
                            op,
                            left.type_name(),
                            right.type_name()
                        ),
                        line,
                    ));
                }
            };
            match op {
                "<" => a < b,
                "<=" => a <= b,
                ">" => a > b,
                _ => a >= b,
            }
        }
    };
    Ok(Value::Bool(ordered))
}

/// Floor division: the result sign follows the divisor, like Python's `//`
fn floor_div_int(a: i64, b: i64) -> i64 {
    let quotient = a.wrapping_div(b);
    let remainder = a.wrapping_rem(b);
    if remainder != 0 && (remainder < 0) != (b < 0) {
        quotient - 1
    } else {
        quotient
    }
}

/// Floor modulo: the result sign follows the divisor, like Python's `%`
fn floor_mod_int(a: i64, b: i64) -> i64 {
    let remainder = a.wrapping_rem(b);
    if remainder != 0 && (remainder < 0) != (b < 0) {
        remainder + b
    } else {
        remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_matches_python() {
        assert_eq!(floor_div_int(7, 2), 3);
        assert_eq!(floor_div_int(-7, 2), -4);
        assert_eq!(floor_div_int(7, -2), -4);
        assert_eq!(floor_div_int(-7, -2), 3);
        assert_eq!(floor_div_int(6, 3), 2);
    }

    #[test]
    fn floor_modulo_sign_follows_divisor() {
        assert_eq!(floor_mod_int(7, 2), 1);
        assert_eq!(floor_mod_int(-7, 2), 1);
        assert_eq!(floor_mod_int(7, -2), -1);
        assert_eq!(floor_mod_int(-7, -2), -1);
        assert_eq!(floor_mod_int(6, 3), 0);
    }

    #[test]
    fn true_division_always_floats() {
        let result = binary_op("/", Value::Int(1), Value::Int(2), 1).unwrap();
        assert_eq!(result, Value::Float(0.5));
        let result = binary_op("/", Value::Int(4), Value::Int(2), 1).unwrap();
        assert_eq!(result, Value::Float(2.0));
    }

    #[test]
    fn division_by_zero_is_reported() {
        for op in ["/", "//", "%"] {
            let err = binary_op(op, Value::Int(1), Value::Int(0), 5).unwrap_err();
            assert_eq!(err.kind, crate::errors::ErrorKind::ZeroDivisionError);
            assert_eq!(err.line, 5);
        }
    }

    #[test]
    fn integer_power_stays_exact_until_it_cannot() {
        assert_eq!(binary_op("**", Value::Int(2), Value::Int(10), 1).unwrap(), Value::Int(1024));
        // Negative exponents produce floats
        assert_eq!(
            binary_op("**", Value::Int(2), Value::Int(-1), 1).unwrap(),
            Value::Float(0.5)
        );
    }

    #[test]
    fn string_concatenation_and_comparison() {
        assert_eq!(
            binary_op("+", Value::Str("ab".into()), Value::Str("cd".into()), 1).unwrap(),
            Value::Str("abcd".into())
        );
        assert_eq!(
            binary_op("<", Value::Str("a".into()), Value::Str("b".into()), 1).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn mixed_type_arithmetic_is_a_type_error() {
        let err = binary_op("-", Value::Str("a".into()), Value::Int(1), 2).unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::TypeError);
    }
}
