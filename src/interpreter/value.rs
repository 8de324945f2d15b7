// File: src/interpreter/value.rs
//
// Runtime value types for the minipy interpreter.
// Defines every value the evaluator can produce, plus the Python-flavored
// truthiness, equality, and display rules the rest of the interpreter
// builds on.

use super::environment::Environment;
use crate::ast::Stmt;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A runtime value
///
/// Function values are closures: the parameter list and body together with
/// the environment the `def` was executed in. Body and environment are
/// shared references, since multiple function values (and live call frames)
/// may outlive the scope that created them.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
    Function {
        name: String,
        params: Vec<String>,
        body: Rc<Vec<Stmt>>,
        env: Rc<RefCell<Environment>>,
    },
}

impl Value {
    /// Python truthiness: False, None, 0, 0.0 and "" are falsy,
    /// everything else is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::None => false,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Function { .. } => true,
        }
    }

    /// The Python type name, used in TypeError messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bool(_) => "bool",
            Value::None => "NoneType",
            Value::Function { .. } => "function",
        }
    }

    /// Python `==` semantics: numbers compare numerically across int/float,
    /// same-type values compare structurally, functions compare by identity,
    /// and any other cross-type comparison is false rather than an error.
    pub fn py_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Function { body: a, .. }, Value::Function { body: b, .. }) => {
                Rc::ptr_eq(a, b)
            }
            _ => false,
        }
    }

    /// REPL-style representation: strings are quoted, everything else
    /// displays as `print` would show it
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s),
            other => other.to_string(),
        }
    }
}

/// A closure's environment can contain the closure itself (any recursive
/// function does), so Debug must not descend into it.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({})", n),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::None => write!(f, "None"),
            Value::Function { name, params, .. } => {
                write!(f, "Function({}, {} params)", name, params.len())
            }
        }
    }
}

/// `print` formatting: ints print bare, integral floats keep a trailing
/// `.0`, booleans print as `True`/`False`, `None` prints literally.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => {
                if x.is_nan() {
                    write!(f, "nan")
                } else if x.is_infinite() {
                    write!(f, "{}", if *x > 0.0 { "inf" } else { "-inf" })
                } else if x.fract() == 0.0 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::None => write!(f, "None"),
            Value::Function { name, .. } => write!(f, "<function {}>", name),
        }
    }
}

/// Structural equality for tests and environment assertions. Language-level
/// `==` goes through [`Value::py_eq`] instead, which is looser about numeric
/// types.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Function { body: a, .. }, Value::Function { body: b, .. }) => {
                Rc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_matches_python() {
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::None.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::Str(" ".to_string()).is_truthy());
    }

    #[test]
    fn display_formats_like_python() {
        assert_eq!(Value::Int(1).to_string(), "1");
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::None.to_string(), "None");
    }

    #[test]
    fn numeric_equality_crosses_int_and_float() {
        assert!(Value::Int(1).py_eq(&Value::Float(1.0)));
        assert!(!Value::Int(1).py_eq(&Value::Str("1".to_string())));
        assert!(!Value::Bool(true).py_eq(&Value::None));
    }

    #[test]
    fn repr_quotes_strings() {
        assert_eq!(Value::Str("hi".to_string()).repr(), "'hi'");
        assert_eq!(Value::Int(3).repr(), "3");
    }
}
