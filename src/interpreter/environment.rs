// File: src/interpreter/environment.rs
//
// Lexical scoping environment for variable management in the minipy
// interpreter. Environments form a parent-linked chain: each function call
// and block gets a child environment whose parent is the scope it was
// entered from. Closures keep their defining environment alive through a
// shared reference, so the chain is reference-counted.

use super::value::Value;
use crate::errors::MiniPyError;
use ahash::AHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Variable storage using lexical scoping
///
/// Lookup walks outward through parents until the name is found or the chain
/// is exhausted. Assignment mutates the innermost scope that declares the
/// name and never creates one. Definition always targets the current scope.
///
/// # Examples
///
/// ```ignore
/// let global = Environment::new_shared();
/// global.borrow_mut().define("x".to_string(), Value::Int(10));
///
/// let inner = Environment::child(Rc::clone(&global));
/// inner.borrow_mut().define("x".to_string(), Value::Int(20)); // shadows outer x
/// assert_eq!(inner.borrow().get("x", 1).unwrap(), Value::Int(20));
/// assert_eq!(global.borrow().get("x", 1).unwrap(), Value::Int(10));
/// ```
#[derive(Debug)]
pub struct Environment {
    values: AHashMap<String, Value>,
    parent: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// Create a new top-level environment with no parent
    pub fn new() -> Self {
        Environment { values: AHashMap::new(), parent: None }
    }

    /// Create a new shared top-level environment
    pub fn new_shared() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::new()))
    }

    /// Create a child scope of `parent` (e.g. entering a function or block)
    pub fn child(parent: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            values: AHashMap::new(),
            parent: Some(parent),
        }))
    }

    /// Define a variable in the current (innermost) scope, overwriting any
    /// previous binding in this scope
    pub fn define(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    /// Get a variable, searching from this scope outward through parents.
    ///
    /// # Errors
    /// Returns a `NameError` if the name is absent from the whole chain.
    pub fn get(&self, name: &str, line: usize) -> Result<Value, MiniPyError> {
        if let Some(value) = self.values.get(name) {
            return Ok(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.borrow().get(name, line),
            None => Err(MiniPyError::name(name, line)),
        }
    }

    /// Assign to an existing variable in the innermost scope that declares
    /// it. Assignment never implicitly creates a binding.
    ///
    /// # Errors
    /// Returns a `NameError` if no scope in the chain declares the name.
    pub fn assign(&mut self, name: &str, value: Value, line: usize) -> Result<(), MiniPyError> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value, line),
            None => Err(MiniPyError::name(name, line)),
        }
    }

    /// True if the name is declared in this scope or any parent
    pub fn is_declared(&self, name: &str) -> bool {
        if self.values.contains_key(name) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.borrow().is_declared(name),
            None => false,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn define_then_get_in_same_scope() {
        let env = Environment::new_shared();
        env.borrow_mut().define("x".to_string(), Value::Int(1));
        assert_eq!(env.borrow().get("x", 1).unwrap(), Value::Int(1));
    }

    #[test]
    fn get_walks_parent_chain() {
        let global = Environment::new_shared();
        global.borrow_mut().define("x".to_string(), Value::Int(10));
        let inner = Environment::child(Rc::clone(&global));
        assert_eq!(inner.borrow().get("x", 1).unwrap(), Value::Int(10));
    }

    #[test]
    fn child_shadows_parent() {
        let global = Environment::new_shared();
        global.borrow_mut().define("x".to_string(), Value::Int(10));
        let inner = Environment::child(Rc::clone(&global));
        inner.borrow_mut().define("x".to_string(), Value::Int(20));
        assert_eq!(inner.borrow().get("x", 1).unwrap(), Value::Int(20));
        assert_eq!(global.borrow().get("x", 1).unwrap(), Value::Int(10));
    }

    #[test]
    fn assign_mutates_innermost_declaring_scope() {
        let global = Environment::new_shared();
        global.borrow_mut().define("count".to_string(), Value::Int(0));
        let inner = Environment::child(Rc::clone(&global));
        inner.borrow_mut().assign("count", Value::Int(5), 1).unwrap();
        assert_eq!(global.borrow().get("count", 1).unwrap(), Value::Int(5));
    }

    #[test]
    fn assign_to_undeclared_name_is_a_name_error() {
        let global = Environment::new_shared();
        let inner = Environment::child(Rc::clone(&global));
        let err = inner.borrow_mut().assign("ghost", Value::Int(1), 3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NameError);
        // No silent creation, anywhere in the chain
        assert!(!inner.borrow().is_declared("ghost"));
        assert!(!global.borrow().is_declared("ghost"));
    }

    #[test]
    fn get_missing_name_is_a_name_error() {
        let env = Environment::new_shared();
        let err = env.borrow().get("missing", 9).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NameError);
        assert_eq!(err.line, 9);
    }
}
