// File: src/interpreter/control_flow.rs
//
// Control flow signals for non-local returns.
//
// Every statement execution returns a ControlFlow value. `return` inside a
// function body surfaces as `ControlFlow::Return`, which propagates upward
// through enclosing statements until the nearest function-call frame catches
// it and turns it into the call's value. This keeps unwinding explicit
// instead of relying on host-level exceptions or panics.

use super::value::Value;

/// Outcome of executing one statement
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ControlFlow {
    /// Normal execution, continue to the next statement
    None,
    /// Return statement encountered, unwind to the enclosing call frame
    /// carrying this value
    Return(Value),
}
