//! Control flow and call frame types

use super::values::{Scope, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/* ===================== Frames ===================== */

/// Which statement sequence an execution loop is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKind {
    /// The top-level statements
    Main,
    /// The body of a tributary call
    Tributary { name: String },
}

/// Call frame - one per pending tributary call
///
/// Pushed by the call manager on invocation and popped on return, body
/// exhaustion or halt.
#[derive(Debug, Clone)]
pub struct CallFrame {
    /// Local streams; seeded with `current`
    pub locals: Scope,
}

impl CallFrame {
    pub fn new(argument: Value) -> Self {
        let mut locals = Scope::new();
        locals.insert("current".to_string(), argument);
        Self { locals }
    }
}

/* ===================== Step Result ===================== */

/// Result of executing one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Continue with the statement at the (possibly updated) index
    Continue,
    /// The tributary body returned a value
    Return(Value),
    /// The program-end marker closed the outermost block
    Done,
}

/* ===================== Halt ===================== */

/// Fatal condition that stops the whole run
///
/// This is the only failure that propagates out of the evaluator; every other
/// problem is recorded as a diagnostic and replaced by a default value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Halt {
    #[error("execution limit of {limit} steps exceeded")]
    StepBudgetExceeded { limit: usize },
}
