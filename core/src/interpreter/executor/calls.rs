//! Call manager - tributary invocation
//!
//! Each call pushes a [`CallFrame`] whose local scope is seeded with
//! `current`, runs the body with the block depth reset to zero, and pops the
//! frame again whether the body returned, ran out, or halted.
//!
//! Calls nest natively (call, body loop, evaluator, call again), so the body
//! runs under [`stacker::maybe_grow`]: recursion depth is limited by the step
//! budget alone, never by the thread's stack size.

use std::rc::Rc;

use super::{exec_loop, Interpreter};
use crate::interpreter::expressions::EvalResult;
use crate::interpreter::trace::{Diagnostic, TraceEvent};
use crate::interpreter::types::{CallFrame, Value};

/// Remaining native stack below which a call switches to a fresh segment
const STACK_RED_ZONE: usize = 256 * 1024;
/// Size of each additional stack segment
const STACK_SEGMENT: usize = 4 * 1024 * 1024;

impl Interpreter {
    /// Invoke a tributary with one argument
    ///
    /// An unknown name is a diagnostic and yields `0` without touching the
    /// call stack. A body that ends without returning yields `0`.
    pub(crate) fn call_tributary(&mut self, name: &str, argument: Value) -> EvalResult {
        let Some(body) = self.tributaries.get(name).map(Rc::clone) else {
            self.log_flow(TraceEvent::Diagnostic(Diagnostic::UndefinedTributary {
                name: name.to_string(),
            }));
            return Ok(Value::default());
        };

        let caller_depth = self.depth;
        self.depth = 0;
        self.call_stack.push(CallFrame::new(argument.clone()));
        self.log_flow(TraceEvent::Call {
            tributary: name.to_string(),
            argument,
        });
        tracing::debug!(tributary = name, frames = self.call_stack.len(), "entering tributary");

        let outcome = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            exec_loop::run_tributary(self, name, &body)
        });

        self.depth = caller_depth;
        self.call_stack.pop();

        let value = outcome?.unwrap_or_default();
        self.log_flow(TraceEvent::Returned {
            tributary: name.to_string(),
            value: value.clone(),
        });
        Ok(value)
    }
}
