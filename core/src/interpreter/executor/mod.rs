//! # Executor - line-index state machines for River programs
//!
//! ## Core Principles
//!
//! 1. **Index-driven execution**: each statement sequence (top level or a
//!    tributary body) is walked by index; loops jump the index back to their
//!    header, branches skip forward by scanning.
//! 2. **One engine, two frame kinds**: top-level and tributary bodies share the
//!    same branch/loop transition rules and differ only in scoping and in the
//!    statements they honour (program markers vs. return).
//! 3. **Shared step budget**: every visited statement, at any call depth,
//!    costs one step. Exceeding the budget halts the whole run.
//! 4. **Total evaluation**: malformed expressions become diagnostics in the
//!    trace, never errors.

mod calls;
pub mod exec_loop;
mod flow;
pub mod statements;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use super::expressions::{EvalResult, Environment};
use super::parser;
use super::trace::{Diagnostic, Trace, TraceEvent};
use super::types::{CallFrame, FrameKind, Halt, Line, Program, Scope, Value};
use crate::config::Config;

/// Default execution-step budget
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/* ===================== Run Report ===================== */

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Statements exhausted, or the program-end marker closed the outermost block
    Completed,
    /// The run was stopped by a fatal condition
    Halted(Halt),
}

/// Everything observable about a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub status: RunStatus,
    /// Values deposited as sediment, in execution order
    pub outputs: Vec<Value>,
    /// Global streams at termination
    pub globals: BTreeMap<String, Value>,
    pub trace: Trace,
    /// Statements visited
    pub steps: usize,
}

impl RunReport {
    pub fn completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/* ===================== Interpreter ===================== */

/// River interpreter state
///
/// Owns the global scope, the tributary table, the call stack and the shared
/// step counter. A fresh run resets all of it, so one instance can execute
/// several programs in turn.
#[derive(Debug)]
pub struct Interpreter {
    max_steps: usize,
    globals: Scope,
    tributaries: HashMap<String, Rc<[Line]>>,
    call_stack: Vec<CallFrame>,
    /// Block depth, used for trace indentation and the program-end test
    depth: isize,
    steps: usize,
    outputs: Vec<Value>,
    trace: Trace,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::with_max_steps(DEFAULT_MAX_STEPS)
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_steps(max_steps: usize) -> Self {
        Self {
            max_steps,
            globals: Scope::new(),
            tributaries: HashMap::new(),
            call_stack: Vec::new(),
            depth: 0,
            steps: 0,
            outputs: Vec::new(),
            trace: Trace::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_max_steps(config.max_steps)
    }

    /// Preprocess and run program text
    pub fn execute(&mut self, source: &str) -> RunReport {
        let program = parser::preprocess(source);
        self.run_program(&program)
    }

    /// Run an already preprocessed program from a clean state
    pub fn run_program(&mut self, program: &Program) -> RunReport {
        self.reset();
        self.tributaries = program.tributaries.clone();

        tracing::debug!(
            statements = program.main.len(),
            tributaries = self.tributaries.len(),
            max_steps = self.max_steps,
            "river begins"
        );

        let status = match exec_loop::run_main(self, &program.main) {
            Ok(()) => RunStatus::Completed,
            Err(halt) => {
                tracing::error!(%halt, "run halted");
                self.call_stack.clear();
                RunStatus::Halted(halt)
            }
        };

        tracing::debug!(steps = self.steps, outputs = self.outputs.len(), "river ends");

        RunReport {
            status,
            outputs: self.outputs.clone(),
            globals: self.globals_snapshot(),
            trace: self.trace.clone(),
            steps: self.steps,
        }
    }

    /// Global streams ordered by name
    fn globals_snapshot(&self) -> BTreeMap<String, Value> {
        self.globals
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Number of pending tributary calls
    pub fn call_depth(&self) -> usize {
        self.call_stack.len()
    }

    fn reset(&mut self) {
        self.globals.clear();
        self.tributaries.clear();
        self.call_stack.clear();
        self.depth = 0;
        self.steps = 0;
        self.outputs.clear();
        self.trace = Trace::new();
    }

    /* ===================== Bookkeeping ===================== */

    /// Charge one step against the shared budget
    fn tick(&mut self, kind: &FrameKind) -> Result<(), Halt> {
        if self.steps >= self.max_steps {
            let in_function = matches!(kind, FrameKind::Tributary { .. });
            self.log_flow(TraceEvent::Diagnostic(Diagnostic::ExecutionLimitExceeded {
                in_function,
            }));
            return Err(Halt::StepBudgetExceeded {
                limit: self.max_steps,
            });
        }
        self.steps += 1;
        Ok(())
    }

    /// Append to the trace at the current depth and mirror it to `tracing`
    fn log_flow(&mut self, event: TraceEvent) {
        match &event {
            TraceEvent::Diagnostic(diagnostic) => {
                tracing::warn!(depth = self.depth, "{}", diagnostic)
            }
            _ => tracing::debug!(depth = self.depth, "{}", event),
        }
        self.trace.push(self.depth, event);
    }

    /// Bind a stream on `create stream`
    ///
    /// Top level always binds globals; inside a tributary the binding is local.
    fn declare(&mut self, kind: &FrameKind, name: &str, value: Value) {
        match (kind, self.call_stack.last_mut()) {
            (FrameKind::Tributary { .. }, Some(frame)) => {
                frame.locals.insert(name.to_string(), value);
            }
            _ => {
                self.globals.insert(name.to_string(), value);
            }
        }
    }

    /// Rebind a stream on `direct stream`
    ///
    /// Inside a tributary a name already bound locally stays local; any other
    /// name is written to the global scope.
    fn assign(&mut self, kind: &FrameKind, name: &str, value: Value) {
        if let (FrameKind::Tributary { .. }, Some(frame)) = (kind, self.call_stack.last_mut()) {
            if let Some(slot) = frame.locals.get_mut(name) {
                *slot = value;
                return;
            }
        }
        self.globals.insert(name.to_string(), value);
    }
}

/* ===================== Environment ===================== */

impl Environment for Interpreter {
    fn local_scope(&self) -> Option<&Scope> {
        self.call_stack.last().map(|frame| &frame.locals)
    }

    fn global_scope(&self) -> &Scope {
        &self.globals
    }

    fn call(&mut self, name: &str, argument: Value) -> EvalResult {
        self.call_tributary(name, argument)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.log_flow(TraceEvent::Diagnostic(diagnostic));
    }
}
