//! River interpreter
//!
//! Program text goes through the [`parser`] (comment stripping, tributary
//! partitioning, statement classification) and is then run by the
//! [`executor`], which evaluates every expression with [`expressions`] and
//! records what happened in a [`trace`].

pub mod executor;
pub mod expressions;
pub mod parser;
pub mod trace;
pub mod types;


pub use executor::{Interpreter, RunReport, RunStatus, DEFAULT_MAX_STEPS};
pub use expressions::{evaluate, Environment, EvalResult};
pub use parser::semantic_validator::{validate_program, ValidationWarning};
pub use parser::preprocess;
pub use trace::{Diagnostic, Trace, TraceEvent};
pub use types::{Halt, Program, Scope, Stmt, Value};

/// Run program text on a fresh interpreter with the default step budget
pub fn run_source(source: &str) -> RunReport {
    Interpreter::new().execute(source)
}
