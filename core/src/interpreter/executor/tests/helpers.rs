//! Test helpers for executor tests
//!
//! Common utilities for running programs and building expected values

use crate::interpreter::executor::{Interpreter, RunReport};
use crate::interpreter::types::Value;

/// Run River source on a fresh interpreter with the default step budget
pub fn run(source: &str) -> RunReport {
    Interpreter::new().execute(source)
}

/// Run River source with a custom step budget
pub fn run_with_budget(source: &str, max_steps: usize) -> RunReport {
    Interpreter::with_max_steps(max_steps).execute(source)
}

pub fn int(n: i64) -> Value {
    Value::Integer(n)
}

pub fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Integer).collect()
}

pub fn texts(values: &[&str]) -> Vec<Value> {
    values.iter().map(|s| text(s)).collect()
}
