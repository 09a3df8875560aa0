//! Execution trace ("the river's journey")
//!
//! An append-only record of what the interpreter did. Entries keep the block
//! depth they were recorded at and render to indented lines on demand; the
//! interpreter itself never reads them back.

use super::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/* ===================== Diagnostics ===================== */

/// Non-fatal problems found while evaluating or running a program
///
/// Each one is recorded in the trace and the offending expression evaluates
/// to `0`, so execution always continues. `ExecutionLimitExceeded` is the
/// trace record of the fatal halt.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    #[error("Unknown expression '{expr}'")]
    UnknownExpression { expr: String },

    #[error("Undefined tributary '{name}'")]
    UndefinedTributary { name: String },

    #[error("Cannot divide by zero")]
    DivideByZero,

    #[error("Modulo by zero")]
    ModuloByZero,

    #[error("Cannot compare strings with '{phrase}': '{expr}'")]
    TextComparison { phrase: String, expr: String },

    #[error("Cannot {operation} text: '{expr}'")]
    TextArithmetic { operation: String, expr: String },

    #[error("Integer overflow in '{expr}'")]
    Overflow { expr: String },

    #[error("Integer literal out of range: '{literal}'")]
    LiteralOutOfRange { literal: String },

    #[error("Execution limit exceeded {}", limit_suffix(.in_function))]
    ExecutionLimitExceeded { in_function: bool },
}

fn limit_suffix(in_function: &bool) -> &'static str {
    if *in_function {
        "in function"
    } else {
        "(possible infinite loop)"
    }
}

/* ===================== Events ===================== */

/// Something worth recording during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    /// A top-level statement was visited
    Line { index: usize, text: String },
    /// A tributary body statement was visited
    TributaryLine { tributary: String, text: String },
    WaterfallCheck { test: String, flows: bool },
    LoopCondition { test: String, value: Value },
    LoopSkipped,
    LoopCheck { test: String, value: Value },
    LoopExited,
    LoopContinues { index: usize },
    Output { value: Value },
    Call { tributary: String, argument: Value },
    Returning { tributary: String, value: Value },
    Returned { tributary: String, value: Value },
    Diagnostic(Diagnostic),
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Line { index, text } => write!(f, "[Line {}] {}", index, text),
            TraceEvent::TributaryLine { tributary, text } => {
                write!(f, "[Tributary {}] {}", tributary, text)
            }
            TraceEvent::WaterfallCheck { test, flows } => write!(
                f,
                "Waterfall check: {} -> {}",
                test,
                if *flows { "flows" } else { "blocks" }
            ),
            TraceEvent::LoopCondition { test, value } => {
                write!(f, "Loop condition: {} = {}", test, value)
            }
            TraceEvent::LoopSkipped => f.write_str("Loop condition met, skipping loop"),
            TraceEvent::LoopCheck { test, value } => write!(f, "Loop check: {} = {}", test, value),
            TraceEvent::LoopExited => f.write_str("Loop condition met, exiting loop"),
            TraceEvent::LoopContinues { index } => {
                write!(f, "Loop continues, jumping to line {}", index)
            }
            TraceEvent::Output { value } => write!(f, "Output: {}", value),
            TraceEvent::Call {
                tributary,
                argument,
            } => write!(f, "Calling tributary {}({})", tributary, argument),
            TraceEvent::Returning { tributary, value } => {
                write!(f, "Returning {} from {}", value, tributary)
            }
            TraceEvent::Returned { tributary, value } => {
                write!(f, "Tributary {} returned {}", tributary, value)
            }
            TraceEvent::Diagnostic(diagnostic) => write!(f, "RIVER ERROR: {}", diagnostic),
        }
    }
}

/* ===================== Trace ===================== */

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Block depth at the time of recording (may dip below zero on unbalanced input)
    pub depth: isize,
    pub event: TraceEvent,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = usize::try_from(self.depth).unwrap_or(0);
        write!(f, "{}{}", "  ".repeat(indent), self.event)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, depth: isize, event: TraceEvent) {
        self.entries.push(TraceEntry { depth, event });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered, indented lines in recording order
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter_map(|entry| match &entry.event {
            TraceEvent::Diagnostic(diagnostic) => Some(diagnostic),
            _ => None,
        })
    }
}
