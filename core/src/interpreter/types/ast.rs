//! Statement types produced by the preprocessor
//!
//! Expressions stay as raw text: they are re-parsed by phrase matching every
//! time they are evaluated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// One classified source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Stmt {
    /// `river begins its journey`
    ProgramStart,
    /// `river meets ocean`
    ProgramEnd,
    /// `if waterfall COND:`
    Waterfall { test: String },
    /// `otherwise:`
    Otherwise,
    /// `end waterfall`
    EndWaterfall,
    /// `flow until COND:`
    FlowUntil { test: String },
    /// `river bend`
    RiverBend,
    /// `create stream NAME carrying EXPR`
    CreateStream { name: String, expr: String },
    /// `direct stream NAME to carry EXPR`
    DirectStream { name: String, expr: String },
    /// `deposit sediment: EXPR`
    Deposit { expr: String },
    /// `return to main river: EXPR`
    Return { expr: Option<String> },
    /// `tributary NAME flowing from current`; consumed by the preprocessor
    TributaryHeader { name: String },
    /// `rejoin main river` outside any tributary
    Rejoin,
    /// Any line no statement form matched
    Unrecognized,
}

/// A statement together with the cleaned source text it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub stmt: Stmt,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A preprocessed program
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Top-level statements, in source order
    pub main: Vec<Line>,
    /// Tributary bodies by name
    pub tributaries: HashMap<String, Rc<[Line]>>,
    /// Notes the preprocessor made while partitioning (used by validation)
    pub notes: Vec<PreprocessNote>,
}

/// Structural observations recorded while partitioning the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreprocessNote {
    /// A tributary definition began before the previous one was rejoined
    ImplicitlyClosed { name: String },
    /// Input ended inside a tributary definition
    Unclosed { name: String },
    /// A tributary name was defined more than once
    Redefined { name: String },
}
